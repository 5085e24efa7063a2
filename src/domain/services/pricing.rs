use crate::domain::models::offer::{Offer, OfferType};

/// Tax on the discounted amount, rounded to the nearest cent.
pub fn tax_cents(amount_cents: i64, tax_rate: f64) -> i64 {
    (amount_cents as f64 * tax_rate).round() as i64
}

/// Discount for an offer against a subtotal. Percentage offers round to the
/// nearest cent; no discount ever exceeds the subtotal.
pub fn discount_cents(offer: &Offer, subtotal_cents: i64) -> i64 {
    let raw = match offer.offer_type {
        OfferType::Percentage => (subtotal_cents as f64 * offer.value as f64 / 100.0).round() as i64,
        OfferType::Fixed => offer.value,
    };
    raw.min(subtotal_cents)
}
