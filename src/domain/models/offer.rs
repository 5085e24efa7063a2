use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Percentage,
    Fixed,
}

/// Discount code. `value` is percent points for `percentage` offers and
/// cents for `fixed` offers. `usage_limit = None` means unlimited.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Offer {
    pub id: String,
    pub code: String,
    pub offer_type: OfferType,
    pub value: i64,
    pub active: bool,
    pub usage_limit: Option<i64>,
    pub used_count: i64,
    pub valid_until: Option<DateTime<Utc>>,
}

impl Offer {
    pub fn new(code: &str, offer_type: OfferType, value: i64, usage_limit: Option<i64>, valid_until: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: code.to_uppercase(),
            offer_type,
            value,
            active: true,
            usage_limit,
            used_count: 0,
            valid_until,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until < now)
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.used_count >= limit)
    }
}
