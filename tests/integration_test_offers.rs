mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{seat_ids, TestApp};
use ticketing_backend::domain::models::offer::{Offer, OfferType};
use ticketing_backend::domain::models::seat::SeatState;
use ticketing_backend::error::AppError;
use tokio::task::JoinSet;

#[tokio::test]
async fn test_percentage_discount_applies() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let offer = Offer::new("WELCOME10", OfferType::Percentage, 10, Some(100), None);
    app.state.offer_repo.create(&offer).await.unwrap();

    let booking = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 2), Some("welcome10"))
        .await
        .unwrap();

    // 7000 subtotal, 10% off, 8% tax on the rest.
    assert_eq!(booking.subtotal_cents, 7_000);
    assert_eq!(booking.discount_cents, 700);
    assert_eq!(booking.tax_cents, 504);
    assert_eq!(booking.total_cents, 6_804);
    assert_eq!(booking.offer_code.as_deref(), Some("WELCOME10"));

    let stored = app.state.offer_repo.find_by_code("WELCOME10").await.unwrap().unwrap();
    assert_eq!(stored.used_count, 1);
}

#[tokio::test]
async fn test_fixed_discount_capped_at_subtotal() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let offer = Offer::new("FLAT500", OfferType::Fixed, 500_000, None, None);
    app.state.offer_repo.create(&offer).await.unwrap();

    let booking = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), Some("FLAT500"))
        .await
        .unwrap();

    assert_eq!(booking.subtotal_cents, 3_500);
    assert_eq!(booking.discount_cents, 3_500);
    assert_eq!(booking.tax_cents, 0);
    assert_eq!(booking.total_cents, 0);
}

#[tokio::test]
async fn test_offer_rejections() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;

    let result = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), Some("NOPE"))
        .await;
    assert!(matches!(result, Err(AppError::OfferInvalid)));

    let expired = Offer::new("EXPIRED", OfferType::Fixed, 100, None, Some(Utc::now() - Duration::days(1)));
    app.state.offer_repo.create(&expired).await.unwrap();
    let result = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), Some("EXPIRED"))
        .await;
    assert!(matches!(result, Err(AppError::OfferExpired)));

    let mut inactive = Offer::new("INACTIVE", OfferType::Fixed, 100, None, None);
    inactive.active = false;
    app.state.offer_repo.create(&inactive).await.unwrap();
    let result = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), Some("INACTIVE"))
        .await;
    assert!(matches!(result, Err(AppError::OfferInvalid)));

    let mut spent = Offer::new("SPENT", OfferType::Fixed, 100, Some(5), None);
    spent.used_count = 5;
    app.state.offer_repo.create(&spent).await.unwrap();
    let result = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), Some("SPENT"))
        .await;
    assert!(matches!(result, Err(AppError::OfferExhausted)));

    // Every failed attempt released its hold.
    for seat in app.state.event_service.list_seats(&event.id).await.unwrap() {
        assert_eq!(seat.state, SeatState::Available);
    }
}

#[tokio::test]
async fn test_offer_cap_holds_under_concurrent_redemption() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 10).await;
    let offer = Offer::new("SCARCE", OfferType::Percentage, 50, Some(3), None);
    app.state.offer_repo.create(&offer).await.unwrap();

    // Eight customers, disjoint seats, one scarce code.
    let mut set = JoinSet::new();
    let seats = Arc::new(seats);
    for i in 0..8usize {
        let state = app.state.clone();
        let event_id = event.id.clone();
        let seat = vec![seats[i].id.clone()];
        set.spawn(async move {
            state
                .booking_service
                .create_booking(&format!("customer-{}", i), &event_id, &seat, Some("SCARCE"))
                .await
        });
    }

    let mut redeemed = 0;
    let mut exhausted = 0;
    while let Some(res) = set.join_next().await {
        match res.unwrap() {
            Ok(booking) => {
                assert_eq!(booking.offer_code.as_deref(), Some("SCARCE"));
                redeemed += 1;
            }
            Err(AppError::OfferExhausted) => exhausted += 1,
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    assert_eq!(redeemed, 3, "Cap of 3 must hold exactly");
    assert_eq!(exhausted, 5);
    let stored = app.state.offer_repo.find_by_code("SCARCE").await.unwrap().unwrap();
    assert_eq!(stored.used_count, 3);

    // Losing redemptions released their seats.
    let available = app.state.seat_inventory.count_available(&event.id).await.unwrap();
    assert_eq!(available, 20 - 3);
}

#[tokio::test]
async fn test_tax_rounds_to_nearest_cent() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let offer = Offer::new("ODD", OfferType::Fixed, 333, None, None);
    app.state.offer_repo.create(&offer).await.unwrap();

    let booking = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), Some("ODD"))
        .await
        .unwrap();

    // 3500 - 333 = 3167; 8% = 253.36 -> 253
    assert_eq!(booking.tax_cents, 253);
    assert_eq!(booking.total_cents, 3_420);
}
