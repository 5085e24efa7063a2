mod common;

use chrono::{Duration, Utc};
use common::{seat_ids, TestApp};
use ticketing_backend::domain::models::{
    booking::BookingStatus,
    payment::PaymentOutcome,
    seat::SeatState,
};
use ticketing_backend::error::AppError;

#[tokio::test]
async fn test_sweep_cancels_stale_pending_bookings() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let picked = seat_ids(&seats, 2);

    let booking = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &picked, None)
        .await
        .unwrap();

    // Cutoff after creation: the booking counts as stale.
    let released = app
        .state
        .booking_service
        .expire_stale_holds(Utc::now())
        .await
        .unwrap();
    assert_eq!(released, 1);

    let booking = app.state.booking_service.find_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    for seat in app.seat_states(&picked).await {
        assert_eq!(seat.state, SeatState::Available);
    }
}

#[tokio::test]
async fn test_sweep_spares_recent_bookings() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;

    let booking = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), None)
        .await
        .unwrap();

    let released = app
        .state
        .booking_service
        .expire_stale_holds(Utc::now() - Duration::minutes(15))
        .await
        .unwrap();
    assert_eq!(released, 0);

    let booking = app.state.booking_service.find_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::PendingPayment);
}

#[tokio::test]
async fn test_settlement_beats_sweep() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let picked = seat_ids(&seats, 1);

    let booking = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &picked, None)
        .await
        .unwrap();
    app.state
        .payment_service
        .settle(&booking.id, "card", PaymentOutcome::Success)
        .await
        .unwrap();

    // The stale query no longer matches; a confirmed booking is untouchable.
    let released = app
        .state
        .booking_service
        .expire_stale_holds(Utc::now())
        .await
        .unwrap();
    assert_eq!(released, 0);

    let booking = app.state.booking_service.find_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    for seat in app.seat_states(&picked).await {
        assert_eq!(seat.state, SeatState::Booked);
    }
}

#[tokio::test]
async fn test_swept_booking_is_not_payable() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;

    let booking = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), None)
        .await
        .unwrap();
    app.state.booking_service.expire_stale_holds(Utc::now()).await.unwrap();

    let result = app
        .state
        .payment_service
        .settle(&booking.id, "card", PaymentOutcome::Success)
        .await;
    assert!(matches!(result, Err(AppError::BookingNotPayable(_))));
}
