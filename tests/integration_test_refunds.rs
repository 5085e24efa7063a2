mod common;

use common::{seat_ids, TestApp};
use ticketing_backend::domain::models::{
    booking::BookingStatus,
    notification::Notification,
    payment::PaymentStatus,
    refund::RefundStatus,
    seat::SeatState,
    ticket::TicketStatus,
};
use ticketing_backend::error::AppError;

#[tokio::test]
async fn test_refund_approval_roundtrip() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let picked = seat_ids(&seats, 2);
    let (booking, tickets) = app.confirmed_booking(&event, &picked).await;

    let refund = app
        .state
        .refund_service
        .request_refund(&booking.id, "customer-1", "Cannot attend")
        .await
        .unwrap();
    assert_eq!(refund.status, RefundStatus::Requested);
    assert_eq!(refund.amount_cents, booking.total_cents);

    let booking_mid = app.state.booking_service.find_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(booking_mid.status, BookingStatus::RefundRequested);

    let decided = app.state.refund_service.decide(&booking.id, true, "support-1").await.unwrap();
    assert_eq!(decided.status, RefundStatus::Completed);
    assert_eq!(decided.resolved_by.as_deref(), Some("support-1"));

    let booking_after = app.state.booking_service.find_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(booking_after.status, BookingStatus::Refunded);
    for seat in app.seat_states(&picked).await {
        assert_eq!(seat.state, SeatState::Available);
    }
    for ticket in &tickets {
        let stored = app.state.ticket_service.find_by_code(&ticket.qr_code).await.unwrap().unwrap();
        assert_eq!(stored.status, TicketStatus::Invalidated);
    }
    let payment = app.state.booking_repo.find_payment(&booking.id).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Refunded);

    let sent = app.notifier.sent.lock().unwrap();
    assert!(sent.iter().any(|n| matches!(
        n,
        Notification::RefundDecided { booking_id, approved: true, .. } if booking_id == &booking.id
    )));
}

#[tokio::test]
async fn test_refund_rejection_restores_booking() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let picked = seat_ids(&seats, 2);
    let (booking, tickets) = app.confirmed_booking(&event, &picked).await;

    app.state
        .refund_service
        .request_refund(&booking.id, "customer-1", "Changed my mind")
        .await
        .unwrap();
    let decided = app.state.refund_service.decide(&booking.id, false, "support-1").await.unwrap();
    assert_eq!(decided.status, RefundStatus::Rejected);

    let booking_after = app.state.booking_service.find_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(booking_after.status, BookingStatus::Confirmed);
    for seat in app.seat_states(&picked).await {
        assert_eq!(seat.state, SeatState::Booked);
    }
    for ticket in &tickets {
        let stored = app.state.ticket_service.find_by_code(&ticket.qr_code).await.unwrap().unwrap();
        assert_eq!(stored.status, TicketStatus::Issued);
    }
}

#[tokio::test]
async fn test_refund_requires_confirmed_booking() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;

    let pending = app
        .state
        .booking_service
        .create_booking("customer-1", &event.id, &seat_ids(&seats, 1), None)
        .await
        .unwrap();

    let result = app
        .state
        .refund_service
        .request_refund(&pending.id, "customer-1", "Too early")
        .await;
    assert!(matches!(result, Err(AppError::BookingNotRefundable(_))));
}

#[tokio::test]
async fn test_refund_request_checks_ownership() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let (booking, _tickets) = app.confirmed_booking(&event, &seat_ids(&seats, 1)).await;

    let result = app
        .state
        .refund_service
        .request_refund(&booking.id, "customer-2", "Not mine")
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_only_one_refund_per_booking() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let (booking, _tickets) = app.confirmed_booking(&event, &seat_ids(&seats, 1)).await;

    app.state
        .refund_service
        .request_refund(&booking.id, "customer-1", "First try")
        .await
        .unwrap();
    app.state.refund_service.decide(&booking.id, false, "support-1").await.unwrap();

    // Booking is confirmed again, but the resolved refund blocks a rerun.
    let result = app
        .state
        .refund_service
        .request_refund(&booking.id, "customer-1", "Second try")
        .await;
    assert!(matches!(result, Err(AppError::BookingNotRefundable(_))));
}

#[tokio::test]
async fn test_decide_requires_pending_request() {
    let app = TestApp::new().await;
    let (event, seats) = app.seed_published_event(2, 5).await;
    let (booking, _tickets) = app.confirmed_booking(&event, &seat_ids(&seats, 1)).await;

    let result = app.state.refund_service.decide(&booking.id, true, "support-1").await;
    assert!(matches!(result, Err(AppError::BookingNotRefundable(_))));
}
