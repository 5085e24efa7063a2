pub mod booking_service;
pub mod event_service;
pub mod payment_service;
pub mod pricing;
pub mod refund_service;
pub mod support_service;
pub mod ticket_service;
