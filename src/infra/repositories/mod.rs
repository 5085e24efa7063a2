pub mod sqlite_booking_repo;
pub mod sqlite_event_repo;
pub mod sqlite_offer_repo;
pub mod sqlite_refund_repo;
pub mod sqlite_seat_repo;
pub mod sqlite_support_repo;
pub mod sqlite_ticket_repo;
