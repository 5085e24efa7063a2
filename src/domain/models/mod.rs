pub mod booking;
pub mod event;
pub mod notification;
pub mod offer;
pub mod payment;
pub mod refund;
pub mod seat;
pub mod support;
pub mod ticket;
