pub mod auth;
pub mod booking;
pub mod developer;
pub mod notification;
