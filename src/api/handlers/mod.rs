pub mod booking;
pub mod developer;
pub mod health;
pub mod notification;
pub mod session;
pub mod wallet;
