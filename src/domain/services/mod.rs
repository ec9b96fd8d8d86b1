pub mod booking_flow;
pub mod scheduling;
pub mod session_window;
