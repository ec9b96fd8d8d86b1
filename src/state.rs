use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, DeveloperRepository, NotificationRepository, PaymentGateway,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub developer_repo: Arc<dyn DeveloperRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    /// Client ids with a payment submission in flight. A client may not
    /// start a second submission while one is pending.
    pub payment_inflight: Arc<Mutex<HashSet<String>>>,
}
