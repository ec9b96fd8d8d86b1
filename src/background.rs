use crate::domain::models::notification::{self, Notification};
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};

const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Deferred-payment follow-up: once a booking's payment deadline passes
/// while payment is still pending, write a one-time payment-due
/// notification for the developer. Settlement itself stays manual.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting payment follow-up worker...");

    loop {
        match state.booking_repo.find_payment_overdue(Utc::now()).await {
            Ok(bookings) => {
                for booking in bookings {
                    let span = info_span!(
                        "payment_followup",
                        booking_id = %booking.id,
                        developer_id = %booking.developer_id
                    );

                    let state = state.clone();
                    async move {
                        match state
                            .notification_repo
                            .exists_for_booking(&booking.id, notification::KIND_PAYMENT_DUE)
                            .await
                        {
                            Ok(true) => {}
                            Ok(false) => {
                                let n = Notification::new(
                                    booking.developer_id.clone(),
                                    booking.id.clone(),
                                    notification::KIND_PAYMENT_DUE,
                                    format!(
                                        "Payment of {} for booking {} is due",
                                        booking.total_cost, booking.id
                                    ),
                                );
                                match state.notification_repo.create(&n).await {
                                    Ok(_) => info!("Payment-due notification written"),
                                    Err(e) => error!("Failed to write notification: {:?}", e),
                                }
                            }
                            Err(e) => error!("Failed to check notification state: {:?}", e),
                        }
                    }
                    .instrument(span)
                    .await;
                }
            }
            Err(e) => error!("Failed to scan overdue payments: {:?}", e),
        }
        sleep(POLL_INTERVAL).await;
    }
}
