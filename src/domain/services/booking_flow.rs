use crate::domain::models::booking::{
    BookedSlot, Booking, BookingMode, NewBookingParams, PAYMENT_COMPLETED, PAYMENT_PENDING,
};
use crate::domain::models::developer::DeveloperProfile;
use crate::domain::models::notification::{self, Notification};
use crate::domain::services::scheduling::{
    compute_available_slots, CandidateSlot, MAX_DURATION_HOURS, MIN_DURATION_HOURS,
};
use crate::domain::services::session_window::{is_joinable, PRE_BOOKING_WINDOW};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{info, warn};

pub struct BookingSubmission {
    pub client_id: String,
    pub developer_id: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub duration_hours: u32,
    pub mode: BookingMode,
    pub terms_accepted: bool,
    pub client_wallet: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct LiveSession {
    pub room_id: String,
    pub join_url: String,
}

#[derive(Debug)]
pub struct BookingOutcome {
    pub booking: Booking,
    /// Present when the session is immediately joinable; absent for a
    /// deferred confirmation.
    pub session: Option<LiveSession>,
}

/// Releases the in-flight payment marker for a client when the submission
/// settles, whichever way it settles.
struct PaymentSlot<'a> {
    inflight: &'a Mutex<HashSet<String>>,
    client_id: String,
}

impl<'a> PaymentSlot<'a> {
    fn try_acquire(
        inflight: &'a Mutex<HashSet<String>>,
        client_id: &str,
    ) -> Result<Self, AppError> {
        let mut set = inflight
            .lock()
            .map_err(|_| AppError::InternalWithMsg("payment lock poisoned".into()))?;
        if !set.insert(client_id.to_string()) {
            return Err(AppError::Conflict(
                "A payment is already in progress for this account".into(),
            ));
        }
        Ok(Self {
            inflight,
            client_id: client_id.to_string(),
        })
    }
}

impl Drop for PaymentSlot<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.inflight.lock() {
            set.remove(&self.client_id);
        }
    }
}

/// Creates a booking per the payment decision table: test/bypass bookings
/// complete without touching the rail, a session starting now is paid
/// synchronously before anything is persisted, and a future session defers
/// payment to its start time. Persistence failures are surfaced to the
/// caller; no retry is attempted here.
pub async fn submit_booking(
    state: &AppState,
    submission: BookingSubmission,
    now: DateTime<Utc>,
) -> Result<BookingOutcome, AppError> {
    if !submission.terms_accepted {
        return Err(AppError::Validation("Terms must be accepted".into()));
    }
    if submission.duration_hours < MIN_DURATION_HOURS
        || submission.duration_hours > MAX_DURATION_HOURS
    {
        return Err(AppError::Validation(format!(
            "Duration must be between {} and {} hours",
            MIN_DURATION_HOURS, MAX_DURATION_HOURS
        )));
    }
    if submission.mode == BookingMode::Bypass && !state.config.allow_payment_bypass {
        return Err(AppError::Validation("Payment bypass is not enabled".into()));
    }

    let developer = state
        .developer_repo
        .find_by_id(&submission.developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;

    // Fresh bookings read, then slot computation. The selected slot must
    // still be offered at submission time.
    let requested = verify_slot_available(state, &developer, &submission, now).await?;

    let session_start = submission.date.and_time(requested.start).and_utc();
    let session_end = session_start + Duration::hours(submission.duration_hours as i64);
    let starts_now = is_joinable(session_start, session_end, now, PRE_BOOKING_WINDOW);

    let total_cost = developer.hourly_rate * submission.duration_hours as f64;

    // Held until the submission settles, so persistence is covered too.
    let mut payment_guard = None;

    let (payment_status, transaction_hash, payment_due) = match submission.mode {
        BookingMode::Test | BookingMode::Bypass => (PAYMENT_COMPLETED.to_string(), None, None),
        BookingMode::Normal if starts_now => {
            if submission.client_wallet.is_none() {
                return Err(AppError::Validation(
                    "Wallet must be connected to pay for a session starting now".into(),
                ));
            }
            let payout_address = developer.wallet_address.clone().ok_or_else(|| {
                AppError::Validation("Developer has no wallet address on file".into())
            })?;

            payment_guard = Some(PaymentSlot::try_acquire(
                &state.payment_inflight,
                &submission.client_id,
            )?);

            let tx_hash = state
                .payment_gateway
                .estimate_and_send(&payout_address, total_cost)
                .await
                .map_err(|e| {
                    warn!("Payment rejected for client {}: {}", submission.client_id, e);
                    match e {
                        AppError::PaymentFailed(msg) => AppError::PaymentFailed(msg),
                        other => AppError::PaymentFailed(other.to_string()),
                    }
                })?;
            (PAYMENT_COMPLETED.to_string(), Some(tx_hash), None)
        }
        BookingMode::Normal => (
            PAYMENT_PENDING.to_string(),
            None,
            Some(session_start),
        ),
    };

    let booking = Booking::new(NewBookingParams {
        client_id: submission.client_id.clone(),
        developer_id: submission.developer_id.clone(),
        date: submission.date,
        start: requested.start,
        duration_hours: submission.duration_hours,
        total_cost,
        payment_status,
        transaction_hash,
        is_test_booking: submission.mode == BookingMode::Test,
        payment_due,
        now,
    });

    let surface_session = submission.mode == BookingMode::Test || starts_now;

    let notifications = if surface_session {
        vec![Notification::new(
            developer.id.clone(),
            booking.id.clone(),
            notification::KIND_SESSION_STARTED,
            format!(
                "Session {} is starting now in room {}",
                booking.id, booking.room_id
            ),
        )]
    } else {
        Vec::new()
    };

    let created = state.booking_repo.create(&booking, notifications).await?;
    drop(payment_guard);
    info!(
        "Booking {} created for developer {} ({})",
        created.id, created.developer_id, created.payment_status
    );

    let session = surface_session.then(|| LiveSession {
        room_id: created.room_id.clone(),
        join_url: format!("{}/{}", state.config.video_base_url, created.room_id),
    });

    Ok(BookingOutcome {
        booking: created,
        session,
    })
}

async fn verify_slot_available(
    state: &AppState,
    developer: &DeveloperProfile,
    submission: &BookingSubmission,
    now: DateTime<Utc>,
) -> Result<CandidateSlot, AppError> {
    let day_start = submission.date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let day_end = submission.date.and_hms_opt(23, 59, 59).unwrap().and_utc();

    let existing = state
        .booking_repo
        .list_by_range(&developer.id, day_start, day_end)
        .await?;
    let booked: Vec<BookedSlot> = existing.iter().map(BookedSlot::from_booking).collect();

    let template = developer.availability();
    let day = template
        .for_weekday(chrono::Datelike::weekday(&submission.date))
        .cloned()
        .unwrap_or_default();

    let candidates =
        compute_available_slots(submission.date, &day, submission.duration_hours, &booked, now);

    candidates
        .into_iter()
        .find(|c| c.start == submission.start)
        .ok_or_else(|| {
            warn!(
                "Booking rejected: slot {} on {} not available",
                submission.start, submission.date
            );
            AppError::Conflict("Selected time slot is not available".into())
        })
}
