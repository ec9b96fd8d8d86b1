mod common;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use common::TestApp;
use devmatch_backend::domain::models::booking::{
    Booking, BookingMode, PAYMENT_COMPLETED, PAYMENT_PENDING, STATUS_CANCELLED, STATUS_COMPLETED,
};
use devmatch_backend::domain::models::developer::{
    DayAvailability, DeveloperProfile, NewDeveloperParams, TimeRange, WeeklyAvailability,
};
use devmatch_backend::domain::models::notification::{self, Notification};
use devmatch_backend::domain::ports::BookingRepository;
use devmatch_backend::domain::services::booking_flow::{submit_booking, BookingSubmission};
use devmatch_backend::error::AppError;
use devmatch_backend::infra::repositories::sqlite_booking_repo::SqliteBookingRepo;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

const CLIENT_WALLET: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const DEV_WALLET: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

async fn seed_developer(app: &TestApp, wallet: Option<&str>) -> DeveloperProfile {
    let day = DayAvailability {
        is_available: true,
        slots: vec![TimeRange {
            start: "09:00".to_string(),
            end: "17:00".to_string(),
        }],
    };
    let availability = WeeklyAvailability {
        monday: Some(day.clone()),
        tuesday: Some(day.clone()),
        wednesday: Some(day.clone()),
        thursday: Some(day.clone()),
        friday: Some(day.clone()),
        saturday: Some(day.clone()),
        sunday: Some(day),
    };
    let profile = DeveloperProfile::new(NewDeveloperParams {
        user_id: "dev-user".to_string(),
        display_name: "Dev".to_string(),
        headline: "Rust engineer".to_string(),
        bio: String::new(),
        skills: "rust,axum".to_string(),
        hourly_rate: 50.0,
        wallet_address: wallet.map(String::from),
        avatar_url: String::new(),
        availability,
    });
    app.state.developer_repo.create(&profile).await.unwrap()
}

fn submission(developer_id: &str, date: NaiveDate, hour: u32, mode: BookingMode) -> BookingSubmission {
    BookingSubmission {
        client_id: "client-1".to_string(),
        developer_id: developer_id.to_string(),
        date,
        start: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        duration_hours: 1,
        mode,
        terms_accepted: true,
        client_wallet: Some(CLIENT_WALLET.to_string()),
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, 15).unwrap()
}

/// 14:56 on the booking day, four minutes before a 15:00 session.
fn just_before_three() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 6, 15, 14, 56, 0).unwrap()
}

/// The day before the booking day.
fn day_before() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 6, 14, 10, 0, 0).unwrap()
}

#[tokio::test]
async fn immediate_booking_pays_and_surfaces_session() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let outcome = submit_booking(
        &app.state,
        submission(&dev.id, date(), 15, BookingMode::Normal),
        just_before_three(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.booking.payment_status, PAYMENT_COMPLETED);
    assert!(outcome.booking.transaction_hash.is_some());
    assert!(outcome.booking.payment_due.is_none());
    assert!(!outcome.booking.is_test_booking);

    let session = outcome.session.expect("session should be surfaced");
    assert_eq!(session.room_id, outcome.booking.room_id);
    assert!(session.join_url.ends_with(&outcome.booking.room_id));

    let transfers = app.payments.transfers.lock().unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0], (DEV_WALLET.to_string(), 50.0));
    drop(transfers);

    let notes = app
        .state
        .notification_repo
        .list_by_developer(&dev.id)
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, notification::KIND_SESSION_STARTED);
    assert_eq!(notes[0].booking_id, outcome.booking.id);

    // The in-flight marker is released once the submission settles.
    assert!(app.state.payment_inflight.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_payment_aborts_without_persisting() {
    let app = TestApp::with_options(true, true).await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let err = submit_booking(
        &app.state,
        submission(&dev.id, date(), 15, BookingMode::Normal),
        just_before_three(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::PaymentFailed(_)));
    let bookings = app
        .state
        .booking_repo
        .list_by_client("client-1")
        .await
        .unwrap();
    assert!(bookings.is_empty());
    assert!(app.state.payment_inflight.lock().unwrap().is_empty());
}

#[tokio::test]
async fn immediate_booking_requires_client_wallet() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let mut sub = submission(&dev.id, date(), 15, BookingMode::Normal);
    sub.client_wallet = None;

    let err = submit_booking(&app.state, sub, just_before_three())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(app.payments.transfer_count(), 0);
}

#[tokio::test]
async fn immediate_booking_requires_developer_wallet() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, None).await;

    let err = submit_booking(
        &app.state,
        submission(&dev.id, date(), 15, BookingMode::Normal),
        just_before_three(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn concurrent_payment_for_same_client_is_rejected() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    app.state
        .payment_inflight
        .lock()
        .unwrap()
        .insert("client-1".to_string());

    let err = submit_booking(
        &app.state,
        submission(&dev.id, date(), 15, BookingMode::Normal),
        just_before_three(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(app.payments.transfer_count(), 0);
    // The pre-existing marker is still owned by the other submission.
    assert!(app
        .state
        .payment_inflight
        .lock()
        .unwrap()
        .contains("client-1"));
}

#[tokio::test]
async fn future_booking_defers_payment() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let mut sub = submission(&dev.id, date(), 10, BookingMode::Normal);
    sub.client_wallet = None;

    let outcome = submit_booking(&app.state, sub, day_before()).await.unwrap();

    assert_eq!(outcome.booking.payment_status, PAYMENT_PENDING);
    assert_eq!(outcome.booking.payment_due, Some(outcome.booking.session_start));
    assert!(outcome.booking.transaction_hash.is_none());
    assert!(outcome.session.is_none());
    assert_eq!(app.payments.transfer_count(), 0);

    let notes = app
        .state
        .notification_repo
        .list_by_developer(&dev.id)
        .await
        .unwrap();
    assert!(notes.is_empty());
}

#[tokio::test]
async fn test_mode_completes_without_payment_and_surfaces_session() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, None).await;

    let mut sub = submission(&dev.id, date(), 10, BookingMode::Test);
    sub.client_wallet = None;

    let outcome = submit_booking(&app.state, sub, day_before()).await.unwrap();

    assert_eq!(outcome.booking.payment_status, PAYMENT_COMPLETED);
    assert!(outcome.booking.is_test_booking);
    assert!(outcome.session.is_some());
    assert_eq!(app.payments.transfer_count(), 0);
}

#[tokio::test]
async fn bypass_mode_completes_without_payment() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, None).await;

    let outcome = submit_booking(
        &app.state,
        submission(&dev.id, date(), 10, BookingMode::Bypass),
        day_before(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.booking.payment_status, PAYMENT_COMPLETED);
    assert!(!outcome.booking.is_test_booking);
    assert!(outcome.session.is_none());
    assert_eq!(app.payments.transfer_count(), 0);
}

#[tokio::test]
async fn bypass_mode_requires_opt_in() {
    let app = TestApp::with_options(false, false).await;
    let dev = seed_developer(&app, None).await;

    let err = submit_booking(
        &app.state,
        submission(&dev.id, date(), 10, BookingMode::Bypass),
        day_before(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn terms_must_be_accepted() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let mut sub = submission(&dev.id, date(), 10, BookingMode::Normal);
    sub.terms_accepted = false;

    let err = submit_booking(&app.state, sub, day_before()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn duration_out_of_range_is_rejected() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    for duration in [0u32, 5] {
        let mut sub = submission(&dev.id, date(), 10, BookingMode::Normal);
        sub.duration_hours = duration;
        let err = submit_booking(&app.state, sub, day_before()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "duration {}", duration);
    }
}

#[tokio::test]
async fn taken_slot_is_rejected() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    submit_booking(
        &app.state,
        submission(&dev.id, date(), 10, BookingMode::Bypass),
        day_before(),
    )
    .await
    .unwrap();

    let mut second = submission(&dev.id, date(), 10, BookingMode::Bypass);
    second.client_id = "client-2".to_string();

    let err = submit_booking(&app.state, second, day_before()).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn adjacent_slot_still_books() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    submit_booking(
        &app.state,
        submission(&dev.id, date(), 10, BookingMode::Bypass),
        day_before(),
    )
    .await
    .unwrap();

    // 11:00 starts exactly where the 10:00-11:00 booking ends.
    let mut second = submission(&dev.id, date(), 11, BookingMode::Bypass);
    second.client_id = "client-2".to_string();
    let outcome = submit_booking(&app.state, second, day_before()).await.unwrap();
    assert_eq!(outcome.booking.session_start.time(), NaiveTime::from_hms_opt(11, 0, 0).unwrap());
}

#[tokio::test]
async fn unknown_developer_is_not_found() {
    let app = TestApp::new().await;
    let err = submit_booking(
        &app.state,
        submission("missing", date(), 10, BookingMode::Normal),
        day_before(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

/// Delegating repository that checks the client's in-flight payment marker
/// is still set while the booking row is being written.
struct InflightAssertingRepo {
    inner: SqliteBookingRepo,
    inflight: Arc<Mutex<HashSet<String>>>,
}

#[async_trait]
impl BookingRepository for InflightAssertingRepo {
    async fn create(
        &self,
        booking: &Booking,
        notifications: Vec<Notification>,
    ) -> Result<Booking, AppError> {
        assert!(
            self.inflight.lock().unwrap().contains(&booking.client_id),
            "payment marker released before persistence"
        );
        self.inner.create(booking, notifications).await
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        self.inner.find_by_id(id).await
    }
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Booking>, AppError> {
        self.inner.list_by_client(client_id).await
    }
    async fn list_by_developer(&self, developer_id: &str) -> Result<Vec<Booking>, AppError> {
        self.inner.list_by_developer(developer_id).await
    }
    async fn list_by_range(
        &self,
        developer_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        self.inner.list_by_range(developer_id, start, end).await
    }
    async fn update_status(&self, id: &str, status: &str) -> Result<Booking, AppError> {
        self.inner.update_status(id, status).await
    }
    async fn find_payment_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        self.inner.find_payment_overdue(now).await
    }
}

#[tokio::test]
async fn payment_marker_held_through_persistence() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let mut state = (*app.state).clone();
    state.booking_repo = Arc::new(InflightAssertingRepo {
        inner: SqliteBookingRepo::new(app.pool.clone()),
        inflight: state.payment_inflight.clone(),
    });

    let outcome = submit_booking(
        &state,
        submission(&dev.id, date(), 15, BookingMode::Normal),
        just_before_three(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.booking.payment_status, PAYMENT_COMPLETED);
    assert!(state.payment_inflight.lock().unwrap().is_empty());
}

#[tokio::test]
async fn status_transition_is_guarded_in_the_store() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let outcome = submit_booking(
        &app.state,
        submission(&dev.id, date(), 10, BookingMode::Bypass),
        day_before(),
    )
    .await
    .unwrap();

    let completed = app
        .state
        .booking_repo
        .update_status(&outcome.booking.id, STATUS_COMPLETED)
        .await
        .unwrap();
    assert_eq!(completed.status, STATUS_COMPLETED);

    // A second transition races past any handler-level check; the store
    // itself must refuse to move a terminal row.
    let err = app
        .state
        .booking_repo
        .update_status(&outcome.booking.id, STATUS_CANCELLED)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let unchanged = app
        .state
        .booking_repo
        .find_by_id(&outcome.booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, STATUS_COMPLETED);
}

#[tokio::test]
async fn total_cost_scales_with_duration() {
    let app = TestApp::new().await;
    let dev = seed_developer(&app, Some(DEV_WALLET)).await;

    let mut sub = submission(&dev.id, date(), 10, BookingMode::Bypass);
    sub.duration_hours = 3;

    let outcome = submit_booking(&app.state, sub, day_before()).await.unwrap();
    assert_eq!(outcome.booking.total_cost, 150.0);
    assert_eq!(outcome.booking.duration_hours, 3);
    let expected_end = outcome.booking.session_start + chrono::Duration::hours(3);
    assert_eq!(outcome.booking.session_end, expected_end);
}
