use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{Duration, Utc};
use devmatch_backend::{
    api::router::create_router,
    config::Config,
    domain::models::auth::Claims,
    domain::ports::PaymentGateway,
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo, sqlite_developer_repo::SqliteDeveloperRepo,
        sqlite_notification_repo::SqliteNotificationRepo,
    },
    state::AppState,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockPaymentGateway {
    pub should_fail: bool,
    pub transfers: Mutex<Vec<(String, f64)>>,
}

#[allow(dead_code)]
impl MockPaymentGateway {
    pub fn new(should_fail: bool) -> Self {
        Self {
            should_fail,
            transfers: Mutex::new(Vec::new()),
        }
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn get_balance(&self, _address: &str) -> Result<f64, AppError> {
        Ok(250.0)
    }

    async fn estimate_and_send(&self, to_address: &str, amount: f64) -> Result<String, AppError> {
        if self.should_fail {
            return Err(AppError::PaymentFailed("insufficient funds".into()));
        }
        let mut transfers = self.transfers.lock().unwrap();
        transfers.push((to_address.to_string(), amount));
        Ok(format!("0xmocktx{:04}", transfers.len()))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub payments: Arc<MockPaymentGateway>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_options(false, true).await
    }

    pub async fn with_options(failing_payments: bool, allow_bypass: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_service_url: "http://localhost".to_string(),
            payment_service_token: "token".to_string(),
            video_base_url: "https://meet.test".to_string(),
            jwt_secret: "test-secret".to_string(),
            allow_payment_bypass: allow_bypass,
        };

        let payments = Arc::new(MockPaymentGateway::new(failing_payments));

        let state = Arc::new(AppState {
            config,
            developer_repo: Arc::new(SqliteDeveloperRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            notification_repo: Arc::new(SqliteNotificationRepo::new(pool.clone())),
            payment_gateway: payments.clone(),
            payment_inflight: Arc::new(Mutex::new(HashSet::new())),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            payments,
        }
    }

    pub fn auth_cookie(&self, user_id: &str, role: &str) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
            role: role.to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.state.config.jwt_secret.as_bytes()),
        )
        .expect("Failed to mint test token");
        format!("access_token={}", token)
    }

    /// Creates a profile available 09:00-17:00 every day of the week, so
    /// tests stay independent of which weekday they run on.
    pub async fn create_developer(&self, user_id: &str, hourly_rate: f64) -> Value {
        let day = json!({ "is_available": true, "slots": [{"start": "09:00", "end": "17:00"}] });
        let payload = json!({
            "display_name": "Dev",
            "headline": "Rust engineer",
            "hourly_rate": hourly_rate,
            "wallet_address": "0x00112233445566778899aabbccddeeff00112233",
            "availability": {
                "monday": day, "tuesday": day, "wednesday": day, "thursday": day,
                "friday": day, "saturday": day, "sunday": day
            }
        });

        let res = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/developers")
                    .header(header::COOKIE, self.auth_cookie(user_id, "developer"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            res.status().is_success(),
            "create_developer failed: {}",
            res.status()
        );
        parse_body(res).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn future_date(days: i64) -> String {
    (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
}
