use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub payment_service_url: String,
    pub payment_service_token: String,
    pub video_base_url: String,
    pub jwt_secret: String,
    /// Explicit payment bypass, for environments without a payment rail.
    pub allow_payment_bypass: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            payment_service_url: env::var("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8545/api/v1".to_string()),
            payment_service_token: env::var("PAYMENT_SERVICE_TOKEN")
                .unwrap_or_else(|_| "test-token-1".to_string()),
            video_base_url: env::var("VIDEO_BASE_URL")
                .unwrap_or_else(|_| "https://meet.devmatch.io".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            allow_payment_bypass: env::var("ALLOW_PAYMENT_BYPASS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
