use serde::{Deserialize, Serialize};

/// Access-token claims. Token issuance lives with the identity provider;
/// this service only verifies and reads.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,

    #[serde(rename = "https://devmatch.io/claims/role")]
    pub role: String,
}

/// The signed-in identity attached to a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: String,
}
