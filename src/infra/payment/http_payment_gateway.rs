use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// HTTP client against the payment-rail service. Balance reads and transfer
/// submissions only; wallet custody stays on the rail side.
pub struct HttpPaymentGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct TransferPayload {
    to_address: String,
    amount: f64,
}

#[derive(Deserialize)]
struct TransferResponse {
    transaction_hash: String,
}

#[derive(Deserialize)]
struct BalanceResponse {
    balance: f64,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn get_balance(&self, address: &str) -> Result<f64, AppError> {
        let url = format!("{}/balances/{}", self.api_url, address);
        let res = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Balance lookup failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: BalanceResponse = res
            .json()
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid balance response: {}", e)))?;
        Ok(body.balance)
    }

    async fn estimate_and_send(&self, to_address: &str, amount: f64) -> Result<String, AppError> {
        let payload = TransferPayload {
            to_address: to_address.to_string(),
            amount,
        };

        let res = self
            .client
            .post(format!("{}/transactions", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::PaymentFailed(format!("connection error: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Payment rail rejected transfer. Status: {}, Body: {}", status, text);
            return Err(AppError::PaymentFailed(text));
        }

        let body: TransferResponse = res
            .json()
            .await
            .map_err(|e| AppError::PaymentFailed(format!("invalid rail response: {}", e)))?;
        Ok(body.transaction_hash)
    }
}
