use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::models::Activity;

pub const SECRET_HEADER: &str = "x-webhook-secret";

#[derive(Debug, Clone)]
pub enum SendOutcome {
    Delivered { response: Value },
    Failed { error: String },
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

#[derive(Clone)]
pub struct ActivitySender {
    client: Client,
    endpoint: String,
    secret: String,
}

impl ActivitySender {
    pub fn new(endpoint: String, secret: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint,
            secret,
        }
    }

    // Delivery failures are reported as a value, never raised. No retries.
    pub async fn send(&self, activity: &Activity) -> SendOutcome {
        match self
            .client
            .post(&self.endpoint)
            .header(SECRET_HEADER, &self.secret)
            .json(activity)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                let body = response.json::<Value>().await.unwrap_or(Value::Null);
                info!("Activity sent to webhook successfully");
                SendOutcome::Delivered { response: body }
            }
            Ok(response) => {
                warn!(
                    "Activity webhook failed with status {}: {}",
                    response.status(),
                    self.endpoint
                );
                SendOutcome::Failed {
                    error: format!("Webhook request failed with status {}", response.status()),
                }
            }
            Err(err) => {
                error!("Error sending activity to webhook: {}", err);
                SendOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}
