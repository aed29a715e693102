// SPDX-License-Identifier: GPL-3.0-only

//! Webhook transport: POST the message as JSON to an HTTP(S) endpoint.

use async_trait::async_trait;
use reqwest::Client;

use drivewatch_contracts::NotificationTransport;
use drivewatch_types::{NotificationRequest, NotificationResult};

pub struct WebhookTransport {
    client: Client,
}

impl WebhookTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationTransport for WebhookTransport {
    fn schemes(&self) -> &'static [&'static str] {
        &["http", "https"]
    }

    async fn send(&self, request: &NotificationRequest) -> NotificationResult {
        let payload = serde_json::json!({
            "subject": request.subject,
            "message": request.body,
        });

        let response = self
            .client
            .post(&request.endpoint)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                NotificationResult::success(&request.endpoint)
            }
            Ok(response) => NotificationResult::failure(
                &request.endpoint,
                format!("webhook returned status {}", response.status()),
            ),
            Err(e) => {
                NotificationResult::failure(&request.endpoint, format!("webhook request: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connection_refused_is_a_failure() {
        // Port 1 is never listening locally; no DNS involved.
        let transport = WebhookTransport::new(Client::new());
        let result = transport
            .send(&NotificationRequest {
                endpoint: "http://127.0.0.1:1/hook".to_string(),
                subject: "test".to_string(),
                body: "test".to_string(),
            })
            .await;

        assert!(!result.succeeded);
        assert!(result.detail.unwrap().contains("webhook request"));
    }
}
