// SPDX-License-Identifier: GPL-3.0-only

//! Provider transport: shoutrrr-style URIs mapped onto provider HTTPS APIs.
//!
//! Supported forms:
//! - `discord://<token>@<channel-webhook-id>`
//! - `telegram://<bot-token>@telegram?chats=<id>[,<id>...]`
//! - `gotify://<host>/<app-token>`
//!
//! The catalog is intentionally small; the scheme registry is the extension
//! point for further providers. Malformed or empty credentials fail before
//! any network call.

use async_trait::async_trait;
use reqwest::{Client, Url};

use drivewatch_contracts::NotificationTransport;
use drivewatch_types::{NotificationRequest, NotificationResult};

pub struct ProviderTransport {
    client: Client,
}

impl ProviderTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn post_json(
        &self,
        endpoint: &str,
        url: String,
        payload: serde_json::Value,
    ) -> NotificationResult {
        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                NotificationResult::success(endpoint)
            }
            Ok(response) => NotificationResult::failure(
                endpoint,
                format!("provider rejected the message: status {}", response.status()),
            ),
            Err(e) => NotificationResult::failure(endpoint, format!("provider request: {e}")),
        }
    }

    async fn send_discord(&self, request: &NotificationRequest, url: &Url) -> NotificationResult {
        let token = url.username();
        let channel = url.host_str().unwrap_or_default();
        if token.is_empty() || channel.is_empty() {
            return NotificationResult::failure(
                &request.endpoint,
                "discord endpoint needs discord://<token>@<channel>",
            );
        }
        let api = format!("https://discord.com/api/webhooks/{channel}/{token}");
        let payload = serde_json::json!({
            "content": format!("**{}**\n{}", request.subject, request.body),
        });
        self.post_json(&request.endpoint, api, payload).await
    }

    async fn send_telegram(&self, request: &NotificationRequest, url: &Url) -> NotificationResult {
        let token = url.username();
        let chats: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "chats")
            .flat_map(|(_, v)| {
                v.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        if token.is_empty() || chats.is_empty() {
            return NotificationResult::failure(
                &request.endpoint,
                "telegram endpoint needs telegram://<token>@telegram?chats=<id>",
            );
        }

        let api = format!("https://api.telegram.org/bot{token}/sendMessage");
        for chat in chats {
            let payload = serde_json::json!({
                "chat_id": chat,
                "text": format!("{}\n{}", request.subject, request.body),
            });
            let result = self
                .post_json(&request.endpoint, api.clone(), payload)
                .await;
            if !result.succeeded {
                return result;
            }
        }
        NotificationResult::success(&request.endpoint)
    }

    async fn send_gotify(&self, request: &NotificationRequest, url: &Url) -> NotificationResult {
        let host = url.host_str().unwrap_or_default();
        let token = url.path().trim_matches('/');
        if host.is_empty() || token.is_empty() {
            return NotificationResult::failure(
                &request.endpoint,
                "gotify endpoint needs gotify://<host>/<app-token>",
            );
        }
        let api = format!("https://{host}/message?token={token}");
        let payload = serde_json::json!({
            "title": request.subject,
            "message": request.body,
            "priority": 5,
        });
        self.post_json(&request.endpoint, api, payload).await
    }
}

#[async_trait]
impl NotificationTransport for ProviderTransport {
    fn schemes(&self) -> &'static [&'static str] {
        &["discord", "telegram", "gotify"]
    }

    async fn send(&self, request: &NotificationRequest) -> NotificationResult {
        let url = match Url::parse(&request.endpoint) {
            Ok(url) => url,
            Err(e) => {
                return NotificationResult::failure(
                    &request.endpoint,
                    format!("malformed provider endpoint: {e}"),
                );
            }
        };

        match url.scheme() {
            "discord" => self.send_discord(request, &url).await,
            "telegram" => self.send_telegram(request, &url).await,
            "gotify" => self.send_gotify(request, &url).await,
            other => NotificationResult::failure(
                &request.endpoint,
                format!("unknown provider: {other}"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(endpoint: &str) -> NotificationRequest {
        NotificationRequest {
            endpoint: endpoint.to_string(),
            subject: "test".to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn discord_without_token_fails_before_network() {
        let transport = ProviderTransport::new(Client::new());
        let result = transport.send(&request("discord://@channel123")).await;
        assert!(!result.succeeded);
        assert!(result.detail.unwrap().contains("discord://<token>@<channel>"));
    }

    #[tokio::test]
    async fn telegram_without_chats_fails_before_network() {
        let transport = ProviderTransport::new(Client::new());
        let result = transport.send(&request("telegram://token@telegram")).await;
        assert!(!result.succeeded);
        assert!(result.detail.unwrap().contains("chats"));
    }

    #[tokio::test]
    async fn gotify_without_token_fails_before_network() {
        let transport = ProviderTransport::new(Client::new());
        let result = transport.send(&request("gotify://push.example.com/")).await;
        assert!(!result.succeeded);
        assert!(result.detail.unwrap().contains("app-token"));
    }
}
