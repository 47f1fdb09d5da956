//! Discord webhook delivery for change notifications.
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::debug;

/// Embed title used for every outgoing notification.
pub const UPDATE_TITLE: &str = "New Activity Update";

#[derive(Clone)]
pub struct WebhookClient {
    http: Client,
    url: Url,
}

impl fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookClient").finish_non_exhaustive()
    }
}

/// Delivery seam for the watcher; mocked in tests.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, image_url: Option<&str>) -> Result<()>;
}

impl WebhookClient {
    pub fn new(url: Url) -> Self {
        let http = Client::builder()
            .user_agent("mbkm-watchbot/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self { http, url }
    }

    /// POST one embed to the webhook. Discord answers 204 on success; 200 is
    /// accepted too. Anything else is an error for the caller to log.
    pub async fn send(&self, message: &str, image_url: Option<&str>) -> Result<()> {
        let body = build_embed_request(UPDATE_TITLE, message, image_url);
        debug!(payload=%body, "sending webhook notification");
        let res = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .context("failed to reach webhook")?;

        match res.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = res.text().await.unwrap_or_default();
                Err(anyhow!("webhook error {}: {}", status, body))
            }
        }
    }
}

#[async_trait]
impl Notifier for WebhookClient {
    async fn notify(&self, message: &str, image_url: Option<&str>) -> Result<()> {
        self.send(message, image_url).await
    }
}

pub fn build_embed_request(title: &str, description: &str, image_url: Option<&str>) -> Value {
    let mut embed = Map::new();
    embed.insert("title".into(), json!(title));
    embed.insert("description".into(), json!(description));
    if let Some(url) = image_url.filter(|url| !url.is_empty()) {
        embed.insert("image".into(), json!({ "url": url }));
    }

    json!({ "embeds": [Value::Object(embed)] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_embed_request_includes_image() {
        let body = build_embed_request("title", "desc", Some("https://cdn/logo.png"));
        assert_eq!(body["embeds"][0]["title"], "title");
        assert_eq!(body["embeds"][0]["description"], "desc");
        assert_eq!(body["embeds"][0]["image"]["url"], "https://cdn/logo.png");
    }

    #[test]
    fn build_embed_request_omits_missing_image() {
        let body = build_embed_request("title", "desc", None);
        assert!(body["embeds"][0].get("image").is_none());

        let body = build_embed_request("title", "desc", Some(""));
        assert!(body["embeds"][0].get("image").is_none());
    }

    #[test]
    fn embed_payload_is_a_single_element_array() {
        let body = build_embed_request("t", "d", None);
        assert_eq!(body["embeds"].as_array().map(Vec::len), Some(1));
    }
}
