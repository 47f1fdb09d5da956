//! Authenticated fetcher for the student activities endpoint.
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt;
use tracing::debug;

const API_BASE: &str = "https://api.kampusmerdeka.kemdikbud.go.id/";
const ACTIVITIES_PATH: &str = "mbkm/mahasiswa/activities/my";

#[derive(Clone)]
pub struct ActivityApi {
    http: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for ActivityApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Source of raw activity feed payloads. The watcher depends on this seam so
/// tests can drive it with canned payloads.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn fetch_activities(&self) -> Result<String>;
}

impl ActivityApi {
    pub fn new(token: String) -> Self {
        let base_url = Url::parse(API_BASE).expect("valid default API URL");
        Self::with_base_url(token, base_url)
    }

    pub fn with_base_url(token: String, base_url: Url) -> Self {
        let http = Client::builder()
            .user_agent("mbkm-watchbot/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            token,
        }
    }

    pub fn build_request(&self) -> Result<reqwest::Request> {
        let endpoint = self
            .base_url
            .join(ACTIVITIES_PATH)
            .context("invalid API base URL")?;
        self.http
            .get(endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .build()
            .context("failed to build activities request")
    }

    /// GET the activities feed and return the raw body text. No retry; a
    /// failed fetch is the caller's problem until the next poll.
    pub async fn fetch_activities(&self) -> Result<String> {
        let request = self.build_request()?;
        debug!(url=%request.url(), "fetching activities");
        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach activities API")?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("activities API error {}: {}", status, body));
        }

        res.text().await.context("failed to read activities body")
    }
}

#[async_trait]
impl ActivitySource for ActivityApi {
    async fn fetch_activities(&self) -> Result<String> {
        ActivityApi::fetch_activities(self).await
    }
}
