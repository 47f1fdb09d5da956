//! The poll loop: fetch, diff, notify, sleep, repeat until cancelled.
use crate::api::ActivitySource;
use crate::detector::{detect_changes, StatusMap};
use crate::webhook::Notifier;
use anyhow::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub const STARTUP_MESSAGE: &str = "Your Bot is UP!";
pub const STARTUP_IMAGE_URL: &str = "https://example.com/default-image.png";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// One watching session: the activity source, the notifier, and the statuses
/// observed so far. State lives here rather than in globals so a cycle can be
/// driven directly in tests.
pub struct Watcher<S, N> {
    source: S,
    notifier: N,
    interval: Duration,
    statuses: StatusMap,
    startup_pending: bool,
}

impl<S: ActivitySource, N: Notifier> Watcher<S, N> {
    pub fn new(source: S, notifier: N, interval: Duration) -> Self {
        Self {
            source,
            notifier,
            interval,
            statuses: StatusMap::new(),
            startup_pending: true,
        }
    }

    /// Run cycles at a fixed interval until `shutdown` is cancelled. A failed
    /// cycle is logged and absorbed; the next tick is the retry.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("shutdown requested; stopping watcher");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.tick().await {
                        error!(?err, "poll cycle failed");
                    }
                }
            }
        }
    }

    /// One fetch-detect-notify cycle. The first cycle announces the bot is up
    /// before anything else; that announcement failing is not fatal.
    pub async fn tick(&mut self) -> Result<()> {
        if self.startup_pending {
            match self
                .notifier
                .notify(STARTUP_MESSAGE, Some(STARTUP_IMAGE_URL))
                .await
            {
                Ok(()) => info!("startup notification sent"),
                Err(err) => warn!(?err, "failed to send startup notification"),
            }
            self.startup_pending = false;
        }

        let payload = self.source.fetch_activities().await?;
        let delta = detect_changes(&payload, &mut self.statuses)?;
        if delta.is_empty() {
            return Ok(());
        }

        self.notifier
            .notify(&delta.message, delta.image_url.as_deref())
            .await?;
        info!("notification sent");
        Ok(())
    }
}
