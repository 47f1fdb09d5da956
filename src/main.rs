use anyhow::{Context, Result};
use mbkm_watchbot::api::ActivityApi;
use mbkm_watchbot::config;
use mbkm_watchbot::watcher::{Watcher, DEFAULT_POLL_INTERVAL};
use mbkm_watchbot::webhook::WebhookClient;
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    // A missing .env file is fine when the variables are already exported.
    dotenvy::dotenv().ok();

    let cfg = match config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let webhook_url = Url::parse(&cfg.webhook_url).context("invalid DISCORD_WEBHOOK url")?;
    let api = ActivityApi::new(cfg.bearer_token.clone());
    let notifier = WebhookClient::new(webhook_url);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received; shutting down");
            signal_token.cancel();
        }
    });

    info!("starting activity watcher");
    let mut watcher = Watcher::new(api, notifier, DEFAULT_POLL_INTERVAL);
    watcher.run(shutdown).await;

    Ok(())
}
