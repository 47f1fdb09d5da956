//! Watches the Kampus Merdeka student activities API and forwards status
//! transitions to a Discord webhook.

pub mod api;
pub mod config;
pub mod detector;
pub mod watcher;
pub mod webhook;
