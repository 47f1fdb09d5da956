//! Status-transition detection over raw activity feed payloads.
//!
//! The feed is polled, not subscribed to, so "something changed" is decided
//! here: each activity's current status is compared against the last one seen
//! for that id, and only transitions produce notification text.
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Terminal status; such activities are never reported and never recorded.
pub const PROCESSED: &str = "PROCESSED";

/// Last observed status per activity id. Process-lifetime only; resets empty
/// on every start.
pub type StatusMap = HashMap<i64, String>;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no `data` array")]
    MissingData,
}

/// One activity record as served by the upstream feed. Fields beyond `id` and
/// `status` are optional; heterogeneous records are common.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub status: String,
    #[serde(default)]
    pub nama_kegiatan: Option<String>,
    #[serde(default)]
    pub mitra_brand_name: Option<String>,
    #[serde(default)]
    pub mitra_logo: Option<String>,
}

/// Accumulated result of one detection pass. An empty `message` means no
/// activity changed status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    pub message: String,
    pub image_url: Option<String>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

/// Walk the feed payload, diff each record against `statuses`, and build the
/// notification text for every transition found.
///
/// Records that fail to decode are skipped silently. When several activities
/// change in one pass, the last record's logo wins as the attached image.
pub fn detect_changes(payload: &str, statuses: &mut StatusMap) -> Result<Delta, FormatError> {
    let payload: Value = serde_json::from_str(payload)?;
    let records = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingData)?;

    let mut delta = Delta::default();
    for record in records {
        let activity: Activity = match serde_json::from_value(record.clone()) {
            Ok(activity) => activity,
            Err(_) => continue,
        };

        if activity.status == PROCESSED {
            continue;
        }
        if statuses.get(&activity.id) == Some(&activity.status) {
            continue;
        }

        delta.message.push_str(&format!(
            "**Activity:** {}\n",
            activity.nama_kegiatan.as_deref().unwrap_or_default()
        ));
        delta.message.push_str(&format!(
            "**Partner:** {}\n",
            activity.mitra_brand_name.as_deref().unwrap_or_default()
        ));
        delta
            .message
            .push_str(&format!("**Status:** {}\n", activity.status));
        if let Some(logo) = activity.mitra_logo {
            delta.image_url = Some(logo);
        }
        statuses.insert(activity.id, activity.status);
    }

    Ok(delta)
}
