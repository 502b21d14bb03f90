use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values entered into a shared form, keyed by field id.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub form_id: String,
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
    #[serde(with = "timestamp")]
    pub submitted_at: DateTime<Utc>,
}
