use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::platform::Platform;

/// One completed dispatch, recorded in the interaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// UUIDv7, so ids sort the same way as timestamps.
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub caller_id: String,
    pub platform: Platform,
    /// History label of the intent ("search", "tahun", "jenis", "kelompok", "detail").
    pub intent_kind: String,
    pub query: String,
    pub result_count: usize,
}

impl HistoryEntry {
    pub fn new(
        caller_id: impl Into<String>,
        platform: Platform,
        intent_kind: impl Into<String>,
        query: impl Into<String>,
        result_count: usize,
    ) -> Self {
        Self::at(
            Utc::now(),
            caller_id,
            platform,
            intent_kind,
            query,
            result_count,
        )
    }

    /// Build an entry with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Utc>,
        caller_id: impl Into<String>,
        platform: Platform,
        intent_kind: impl Into<String>,
        query: impl Into<String>,
        result_count: usize,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp,
            caller_id: caller_id.into(),
            platform,
            intent_kind: intent_kind.into(),
            query: query.into(),
            result_count,
        }
    }
}
