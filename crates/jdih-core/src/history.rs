//! In-memory interaction history.
//!
//! Append-only for the life of the process (until an admin clears it). The
//! timestamp is taken while the write lock is held, so insertion order is
//! also chronological order across concurrent dispatches.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use jdih_protocol::{HistoryEntry, Platform, StatusSnapshot};
use tokio::sync::RwLock;

/// Shared, cloneable handle to the interaction log.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, entry: HistoryEntry) {
        self.entries.write().await.push(entry);
    }

    /// Stamp and append an entry, returning a copy of it.
    pub async fn record(
        &self,
        caller_id: &str,
        platform: Platform,
        kind: &str,
        query: &str,
        result_count: usize,
    ) -> HistoryEntry {
        let mut entries = self.entries.write().await;
        let entry = HistoryEntry::new(caller_id, platform, kind, query, result_count);
        entries.push(entry.clone());
        entry
    }

    /// Snapshot of every entry, oldest first.
    pub async fn all(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    /// The last `n` entries, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        let entries = self.entries.read().await;
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn distinct_callers(&self) -> usize {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| e.caller_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Entries whose calendar day, in `offset`, matches that of `now`.
    pub async fn today_count(&self, offset: FixedOffset, now: DateTime<Utc>) -> usize {
        let today = now.with_timezone(&offset).date_naive();
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.timestamp.with_timezone(&offset).date_naive() == today)
            .count()
    }

    /// Usage numbers computed from the current contents.
    pub async fn status(
        &self,
        started_at: DateTime<Utc>,
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> StatusSnapshot {
        StatusSnapshot {
            total_searches: self.len().await,
            total_users: self.distinct_callers().await,
            today_searches: self.today_count(offset, now).await,
            uptime_seconds: (now - started_at).num_seconds().max(0) as u64,
        }
    }
}

/// Fixed offset for `hours` east of UTC; out-of-range values fall back to UTC.
pub fn offset_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.saturating_mul(3600)).unwrap_or(Utc.fix())
}
