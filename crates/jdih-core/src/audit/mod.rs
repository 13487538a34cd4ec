//! Audit sink: best-effort durable log of search and detail results.
//!
//! The dispatcher hands every successful, non-empty result to the sink on a
//! spawned task. Failures are logged and never reach the chat reply.

pub mod mock;
pub mod sheets;

use async_trait::async_trait;
use jdih_protocol::{DetailRecord, Platform, SearchResult};
use thiserror::Error;

pub use mock::MockAuditSink;
pub use sheets::{SheetsAuditSink, SheetsConfig, check_connection};

/// What gets persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditRecord {
    Search {
        results: Vec<SearchResult>,
        caller_id: String,
        /// History label of the intent ("search", "tahun", ...).
        kind: String,
        query: String,
        platform: Platform,
    },
    Detail {
        detail: DetailRecord,
        caller_id: String,
        platform: Platform,
    },
}

impl AuditRecord {
    pub fn caller_id(&self) -> &str {
        match self {
            AuditRecord::Search { caller_id, .. } | AuditRecord::Detail { caller_id, .. } => {
                caller_id
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit sink not configured")]
    NotConfigured,

    #[error("audit request failed: {0}")]
    Http(String),

    #[error("audit backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for AuditError {
    fn from(e: reqwest::Error) -> Self {
        AuditError::Http(e.to_string())
    }
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Destination for completed results.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> AuditResult<()>;

    /// Whether records actually end up somewhere durable right now.
    ///
    /// Replies mention persistence only when this is true.
    fn is_durable(&self) -> bool;
}

/// Sink used when no audit backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, record: AuditRecord) -> AuditResult<()> {
        tracing::debug!(caller_id = %record.caller_id(), "audit sink not configured, dropping record");
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_accepts_everything() {
        let sink = NoopAuditSink;
        let record = AuditRecord::Detail {
            detail: DetailRecord::default(),
            caller_id: "628".into(),
            platform: Platform::Whatsapp,
        };
        assert!(sink.record(record).await.is_ok());
        assert!(!sink.is_durable());
    }
}
