//! Mock audit sink for testing.
//!
//! Records every `AuditRecord` it receives. Dispatch hands records over on a
//! spawned task, so tests use [`MockAuditSink::wait_for`] before asserting.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{AuditError, AuditRecord, AuditResult, AuditSink};

pub struct MockAuditSink {
    records: Mutex<Vec<AuditRecord>>,
    fail: AtomicBool,
    durable: AtomicBool,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            durable: AtomicBool::new(true),
        }
    }

    /// Every `record` call is stored, then rejected.
    pub fn failing() -> Self {
        let sink = Self::new();
        sink.fail.store(true, Ordering::SeqCst);
        sink
    }

    pub fn set_durable(&self, durable: bool) {
        self.durable.store(durable, Ordering::SeqCst);
    }

    /// Get all received records.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Poll until at least `n` records arrived or `timeout` elapsed.
    pub async fn wait_for(&self, n: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.count() >= n {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl Default for MockAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for MockAuditSink {
    async fn record(&self, record: AuditRecord) -> AuditResult<()> {
        self.records.lock().unwrap().push(record);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AuditError::Other("mock audit failure".into()));
        }
        Ok(())
    }

    fn is_durable(&self) -> bool {
        self.durable.load(Ordering::SeqCst)
    }
}
