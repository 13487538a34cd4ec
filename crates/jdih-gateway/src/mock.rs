//! Mock search gateway for testing without the live site.
//!
//! Returns canned results and records every call for assertion in tests.

use async_trait::async_trait;
use jdih_protocol::{DetailRecord, SearchParams, SearchResult};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::SearchGateway;

/// Mock implementation of the `SearchGateway` trait.
///
/// Thread-safe via `Mutex` (fine for test contexts).
pub struct MockGateway {
    results: Mutex<Vec<SearchResult>>,
    detail: Mutex<Option<DetailRecord>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Duration>,
    search_calls: Mutex<Vec<SearchParams>>,
    detail_calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            detail: Mutex::new(None),
            failure: Mutex::new(None),
            delay: Mutex::new(Duration::ZERO),
            search_calls: Mutex::new(Vec::new()),
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    /// Every search returns `results`.
    pub fn with_results(self, results: Vec<SearchResult>) -> Self {
        self.set_results(results);
        self
    }

    /// Every detail fetch returns `detail`.
    pub fn with_detail(self, detail: DetailRecord) -> Self {
        *self.detail.lock().unwrap() = Some(detail);
        self
    }

    /// Every call fails with `GatewayError::Other(message)`.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(message.into());
        self
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn set_results(&self, results: Vec<SearchResult>) {
        *self.results.lock().unwrap() = results;
    }

    /// Get all search parameters received, in call order.
    pub fn search_calls(&self) -> Vec<SearchParams> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Get all detail URLs received, in call order.
    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    /// Total calls of either kind.
    pub fn call_count(&self) -> usize {
        self.search_calls.lock().unwrap().len() + self.detail_calls.lock().unwrap().len()
    }

    async fn pause_and_check(&self) -> GatewayResult<()> {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(GatewayError::Other(message)),
            None => Ok(()),
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchGateway for MockGateway {
    async fn search(&self, params: &SearchParams) -> GatewayResult<Vec<SearchResult>> {
        self.search_calls.lock().unwrap().push(params.clone());
        self.pause_and_check().await?;
        Ok(self.results.lock().unwrap().clone())
    }

    async fn fetch_detail(&self, url: &str) -> GatewayResult<Option<DetailRecord>> {
        self.detail_calls.lock().unwrap().push(url.to_string());
        self.pause_and_check().await?;
        Ok(self.detail.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str) -> SearchResult {
        SearchResult {
            title: title.into(),
            ..SearchResult::default()
        }
    }

    #[tokio::test]
    async fn returns_canned_results_and_records_params() {
        let mock = MockGateway::new().with_results(vec![result("a"), result("b")]);
        let found = mock.search(&SearchParams::keyword("kapal")).await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(mock.search_calls(), vec![SearchParams::keyword("kapal")]);
        assert!(mock.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn detail_defaults_to_none() {
        let mock = MockGateway::new();
        assert!(mock.fetch_detail("https://x/1").await.unwrap().is_none());
        assert_eq!(mock.detail_calls(), vec!["https://x/1".to_string()]);
    }

    #[tokio::test]
    async fn failing_mode_errors_but_still_records() {
        let mock = MockGateway::new().failing("site down");
        let err = mock.search(&SearchParams::year("2024")).await.unwrap_err();

        assert_eq!(err.to_string(), "site down");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let mock = MockGateway::new().with_delay(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        mock.search(&SearchParams::keyword("x")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
