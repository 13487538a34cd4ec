//! Search gateway abstraction: the bot core's only view of the remote site.

use async_trait::async_trait;
use jdih_protocol::{DetailRecord, SearchParams, SearchResult};

use crate::error::GatewayResult;

/// Performs parameterized searches and detail lookups against the remote source.
///
/// An empty result list and `Ok(None)` are valid "nothing found" answers, not
/// errors.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Run one search and return the hits in page order.
    async fn search(&self, params: &SearchParams) -> GatewayResult<Vec<SearchResult>>;

    /// Fetch and extract a detail page.
    async fn fetch_detail(&self, url: &str) -> GatewayResult<Option<DetailRecord>>;
}
