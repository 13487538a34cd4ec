//! HTTP implementation of [`SearchGateway`] against the live regulation site.

use std::time::Duration;

use async_trait::async_trait;
use jdih_protocol::{DetailRecord, SearchParams, SearchResult};
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::SearchGateway;
use crate::parsers::{parse_detail, parse_search_results};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7";

const MAX_REDIRECTS: usize = 5;

/// Which page is being fetched; selects jitter and browser-like headers.
#[derive(Debug, Clone, Copy)]
enum PageKind {
    Search,
    Detail,
}

/// Client for the JDIH regulation site.
pub struct JdihGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl JdihGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn headers(&self, kind: PageKind) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(random_user_agent()));
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));

        let (fetch_site, referer) = match kind {
            PageKind::Search => ("none", format!("{}/", self.base_url())),
            PageKind::Detail => ("same-origin", self.config.search_url()),
        };
        headers.insert("sec-fetch-site", HeaderValue::from_static(fetch_site));
        if let Ok(value) = HeaderValue::from_str(&referer) {
            headers.insert(header::REFERER, value);
        }
        headers
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// One GET; any status outside 2xx/3xx is an error.
    async fn get_html(
        &self,
        url: &str,
        query: &[(&str, String)],
        kind: PageKind,
        timeout: Duration,
    ) -> GatewayResult<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .headers(self.headers(kind))
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "page fetched");
        Ok(body)
    }
}

#[async_trait]
impl SearchGateway for JdihGateway {
    async fn search(&self, params: &SearchParams) -> GatewayResult<Vec<SearchResult>> {
        let url = self.config.search_url();
        let query = search_query(params);
        tracing::info!(
            keyword = ?params.keyword,
            year = ?params.year,
            type_code = ?params.type_code,
            group_code = ?params.group_code,
            page = params.page,
            "searching regulations"
        );

        tokio::time::sleep(jitter(self.config.search_jitter_ms)).await;

        let first_timeout = Duration::from_secs(self.config.timeout_secs);
        let html = match self.get_html(&url, &query, PageKind::Search, first_timeout).await {
            Ok(html) => html,
            Err(e) if e.is_transient() => {
                tracing::warn!(error = %e, "search failed, retrying once after backoff");
                tokio::time::sleep(jitter(self.config.retry_backoff_ms)).await;
                let retry_timeout = Duration::from_secs(self.config.retry_timeout_secs);
                self.get_html(&url, &query, PageKind::Search, retry_timeout)
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, "search retry failed"))?
            }
            Err(e) => {
                tracing::error!(error = %e, "search failed");
                return Err(e);
            }
        };

        let results = parse_search_results(&html, &self.config.base_url);
        tracing::info!(count = results.len(), "search results parsed");
        Ok(results)
    }

    async fn fetch_detail(&self, url: &str) -> GatewayResult<Option<DetailRecord>> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GatewayError::InvalidUrl(url.to_string()));
        }
        tracing::info!(%url, "fetching regulation detail");

        tokio::time::sleep(jitter(self.config.detail_jitter_ms)).await;

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let html = self
            .get_html(url, &[], PageKind::Detail, timeout)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %url, "detail fetch failed"))?;

        Ok(parse_detail(&html, &self.config.base_url))
    }
}

/// Form-style query string the site's search page expects.
fn search_query(params: &SearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("PencarianPeraturanForm[kataKunci]", or_empty(&params.keyword)),
        ("PencarianPeraturanForm[nomorPeraturan]", or_empty(&params.number)),
        ("PencarianPeraturanForm[tahunPeraturan]", or_empty(&params.year)),
        ("PencarianPeraturanForm[jenisPeraturan]", or_empty(&params.type_code)),
        ("page", params.page.to_string()),
        ("per-page", params.per_page.to_string()),
    ];
    if let Some(group) = params.group_code.as_deref().filter(|g| !g.is_empty()) {
        query.push(("kelompok", group.to_string()));
    }
    query
}

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn random_user_agent() -> &'static str {
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Uniform delay in `[min, max]` milliseconds; a reversed range is clamped.
fn jitter([min, max]: [u64; 2]) -> Duration {
    let ms = if max <= min {
        min
    } else {
        rand::thread_rng().gen_range(min..=max)
    };
    Duration::from_millis(ms)
}
