//! Google Sheets audit sink (values `append` REST call).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jdih_protocol::{DetailRecord, Platform, SearchResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::watch;

use super::{AuditError, AuditRecord, AuditResult, AuditSink};
use crate::history::offset_hours;

const SEARCH_RANGE: &str = "Sheet1!A:M";
const DETAIL_RANGE: &str = "DetailPeraturan!A:Z";

/// Spreadsheet target and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// OAuth bearer token with the spreadsheets scope.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Offset used for the timestamp column.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_utc_offset_hours() -> i32 {
    7
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            access_token: None,
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl SheetsConfig {
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.spreadsheet_id) && present(&self.access_token)
    }

    fn append_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=RAW",
            self.api_base.trim_end_matches('/'),
            spreadsheet_id,
            range
        )
    }

    fn first_cell_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/A1",
            self.api_base.trim_end_matches('/'),
            spreadsheet_id
        )
    }
}

/// Read cell `A1` to confirm the spreadsheet id and token are accepted.
pub async fn check_connection(config: &SheetsConfig) -> AuditResult<()> {
    if !config.is_configured() {
        return Err(AuditError::NotConfigured);
    }
    let (Some(id), Some(token)) = (&config.spreadsheet_id, &config.access_token) else {
        return Err(AuditError::NotConfigured);
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AuditError::Other(format!("failed to build HTTP client: {e}")))?;
    let response = client
        .get(config.first_cell_url(id))
        .bearer_auth(token)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuditError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}

/// Appends one row per search result, or one row per detail, to a spreadsheet.
///
/// Reads its settings from a watch channel, so credentials saved through the
/// admin API apply to the next record.
pub struct SheetsAuditSink {
    client: reqwest::Client,
    config: watch::Receiver<SheetsConfig>,
}

impl SheetsAuditSink {
    pub fn new(config: watch::Receiver<SheetsConfig>) -> AuditResult<Self> {
        let timeout = Duration::from_secs(config.borrow().timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuditError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn append(&self, config: &SheetsConfig, range: &str, rows: Vec<Vec<Value>>) -> AuditResult<()> {
        let (Some(id), Some(token)) = (&config.spreadsheet_id, &config.access_token) else {
            return Err(AuditError::NotConfigured);
        };

        let row_count = rows.len();
        let response = self
            .client
            .post(config.append_url(id, range))
            .bearer_auth(token)
            .json(&json!({ "values": rows }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(range, rows = row_count, "saved rows to Google Sheets");
        Ok(())
    }
}

#[async_trait]
impl AuditSink for SheetsAuditSink {
    async fn record(&self, record: AuditRecord) -> AuditResult<()> {
        let config = self.config.borrow().clone();
        if !config.is_configured() {
            return Err(AuditError::NotConfigured);
        }

        let timestamp = Utc::now()
            .with_timezone(&offset_hours(config.utc_offset_hours))
            .format("%d/%m/%Y, %H.%M.%S")
            .to_string();

        match record {
            AuditRecord::Search {
                results,
                caller_id,
                kind,
                query,
                platform,
            } => {
                let rows = search_rows(&results, &timestamp, &caller_id, platform, &kind, &query);
                self.append(&config, SEARCH_RANGE, rows).await
            }
            AuditRecord::Detail {
                detail,
                caller_id,
                platform,
            } => {
                let row = detail_row(&detail, &timestamp, &caller_id, platform);
                self.append(&config, DETAIL_RANGE, vec![row]).await
            }
        }
    }

    fn is_durable(&self) -> bool {
        self.config.borrow().is_configured()
    }
}

/// 13 columns: timestamp, caller, platform, kind, query, result count, title,
/// regulation number, year, status, date, views, link.
fn search_rows(
    results: &[SearchResult],
    timestamp: &str,
    caller_id: &str,
    platform: Platform,
    kind: &str,
    query: &str,
) -> Vec<Vec<Value>> {
    results
        .iter()
        .map(|r| {
            vec![
                json!(timestamp),
                json!(caller_id),
                json!(platform.as_str()),
                json!(kind),
                json!(query),
                json!(results.len()),
                json!(r.title),
                json!(r.regulation_number),
                json!(r.year),
                json!(r.status),
                json!(r.published_date),
                json!(r.view_count),
                json!(r.detail_link),
            ]
        })
        .collect()
}

/// 26 columns covering every detail field.
fn detail_row(detail: &DetailRecord, timestamp: &str, caller_id: &str, platform: Platform) -> Vec<Value> {
    let text = |v: &Option<String>| json!(v.as_deref().unwrap_or(""));
    let count = |v: &Option<String>| json!(v.as_deref().unwrap_or("0"));
    vec![
        json!(timestamp),
        json!(caller_id),
        json!(platform.as_str()),
        json!("detail"),
        text(&detail.title),
        json!(1),
        text(&detail.title),
        text(&detail.regulation_number),
        text(&detail.enactment_date),
        text(&detail.status),
        text(&detail.enactment_date),
        count(&detail.view_count),
        text(&detail.pdf_link),
        text(&detail.regulation_type),
        text(&detail.enactment_place),
        text(&detail.effective_date),
        text(&detail.subject),
        text(&detail.legal_field),
        text(&detail.language),
        text(&detail.source),
        text(&detail.location),
        count(&detail.download_count),
        text(&detail.main_entry),
        text(&detail.type_abbreviation),
        text(&detail.document_type),
        text(&detail.summary),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn configured(server: &MockServer) -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: Some("sheet-123".into()),
            access_token: Some("tok".into()),
            api_base: server.uri(),
            timeout_secs: 5,
            utc_offset_hours: 7,
        }
    }

    fn sink(config: SheetsConfig) -> (SheetsAuditSink, watch::Sender<SheetsConfig>) {
        let (tx, rx) = watch::channel(config);
        (SheetsAuditSink::new(rx).unwrap(), tx)
    }

    fn search_record(n: usize) -> AuditRecord {
        AuditRecord::Search {
            results: (0..n)
                .map(|i| SearchResult {
                    title: format!("PM {i} Tahun 2024"),
                    view_count: 7,
                    detail_link: format!("https://x/{i}"),
                    ..SearchResult::default()
                })
                .collect(),
            caller_id: "628".into(),
            kind: "search".into(),
            query: "kapal".into(),
            platform: Platform::Telegram,
        }
    }

    #[tokio::test]
    async fn search_appends_one_row_per_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-123/values/Sheet1!A:M:append"))
            .and(query_param("valueInputOption", "RAW"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let (sink, _tx) = sink(configured(&server));
        sink.record(search_record(2)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let rows = body["values"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_array().unwrap().len(), 13);
        assert_eq!(rows[0][2], "telegram");
        assert_eq!(rows[0][5], 2);
        assert_eq!(rows[1][6], "PM 1 Tahun 2024");
        assert_eq!(rows[1][12], "https://x/1");
    }

    #[tokio::test]
    async fn detail_appends_26_columns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-123/values/DetailPeraturan!A:Z:append"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let (sink, _tx) = sink(configured(&server));
        let record = AuditRecord::Detail {
            detail: DetailRecord {
                title: Some("KM 5".into()),
                ..DetailRecord::default()
            },
            caller_id: "628".into(),
            platform: Platform::Whatsapp,
        };
        sink.record(record).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let row = body["values"][0].as_array().unwrap();
        assert_eq!(row.len(), 26);
        assert_eq!(row[3], "detail");
        assert_eq!(row[4], "KM 5");
        assert_eq!(row[11], "0");
    }

    #[tokio::test]
    async fn unconfigured_sink_is_not_durable() {
        let (sink, _tx) = sink(SheetsConfig::default());
        assert!(!sink.is_durable());
        let err = sink.record(search_record(1)).await.unwrap_err();
        assert!(matches!(err, AuditError::NotConfigured));
    }

    #[tokio::test]
    async fn config_updates_apply_to_next_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let (sink, tx) = sink(SheetsConfig::default());
        assert!(!sink.is_durable());

        tx.send(configured(&server)).unwrap();
        assert!(sink.is_durable());
        sink.record(search_record(1)).await.unwrap();
    }

    #[tokio::test]
    async fn backend_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let (sink, _tx) = sink(configured(&server));
        let err = sink.record(search_record(1)).await.unwrap_err();
        match err {
            AuditError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "PERMISSION_DENIED");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn check_connection_reads_first_cell() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-123/values/A1"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "range": "Sheet1!A1" })))
            .expect(1)
            .mount(&server)
            .await;

        check_connection(&configured(&server)).await.unwrap();
    }

    #[tokio::test]
    async fn check_connection_reports_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("NOT_FOUND"))
            .mount(&server)
            .await;

        let err = check_connection(&configured(&server)).await.unwrap_err();
        assert!(matches!(err, AuditError::Status { status: 404, .. }));

        let err = check_connection(&SheetsConfig::default()).await.unwrap_err();
        assert!(matches!(err, AuditError::NotConfigured));
    }

    #[test]
    fn blank_credentials_are_not_configured() {
        let config = SheetsConfig {
            spreadsheet_id: Some("  ".into()),
            access_token: Some("tok".into()),
            ..SheetsConfig::default()
        };
        assert!(!config.is_configured());
    }
}
