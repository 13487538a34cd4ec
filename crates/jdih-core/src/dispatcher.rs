//! Command dispatcher: turns one chat message into one reply.
//!
//! `dispatch` is total: gateway failures and missing arguments become reply
//! text, so transports always have something to send back.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jdih_gateway::SearchGateway;
use jdih_protocol::{Platform, SearchParams, StatusSnapshot};
use rand::Rng;
use tokio::sync::watch;

use crate::audit::{AuditRecord, AuditSink};
use crate::command::Command;
use crate::config::CoreConfig;
use crate::format;
use crate::history::{History, offset_hours};
use crate::intent::{Intent, type_code_for};

/// Query label recorded for group searches, whatever the caller typed.
const GROUP_QUERY_LABEL: &str = "HUBLA";

pub struct Dispatcher {
    gateway: Arc<dyn SearchGateway>,
    audit: Arc<dyn AuditSink>,
    history: History,
    config: watch::Receiver<CoreConfig>,
    started_at: DateTime<Utc>,
}

impl Dispatcher {
    pub fn new(
        gateway: Arc<dyn SearchGateway>,
        audit: Arc<dyn AuditSink>,
        config: watch::Receiver<CoreConfig>,
    ) -> Self {
        Self {
            gateway,
            audit,
            history: History::new(),
            config,
            started_at: Utc::now(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> CoreConfig {
        self.config.borrow().clone()
    }

    /// Usage numbers, recomputed from history on every call.
    pub async fn status(&self) -> StatusSnapshot {
        let offset = offset_hours(self.config().utc_offset_hours);
        self.history.status(self.started_at, offset, Utc::now()).await
    }

    /// Handle one message from `caller_id` and return the reply text.
    pub async fn dispatch(&self, caller_id: &str, text: &str, platform: Platform) -> String {
        let config = self.config();
        let command = Command::parse(text);
        let (intent, argument) = command.resolve();

        tracing::info!(
            caller_id,
            %platform,
            intent = ?intent,
            keyword = %command.keyword,
            "dispatching message"
        );

        if intent.requires_argument() && argument.is_empty() {
            return format::format_usage_error(&command.keyword);
        }

        match intent {
            Intent::Help => format::format_help(platform),
            Intent::Stats => format::format_stats(&self.history.all().await, platform),
            Intent::RecentHistory => format::format_recent(
                &self.history.all().await,
                platform,
                offset_hours(config.utc_offset_hours),
            ),
            Intent::Search | Intent::FreeTextSearch => {
                let params = SearchParams::keyword(argument);
                self.search(&config, caller_id, platform, intent, params, argument)
                    .await
            }
            Intent::SearchByYear => {
                let params = SearchParams::year(argument);
                self.search(&config, caller_id, platform, intent, params, argument)
                    .await
            }
            Intent::SearchByType => {
                let params = SearchParams::type_code(type_code_for(argument));
                self.search(&config, caller_id, platform, intent, params, argument)
                    .await
            }
            Intent::SearchByGroup => {
                let params = SearchParams::default();
                self.search(&config, caller_id, platform, intent, params, GROUP_QUERY_LABEL)
                    .await
            }
            Intent::Detail => self.detail(caller_id, platform, argument).await,
        }
    }

    async fn search(
        &self,
        config: &CoreConfig,
        caller_id: &str,
        platform: Platform,
        intent: Intent,
        params: SearchParams,
        query: &str,
    ) -> String {
        tokio::time::sleep(pacing_delay(config)).await;

        let params = params.in_group(config.group_code.clone());
        let results = match self.gateway.search(&params).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(caller_id, intent = ?intent, error = %e, "search failed");
                return format::format_error(&e.to_string());
            }
        };

        let kind = intent.kind();
        self.history
            .record(caller_id, platform, kind, query, results.len())
            .await;
        tracing::info!(caller_id, intent = kind, result_count = results.len(), "search completed");

        let mut reply = format::format_search_results(&results, query, platform);
        if results.is_empty() {
            return reply;
        }

        let durable = self.audit.is_durable();
        self.spawn_audit(AuditRecord::Search {
            results,
            caller_id: caller_id.to_string(),
            kind: kind.to_string(),
            query: query.to_string(),
            platform,
        });
        if durable {
            reply.push_str(format::AUDIT_FOOTER);
        }
        reply
    }

    async fn detail(&self, caller_id: &str, platform: Platform, url: &str) -> String {
        let detail = match self.gateway.fetch_detail(url).await {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                tracing::warn!(caller_id, %url, "detail page had no recognizable content");
                return format::format_detail_unavailable();
            }
            Err(e) => {
                tracing::error!(caller_id, %url, error = %e, "detail fetch failed");
                return format::format_error(&e.to_string());
            }
        };

        self.history
            .record(caller_id, platform, Intent::Detail.kind(), url, 1)
            .await;

        let mut reply = format::format_detail(&detail, platform);
        let durable = self.audit.is_durable();
        self.spawn_audit(AuditRecord::Detail {
            detail,
            caller_id: caller_id.to_string(),
            platform,
        });
        if durable {
            reply.push_str(format::AUDIT_FOOTER);
        }
        reply
    }

    /// Hand a record to the audit sink without waiting for it.
    fn spawn_audit(&self, record: AuditRecord) {
        let audit = Arc::clone(&self.audit);
        tokio::spawn(async move {
            let caller_id = record.caller_id().to_string();
            if let Err(e) = audit.record(record).await {
                tracing::warn!(%caller_id, error = %e, "audit sink rejected record");
            }
        });
    }
}

/// Advisory pause before hitting the upstream site.
fn pacing_delay(config: &CoreConfig) -> Duration {
    let (min, max) = (config.min_delay_ms, config.max_delay_ms);
    let ms = if max <= min {
        min
    } else {
        rand::thread_rng().gen_range(min..=max)
    };
    Duration::from_millis(ms)
}
