//! Telegram transport: Bot API client, long-poll loop, and slash-command routing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jdih_core::format::{self, TELEGRAM_MAX_CHARS, split_message};
use jdih_core::transport::TransportResult;
use jdih_core::{ChatTransport, Dispatcher, Intent, TransportError};
use jdih_protocol::Platform;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Pause between chunks of one split reply.
const CHUNK_PAUSE: Duration = Duration::from_millis(100);
/// Wait after a failed poll before trying again.
const RETRY_AFTER_ERROR: Duration = Duration::from_secs(5);

const UNKNOWN_COMMAND: &str =
    "❌ Perintah tidak dikenali. Ketik /bantuan untuk melihat daftar perintah.";

/// Bot API envelope: `{ ok, result?, description? }`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Entry of the bot's command menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotCommand {
    pub command: &'static str,
    pub description: &'static str,
}

/// Command menu built from the intent table, one entry per keyword.
pub fn bot_commands() -> Vec<BotCommand> {
    Intent::keywords()
        .filter_map(|keyword| {
            let intent = Intent::from_keyword(keyword)?;
            let description = if keyword == "start" {
                "Mulai bot JDIH"
            } else {
                intent.description()
            };
            Some(BotCommand {
                command: keyword,
                description,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// Connection state shown on the admin panel.
#[derive(Debug, Default)]
pub struct TelegramStatus {
    connected: AtomicBool,
    username: Mutex<Option<String>>,
}

impl TelegramStatus {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn username(&self) -> Option<String> {
        self.username.lock().ok().and_then(|u| u.clone())
    }

    pub fn set_connected(&self, username: Option<String>) {
        if let Ok(mut slot) = self.username.lock() {
            if username.is_some() {
                *slot = username;
            }
        }
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn set_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

/// Minimal Telegram Bot API client.
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Send(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> TransportResult<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Api(format!("{method}: HTTP {status}: {e}")))?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TransportError::Api(format!(
                "{method}: {}",
                description.unwrap_or_else(|| format!("HTTP {status}"))
            ))),
        }
    }

    pub async fn get_me(&self) -> TransportResult<User> {
        self.call("getMe", json!({}), Duration::from_secs(10)).await
    }

    /// Replace the command menu shown by Telegram clients.
    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> TransportResult<()> {
        let _: bool = self
            .call(
                "setMyCommands",
                json!({ "commands": commands }),
                Duration::from_secs(10),
            )
            .await?;
        Ok(())
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> TransportResult<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({ "offset": offset, "timeout": timeout_secs, "allowed_updates": ["message"] }),
            Duration::from_secs(timeout_secs + 10),
        )
        .await
    }

    /// Send one message, without splitting.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> TransportResult<()> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                json!({ "chat_id": chat_id, "text": text }),
                Duration::from_secs(30),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    fn max_message_chars(&self) -> usize {
        TELEGRAM_MAX_CHARS
    }

    async fn send_text(&self, conversation: &str, text: &str) -> TransportResult<()> {
        let chat_id: i64 = conversation
            .parse()
            .map_err(|_| TransportError::Send(format!("invalid chat id: {conversation}")))?;

        let chunks = split_message(text, self.max_message_chars());
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.iter().enumerate() {
            self.send_message(chat_id, chunk).await?;
            if i < last {
                tokio::time::sleep(CHUNK_PAUSE).await;
            }
        }
        tracing::debug!(chat_id, chunks = chunks.len(), "telegram reply sent");
        Ok(())
    }
}

/// Turn one incoming Telegram text into the reply to send back.
///
/// Slash commands (`/cari kapal`, `/cari@SomeBot kapal`) go through the
/// dispatcher with the slash removed; `/start` greets the user first.
pub async fn route_text(dispatcher: &Dispatcher, chat_id: &str, username: &str, text: &str) -> String {
    let trimmed = text.trim();

    let Some(command_text) = trimmed.strip_prefix('/') else {
        return dispatcher.dispatch(chat_id, trimmed, Platform::Telegram).await;
    };

    let (head, rest) = command_text
        .split_once(char::is_whitespace)
        .unwrap_or((command_text, ""));
    let command = head.split('@').next().unwrap_or_default().to_lowercase();

    if command == "start" {
        return format!(
            "👋 Halo @{username}!\n\n{}",
            format::format_help(Platform::Telegram)
        );
    }

    if Intent::from_keyword(&command).is_none() {
        tracing::debug!(chat_id, %command, "unknown telegram command");
        return UNKNOWN_COMMAND.to_string();
    }

    let message = format!("{command} {}", rest.trim());
    dispatcher.dispatch(chat_id, &message, Platform::Telegram).await
}

/// Poll for updates forever, answering each text message on its own task.
pub async fn run(
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
    status: Arc<TelegramStatus>,
    poll_timeout_secs: u64,
) {
    match client.get_me().await {
        Ok(me) => {
            tracing::info!(username = ?me.username, "telegram bot connected");
            status.set_connected(me.username);
        }
        Err(e) => tracing::warn!(error = %e, "telegram getMe failed, polling anyway"),
    }
    if let Err(e) = client.set_my_commands(&bot_commands()).await {
        tracing::warn!(error = %e, "failed to register telegram command menu");
    }

    let mut offset = 0;
    loop {
        match client.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => {
                status.set_connected(None);
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(message) = update.message {
                        spawn_reply(Arc::clone(&client), Arc::clone(&dispatcher), message);
                    }
                }
            }
            Err(e) => {
                status.set_disconnected();
                tracing::error!(error = %e, "telegram polling error, retrying in 5s");
                tokio::time::sleep(RETRY_AFTER_ERROR).await;
            }
        }
    }
}

fn spawn_reply(client: Arc<TelegramClient>, dispatcher: Arc<Dispatcher>, message: Message) {
    let Some(text) = message.text else {
        return;
    };
    let chat_id = message.chat.id.to_string();
    let username = message
        .from
        .map(|u| u.username.unwrap_or(u.first_name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    tokio::spawn(async move {
        tracing::info!(%chat_id, %username, "telegram message received");
        let reply = route_text(&dispatcher, &chat_id, &username, &text).await;
        if let Err(e) = client.send_text(&chat_id, &reply).await {
            tracing::error!(%chat_id, error = %e, "failed to send telegram reply");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdih_core::CoreConfig;
    use jdih_core::audit::MockAuditSink;
    use jdih_gateway::MockGateway;
    use jdih_protocol::SearchResult;
    use tokio::sync::watch;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dispatcher(gateway: Arc<MockGateway>) -> Dispatcher {
        let (_tx, rx) = watch::channel(CoreConfig::without_delay());
        Dispatcher::new(gateway, Arc::new(MockAuditSink::new()), rx)
    }

    fn one_result() -> Vec<SearchResult> {
        vec![SearchResult {
            title: "PM 1 Tahun 2024".into(),
            status: "Berlaku".into(),
            detail_link: "https://x/1".into(),
            ..SearchResult::default()
        }]
    }

    #[tokio::test]
    async fn start_greets_user() {
        let gateway = Arc::new(MockGateway::new());
        let reply = route_text(&dispatcher(gateway.clone()), "42", "budi", "/start").await;
        assert!(reply.starts_with("👋 Halo @budi!\n\n✈️ *Bot JDIH HUBLA"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn slash_command_with_bot_suffix_is_dispatched() {
        let gateway = Arc::new(MockGateway::new().with_results(one_result()));
        let d = dispatcher(gateway.clone());
        let reply = route_text(&d, "42", "budi", "/cari@JdihBot  keselamatan kapal").await;

        assert!(reply.starts_with("✈️ *Hasil Pencarian HUBLA*"));
        assert_eq!(
            gateway.search_calls()[0].keyword.as_deref(),
            Some("keselamatan kapal")
        );
        let entry = &d.history().all().await[0];
        assert_eq!(entry.caller_id, "42");
        assert_eq!(entry.platform, Platform::Telegram);
    }

    #[tokio::test]
    async fn unknown_slash_command_never_reaches_gateway() {
        let gateway = Arc::new(MockGateway::new().with_results(one_result()));
        let reply = route_text(&dispatcher(gateway.clone()), "42", "budi", "/hapus semua").await;
        assert_eq!(reply, UNKNOWN_COMMAND);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn slash_command_without_argument_gets_usage_error() {
        let gateway = Arc::new(MockGateway::new());
        let reply = route_text(&dispatcher(gateway.clone()), "42", "budi", "/tahun").await;
        assert!(reply.starts_with("❌ Silakan berikan parameter untuk perintah tahun"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn plain_text_is_free_search() {
        let gateway = Arc::new(MockGateway::new().with_results(one_result()));
        route_text(&dispatcher(gateway.clone()), "42", "budi", "pelabuhan").await;
        assert_eq!(gateway.search_calls()[0].keyword.as_deref(), Some("pelabuhan"));
    }

    #[tokio::test]
    async fn get_me_parses_bot_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "id": 7, "is_bot": true, "first_name": "JDIH", "username": "JdihBot" }
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "123:abc").unwrap();
        let me = client.get_me().await.unwrap();
        assert_eq!(me.username.as_deref(), Some("JdihBot"));
        assert!(me.is_bot);
    }

    #[tokio::test]
    async fn api_error_description_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "ok": false,
                "error_code": 401,
                "description": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "bad").unwrap();
        let err = client.get_me().await.unwrap_err();
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[tokio::test]
    async fn get_updates_parses_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/getUpdates"))
            .and(body_partial_json(json!({ "offset": 5, "timeout": 1 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [{
                    "update_id": 5,
                    "message": {
                        "message_id": 1,
                        "chat": { "id": 42, "type": "private" },
                        "from": { "id": 9, "is_bot": false, "first_name": "Budi" },
                        "text": "cari kapal"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "123:abc").unwrap();
        let updates = client.get_updates(5, 1).await.unwrap();
        assert_eq!(updates.len(), 1);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("cari kapal"));
    }

    #[tokio::test]
    async fn long_reply_is_sent_in_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 1 }
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "123:abc").unwrap();
        let line = "x".repeat(100);
        let text = vec![line; 100].join("\n");
        client.send_text("42", &text).await.unwrap();

        for request in server.received_requests().await.unwrap() {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            assert_eq!(body["chat_id"], 42);
            assert!(body["text"].as_str().unwrap().chars().count() <= TELEGRAM_MAX_CHARS);
        }
    }

    #[tokio::test]
    async fn invalid_chat_id_is_rejected() {
        let client = TelegramClient::new("http://127.0.0.1:1", "t").unwrap();
        assert!(client.send_text("not-a-number", "hi").await.is_err());
    }

    #[test]
    fn command_menu_covers_keyword_table() {
        let commands = bot_commands();
        assert_eq!(commands.len(), Intent::keywords().count());
        let start = commands.iter().find(|c| c.command == "start").unwrap();
        assert_eq!(start.description, "Mulai bot JDIH");
        let tahun = commands.iter().find(|c| c.command == "tahun").unwrap();
        assert!(tahun.description.contains("/tahun 2024"));
    }

    #[tokio::test]
    async fn set_my_commands_posts_menu() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/setMyCommands"))
            .and(body_partial_json(json!({
                "commands": [{ "command": "help", "description": "Tampilkan bantuan" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "123:abc").unwrap();
        let menu = [BotCommand {
            command: "help",
            description: "Tampilkan bantuan",
        }];
        client.set_my_commands(&menu).await.unwrap();
    }

    #[test]
    fn status_tracks_connection() {
        let status = TelegramStatus::default();
        assert!(!status.is_connected());
        status.set_connected(Some("JdihBot".into()));
        status.set_connected(None);
        assert!(status.is_connected());
        assert_eq!(status.username().as_deref(), Some("JdihBot"));
        status.set_disconnected();
        assert!(!status.is_connected());
    }
}
