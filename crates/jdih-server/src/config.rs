//! Server configuration, loadable from TOML or environment.

use jdih_core::CoreConfig;
use jdih_core::audit::SheetsConfig;
use jdih_gateway::GatewayConfig;
use serde::Deserialize;

/// Top-level configuration for the bot server.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reported on the admin panel; the WhatsApp client itself runs out of process.
    #[serde(default)]
    pub whatsapp_enabled: bool,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
    /// Long-poll timeout passed to `getUpdates`.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: None,
            api_base: default_telegram_api_base(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            whatsapp_enabled: false,
            telegram: TelegramConfig::default(),
            gateway: GatewayConfig::default(),
            core: CoreConfig::default(),
            sheets: SheetsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.core.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Load config from environment variables, defaulting everything else.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            get(key)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false)
        };
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(port) = get("PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        config.whatsapp_enabled = flag("WHATSAPP_ENABLED");
        config.telegram.enabled = flag("TELEGRAM_ENABLED");
        config.telegram.token = non_empty("TELEGRAM_BOT_TOKEN");
        config.sheets.spreadsheet_id = non_empty("GOOGLE_SHEET_ID");
        config.sheets.access_token = non_empty("GOOGLE_SHEETS_ACCESS_TOKEN");
        if let Some(base_url) = non_empty("JDIH_BASE_URL") {
            config.gateway.base_url = base_url;
        }
        config
    }
}
