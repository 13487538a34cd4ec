use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chat platform a message arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Whatsapp,
    Telegram,
    /// Admin test endpoint or any caller without a chat platform.
    #[default]
    General,
}

impl Platform {
    /// Marker emoji prefixed to reply headers.
    pub fn marker(self) -> &'static str {
        match self {
            Platform::Whatsapp => "📱",
            Platform::Telegram => "✈️",
            Platform::General => "🤖",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Whatsapp => "whatsapp",
            Platform::Telegram => "telegram",
            Platform::General => "general",
        }
    }

    /// Parse a platform tag, mapping anything unrecognized to `General`.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a platform tag is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Ok(Platform::Whatsapp),
            "telegram" => Ok(Platform::Telegram),
            "general" => Ok(Platform::General),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}
