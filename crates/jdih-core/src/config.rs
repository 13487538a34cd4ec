use serde::{Deserialize, Serialize};

/// Runtime settings the bot core reads on every dispatch.
///
/// Published through a `tokio::sync::watch` channel so admin changes apply to
/// the next message without a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Lower bound of the pause before each search, in milliseconds.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Group every search is restricted to (`kelompok`); "4" is HUBLA.
    #[serde(default = "default_group_code")]
    pub group_code: String,
    /// Offset applied when rendering history times.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_min_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    3000
}
fn default_group_code() -> String {
    "4".into()
}
fn default_utc_offset_hours() -> i32 {
    7
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            group_code: default_group_code(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl CoreConfig {
    /// Defaults with pacing disabled.
    pub fn without_delay() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(format!(
                "min_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            ));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(format!(
                "utc_offset_hours ({}) out of range",
                self.utc_offset_hours
            ));
        }
        Ok(())
    }
}
