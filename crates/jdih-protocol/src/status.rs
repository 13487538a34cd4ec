use serde::{Deserialize, Serialize};

/// Point-in-time usage numbers derived from the interaction history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub total_searches: usize,
    /// Distinct caller ids.
    pub total_users: usize,
    pub today_searches: usize,
    pub uptime_seconds: u64,
}

impl StatusSnapshot {
    /// Uptime rendered as "{minutes}m {seconds}s".
    pub fn uptime_label(&self) -> String {
        format!("{}m {}s", self.uptime_seconds / 60, self.uptime_seconds % 60)
    }
}
