use serde::{Deserialize, Serialize};

/// Query parameters accepted by the regulation search page.
///
/// Every filter is optional; absent filters are sent as empty strings so the
/// remote form treats them as "any".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free keyword (`kataKunci`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Regulation number (`nomorPeraturan`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Four-digit year (`tahunPeraturan`), forwarded unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Internal regulation type code (`jenisPeraturan`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    /// Organizational group (`kelompok`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_code: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    12
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            keyword: None,
            number: None,
            year: None,
            type_code: None,
            group_code: None,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl SearchParams {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    pub fn year(year: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            ..Self::default()
        }
    }

    pub fn type_code(code: impl Into<String>) -> Self {
        Self {
            type_code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Restrict the query to one organizational group.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group_code = Some(group.into());
        self
    }
}
