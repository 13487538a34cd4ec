use serde::{Deserialize, Serialize};

/// One hit from the regulation search page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Publication date as displayed by the site (not parsed).
    #[serde(default)]
    pub published_date: String,
    /// Display status, e.g. "Berlaku", "Dicabut", "Tidak Diketahui".
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub view_count: u64,
    pub detail_link: String,
    /// e.g. "PM 12 Tahun 2024"; empty when the title carries none.
    #[serde(default)]
    pub regulation_number: String,
    #[serde(default)]
    pub year: String,
}

/// Fields scraped from a regulation detail page.
///
/// Every field is optional; the page layout varies between documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enactment_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enactment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Leading excerpt of the document body (capped at 1000 chars + "...").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    // Catalogue fields kept only for the audit trail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl DetailRecord {
    /// True when no field was extracted at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
