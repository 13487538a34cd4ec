//! Intent table: command keywords and what they mean.

/// What a message asks the bot to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Help,
    Search,
    SearchByYear,
    SearchByType,
    SearchByGroup,
    Detail,
    Stats,
    RecentHistory,
    /// No keyword matched; the whole message is the search keyword.
    FreeTextSearch,
}

/// Keyword synonyms, matched against the lower-cased first word.
const KEYWORDS: &[(&str, Intent)] = &[
    ("help", Intent::Help),
    ("bantuan", Intent::Help),
    ("mulai", Intent::Help),
    ("start", Intent::Help),
    ("search", Intent::Search),
    ("cari", Intent::Search),
    ("tahun", Intent::SearchByYear),
    ("jenis", Intent::SearchByType),
    ("kelompok", Intent::SearchByGroup),
    ("detail", Intent::Detail),
    ("lengkap", Intent::Detail),
    ("stats", Intent::Stats),
    ("statistik", Intent::Stats),
    ("recent", Intent::RecentHistory),
    ("terbaru", Intent::RecentHistory),
];

impl Intent {
    /// Look up a command keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
            .map(|(_, intent)| *intent)
    }

    /// Whether the intent is refused without an argument.
    pub fn requires_argument(self) -> bool {
        matches!(
            self,
            Intent::Search
                | Intent::SearchByYear
                | Intent::SearchByType
                | Intent::SearchByGroup
                | Intent::Detail
        )
    }

    /// Label used for this intent in the interaction history.
    pub fn kind(self) -> &'static str {
        match self {
            Intent::Search | Intent::FreeTextSearch => "search",
            Intent::SearchByYear => "tahun",
            Intent::SearchByType => "jenis",
            Intent::SearchByGroup => "kelompok",
            Intent::Detail => "detail",
            Intent::Stats => "stats",
            Intent::RecentHistory => "recent",
            Intent::Help => "help",
        }
    }

    /// One-line description for chat command menus.
    pub fn description(self) -> &'static str {
        match self {
            Intent::Help => "Tampilkan bantuan",
            Intent::Search | Intent::FreeTextSearch => {
                "Cari peraturan (contoh: /cari transportasi)"
            }
            Intent::SearchByYear => "Cari peraturan tahun tertentu (contoh: /tahun 2024)",
            Intent::SearchByType => "Cari peraturan jenis tertentu (contoh: /jenis peraturan)",
            Intent::SearchByGroup => "Cari peraturan kelompok HUBLA (contoh: /kelompok hubla)",
            Intent::Detail => "Lihat detail peraturan lengkap (contoh: /detail [link])",
            Intent::Stats => "Lihat statistik pencarian",
            Intent::RecentHistory => "Lihat pencarian terbaru",
        }
    }

    /// All recognized keywords, in table order.
    pub fn keywords() -> impl Iterator<Item = &'static str> {
        KEYWORDS.iter().map(|(k, _)| *k)
    }
}

/// Regulation type names accepted by `jenis`, with the site's internal codes.
const TYPE_CODES: &[(&str, &str)] = &[
    ("peraturan", "104"),
    ("keputusan", "102"),
    ("instruksi", "109"),
    ("surat edaran", "114"),
    ("uu", "3"),
];

/// Map a type name to its code; unknown names pass through unchanged.
pub fn type_code_for(name: &str) -> String {
    let lowered = name.to_lowercase();
    TYPE_CODES
        .iter()
        .find(|(n, _)| *n == lowered)
        .map_or_else(|| name.to_string(), |(_, code)| (*code).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_resolve_to_same_intent() {
        assert_eq!(Intent::from_keyword("search"), Some(Intent::Search));
        assert_eq!(Intent::from_keyword("cari"), Some(Intent::Search));
        assert_eq!(Intent::from_keyword("detail"), Intent::from_keyword("lengkap"));
        assert_eq!(Intent::from_keyword("stats"), Intent::from_keyword("statistik"));
        assert_eq!(Intent::from_keyword("recent"), Intent::from_keyword("terbaru"));
        for help in ["help", "bantuan", "mulai", "start"] {
            assert_eq!(Intent::from_keyword(help), Some(Intent::Help));
        }
    }

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(Intent::from_keyword("CARI"), Some(Intent::Search));
        assert_eq!(Intent::from_keyword("Tahun"), Some(Intent::SearchByYear));
        assert_eq!(Intent::from_keyword("kapal"), None);
    }

    #[test]
    fn argument_requirements() {
        assert!(Intent::Search.requires_argument());
        assert!(Intent::SearchByGroup.requires_argument());
        assert!(Intent::Detail.requires_argument());
        assert!(!Intent::Help.requires_argument());
        assert!(!Intent::Stats.requires_argument());
        assert!(!Intent::RecentHistory.requires_argument());
        assert!(!Intent::FreeTextSearch.requires_argument());
    }

    #[test]
    fn free_text_shares_search_label() {
        assert_eq!(Intent::FreeTextSearch.kind(), Intent::Search.kind());
        assert_eq!(Intent::SearchByYear.kind(), "tahun");
    }

    #[test]
    fn every_keyword_resolves_and_has_description() {
        let keywords: Vec<_> = Intent::keywords().collect();
        assert_eq!(keywords.len(), 15);
        for keyword in keywords {
            let intent = Intent::from_keyword(keyword).unwrap();
            assert!(!intent.description().is_empty());
        }
    }

    #[test]
    fn type_table_and_passthrough() {
        assert_eq!(type_code_for("peraturan"), "104");
        assert_eq!(type_code_for("Surat Edaran"), "114");
        assert_eq!(type_code_for("UU"), "3");
        assert_eq!(type_code_for("Perpres"), "Perpres");
    }
}
