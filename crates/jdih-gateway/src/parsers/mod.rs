//! Tolerant HTML extraction for the regulation site.
//!
//! The site's markup is not under our control, so extraction scans for the
//! few anchors that matter (`strip grid` result cards, `col-md-4`/`col-md-8`
//! label rows, PDF links) with regexes and strips everything else. Helpers
//! here normalize text the way a browser renders it: tags removed, common
//! entities decoded, whitespace collapsed.

pub mod detail;
pub mod search;

use regex::Regex;
use std::sync::LazyLock;

pub use detail::parse_detail;
pub use search::parse_search_results;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

static RE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>").unwrap()
});

/// Render an HTML fragment as plain text.
pub fn text_of(fragment: &str) -> String {
    let without_code = RE_SCRIPT.replace_all(fragment, " ");
    let without_tags = RE_TAG.replace_all(&without_code, " ");
    collapse_whitespace(&decode_entities(&without_tags))
}

/// Decode the handful of entities the site actually emits, plus numeric ones.
pub fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => {
                    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                    } else if let Some(dec) = name.strip_prefix('#') {
                        dec.parse::<u32>().ok().and_then(char::from_u32)
                    } else {
                        None
                    }
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a possibly-relative `href` against the site root.
pub fn absolutize(base_url: &str, href: &str) -> String {
    let href = decode_entities(href.trim());
    if href.starts_with("http://") || href.starts_with("https://") {
        href
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}

/// First `max_chars` characters of `text`, with "..." appended when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_of_strips_tags_and_entities() {
        let html = "<b>Peraturan</b>&nbsp;Menteri &amp; <i>Perhubungan</i>\n\n";
        assert_eq!(text_of(html), "Peraturan Menteri & Perhubungan");
    }

    #[test]
    fn text_of_drops_scripts() {
        let html = "<div>Judul<script>var x = '<b>';</script></div>";
        assert_eq!(text_of(html), "Judul");
    }

    #[test]
    fn numeric_entities_decode() {
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn absolutize_variants() {
        let base = "https://jdih.dephub.go.id";
        assert_eq!(
            absolutize(base, "/peraturan/detail?data=abc"),
            "https://jdih.dephub.go.id/peraturan/detail?data=abc"
        );
        assert_eq!(
            absolutize(base, "https://cdn.example.test/a.pdf"),
            "https://cdn.example.test/a.pdf"
        );
        assert_eq!(
            absolutize(base, "upload/a.pdf"),
            "https://jdih.dephub.go.id/upload/a.pdf"
        );
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("ééééé", 3), "ééé...");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }
}
