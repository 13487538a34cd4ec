//! Search results page: one `strip grid` card per regulation.

use jdih_protocol::SearchResult;
use regex::Regex;
use std::sync::LazyLock;

use super::{absolutize, text_of};

static RE_CARD_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*class\s*=\s*"[^"]*\bstrip\b[^"]*\bgrid\b[^"]*"[^>]*>"#).unwrap()
});

static RE_TITLE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<h3\b[^>]*>\s*<a\b[^>]*href\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#).unwrap()
});

static RE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").unwrap());

static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li\b[^>]*>(.*?)</li>").unwrap());

static RE_STATUS_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*style\s*=\s*"([^"]*background-color[^"]*)""#).unwrap()
});

// "PM 12 Tahun 2024", "KM 5 Tahun 2019"
static RE_REG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]{1,3})\s+(\d+)\s+Tahun\s+(\d{4})").unwrap());

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Tahun\s+(\d{4})").unwrap());

const STATUS_UNKNOWN: &str = "Tidak Diketahui";

/// Extract every result card from a search results page, in page order.
///
/// Cards without a title link are skipped.
pub fn parse_search_results(html: &str, base_url: &str) -> Vec<SearchResult> {
    let starts: Vec<usize> = RE_CARD_START.find_iter(html).map(|m| m.start()).collect();

    let mut results = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(html.len());
        match parse_card(&html[start..end], base_url) {
            Some(result) => results.push(result),
            None => tracing::debug!(card_index = i, "skipping result card without title link"),
        }
    }
    results
}

fn parse_card(card: &str, base_url: &str) -> Option<SearchResult> {
    let caps = RE_TITLE_LINK.captures(card)?;
    let detail_link = absolutize(base_url, &caps[1]);
    let title = text_of(&caps[2]);

    let description = RE_PARAGRAPH
        .captures_iter(card)
        .map(|c| text_of(&c[1]))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut published_date = String::new();
    let mut view_count = 0;
    for item in RE_LIST_ITEM.captures_iter(card) {
        let inner = &item[1];
        if inner.contains("ti-calendar") {
            published_date = text_of(inner);
        } else if inner.contains("ti-eye") {
            view_count = leading_number(&text_of(inner));
        }
    }

    let status = RE_STATUS_STYLE
        .captures(card)
        .and_then(|c| status_from_style(&c[1]))
        .unwrap_or(STATUS_UNKNOWN)
        .to_string();

    Some(SearchResult {
        regulation_number: extract_regulation_number(&title),
        year: extract_year(&title),
        title,
        description,
        published_date,
        status,
        view_count,
        detail_link,
    })
}

fn status_from_style(style: &str) -> Option<&'static str> {
    let style = style.to_ascii_lowercase();
    if style.contains("green") {
        Some("Berlaku")
    } else if style.contains("red") {
        Some("Dicabut")
    } else {
        None
    }
}

/// Leading integer of "1234 x Dilihat"; 0 when the text starts otherwise.
fn leading_number(text: &str) -> u64 {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

pub fn extract_regulation_number(title: &str) -> String {
    RE_REG_NUMBER
        .captures(title)
        .map(|c| format!("{} {} Tahun {}", &c[1], &c[2], &c[3]))
        .unwrap_or_default()
}

pub fn extract_year(title: &str) -> String {
    RE_YEAR
        .captures(title)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://jdih.dephub.go.id";

    const PAGE: &str = r#"
<html><body>
<div class="row">
  <div class="strip grid">
    <figure><img src="/img/pm.png"></figure>
    <div class="wrapper">
      <h3><a href="/peraturan/detail?data=AAA">PM 12 Tahun 2024 tentang Keselamatan Kapal</a></h3>
      <p>Peraturan Menteri Perhubungan mengenai standar keselamatan kapal penumpang.</p>
      <span style="background-color: green; color: white">Berlaku</span>
    </div>
    <ul>
      <li><i class="ti-calendar"></i> 12 Maret 2024</li>
      <li><i class="ti-eye"></i> 1534 x Dilihat</li>
    </ul>
  </div>
  <div class="strip grid">
    <div class="wrapper">
      <h3><a href="https://jdih.dephub.go.id/peraturan/detail?data=BBB">KM 7 Tahun 2010 &amp; Perubahannya</a></h3>
      <span style="background-color:red">Dicabut</span>
    </div>
    <ul>
      <li><i class="ti-calendar"></i> 1 Januari 2010</li>
      <li><i class="ti-eye"></i> 20 x Dilihat</li>
    </ul>
  </div>
  <div class="strip grid">
    <h3><a href="/peraturan/detail?data=CCC">Surat Edaran Direktur Jenderal</a></h3>
  </div>
</div>
</body></html>
"#;

    #[test]
    fn parses_all_cards_in_order() {
        let results = parse_search_results(PAGE, BASE);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].title,
            "PM 12 Tahun 2024 tentang Keselamatan Kapal"
        );
        assert_eq!(results[1].title, "KM 7 Tahun 2010 & Perubahannya");
        assert_eq!(results[2].title, "Surat Edaran Direktur Jenderal");
    }

    #[test]
    fn card_metadata() {
        let results = parse_search_results(PAGE, BASE);
        let first = &results[0];
        assert_eq!(
            first.detail_link,
            "https://jdih.dephub.go.id/peraturan/detail?data=AAA"
        );
        assert_eq!(first.published_date, "12 Maret 2024");
        assert_eq!(first.view_count, 1534);
        assert_eq!(first.status, "Berlaku");
        assert_eq!(first.regulation_number, "PM 12 Tahun 2024");
        assert_eq!(first.year, "2024");
        assert!(first.description.starts_with("Peraturan Menteri Perhubungan"));
    }

    #[test]
    fn status_colours_and_unknown() {
        let results = parse_search_results(PAGE, BASE);
        assert_eq!(results[1].status, "Dicabut");
        assert_eq!(results[2].status, "Tidak Diketahui");
        assert_eq!(results[2].view_count, 0);
        assert!(results[2].regulation_number.is_empty());
    }

    #[test]
    fn absolute_links_kept() {
        let results = parse_search_results(PAGE, BASE);
        assert_eq!(
            results[1].detail_link,
            "https://jdih.dephub.go.id/peraturan/detail?data=BBB"
        );
    }

    #[test]
    fn page_without_cards_is_empty() {
        assert!(parse_search_results("<html><body>Tidak ada data</body></html>", BASE).is_empty());
    }

    #[test]
    fn card_without_link_is_skipped() {
        let html = r#"<div class="strip grid"><h3>Tanpa tautan</h3></div>"#;
        assert!(parse_search_results(html, BASE).is_empty());
    }

    #[test]
    fn regulation_number_extraction() {
        assert_eq!(
            extract_regulation_number("Peraturan PM 33 Tahun 2021 tentang X"),
            "PM 33 Tahun 2021"
        );
        assert_eq!(extract_regulation_number("tanpa nomor"), "");
        assert_eq!(extract_year("UU 17 Tahun 2008"), "2008");
    }
}
