//! Regulation detail page: label/value rows, PDF link, summary text.

use jdih_protocol::DetailRecord;
use regex::Regex;
use std::sync::LazyLock;

use super::{absolutize, text_of, truncate_chars};

static RE_LABEL_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div\b[^>]*class\s*=\s*"[^"]*\bcol-md-4\b[^"]*"[^>]*>(.*?)</div>\s*<div\b[^>]*class\s*=\s*"[^"]*\bcol-md-8\b[^"]*"[^>]*>(.*?)</div>"#,
    )
    .unwrap()
});

static RE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*href\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#).unwrap()
});

static RE_PDF_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)>([^<>]*\.pdf[^<>]*)<").unwrap());

static RE_SUMMARY_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div\b[^>]*class\s*=\s*"[^"]*\b(?:content-text|peraturan-content|post-content)\b[^"]*"[^>]*>(.*?)</div>"#,
    )
    .unwrap()
});

static RE_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").unwrap());

static RE_NUMBER_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+Tahun\s+(\d{4})").unwrap());

const SUMMARY_MAX_CHARS: usize = 1000;
const FILE_NAME_MAX_CHARS: usize = 100;

/// Extract a regulation detail page.
///
/// Returns `None` when nothing recognizable was found.
pub fn parse_detail(html: &str, base_url: &str) -> Option<DetailRecord> {
    let mut record = DetailRecord::default();

    for row in RE_LABEL_ROW.captures_iter(html) {
        let label = text_of(&row[1]).to_lowercase();
        let label = label.trim_end_matches(':').trim();
        let value = text_of(&row[2]);
        if value.is_empty() {
            continue;
        }
        if let Some(slot) = field_for_label(&mut record, label) {
            *slot = Some(value);
        }
    }

    record.pdf_link = find_pdf_link(html, base_url);
    if record.pdf_link.is_some() {
        record.file_name = RE_PDF_NAME
            .captures_iter(html)
            .map(|c| c[1].trim().to_string())
            .find(|name| !name.is_empty() && name.chars().count() < FILE_NAME_MAX_CHARS);
    }

    record.summary = RE_SUMMARY_BLOCK
        .captures_iter(html)
        .map(|c| text_of(&c[1]))
        .find(|t| !t.is_empty())
        .map(|t| truncate_chars(&t, SUMMARY_MAX_CHARS));

    if record.title.is_none() {
        record.title = RE_H1
            .captures(html)
            .map(|c| text_of(&c[1]))
            .filter(|t| !t.is_empty());
    }

    if record.regulation_number.is_none() {
        let page_text = text_of(html);
        if page_text.contains("Nomor") && page_text.contains("Tahun") {
            if let Some(caps) = RE_NUMBER_YEAR.captures(&page_text) {
                record.regulation_number = Some(caps[1].to_string());
                record.year = Some(caps[2].to_string());
            }
        }
    }

    if record.is_empty() {
        tracing::debug!("detail page yielded no recognizable fields");
        None
    } else {
        Some(record)
    }
}

fn field_for_label<'a>(record: &'a mut DetailRecord, label: &str) -> Option<&'a mut Option<String>> {
    let slot = match label {
        "judul" => &mut record.title,
        "nomor peraturan" => &mut record.regulation_number,
        "jenis/bentuk peraturan" => &mut record.regulation_type,
        "singkatan jenis/bentuk peraturan" => &mut record.type_abbreviation,
        "tempat penetapan" => &mut record.enactment_place,
        "tanggal penetapan" => &mut record.enactment_date,
        "tanggal berlaku efektif" => &mut record.effective_date,
        "status" => &mut record.status,
        "file" => &mut record.file,
        "subjek" => &mut record.subject,
        "jumlah unduhan" => &mut record.download_count,
        "jumlah tayang" => &mut record.view_count,
        "bahasa" => &mut record.language,
        "bidang hukum" => &mut record.legal_field,
        "sumber" => &mut record.source,
        "lokasi" => &mut record.location,
        "tajuk entri utama" => &mut record.main_entry,
        "tipe dokumen" => &mut record.document_type,
        _ => return None,
    };
    Some(slot)
}

/// A `.pdf` href wins; otherwise the first "Download"/"Unduh" anchor.
fn find_pdf_link(html: &str, base_url: &str) -> Option<String> {
    let anchors: Vec<_> = RE_ANCHOR.captures_iter(html).collect();

    anchors
        .iter()
        .find(|c| c[1].to_lowercase().contains(".pdf"))
        .or_else(|| {
            anchors.iter().find(|c| {
                let text = text_of(&c[2]);
                text.contains("Download") || text.contains("Unduh")
            })
        })
        .map(|c| absolutize(base_url, &c[1]))
}
