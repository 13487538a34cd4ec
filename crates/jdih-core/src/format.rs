//! Reply rendering.
//!
//! Pure functions from data to the Markdown-flavoured text both chat
//! platforms display (`*bold*`). Every reply header carries the platform
//! marker of the conversation it is sent to.

use std::fmt::Write;

use chrono::FixedOffset;
use jdih_protocol::{DetailRecord, HistoryEntry, Platform, SearchResult};

/// Appended after search and detail replies when results are persisted.
pub const AUDIT_FOOTER: &str = "\n💾 *Data telah disimpan ke Google Sheet*";

/// Telegram's per-message character limit.
pub const TELEGRAM_MAX_CHARS: usize = 4096;

const DESCRIPTION_MAX_CHARS: usize = 100;
const STATS_RECENT: usize = 5;
const RECENT_LIMIT: usize = 10;

pub fn format_help(platform: Platform) -> String {
    format!(
        "{} *Bot JDIH HUBLA Kementerian Perhubungan*

*Perintah yang tersedia:*

🔎 *Pencarian HUBLA:*
• `cari [kata kunci]` atau `search [kata kunci]` - Cari peraturan HUBLA
• `tahun [tahun]` - Cari peraturan HUBLA tahun tertentu
• `jenis [jenis]` - Cari peraturan HUBLA jenis tertentu
• `kelompok hubla` - Lihat semua peraturan HUBLA
• `lengkap [link]` atau `detail [link]` - Lihat detail peraturan lengkap

📊 *Informasi:*
• `statistik` atau `stats` - Lihat statistik pencarian HUBLA
• `terbaru` atau `recent` - Lihat pencarian terbaru HUBLA
• `bantuan` atau `help` - Tampilkan bantuan ini

*Contoh penggunaan:*
• `cari transportasi`
• `tahun 2024`
• `jenis peraturan`
• `kelompok hubla`
• `lengkap https://jdih.dephub.go.id/peraturan/detail?data=...`

*Jenis peraturan HUBLA:*
• peraturan (104)
• keputusan (102)
• instruksi (109)
• surat edaran (114)

*Kelompok HUBLA:*
• hubla (4) - Fokus utama bot ini",
        platform.marker()
    )
}

/// Render a result list in input order; an empty list becomes a one-line notice.
///
/// The intent kind does not change the rendering. Callers record it in
/// history and audit instead.
pub fn format_search_results(results: &[SearchResult], query: &str, platform: Platform) -> String {
    if results.is_empty() {
        return format!("❌ Tidak ditemukan peraturan HUBLA untuk pencarian: {query}");
    }

    let mut out = String::new();
    let _ = write!(
        out,
        "{} *Hasil Pencarian HUBLA*\n📝 Query: {query}\n📊 Ditemukan: {} peraturan HUBLA\n\n",
        platform.marker(),
        results.len()
    );

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "*{}. {}*", i + 1, result.title);
        let _ = writeln!(out, "{}", status_line(&result.published_date, &result.status));
        let _ = writeln!(out, "👁️ {}x dilihat", result.view_count);
        if !result.description.is_empty() {
            let _ = writeln!(out, "📄 {}", cut(&result.description, DESCRIPTION_MAX_CHARS));
        }
        let _ = write!(out, "🔗 {}\n\n", result.detail_link);
    }

    let _ = writeln!(out, "📋 *Total: {} peraturan HUBLA ditemukan*", results.len());
    out
}

fn status_line(date: &str, status: &str) -> String {
    let lowered = status.to_lowercase();
    if lowered.contains("dicabut") || lowered.contains("tidak berlaku") {
        format!("📅 {date} | 🔴 *{status}*")
    } else if lowered.contains("berlaku") || lowered.contains("aktif") {
        format!("📅 {date} | 🟢 *{status}*")
    } else {
        format!("📅 {date} | {status}")
    }
}

fn cut(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Render the present fields of a detail record, always in the same order.
pub fn format_detail(detail: &DetailRecord, platform: Platform) -> String {
    let mut out = format!("{} *Detail Peraturan JDIH*\n\n", platform.marker());

    if let Some(title) = &detail.title {
        let _ = write!(out, "📋 *Judul:*\n{title}\n\n");
    }

    let status_label = detail.status.as_deref().map(|s| {
        if s.to_lowercase().contains("berlaku") {
            "✅ *Status:*"
        } else {
            "❌ *Status:*"
        }
    });

    let fields: [(Option<&str>, &Option<String>); 13] = [
        (Some("🔢 *Nomor Peraturan:*"), &detail.regulation_number),
        (Some("📄 *Jenis/Bentuk:*"), &detail.regulation_type),
        (Some("📍 *Tempat Penetapan:*"), &detail.enactment_place),
        (Some("📅 *Tanggal Penetapan:*"), &detail.enactment_date),
        (status_label, &detail.status),
        (Some("⏰ *Tanggal Berlaku Efektif:*"), &detail.effective_date),
        (Some("🏷️ *Subjek:*"), &detail.subject),
        (Some("⚖️ *Bidang Hukum:*"), &detail.legal_field),
        (Some("🌐 *Bahasa:*"), &detail.language),
        (Some("📚 *Sumber:*"), &detail.source),
        (Some("🏢 *Lokasi:*"), &detail.location),
        (Some("⬇️ *Jumlah Unduhan:*"), &detail.download_count),
        (Some("👁️ *Jumlah Tayang:*"), &detail.view_count),
    ];
    for (label, value) in fields {
        if let (Some(label), Some(value)) = (label, value) {
            let _ = writeln!(out, "{label} {value}");
        }
    }

    if let Some(link) = &detail.pdf_link {
        if let Some(name) = &detail.file_name {
            let _ = write!(out, "\n📄 *File:* {name}\n");
        }
        let _ = write!(out, "\n🔗 *Link Download:*\n{link}\n");
        out.push_str("\n⬇️ *Download langsung:* Klik link di atas untuk mengunduh file PDF");
    }

    if let Some(summary) = &detail.summary {
        let _ = write!(out, "\n📝 *Ringkasan Isi:*\n{summary}\n");
    }

    out
}

/// Totals by intent kind and platform, plus the five latest entries.
pub fn format_stats(history: &[HistoryEntry], platform: Platform) -> String {
    if history.is_empty() {
        return "📊 Belum ada data pencarian".to_string();
    }

    let kinds = count_in_order(history.iter().map(|e| e.intent_kind.as_str()));
    let platforms = count_in_order(history.iter().map(|e| e.platform));

    let mut out = format!(
        "{} *Statistik Pencarian*\n\n🔍 Total pencarian: {}\n\n📈 Jenis pencarian:\n",
        platform.marker(),
        history.len()
    );
    for (kind, count) in kinds {
        let _ = writeln!(out, "• {kind}: {count}");
    }

    out.push_str("\n📱 Platform:\n");
    for (plat, count) in platforms {
        let _ = writeln!(out, "• {} {plat}: {count}", plat.marker());
    }

    out.push_str("\n🕒 Pencarian terbaru:\n");
    let start = history.len().saturating_sub(STATS_RECENT);
    for entry in &history[start..] {
        let _ = writeln!(
            out,
            "• {} {} ({})",
            entry.platform.marker(),
            entry.query,
            entry.intent_kind
        );
    }
    out
}

/// Tally keys keeping the order in which each first appeared.
fn count_in_order<K: PartialEq>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

/// The ten latest entries, newest first, with `dd/mm HH.MM` times in `offset`.
pub fn format_recent(history: &[HistoryEntry], platform: Platform, offset: FixedOffset) -> String {
    if history.is_empty() {
        return "🕒 Belum ada pencarian terbaru".to_string();
    }

    let mut out = format!("{} *Pencarian Terbaru*\n\n", platform.marker());
    for entry in history.iter().rev().take(RECENT_LIMIT) {
        let local = entry.timestamp.with_timezone(&offset);
        let _ = writeln!(
            out,
            "• {} {} ({}) - {}",
            entry.platform.marker(),
            entry.query,
            entry.intent_kind,
            local.format("%d/%m %H.%M")
        );
    }
    out
}

pub fn format_usage_error(keyword: &str) -> String {
    format!("❌ Silakan berikan parameter untuk perintah {keyword}\n\nContoh: {keyword} [parameter]")
}

pub fn format_error(message: &str) -> String {
    format!("❌ Error: {message}")
}

pub fn format_detail_unavailable() -> String {
    "❌ Tidak dapat mengambil detail peraturan dari link tersebut".to_string()
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Lines are packed greedily; a line that alone exceeds the limit is packed
/// word by word, and a single word longer than the limit is cut. Text that
/// already fits is returned as one chunk.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let sep = usize::from(!current.is_empty());

        if current_len + sep + line_len <= max_chars {
            if sep == 1 {
                current.push('\n');
            }
            current.push_str(line);
            current_len += sep + line_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= max_chars {
            current.push_str(line);
            current_len = line_len;
            continue;
        }

        for word in line.split_whitespace() {
            for piece in hard_cut(word, max_chars) {
                let piece_len = piece.chars().count();
                let sep = usize::from(!current.is_empty());
                if current_len + sep + piece_len > max_chars {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                if !current.is_empty() {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(piece);
                current_len += piece_len;
            }
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks.retain(|c| !c.trim().is_empty());
    chunks
}

fn hard_cut(word: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = word;
    while let Some((idx, _)) = rest.char_indices().nth(max_chars) {
        pieces.push(&rest[..idx]);
        rest = &rest[idx..];
    }
    pieces.push(rest);
    pieces
}
