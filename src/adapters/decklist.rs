//! Parsers for exported decklists: bulk-edit text lists and collection csv exports.

use crate::domain::model::{Board, DeckCard};
use crate::utils::error::{DiffError, Result};
use regex::Regex;
use std::sync::LazyLock;

// 例如 "1 Verdant Command (MH2) 182 #token-base"，數量後可帶 x
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x?\s+(.+)$").expect("entry pattern is valid"));

const FOIL_MARKER: &str = "*F*";

/// 單一檔案的總張數上限，超過視為格式錯誤
pub const MAX_CARDS_PER_FILE: u32 = 1_000_000;

fn add_to_total(total: u32, count: u32) -> Option<u32> {
    total
        .checked_add(count)
        .filter(|sum| *sum <= MAX_CARDS_PER_FILE)
}

/// Parses a bulk-edit decklist.
///
/// `file` is only used to label errors.
pub fn parse_decklist(file: &str, text: &str) -> Result<Vec<DeckCard>> {
    let mut cards = Vec::new();
    let mut board = Board::Mainboard;
    let mut total = 0u32;

    for (idx, raw) in text.trim_start_matches('\u{feff}').lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if let Some(next) = board_header(line) {
            board = next;
            continue;
        }

        let parse_error = |message: &str| DiffError::ParseError {
            file: file.to_string(),
            line: idx + 1,
            message: message.to_string(),
        };

        let caps = ENTRY_RE
            .captures(line)
            .ok_or_else(|| parse_error("expected '<count> <card name>'"))?;
        let count: u32 = caps[1]
            .parse()
            .map_err(|_| parse_error("card count is out of range"))?;

        let (name, tags) = split_entry(&caps[2]);
        if name.is_empty() {
            return Err(parse_error("card name is empty"));
        }
        if count == 0 {
            tracing::debug!("{}:{} has a zero count, skipping {}", file, idx + 1, name);
            continue;
        }
        total = add_to_total(total, count)
            .ok_or_else(|| parse_error("card count exceeds the per-file limit"))?;

        cards.push(DeckCard {
            name,
            count,
            tags,
            board,
        });
    }

    Ok(cards)
}

fn board_header(line: &str) -> Option<Board> {
    match line.trim_end_matches(':').trim().to_lowercase().as_str() {
        "mainboard" => Some(Board::Mainboard),
        "sideboard" => Some(Board::Sideboard),
        "considering" => Some(Board::Considering),
        _ => None,
    }
}

/// 卡名到第一個 (SET) 或 #tag 為止；其後的 #tag 都算標籤
fn split_entry(rest: &str) -> (String, Vec<String>) {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    let mut seen_set = false;
    let mut seen_tag = false;

    for token in rest.split_whitespace() {
        if token == FOIL_MARKER {
            continue;
        }
        seen_tag = seen_tag || token.starts_with('#');
        seen_set = seen_set || (token.starts_with('(') && token.ends_with(')'));

        if seen_tag {
            let tag: String = token.chars().filter(|c| *c != '#' && *c != '!').collect();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        } else if !seen_set {
            name_parts.push(token);
        }
    }

    (name_parts.join(" "), tags)
}

/// Parses a collection csv export. The header must start with `count`, and the
/// third column must be `name`.
pub fn parse_collection_csv(file: &str, data: &[u8]) -> Result<Vec<DeckCard>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let header_error = |message: &str| DiffError::ParseError {
        file: file.to_string(),
        line: 1,
        message: message.to_string(),
    };

    let headers = reader.headers()?.clone();
    if headers.len() < 3 {
        return Err(header_error("not enough header columns in collection csv"));
    }
    if !headers[0].trim().eq_ignore_ascii_case("count") {
        return Err(header_error("first csv column is not count"));
    }
    if !headers[2].trim().eq_ignore_ascii_case("name") {
        return Err(header_error("third csv column is not name"));
    }

    let mut cards = Vec::new();
    let mut total = 0u32;
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = idx + 2;
        let row_error = |message: String| DiffError::ParseError {
            file: file.to_string(),
            line,
            message,
        };

        let count_field = record.get(0).unwrap_or_default().trim();
        let count: u32 = count_field
            .parse()
            .map_err(|_| row_error(format!("invalid count '{}'", count_field)))?;
        let name = record.get(2).unwrap_or_default().trim();
        if name.is_empty() {
            return Err(row_error("card name is empty".to_string()));
        }
        if count == 0 {
            continue;
        }
        total = add_to_total(total, count)
            .ok_or_else(|| row_error("card count exceeds the per-file limit".to_string()))?;

        cards.push(DeckCard {
            name: name.to_string(),
            count,
            tags: Vec::new(),
            board: Board::Mainboard,
        });
    }

    Ok(cards)
}
