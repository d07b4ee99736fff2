use crate::core::card_list::CardList;

/// Parses a topoff list: one card name per line, each line adds one copy.
/// Blank lines and `#` comments are skipped.
pub fn parse_topoff(text: &str) -> CardList {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}
