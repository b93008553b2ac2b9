/*!
 * Response parsing.
 *
 * Models do not reliably produce well-formed output, so the only structural assumption is
 * that a translation line starts with its number followed by `.`, `:` or `)`. Everything
 * else is treated as commentary and ignored. Numbers may arrive out of order or with
 * gaps; a gap leaves an empty placeholder so later lines keep their positions.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// @const: Numbered answer line, e.g. "3. text", "3: text", "3) text"
static NUMBERED_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*[.:)]\s*(.+)$").unwrap()
});

/// Outcome of parsing one provider response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedResponse {
    /// Exactly `expected_count` entries; empty strings where nothing usable was found
    pub translations: Vec<String>,

    /// Number of lines that matched the numbered pattern
    pub matched_lines: usize,

    /// Highest line number seen, 0 when nothing matched
    pub highest_index: usize,
}

impl ParsedResponse {
    /// Entries that carry a translation
    pub fn non_empty_count(&self) -> usize {
        self.translations.iter().filter(|t| !t.is_empty()).count()
    }

    /// True when the numbering did not line up with the expected count
    pub fn is_mismatch(&self) -> bool {
        self.highest_index != self.translations.len()
    }
}

/// Parse a response into exactly `expected_count` translations
///
/// A repeated number overwrites the earlier line. Line numbers beyond `expected_count`
/// are dropped; missing ones become empty strings. Surrounding matching quotes are
/// removed from the captured text.
pub fn parse_response(response: &str, expected_count: usize) -> ParsedResponse {
    let mut translations = vec![String::new(); expected_count];
    let mut matched_lines = 0;
    let mut highest_index = 0;

    for line in response.lines() {
        let Some(caps) = NUMBERED_LINE_REGEX.captures(line.trim()) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<usize>() else {
            continue;
        };
        if number == 0 {
            continue;
        }

        matched_lines += 1;
        highest_index = highest_index.max(number);

        if number <= expected_count {
            translations[number - 1] = strip_matching_quotes(caps[2].trim()).to_string();
        }
    }

    if highest_index != expected_count {
        warn!("Translation count mismatch: expected {}, got {}", expected_count, highest_index);
    } else {
        debug!("Parsed {} numbered lines", matched_lines);
    }

    ParsedResponse {
        translations,
        matched_lines,
        highest_index,
    }
}

/// Parse a response, see [`parse_response`], keeping only the translations
pub fn parse_translation_response(response: &str, expected_count: usize) -> Vec<String> {
    parse_response(response, expected_count).translations
}

// @strips: One pair of surrounding "..." or '...'
fn strip_matching_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
