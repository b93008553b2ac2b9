use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{warn, debug};
use crate::errors::SubtitleError;

// @module: Subtitle codec (SRT parse and serialize)

// @const: Byte-order marker written at the start of every output document
pub const BYTE_ORDER_MARK: char = '\u{feff}';

// @const: Line ending used for every output document
pub const OUTPUT_LINE_ENDING: &str = "\r\n";

// @const: Single SRT timestamp, comma or period before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})$").unwrap()
});

// @const: SRT timing line, anything after the end timestamp is ignored
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2,}:\d{2}:\d{2}[,.]\d{3})(?:\s|$)").unwrap()
});

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Sequence number as found in the source document
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Original text, one or more lines joined by '\n'
    pub source_text: String,

    // @field: Translation, absent until the cue's batch has been processed
    pub translated_text: Option<String>,
}

impl Cue {
    /// Creates an untranslated cue
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, source_text: impl Into<String>) -> Self {
        Cue {
            seq_num,
            start_time_ms,
            end_time_ms,
            source_text: source_text.into(),
            translated_text: None,
        }
    }

    // @creates: Validated cue
    // @validates: end_time >= start_time
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, source_text: impl Into<String>) -> Result<Self, SubtitleError> {
        if end_time_ms < start_time_ms {
            return Err(SubtitleError::InvalidTimeRange {
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }
        Ok(Self::new(seq_num, start_time_ms, end_time_ms, source_text))
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_time_ms)
    }

    /// Record a translation obtained from the completion service
    pub fn apply_translation(&mut self, text: impl Into<String>) {
        self.translated_text = Some(text.into());
    }

    /// Record the source text as the translation, used when none could be obtained
    pub fn apply_fallback(&mut self) {
        self.translated_text = Some(self.source_text.clone());
    }

    /// True when the cue carries a translation that differs from its source
    pub fn is_translated(&self) -> bool {
        self.translated_text
            .as_deref()
            .is_some_and(|t| !t.is_empty() && t != self.source_text)
    }

    /// Text to emit when serializing
    pub fn output_text(&self, prefer_translated: bool) -> &str {
        match self.translated_text.as_deref() {
            Some(t) if prefer_translated && !t.is_empty() => t,
            _ => &self.source_text,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} {} --> {} {:?}", self.seq_num, self.format_start_time(), self.format_end_time(), self.source_text)
    }
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) to milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
    let trimmed = timestamp.trim();
    let caps = TIMESTAMP_REGEX.captures(trimmed)
        .ok_or_else(|| SubtitleError::InvalidTimestamp(trimmed.to_string()))?;

    let field = |idx: usize| -> Result<u64, SubtitleError> {
        caps[idx].parse::<u64>()
            .map_err(|_| SubtitleError::InvalidTimestamp(trimmed.to_string()))
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;

    hours.checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(|| SubtitleError::InvalidTimestamp(trimmed.to_string()))
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let millis = ms % 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Collection of parsed cues plus the number of blocks that had to be skipped
#[derive(Debug, Clone, Default)]
pub struct SubtitleCollection {
    /// Cues in document order
    pub cues: Vec<Cue>,

    /// Blocks dropped because they were malformed
    pub skipped_blocks: usize,
}

impl SubtitleCollection {
    /// Parse a raw SRT document
    ///
    /// Line endings and a leading byte-order marker are normalized first. Blocks are
    /// separated by one or more blank lines; each needs an index line, a timing line and at
    /// least one text line. Malformed blocks are skipped with a warning and counted. The
    /// original sequence numbers are kept as-is.
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize_document(raw);
        let mut collection = SubtitleCollection::default();

        for (block_idx, block) in split_blocks(&normalized).into_iter().enumerate() {
            match parse_block(&block) {
                Ok(cue) => collection.cues.push(cue),
                Err(reason) => {
                    warn!("Skipping malformed cue block {}: {}", block_idx + 1, reason);
                    collection.skipped_blocks += 1;
                }
            }
        }

        debug!("Parsed {} cues ({} blocks skipped)", collection.cues.len(), collection.skipped_blocks);
        collection
    }

    /// Number of cues
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// True when no block could be parsed
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Serialize the collection, see [`serialize_cues`]
    pub fn to_srt_string(&self, prefer_translated: bool) -> String {
        serialize_cues(&self.cues, prefer_translated)
    }
}

/// Serialize cues back to SRT
///
/// Cues are renumbered from 1. The output starts with a byte-order marker and uses CRLF
/// throughout, including inside multi-line cue text.
pub fn serialize_cues(cues: &[Cue], prefer_translated: bool) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(cues.len() * 4);

    for (i, cue) in cues.iter().enumerate() {
        lines.push((i + 1).to_string());
        lines.push(format!("{} --> {}", cue.format_start_time(), cue.format_end_time()));
        lines.extend(cue.output_text(prefer_translated).split('\n').map(str::to_string));
        lines.push(String::new());
    }

    let mut output = String::with_capacity(lines.iter().map(|l| l.len() + 2).sum::<usize>() + 3);
    output.push(BYTE_ORDER_MARK);
    output.push_str(&lines.join(OUTPUT_LINE_ENDING));
    output
}

// @normalizes: BOM removal and LF line endings
fn normalize_document(raw: &str) -> String {
    let without_bom = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw);
    without_bom.replace("\r\n", "\n").replace('\r', "\n")
}

// @splits: Blank-line separated blocks of non-blank lines
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_block(lines: &[&str]) -> Result<Cue, String> {
    if lines.len() < 3 {
        return Err(format!("expected at least 3 lines, found {}", lines.len()));
    }

    let index_line = lines[0].trim();
    let seq_num: usize = index_line.parse()
        .map_err(|_| format!("invalid index line {:?}", index_line))?;
    if seq_num == 0 {
        return Err("sequence numbers start at 1, found 0".to_string());
    }

    let timing_line = lines[1].trim();
    let caps = TIMING_LINE_REGEX.captures(timing_line)
        .ok_or_else(|| format!("bad timing line {:?} in cue {}", timing_line, seq_num))?;
    let start_time_ms = parse_timestamp(&caps[1]).map_err(|e| e.to_string())?;
    let end_time_ms = parse_timestamp(&caps[2]).map_err(|e| e.to_string())?;

    let text = lines[2..].join("\n").trim().to_string();

    Cue::new_validated(seq_num, start_time_ms, end_time_ms, text).map_err(|e| e.to_string())
}
