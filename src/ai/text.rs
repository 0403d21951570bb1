//! Cleanup and parsing of model output.

use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[IMAGE: .*?\]").expect("valid image marker pattern"));
static EXTRA_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("valid blank line pattern"));
static SCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Score:\s*(\d+)").expect("valid score pattern"));
static ANALYSIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Analysis:\s*(.*)").expect("valid analysis pattern"));

/// Score assumed when the model omits one.
pub const DEFAULT_ORIGINALITY_SCORE: u32 = 50;

/// Scores above this count as original.
pub const ORIGINALITY_THRESHOLD: u32 = 70;

/// Remove `[IMAGE: ...]` placeholders and squeeze the gaps they leave.
pub fn strip_image_markers(content: &str) -> String {
    let without = IMAGE_MARKER.replace_all(content, "");
    EXTRA_BLANK_LINES.replace_all(&without, "\n\n").into_owned()
}

/// Split a headline list into at most five clean titles.
///
/// Bullets, quotes and `1.` / `1)` numbering are removed.
pub fn parse_headlines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_matches(|c: char| matches!(c, ' ' | '-' | '•' | '\t' | '"')))
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut chars = line.chars();
            match (chars.next(), chars.next()) {
                (Some(d), Some('.' | ')')) if d.is_ascii_digit() => chars.as_str().trim(),
                _ => line,
            }
        })
        .filter(|line| !line.is_empty())
        .take(5)
        .map(str::to_string)
        .collect()
}

/// Result of an originality review.
#[derive(Debug, Clone, PartialEq)]
pub struct Originality {
    pub score: u32,
    pub analysis: String,
}

impl Originality {
    pub fn is_original(&self) -> bool {
        self.score > ORIGINALITY_THRESHOLD
    }
}

/// Read a `Score: N` / `Analysis: ...` reply.
pub fn parse_originality(text: &str) -> Originality {
    let score = SCORE
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(DEFAULT_ORIGINALITY_SCORE);
    let analysis = ANALYSIS
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| "Could not determine analysis.".to_string());

    Originality { score, analysis }
}

/// Drop a `data:image/...;base64,` prefix if present.
pub fn strip_data_url_prefix(image: &str) -> &str {
    match image.split(',').nth(1) {
        Some(payload) => payload,
        None => image,
    }
}

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
