use regex::Regex;
use std::sync::LazyLock;

use crate::services::text_normalizer::{strip_emphasis, until_stable};

/// Most items shown for one recommendation block.
pub const MAX_ITEMS: usize = 5;
/// Segments this short are dropped as noise. Counted on the trimmed text plus
/// one character when the split left whitespace behind.
pub const MIN_ITEM_CHARS: usize = 15;

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)actionable recommendation:").expect("valid regex"));

/// List numbers (`2. `), bullets, list hyphens and paragraph breaks.
static ITEM_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\b\d+\.\s|•|^[ \t]*-|[ \t]-[ \t]|\r?\n[ \t]*\r?\n").expect("valid regex")
});

static RESIDUAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.|[•\-*])\s*").expect("valid regex"));

/// Split generated advice into at most [`MAX_ITEMS`] action items.
///
/// Never returns an empty list for text that is non-empty after cleanup: when
/// no segment survives the length filter, the whole cleaned text is the only item.
pub fn extract(raw: &str) -> Vec<String> {
    let cleaned = until_stable(raw, |text| {
        LABEL.replace_all(&strip_emphasis(text), "").into_owned()
    });

    let items: Vec<String> = ITEM_SEPARATOR
        .split(&cleaned)
        .filter(|segment| item_length(segment) > MIN_ITEM_CHARS)
        .map(clean_item)
        .filter(|item| !item.is_empty())
        .take(MAX_ITEMS)
        .collect();

    if !items.is_empty() {
        return items;
    }

    let whole = cleaned.trim();
    if whole.is_empty() {
        Vec::new()
    } else {
        vec![whole.to_string()]
    }
}

fn item_length(segment: &str) -> usize {
    let trimmed = segment.trim();
    trimmed.chars().count() + usize::from(trimmed.len() < segment.len())
}

fn clean_item(segment: &str) -> String {
    let trimmed = segment.trim();
    RESIDUAL_MARKER.replace(trimmed, "").trim().to_string()
}
