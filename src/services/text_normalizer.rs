//! Cleanup of free text returned by the insight service.
//!
//! The generator wraps words in markdown emphasis and prefixes sections with
//! labels such as `Financial Insight:`. [`normalize`] turns that into plain
//! sentences, one paragraph each.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Fragments this short (in characters) are dropped as noise.
pub const MIN_FRAGMENT_CHARS: usize = 10;

static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex"));
static LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)category:|financial insight:|actionable recommendation:").expect("valid regex")
});

/// Remove `**strong**` and `*emphasis*` markup, keeping the inner text.
pub fn strip_emphasis(text: &str) -> String {
    let text = STRONG.replace_all(text, "$1");
    EMPHASIS.replace_all(&text, "$1").into_owned()
}

/// Apply `step` until the text stops changing.
pub(crate) fn until_stable(text: &str, step: impl Fn(&str) -> String) -> String {
    let mut current = text.to_string();
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_labels(text: &str) -> Cow<'_, str> {
    LABELS.replace_all(text, "")
}

/// Turn generated text into display paragraphs.
///
/// Markup and boilerplate labels are removed, the text is cut into sentences
/// on `". "`, sentences of at most [`MIN_FRAGMENT_CHARS`] characters are
/// dropped, each kept sentence ends with a period and they are joined by blank
/// lines. `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let cleaned = until_stable(raw, |text| strip_labels(&strip_emphasis(text)).into_owned());

    cleaned
        .split(". ")
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > MIN_FRAGMENT_CHARS)
        .map(|fragment| {
            if fragment.ends_with('.') {
                fragment.to_string()
            } else {
                format!("{}.", fragment)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n "), "");
    }

    #[test]
    fn test_strips_markup_and_labels() {
        let raw = "**Financial Insight:** You spent *most* of your money on food. \
                   Category: Spending. Actionable Recommendation: Cook at home three nights a week";
        assert_eq!(
            normalize(raw),
            "You spent most of your money on food.\n\nCook at home three nights a week."
        );
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let raw = "FINANCIAL INSIGHT: Your savings rate improved this month";
        assert_eq!(normalize(raw), "Your savings rate improved this month.");
    }

    #[test]
    fn test_short_fragments_are_dropped() {
        // "Ok then" is 7 characters, "0123456789" exactly 10
        let raw = "Ok then. 0123456789. Groceries went up by a third";
        assert_eq!(normalize(raw), "Groceries went up by a third.");
    }

    #[test]
    fn test_only_noise_gives_empty_output() {
        assert_eq!(normalize("Hi. Yes. **No**"), "");
    }

    #[test]
    fn test_existing_period_is_kept() {
        let raw = "Rent is your largest expense this year.";
        assert_eq!(normalize(raw), "Rent is your largest expense this year.");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "plain text without any period",
            "**Bold** start. *Italic* middle sentence here. End",
            "Category: Saving. Financial Insight: You saved 20% more than last month. Keep it up!",
            "CatCategory:egory: nested label trick sentence",
            "***triple*** emphasis case should be stable",
            "a* b. c*d and then some more words follow",
            "Line one is long enough.\nLine two is also long enough. Short. Another long sentence here",
            "Amounts like ₹1,200.50 stay intact. Multi-byte text: café spending rose",
            "trailing separator sentence long. ",
            "** ** odd stars ** everywhere * here",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_nested_labels_are_fully_removed() {
        assert_eq!(
            normalize("CatCategory:egory: nested label trick sentence"),
            "nested label trick sentence."
        );
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("**a** and *b*"), "a and b");
        assert_eq!(strip_emphasis("5 * 3"), "5 * 3");
    }
}
