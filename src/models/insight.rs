use serde::{Deserialize, Serialize};

/// Structured answer of the spending-analysis and budget-recommendations requests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendingInsight {
    pub insight: String,
    pub category: String,
    pub recommendation: String,
}

/// Free-form question sent to the insight service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightQuery {
    pub query: String,
    pub context: String,
}

/// Reply to an [`InsightQuery`]. Every field is optional upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightReply {
    pub insight: Option<String>,
    pub message: Option<String>,
    pub category: Option<String>,
    pub recommendation: Option<String>,
}

impl InsightReply {
    pub fn from_insight(text: impl Into<String>) -> Self {
        Self {
            insight: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn from_message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Default::default()
        }
    }

    /// Text to show for this reply: `insight` first, then `message`, skipping blanks.
    pub fn display_text(&self) -> Option<&str> {
        [self.insight.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_prefers_insight() {
        let reply = InsightReply {
            insight: Some("Spend less on food.".into()),
            message: Some("Hello".into()),
            ..Default::default()
        };
        assert_eq!(reply.display_text(), Some("Spend less on food."));
    }

    #[test]
    fn test_display_text_skips_blank_insight() {
        let reply = InsightReply {
            insight: Some("   ".into()),
            message: Some(" Try a weekly budget. ".into()),
            ..Default::default()
        };
        assert_eq!(reply.display_text(), Some("Try a weekly budget."));
    }

    #[test]
    fn test_display_text_none_when_empty() {
        assert_eq!(InsightReply::default().display_text(), None);
        let reply: InsightReply = serde_json::from_str(r#"{"message": ""}"#).unwrap();
        assert_eq!(reply.display_text(), None);
    }
}
