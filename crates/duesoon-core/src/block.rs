//! Notification blocks ("embeds") produced by the composer.
//!
//! Blocks serialize to the embed shape accepted by Discord-compatible
//! webhooks. Absent optional parts are omitted from the JSON document.

use serde::{Deserialize, Serialize};

/// One styled unit of the outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationBlock {
    /// Block title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Block body text (markdown).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sidebar color as a 24-bit RGB integer.
    pub color: u32,
    /// Footer line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<BlockFooter>,
    /// Supplementary name/value fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<BlockField>,
}

/// Footer of a [`NotificationBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFooter {
    /// Footer text.
    pub text: String,
}

/// A name/value field attached to a [`NotificationBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockField {
    /// Field label.
    pub name: String,
    /// Field content.
    pub value: String,
    /// Whether the field may be laid out next to other inline fields.
    pub inline: bool,
}

impl NotificationBlock {
    /// Creates a block with only a color set.
    pub fn new(color: u32) -> Self {
        Self {
            title: None,
            description: None,
            color,
            footer: None,
            fields: Vec::new(),
        }
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the footer text.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(BlockFooter { text: text.into() });
        self
    }

    /// Builder method to append a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(BlockField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_absent_parts() {
        let block = NotificationBlock::new(10197915).with_description("more");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "description": "more", "color": 10197915 })
        );
    }

    #[test]
    fn serializes_footer_and_fields() {
        let block = NotificationBlock::new(1)
            .with_title("t")
            .with_footer("bot")
            .with_field("note", "text", false);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["footer"]["text"], "bot");
        assert_eq!(json["fields"][0]["name"], "note");
        assert_eq!(json["fields"][0]["inline"], false);
    }

    #[test]
    fn deserializes_without_fields() {
        let block: NotificationBlock =
            serde_json::from_str(r#"{"title":"x","color":3447003}"#).unwrap();
        assert_eq!(block.title.as_deref(), Some("x"));
        assert!(block.fields.is_empty());
        assert!(block.footer.is_none());
    }
}
