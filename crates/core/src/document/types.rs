//! Atlassian Document Format node types.
//!
//! Only the nodes and marks the description template uses are modelled.
//! Serialisation produces the JSON Jira's REST API v3 accepts for rich-text
//! fields.

use serde::{Deserialize, Serialize};

/// Root `doc` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "doc")]
pub struct Document {
    pub version: u32,
    pub content: Vec<Block>,
}

impl Document {
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            version: 1,
            content,
        }
    }

    /// Top-level paragraphs, in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &[Inline]> {
        self.content.iter().filter_map(|block| match block {
            Block::Paragraph { content } => Some(content.as_slice()),
            _ => None,
        })
    }

    /// Every mention node in the document, including inside tables.
    pub fn mentions(&self) -> Vec<&MentionAttrs> {
        let mut found = Vec::new();
        for block in &self.content {
            block.collect_mentions(&mut found);
        }
        found
    }
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        content: Vec<Inline>,
    },
    Table {
        attrs: TableAttrs,
        content: Vec<TableRow>,
    },
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph { content }
    }

    fn collect_mentions<'a>(&'a self, found: &mut Vec<&'a MentionAttrs>) {
        match self {
            Block::Paragraph { content } => {
                found.extend(content.iter().filter_map(Inline::as_mention));
            }
            Block::Table { content, .. } => {
                for cell in content.iter().flat_map(|row| row.content.iter()) {
                    for block in cell.content() {
                        block.collect_mentions(found);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAttrs {
    pub is_number_column_enabled: bool,
    pub layout: String,
}

impl Default for TableAttrs {
    fn default() -> Self {
        Self {
            is_number_column_enabled: false,
            layout: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "tableRow")]
pub struct TableRow {
    pub content: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TableCell {
    TableHeader { content: Vec<Block> },
    TableCell { content: Vec<Block> },
}

impl TableCell {
    pub fn content(&self) -> &[Block] {
        match self {
            TableCell::TableHeader { content } | TableCell::TableCell { content } => content,
        }
    }
}

/// Inline nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
    Mention {
        attrs: MentionAttrs,
    },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: vec![Mark::Strong],
        }
    }

    /// Text rendered as a hyperlink to `href`.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: vec![Mark::Link {
                attrs: LinkAttrs { href: href.into() },
            }],
        }
    }

    pub fn mention(id: impl Into<String>, text: impl Into<String>) -> Self {
        Inline::Mention {
            attrs: MentionAttrs {
                id: id.into(),
                text: text.into(),
            },
        }
    }

    /// Plain text of a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Inline::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn as_mention(&self) -> Option<&MentionAttrs> {
        match self {
            Inline::Mention { attrs } => Some(attrs),
            _ => None,
        }
    }
}

/// Reference to a person in the ticketing system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionAttrs {
    /// Account identifier; empty when the owner could not be resolved.
    pub id: String,
    /// Display text.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Strong,
    Link { attrs: LinkAttrs },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
}
