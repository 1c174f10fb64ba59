use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `_type` of ordinary text blocks. Every other `_type` is a custom block.
pub const TEXT_BLOCK: &str = "block";

/// One entry of a rich-text body, as stored in the content store.
///
/// Only text blocks (`_type == "block"`) use `style`, `children` and
/// `mark_defs`. Custom block types keep their remaining fields in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "_type")]
    pub block_type: String,
    #[serde(rename = "_key", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    /// Raw `listItem` value. Schemas may define kinds beyond bullet/number.
    #[serde(default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn is_text(&self) -> bool {
        self.block_type == TEXT_BLOCK
    }

    /// List kind of a text block, if it is an item of a bullet or numbered
    /// list. Unrecognised kinds yield `None`.
    pub fn list_kind(&self) -> Option<ListKind> {
        if !self.is_text() {
            return None;
        }
        self.list_item.as_deref().and_then(ListKind::parse)
    }

    /// Tag used to look up a renderer: `li` for bullet and numbered list
    /// items, the style for other text blocks (`normal` when unset), and
    /// `_type` for anything else.
    pub fn tag(&self) -> &str {
        if !self.is_text() {
            return &self.block_type;
        }
        if self.list_kind().is_some() {
            return "li";
        }
        self.style.as_deref().unwrap_or("normal")
    }

    /// Looks up a mark definition referenced by a span.
    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|m| m.key == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "bullet" => Some(ListKind::Bullet),
            "number" => Some(ListKind::Number),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type", default = "span_type")]
    pub span_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

fn span_type() -> String {
    "span".to_string()
}

/// Annotation attached to spans by key, e.g. a hyperlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub mark_type: String,
    #[serde(default)]
    pub href: Option<String>,
}
