//! # Block Model
//!
//! The editable representation of a topic: an ordered [`Document`] of typed
//! [`Block`]s. Block order is render order.
//!
//! ## Key Invariants
//!
//! - Block ids are unique within a document (they come from an
//!   [`IdGenerator`](crate::ids::IdGenerator), never from stored markup)
//! - `content` of heading, text and note blocks is an opaque inline markup
//!   fragment; it is never decomposed
//! - `content` of code blocks and snippets is raw text
//! - A document built by the parser is never empty

pub mod editing;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::IdGenerator;

pub use editing::Move;

pub const DEFAULT_LANGUAGE: &str = "javascript";
pub const DEFAULT_SNIPPET_LABEL: &str = "Index";

/// Identifier of a block, snippet or carousel image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Callout level of a note block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLevel {
    #[default]
    Info,
    Warning,
    Tip,
}

impl NoteLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteLevel::Info => "info",
            NoteLevel::Warning => "warning",
            NoteLevel::Tip => "tip",
        }
    }

    /// Level named by a `type` attribute. Unknown names fold to `Info`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("warning") => NoteLevel::Warning,
            Some(v) if v.eq_ignore_ascii_case("tip") => NoteLevel::Tip,
            _ => NoteLevel::Info,
        }
    }
}

/// One labeled, language-tagged code sample inside a multi-code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: BlockId,
    pub label: String,
    pub language: String,
    pub content: String,
}

impl Snippet {
    /// The snippet a freshly created multi-code block starts with.
    pub fn initial(ids: &mut dyn IdGenerator) -> Self {
        Self {
            id: ids.generate(),
            label: DEFAULT_SNIPPET_LABEL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            content: String::new(),
        }
    }

    fn content_eq(&self, other: &Snippet) -> bool {
        self.label == other.label
            && self.language == other.language
            && self.content == other.content
    }
}

/// One slide of a carousel block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselImage {
    pub id: BlockId,
    pub url: String,
    pub caption: String,
}

impl CarouselImage {
    fn content_eq(&self, other: &CarouselImage) -> bool {
        self.url == other.url && self.caption == other.caption
    }
}

/// The variant of a block without its payload, as offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Heading,
    Text,
    Code,
    MultiCode,
    Note,
    Image,
    Carousel,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::Code,
        BlockKind::MultiCode,
        BlockKind::Note,
        BlockKind::Image,
        BlockKind::Carousel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Text => "text",
            BlockKind::Code => "code",
            BlockKind::MultiCode => "multi-code",
            BlockKind::Note => "note",
            BlockKind::Image => "image",
            BlockKind::Carousel => "carousel",
        }
    }
}

/// One unit of authored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Heading {
        id: BlockId,
        content: String,
    },
    Text {
        id: BlockId,
        content: String,
    },
    Code {
        id: BlockId,
        content: String,
        language: String,
    },
    MultiCode {
        id: BlockId,
        snippets: Vec<Snippet>,
    },
    Note {
        id: BlockId,
        content: String,
        level: NoteLevel,
    },
    Image {
        id: BlockId,
        url: String,
    },
    Carousel {
        id: BlockId,
        images: Vec<CarouselImage>,
    },
}

impl Block {
    /// A new, empty block of `kind` with the editor's construction defaults.
    pub fn new(kind: BlockKind, ids: &mut dyn IdGenerator) -> Self {
        let id = ids.generate();
        match kind {
            BlockKind::Heading => Block::Heading {
                id,
                content: String::new(),
            },
            BlockKind::Text => Block::Text {
                id,
                content: String::new(),
            },
            BlockKind::Code => Block::Code {
                id,
                content: String::new(),
                language: DEFAULT_LANGUAGE.to_string(),
            },
            BlockKind::MultiCode => Block::MultiCode {
                id,
                snippets: vec![Snippet::initial(ids)],
            },
            BlockKind::Note => Block::Note {
                id,
                content: String::new(),
                level: NoteLevel::default(),
            },
            BlockKind::Image => Block::Image {
                id,
                url: String::new(),
            },
            BlockKind::Carousel => Block::Carousel {
                id,
                images: Vec::new(),
            },
        }
    }

    pub fn id(&self) -> &BlockId {
        match self {
            Block::Heading { id, .. }
            | Block::Text { id, .. }
            | Block::Code { id, .. }
            | Block::MultiCode { id, .. }
            | Block::Note { id, .. }
            | Block::Image { id, .. }
            | Block::Carousel { id, .. } => id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::Text { .. } => BlockKind::Text,
            Block::Code { .. } => BlockKind::Code,
            Block::MultiCode { .. } => BlockKind::MultiCode,
            Block::Note { .. } => BlockKind::Note,
            Block::Image { .. } => BlockKind::Image,
            Block::Carousel { .. } => BlockKind::Carousel,
        }
    }

    /// Structural equality: same variant and same ordered fields, ignoring
    /// every id (block, snippet and image ids are regenerated on each parse).
    pub fn content_eq(&self, other: &Block) -> bool {
        match (self, other) {
            (Block::Heading { content: a, .. }, Block::Heading { content: b, .. })
            | (Block::Text { content: a, .. }, Block::Text { content: b, .. }) => a == b,
            (
                Block::Code {
                    content: a,
                    language: la,
                    ..
                },
                Block::Code {
                    content: b,
                    language: lb,
                    ..
                },
            ) => a == b && la == lb,
            (Block::MultiCode { snippets: a, .. }, Block::MultiCode { snippets: b, .. }) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
            }
            (
                Block::Note {
                    content: a,
                    level: la,
                    ..
                },
                Block::Note {
                    content: b,
                    level: lb,
                    ..
                },
            ) => a == b && la == lb,
            (Block::Image { url: a, .. }, Block::Image { url: b, .. }) => a == b,
            (Block::Carousel { images: a, .. }, Block::Carousel { images: b, .. }) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
            }
            _ => false,
        }
    }
}

/// Ordered sequence of blocks making up one topic's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Structural equality of two documents, ignoring ids.
    pub fn content_eq(&self, other: &Document) -> bool {
        self.blocks.len() == other.blocks.len()
            && self
                .blocks
                .iter()
                .zip(&other.blocks)
                .all(|(a, b)| a.content_eq(b))
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use rstest::rstest;

    #[rstest]
    #[case(BlockKind::Heading)]
    #[case(BlockKind::Text)]
    #[case(BlockKind::Code)]
    #[case(BlockKind::MultiCode)]
    #[case(BlockKind::Note)]
    #[case(BlockKind::Image)]
    #[case(BlockKind::Carousel)]
    fn test_new_block_has_requested_kind(#[case] kind: BlockKind) {
        let mut ids = SequentialIds::new("b");
        let block = Block::new(kind, &mut ids);
        assert_eq!(block.kind(), kind);
        assert_eq!(block.id().as_str(), "b1");
    }

    #[test]
    fn test_construction_defaults() {
        let mut ids = SequentialIds::new("b");

        let Block::Code { language, .. } = Block::new(BlockKind::Code, &mut ids) else {
            panic!("expected code block");
        };
        assert_eq!(language, "javascript");

        let Block::MultiCode { snippets, .. } = Block::new(BlockKind::MultiCode, &mut ids) else {
            panic!("expected multi-code block");
        };
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].label, "Index");
        assert_eq!(snippets[0].language, "javascript");

        let Block::Note { level, .. } = Block::new(BlockKind::Note, &mut ids) else {
            panic!("expected note block");
        };
        assert_eq!(level, NoteLevel::Info);

        let Block::Carousel { images, .. } = Block::new(BlockKind::Carousel, &mut ids) else {
            panic!("expected carousel block");
        };
        assert!(images.is_empty());
    }

    #[rstest]
    #[case(None, NoteLevel::Info)]
    #[case(Some("info"), NoteLevel::Info)]
    #[case(Some("warning"), NoteLevel::Warning)]
    #[case(Some("TIP"), NoteLevel::Tip)]
    #[case(Some("error"), NoteLevel::Info)]
    fn test_note_level_from_attr(#[case] attr: Option<&str>, #[case] expected: NoteLevel) {
        assert_eq!(NoteLevel::from_attr(attr), expected);
    }

    #[test]
    fn test_content_eq_ignores_ids() {
        let a = Block::Code {
            id: "one".into(),
            content: "x".into(),
            language: "go".into(),
        };
        let b = Block::Code {
            id: "two".into(),
            content: "x".into(),
            language: "go".into(),
        };
        let c = Block::Code {
            id: "one".into(),
            content: "x".into(),
            language: "rust".into(),
        };
        assert!(a.content_eq(&b));
        assert!(!a.content_eq(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_eq_different_variants() {
        let text = Block::Text {
            id: "a".into(),
            content: "hi".into(),
        };
        let heading = Block::Heading {
            id: "a".into(),
            content: "hi".into(),
        };
        assert!(!text.content_eq(&heading));
    }

    #[test]
    fn test_block_serializes_with_type_tag() {
        let block = Block::Note {
            id: "n1".into(),
            content: "careful".into(),
            level: NoteLevel::Warning,
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "note");
        assert_eq!(json["level"], "warning");
        assert_eq!(json["id"], "n1");
    }
}
