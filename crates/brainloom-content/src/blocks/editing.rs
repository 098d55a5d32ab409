//! Editor operations.
//!
//! Every operation takes the current value by reference and returns a new one;
//! nothing is mutated in place, so a block being moved can never alias the
//! block it is swapped with. Operations that target a missing id return an
//! unchanged copy.

use crate::ids::IdGenerator;

use super::{Block, BlockId, CarouselImage, DEFAULT_LANGUAGE, Document, Snippet};

pub const NEW_SNIPPET_LABEL: &str = "New Snippet";
pub const NEW_SLIDE_CAPTION: &str = "Step description...";

/// Direction for [`Document::with_block_moved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
}

impl Document {
    pub fn with_block_appended(&self, block: Block) -> Document {
        let mut blocks = self.blocks.clone();
        blocks.push(block);
        Document::new(blocks)
    }

    /// Insert at `index`, clamped to the end of the document.
    pub fn with_block_inserted(&self, index: usize, block: Block) -> Document {
        let mut blocks = self.blocks.clone();
        blocks.insert(index.min(blocks.len()), block);
        Document::new(blocks)
    }

    /// Swap the block with its neighbour. Moving the first block up or the
    /// last block down leaves the order unchanged.
    pub fn with_block_moved(&self, id: &BlockId, direction: Move) -> Document {
        let mut blocks = self.blocks.clone();
        if let Some(i) = self.position(id) {
            match direction {
                Move::Up if i > 0 => blocks.swap(i, i - 1),
                Move::Down if i + 1 < blocks.len() => blocks.swap(i, i + 1),
                _ => {}
            }
        }
        Document::new(blocks)
    }

    pub fn with_block_removed(&self, id: &BlockId) -> Document {
        Document::new(
            self.blocks
                .iter()
                .filter(|b| b.id() != id)
                .cloned()
                .collect(),
        )
    }

    /// Replace the block sharing `block`'s id.
    pub fn with_block_replaced(&self, block: Block) -> Document {
        Document::new(
            self.blocks
                .iter()
                .map(|b| {
                    if b.id() == block.id() {
                        block.clone()
                    } else {
                        b.clone()
                    }
                })
                .collect(),
        )
    }
}

impl Block {
    /// Append an empty snippet to a multi-code block. Other blocks are returned unchanged.
    pub fn with_snippet_added(&self, ids: &mut dyn IdGenerator) -> Block {
        match self {
            Block::MultiCode { id, snippets } => {
                let mut snippets = snippets.clone();
                snippets.push(Snippet {
                    id: ids.generate(),
                    label: NEW_SNIPPET_LABEL.to_string(),
                    language: DEFAULT_LANGUAGE.to_string(),
                    content: String::new(),
                });
                Block::MultiCode {
                    id: id.clone(),
                    snippets,
                }
            }
            other => other.clone(),
        }
    }

    /// Remove a snippet. The last remaining snippet is never removed.
    pub fn with_snippet_removed(&self, snippet_id: &BlockId) -> Block {
        match self {
            Block::MultiCode { id, snippets } if snippets.len() > 1 => Block::MultiCode {
                id: id.clone(),
                snippets: snippets
                    .iter()
                    .filter(|s| &s.id != snippet_id)
                    .cloned()
                    .collect(),
            },
            other => other.clone(),
        }
    }

    pub fn with_snippet_updated(&self, snippet: Snippet) -> Block {
        match self {
            Block::MultiCode { id, snippets } => Block::MultiCode {
                id: id.clone(),
                snippets: snippets
                    .iter()
                    .map(|s| {
                        if s.id == snippet.id {
                            snippet.clone()
                        } else {
                            s.clone()
                        }
                    })
                    .collect(),
            },
            other => other.clone(),
        }
    }

    /// Append a slide to a carousel block.
    pub fn with_image_added(&self, url: impl Into<String>, ids: &mut dyn IdGenerator) -> Block {
        match self {
            Block::Carousel { id, images } => {
                let mut images = images.clone();
                images.push(CarouselImage {
                    id: ids.generate(),
                    url: url.into(),
                    caption: NEW_SLIDE_CAPTION.to_string(),
                });
                Block::Carousel {
                    id: id.clone(),
                    images,
                }
            }
            other => other.clone(),
        }
    }

    pub fn with_image_removed(&self, image_id: &BlockId) -> Block {
        match self {
            Block::Carousel { id, images } => Block::Carousel {
                id: id.clone(),
                images: images
                    .iter()
                    .filter(|img| &img.id != image_id)
                    .cloned()
                    .collect(),
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::ids::SequentialIds;
    use pretty_assertions::assert_eq;

    fn text(id: &str) -> Block {
        Block::Text {
            id: id.into(),
            content: id.to_uppercase(),
        }
    }

    fn ids_of(doc: &Document) -> Vec<&str> {
        doc.iter().map(|b| b.id().as_str()).collect()
    }

    #[test]
    fn test_append_and_insert() {
        let doc = Document::new(vec![text("a"), text("c")]);
        let doc = doc.with_block_inserted(1, text("b"));
        let doc = doc.with_block_appended(text("d"));
        let doc = doc.with_block_inserted(99, text("e"));
        assert_eq!(ids_of(&doc), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_move_swaps_neighbours() {
        let doc = Document::new(vec![text("a"), text("b"), text("c")]);

        let up = doc.with_block_moved(&"c".into(), Move::Up);
        assert_eq!(ids_of(&up), vec!["a", "c", "b"]);

        let down = doc.with_block_moved(&"a".into(), Move::Down);
        assert_eq!(ids_of(&down), vec!["b", "a", "c"]);

        // original untouched
        assert_eq!(ids_of(&doc), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_at_edges_is_noop() {
        let doc = Document::new(vec![text("a"), text("b")]);
        assert_eq!(doc.with_block_moved(&"a".into(), Move::Up), doc);
        assert_eq!(doc.with_block_moved(&"b".into(), Move::Down), doc);
        assert_eq!(doc.with_block_moved(&"missing".into(), Move::Up), doc);
    }

    #[test]
    fn test_remove_and_replace() {
        let doc = Document::new(vec![text("a"), text("b"), text("c")]);
        let removed = doc.with_block_removed(&"b".into());
        assert_eq!(ids_of(&removed), vec!["a", "c"]);

        let replaced = doc.with_block_replaced(Block::Heading {
            id: "b".into(),
            content: "Title".into(),
        });
        assert_eq!(
            replaced.blocks()[1],
            Block::Heading {
                id: "b".into(),
                content: "Title".into()
            }
        );
        assert_eq!(replaced.len(), 3);
    }

    #[test]
    fn test_snippet_operations() {
        let mut ids = SequentialIds::new("s");
        let block = Block::new(BlockKind::MultiCode, &mut ids);

        let block = block.with_snippet_added(&mut ids);
        let Block::MultiCode { snippets, .. } = &block else {
            panic!("expected multi-code");
        };
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[1].label, "New Snippet");
        let second = snippets[1].clone();
        let first_id = snippets[0].id.clone();

        let block = block.with_snippet_updated(Snippet {
            content: "fn main() {}".into(),
            language: "rust".into(),
            ..second.clone()
        });
        let block = block.with_snippet_removed(&first_id);
        let Block::MultiCode { snippets, .. } = &block else {
            panic!("expected multi-code");
        };
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].language, "rust");

        // the last snippet stays
        let block = block.with_snippet_removed(&second.id);
        let Block::MultiCode { snippets, .. } = &block else {
            panic!("expected multi-code");
        };
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn test_carousel_operations() {
        let mut ids = SequentialIds::new("c");
        let block = Block::new(BlockKind::Carousel, &mut ids)
            .with_image_added("a.png", &mut ids)
            .with_image_added("b.png", &mut ids);
        let Block::Carousel { images, .. } = &block else {
            panic!("expected carousel");
        };
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].caption, "Step description...");
        let first = images[0].id.clone();

        let block = block.with_image_removed(&first);
        let Block::Carousel { images, .. } = &block else {
            panic!("expected carousel");
        };
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "b.png");
    }

    #[test]
    fn test_collection_ops_ignore_other_kinds() {
        let mut ids = SequentialIds::new("x");
        let block = text("a");
        assert_eq!(block.with_snippet_added(&mut ids), block);
        assert_eq!(block.with_image_added("a.png", &mut ids), block);
    }
}
