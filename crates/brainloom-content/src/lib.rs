//! Structured topic content: an editable block model, its storage markup, and
//! a read-only display tree for presenting that markup.

pub mod blocks;
pub mod display;
pub mod ids;
pub mod markup;
pub mod store;

// Re-export key types for easier usage
pub use blocks::{
    Block, BlockId, BlockKind, CarouselImage, Document, Move, NoteLevel, Snippet,
};
pub use display::{DisplayNode, DisplayTree, RenderOptions, render, render_with};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use markup::{MarkupHazard, find_hazards, parse, parse_with, serialize};
pub use store::{ContentEnvelope, FsTopicStore, MemoryTopicStore, StoreError, TopicStore};
