//! # Storage Markup
//!
//! The durable form of a [`Document`](crate::blocks::Document) is a small
//! HTML-like grammar:
//!
//! ```text
//! <h1|h2|h3>inline-markup</h1|h2|h3>
//! <p>inline-markup</p>
//! <code language="LANG">raw-text</code>
//! <multicode><snippet label="LABEL" language="LANG">raw-text</snippet>*</multicode>
//! <note type="info|warning|tip">inline-markup</note>
//! <img src="URL" alt="CAPTION"/>
//! <carousel><img src="URL" alt="CAPTION"/>*</carousel>
//! ```
//!
//! ## Modules
//!
//! - **`tree`**: lenient HTML parsing into an owned, depth-bounded element tree
//! - **`tags`**: the closed set of element names dispatched on
//! - **`serializer`**: `Document` -> markup
//! - **`parser`**: markup -> `Document`
//!
//! `parse(serialize(d))` reproduces `d` up to ids when `find_hazards(d)` is
//! empty. A document from `parse` can still be hazardous: `Vec&lt;String&gt;`
//! in a code block parses to `Vec<String>`, which the serializer writes back
//! unescaped as a tag.

pub mod parser;
pub mod serializer;
pub mod tags;
pub mod tree;

pub use parser::{parse, parse_with};
pub use serializer::{MarkupHazard, find_hazards, serialize};
pub use tags::Tag;
pub use tree::{Element, MarkupNode, parse_fragment};
