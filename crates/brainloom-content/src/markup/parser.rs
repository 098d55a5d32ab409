use crate::blocks::{Block, CarouselImage, DEFAULT_LANGUAGE, Document, NoteLevel, Snippet};
use crate::ids::{IdGenerator, RandomIds};

use super::tags::Tag;
use super::tree::{Element, MarkupNode, parse_fragment};

/// Label for a snippet without a `label` attribute.
pub const UNLABELED_SNIPPET: &str = "Snippet";

/// Parse storage markup into an editable document with random ids.
pub fn parse(markup: &str) -> Document {
    parse_with(markup, &mut RandomIds)
}

/// Parse storage markup, drawing every block, snippet and image id from `ids`.
///
/// Never fails: when nothing in `markup` maps to a block (empty input, bare
/// text, only unknown leaf elements) the result is a single text block holding
/// the raw input, so no stored content is lost.
pub fn parse_with(markup: &str, ids: &mut dyn IdGenerator) -> Document {
    let mut blocks = Vec::new();
    collect_blocks(&parse_fragment(markup), ids, &mut blocks);

    if blocks.is_empty() {
        log::debug!(
            "no blocks recognized in {} bytes of markup; keeping it as one text block",
            markup.len()
        );
        blocks.push(Block::Text {
            id: ids.generate(),
            content: markup.to_string(),
        });
    }

    Document::new(blocks)
}

fn collect_blocks(nodes: &[MarkupNode], ids: &mut dyn IdGenerator, out: &mut Vec<Block>) {
    for node in nodes {
        if let MarkupNode::Element(el) = node {
            match el.tag() {
                Tag::Heading(_) => out.push(Block::Heading {
                    id: ids.generate(),
                    content: el.inner_markup(),
                }),
                Tag::Paragraph => out.push(Block::Text {
                    id: ids.generate(),
                    content: el.inner_markup(),
                }),
                Tag::Code => out.push(Block::Code {
                    id: ids.generate(),
                    content: el.text_content(),
                    language: language_of(el),
                }),
                Tag::MultiCode => out.push(multi_code(el, ids)),
                Tag::Note => out.push(Block::Note {
                    id: ids.generate(),
                    content: el.inner_markup(),
                    level: NoteLevel::from_attr(el.attr("type")),
                }),
                // Images under a carousel are consumed by the carousel arm and
                // never reach this one.
                Tag::Image => out.push(Block::Image {
                    id: ids.generate(),
                    url: el.attr("src").unwrap_or_default().to_string(),
                }),
                Tag::Carousel => out.push(carousel(el, ids)),
                Tag::Snippet
                | Tag::List { .. }
                | Tag::ListItem
                | Tag::Strong
                | Tag::Emphasis
                | Tag::Void
                | Tag::Other => collect_blocks(&el.children, ids, out),
            }
        }
    }
}

fn language_of(el: &Element) -> String {
    el.attr("language")
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}

fn multi_code(el: &Element, ids: &mut dyn IdGenerator) -> Block {
    let id = ids.generate();
    let mut snippets: Vec<Snippet> = el
        .descendants_named("snippet")
        .into_iter()
        .map(|s| Snippet {
            id: ids.generate(),
            label: s
                .attr("label")
                .filter(|l| !l.is_empty())
                .unwrap_or(UNLABELED_SNIPPET)
                .to_string(),
            language: language_of(s),
            content: s.text_content(),
        })
        .collect();

    if snippets.is_empty() {
        snippets.push(Snippet::initial(ids));
    }

    Block::MultiCode { id, snippets }
}

fn carousel(el: &Element, ids: &mut dyn IdGenerator) -> Block {
    let id = ids.generate();
    let images = el
        .descendants_named("img")
        .into_iter()
        .map(|img| CarouselImage {
            id: ids.generate(),
            url: img.attr("src").unwrap_or_default().to_string(),
            caption: img.attr("alt").unwrap_or_default().to_string(),
        })
        .collect();
    Block::Carousel { id, images }
}
