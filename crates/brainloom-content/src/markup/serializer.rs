use crate::blocks::{Block, BlockId, Document};

use super::tree::{MarkupNode, parse_fragment};

/// `alt` text written for standalone images.
pub const IMAGE_ALT: &str = "Image";

/// Render a document into storage markup, one element per block, newline separated.
///
/// Values are written verbatim. Nothing is escaped, so a `"` inside a url,
/// label, caption or language ends the attribute early, and code such as
/// `Vec<String>` reads back as an element. Run [`find_hazards`] before saving.
pub fn serialize(document: &Document) -> String {
    let mut out = String::new();
    for (i, block) in document.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_block(&mut out, block);
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Heading { content, .. } => write_element(out, "h2", &[], content),
        Block::Text { content, .. } => write_element(out, "p", &[], content),
        Block::Code {
            content, language, ..
        } => write_element(out, "code", &[("language", language)], content),
        Block::MultiCode { snippets, .. } => {
            out.push_str("<multicode>");
            for s in snippets {
                write_element(
                    out,
                    "snippet",
                    &[("label", &s.label), ("language", &s.language)],
                    &s.content,
                );
            }
            out.push_str("</multicode>");
        }
        Block::Note { content, level, .. } => {
            write_element(out, "note", &[("type", level.as_str())], content)
        }
        Block::Image { url, .. } => write_image(out, url, IMAGE_ALT),
        Block::Carousel { images, .. } => {
            out.push_str("<carousel>");
            for img in images {
                write_image(out, &img.url, &img.caption);
            }
            out.push_str("</carousel>");
        }
    }
}

fn write_attrs(out: &mut String, attrs: &[(&str, &str)]) {
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
}

fn write_element(out: &mut String, tag: &str, attrs: &[(&str, &str)], body: &str) {
    out.push('<');
    out.push_str(tag);
    write_attrs(out, attrs);
    out.push('>');
    out.push_str(body);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_image(out: &mut String, url: &str, alt: &str) {
    out.push_str("<img");
    write_attrs(out, &[("src", url), ("alt", alt)]);
    out.push_str("/>");
}

/// A value the serializer would write in a form that does not read back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupHazard {
    #[error("block {block}: {field} contains an unescaped '\"'")]
    UnescapedQuote { block: BlockId, field: &'static str },
    #[error("block {block}: {field} contains text that would read back as markup")]
    MarkupInRawText { block: BlockId, field: &'static str },
}

/// Values in `document` that would corrupt the stored markup.
///
/// Attribute values must not contain `"`. Code and snippet text must read
/// back unchanged when wrapped in its element, so a `<` that opens a tag or an
/// `&` that starts a character reference is reported.
pub fn find_hazards(document: &Document) -> Vec<MarkupHazard> {
    let mut hazards = Vec::new();
    let mut attr = |block: &BlockId, field: &'static str, value: &str| {
        if value.contains('"') {
            hazards.push(MarkupHazard::UnescapedQuote {
                block: block.clone(),
                field,
            });
        }
    };

    for block in document {
        match block {
            Block::Code { id, language, .. } => attr(id, "language", language),
            Block::MultiCode { id, snippets } => {
                for s in snippets {
                    attr(id, "snippet label", &s.label);
                    attr(id, "snippet language", &s.language);
                }
            }
            Block::Image { id, url } => attr(id, "url", url),
            Block::Carousel { id, images } => {
                for img in images {
                    attr(id, "image url", &img.url);
                    attr(id, "image caption", &img.caption);
                }
            }
            Block::Heading { .. } | Block::Text { .. } | Block::Note { .. } => {}
        }
    }

    for block in document {
        match block {
            Block::Code { id, content, .. } if !reads_back("code", content) => {
                hazards.push(MarkupHazard::MarkupInRawText {
                    block: id.clone(),
                    field: "content",
                });
            }
            Block::MultiCode { id, snippets } => {
                for s in snippets.iter().filter(|s| !reads_back("snippet", &s.content)) {
                    log::debug!("snippet {} of block {id} would not read back", s.id);
                    hazards.push(MarkupHazard::MarkupInRawText {
                        block: id.clone(),
                        field: "snippet content",
                    });
                }
            }
            _ => {}
        }
    }
    hazards
}

/// Whether `text` written inside `<tag>` parses back to the same text.
fn reads_back(tag: &str, text: &str) -> bool {
    if !text.contains(['<', '&', '\r', '\0']) {
        return true;
    }
    let mut markup = String::new();
    write_element(&mut markup, tag, &[], text);
    match parse_fragment(&markup).as_slice() {
        [MarkupNode::Element(el)] => el.name == tag && el.text_content() == text,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{CarouselImage, NoteLevel, Snippet};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn single(block: Block) -> String {
        serialize(&Document::new(vec![block]))
    }

    #[rstest]
    #[case(Block::Heading { id: "a".into(), content: "Intro <em>here</em>".into() }, "<h2>Intro <em>here</em></h2>")]
    #[case(Block::Text { id: "a".into(), content: "Hello<br>world".into() }, "<p>Hello<br>world</p>")]
    #[case(Block::Code { id: "a".into(), content: "print(1)".into(), language: "python".into() }, r#"<code language="python">print(1)</code>"#)]
    #[case(Block::Note { id: "a".into(), content: "Mind the gap".into(), level: NoteLevel::Warning }, r#"<note type="warning">Mind the gap</note>"#)]
    #[case(Block::Image { id: "a".into(), url: "https://cdn/x.png".into() }, r#"<img src="https://cdn/x.png" alt="Image"/>"#)]
    fn test_single_block_markup(#[case] block: Block, #[case] expected: &str) {
        assert_eq!(single(block), expected);
    }

    #[test]
    fn test_multicode_markup() {
        let block = Block::MultiCode {
            id: "m".into(),
            snippets: vec![
                Snippet {
                    id: "s1".into(),
                    label: "A".into(),
                    language: "go".into(),
                    content: "x".into(),
                },
                Snippet {
                    id: "s2".into(),
                    label: "B".into(),
                    language: "rust".into(),
                    content: "y".into(),
                },
            ],
        };
        assert_eq!(
            single(block),
            r#"<multicode><snippet label="A" language="go">x</snippet><snippet label="B" language="rust">y</snippet></multicode>"#
        );
    }

    #[test]
    fn test_carousel_markup() {
        let block = Block::Carousel {
            id: "c".into(),
            images: vec![CarouselImage {
                id: "i1".into(),
                url: "a.png".into(),
                caption: "First step".into(),
            }],
        };
        assert_eq!(
            single(block),
            r#"<carousel><img src="a.png" alt="First step"/></carousel>"#
        );
        assert_eq!(
            single(Block::Carousel {
                id: "c".into(),
                images: vec![]
            }),
            "<carousel></carousel>"
        );
    }

    #[test]
    fn test_blocks_joined_by_newline() {
        let doc = Document::new(vec![
            Block::Heading {
                id: "a".into(),
                content: "T".into(),
            },
            Block::Text {
                id: "b".into(),
                content: "p".into(),
            },
        ]);
        assert_eq!(serialize(&doc), "<h2>T</h2>\n<p>p</p>");
        assert_eq!(serialize(&Document::default()), "");
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let doc = Document::new(vec![
            Block::Text {
                id: "b".into(),
                content: "same".into(),
            },
            Block::Code {
                id: "c".into(),
                content: "x".into(),
                language: "go".into(),
            },
        ]);
        assert_eq!(serialize(&doc), serialize(&doc));
    }

    #[test]
    fn test_values_written_verbatim() {
        let block = Block::Code {
            id: "a".into(),
            content: "a < b && c".into(),
            language: "c".into(),
        };
        assert_eq!(single(block), r#"<code language="c">a < b && c</code>"#);
    }

    #[test]
    fn test_find_hazards_reports_quotes_in_attributes() {
        let doc = Document::new(vec![
            Block::Image {
                id: "img".into(),
                url: r#"x.png" onerror="#.into(),
            },
            Block::Text {
                id: "t".into(),
                content: r#"quotes "are" fine here"#.into(),
            },
            Block::Carousel {
                id: "car".into(),
                images: vec![CarouselImage {
                    id: "i".into(),
                    url: "ok.png".into(),
                    caption: r#"say "hi""#.into(),
                }],
            },
        ]);
        assert_eq!(
            find_hazards(&doc),
            vec![
                MarkupHazard::UnescapedQuote {
                    block: "img".into(),
                    field: "url"
                },
                MarkupHazard::UnescapedQuote {
                    block: "car".into(),
                    field: "image caption"
                },
            ]
        );
    }

    fn code(content: &str) -> Document {
        Document::new(vec![Block::Code {
            id: "c".into(),
            content: content.into(),
            language: "rust".into(),
        }])
    }

    #[rstest]
    #[case("let v: Vec<String> = Vec::new();")]
    #[case("<div class=\"box\"></div>")]
    #[case("</code> escaped early")]
    #[case("<!-- gone -->")]
    #[case("a &lt; b")]
    #[case("&notin set")]
    fn test_code_that_reads_back_as_markup_is_a_hazard(#[case] content: &str) {
        assert_eq!(
            find_hazards(&code(content)),
            vec![MarkupHazard::MarkupInRawText {
                block: "c".into(),
                field: "content"
            }]
        );
    }

    #[rstest]
    #[case("a < b && c")]
    #[case("fn f(&mut self, s: &str) -> bool { x<3 }")]
    #[case("ok = y <= z;")]
    #[case("")]
    fn test_plain_code_is_not_a_hazard(#[case] content: &str) {
        assert!(find_hazards(&code(content)).is_empty());
        let reparsed = crate::markup::parse(&serialize(&code(content)));
        assert!(reparsed.content_eq(&code(content)));
    }

    #[test]
    fn test_generic_snippet_is_a_hazard() {
        let doc = Document::new(vec![Block::MultiCode {
            id: "m".into(),
            snippets: vec![
                Snippet {
                    id: "s1".into(),
                    label: "Java".into(),
                    language: "java".into(),
                    content: "List<T> items;".into(),
                },
                Snippet {
                    id: "s2".into(),
                    label: "C".into(),
                    language: "c".into(),
                    content: "int x = a < b;".into(),
                },
            ],
        }]);
        assert_eq!(
            find_hazards(&doc),
            vec![MarkupHazard::MarkupInRawText {
                block: "m".into(),
                field: "snippet content"
            }]
        );
    }
}
