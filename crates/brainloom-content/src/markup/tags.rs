/// Element names the parser and renderer know about.
///
/// Dispatch is over this closed set; anything else is `Other` and is
/// flattened by the parser or passed through by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    Code,
    MultiCode,
    Snippet,
    Note,
    Image,
    Carousel,
    List { ordered: bool },
    ListItem,
    Strong,
    Emphasis,
    /// Void element other than `img` (`br`, `hr`, ...)
    Void,
    Other,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

impl Tag {
    /// Classify a lowercase local element name.
    pub fn from_name(name: &str) -> Tag {
        match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "p" => Tag::Paragraph,
            "code" => Tag::Code,
            "multicode" => Tag::MultiCode,
            "snippet" => Tag::Snippet,
            "note" => Tag::Note,
            "img" => Tag::Image,
            "carousel" => Tag::Carousel,
            "ul" => Tag::List { ordered: false },
            "ol" => Tag::List { ordered: true },
            "li" => Tag::ListItem,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            _ if is_void(name) => Tag::Void,
            _ => Tag::Other,
        }
    }
}

/// Elements that never have children or a closing tag.
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}
