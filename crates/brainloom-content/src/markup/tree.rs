//! Generic element tree over html5ever.
//!
//! Both the parser and the display renderer start here. The html5ever tree
//! builder does the lenient part (unbalanced tags, implicit closes, entity
//! decoding in text); this module copies the `<body>` children into an owned
//! tree that the rest of the crate can pattern-match on.
//!
//! Nesting deeper than [`MAX_DEPTH`] is collapsed into a single text node
//! holding the text content of the collapsed subtree, so every recursive walk
//! over a [`MarkupNode`] is bounded.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::tags::{Tag, is_void};

pub const MAX_DEPTH: usize = 256;

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase local name
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn tag(&self) -> Tag {
        Tag::from_name(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendants, tags discarded.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Serialized children, the equivalent of a DOM `innerHTML`.
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        write_children(&mut out, self);
        out
    }

    /// Descendant elements named `name`, in document order. A match is not
    /// searched for further matches inside it.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        find_named(&self.children, name, &mut found);
        found
    }

    pub fn has_element_children(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, MarkupNode::Element(_)))
    }
}

/// Parse `markup` leniently and return the body's child nodes.
pub fn parse_fragment(markup: &str) -> Vec<MarkupNode> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    match find_body(&dom.document) {
        Some(body) => convert_children(&body, 0),
        None => Vec::new(),
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let mut stack = vec![document.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Element { name, .. } = &node.data
            && &*name.local == "body"
        {
            return Some(node.clone());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    None
}

fn convert_children(handle: &Handle, depth: usize) -> Vec<MarkupNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(|child| convert(child, depth + 1))
        .collect()
}

fn convert(handle: &Handle, depth: usize) -> Option<MarkupNode> {
    match &handle.data {
        NodeData::Text { contents } => Some(MarkupNode::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            if depth >= MAX_DEPTH {
                log::debug!("markup nested deeper than {MAX_DEPTH}; collapsing to text");
                return Some(MarkupNode::Text(flat_text(handle)));
            }
            let attrs = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            Some(MarkupNode::Element(Element {
                name: name.local.to_string(),
                attrs,
                children: convert_children(handle, depth),
            }))
        }
        _ => None,
    }
}

/// Text content of an arbitrarily deep subtree, without recursion.
fn flat_text(handle: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Text { contents } = &node.data {
            out.push_str(&contents.borrow());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    out
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(t) => out.push_str(t),
            MarkupNode::Element(e) => collect_text(&e.children, out),
        }
    }
}

fn find_named<'a>(nodes: &'a [MarkupNode], name: &str, found: &mut Vec<&'a Element>) {
    for node in nodes {
        if let MarkupNode::Element(e) = node {
            if e.name == name {
                found.push(e);
            } else {
                find_named(&e.children, name, found);
            }
        }
    }
}

fn write_children(out: &mut String, parent: &Element) {
    let raw = RAW_TEXT_ELEMENTS.contains(&parent.name.as_str());
    for child in &parent.children {
        match child {
            MarkupNode::Text(t) if raw => out.push_str(t),
            MarkupNode::Text(t) => {
                html_escape::encode_text_to_string(t, out);
            }
            MarkupNode::Element(e) => write_element(out, e),
        }
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        html_escape::encode_double_quoted_attribute_to_string(value, out);
        out.push('"');
    }
    out.push('>');
    if is_void(&el.name) {
        return;
    }
    write_children(out, el);
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}
