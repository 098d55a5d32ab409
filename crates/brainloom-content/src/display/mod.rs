//! Read-only presentation of stored markup.
//!
//! [`render`] turns a markup string into a [`DisplayTree`] of typography
//! nodes and interactive widgets. It does not go through the editable
//! [`Document`](crate::Document) model: tags the editor never produces
//! (lists, `success`/`error` callouts, arbitrary wrappers) still display.

pub mod normalize;
pub mod widgets;

use std::fmt;
use std::time::Duration;

pub use normalize::{EntityNormalization, normalize_entities};
pub use widgets::{
    COPIED_FEEDBACK, Callout, CalloutKind, Clipboard, ClipboardError, CodeTab, CodeView,
    CopyButton, Figure, Gallery, MemoryClipboard, Slide, TabbedCode,
};

use crate::blocks::DEFAULT_LANGUAGE;
use crate::markup::parser::UNLABELED_SNIPPET;
use crate::markup::{Element, MarkupNode, Tag, parse_fragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub entities: EntityNormalization,
    /// How long copy buttons stay in the copied state
    pub copied_feedback: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            entities: EntityNormalization::default(),
            copied_feedback: COPIED_FEEDBACK,
        }
    }
}

/// Typography applied to a pass-through element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading(u8),
    Paragraph,
    BulletList,
    NumberedList,
    ListItem,
    Strong,
    Emphasis,
    Plain,
}

impl Role {
    fn of(tag: Tag) -> Role {
        match tag {
            Tag::Heading(level) => Role::Heading(level),
            Tag::Paragraph => Role::Paragraph,
            Tag::List { ordered: false } => Role::BulletList,
            Tag::List { ordered: true } => Role::NumberedList,
            Tag::ListItem => Role::ListItem,
            Tag::Strong => Role::Strong,
            Tag::Emphasis => Role::Emphasis,
            _ => Role::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Text(String),
    Element {
        name: String,
        role: Role,
        children: Vec<DisplayNode>,
    },
    /// `br`, `hr` and other childless elements
    Void { name: String },
    Code(CodeView),
    Tabs(TabbedCode),
    Callout(Callout),
    Figure(Figure),
    Gallery(Gallery),
}

/// Mutable handle on one interactive widget of a [`DisplayTree`].
#[derive(Debug)]
pub enum WidgetMut<'a> {
    Code(&'a mut CodeView),
    Tabs(&'a mut TabbedCode),
    Gallery(&'a mut Gallery),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayTree {
    nodes: Vec<DisplayNode>,
}

impl DisplayTree {
    pub fn nodes(&self) -> &[DisplayNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Interactive widgets in document order, callouts and wrappers included.
    pub fn widgets_mut(&mut self) -> Vec<WidgetMut<'_>> {
        let mut out = Vec::new();
        collect_widgets(&mut self.nodes, &mut out);
        out
    }

    pub fn widget_count(&self) -> usize {
        count_widgets(&self.nodes)
    }

    /// Indented one-line-per-node description of the tree. Time-dependent
    /// state (copy feedback) is left out so the output is stable.
    pub fn outline(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DisplayTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write_outline(f, node, 0)?;
        }
        Ok(())
    }
}

pub fn render(markup: &str) -> DisplayTree {
    render_with(markup, &RenderOptions::default())
}

pub fn render_with(markup: &str, options: &RenderOptions) -> DisplayTree {
    let normalized = normalize_entities(markup, options.entities);
    let nodes = parse_fragment(&normalized)
        .iter()
        .filter(|n| !matches!(n, MarkupNode::Text(t) if t.trim().is_empty()))
        .filter_map(|n| render_node(n, options))
        .collect();
    DisplayTree { nodes }
}

fn render_children(el: &Element, options: &RenderOptions) -> Vec<DisplayNode> {
    el.children
        .iter()
        .filter_map(|n| render_node(n, options))
        .collect()
}

fn render_node(node: &MarkupNode, options: &RenderOptions) -> Option<DisplayNode> {
    match node {
        MarkupNode::Text(text) => Some(DisplayNode::Text(text.clone())),
        MarkupNode::Element(el) => render_element(el, options),
    }
}

fn render_element(el: &Element, options: &RenderOptions) -> Option<DisplayNode> {
    let node = match el.tag() {
        Tag::Code => DisplayNode::Code(CodeView {
            language: language_of(el),
            code: el.text_content(),
            copy: CopyButton::new(options.copied_feedback),
        }),
        Tag::MultiCode => {
            let tabs = el
                .descendants_named("snippet")
                .into_iter()
                .map(|s| CodeTab {
                    label: s
                        .attr("label")
                        .filter(|l| !l.is_empty())
                        .unwrap_or(UNLABELED_SNIPPET)
                        .to_string(),
                    language: language_of(s),
                    content: s.text_content(),
                })
                .collect();
            DisplayNode::Tabs(TabbedCode::new(
                tabs,
                CopyButton::new(options.copied_feedback),
            ))
        }
        Tag::Note => DisplayNode::Callout(Callout {
            kind: CalloutKind::from_type(el.attr("type")),
            children: render_children(el, options),
        }),
        Tag::Image => DisplayNode::Figure(Figure {
            src: el.attr("src").unwrap_or_default().to_string(),
            alt: el.attr("alt").map(str::to_string),
        }),
        Tag::Carousel => {
            let slides = el
                .descendants_named("img")
                .into_iter()
                .map(|img| Slide {
                    url: img.attr("src").unwrap_or_default().to_string(),
                    caption: img.attr("alt").unwrap_or_default().to_string(),
                })
                .collect();
            return Gallery::new(slides).map(DisplayNode::Gallery);
        }
        Tag::Void => DisplayNode::Void {
            name: el.name.clone(),
        },
        tag => {
            let children = render_children(el, options);
            if tag == Tag::Paragraph && is_blank(&children) {
                return None;
            }
            DisplayNode::Element {
                name: el.name.clone(),
                role: Role::of(tag),
                children,
            }
        }
    };
    Some(node)
}

fn language_of(el: &Element) -> String {
    el.attr("language")
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}

fn is_blank(children: &[DisplayNode]) -> bool {
    children
        .iter()
        .all(|c| matches!(c, DisplayNode::Text(t) if t.trim().is_empty()))
}

fn collect_widgets<'a>(nodes: &'a mut [DisplayNode], out: &mut Vec<WidgetMut<'a>>) {
    for node in nodes {
        match node {
            DisplayNode::Code(view) => out.push(WidgetMut::Code(view)),
            DisplayNode::Tabs(tabs) => out.push(WidgetMut::Tabs(tabs)),
            DisplayNode::Gallery(gallery) => out.push(WidgetMut::Gallery(gallery)),
            DisplayNode::Element { children, .. } => collect_widgets(children, out),
            DisplayNode::Callout(callout) => collect_widgets(&mut callout.children, out),
            DisplayNode::Text(_) | DisplayNode::Void { .. } | DisplayNode::Figure(_) => {}
        }
    }
}

fn count_widgets(nodes: &[DisplayNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            DisplayNode::Code(_) | DisplayNode::Tabs(_) | DisplayNode::Gallery(_) => 1,
            DisplayNode::Element { children, .. } => count_widgets(children),
            DisplayNode::Callout(callout) => count_widgets(&callout.children),
            DisplayNode::Text(_) | DisplayNode::Void { .. } | DisplayNode::Figure(_) => 0,
        })
        .sum()
}

fn write_outline(f: &mut fmt::Formatter<'_>, node: &DisplayNode, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        DisplayNode::Text(text) => writeln!(f, "{indent}{text:?}"),
        DisplayNode::Void { name } => writeln!(f, "{indent}{name}"),
        DisplayNode::Element { name, children, .. } => {
            writeln!(f, "{indent}{name}")?;
            for child in children {
                write_outline(f, child, depth + 1)?;
            }
            Ok(())
        }
        DisplayNode::Code(view) => {
            writeln!(f, "{indent}code[{}] {:?}", view.language, view.display_code())
        }
        DisplayNode::Tabs(tabs) if tabs.is_empty() => {
            writeln!(f, "{indent}tabs: {}", widgets::EMPTY_TABS_MESSAGE)
        }
        DisplayNode::Tabs(tabs) => {
            writeln!(f, "{indent}tabs")?;
            for (i, tab) in tabs.tabs().iter().enumerate() {
                let marker = if i == tabs.active_index() { "*" } else { " " };
                writeln!(
                    f,
                    "{indent}  {marker}{}[{}] {:?}",
                    tab.label,
                    tab.language,
                    tab.content.trim()
                )?;
            }
            Ok(())
        }
        DisplayNode::Callout(callout) => {
            writeln!(
                f,
                "{indent}callout {} ({})",
                callout.kind.as_str(),
                callout.kind.icon()
            )?;
            for child in &callout.children {
                write_outline(f, child, depth + 1)?;
            }
            Ok(())
        }
        DisplayNode::Figure(figure) => match figure.caption() {
            Some(caption) => writeln!(f, "{indent}figure {} {caption:?}", figure.src),
            None => writeln!(f, "{indent}figure {}", figure.src),
        },
        DisplayNode::Gallery(gallery) => {
            writeln!(f, "{indent}gallery {}", gallery.indicator())?;
            for (i, slide) in gallery.slides().iter().enumerate() {
                let marker = if i == gallery.current_index() { "*" } else { " " };
                writeln!(
                    f,
                    "{indent}  {marker}{} {:?}",
                    slide.url,
                    slide.display_caption()
                )?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::Instant;

    fn only(tree: &DisplayTree) -> &DisplayNode {
        assert_eq!(tree.nodes().len(), 1, "{tree:#?}");
        &tree.nodes()[0]
    }

    #[test]
    fn test_outline_of_every_element_kind() {
        let tree = render(concat!(
            "<h2>Title</h2>\n",
            "<p>Body <strong>bold</strong><br>next</p>\n",
            "<ul><li>one</li><li>two</li></ul>\n",
            r#"<code language="python">  print(1)  </code>"#,
            "\n",
            r#"<multicode><snippet label="A" language="go">x</snippet><snippet>y</snippet></multicode>"#,
            "\n",
            r#"<note type="tip">Try <em>it</em></note>"#,
            "\n",
            r#"<img src="a.png" alt="Diagram">"#,
            "\n",
            r#"<carousel><img src="1.png" alt="one"><img src="2.png"></carousel>"#,
        ));
        insta::assert_snapshot!(tree.outline(), @r#"
        h2
          "Title"
        p
          "Body "
          strong
            "bold"
          br
          "next"
        ul
          li
            "one"
          li
            "two"
        code[python] "print(1)"
        tabs
          *A[go] "x"
           Snippet[javascript] "y"
        callout tip (lightbulb)
          "Try "
          em
            "it"
        figure a.png "Diagram"
        gallery 1 / 2
          *1.png "one"
           2.png "Module step visualization"
        "#);
    }

    #[rstest]
    #[case("<p></p>")]
    #[case("<p>   \n </p>")]
    #[case("<p><carousel></carousel></p>")]
    fn test_empty_paragraphs_are_dropped(#[case] markup: &str) {
        assert!(render(markup).is_empty(), "{:#?}", render(markup));
    }

    #[test]
    fn test_paragraph_with_only_an_element_is_kept() {
        let tree = render("<p><br></p>");
        assert!(matches!(only(&tree), DisplayNode::Element { role: Role::Paragraph, .. }));
    }

    #[test]
    fn test_empty_carousel_is_omitted() {
        let tree = render("<h2>A</h2><carousel></carousel>");
        assert_eq!(tree.outline(), "h2\n  \"A\"\n");
    }

    #[test]
    fn test_empty_multicode_shows_empty_state() {
        let tree = render("<multicode></multicode>");
        let DisplayNode::Tabs(tabs) = only(&tree) else {
            panic!("expected tabs");
        };
        assert!(tabs.active_tab().is_none());
        assert_eq!(tree.outline(), "tabs: No code snippets yet\n");
    }

    #[rstest]
    #[case(EntityNormalization::Never, "a &lt; b", "a < b")]
    #[case(EntityNormalization::WhenEscaped, "a &lt; b", "a < b")]
    #[case(EntityNormalization::Never, "Vec&lt;String&gt;", "Vec<String>")]
    #[case(EntityNormalization::WhenEscaped, "Vec&lt;String&gt;", "Vec<String>")]
    fn test_code_text_survives_normalization(
        #[case] entities: EntityNormalization,
        #[case] stored: &str,
        #[case] expected: &str,
    ) {
        let options = RenderOptions {
            entities,
            ..RenderOptions::default()
        };
        let markup = format!("<code language='python'>{stored}</code>");
        let tree = render_with(&markup, &options);
        let DisplayNode::Code(view) = only(&tree) else {
            panic!("expected code view");
        };
        assert_eq!(view.code, expected);
        assert_eq!(view.language, "python");
    }

    #[test]
    fn test_escaped_document_is_decoded_once() {
        let tree = render("&lt;code language=&quot;js&quot;&gt;if (a &amp;lt; b) {}&lt;/code&gt;");
        let DisplayNode::Code(view) = only(&tree) else {
            panic!("expected code view: {tree:#?}");
        };
        assert_eq!(view.code, "if (a < b) {}");
        assert_eq!(view.language, "js");
    }

    #[test]
    fn test_unknown_note_type_is_info() {
        let tree = render("<note type='shout'>x</note><note>y</note>");
        let kinds: Vec<_> = tree
            .nodes()
            .iter()
            .map(|n| match n {
                DisplayNode::Callout(c) => c.kind,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![CalloutKind::Info, CalloutKind::Info]);
    }

    #[test]
    fn test_figure_without_alt_has_no_caption() {
        let tree = render("<img src='x.png'>");
        assert_eq!(tree.outline(), "figure x.png\n");
    }

    #[test]
    fn test_gallery_wraps_through_widgets_mut() {
        let mut tree = render("<carousel><img src='a'><img src='b'><img src='c'></carousel>");
        let mut widgets = tree.widgets_mut();
        let WidgetMut::Gallery(gallery) = &mut widgets[0] else {
            panic!("expected gallery");
        };
        gallery.previous();
        assert_eq!(gallery.indicator(), "3 / 3");
        gallery.next();
        assert_eq!(gallery.indicator(), "1 / 3");
    }

    #[test]
    fn test_widgets_found_inside_wrappers_and_callouts() {
        let mut tree = render(
            "<section><code>a</code></section><note><multicode></multicode></note><carousel><img src='x'></carousel>",
        );
        assert_eq!(tree.widget_count(), 3);
        let kinds: Vec<_> = tree
            .widgets_mut()
            .into_iter()
            .map(|w| match w {
                WidgetMut::Code(_) => "code",
                WidgetMut::Tabs(_) => "tabs",
                WidgetMut::Gallery(_) => "gallery",
            })
            .collect();
        assert_eq!(kinds, vec!["code", "tabs", "gallery"]);
    }

    #[test]
    fn test_copy_feedback_duration_comes_from_options() {
        let options = RenderOptions {
            copied_feedback: Duration::from_millis(100),
            ..RenderOptions::default()
        };
        let mut tree = render_with("<code>x</code>", &options);
        let mut clipboard = MemoryClipboard::default();
        let t0 = Instant::now();
        if let Some(WidgetMut::Code(view)) = tree.widgets_mut().into_iter().next() {
            view.copy_code(&mut clipboard, t0).unwrap();
            assert!(view.copy.is_copied(t0 + Duration::from_millis(50)));
            assert!(!view.copy.is_copied(t0 + Duration::from_millis(100)));
        } else {
            panic!("expected code widget");
        }
        assert_eq!(clipboard.content.as_deref(), Some("x"));
    }

    #[test]
    fn test_deep_nesting_renders() {
        let markup = format!("{}x{}", "<div>".repeat(2000), "</div>".repeat(2000));
        let tree = render(&markup);
        assert!(!tree.is_empty());
    }
}
