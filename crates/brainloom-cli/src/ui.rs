use brainloom_content::display::{
    Callout, CalloutKind, CodeView, DisplayNode, Figure, Gallery, Role, TabbedCode,
};
use brainloom_content::{DisplayTree, TopicStore};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::time::Instant;

use crate::app::App;

const RULE: &str = "────────────────────────";

pub fn ui<S: TopicStore>(f: &mut Frame, app: &mut App<S>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    // Topic list panel
    let topic_items: Vec<ListItem> = app
        .topics
        .iter()
        .map(|topic| ListItem::new(Line::from(topic.as_str())))
        .collect();

    let topic_list = List::new(topic_items)
        .block(Block::default().borders(Borders::ALL).title("Topics"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(topic_list, chunks[0], &mut app.topic_list_state);

    // Content panel
    let content_text = match (&app.tree, &app.status) {
        (_, Some(status)) if app.tree.is_none() => vec![Line::from(status.clone())],
        (Some(tree), _) if !tree.is_empty() => topic_lines(tree, app.focus, Instant::now()),
        (Some(_), _) => vec![Line::from("This topic is empty")],
        (None, _) => vec![Line::from("Select a topic to view its content")],
    };
    let title = app.selected_topic().unwrap_or("Content").to_string();

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    f.render_widget(content, chunks[1]);

    // Instructions, or the last error
    let help = match (&app.status, &app.tree) {
        (Some(status), Some(_)) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )),
        _ => Line::from(
            "q: Quit | j/k: Topic | Tab: Focus | ←/→: Slide/Tab | c: Copy | PgUp/PgDn: Scroll",
        ),
    };
    f.render_widget(Paragraph::new(help), rows[1]);
}

/// Lay out a rendered topic as terminal lines. `focus` counts widgets in
/// document order, the same order as [`DisplayTree::widgets_mut`].
pub fn topic_lines(tree: &DisplayTree, focus: Option<usize>, now: Instant) -> Vec<Line<'static>> {
    let mut w = LineWriter {
        lines: Vec::new(),
        current: Vec::new(),
        focus,
        widget: 0,
        now,
    };
    for node in tree.nodes() {
        w.node(node, Style::default());
    }
    w.end_block();
    while w.lines.last().is_some_and(|l| l.spans.is_empty()) {
        w.lines.pop();
    }
    w.lines
}

struct LineWriter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    focus: Option<usize>,
    widget: usize,
    now: Instant,
}

impl LineWriter {
    fn text(&mut self, text: &str, style: Style) {
        let collapsed = collapse_whitespace(text);
        if collapsed.is_empty() || (collapsed == " " && self.current.is_empty()) {
            return;
        }
        self.current.push(Span::styled(collapsed, style));
    }

    fn line(&mut self, line: Line<'static>) {
        self.end_block();
        self.lines.push(line);
    }

    fn break_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn end_block(&mut self) {
        if !self.current.is_empty() {
            self.break_line();
        }
    }

    fn blank(&mut self) {
        self.end_block();
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    /// Next widget's border style, highlighted when focused.
    fn widget_style(&mut self) -> Style {
        let focused = self.focus == Some(self.widget);
        self.widget += 1;
        if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn node(&mut self, node: &DisplayNode, style: Style) {
        match node {
            DisplayNode::Text(text) => self.text(text, style),
            DisplayNode::Void { name } => match name.as_str() {
                "br" => self.break_line(),
                "hr" => {
                    self.line(Line::from(RULE));
                    self.blank();
                }
                _ => {}
            },
            DisplayNode::Element { role, children, .. } => self.element(*role, children, style),
            DisplayNode::Code(view) => self.code(view),
            DisplayNode::Tabs(tabs) => self.tabs(tabs),
            DisplayNode::Callout(callout) => self.callout(callout),
            DisplayNode::Figure(figure) => self.figure(figure),
            DisplayNode::Gallery(gallery) => self.gallery(gallery),
        }
    }

    fn children(&mut self, children: &[DisplayNode], style: Style) {
        for child in children {
            self.node(child, style);
        }
    }

    fn element(&mut self, role: Role, children: &[DisplayNode], style: Style) {
        match role {
            Role::Heading(level) => {
                self.blank();
                let color = match level {
                    1 => Color::Magenta,
                    2 => Color::Cyan,
                    _ => Color::Blue,
                };
                self.children(children, style.fg(color).add_modifier(Modifier::BOLD));
                self.blank();
            }
            Role::Paragraph => {
                self.end_block();
                self.children(children, style);
                self.blank();
            }
            Role::BulletList | Role::NumberedList => {
                self.end_block();
                let mut number = 0;
                for child in children {
                    match child {
                        DisplayNode::Element {
                            role: Role::ListItem,
                            children,
                            ..
                        } => {
                            number += 1;
                            self.end_block();
                            let marker = if role == Role::NumberedList {
                                format!("{number}. ")
                            } else {
                                "• ".to_string()
                            };
                            self.current.push(Span::raw(marker));
                            self.children(children, style);
                            self.end_block();
                        }
                        other => self.node(other, style),
                    }
                }
                self.blank();
            }
            Role::ListItem => {
                self.end_block();
                self.current.push(Span::raw("• "));
                self.children(children, style);
                self.end_block();
            }
            Role::Strong => self.children(children, style.add_modifier(Modifier::BOLD)),
            Role::Emphasis => self.children(children, style.add_modifier(Modifier::ITALIC)),
            Role::Plain => self.children(children, style),
        }
    }

    fn code(&mut self, view: &CodeView) {
        let border = self.widget_style();
        self.line(Line::from(vec![
            Span::styled(format!("┌ {} ", view.language), border),
            Span::styled(format!("[{}]", view.copy.label(self.now)), border),
        ]));
        self.code_body(view.display_code(), border);
        self.blank();
    }

    fn tabs(&mut self, tabs: &TabbedCode) {
        let border = self.widget_style();
        let Some(active) = tabs.active_tab() else {
            self.line(Line::from(Span::styled(
                format!("┌ {}", brainloom_content::display::widgets::EMPTY_TABS_MESSAGE),
                border,
            )));
            self.blank();
            return;
        };

        let mut header = vec![Span::styled("┌", border)];
        for (i, tab) in tabs.tabs().iter().enumerate() {
            let tab_style = if i == tabs.active_index() {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            header.push(Span::raw(" "));
            header.push(Span::styled(format!(" {} ", tab.label), tab_style));
        }
        header.push(Span::styled(
            format!(" {} [{}]", active.language, tabs.copy.label(self.now)),
            border,
        ));
        self.line(Line::from(header));
        self.code_body(active.content.trim(), border);
        self.blank();
    }

    fn code_body(&mut self, code: &str, border: Style) {
        for line in code.lines() {
            self.lines.push(Line::from(vec![
                Span::styled("│ ", border),
                Span::styled(line.to_string(), Style::default().fg(Color::Green)),
            ]));
        }
        self.lines.push(Line::from(Span::styled("└", border)));
    }

    fn callout(&mut self, callout: &Callout) {
        let color = match callout.kind {
            CalloutKind::Info => Color::Blue,
            CalloutKind::Warning => Color::Yellow,
            CalloutKind::Tip => Color::Cyan,
            CalloutKind::Success => Color::Green,
            CalloutKind::Error => Color::Red,
        };
        let glyph = match callout.kind {
            CalloutKind::Info => "ℹ",
            CalloutKind::Warning => "⚠",
            CalloutKind::Tip => "★",
            CalloutKind::Success => "✔",
            CalloutKind::Error => "✖",
        };
        self.line(Line::from(Span::styled(
            format!("{glyph} {}", callout.kind.as_str().to_uppercase()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        self.children(&callout.children, Style::default().fg(color));
        self.blank();
    }

    fn figure(&mut self, figure: &Figure) {
        self.line(Line::from(vec![
            Span::styled("[image] ", Style::default().fg(Color::DarkGray)),
            Span::raw(figure.src.clone()),
        ]));
        if let Some(caption) = figure.caption() {
            self.lines.push(Line::from(Span::styled(
                caption.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        self.blank();
    }

    fn gallery(&mut self, gallery: &Gallery) {
        let border = self.widget_style();
        let slide = gallery.current_slide();
        let controls = if gallery.has_controls() { " ◀ ▶" } else { "" };
        self.line(Line::from(vec![
            Span::styled(format!("[slide {}]{controls} ", gallery.indicator()), border),
            Span::raw(slide.url.clone()),
        ]));
        self.lines.push(Line::from(Span::styled(
            slide.display_caption().to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        self.blank();
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainloom_content::render;
    use pretty_assertions::assert_eq;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_topic_lines_text() {
        let tree = render(concat!(
            "<h2>Title</h2>",
            "<p>Some   <strong>bold</strong>\ntext</p>",
            "<ol><li>one</li><li>two</li></ol>",
            "<code language='rust'>fn a() {}\nfn b() {}</code>",
            "<note type='warning'>Careful</note>",
            "<carousel><img src='1.png' alt='First'><img src='2.png'></carousel>",
        ));
        let lines = topic_lines(&tree, Some(1), Instant::now());
        assert_eq!(
            plain(&lines),
            vec![
                "Title",
                "",
                "Some bold text",
                "",
                "1. one",
                "2. two",
                "",
                "┌ rust [Copy]",
                "│ fn a() {}",
                "│ fn b() {}",
                "└",
                "",
                "⚠ WARNING",
                "Careful",
                "",
                "[slide 1 / 2] ◀ ▶ 1.png",
                "First",
            ]
        );
    }

    #[test]
    fn test_focused_widget_is_highlighted() {
        let tree = render("<code>a</code><code>b</code>");
        let lines = topic_lines(&tree, Some(1), Instant::now());
        let header_styles: Vec<_> = lines
            .iter()
            .filter(|l| l.spans.first().is_some_and(|s| s.content.starts_with('┌')))
            .map(|l| l.spans[0].style.fg)
            .collect();
        assert_eq!(header_styles, vec![Some(Color::DarkGray), Some(Color::Yellow)]);
    }

    #[test]
    fn test_empty_tabs_line() {
        let tree = render("<multicode></multicode>");
        let lines = topic_lines(&tree, None, Instant::now());
        assert_eq!(plain(&lines), vec!["┌ No code snippets yet"]);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("  "), " ");
    }
}
