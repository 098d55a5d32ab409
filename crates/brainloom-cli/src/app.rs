use brainloom_content::display::{Clipboard, WidgetMut};
use brainloom_content::{DisplayTree, RenderOptions, TopicStore, render_with};
use ratatui::widgets::ListState;
use std::time::Instant;

/// Viewer state: the topic list, the rendered topic and the focused widget.
pub struct App<S: TopicStore> {
    store: S,
    options: RenderOptions,
    pub topics: Vec<String>,
    pub topic_list_state: ListState,
    pub tree: Option<DisplayTree>,
    /// Index into the rendered topic's widgets, in document order
    pub focus: Option<usize>,
    pub status: Option<String>,
    pub scroll: u16,
}

impl<S: TopicStore> App<S> {
    pub fn new(store: S, options: RenderOptions) -> anyhow::Result<Self> {
        let topics = store.topics()?;

        let mut app = Self {
            store,
            options,
            topics,
            topic_list_state: ListState::default(),
            tree: None,
            focus: None,
            status: None,
            scroll: 0,
        };

        // Select first topic if available
        if !app.topics.is_empty() {
            app.topic_list_state.select(Some(0));
            app.load_selected();
        }

        Ok(app)
    }

    pub fn selected_topic(&self) -> Option<&str> {
        self.topic_list_state
            .selected()
            .and_then(|i| self.topics.get(i))
            .map(String::as_str)
    }

    pub fn next_topic(&mut self) {
        if self.topics.is_empty() {
            return;
        }
        let i = match self.topic_list_state.selected() {
            Some(i) => (i + 1) % self.topics.len(),
            None => 0,
        };
        self.topic_list_state.select(Some(i));
        self.load_selected();
    }

    pub fn previous_topic(&mut self) {
        if self.topics.is_empty() {
            return;
        }
        let i = match self.topic_list_state.selected() {
            Some(0) | None => self.topics.len() - 1,
            Some(i) => i - 1,
        };
        self.topic_list_state.select(Some(i));
        self.load_selected();
    }

    fn load_selected(&mut self) {
        self.focus = None;
        self.scroll = 0;
        let Some(topic) = self.selected_topic().map(str::to_string) else {
            self.tree = None;
            return;
        };
        match self.store.load(&topic) {
            Ok(markup) => {
                let tree = render_with(&markup, &self.options);
                self.status = None;
                if tree.widget_count() > 0 {
                    self.focus = Some(0);
                }
                self.tree = Some(tree);
            }
            Err(e) => {
                log::debug!("failed to load topic {topic}: {e}");
                self.status = Some(format!("Error loading topic: {e}"));
                self.tree = None;
            }
        }
    }

    /// Move focus to the next widget, wrapping to the first.
    pub fn focus_next_widget(&mut self) {
        let count = self.tree.as_ref().map_or(0, DisplayTree::widget_count);
        self.focus = match (self.focus, count) {
            (_, 0) => None,
            (Some(i), n) => Some((i + 1) % n),
            (None, _) => Some(0),
        };
    }

    /// Step the focused gallery or tab strip forwards or backwards.
    pub fn step_focused(&mut self, forward: bool) {
        let Some(widget) = self.focused_widget() else {
            return;
        };
        match widget {
            WidgetMut::Gallery(gallery) => {
                if forward {
                    gallery.next();
                } else {
                    gallery.previous();
                }
            }
            WidgetMut::Tabs(tabs) => {
                let count = tabs.tabs().len();
                if count > 0 {
                    let active = tabs.active_index();
                    let target = if forward {
                        (active + 1) % count
                    } else {
                        (active + count - 1) % count
                    };
                    tabs.select(target);
                }
            }
            WidgetMut::Code(_) => {}
        }
    }

    /// Copy the focused code view or the active tab.
    pub fn copy_focused(&mut self, clipboard: &mut dyn Clipboard, now: Instant) {
        let result = match self.focused_widget() {
            Some(WidgetMut::Code(view)) => view.copy_code(clipboard, now),
            Some(WidgetMut::Tabs(tabs)) => tabs.copy_active(clipboard, now),
            Some(WidgetMut::Gallery(_)) | None => return,
        };
        self.status = match result {
            Ok(()) => None,
            Err(e) => {
                log::debug!("copy failed: {e}");
                Some(format!("Copy failed: {e}"))
            }
        };
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(5);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(5);
    }

    fn focused_widget(&mut self) -> Option<WidgetMut<'_>> {
        let index = self.focus?;
        self.tree.as_mut()?.widgets_mut().into_iter().nth(index)
    }
}
