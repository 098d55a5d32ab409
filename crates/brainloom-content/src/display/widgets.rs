//! Interactive presentation widgets.
//!
//! Each widget owns its own UI state (copied timer, active tab, current
//! slide); nothing is shared between widgets or documents. Time is passed in
//! by the caller so the copied state is deterministic under test.

use std::time::{Duration, Instant};

use super::DisplayNode;

/// How long a copy button reports "Copied" after a successful copy.
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

pub const DEFAULT_FIGURE_ALT: &str = "Topic illustration";
pub const DEFAULT_SLIDE_CAPTION: &str = "Module step visualization";
pub const EMPTY_TABS_MESSAGE: &str = "No code snippets yet";

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write to clipboard: {0}")]
    Write(String),
}

/// Destination of copy-to-clipboard actions.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-memory clipboard for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub content: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.content = Some(text.to_string());
        Ok(())
    }
}

/// Copy affordance with a transient "copied" state.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyButton {
    feedback: Duration,
    copied_at: Option<Instant>,
}

impl CopyButton {
    pub fn new(feedback: Duration) -> Self {
        Self {
            feedback,
            copied_at: None,
        }
    }

    /// Put `text` on the clipboard and enter the copied state. On failure the
    /// state is left as it was.
    pub fn press(
        &mut self,
        text: &str,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        clipboard.set_text(text)?;
        self.copied_at = Some(now);
        Ok(())
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.feedback)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_copied(now) { "Copied" } else { "Copy" }
    }
}

impl Default for CopyButton {
    fn default() -> Self {
        Self::new(COPIED_FEEDBACK)
    }
}

/// A `<code>` element: highlighted source with a copy button.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeView {
    pub language: String,
    /// Text content exactly as extracted from the markup
    pub code: String,
    pub copy: CopyButton,
}

impl CodeView {
    /// Code as displayed, surrounding whitespace trimmed.
    pub fn display_code(&self) -> &str {
        self.code.trim()
    }

    /// Copy the untrimmed code.
    pub fn copy_code(
        &mut self,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        self.copy.press(&self.code, clipboard, now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTab {
    pub label: String,
    pub language: String,
    pub content: String,
}

/// A `<multicode>` element: one tab per snippet, first tab selected.
#[derive(Debug, Clone, PartialEq)]
pub struct TabbedCode {
    tabs: Vec<CodeTab>,
    active: usize,
    pub copy: CopyButton,
}

impl TabbedCode {
    pub fn new(tabs: Vec<CodeTab>, copy: CopyButton) -> Self {
        Self {
            tabs,
            active: 0,
            copy,
        }
    }

    pub fn tabs(&self) -> &[CodeTab] {
        &self.tabs
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// `None` when there are no snippets; show the empty state instead.
    pub fn active_tab(&self) -> Option<&CodeTab> {
        self.tabs.get(self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Select tab `index`. Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn copy_active(
        &mut self,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        match self.tabs.get(self.active) {
            Some(tab) => self.copy.press(&tab.content, clipboard, now),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Info,
    Warning,
    Tip,
    Success,
    Error,
}

impl CalloutKind {
    /// Kind named by a note's `type` attribute; unknown or missing is `Info`.
    pub fn from_type(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("warning") => CalloutKind::Warning,
            Some("tip") => CalloutKind::Tip,
            Some("success") => CalloutKind::Success,
            Some("error") => CalloutKind::Error,
            _ => CalloutKind::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CalloutKind::Info => "info",
            CalloutKind::Warning => "warning",
            CalloutKind::Tip => "tip",
            CalloutKind::Success => "success",
            CalloutKind::Error => "error",
        }
    }

    /// Material symbol name shown beside the callout.
    pub fn icon(self) -> &'static str {
        match self {
            CalloutKind::Info => "info",
            CalloutKind::Warning => "warning",
            CalloutKind::Tip => "lightbulb",
            CalloutKind::Success => "check_circle",
            CalloutKind::Error => "error",
        }
    }
}

/// A `<note>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub kind: CalloutKind,
    pub children: Vec<DisplayNode>,
}

/// A standalone `<img>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub src: String,
    pub alt: Option<String>,
}

impl Figure {
    /// Caption shown under the image, only when the markup gave an `alt`.
    pub fn caption(&self) -> Option<&str> {
        self.alt.as_deref().filter(|a| !a.is_empty())
    }

    pub fn alt_text(&self) -> &str {
        self.caption().unwrap_or(DEFAULT_FIGURE_ALT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub url: String,
    pub caption: String,
}

impl Slide {
    pub fn display_caption(&self) -> &str {
        if self.caption.is_empty() {
            DEFAULT_SLIDE_CAPTION
        } else {
            &self.caption
        }
    }
}

/// A `<carousel>` element: one slide visible at a time, wrapping at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    slides: Vec<Slide>,
    current: usize,
}

impl Gallery {
    /// `None` for a carousel without images; nothing is rendered for it.
    pub fn new(slides: Vec<Slide>) -> Option<Self> {
        if slides.is_empty() {
            None
        } else {
            Some(Self { slides, current: 0 })
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Previous/next controls and dots only appear with more than one slide.
    pub fn has_controls(&self) -> bool {
        self.slides.len() > 1
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.slides.len();
    }

    pub fn previous(&mut self) {
        self.current = if self.current == 0 {
            self.slides.len() - 1
        } else {
            self.current - 1
        };
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Position indicator, `current / total` counted from 1.
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.current + 1, self.slides.len())
    }
}
