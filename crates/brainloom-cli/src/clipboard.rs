use brainloom_content::display::{Clipboard, ClipboardError};
use copypasta_ext::prelude::*;

/// The desktop clipboard, opened per copy.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut ctx = copypasta_ext::try_context().ok_or_else(|| {
            ClipboardError::Unavailable("no supported clipboard found".to_string())
        })?;
        ctx.set_contents(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
        log::debug!("copied {} bytes to the system clipboard", text.len());
        Ok(())
    }
}
