use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// When to decode HTML entities in stored markup before rendering it.
///
/// Some stored topics were written with their markup escaped a second time
/// (`&lt;p&gt;` instead of `<p>`). Decoding them once turns them back into
/// markup; decoding well-formed markup would turn escaped text into tags,
/// so there is no mode that decodes unconditionally.
///
/// Read from the `[display]` table of the config file as `never` or
/// `when-escaped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityNormalization {
    Never,
    /// Decode only input that contains escaped tags and no literal `<`
    #[default]
    WhenEscaped,
}

/// Apply one round of entity decoding to `markup` according to `mode`.
pub fn normalize_entities(markup: &str, mode: EntityNormalization) -> Cow<'_, str> {
    let decode = match mode {
        EntityNormalization::Never => false,
        EntityNormalization::WhenEscaped => looks_escaped(markup),
    };
    if decode {
        log::debug!("decoding entities in {} bytes of markup", markup.len());
        html_escape::decode_html_entities(markup)
    } else {
        Cow::Borrowed(markup)
    }
}

fn looks_escaped(markup: &str) -> bool {
    !markup.contains('<') && markup.contains("&lt;")
}
