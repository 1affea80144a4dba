use serde::Serialize;

/// One fragment of a block's text.
///
/// Spans own their text; math keeps its original delimiters so a client
/// math renderer receives `$...$` or `\(...\)` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineSpan {
    Text { text: String },
    Math { raw: String },
    Bold { text: String },
    Italic { text: String },
    Code { code: String },
    Link { text: String, url: String },
    Br,
}

impl InlineSpan {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }
}
