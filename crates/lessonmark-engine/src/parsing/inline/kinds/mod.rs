//! # Inline Kinds
//!
//! Each inline construct owns its pattern. The splitter never hardcodes a
//! delimiter; it asks every [`InlineKind`] for its earliest match.
//!
//! Declaration order matters: when two kinds match at the same byte, the one
//! listed first in [`InlineKind::ALL`] wins.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::types::InlineSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    /// `$$..$$`, `$..$`, `\(..\)`, `\[..\]`
    Math,
    /// `**..**`
    Bold,
    /// `_.._`, also inside words
    Italic,
    /// `` `..` ``
    Code,
    /// `[text](url)`
    Link,
    /// `<br>`, `<br/>`, `<br />`
    Br,
}

impl InlineKind {
    pub const ALL: [InlineKind; 6] = [
        Self::Math,
        Self::Bold,
        Self::Italic,
        Self::Code,
        Self::Link,
        Self::Br,
    ];

    pub fn regex(self) -> &'static Regex {
        static MATH: OnceLock<Regex> = OnceLock::new();
        static BOLD: OnceLock<Regex> = OnceLock::new();
        static ITALIC: OnceLock<Regex> = OnceLock::new();
        static CODE: OnceLock<Regex> = OnceLock::new();
        static LINK: OnceLock<Regex> = OnceLock::new();
        static BR: OnceLock<Regex> = OnceLock::new();

        match self {
            Self::Math => MATH.get_or_init(|| {
                Regex::new(r"\$\$[^$]+?\$\$|\$[^$\n]+?\$|\\\((?s:.+?)\\\)|\\\[(?s:.+?)\\\]")
                    .expect("Invalid math regex")
            }),
            Self::Bold => {
                BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"))
            }
            Self::Italic => {
                ITALIC.get_or_init(|| Regex::new(r"_([^_\n]+?)_").expect("Invalid italic regex"))
            }
            Self::Code => {
                CODE.get_or_init(|| Regex::new(r"`([^`\n]+?)`").expect("Invalid code regex"))
            }
            Self::Link => LINK.get_or_init(|| {
                Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)\)").expect("Invalid link regex")
            }),
            Self::Br => BR.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid br regex")),
        }
    }

    /// Builds the span for a match of this kind.
    pub fn span(self, caps: &Captures<'_>) -> InlineSpan {
        let group = |n: usize| caps.get(n).map_or("", |m| m.as_str()).to_string();
        match self {
            Self::Math => InlineSpan::Math { raw: group(0) },
            Self::Bold => InlineSpan::Bold { text: group(1) },
            Self::Italic => InlineSpan::Italic { text: group(1) },
            Self::Code => InlineSpan::Code { code: group(1) },
            Self::Link => InlineSpan::Link {
                text: group(1),
                url: group(2),
            },
            Self::Br => InlineSpan::Br,
        }
    }
}
