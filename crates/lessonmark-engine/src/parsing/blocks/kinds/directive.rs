//! `:::name{attr="value"} ... :::` fenced custom blocks.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveName {
    Image,
    Video,
    Callout,
    Reveal,
    Tabs,
}

impl DirectiveName {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "callout" => Some(Self::Callout),
            "reveal" => Some(Self::Reveal),
            "tabs" => Some(Self::Tabs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveOpen {
    pub name: DirectiveName,
    pub attrs: BTreeMap<String, String>,
}

pub struct Directive;

impl Directive {
    pub const FENCE: &'static str = ":::";
    /// Splits a `:::tabs` body into tabs.
    pub const TAB_MARK: &'static str = "@tab";

    pub fn open(line: &str) -> Option<DirectiveOpen> {
        static OPEN: OnceLock<Regex> = OnceLock::new();
        let re = OPEN.get_or_init(|| {
            Regex::new(r"^:::([a-z]+)\s*(?:\{(.*)\})?\s*$").expect("Invalid directive regex")
        });

        let caps = re.captures(line.trim())?;
        let name = DirectiveName::from_name(caps.get(1)?.as_str())?;
        let attrs = caps
            .get(2)
            .map(|m| Self::attrs(m.as_str()))
            .unwrap_or_default();
        Some(DirectiveOpen { name, attrs })
    }

    /// Parses `key="value" other="x"` pairs.
    pub fn attrs(s: &str) -> BTreeMap<String, String> {
        static ATTR: OnceLock<Regex> = OnceLock::new();
        let re = ATTR.get_or_init(|| {
            Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#).expect("Invalid attribute regex")
        });
        re.captures_iter(s)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect()
    }

    pub fn closes(line: &str) -> bool {
        line.trim() == Self::FENCE
    }

    /// Finds the line that closes the directive opened at `start`, counting
    /// nested directive openers.
    pub fn find_close(lines: &[&str], start: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, line) in lines.iter().enumerate().skip(start + 1) {
            if Self::closes(line) {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            } else if line.trim_start().starts_with(Self::FENCE) && Self::open(line).is_some() {
                depth += 1;
            }
        }
        None
    }

    /// Reads `key: value` lines, lower-casing keys. Other lines are ignored.
    pub fn fields(lines: &[&str]) -> BTreeMap<String, String> {
        lines
            .iter()
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .filter(|(k, v)| !k.is_empty() && !k.contains(' ') && !v.is_empty())
            .collect()
    }

    /// Splits a tabs body at `@tab Label` lines. Returns the labels with the
    /// local line ranges of their bodies, plus whether non-blank content
    /// appeared before the first tab.
    pub fn tab_ranges(body: &[&str]) -> (Vec<(String, std::ops::Range<usize>)>, bool) {
        let mut tabs: Vec<(String, std::ops::Range<usize>)> = vec![];
        let mut stray = false;

        for (i, line) in body.iter().enumerate() {
            let t = line.trim();
            if let Some(label) = t.strip_prefix(Self::TAB_MARK)
                && (label.is_empty() || label.starts_with(' '))
            {
                if let Some((_, range)) = tabs.last_mut() {
                    range.end = i;
                }
                tabs.push((label.trim().to_string(), i + 1..body.len()));
            } else if tabs.is_empty() && !t.is_empty() {
                stray = true;
            }
        }
        (tabs, stray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_with_attributes() {
        let open = Directive::open(r#":::callout{type="warning" title="Careful"}"#).unwrap();
        assert_eq!(open.name, DirectiveName::Callout);
        assert_eq!(open.attrs["type"], "warning");
        assert_eq!(open.attrs["title"], "Careful");
    }

    #[test]
    fn open_without_attributes() {
        let open = Directive::open(":::image").unwrap();
        assert_eq!(open.name, DirectiveName::Image);
        assert!(open.attrs.is_empty());
    }

    #[test]
    fn unknown_directive_is_not_opened() {
        assert!(Directive::open(":::mystery").is_none());
        assert!(Directive::open(":::").is_none());
    }

    #[test]
    fn nested_directives_are_skipped_when_closing() {
        let lines = [":::callout", ":::image", "url: x", ":::", "text", ":::", "after"];
        assert_eq!(Directive::find_close(&lines, 0), Some(5));
    }

    #[test]
    fn missing_close() {
        let lines = [":::image", "url: x"];
        assert_eq!(Directive::find_close(&lines, 0), None);
    }

    #[test]
    fn fields_keep_urls_intact() {
        let fields = Directive::fields(&["url: https://example.com/a.png", "Alt: A cat", "junk"]);
        assert_eq!(fields["url"], "https://example.com/a.png");
        assert_eq!(fields["alt"], "A cat");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn tab_ranges_split_body() {
        let body = ["@tab Python", "print(1)", "", "@tab Rust", "fn main() {}"];
        let (tabs, stray) = Directive::tab_ranges(&body);
        assert!(!stray);
        assert_eq!(
            tabs,
            vec![("Python".to_string(), 1..3), ("Rust".to_string(), 4..5)]
        );
    }

    #[test]
    fn content_before_first_tab_is_flagged() {
        let (tabs, stray) = Directive::tab_ranges(&["intro", "@tab One", "x"]);
        assert!(stray);
        assert_eq!(tabs.len(), 1);
    }
}
