/// Blockquote block type with owned delimiter constant.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    pub fn opens(line: &str) -> bool {
        line.trim_start().starts_with(Self::PREFIX)
    }

    /// Quote depth of a line and the byte offset where its text starts.
    ///
    /// `> a`, `>> a` and `> > a` all count; the nesting is flattened when a
    /// quote is joined.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let mut depth = 0u8;
        let mut rest = s;
        while let Some(after) = rest.trim_start_matches(' ').strip_prefix(Self::PREFIX) {
            depth = depth.saturating_add(1);
            rest = after.strip_prefix(' ').unwrap_or(after);
        }
        if depth == 0 {
            return (0, 0);
        }
        (depth, s.len() - rest.len())
    }

    /// Consumes quote lines from `start` until a blank line, joining their
    /// text with spaces. Unprefixed lines are lazy continuations.
    pub fn collect(lines: &[&str], start: usize) -> (String, usize) {
        let mut parts: Vec<&str> = vec![];
        let mut i = start;
        while i < lines.len() && !lines[i].trim().is_empty() {
            let (_, idx) = Self::strip_prefixes(lines[i]);
            let text = lines[i][idx..].trim();
            if !text.is_empty() {
                parts.push(text);
            }
            i += 1;
        }
        (parts.join(" "), i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_no_quote() {
        assert_eq!(BlockQuote::strip_prefixes("hello"), (0, 0));
    }

    #[test]
    fn strip_nested_quote_no_space() {
        assert_eq!(BlockQuote::strip_prefixes(">> hello"), (2, 3));
    }

    #[test]
    fn collect_joins_until_blank() {
        let lines = ["> first", "> second", "lazy", "", "> other"];
        assert_eq!(
            BlockQuote::collect(&lines, 0),
            ("first second lazy".to_string(), 3)
        );
    }

    #[test]
    fn collect_skips_empty_quote_lines() {
        let lines = ["> a", ">", "> b"];
        assert_eq!(BlockQuote::collect(&lines, 0), ("a b".to_string(), 3));
    }
}
