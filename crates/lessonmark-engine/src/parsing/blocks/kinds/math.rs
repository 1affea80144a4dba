/// Display math: `$$ ... $$` or `\[ ... \]`, on one line or spread over
/// several.
pub struct BlockMath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathDelim {
    Dollars,
    Brackets,
}

impl MathDelim {
    fn open(self) -> &'static str {
        match self {
            Self::Dollars => "$$",
            Self::Brackets => r"\[",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Dollars => "$$",
            Self::Brackets => r"\]",
        }
    }
}

impl BlockMath {
    /// A line whose closer is followed by more text is inline math inside a
    /// paragraph, not a block.
    pub fn opens(line: &str) -> Option<MathDelim> {
        let t = line.trim();
        let delim = [MathDelim::Dollars, MathDelim::Brackets]
            .into_iter()
            .find(|d| t.starts_with(d.open()))?;
        let rest = &t[delim.open().len()..];
        match rest.find(delim.close()) {
            Some(end) if !rest[end + delim.close().len()..].trim().is_empty() => None,
            _ => Some(delim),
        }
    }

    /// Reads a math block starting at `start`. Returns the TeX body and the
    /// index after the closing line, or `None` when no closer exists.
    pub fn collect(lines: &[&str], start: usize, delim: MathDelim) -> Option<(String, usize)> {
        let first = lines[start].trim();
        let after_open = &first[delim.open().len()..];

        if let Some(body) = after_open.strip_suffix(delim.close()) {
            return Some((body.trim().to_string(), start + 1));
        }

        let mut body: Vec<&str> = vec![];
        if !after_open.trim().is_empty() {
            body.push(after_open.trim());
        }
        for (i, line) in lines.iter().enumerate().skip(start + 1) {
            let t = line.trim();
            if let Some(last) = t.strip_suffix(delim.close()) {
                if !last.trim().is_empty() {
                    body.push(last.trim());
                }
                return Some((body.join("\n"), i + 1));
            }
            body.push(line.trim_end());
        }
        None
    }
}
