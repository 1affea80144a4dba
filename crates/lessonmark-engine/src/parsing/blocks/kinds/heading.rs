/// ATX and bold-only headings.
pub struct Heading;

impl Heading {
    pub const MARK: char = '#';
    pub const MAX_LEVEL: usize = 6;
    /// Level given to a bold-only line such as `**Key Ideas**`.
    pub const BOLD_LEVEL: u8 = 3;

    /// `## Title` -> `(2, "Title")`. A space after the hashes is required.
    pub fn atx(line: &str) -> Option<(u8, &str)> {
        let t = line.trim_start();
        let level = t.chars().take_while(|&c| c == Self::MARK).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let rest = &t[level..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        let text = rest.trim().trim_end_matches(Self::MARK).trim_end();
        if text.is_empty() {
            return None;
        }
        u8::try_from(level).ok().map(|l| (l, text))
    }

    /// `**Text**` on its own line, without a colon, is a heading.
    pub fn bold_only(line: &str) -> Option<&str> {
        let t = line.trim();
        let inner = t.strip_prefix("**")?.strip_suffix("**")?;
        let inner = inner.trim();
        if inner.is_empty() || inner.contains("**") || inner.contains(':') {
            return None;
        }
        Some(inner)
    }
}
