/// Paragraph block type.
///
/// Paragraphs have no delimiters: they are the default leaf block when no
/// other block opener matches, and their lines are joined with spaces.
pub struct Paragraph;

impl Paragraph {
    /// Consumes `lines[start]` unconditionally, then every following line
    /// that is neither blank nor flagged by `interrupts` (called with the
    /// line index).
    pub fn collect(
        lines: &[&str],
        start: usize,
        interrupts: impl Fn(usize) -> bool,
    ) -> (String, usize) {
        let mut parts = vec![lines[start].trim()];
        let mut i = start + 1;
        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() || interrupts(i) {
                break;
            }
            parts.push(line.trim());
            i += 1;
        }
        (parts.join(" "), i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_lines_with_spaces() {
        let lines = ["first", "  second  ", "", "third"];
        assert_eq!(
            Paragraph::collect(&lines, 0, |_| false),
            ("first second".to_string(), 2)
        );
    }

    #[test]
    fn first_line_is_always_taken() {
        let lines = ["# looks special", "next"];
        assert_eq!(
            Paragraph::collect(&lines, 0, |i| lines[i].starts_with('#')),
            ("# looks special next".to_string(), 2)
        );
    }
}
