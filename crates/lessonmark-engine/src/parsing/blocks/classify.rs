use super::open::{BlockOpen, try_open};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context. Phase 2 (`builder`) applies
/// lookahead to decide which opener, if any, actually produces a block.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Whether the line is blank (whitespace only).
    pub is_blank: bool,
    /// Candidate block openers in precedence order.
    pub opens: Vec<BlockOpen>,
}

impl LineClass {
    /// A non-blank line that may start a block ends a running paragraph or list.
    pub fn interrupts(&self) -> bool {
        !self.opens.is_empty()
    }
}

/// Classifies individual lines for the block parsing phase.
pub struct LessonLineClassifier;

impl LessonLineClassifier {
    pub fn classify(&self, line: &str) -> LineClass {
        LineClass {
            is_blank: line.trim().is_empty(),
            opens: try_open(line),
        }
    }

    pub fn classify_all(&self, lines: &[&str]) -> Vec<LineClass> {
        lines.iter().map(|l| self.classify(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_has_no_openers() {
        let c = LessonLineClassifier.classify("  \t");
        assert!(c.is_blank);
        assert!(!c.interrupts());
    }

    #[test]
    fn heading_interrupts() {
        let c = LessonLineClassifier.classify("## Next");
        assert!(!c.is_blank);
        assert!(c.interrupts());
    }
}
