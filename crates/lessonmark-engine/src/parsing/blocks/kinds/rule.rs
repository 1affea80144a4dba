/// Horizontal rule: three or more of the same `-`, `*` or `_`, spaces allowed.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKS: [char; 3] = ['-', '*', '_'];

    pub fn is_rule(line: &str) -> bool {
        let mut marks = line.chars().filter(|c| !c.is_whitespace());
        let Some(first) = marks.next() else {
            return false;
        };
        if !Self::MARKS.contains(&first) {
            return false;
        }
        let mut count = 1;
        for c in marks {
            if c != first {
                return false;
            }
            count += 1;
        }
        count >= 3
    }
}
