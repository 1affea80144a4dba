use crate::parsing::inline::cursor::Cursor;

/// Pipe tables: every row is wrapped in `|...|`.
pub struct Table;

impl Table {
    pub const PIPE: u8 = b'|';
    const ESCAPE: u8 = b'\\';
    const TICK: u8 = b'`';

    pub fn is_row(line: &str) -> bool {
        let t = line.trim();
        t.len() >= 2 && t.starts_with('|') && t.ends_with('|')
    }

    /// `|---|:---:|` style header boundary.
    pub fn is_separator(cells: &[String]) -> bool {
        !cells.is_empty()
            && cells.iter().all(|c| {
                !c.is_empty() && c.contains('-') && c.chars().all(|ch| ch == '-' || ch == ':')
            })
    }

    /// Splits a row into trimmed cells. Pipes inside backtick code spans and
    /// escaped `\|` do not split; the escape is removed.
    pub fn split_cells(line: &str) -> Vec<String> {
        let t = line.trim();
        let inner = t.strip_prefix('|').unwrap_or(t);
        let inner = inner.strip_suffix('|').unwrap_or(inner);

        let mut cur = Cursor::new(inner);
        let mut cells = vec![];
        let mut cell = String::new();

        while let Some(b) = cur.peek() {
            match b {
                Self::ESCAPE if cur.peek_at(1) == Some(Self::PIPE) => {
                    cell.push('|');
                    cur.bump_char();
                    cur.bump_char();
                }
                Self::TICK => {
                    let from = cur.pos();
                    if cur.skip_past(Self::TICK) {
                        cell.push_str(cur.since(from));
                    } else if let Some(c) = cur.bump_char() {
                        cell.push(c);
                    }
                }
                Self::PIPE => {
                    cells.push(cell.trim().to_string());
                    cell.clear();
                    cur.bump_char();
                }
                _ => {
                    if let Some(c) = cur.bump_char() {
                        cell.push(c);
                    }
                }
            }
        }
        cells.push(cell.trim().to_string());
        cells
    }

    /// Consumes consecutive rows from `start`. Returns `(has_header, rows, next)`.
    pub fn collect(lines: &[&str], start: usize) -> (bool, Vec<Vec<String>>, usize) {
        let mut rows = vec![];
        let mut has_header = false;
        let mut i = start;

        while i < lines.len() && Self::is_row(lines[i]) {
            let cells = Self::split_cells(lines[i]);
            if Self::is_separator(&cells) {
                has_header |= rows.len() == 1;
            } else {
                rows.push(cells);
            }
            i += 1;
        }
        (has_header, rows, i)
    }
}
