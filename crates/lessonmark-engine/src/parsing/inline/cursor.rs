/// A byte cursor over a line of text.
///
/// Used where a scan has to honour raw zones (code spans, escapes) that a
/// plain `split` would cut through.
#[derive(Clone)]
pub struct Cursor<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Current byte offset into the input.
    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Peeks `n` bytes ahead of the current position.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    /// Advances past the current character (not byte), returning it.
    pub fn bump_char(&mut self) -> Option<char> {
        let c = self.s[self.i..].chars().next()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances to the next occurrence of `b` after the current position and
    /// returns true, or leaves the cursor untouched and returns false.
    pub fn skip_past(&mut self, b: u8) -> bool {
        let Some(tail) = self.s.as_bytes().get(self.i + 1..) else {
            return false;
        };
        match tail.iter().position(|&x| x == b) {
            Some(off) => {
                self.i += off + 2;
                true
            }
            None => false,
        }
    }

    /// Text between `from` and the current position.
    pub fn since(&self, from: usize) -> &'a str {
        &self.s[from..self.i]
    }
}
