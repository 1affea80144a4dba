/// Bullet (`-`, `*`, `+`) and ordered (`1.`, `1)`) list items.
pub struct ListItem;

impl ListItem {
    pub const BULLETS: [char; 3] = ['-', '*', '+'];

    /// Returns `(ordered, item text)` when the line starts a list item.
    pub fn marker(line: &str) -> Option<(bool, &str)> {
        let t = line.trim_start();

        if let Some(first) = t.chars().next()
            && Self::BULLETS.contains(&first)
        {
            let rest = &t[1..];
            return rest
                .strip_prefix([' ', '\t'])
                .map(|text| (false, text.trim()));
        }

        let digits = t.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        let rest = t[digits..].strip_prefix(['.', ')'])?;
        rest.strip_prefix([' ', '\t']).map(|text| (true, text.trim()))
    }

    /// Consumes items from `start` until a blank line or a line for which
    /// `interrupts` holds for its index. Lines without a marker continue the
    /// last item.
    pub fn collect(
        lines: &[&str],
        start: usize,
        interrupts: impl Fn(usize) -> bool,
    ) -> (bool, Vec<String>, usize) {
        let ordered = Self::marker(lines[start]).is_some_and(|(o, _)| o);
        let mut items: Vec<String> = vec![];
        let mut i = start;

        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                break;
            }
            if let Some((_, text)) = Self::marker(line) {
                items.push(text.to_string());
            } else if i > start && interrupts(i) {
                break;
            } else if let Some(last) = items.last_mut() {
                last.push(' ');
                last.push_str(line.trim());
            }
            i += 1;
        }
        (ordered, items, i)
    }
}
