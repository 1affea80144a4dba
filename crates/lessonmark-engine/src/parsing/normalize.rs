//! Source text normalization applied before block parsing.
//!
//! Content arrives from a CMS that escapes HTML and doubles LaTeX
//! backslashes inconsistently. [`normalize`] undoes both and unifies line
//! endings. Every step runs to a fixed point so the function is idempotent.

/// The only entities we decode. `&nbsp;` becomes a plain space.
const ENTITIES: [(&str, char); 6] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&nbsp;", ' '),
];

const MATH_DELIMS: [char; 4] = ['(', ')', '[', ']'];

/// Normalizes raw content: line endings, HTML entities, LaTeX delimiters.
pub fn normalize(raw: &str) -> String {
    let mut out = normalize_line_endings(raw);

    while let Some(next) = decode_entities_once(&out) {
        out = next;
    }
    while let Some(next) = collapse_math_backslashes_once(&out) {
        out = next;
    }
    out
}

fn normalize_line_endings(raw: &str) -> String {
    if !raw.contains('\r') {
        return raw.to_string();
    }
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// One left-to-right decoding pass. `None` when nothing was decoded.
fn decode_entities_once(s: &str) -> Option<String> {
    if !s.contains('&') {
        return None;
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    let mut changed = false;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match ENTITIES.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, ch)) => {
                out.push(*ch);
                rest = &tail[name.len()..];
                changed = true;
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    changed.then_some(out)
}

/// Turns `\\(` into `\(` (same for `)`, `[`, `]`). `None` when unchanged.
fn collapse_math_backslashes_once(s: &str) -> Option<String> {
    let mut out = s.to_string();
    let mut changed = false;
    for delim in MATH_DELIMS {
        let doubled = format!("\\\\{delim}");
        if out.contains(&doubled) {
            out = out.replace(&doubled, &format!("\\{delim}"));
            changed = true;
        }
    }
    changed.then_some(out)
}
