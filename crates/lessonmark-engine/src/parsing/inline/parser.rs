use regex::Captures;

use super::{kinds::InlineKind, types::InlineSpan};

/// Splits `text` into inline spans, left to right.
///
/// At each position every kind reports its earliest match; the match with the
/// lowest start wins, ties going to the kind declared first. Text before the
/// match becomes a `Text` span and scanning resumes after it. Whatever is left
/// when nothing matches is a single trailing `Text` span.
pub fn split_inline(text: &str) -> Vec<InlineSpan> {
    let mut out = vec![];
    let mut pos = 0;

    while pos < text.len() {
        let mut best: Option<(InlineKind, Captures<'_>, usize)> = None;
        for kind in InlineKind::ALL {
            let Some(caps) = kind.regex().captures_at(text, pos) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let better = match &best {
                Some((_, _, start)) => whole.start() < *start,
                None => true,
            };
            if better {
                best = Some((kind, caps, whole.start()));
            }
        }

        let Some((kind, caps, start)) = best else {
            break;
        };
        if start > pos {
            out.push(InlineSpan::text(&text[pos..start]));
        }
        out.push(kind.span(&caps));
        pos = caps.get(0).map_or(text.len(), |m| m.end());
    }

    if pos < text.len() {
        out.push(InlineSpan::text(&text[pos..]));
    }
    out
}
