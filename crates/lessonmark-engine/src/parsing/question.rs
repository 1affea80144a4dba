//! Inline multiple-choice questions.
//!
//! Two authoring dialects produce the same [`QuestionBlock`]:
//!
//! ```text
//! Question: What is 2+2?          **Check Your Understanding**
//! A. 3
//! B. 4                            Which keyword declares a variable?
//! C. 5                            - A. let
//!                                 - B. use
//! **Answer:** B                   <details><summary>Show Answer</summary>
//!                                 **Answer:** A
//!                                 - ✅ **A** `let` introduces a binding
//!                                 </details>
//! ```
//!
//! Content written before the `<details>` convention sometimes puts the
//! answer further down; a bounded scan picks it up (see [`ParseOptions`]).
//!
//! [`ParseOptions`]: crate::parsing::ParseOptions

use std::sync::OnceLock;

use regex::Regex;

use crate::diagnostics::{Diagnostic, DiagnosticKind};

use super::{
    ScanContext,
    blocks::{
        QuestionBlock, QuestionOption,
        kinds::{Directive, Heading, ThematicBreak},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionDialect {
    /// `Question: ...` followed by `A.`..`D.` options.
    Prefixed,
    /// `**Check Your Understanding**`, free text, `- A.` options, `<details>`.
    CheckUnderstanding,
}

impl QuestionDialect {
    pub const CHECK_MARKER: &'static str = "**Check Your Understanding**";
    const PREFIX: &'static str = "question:";

    pub fn detect(line: &str) -> Option<Self> {
        if Self::is_check_understanding(line) {
            Some(Self::CheckUnderstanding)
        } else if plain(line).to_ascii_lowercase().starts_with(Self::PREFIX) {
            Some(Self::Prefixed)
        } else {
            None
        }
    }

    pub fn is_check_understanding(line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(Self::CHECK_MARKER)
    }
}

/// Parses the question starting at `lines[start]`.
///
/// Returns the question and the index of the first line after it, or `None`
/// when no options follow the marker (the caller then treats the line as
/// ordinary text).
pub fn parse_question(
    lines: &[&str],
    start: usize,
    dialect: QuestionDialect,
    ctx: &ScanContext<'_>,
) -> Option<(QuestionBlock, usize)> {
    let n = lines.len();
    let mut prompt: Vec<String> = vec![];
    let mut i = start + 1;

    match dialect {
        QuestionDialect::Prefixed => {
            let first = plain(lines[start]);
            let rest = first[QuestionDialect::PREFIX.len()..].trim();
            if !rest.is_empty() {
                prompt.push(rest.to_string());
            }
            while i < n && !is_blank(lines[i]) && option(lines[i]).is_none() {
                prompt.push(lines[i].trim().to_string());
                i += 1;
            }
        }
        QuestionDialect::CheckUnderstanding => {
            while i < n && option(lines[i]).is_none() {
                let line = lines[i];
                if !is_blank(line) {
                    if ends_prompt(line) {
                        break;
                    }
                    prompt.push(line.trim().to_string());
                }
                i += 1;
            }
        }
    }

    let (mut options, after_options) = collect_options(lines, i);
    if options.is_empty() {
        ctx.report(Diagnostic::debug(
            DiagnosticKind::QuestionWithoutOptions,
            ctx.line_no(start),
            "question marker without options, kept as text",
        ));
        return None;
    }

    let mut key = AnswerKey::default();
    let mut end = after_options;
    let next = (after_options..n)
        .find(|&k| !is_blank(lines[k]))
        .unwrap_or(n);

    if next < n {
        if is_details_open(lines[next]) {
            end = read_details(lines, next, &mut key, &mut options, ctx);
        } else if let Some((letter, inline_expl)) = answer_letter(lines[next]) {
            key.letter = Some(letter);
            key.push_explanation(inline_expl);
            end = next + 1;
            if let Some(expl) = lines.get(end).and_then(|l| explanation_line(l)) {
                key.push_explanation(expl);
                end += 1;
            }
        }
    }

    if key.letter.is_none() {
        key.letter = legacy_scan(lines, start, ctx);
    }

    let correct_index = match key.letter {
        Some(letter) => {
            let idx = options.iter().position(|o| o.label == letter);
            if idx.is_none() {
                ctx.report(Diagnostic::warning(
                    DiagnosticKind::AnswerOutOfRange,
                    ctx.line_no(start),
                    format!("answer {letter} does not name one of the options"),
                ));
            }
            idx
        }
        None => {
            ctx.report(Diagnostic::warning(
                DiagnosticKind::MissingAnswerKey,
                ctx.line_no(start),
                "question has no answer key and cannot be graded",
            ));
            None
        }
    };

    let question = QuestionBlock {
        question: prompt.join(" "),
        options,
        correct_index,
        explanation: key.explanation(),
    };
    Some((question, end))
}

#[derive(Default)]
struct AnswerKey {
    letter: Option<char>,
    explanation: Vec<String>,
}

impl AnswerKey {
    fn push_explanation(&mut self, text: String) {
        if !text.is_empty() {
            self.explanation.push(text);
        }
    }

    fn explanation(&self) -> Option<String> {
        (!self.explanation.is_empty()).then(|| self.explanation.join(" "))
    }
}

/// Options from `start`, skipping blank lines between them. Returns the
/// options and the index just past the last option line.
fn collect_options(lines: &[&str], start: usize) -> (Vec<QuestionOption>, usize) {
    let mut options: Vec<QuestionOption> = vec![];
    let mut end = start;
    let mut j = start;

    while j < lines.len() {
        if is_blank(lines[j]) {
            j += 1;
            continue;
        }
        match option(lines[j]) {
            Some((label, text)) if options.iter().all(|o| o.label != label) => {
                options.push(QuestionOption {
                    label,
                    text,
                    explanation: None,
                });
                j += 1;
                end = j;
            }
            _ => break,
        }
    }
    (options, end)
}

/// Reads a `<details>` region starting at `start`, returning the index after it.
fn read_details(
    lines: &[&str],
    start: usize,
    key: &mut AnswerKey,
    options: &mut [QuestionOption],
    ctx: &ScanContext<'_>,
) -> usize {
    let end = match (start..lines.len()).find(|&m| lines[m].contains("</details>")) {
        Some(close) => close + 1,
        None => {
            ctx.report(Diagnostic::warning(
                DiagnosticKind::UnterminatedDetails,
                ctx.line_no(start),
                "<details> region is never closed",
            ));
            (start + 1..lines.len())
                .find(|&m| Heading::atx(lines[m]).is_some() || ThematicBreak::is_rule(lines[m]))
                .unwrap_or(lines.len())
        }
    };

    let mut in_summary = false;
    for line in &lines[start..end] {
        if in_summary {
            in_summary = !line.contains("</summary>");
            continue;
        }
        if line.contains("<summary") && !line.contains("</summary>") {
            in_summary = true;
        }

        let text = strip_details_markup(line);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if let Some((label, expl)) = option_explanation(text) {
            if let Some(opt) = options.iter_mut().find(|o| o.label == label) {
                opt.explanation = Some(expl);
            }
        } else if let Some((letter, inline_expl)) = answer_letter(text) {
            key.letter.get_or_insert(letter);
            key.push_explanation(inline_expl);
        } else if let Some(expl) = explanation_line(text) {
            key.push_explanation(expl);
        } else {
            key.push_explanation(text.to_string());
        }
    }
    end
}

/// Looks for any `Answer:` line after `start`, bounded by the scan window.
fn legacy_scan(lines: &[&str], start: usize, ctx: &ScanContext<'_>) -> Option<char> {
    let opts = ctx.options;
    let limit = (start + opts.answer_scan_window + 1).min(lines.len());

    for m in start + 1..limit {
        let line = lines[m];
        if m > start + opts.answer_scan_grace
            && (Heading::atx(line).is_some() || line.trim() == "---")
        {
            break;
        }
        if let Some((letter, _)) = answer_letter(line) {
            ctx.report(Diagnostic::debug(
                DiagnosticKind::LegacyAnswerScan,
                ctx.line_no(m),
                "answer key found outside the question block",
            ));
            return Some(letter);
        }
    }
    None
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Line with bold markers removed and trimmed.
fn plain(line: &str) -> String {
    line.replace("**", "").trim().to_string()
}

fn is_details_open(line: &str) -> bool {
    line.trim_start().starts_with("<details")
}

/// Lines that cannot belong to a free-text question prompt.
fn ends_prompt(line: &str) -> bool {
    Heading::atx(line).is_some()
        || ThematicBreak::is_rule(line)
        || Directive::open(line).is_some()
        || is_details_open(line)
        || QuestionDialect::detect(line).is_some()
}

/// `A. text`, `- B) text`, `**C.** text`.
fn option(line: &str) -> Option<(char, String)> {
    static OPTION: OnceLock<Regex> = OnceLock::new();
    let re = OPTION.get_or_init(|| {
        Regex::new(r"^\s*(?:[-*+]\s+)?(?:\*\*)?([A-D])(?:\*\*)?[.)](?:\*\*)?\s+(.+?)\s*$")
            .expect("Invalid option regex")
    });
    let caps = re.captures(line)?;
    let label = caps[1].chars().next()?;
    Some((label, caps[2].to_string()))
}

/// `Answer: B`, `**Answer:** B`, `Correct answer: (b) because ...`.
/// Returns the upper-cased letter and any trailing explanation.
fn answer_letter(line: &str) -> Option<(char, String)> {
    static ANSWER: OnceLock<Regex> = OnceLock::new();
    let re = ANSWER.get_or_init(|| {
        Regex::new(r"(?i)^(?:[-*+]\s+)?(?:correct\s+)?answer\s*:\s*\(?([A-D])\b\)?[\s.):—–-]*(.*)$")
            .expect("Invalid answer regex")
    });
    let stripped = line.replace('*', "");
    let caps = re.captures(stripped.trim())?;
    let letter = caps[1].chars().next()?.to_ascii_uppercase();
    Some((letter, caps[2].trim().to_string()))
}

fn explanation_line(line: &str) -> Option<String> {
    let p = plain(line);
    let lower = p.to_ascii_lowercase();
    lower
        .starts_with("explanation:")
        .then(|| p["explanation:".len()..].trim().to_string())
}

/// `- ✅ **A** text`, `- **B:** text`, `- ❌ **C**: text`.
fn option_explanation(line: &str) -> Option<(char, String)> {
    static OPTION_EXPL: OnceLock<Regex> = OnceLock::new();
    let re = OPTION_EXPL.get_or_init(|| {
        Regex::new(r"^\*\*([A-D])[.):]?\*\*\s*[.):—–-]?\s*(.*)$")
            .expect("Invalid option explanation regex")
    });
    let rest = line
        .trim_start()
        .strip_prefix(['-', '*', '+'])?
        .strip_prefix([' ', '\t'])?;
    let caps = re.captures(strip_glyphs(rest))?;
    let label = caps[1].chars().next()?;
    Some((label, strip_glyphs(&caps[2]).trim().to_string()))
}

/// Drops leading whitespace and non-ASCII symbols such as ✅ or ❌.
fn strip_glyphs(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || (!c.is_ascii() && !c.is_alphanumeric()))
}

fn strip_details_markup(line: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let re = TAGS.get_or_init(|| {
        Regex::new(r"(?i)<summary[^>]*>.*?</summary>|</?(?:details|summary)\b[^>]*>")
            .expect("Invalid details regex")
    });
    re.replace_all(line, "").into_owned()
}
