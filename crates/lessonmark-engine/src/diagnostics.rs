//! Parser diagnostics.
//!
//! The parser never fails; instead it reports recoverable oddities (an
//! unterminated directive, a question without an answer key, ...) to a
//! caller-supplied [`DiagnosticSink`]. Nothing here is global state.

use std::cell::RefCell;

/// How loudly a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Expected fallback behaviour, useful when debugging content.
    Debug,
    /// Content that renders, but probably not the way the author intended.
    Warning,
}

/// What the parser noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnterminatedDirective,
    MissingDirectiveField,
    ContentBeforeFirstTab,
    UnterminatedFence,
    FenceCutAtQuestion,
    UnterminatedMath,
    UnterminatedDetails,
    QuestionWithoutOptions,
    MissingAnswerKey,
    AnswerOutOfRange,
    LegacyAnswerScan,
}

/// A single report from the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based line number in the normalized source.
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn debug(kind: DiagnosticKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Debug,
            line,
            kind,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            line,
            kind,
            message: message.into(),
        }
    }
}

/// Receives diagnostics emitted while parsing.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, d: Diagnostic) {
        match d.severity {
            Severity::Debug => log::debug!("line {}: {:?}: {}", d.line, d.kind, d.message),
            Severity::Warning => log::warn!("line {}: {:?}: {}", d.line, d.kind, d.message),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory, in the order they were reported.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.seen.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.seen.borrow().iter().map(|d| d.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.seen.borrow_mut().push(diagnostic);
    }
}
