pub mod blocks;
pub mod inline;
pub mod normalize;
pub mod question;

#[cfg(test)]
mod tests;

use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};

use blocks::{Block, BlockBuilder};

pub use normalize::normalize;

/// Tunables for the legacy answer-key scan.
///
/// Old content put the `Answer:` line somewhere below the options instead of
/// inside a `<details>` region. The scan window and grace period only exist
/// for that content; nothing else depends on the exact numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// How many lines past the question start the fallback scan may look.
    pub answer_scan_window: usize,
    /// A heading or `---` only stops the scan once it is this far past the start.
    pub answer_scan_grace: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            answer_scan_window: 30,
            answer_scan_grace: 5,
        }
    }
}

/// Shared state threaded through the block and question parsers.
#[derive(Clone, Copy)]
pub struct ScanContext<'a> {
    pub options: &'a ParseOptions,
    pub sink: &'a dyn DiagnosticSink,
    /// Line number of `lines[0]` in the whole document (0-based).
    pub offset: usize,
}

impl<'a> ScanContext<'a> {
    pub fn new(options: &'a ParseOptions, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            options,
            sink,
            offset: 0,
        }
    }

    /// Context for a nested body starting at local line `start`.
    pub fn nested(&self, start: usize) -> Self {
        Self {
            offset: self.offset + start,
            ..*self
        }
    }

    /// 1-based document line for a local index.
    pub fn line_no(&self, local: usize) -> usize {
        self.offset + local + 1
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }
}

/// Parses lesson content into blocks, logging diagnostics through `log`.
pub fn parse(content: &str) -> Vec<Block> {
    parse_with(content, &ParseOptions::default(), &LogSink)
}

/// Parses lesson content with explicit options and diagnostic sink.
pub fn parse_with(content: &str, options: &ParseOptions, sink: &dyn DiagnosticSink) -> Vec<Block> {
    let normalized = normalize(content);
    let lines: Vec<&str> = normalized.split('\n').collect();
    BlockBuilder::new(&lines, ScanContext::new(options, sink)).build()
}
