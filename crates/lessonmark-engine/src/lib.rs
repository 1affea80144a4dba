pub mod diagnostics;
pub mod parsing;
pub mod quiz;
pub mod render;
pub mod sections;

// Re-export key types for easier usage
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, NullSink, Severity,
};
pub use parsing::blocks::{Block, QuestionBlock, QuestionOption, Tab, questions};
pub use parsing::inline::{InlineSpan, split_inline};
pub use parsing::{ParseOptions, normalize, parse, parse_with};
pub use quiz::{InlineAnswers, ShuffledQuestion, Verdict};
pub use render::{RenderContext, render_blocks};
pub use sections::{ContentPayload, GradingSession, SectionStore};
