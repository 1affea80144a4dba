//! # Block Parsing
//!
//! Two-phase, line-oriented block parsing for the lesson markup dialect.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` listing every block it could open, in precedence order.
//!
//! 2. **Block Construction** (`builder`): a `BlockBuilder` walks the lines,
//!    confirms openers with lookahead and emits `Block`s.
//!
//! ## Precedence
//!
//! directive, question marker, heading, blockquote, table, code fence, block
//! math, list, horizontal rule, paragraph.
//!
//! ## Key Invariants
//!
//! - Blank lines never produce blocks
//! - Unterminated constructs degrade to paragraphs instead of failing
//! - Code fences are raw zones, except that a `**Check Your Understanding**`
//!   line always ends them

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod open;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::{LessonLineClassifier, LineClass};
pub use open::{BlockOpen, try_open};
pub use types::{Block, QuestionBlock, QuestionOption, Tab, questions};
