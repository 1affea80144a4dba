//! # Inline Splitting
//!
//! Splits the text of a paragraph, heading, list item or table cell into
//! [`InlineSpan`]s: text, math, bold, italic, code, link and line break.
//!
//! Blocks keep their text as written; splitting happens at render time.
//!
//! ## Modules
//!
//! - **`types`**: `InlineSpan`
//! - **`kinds`**: `InlineKind`, one pattern per construct
//! - **`cursor`**: byte cursor used by scans that must honour code spans
//! - **`parser`**: `split_inline()`

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::split_inline;
pub use types::InlineSpan;
