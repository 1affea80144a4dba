//! Block-specific types that own their syntax delimiters.
//!
//! The builder asks these types whether a line opens their block and lets
//! them consume lines; it never hardcodes `|`, `:::` or `$$` itself.

pub mod block_quote;
pub mod code_fence;
pub mod directive;
pub mod heading;
pub mod list;
pub mod math;
pub mod paragraph;
pub mod rule;
pub mod table;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceOpen};
pub use directive::{Directive, DirectiveName, DirectiveOpen};
pub use heading::Heading;
pub use list::ListItem;
pub use math::{BlockMath, MathDelim};
pub use paragraph::Paragraph;
pub use rule::ThematicBreak;
pub use table::Table;
