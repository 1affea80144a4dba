//! HTML output for parsed lessons and V2 sections.
//!
//! Math is emitted with its delimiters for a client-side renderer.

pub mod html;

pub use html::{RenderContext, render_blocks, render_component, render_inline, render_section};
