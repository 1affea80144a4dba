use crate::parsing::question::QuestionDialect;

use super::kinds::{
    BlockMath, BlockQuote, CodeFence, Directive, DirectiveOpen, FenceOpen, Heading, ListItem,
    MathDelim, Table, ThematicBreak,
};

/// A block that a line could open, before any lookahead has confirmed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpen {
    Directive(DirectiveOpen),
    Question(QuestionDialect),
    Heading { level: u8, text: String },
    BlockQuote,
    Table,
    Fence(FenceOpen),
    Math(MathDelim),
    List,
    Rule,
}

/// Every opener matching `line`, in precedence order.
///
/// The builder tries them in turn; an opener whose block cannot be completed
/// (an unterminated directive, a question without options) yields to the next
/// one, and a line with no viable opener starts a paragraph.
pub fn try_open(line: &str) -> Vec<BlockOpen> {
    let mut opens = vec![];
    if line.trim().is_empty() {
        return opens;
    }

    if let Some(d) = Directive::open(line) {
        opens.push(BlockOpen::Directive(d));
    }
    if let Some(dialect) = QuestionDialect::detect(line) {
        opens.push(BlockOpen::Question(dialect));
    }
    if let Some((level, text)) = Heading::atx(line) {
        opens.push(BlockOpen::Heading {
            level,
            text: text.to_string(),
        });
    } else if let Some(text) = Heading::bold_only(line) {
        opens.push(BlockOpen::Heading {
            level: Heading::BOLD_LEVEL,
            text: text.to_string(),
        });
    }
    if BlockQuote::opens(line) {
        opens.push(BlockOpen::BlockQuote);
    }
    if Table::is_row(line) {
        opens.push(BlockOpen::Table);
    }
    if let Some(fence) = CodeFence::open(line) {
        opens.push(BlockOpen::Fence(fence));
    }
    if let Some(delim) = BlockMath::opens(line) {
        opens.push(BlockOpen::Math(delim));
    }
    let is_rule = ThematicBreak::is_rule(line);
    if !is_rule && ListItem::marker(line).is_some() {
        opens.push(BlockOpen::List);
    }
    if is_rule {
        opens.push(BlockOpen::Rule);
    }
    opens
}
