use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::parsing::{
    ScanContext,
    question::{QuestionDialect, parse_question},
};

use super::{
    classify::{LessonLineClassifier, LineClass},
    kinds::{
        BlockMath, BlockQuote, CodeFence, Directive, DirectiveName, DirectiveOpen, FenceOpen,
        ListItem, Paragraph, Table,
    },
    open::BlockOpen,
    types::{Block, Tab},
};

const DEFAULT_CALLOUT: &str = "note";
const DEFAULT_REVEAL_LABEL: &str = "Show more";

/// Turns a run of lines into blocks.
///
/// One left-to-right pass: at each non-blank line the classified openers are
/// tried in precedence order, each consuming as many lines as it needs. An
/// opener that cannot complete falls through to the next; a line with no
/// viable opener starts a paragraph. Directive bodies are built by a nested
/// builder over the same lines.
pub struct BlockBuilder<'a> {
    lines: &'a [&'a str],
    classes: Vec<LineClass>,
    ctx: ScanContext<'a>,
    out: Vec<Block>,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(lines: &'a [&'a str], ctx: ScanContext<'a>) -> Self {
        Self {
            lines,
            classes: LessonLineClassifier.classify_all(lines),
            ctx,
            out: vec![],
        }
    }

    pub fn build(mut self) -> Vec<Block> {
        let mut i = 0;
        while i < self.lines.len() {
            if self.classes[i].is_blank {
                i += 1;
                continue;
            }
            i = self.push_at(i);
        }
        self.out
    }

    fn push_at(&mut self, i: usize) -> usize {
        let opens = self.classes[i].opens.clone();
        for open in opens {
            if let Some((block, next)) = self.try_block(open, i) {
                self.out.push(block);
                return next;
            }
        }

        let (text, next) = Paragraph::collect(self.lines, i, |j| self.classes[j].interrupts());
        self.out.push(Block::Paragraph { text });
        next
    }

    fn try_block(&self, open: BlockOpen, i: usize) -> Option<(Block, usize)> {
        match open {
            BlockOpen::Directive(d) => self.directive(d, i),
            BlockOpen::Question(dialect) => parse_question(self.lines, i, dialect, &self.ctx)
                .map(|(q, next)| (Block::Question(q), next)),
            BlockOpen::Heading { level, text } => Some((Block::Heading { level, text }, i + 1)),
            BlockOpen::BlockQuote => {
                let (text, next) = BlockQuote::collect(self.lines, i);
                Some((Block::Blockquote { text }, next))
            }
            BlockOpen::Table => {
                let (has_header, rows, next) = Table::collect(self.lines, i);
                Some((Block::Table { has_header, rows }, next))
            }
            BlockOpen::Fence(fence) => self.fence(fence, i),
            BlockOpen::Math(delim) => match BlockMath::collect(self.lines, i, delim) {
                Some((tex, next)) => Some((Block::BlockMath { tex }, next)),
                None => {
                    self.ctx.report(Diagnostic::debug(
                        DiagnosticKind::UnterminatedMath,
                        self.ctx.line_no(i),
                        "math block has no closing delimiter, kept as text",
                    ));
                    None
                }
            },
            BlockOpen::List => {
                let (ordered, items, next) =
                    ListItem::collect(self.lines, i, |j| self.classes[j].interrupts());
                Some((Block::List { ordered, items }, next))
            }
            BlockOpen::Rule => Some((Block::Hr, i + 1)),
        }
    }

    fn fence(&self, open: FenceOpen, i: usize) -> Option<(Block, usize)> {
        let mut code: Vec<&str> = vec![];

        for (j, line) in self.lines.iter().enumerate().skip(i + 1) {
            if CodeFence::closes(open.kind, line) {
                let block = Block::Code {
                    language: open.language,
                    code: code.join("\n"),
                };
                return Some((block, j + 1));
            }
            // Authors regularly forget to close a fence right before a quiz.
            if QuestionDialect::is_check_understanding(line) {
                self.ctx.report(Diagnostic::warning(
                    DiagnosticKind::FenceCutAtQuestion,
                    self.ctx.line_no(j),
                    "code fence ended early at a question marker",
                ));
                let block = Block::Code {
                    language: open.language,
                    code: code.join("\n"),
                };
                return Some((block, j));
            }
            code.push(*line);
        }

        self.ctx.report(Diagnostic::debug(
            DiagnosticKind::UnterminatedFence,
            self.ctx.line_no(i),
            "code fence is never closed, kept as text",
        ));
        None
    }

    fn directive(&self, open: DirectiveOpen, i: usize) -> Option<(Block, usize)> {
        let Some(close) = Directive::find_close(self.lines, i) else {
            self.ctx.report(Diagnostic::debug(
                DiagnosticKind::UnterminatedDirective,
                self.ctx.line_no(i),
                format!("{:?} directive has no closing `:::`", open.name),
            ));
            return None;
        };
        let lines = self.lines;
        let body = &lines[i + 1..close];
        let mut attrs = open.attrs;

        let block = match open.name {
            DirectiveName::Image | DirectiveName::Video => {
                let mut fields = Directive::fields(body);
                let Some(url) = fields.remove("url") else {
                    self.ctx.report(Diagnostic::warning(
                        DiagnosticKind::MissingDirectiveField,
                        self.ctx.line_no(i),
                        format!("{:?} directive without `url`, kept as text", open.name),
                    ));
                    return None;
                };
                let caption = fields.remove("caption");
                if open.name == DirectiveName::Image {
                    Block::Image {
                        url,
                        alt: fields.remove("alt"),
                        caption,
                    }
                } else {
                    Block::EmbeddedVideo {
                        url,
                        title: fields.remove("title"),
                        caption,
                    }
                }
            }
            DirectiveName::Callout => Block::Callout {
                variant: attrs
                    .remove("type")
                    .unwrap_or_else(|| DEFAULT_CALLOUT.to_string()),
                title: attrs.remove("title"),
                body: self.nested(i + 1, close),
            },
            DirectiveName::Reveal => Block::Reveal {
                label: attrs
                    .remove("label")
                    .unwrap_or_else(|| DEFAULT_REVEAL_LABEL.to_string()),
                body: self.nested(i + 1, close),
            },
            DirectiveName::Tabs => {
                let (ranges, stray) = Directive::tab_ranges(body);
                if stray {
                    self.ctx.report(Diagnostic::warning(
                        DiagnosticKind::ContentBeforeFirstTab,
                        self.ctx.line_no(i + 1),
                        "content before the first `@tab` is dropped",
                    ));
                }
                let tabs = ranges
                    .into_iter()
                    .map(|(label, range)| Tab {
                        label,
                        body: self.nested(i + 1 + range.start, i + 1 + range.end),
                    })
                    .collect();
                Block::TabGroup { tabs }
            }
        };

        Some((block, close + 1))
    }

    fn nested(&self, start: usize, end: usize) -> Vec<Block> {
        let lines = self.lines;
        BlockBuilder::new(&lines[start..end], self.ctx.nested(start)).build()
    }
}
