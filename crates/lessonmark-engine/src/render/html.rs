use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::{
    parsing::{
        blocks::{Block, QuestionBlock},
        inline::{InlineSpan, split_inline},
        parse,
    },
    quiz::{InlineAnswers, ShuffledQuestion, Verdict},
    sections::{Component, ComponentKind, Section, TemplatePart, parse_template},
};

/// Learner context for rendering: shuffles are keyed by course and lesson,
/// and known answers are marked.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub course_id: &'a str,
    pub lesson_id: &'a str,
    pub answers: Option<&'a InlineAnswers>,
}

impl<'a> RenderContext<'a> {
    pub fn new(course_id: &'a str, lesson_id: &'a str) -> Self {
        Self {
            course_id,
            lesson_id,
            answers: None,
        }
    }

    pub fn with_answers(self, answers: &'a InlineAnswers) -> Self {
        Self {
            answers: Some(answers),
            ..self
        }
    }
}

/// Renders a lesson. Questions are numbered in document order, nested
/// ones included, matching [`questions`](crate::parsing::blocks::questions).
pub fn render_blocks(blocks: &[Block], ctx: &RenderContext<'_>) -> String {
    let mut r = HtmlRenderer::new(ctx);
    r.blocks(blocks);
    r.out
}

pub fn render_inline(s: &str) -> String {
    let mut out = String::new();
    for span in split_inline(s) {
        match span {
            InlineSpan::Text { text: t } => out.push_str(&text(&t)),
            InlineSpan::Math { raw } => {
                out.push_str(&format!("<span class=\"math\">{}</span>", text(&raw)));
            }
            InlineSpan::Bold { text: t } => {
                out.push_str(&format!("<strong>{}</strong>", render_inline(&t)));
            }
            InlineSpan::Italic { text: t } => {
                out.push_str(&format!("<em>{}</em>", render_inline(&t)));
            }
            InlineSpan::Code { code } => out.push_str(&format!("<code>{}</code>", text(&code))),
            InlineSpan::Link { text: t, url } => out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                attr(safe_url(&url)),
                render_inline(&t)
            )),
            InlineSpan::Br => out.push_str("<br>"),
        }
    }
    out
}

/// Renders every component of a section. Questions inside text and
/// callout components share one numbering across the section.
pub fn render_section(section: &Section, ctx: &RenderContext<'_>) -> String {
    let mut out = format!("<section class=\"lesson-section\" id=\"{}\">", attr(&section.id));
    if let Some(title) = &section.title {
        out.push_str(&format!("<h2>{}</h2>", render_inline(title)));
    }
    if let Some(description) = &section.description {
        out.push_str(&format!(
            "<p class=\"section-description\">{}</p>",
            render_inline(description)
        ));
    }
    let mut r = HtmlRenderer::new(ctx);
    for component in &section.components {
        out.push_str(&r.component(component));
    }
    out.push_str("</section>");
    out
}

/// Renders one V2 component on its own. Unknown types render as a warning box.
pub fn render_component(component: &Component, ctx: &RenderContext<'_>) -> String {
    HtmlRenderer::new(ctx).component(component)
}

struct HtmlRenderer<'c, 'a> {
    ctx: &'c RenderContext<'a>,
    out: String,
    question_index: usize,
}

impl<'c, 'a> HtmlRenderer<'c, 'a> {
    fn new(ctx: &'c RenderContext<'a>) -> Self {
        Self {
            ctx,
            out: String::new(),
            question_index: 0,
        }
    }

    fn component(&mut self, component: &Component) -> String {
        let body = match &component.kind {
            ComponentKind::Text { content } => self.nested(&parse(content)),
            ComponentKind::Heading { text: t, level } => {
                let level = (*level).clamp(1, 6);
                format!("<h{level}>{}</h{level}>", render_inline(t))
            }
            ComponentKind::Image { url, alt, caption } => {
                figure_image(url, alt.as_deref(), caption.as_deref())
            }
            ComponentKind::Video {
                url,
                title,
                caption,
            } => figure_video(url, title.as_deref(), caption.as_deref()),
            ComponentKind::Callout {
                variant,
                title,
                content,
            } => callout(
                variant.as_deref().unwrap_or("note"),
                title.as_deref(),
                &self.nested(&parse(content)),
            ),
            ComponentKind::Code { language, code } => code_block(language.as_deref(), code),
            ComponentKind::Math { tex } => math_block(tex),
            ComponentKind::MultipleChoice { question, options }
            | ComponentKind::MultiSelect { question, options } => {
                let mut out = format!(
                    "<p class=\"prompt\">{}</p><ol class=\"choices\">",
                    render_inline(question)
                );
                for (i, option) in options.iter().enumerate() {
                    out.push_str(&format!(
                        "<li data-index=\"{i}\">{}</li>",
                        render_inline(option)
                    ));
                }
                out.push_str("</ol>");
                out
            }
            ComponentKind::TrueFalse { statement } => {
                format!("<p class=\"prompt\">{}</p>", render_inline(statement))
            }
            ComponentKind::ShortAnswer { prompt } | ComponentKind::CodeExercise { prompt, .. } => {
                format!("<p class=\"prompt\">{}</p>", render_inline(prompt))
            }
            ComponentKind::Numeric { prompt, unit } => {
                let mut out = format!("<p class=\"prompt\">{}</p>", render_inline(prompt));
                if let Some(unit) = unit {
                    out.push_str(&format!("<span class=\"unit\">{}</span>", text(unit)));
                }
                out
            }
            ComponentKind::FillInBlank { template } => {
                let mut out = String::from("<p class=\"template\">");
                for part in parse_template(template) {
                    match part {
                        TemplatePart::Text(t) => out.push_str(&render_inline(&t)),
                        TemplatePart::Blank(id) => out.push_str(&format!(
                            "<span class=\"blank\" data-blank-id=\"{}\"></span>",
                            attr(&id)
                        )),
                    }
                }
                out.push_str("</p>");
                out
            }
            ComponentKind::Ordering { prompt, items } => {
                let mut out = format!(
                    "<p class=\"prompt\">{}</p><ol class=\"order-items\">",
                    render_inline(prompt)
                );
                for item in items {
                    out.push_str(&format!("<li>{}</li>", render_inline(item)));
                }
                out.push_str("</ol>");
                out
            }
            ComponentKind::Matching {
                prompt,
                left,
                right,
            } => {
                let mut out = format!("<p class=\"prompt\">{}</p>", render_inline(prompt));
                for (class, items) in [("match-left", left), ("match-right", right)] {
                    out.push_str(&format!("<ul class=\"{class}\">"));
                    for item in items {
                        out.push_str(&format!("<li>{}</li>", render_inline(item)));
                    }
                    out.push_str("</ul>");
                }
                out
            }
            ComponentKind::Unknown { type_name } => {
                return format!(
                    "<div class=\"component-warning\" role=\"alert\">Unknown component type <code>{}</code></div>",
                    text(type_name)
                );
            }
        };

        format!(
            "<div class=\"component component-{}\" data-component-id=\"{}\">{body}</div>",
            attr(component.kind.type_name()),
            attr(&component.id)
        )
    }

    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, text: t } => {
                let level = (*level).clamp(1, 6);
                self.push(&format!("<h{level}>{}</h{level}>", render_inline(t)));
            }
            Block::Paragraph { text: t } => self.push(&format!("<p>{}</p>", render_inline(t))),
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                self.push(&format!("<{tag}>"));
                for item in items {
                    self.push(&format!("<li>{}</li>", render_inline(item)));
                }
                self.push(&format!("</{tag}>"));
            }
            Block::Table { has_header, rows } => self.table(*has_header, rows),
            Block::Code { language, code } => self.push(&code_block(language.as_deref(), code)),
            Block::BlockMath { tex } => self.push(&math_block(tex)),
            Block::Image { url, alt, caption } => {
                self.push(&figure_image(url, alt.as_deref(), caption.as_deref()));
            }
            Block::EmbeddedVideo {
                url,
                title,
                caption,
            } => self.push(&figure_video(url, title.as_deref(), caption.as_deref())),
            Block::Callout {
                variant,
                title,
                body,
            } => {
                let inner = self.nested(body);
                self.push(&callout(variant, title.as_deref(), &inner));
            }
            Block::Reveal { label, body } => {
                let inner = self.nested(body);
                self.push(&format!(
                    "<details class=\"reveal\"><summary>{}</summary>{inner}</details>",
                    render_inline(label)
                ));
            }
            Block::TabGroup { tabs } => {
                self.push("<div class=\"tabs\">");
                for tab in tabs {
                    let inner = self.nested(&tab.body);
                    self.push(&format!(
                        "<div class=\"tab\" data-label=\"{}\">{inner}</div>",
                        attr(&tab.label)
                    ));
                }
                self.push("</div>");
            }
            Block::Question(q) => self.question(q),
            Block::Hr => self.push("<hr>"),
            Block::Blockquote { text: t } => {
                self.push(&format!("<blockquote><p>{}</p></blockquote>", render_inline(t)));
            }
        }
    }

    /// Renders `body` into a string, keeping the question numbering.
    fn nested(&mut self, body: &[Block]) -> String {
        let outer = std::mem::take(&mut self.out);
        self.blocks(body);
        std::mem::replace(&mut self.out, outer)
    }

    fn table(&mut self, has_header: bool, rows: &[Vec<String>]) {
        self.push("<table>");
        let (head, body) = match rows.split_first() {
            Some((first, rest)) if has_header => (Some(first), rest),
            _ => (None, rows),
        };
        if let Some(head) = head {
            self.push("<thead><tr>");
            for cell in head {
                self.push(&format!("<th>{}</th>", render_inline(cell)));
            }
            self.push("</tr></thead>");
        }
        self.push("<tbody>");
        for row in body {
            self.push("<tr>");
            for cell in row {
                self.push(&format!("<td>{}</td>", render_inline(cell)));
            }
            self.push("</tr>");
        }
        self.push("</tbody></table>");
    }

    fn question(&mut self, q: &QuestionBlock) {
        let index = self.question_index;
        self.question_index += 1;

        let shuffled = ShuffledQuestion::new(q, index, self.ctx.course_id, self.ctx.lesson_id);
        let selected = self.ctx.answers.and_then(|a| a.selected(index));
        let verdict = self.ctx.answers.map(|a| a.check(index, q));

        let mut class = String::from("question");
        match verdict {
            Some(Verdict::Correct) => class.push_str(" question-correct"),
            Some(Verdict::Incorrect) => class.push_str(" question-incorrect"),
            _ => {}
        }
        if !q.has_answer_key() {
            class.push_str(" question-ungradable");
        }

        self.push(&format!(
            "<div class=\"{class}\" data-question-index=\"{index}\"><p class=\"question-text\">{}</p><ol class=\"options\">",
            render_inline(&q.question)
        ));
        for (pos, option) in shuffled.options.iter().enumerate() {
            let original = shuffled.shuffled_to_original[pos];
            let letter = char::from(b'A' + (pos as u8 % 26));
            let mut li_class = String::from("option");
            if selected == Some(original) {
                li_class.push_str(" selected");
            }
            if verdict.is_some_and(|v| v != Verdict::Unanswered)
                && shuffled.original_correct_in_shuffled == Some(pos)
            {
                li_class.push_str(" correct");
            }
            self.push(&format!(
                "<li class=\"{li_class}\" data-original-index=\"{original}\"><span class=\"option-label\">{letter}</span> {}",
                render_inline(&option.text)
            ));
            if let Some(expl) = &option.explanation {
                self.push(&format!(
                    "<div class=\"option-explanation\">{}</div>",
                    render_inline(expl)
                ));
            }
            self.push("</li>");
        }
        self.push("</ol>");
        if let Some(expl) = &q.explanation {
            self.push(&format!(
                "<div class=\"question-explanation\">{}</div>",
                render_inline(expl)
            ));
        }
        self.push("</div>");
    }

    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }
}

fn code_block(language: Option<&str>, code: &str) -> String {
    match language {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            attr(lang),
            text(code)
        ),
        None => format!("<pre><code>{}</code></pre>", text(code)),
    }
}

fn math_block(tex: &str) -> String {
    format!("<div class=\"math math-display\">$${}$$</div>", text(tex))
}

fn figure_image(url: &str, alt: Option<&str>, caption: Option<&str>) -> String {
    format!(
        "<figure><img src=\"{}\" alt=\"{}\">{}</figure>",
        attr(safe_url(url)),
        attr(alt.unwrap_or("")),
        figcaption(caption)
    )
}

fn figure_video(url: &str, title: Option<&str>, caption: Option<&str>) -> String {
    format!(
        "<figure class=\"video\"><iframe src=\"{}\" title=\"{}\" allowfullscreen></iframe>{}</figure>",
        attr(safe_url(url)),
        attr(title.unwrap_or("Video")),
        figcaption(caption)
    )
}

fn figcaption(caption: Option<&str>) -> String {
    caption
        .map(|c| format!("<figcaption>{}</figcaption>", render_inline(c)))
        .unwrap_or_default()
}

fn callout(variant: &str, title: Option<&str>, inner: &str) -> String {
    let title = title
        .map(|t| format!("<p class=\"callout-title\">{}</p>", render_inline(t)))
        .unwrap_or_default();
    format!(
        "<aside class=\"callout callout-{}\">{title}{inner}</aside>",
        attr(variant)
    )
}

/// Drops script URLs.
fn safe_url(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("vbscript:") {
        "#"
    } else {
        url
    }
}
