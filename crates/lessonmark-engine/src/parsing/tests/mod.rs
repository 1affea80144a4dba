//! Parser behaviour over whole documents.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::diagnostics::{CollectingSink, DiagnosticKind};
use crate::parsing::{
    ParseOptions,
    blocks::{Block, QuestionBlock, questions},
    normalize, parse, parse_with,
};

fn parse_checked(src: &str) -> Vec<Block> {
    let blocks = parse(src);
    invariants::check(&blocks);
    blocks
}

fn parse_collecting(src: &str) -> (Vec<Block>, Vec<DiagnosticKind>) {
    let sink = CollectingSink::new();
    let blocks = parse_with(src, &ParseOptions::default(), &sink);
    invariants::check(&blocks);
    (blocks, sink.kinds())
}

fn only_question(blocks: &[Block]) -> &QuestionBlock {
    match blocks {
        [Block::Question(q)] => q,
        other => panic!("expected one question, got {other:?}"),
    }
}

fn para(text: &str) -> Block {
    Block::Paragraph { text: text.into() }
}

#[rstest]
#[case("plain text")]
#[case("a &amp;lt; b\r\nc")]
#[case(r"\\(x\\) and \\\\[y\\\\]")]
#[case("&amp;amp;amp;")]
#[case("")]
fn normalization_is_idempotent(#[case] src: &str) {
    let once = normalize(src);
    assert_eq!(normalize(&once), once);
}

#[test]
fn paragraphs_separated_by_blank_lines() {
    assert_eq!(
        parse_checked("one\n\ntwo\nstill two\n\n\nthree"),
        vec![para("one"), para("two still two"), para("three")]
    );
}

#[test]
fn mixed_constructs_count() {
    let src = "# Title\n\nIntro.\n\n- a\n- b\n\n```rust\nfn x() {}\n```\n\n$$E=mc^2$$\n\n---\n\n> quoted";
    let blocks = parse_checked(src);
    assert_eq!(blocks.len(), 7);
    assert_eq!(
        blocks[3],
        Block::Code {
            language: Some("rust".into()),
            code: "fn x() {}".into()
        }
    );
    assert_eq!(blocks[4], Block::BlockMath { tex: "E=mc^2".into() });
    assert_eq!(blocks[5], Block::Hr);
    assert_eq!(blocks[6], Block::Blockquote { text: "quoted".into() });
}

#[test]
fn prefixed_question_scenario() {
    let (blocks, diags) =
        parse_collecting("Question: What is 2+2?\nA. 3\nB. 4\nC. 5\n\n**Answer:** B");
    let q = only_question(&blocks);
    assert_eq!(q.options.len(), 3);
    assert_eq!(q.correct_index, Some(1));
    assert!(diags.is_empty());
}

#[test]
fn check_understanding_round_trip() {
    let src = "\
**Check Your Understanding**

What does `cargo build` produce?

- A. A crate registry entry
- B. Compiled artifacts in target/
- C. A lockfile only
- D. Nothing

<details>
<summary>Show Answer</summary>

**Answer:** B

- ❌ **A** Publishing does that.
- ✅ **B** Build output lands in `target/`.
- ❌ **C** The lockfile is a side effect.

</details>

## Next";
    let blocks = parse_checked(src);
    assert_eq!(blocks.len(), 2);
    let q = match &blocks[0] {
        Block::Question(q) => q,
        other => panic!("expected question, got {other:?}"),
    };
    assert_eq!(q.correct_index, Some(1));
    assert_eq!(q.options[1].label, 'B');
    assert_eq!(
        q.options[1].explanation.as_deref(),
        Some("Build output lands in `target/`.")
    );
    assert_eq!(q.options[3].explanation, None);
    assert_eq!(
        blocks[1],
        Block::Heading {
            level: 2,
            text: "Next".into()
        }
    );
}

#[test]
fn table_scenario() {
    assert_eq!(
        parse_checked("|A|B|\n|---|---|\n|1|2|"),
        vec![Block::Table {
            has_header: true,
            rows: vec![vec!["A".into(), "B".into()], vec!["1".into(), "2".into()]],
        }]
    );
}

#[test]
fn table_cells_respect_code_and_escapes() {
    assert_eq!(
        parse_checked(r"| `a|b` | c\|d |"),
        vec![Block::Table {
            has_header: false,
            rows: vec![vec!["`a|b`".into(), "c|d".into()]],
        }]
    );
}

#[test]
fn unterminated_fence_stops_at_question_marker() {
    let src = "```python\nprint(1)\nprint(2)\n**Check Your Understanding**\nWhich?\n- A. one\n- B. two";
    let (blocks, diags) = parse_collecting(src);
    assert_eq!(
        blocks[0],
        Block::Code {
            language: Some("python".into()),
            code: "print(1)\nprint(2)".into()
        }
    );
    let q = only_question(&blocks[1..]);
    assert_eq!(q.question, "Which?");
    assert_eq!(q.options.len(), 2);
    assert_eq!(
        diags,
        vec![DiagnosticKind::FenceCutAtQuestion, DiagnosticKind::MissingAnswerKey]
    );
}

#[test]
fn unterminated_fence_degrades_to_paragraph() {
    let (blocks, diags) = parse_collecting("```\nlet x = 1;");
    assert_eq!(blocks, vec![para("``` let x = 1;")]);
    assert_eq!(diags, vec![DiagnosticKind::UnterminatedFence]);
}

#[test]
fn image_without_url_falls_back_to_text() {
    let (blocks, diags) = parse_collecting(":::image\nalt: A cat\n:::");
    assert_eq!(blocks, vec![para(":::image alt: A cat :::")]);
    assert_eq!(diags, vec![DiagnosticKind::MissingDirectiveField]);
}

#[test]
fn unterminated_directive_falls_back_to_text() {
    let (blocks, diags) = parse_collecting(":::video\nurl: https://v.example/1");
    assert_eq!(blocks, vec![para(":::video url: https://v.example/1")]);
    assert_eq!(diags, vec![DiagnosticKind::UnterminatedDirective]);
}

#[test]
fn media_directives() {
    let blocks = parse_checked(
        ":::image\nurl: https://img.example/cat.png\nalt: A cat\ncaption: Meow\n:::\n\n\
         :::video\nurl: https://v.example/1\ntitle: Intro\n:::",
    );
    assert_eq!(
        blocks,
        vec![
            Block::Image {
                url: "https://img.example/cat.png".into(),
                alt: Some("A cat".into()),
                caption: Some("Meow".into()),
            },
            Block::EmbeddedVideo {
                url: "https://v.example/1".into(),
                title: Some("Intro".into()),
                caption: None,
            },
        ]
    );
}

#[test]
fn callout_and_reveal_bodies_are_blocks() {
    let src = ":::callout{type=\"warning\" title=\"Careful\"}\n# Inside\n\n- a\n:::\n\n\
               :::reveal\nHidden text\n:::";
    assert_eq!(
        parse_checked(src),
        vec![
            Block::Callout {
                variant: "warning".into(),
                title: Some("Careful".into()),
                body: vec![
                    Block::Heading {
                        level: 1,
                        text: "Inside".into()
                    },
                    Block::List {
                        ordered: false,
                        items: vec!["a".into()]
                    },
                ],
            },
            Block::Reveal {
                label: "Show more".into(),
                body: vec![para("Hidden text")],
            },
        ]
    );
}

#[test]
fn tabs_and_nested_questions() {
    let src = "\
:::tabs
stray
@tab First
Question: Pick
A. x
B. y
Answer: A
@tab Second
Plain
:::";
    let (blocks, diags) = parse_collecting(src);
    let Block::TabGroup { tabs } = &blocks[0] else {
        panic!("expected tabs, got {blocks:?}");
    };
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0].label, "First");
    assert_eq!(tabs[1].body, vec![para("Plain")]);
    assert_eq!(questions(&blocks).len(), 1);
    assert_eq!(questions(&blocks)[0].correct_index, Some(0));
    assert_eq!(diags, vec![DiagnosticKind::ContentBeforeFirstTab]);
}

#[test]
fn nested_diagnostics_report_document_lines() {
    let sink = CollectingSink::new();
    parse_with(
        "intro\n\n:::callout\ntext\n\nQuestion: Q\nA. a\nB. b\n:::",
        &ParseOptions::default(),
        &sink,
    );
    let diags = sink.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::MissingAnswerKey);
    assert_eq!(diags[0].line, 6);
}

#[test]
fn bold_only_line_is_heading_but_bold_label_is_not() {
    assert_eq!(
        parse_checked("**Key ideas**\n\n**Note:** read this"),
        vec![
            Block::Heading {
                level: 3,
                text: "Key ideas".into()
            },
            para("**Note:** read this"),
        ]
    );
}

#[test]
fn paragraph_stops_at_block_start() {
    assert_eq!(
        parse_checked("text\n# Heading\nmore\n- item"),
        vec![
            para("text"),
            Block::Heading {
                level: 1,
                text: "Heading".into()
            },
            para("more"),
            Block::List {
                ordered: false,
                items: vec!["item".into()]
            },
        ]
    );
}

#[test]
fn question_marker_without_options_is_text() {
    let (blocks, diags) = parse_collecting("Question: rhetorical, isn't it?\n\nNext.");
    assert_eq!(
        blocks,
        vec![para("Question: rhetorical, isn't it?"), para("Next.")]
    );
    assert_eq!(diags, vec![DiagnosticKind::QuestionWithoutOptions]);
}

#[test]
fn multi_line_math() {
    assert_eq!(
        parse_checked("\\[\na + b\n= c\n\\]"),
        vec![Block::BlockMath {
            tex: "a + b\n= c".into()
        }]
    );
}

#[test]
fn math_with_trailing_text_does_not_swallow_later_blocks() {
    let (blocks, diags) = parse_collecting("$$x$$ trailing\n\nNext part.\n\n$$\ny\n$$");
    assert_eq!(
        blocks,
        vec![
            para("$$x$$ trailing"),
            para("Next part."),
            Block::BlockMath { tex: "y".into() },
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn entities_are_decoded_before_parsing() {
    assert_eq!(
        parse_checked("&gt; quoted &amp; escaped"),
        vec![Block::Blockquote {
            text: "quoted & escaped".into()
        }]
    );
}

#[rstest]
#[case(":::")]
#[case(":::tabs\n:::")]
#[case("$$")]
#[case("```")]
#[case("|")]
#[case("**Check Your Understanding**")]
#[case("Question:")]
#[case("<details>")]
#[case("- ")]
#[case("#")]
#[case(":::callout\n:::callout\n:::")]
#[case("**Check Your Understanding**\n- A. x\n<details>\nAnswer: Z")]
fn malformed_input_never_panics(#[case] src: &str) {
    parse_checked(src);
}
