use lessonmark_engine::{
    CollectingSink, ParseOptions, RenderContext, ShuffledQuestion, parse_with, questions,
    render_blocks,
};
use pretty_assertions::assert_eq;

#[test]
fn fixture_ownership() {
    assert_fixture("ownership");
}

#[test]
fn fixture_printing() {
    assert_fixture("printing");
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/lessons/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn assert_fixture(name: &str) {
    let md = read_fixture(name);

    let sink = CollectingSink::new();
    let blocks = parse_with(&md, &ParseOptions::default(), &sink);
    assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.diagnostics());

    insta::assert_json_snapshot!(name, blocks);
}

#[test]
fn rendered_question_keeps_answer_in_original_space() {
    let md = read_fixture("ownership");
    let blocks = parse_with(&md, &ParseOptions::default(), &CollectingSink::new());
    let html = render_blocks(&blocks, &RenderContext::new("course-1", "lesson-1"));

    let q = questions(&blocks)[0];
    let shuffled = ShuffledQuestion::new(q, 0, "course-1", "lesson-1");
    let correct = shuffled.original_correct_in_shuffled.unwrap();
    assert_eq!(shuffled.shuffled_to_original[correct], 2);

    assert!(html.contains("<th>Type</th>"));
    assert!(html.contains("data-question-index=\"0\""));
    assert!(html.contains("<strong>owner</strong>"));
    assert_eq!(html.matches("data-original-index=").count(), 3);
}

#[test]
fn same_context_renders_identically() {
    let md = read_fixture("printing");
    let blocks = parse_with(&md, &ParseOptions::default(), &CollectingSink::new());
    let ctx = RenderContext::new("course-9", "lesson-3");
    assert_eq!(render_blocks(&blocks, &ctx), render_blocks(&blocks, &ctx));
}
