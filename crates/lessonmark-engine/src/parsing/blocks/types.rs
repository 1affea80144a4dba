use serde::Serialize;

/// One structural unit of lesson content, in document order.
///
/// Blocks have no identity beyond their position; they are rebuilt whenever
/// the source changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// `#`..`######` headings, or a bold-only line (level 3).
    Heading { level: u8, text: String },
    /// Default leaf block; lines joined with single spaces.
    Paragraph { text: String },
    List { ordered: bool, items: Vec<String> },
    /// Rows include the header row when `has_header` is set.
    Table {
        has_header: bool,
        rows: Vec<Vec<String>>,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        code: String,
    },
    /// Display math without its `$$` / `\[ \]` delimiters.
    BlockMath { tex: String },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    EmbeddedVideo {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Callout {
        variant: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        body: Vec<Block>,
    },
    Reveal { label: String, body: Vec<Block> },
    TabGroup { tabs: Vec<Tab> },
    Question(QuestionBlock),
    Hr,
    Blockquote { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub label: String,
    pub body: Vec<Block>,
}

/// A multiple-choice question embedded in lesson text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBlock {
    pub question: String,
    pub options: Vec<QuestionOption>,
    /// Index into `options` in authored (unshuffled) order, `None` when the
    /// content carries no usable answer key.
    pub correct_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionBlock {
    pub fn has_answer_key(&self) -> bool {
        self.correct_index.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOption {
    /// `A`..`D`
    pub label: char,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// All question blocks in document order, including those nested in
/// callouts, reveals and tabs. The position in this list is the question
/// index used for shuffling and answer persistence.
pub fn questions(blocks: &[Block]) -> Vec<&QuestionBlock> {
    fn walk<'a>(blocks: &'a [Block], out: &mut Vec<&'a QuestionBlock>) {
        for block in blocks {
            match block {
                Block::Question(q) => out.push(q),
                Block::Callout { body, .. } | Block::Reveal { body, .. } => walk(body, out),
                Block::TabGroup { tabs } => {
                    for tab in tabs {
                        walk(&tab.body, out);
                    }
                }
                _ => {}
            }
        }
    }

    let mut out = vec![];
    walk(blocks, &mut out);
    out
}
