use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A learner's answer to one input component.
///
/// The variant is fixed by the component kind; see
/// [`ComponentKind::accepts`](super::ComponentKind::accepts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Index into a multiple-choice component's options.
    Choice(usize),
    Choices(Vec<usize>),
    Boolean(bool),
    Text(String),
    Number(f64),
    /// Blank id to entered text.
    Blanks(BTreeMap<String, String>),
    /// Item indices in the learner's order.
    Order(Vec<usize>),
    /// `(left, right)` index pairs.
    Pairs(Vec<(usize, usize)>),
    Code(String),
}

impl AnswerValue {
    /// Whether the answer counts as "not answered yet".
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Choice(_) | Self::Boolean(_) => false,
            Self::Number(n) => n.is_nan(),
            Self::Choices(v) | Self::Order(v) => v.is_empty(),
            Self::Pairs(v) => v.is_empty(),
            Self::Text(s) | Self::Code(s) => s.trim().is_empty(),
            Self::Blanks(m) => m.values().all(|s| s.trim().is_empty()),
        }
    }

    /// The untagged value the grading backend expects.
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Choice(i) => json!(i),
            Self::Choices(v) | Self::Order(v) => json!(v),
            Self::Boolean(b) => json!(b),
            Self::Text(s) | Self::Code(s) => json!(s),
            Self::Number(n) => json!(n),
            Self::Blanks(m) => json!(m),
            Self::Pairs(v) => json!(v),
        }
    }
}
