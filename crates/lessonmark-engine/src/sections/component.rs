use serde::Deserialize;
use serde_json::Value;

use super::{answer::AnswerValue, template::blank_ids};

/// A V2 component's `type` and `props`, resolved once when the payload is
/// loaded.
///
/// Types this crate does not know become [`ComponentKind::Unknown`] and are
/// rendered as a warning instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "props", rename_all = "snake_case")]
pub enum ComponentKind {
    // Display
    Text {
        content: String,
    },
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Image {
        url: String,
        #[serde(default)]
        alt: Option<String>,
        #[serde(default)]
        caption: Option<String>,
    },
    Video {
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        caption: Option<String>,
    },
    Callout {
        #[serde(default)]
        variant: Option<String>,
        #[serde(default)]
        title: Option<String>,
        content: String,
    },
    Code {
        #[serde(default)]
        language: Option<String>,
        code: String,
    },
    Math {
        tex: String,
    },

    // Input and assessment
    MultipleChoice {
        question: String,
        options: Vec<String>,
    },
    MultiSelect {
        question: String,
        options: Vec<String>,
    },
    TrueFalse {
        statement: String,
    },
    ShortAnswer {
        prompt: String,
    },
    Numeric {
        prompt: String,
        #[serde(default)]
        unit: Option<String>,
    },
    FillInBlank {
        template: String,
    },
    Ordering {
        #[serde(default)]
        prompt: String,
        items: Vec<String>,
    },
    Matching {
        #[serde(default)]
        prompt: String,
        left: Vec<String>,
        right: Vec<String>,
    },
    CodeExercise {
        prompt: String,
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        starter_code: Option<String>,
    },

    #[serde(skip)]
    Unknown {
        type_name: String,
    },
}

fn default_heading_level() -> u8 {
    2
}

impl ComponentKind {
    pub const KNOWN_TYPES: [&'static str; 16] = [
        "text",
        "heading",
        "image",
        "video",
        "callout",
        "code",
        "math",
        "multiple_choice",
        "multi_select",
        "true_false",
        "short_answer",
        "numeric",
        "fill_in_blank",
        "ordering",
        "matching",
        "code_exercise",
    ];

    /// Resolves `type` and `props`. `Ok(Unknown)` for unrecognised types; an
    /// error only when a known type carries props of the wrong shape.
    pub fn resolve(type_name: &str, props: Value) -> Result<Self, serde_json::Error> {
        if !Self::KNOWN_TYPES.contains(&type_name) {
            return Ok(Self::Unknown {
                type_name: type_name.to_string(),
            });
        }
        let props = match props {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let mut tagged = serde_json::Map::new();
        tagged.insert("type".into(), Value::String(type_name.to_string()));
        tagged.insert("props".into(), props);
        serde_json::from_value(Value::Object(tagged))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Heading { .. } => "heading",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Callout { .. } => "callout",
            Self::Code { .. } => "code",
            Self::Math { .. } => "math",
            Self::MultipleChoice { .. } => "multiple_choice",
            Self::MultiSelect { .. } => "multi_select",
            Self::TrueFalse { .. } => "true_false",
            Self::ShortAnswer { .. } => "short_answer",
            Self::Numeric { .. } => "numeric",
            Self::FillInBlank { .. } => "fill_in_blank",
            Self::Ordering { .. } => "ordering",
            Self::Matching { .. } => "matching",
            Self::CodeExercise { .. } => "code_exercise",
            Self::Unknown { type_name } => type_name,
        }
    }

    /// Components that take an answer.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice { .. }
                | Self::MultiSelect { .. }
                | Self::TrueFalse { .. }
                | Self::ShortAnswer { .. }
                | Self::Numeric { .. }
                | Self::FillInBlank { .. }
                | Self::Ordering { .. }
                | Self::Matching { .. }
                | Self::CodeExercise { .. }
        )
    }

    /// Whether `value` has the shape this component takes.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Self::MultipleChoice { options, .. }, AnswerValue::Choice(i)) => *i < options.len(),
            (Self::MultiSelect { options, .. }, AnswerValue::Choices(v)) => {
                v.iter().all(|i| *i < options.len())
            }
            (Self::TrueFalse { .. }, AnswerValue::Boolean(_))
            | (Self::ShortAnswer { .. }, AnswerValue::Text(_))
            | (Self::Numeric { .. }, AnswerValue::Number(_))
            | (Self::CodeExercise { .. }, AnswerValue::Code(_)) => true,
            (Self::FillInBlank { template }, AnswerValue::Blanks(m)) => {
                let ids = blank_ids(template);
                m.keys().all(|k| ids.contains(k))
            }
            (Self::Ordering { items, .. }, AnswerValue::Order(v)) => {
                v.len() <= items.len() && v.iter().all(|i| *i < items.len())
            }
            (Self::Matching { left, right, .. }, AnswerValue::Pairs(v)) => {
                v.iter().all(|(l, r)| *l < left.len() && *r < right.len())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn resolves_known_type() {
        let kind = ComponentKind::resolve(
            "multiple_choice",
            json!({"question": "Pick", "options": ["a", "b"]}),
        )
        .unwrap();
        assert_eq!(
            kind,
            ComponentKind::MultipleChoice {
                question: "Pick".into(),
                options: vec!["a".into(), "b".into()],
            }
        );
        assert!(kind.is_input());
    }

    #[test]
    fn defaults_apply() {
        let kind = ComponentKind::resolve("heading", json!({"text": "Intro"})).unwrap();
        assert_eq!(
            kind,
            ComponentKind::Heading {
                text: "Intro".into(),
                level: 2
            }
        );
    }

    #[test]
    fn unknown_type_is_kept() {
        let kind = ComponentKind::resolve("hologram", json!({"x": 1})).unwrap();
        assert_eq!(kind.type_name(), "hologram");
        assert!(!kind.is_input());
    }

    #[test]
    fn bad_props_for_known_type_fail() {
        assert!(ComponentKind::resolve("math", Value::Null).is_err());
        assert!(ComponentKind::resolve("true_false", json!({"statement": 3})).is_err());
    }

    #[test]
    fn accepts_matching_shapes_only() {
        let mc = ComponentKind::MultipleChoice {
            question: "q".into(),
            options: vec!["a".into(), "b".into()],
        };
        assert!(mc.accepts(&AnswerValue::Choice(1)));
        assert!(!mc.accepts(&AnswerValue::Choice(2)));
        assert!(!mc.accepts(&AnswerValue::Text("a".into())));

        let blanks = ComponentKind::FillInBlank {
            template: "{{a}} and {{b}}".into(),
        };
        assert!(blanks.accepts(&AnswerValue::Blanks(BTreeMap::from([(
            "a".into(),
            "x".into()
        )]))));
        assert!(!blanks.accepts(&AnswerValue::Blanks(BTreeMap::from([(
            "c".into(),
            "x".into()
        )]))));

        let text = ComponentKind::Text {
            content: "hi".into(),
        };
        assert!(!text.accepts(&AnswerValue::Text("hi".into())));
    }
}
