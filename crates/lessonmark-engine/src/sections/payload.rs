use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{component::ComponentKind, ids::ComponentIds};

pub const SUPPORTED_VERSION: u64 = 2;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid content payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported content version {found}, expected {SUPPORTED_VERSION}")]
    UnsupportedVersion { found: String },

    #[error("Duplicate section id `{0}`")]
    DuplicateSection(String),

    #[error("Component {index} ({type_name}) in section `{section}` has invalid props: {source}")]
    InvalidProps {
        section: String,
        index: usize,
        type_name: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    layout: Vec<RawComponent>,
    #[serde(default)]
    grading_logic: Option<Value>,
    #[serde(default)]
    requires_previous: bool,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    props: Value,
}

/// A decoded V2 content payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPayload {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Components in layout order; `components[i]` has id `ids.unique(i)`.
    pub components: Vec<Component>,
    pub ids: ComponentIds,
    /// Passed through to the grading backend untouched.
    pub grading_logic: Option<Value>,
    /// Locked until the preceding section is graded.
    pub requires_previous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Unique within the section.
    pub id: String,
    pub kind: ComponentKind,
}

impl ContentPayload {
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        match value.get("version") {
            Some(v) if v.as_u64() == Some(SUPPORTED_VERSION) => {}
            other => {
                return Err(PayloadError::UnsupportedVersion {
                    found: other.map_or_else(|| "(missing)".to_string(), Value::to_string),
                });
            }
        }

        let raw: RawPayload = serde_json::from_value(value)?;
        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(raw.sections.len());

        for raw_section in raw.sections {
            if !seen.insert(raw_section.id.clone()) {
                return Err(PayloadError::DuplicateSection(raw_section.id));
            }
            sections.push(Section::from_raw(raw_section)?);
        }
        Ok(Self { sections })
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }
}

impl Section {
    fn from_raw(raw: RawSection) -> Result<Self, PayloadError> {
        let mut ids = ComponentIds::default();
        let mut components = Vec::with_capacity(raw.layout.len());

        for (index, c) in raw.layout.into_iter().enumerate() {
            let kind = ComponentKind::resolve(&c.type_name, c.props).map_err(|source| {
                PayloadError::InvalidProps {
                    section: raw.id.clone(),
                    index,
                    type_name: c.type_name.clone(),
                    source,
                }
            })?;
            if let ComponentKind::Unknown { type_name } = &kind {
                log::warn!("Unknown component type `{type_name}` in section {}", raw.id);
            }
            let id = ids.assign(&raw.id, &c.type_name, c.id.as_deref()).to_string();
            components.push(Component { id, kind });
        }

        Ok(Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            components,
            ids,
            grading_logic: raw.grading_logic,
            requires_previous: raw.requires_previous,
        })
    }

    pub fn component(&self, unique_id: &str) -> Option<&Component> {
        self.components.get(self.ids.index_of(unique_id)?)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.kind.is_input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(sections: Value) -> Result<ContentPayload, PayloadError> {
        ContentPayload::from_value(json!({"version": 2, "sections": sections}))
    }

    #[test]
    fn decodes_sections_and_components() {
        let p = payload(json!([
            {
                "id": "s1",
                "title": "Basics",
                "layout": [
                    {"id": "t", "type": "text", "props": {"content": "Hello"}},
                    {"id": "q", "type": "true_false", "props": {"statement": "Sky is blue"}}
                ],
                "grading_logic": {"mode": "all_or_nothing"}
            },
            {"id": "s2", "requires_previous": true}
        ]))
        .unwrap();

        assert_eq!(p.sections.len(), 2);
        let s1 = p.section("s1").unwrap();
        assert_eq!(s1.title.as_deref(), Some("Basics"));
        assert_eq!(s1.inputs().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["q"]);
        assert_eq!(s1.grading_logic, Some(json!({"mode": "all_or_nothing"})));
        assert!(p.section("s2").unwrap().requires_previous);
        assert_eq!(p.section_index("s2"), Some(1));
    }

    #[test]
    fn duplicate_component_ids_are_made_unique() {
        let p = payload(json!([{
            "id": "s",
            "layout": [
                {"id": "a", "type": "short_answer", "props": {"prompt": "1"}},
                {"id": "a", "type": "short_answer", "props": {"prompt": "2"}},
                {"type": "hologram"}
            ]
        }]))
        .unwrap();
        let s = &p.sections[0];
        let ids: Vec<&str> = s.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "s_short_answer_1", "s_hologram_2"]);
        assert_eq!(s.ids.backend_key("s_short_answer_1"), "a");
        assert!(matches!(
            s.component("s_hologram_2").map(|c| &c.kind),
            Some(ComponentKind::Unknown { .. })
        ));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let err = ContentPayload::from_json(r#"{"version": 1, "sections": []}"#).unwrap_err();
        assert!(matches!(err, PayloadError::UnsupportedVersion { ref found } if found == "1"));

        let err = ContentPayload::from_json(r#"{"sections": []}"#).unwrap_err();
        assert!(matches!(err, PayloadError::UnsupportedVersion { .. }));
    }

    #[test]
    fn duplicate_sections_are_rejected() {
        let err = payload(json!([{"id": "x"}, {"id": "x"}])).unwrap_err();
        assert!(matches!(err, PayloadError::DuplicateSection(id) if id == "x"));
    }

    #[test]
    fn invalid_props_name_the_component() {
        let err = payload(json!([{"id": "s", "layout": [{"type": "math", "props": {}}]}]))
            .unwrap_err();
        assert!(err.to_string().starts_with("Component 0 (math) in section `s`"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ContentPayload::from_json("{").unwrap_err(),
            PayloadError::Json(_)
        ));
    }
}
