//! `{{blank_id}}` placeholders in fill-in-the-blank templates.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TemplatePart {
    Text(String),
    Blank(String),
}

fn placeholder() -> &'static Regex {
    static BLANK: OnceLock<Regex> = OnceLock::new();
    BLANK.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_-]+)\s*\}\}").expect("Invalid placeholder regex")
    })
}

pub fn parse_template(template: &str) -> Vec<TemplatePart> {
    let mut parts = vec![];
    let mut last = 0;

    for caps in placeholder().captures_iter(template) {
        let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            parts.push(TemplatePart::Text(template[last..whole.start()].to_string()));
        }
        parts.push(TemplatePart::Blank(id.as_str().to_string()));
        last = whole.end();
    }
    if last < template.len() {
        parts.push(TemplatePart::Text(template[last..].to_string()));
    }
    parts
}

/// Blank ids in template order, without duplicates.
pub fn blank_ids(template: &str) -> Vec<String> {
    let mut ids: Vec<String> = vec![];
    for caps in placeholder().captures_iter(template) {
        let id = &caps[1];
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
