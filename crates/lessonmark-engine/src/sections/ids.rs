//! Component identity within a section.
//!
//! Every component gets an id that is unique in its section. Authored ids
//! are kept when they are present and not taken; otherwise a synthetic id
//! `{section}_{type}_{index}` is assigned. The authored id stays the key the
//! grading backend knows the component by.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IdEntry {
    unique: String,
    original: Option<String>,
}

/// Bidirectional table between unique ids and authored ids, indexed by
/// layout position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentIds {
    entries: Vec<IdEntry>,
    by_unique: HashMap<String, usize>,
}

impl ComponentIds {
    /// Assigns an id for the next component in layout order and returns it.
    pub fn assign(&mut self, section_id: &str, type_name: &str, original: Option<&str>) -> &str {
        let index = self.entries.len();
        let original = original.filter(|id| !id.is_empty());
        let unique = match original {
            Some(id) if !self.by_unique.contains_key(id) => id.to_string(),
            _ => self.synthesize(format!("{section_id}_{type_name}_{index}")),
        };
        if original.is_some_and(|id| id != unique) {
            log::debug!("Component {index} of section {section_id} renamed to {unique}");
        }

        self.by_unique.insert(unique.clone(), index);
        self.entries.push(IdEntry {
            unique,
            original: original.map(str::to_string),
        });
        &self.entries[index].unique
    }

    fn synthesize(&self, base: String) -> String {
        if !self.by_unique.contains_key(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.by_unique.contains_key(candidate))
            .unwrap_or(base)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unique(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.unique.as_str())
    }

    pub fn index_of(&self, unique: &str) -> Option<usize> {
        self.by_unique.get(unique).copied()
    }

    /// The authored id, if the component had one.
    pub fn original(&self, unique: &str) -> Option<&str> {
        let entry = &self.entries[self.index_of(unique)?];
        entry.original.as_deref()
    }

    /// The id the grading backend uses: the authored id when present.
    pub fn backend_key<'a>(&'a self, unique: &'a str) -> &'a str {
        self.original(unique).unwrap_or(unique)
    }

    /// Unique ids whose backend key is `key`, in layout order.
    pub fn for_backend_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.original.as_deref().unwrap_or(e.unique.as_str()) == key)
            .map(|e| e.unique.as_str())
    }
}
