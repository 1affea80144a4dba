//! Per-section answer and grading state.
//!
//! ```text
//!            SetAnswer              SetSectionGrading        SetSectionGraded
//! pristine ────────────▶ dirty ───────────────────▶ submitted ────────────────▶ graded
//!                          ▲                           │
//!                          └────── SetSectionError ────┘
//! ```
//!
//! `SetAnswer` moves any state to dirty. `ResetSection` and `ResetAll` clear
//! answers, grades and progress. All changes go through [`SectionStore::dispatch`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    answer::AnswerValue,
    grading::GradeRequest,
    payload::{ContentPayload, Section},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionProgress {
    #[default]
    Pristine,
    Dirty,
    Submitted,
    Graded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    #[default]
    Idle,
    Grading,
    Graded,
    Error,
}

/// The backend's verdict on one component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub earned_points: f64,
    #[serde(default)]
    pub total_points: f64,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionGrade {
    pub status: GradeStatus,
    /// Keyed by unique component id.
    pub grades: BTreeMap<String, GradeResult>,
    pub error: Option<String>,
    pub total_score: Option<f64>,
    pub max_score: Option<f64>,
    pub passed: Option<bool>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetAnswer {
        section_id: String,
        component_id: String,
        value: AnswerValue,
    },
    SetSectionGrading {
        section_id: String,
    },
    SetSectionGraded {
        section_id: String,
        grades: BTreeMap<String, GradeResult>,
        total_score: f64,
        max_score: f64,
        passed: bool,
        feedback: Option<String>,
    },
    SetSectionError {
        section_id: String,
        message: String,
    },
    ResetSection {
        section_id: String,
    },
    ResetAll,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Unknown section `{0}`")]
    UnknownSection(String),

    #[error("Unknown component `{component}` in section `{section}`")]
    UnknownComponent { section: String, component: String },

    #[error("Component `{component}` does not accept a {kind} answer")]
    RejectedAnswer { component: String, kind: String },

    #[error("Section `{0}` has no answers to submit")]
    NothingToSubmit(String),

    #[error("Section `{0}` is not awaiting a grade")]
    NotSubmitted(String),
}

#[derive(Debug, Clone, Default)]
struct SectionState {
    answers: BTreeMap<String, AnswerValue>,
    progress: SectionProgress,
    grade: SectionGrade,
}

/// Answer and grading state for one content payload.
///
/// Built per payload instance and ended with [`SectionStore::dispose`].
#[derive(Debug)]
pub struct SectionStore<'p> {
    payload: &'p ContentPayload,
    states: HashMap<String, SectionState>,
}

impl<'p> SectionStore<'p> {
    pub fn new(payload: &'p ContentPayload) -> Self {
        let states = payload
            .sections
            .iter()
            .map(|s| (s.id.clone(), SectionState::default()))
            .collect();
        Self { payload, states }
    }

    pub fn payload(&self) -> &'p ContentPayload {
        self.payload
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), TransitionError> {
        match action {
            Action::SetAnswer {
                section_id,
                component_id,
                value,
            } => {
                let section = self.section(&section_id)?;
                let Some(component) = section.component(&component_id) else {
                    return Err(TransitionError::UnknownComponent {
                        section: section_id,
                        component: component_id,
                    });
                };
                if !component.kind.accepts(&value) {
                    return Err(TransitionError::RejectedAnswer {
                        component: component_id,
                        kind: answer_kind(&value).to_string(),
                    });
                }
                let state = self.state_mut(&section_id)?;
                state.answers.insert(component_id, value);
                state.progress = SectionProgress::Dirty;
            }
            Action::SetSectionGrading { section_id } => {
                if !self.is_submittable(&section_id) {
                    self.section(&section_id)?;
                    return Err(TransitionError::NothingToSubmit(section_id));
                }
                let state = self.state_mut(&section_id)?;
                state.progress = SectionProgress::Submitted;
                state.grade.status = GradeStatus::Grading;
                state.grade.error = None;
            }
            Action::SetSectionGraded {
                section_id,
                grades,
                total_score,
                max_score,
                passed,
                feedback,
            } => {
                let state = self.submitted_mut(&section_id)?;
                state.progress = SectionProgress::Graded;
                state.grade = SectionGrade {
                    status: GradeStatus::Graded,
                    grades,
                    error: None,
                    total_score: Some(total_score),
                    max_score: Some(max_score),
                    passed: Some(passed),
                    feedback,
                };
            }
            Action::SetSectionError {
                section_id,
                message,
            } => {
                let state = self.submitted_mut(&section_id)?;
                state.progress = SectionProgress::Dirty;
                state.grade.status = GradeStatus::Error;
                state.grade.error = Some(message);
            }
            Action::ResetSection { section_id } => {
                *self.state_mut(&section_id)? = SectionState::default();
            }
            Action::ResetAll => {
                for state in self.states.values_mut() {
                    *state = SectionState::default();
                }
            }
        }
        Ok(())
    }

    pub fn progress(&self, section_id: &str) -> Option<SectionProgress> {
        self.states.get(section_id).map(|s| s.progress)
    }

    pub fn grade(&self, section_id: &str) -> Option<&SectionGrade> {
        self.states.get(section_id).map(|s| &s.grade)
    }

    pub fn answer(&self, section_id: &str, component_id: &str) -> Option<&AnswerValue> {
        self.states.get(section_id)?.answers.get(component_id)
    }

    /// At least one component has a non-empty answer.
    pub fn is_submittable(&self, section_id: &str) -> bool {
        self.states
            .get(section_id)
            .is_some_and(|s| s.answers.values().any(|a| !a.is_empty()))
    }

    /// A `requires_previous` section stays locked until the section before
    /// it is graded.
    pub fn is_locked(&self, section_id: &str) -> bool {
        let Some(index) = self.payload.section_index(section_id) else {
            return false;
        };
        if index == 0 || !self.payload.sections[index].requires_previous {
            return false;
        }
        let previous = &self.payload.sections[index - 1];
        self.progress(&previous.id) != Some(SectionProgress::Graded)
    }

    /// The grading request for a section, keyed by backend component ids.
    /// Empty answers are left out.
    pub fn build_request(&self, section_id: &str) -> Result<GradeRequest, TransitionError> {
        let section = self.section(section_id)?;
        let answers = self
            .states
            .get(section_id)
            .map(|s| &s.answers)
            .into_iter()
            .flatten()
            .filter(|(_, value)| !value.is_empty())
            .map(|(unique, value)| {
                let key = section.ids.backend_key(unique).to_string();
                (key, value.to_wire())
            })
            .collect();

        Ok(GradeRequest {
            section_id: section_id.to_string(),
            answers,
            grading_logic: section.grading_logic.clone(),
        })
    }

    /// Ends the store's lifetime for its payload.
    pub fn dispose(self) {
        log::debug!("Disposing section store with {} sections", self.states.len());
    }

    fn section(&self, section_id: &str) -> Result<&'p Section, TransitionError> {
        self.payload
            .section(section_id)
            .ok_or_else(|| TransitionError::UnknownSection(section_id.to_string()))
    }

    fn state_mut(&mut self, section_id: &str) -> Result<&mut SectionState, TransitionError> {
        self.states
            .get_mut(section_id)
            .ok_or_else(|| TransitionError::UnknownSection(section_id.to_string()))
    }

    fn submitted_mut(&mut self, section_id: &str) -> Result<&mut SectionState, TransitionError> {
        let state = self.state_mut(section_id)?;
        if state.progress != SectionProgress::Submitted {
            return Err(TransitionError::NotSubmitted(section_id.to_string()));
        }
        Ok(state)
    }
}

fn answer_kind(value: &AnswerValue) -> &'static str {
    match value {
        AnswerValue::Choice(_) => "choice",
        AnswerValue::Choices(_) => "choices",
        AnswerValue::Boolean(_) => "boolean",
        AnswerValue::Text(_) => "text",
        AnswerValue::Number(_) => "number",
        AnswerValue::Blanks(_) => "blanks",
        AnswerValue::Order(_) => "order",
        AnswerValue::Pairs(_) => "pairs",
        AnswerValue::Code(_) => "code",
    }
}
