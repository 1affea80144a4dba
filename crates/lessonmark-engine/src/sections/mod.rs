//! # V2 Sections
//!
//! Structured lesson content: sections of typed components graded as a unit.
//!
//! - **`payload`**: decodes `{version: 2, sections: [...]}` into [`ContentPayload`]
//! - **`component`**: [`ComponentKind`], one variant per component type
//! - **`ids`**: [`ComponentIds`], unique ids and the authored ids behind them
//! - **`answer`**: [`AnswerValue`], a learner's answer tagged by kind
//! - **`template`**: `{{blank}}` placeholders of fill-in-the-blank components
//! - **`store`**: [`SectionStore`], the per-section state machine
//! - **`grading`**: [`GradingSession`] and the [`Grader`] collaborator

pub mod answer;
pub mod component;
pub mod grading;
pub mod ids;
pub mod payload;
pub mod store;
pub mod template;

pub use answer::AnswerValue;
pub use component::ComponentKind;
pub use grading::{
    AbortSignal, Grade, GradeReply, GradeRequest, Grader, GradingError, GradingSession,
    GradingSettings, PendingGrade, SubmitError, SubmitOutcome,
};
pub use ids::ComponentIds;
pub use payload::{Component, ContentPayload, PayloadError, Section};
pub use store::{
    Action, GradeResult, GradeStatus, SectionGrade, SectionProgress, SectionStore,
    TransitionError,
};
pub use template::{TemplatePart, blank_ids, parse_template};
