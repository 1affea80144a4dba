//! Submitting a section to the grading collaborator.
//!
//! A submission is three steps so the collaborator call can run anywhere:
//!
//! 1. [`GradingSession::start`] checks the section, aborts whatever request is
//!    still in flight and marks the section submitted.
//! 2. [`PendingGrade::run`] talks to the [`Grader`], polling queued jobs.
//!    It only needs the pending request, not the store.
//! 3. [`GradingSession::finish`] applies the outcome, unless the request was
//!    aborted or superseded in the meantime.
//!
//! [`GradingSession::submit`] does all three in order.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::store::{Action, GradeResult, SectionProgress, SectionStore};

/// Request body sent to the grading backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRequest {
    #[serde(rename = "sectionId")]
    pub section_id: String,
    /// Keyed by backend component id.
    pub answers: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading_logic: Option<Value>,
}

/// The backend's verdict on a section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Grade {
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub earned_points: f64,
    #[serde(default)]
    pub total_points: f64,
    /// Keyed by backend component id.
    #[serde(default)]
    pub results: BTreeMap<String, GradeResult>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Either an immediate grade or a job to poll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GradeReply {
    Graded { grade: Grade },
    Queued { job_id: String },
}

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("Grading request failed: {0}")]
    Failed(String),

    #[error("Grading was cancelled")]
    Aborted,

    #[error("Grading job {job_id} did not finish after {attempts} polls")]
    PollExhausted { job_id: String, attempts: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Unknown section `{0}`")]
    UnknownSection(String),

    #[error("Section `{0}` is locked until the previous section is graded")]
    Locked(String),

    #[error("Section `{0}` has no answers to submit")]
    NothingToSubmit(String),
}

/// Shared cancellation flag for one grading request.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The grading collaborator.
///
/// Implementations should give up early when `abort` is raised; the session
/// discards the reply of an aborted request either way.
pub trait Grader {
    fn grade(&self, request: &GradeRequest, abort: &AbortSignal)
    -> Result<GradeReply, GradingError>;

    fn poll(&self, job_id: &str, abort: &AbortSignal) -> Result<GradeReply, GradingError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingSettings {
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            poll_attempts: 20,
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// A submitted section waiting for its grade.
#[derive(Debug)]
pub struct PendingGrade {
    pub section_id: String,
    pub request: GradeRequest,
    generation: u64,
    signal: AbortSignal,
}

impl PendingGrade {
    pub fn signal(&self) -> &AbortSignal {
        &self.signal
    }

    /// Sends the request and polls a queued job until it is graded, the
    /// attempts run out or the request is aborted.
    pub fn run<G: Grader + ?Sized>(
        &self,
        grader: &G,
        settings: &GradingSettings,
    ) -> Result<Grade, GradingError> {
        if self.signal.is_aborted() {
            return Err(GradingError::Aborted);
        }
        let job_id = match grader.grade(&self.request, &self.signal)? {
            GradeReply::Graded { grade } => return Ok(grade),
            GradeReply::Queued { job_id } => job_id,
        };
        log::debug!("Section {} queued as job {job_id}", self.section_id);

        for attempt in 1..=settings.poll_attempts {
            thread::sleep(settings.poll_interval);
            if self.signal.is_aborted() {
                return Err(GradingError::Aborted);
            }
            match grader.poll(&job_id, &self.signal)? {
                GradeReply::Graded { grade } => return Ok(grade),
                GradeReply::Queued { .. } => {
                    log::debug!("Job {job_id} still queued after poll {attempt}");
                }
            }
        }
        Err(GradingError::PollExhausted {
            job_id,
            attempts: settings.poll_attempts,
        })
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Graded {
        passed: bool,
        total_score: f64,
        max_score: f64,
    },
    Failed(GradingError),
    /// The request was superseded or the section changed while it ran.
    Discarded,
}

/// Tracks the one in-flight grading request of a store.
#[derive(Debug, Default)]
pub struct GradingSession {
    settings: GradingSettings,
    generation: u64,
    in_flight: Option<(u64, String, AbortSignal)>,
}

impl GradingSession {
    pub fn new(settings: GradingSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &GradingSettings {
        &self.settings
    }

    pub fn is_grading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn start(
        &mut self,
        store: &mut SectionStore<'_>,
        section_id: &str,
    ) -> Result<PendingGrade, SubmitError> {
        if store.progress(section_id).is_none() {
            return Err(SubmitError::UnknownSection(section_id.to_string()));
        }
        if store.is_locked(section_id) {
            return Err(SubmitError::Locked(section_id.to_string()));
        }
        if !store.is_submittable(section_id) {
            return Err(SubmitError::NothingToSubmit(section_id.to_string()));
        }

        self.abort(store);

        let request = store
            .build_request(section_id)
            .map_err(|_| SubmitError::UnknownSection(section_id.to_string()))?;
        store
            .dispatch(Action::SetSectionGrading {
                section_id: section_id.to_string(),
            })
            .map_err(|_| SubmitError::NothingToSubmit(section_id.to_string()))?;

        self.generation += 1;
        let signal = AbortSignal::default();
        self.in_flight = Some((self.generation, section_id.to_string(), signal.clone()));

        Ok(PendingGrade {
            section_id: section_id.to_string(),
            request,
            generation: self.generation,
            signal,
        })
    }

    /// Aborts the in-flight request. Its section returns to dirty so it can
    /// be submitted again.
    pub fn abort(&mut self, store: &mut SectionStore<'_>) {
        let Some((_, section_id, signal)) = self.in_flight.take() else {
            return;
        };
        signal.abort();
        if store.progress(&section_id) == Some(SectionProgress::Submitted) {
            if let Err(e) = store.dispatch(Action::SetSectionError {
                section_id: section_id.clone(),
                message: GradingError::Aborted.to_string(),
            }) {
                log::warn!("Failed to mark aborted section {section_id}: {e}");
            }
        }
    }

    pub fn finish(
        &mut self,
        store: &mut SectionStore<'_>,
        pending: PendingGrade,
        result: Result<Grade, GradingError>,
    ) -> SubmitOutcome {
        let current = matches!(&self.in_flight, Some((g, _, _)) if *g == pending.generation);
        if !current || pending.signal.is_aborted() {
            log::debug!("Discarding stale grade for section {}", pending.section_id);
            return SubmitOutcome::Discarded;
        }
        self.in_flight = None;

        let section_id = pending.section_id;
        let (action, outcome) = match result {
            Ok(grade) => {
                let grades = match store.payload().section(&section_id) {
                    Some(section) => section
                        .components
                        .iter()
                        .filter_map(|c| {
                            let key = section.ids.backend_key(&c.id);
                            let result = grade.results.get(key)?;
                            Some((c.id.clone(), result.clone()))
                        })
                        .collect(),
                    None => BTreeMap::new(),
                };
                let outcome = SubmitOutcome::Graded {
                    passed: grade.passed,
                    total_score: grade.earned_points,
                    max_score: grade.total_points,
                };
                let action = Action::SetSectionGraded {
                    section_id: section_id.clone(),
                    grades,
                    total_score: grade.earned_points,
                    max_score: grade.total_points,
                    passed: grade.passed,
                    feedback: grade.feedback,
                };
                (action, outcome)
            }
            Err(e) => {
                log::warn!("Grading section {section_id} failed: {e}");
                let action = Action::SetSectionError {
                    section_id: section_id.clone(),
                    message: e.to_string(),
                };
                (action, SubmitOutcome::Failed(e))
            }
        };

        match store.dispatch(action) {
            Ok(()) => outcome,
            Err(e) => {
                log::debug!("Section {section_id} changed while grading: {e}");
                SubmitOutcome::Discarded
            }
        }
    }

    /// Starts, runs and finishes a submission on the calling thread.
    pub fn submit<G: Grader + ?Sized>(
        &mut self,
        store: &mut SectionStore<'_>,
        section_id: &str,
        grader: &G,
    ) -> Result<SubmitOutcome, SubmitError> {
        let pending = self.start(store, section_id)?;
        let result = pending.run(grader, &self.settings);
        Ok(self.finish(store, pending, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{AnswerValue, ContentPayload, GradeStatus};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    fn payload() -> ContentPayload {
        ContentPayload::from_value(json!({
            "version": 2,
            "sections": [
                {"id": "s1", "layout": [
                    {"id": "q", "type": "true_false", "props": {"statement": "x"}},
                    {"id": "q", "type": "short_answer", "props": {"prompt": "y"}}
                ]},
                {"id": "s2", "requires_previous": true, "layout": [
                    {"id": "n", "type": "numeric", "props": {"prompt": "n"}}
                ]}
            ]
        }))
        .unwrap()
    }

    fn answer(store: &mut SectionStore<'_>, section: &str, component: &str, value: AnswerValue) {
        store
            .dispatch(Action::SetAnswer {
                section_id: section.into(),
                component_id: component.into(),
                value,
            })
            .unwrap();
    }

    fn grade_json() -> Grade {
        serde_json::from_value(json!({
            "passed": true,
            "earned_points": 1.0,
            "total_points": 1.0,
            "results": {"q": {"correct": true, "earned_points": 1.0, "total_points": 1.0}},
            "feedback": "Well done"
        }))
        .unwrap()
    }

    /// Replies from a script; records what it was asked.
    struct ScriptedGrader {
        first: RefCell<Option<Result<GradeReply, GradingError>>>,
        polls: RefCell<Vec<GradeReply>>,
        poll_count: Cell<u32>,
        requests: RefCell<Vec<GradeRequest>>,
    }

    impl ScriptedGrader {
        fn new(first: Result<GradeReply, GradingError>, polls: Vec<GradeReply>) -> Self {
            Self {
                first: RefCell::new(Some(first)),
                polls: RefCell::new(polls),
                poll_count: Cell::new(0),
                requests: RefCell::new(vec![]),
            }
        }
    }

    impl Grader for ScriptedGrader {
        fn grade(
            &self,
            request: &GradeRequest,
            _: &AbortSignal,
        ) -> Result<GradeReply, GradingError> {
            self.requests.borrow_mut().push(request.clone());
            self.first
                .borrow_mut()
                .take()
                .unwrap_or(Err(GradingError::Failed("no reply".into())))
        }

        fn poll(&self, job_id: &str, _: &AbortSignal) -> Result<GradeReply, GradingError> {
            self.poll_count.set(self.poll_count.get() + 1);
            let mut polls = self.polls.borrow_mut();
            if polls.is_empty() {
                return Ok(GradeReply::Queued {
                    job_id: job_id.to_string(),
                });
            }
            Ok(polls.remove(0))
        }
    }

    fn fast() -> GradingSession {
        GradingSession::new(GradingSettings {
            poll_attempts: 3,
            poll_interval: Duration::ZERO,
        })
    }

    #[test]
    fn immediate_grade_maps_results_to_unique_ids() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        answer(&mut store, "s1", "s1_short_answer_1", AnswerValue::Text("why".into()));

        let grader = ScriptedGrader::new(Ok(GradeReply::Graded { grade: grade_json() }), vec![]);
        let outcome = fast().submit(&mut store, "s1", &grader).unwrap();

        assert!(matches!(outcome, SubmitOutcome::Graded { passed: true, .. }));
        assert_eq!(store.progress("s1"), Some(SectionProgress::Graded));
        let grade = store.grade("s1").unwrap();
        assert_eq!(grade.status, GradeStatus::Graded);
        assert_eq!(grade.feedback.as_deref(), Some("Well done"));
        // Both components answer to backend id `q`.
        assert_eq!(
            grade.grades.keys().collect::<Vec<_>>(),
            vec!["q", "s1_short_answer_1"]
        );
        assert_eq!(
            grader.requests.borrow()[0].answers,
            BTreeMap::from([("q".to_string(), json!("why"))])
        );
    }

    #[test]
    fn queued_job_is_polled() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        answer(&mut store, "s1", "q", AnswerValue::Boolean(true));

        let grader = ScriptedGrader::new(
            Ok(GradeReply::Queued { job_id: "j1".into() }),
            vec![
                GradeReply::Queued { job_id: "j1".into() },
                GradeReply::Graded { grade: grade_json() },
            ],
        );
        let outcome = fast().submit(&mut store, "s1", &grader).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Graded { .. }));
        assert_eq!(grader.poll_count.get(), 2);
    }

    #[test]
    fn polling_gives_up_and_allows_retry() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        answer(&mut store, "s1", "q", AnswerValue::Boolean(true));

        let grader = ScriptedGrader::new(Ok(GradeReply::Queued { job_id: "j".into() }), vec![]);
        let outcome = fast().submit(&mut store, "s1", &grader).unwrap();

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(GradingError::PollExhausted { attempts: 3, .. })
        ));
        assert_eq!(grader.poll_count.get(), 3);
        assert_eq!(store.progress("s1"), Some(SectionProgress::Dirty));
        assert_eq!(store.grade("s1").unwrap().status, GradeStatus::Error);
    }

    #[test]
    fn backend_failure_is_surfaced() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        answer(&mut store, "s1", "q", AnswerValue::Boolean(true));

        let grader = ScriptedGrader::new(Err(GradingError::Failed("500".into())), vec![]);
        let outcome = fast().submit(&mut store, "s1", &grader).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(GradingError::Failed(_))));
        assert_eq!(
            store.grade("s1").unwrap().error.as_deref(),
            Some("Grading request failed: 500")
        );
    }

    #[test]
    fn submission_guards() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        let mut session = fast();
        let grader = ScriptedGrader::new(Ok(GradeReply::Graded { grade: grade_json() }), vec![]);

        assert_eq!(
            session.submit(&mut store, "s1", &grader).unwrap_err(),
            SubmitError::NothingToSubmit("s1".into())
        );
        assert_eq!(
            session.submit(&mut store, "s2", &grader).unwrap_err(),
            SubmitError::Locked("s2".into())
        );
        assert_eq!(
            session.submit(&mut store, "zz", &grader).unwrap_err(),
            SubmitError::UnknownSection("zz".into())
        );
        assert!(grader.requests.borrow().is_empty());
    }

    #[test]
    fn newer_start_supersedes_in_flight_request() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        let mut session = fast();
        answer(&mut store, "s1", "q", AnswerValue::Boolean(true));

        let first = session.start(&mut store, "s1").unwrap();
        let second = session.start(&mut store, "s1").unwrap();
        assert!(first.signal().is_aborted());
        assert!(!second.signal().is_aborted());

        let stale = session.finish(&mut store, first, Ok(grade_json()));
        assert!(matches!(stale, SubmitOutcome::Discarded));
        assert_eq!(store.progress("s1"), Some(SectionProgress::Submitted));

        let fresh = session.finish(&mut store, second, Ok(grade_json()));
        assert!(matches!(fresh, SubmitOutcome::Graded { .. }));
        assert!(!session.is_grading());
    }

    #[test]
    fn explicit_abort_returns_section_to_dirty() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        let mut session = fast();
        answer(&mut store, "s1", "q", AnswerValue::Boolean(true));

        let pending = session.start(&mut store, "s1").unwrap();
        session.abort(&mut store);
        assert_eq!(store.progress("s1"), Some(SectionProgress::Dirty));

        let grader = ScriptedGrader::new(Ok(GradeReply::Graded { grade: grade_json() }), vec![]);
        let result = pending.run(&grader, session.settings());
        assert!(matches!(result, Err(GradingError::Aborted)));
        assert!(matches!(
            session.finish(&mut store, pending, result),
            SubmitOutcome::Discarded
        ));
    }

    #[test]
    fn answer_change_during_grading_discards_result() {
        let p = payload();
        let mut store = SectionStore::new(&p);
        let mut session = fast();
        answer(&mut store, "s1", "q", AnswerValue::Boolean(true));

        let pending = session.start(&mut store, "s1").unwrap();
        answer(&mut store, "s1", "q", AnswerValue::Boolean(false));
        let outcome = session.finish(&mut store, pending, Ok(grade_json()));
        assert!(matches!(outcome, SubmitOutcome::Discarded));
        assert_eq!(store.progress("s1"), Some(SectionProgress::Dirty));
    }

    #[test]
    fn reply_shapes() {
        let queued: GradeReply = serde_json::from_value(json!({"job_id": "abc"})).unwrap();
        assert_eq!(queued, GradeReply::Queued { job_id: "abc".into() });

        let graded: GradeReply =
            serde_json::from_value(json!({"grade": {"passed": false}})).unwrap();
        assert!(matches!(graded, GradeReply::Graded { grade } if !grade.passed));
    }
}
