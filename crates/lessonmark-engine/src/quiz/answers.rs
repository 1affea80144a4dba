//! Learner answers to inline questions.
//!
//! Answers are kept in original option order, keyed by the question's
//! position among all questions of the lesson. Selecting an answer updates
//! local state first; the persisted value then overrides it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parsing::blocks::QuestionBlock;

/// One answer as the persistence collaborator sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerUpdate {
    pub question_index: usize,
    pub selected_answer: usize,
}

/// Body of the inline-question `PATCH` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineAnswersPatch {
    pub user_id: String,
    pub updates: Vec<AnswerUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
    /// The question has no answer key, so no selection can be judged.
    Ungradable,
}

/// Stores and retrieves persisted answers.
pub trait AnswerStore {
    type Error: std::error::Error;

    fn load(&self, user_id: &str) -> Result<Vec<AnswerUpdate>, Self::Error>;

    /// Persists `patch` and returns the stored answers it affected.
    fn save(&self, patch: &InlineAnswersPatch) -> Result<Vec<AnswerUpdate>, Self::Error>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineAnswers {
    selected: BTreeMap<usize, usize>,
    /// Value before an optimistic selection, for questions awaiting the store.
    pending: BTreeMap<usize, Option<usize>>,
}

impl InlineAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all local state with persisted answers.
    pub fn hydrate(&mut self, answers: impl IntoIterator<Item = AnswerUpdate>) {
        self.selected = answers
            .into_iter()
            .map(|a| (a.question_index, a.selected_answer))
            .collect();
        self.pending.clear();
    }

    /// Records a selection locally and returns the update to persist.
    pub fn select(&mut self, question_index: usize, original_index: usize) -> AnswerUpdate {
        let previous = self.selected.insert(question_index, original_index);
        self.pending.entry(question_index).or_insert(previous);
        AnswerUpdate {
            question_index,
            selected_answer: original_index,
        }
    }

    /// Applies answers confirmed by the store. They win over local values.
    pub fn reconcile(&mut self, confirmed: impl IntoIterator<Item = AnswerUpdate>) {
        for a in confirmed {
            self.selected.insert(a.question_index, a.selected_answer);
            self.pending.remove(&a.question_index);
        }
    }

    /// Undoes an optimistic selection the store rejected.
    pub fn revert(&mut self, question_index: usize) {
        let Some(previous) = self.pending.remove(&question_index) else {
            return;
        };
        match previous {
            Some(v) => self.selected.insert(question_index, v),
            None => self.selected.remove(&question_index),
        };
    }

    pub fn selected(&self, question_index: usize) -> Option<usize> {
        self.selected.get(&question_index).copied()
    }

    pub fn is_pending(&self, question_index: usize) -> bool {
        self.pending.contains_key(&question_index)
    }

    pub fn check(&self, question_index: usize, question: &QuestionBlock) -> Verdict {
        let Some(correct) = question.correct_index else {
            return Verdict::Ungradable;
        };
        match self.selected(question_index) {
            None => Verdict::Unanswered,
            Some(chosen) if chosen == correct => Verdict::Correct,
            Some(_) => Verdict::Incorrect,
        }
    }

    pub fn patch(user_id: impl Into<String>, updates: Vec<AnswerUpdate>) -> InlineAnswersPatch {
        InlineAnswersPatch {
            user_id: user_id.into(),
            updates,
        }
    }

    /// Loads persisted answers into fresh state.
    pub fn load<S: AnswerStore>(&mut self, store: &S, user_id: &str) -> Result<(), S::Error> {
        let answers = store.load(user_id)?;
        self.hydrate(answers);
        Ok(())
    }

    /// Selects optimistically, persists, then reconciles. On failure the
    /// selection is reverted and the error returned.
    pub fn submit<S: AnswerStore>(
        &mut self,
        store: &S,
        user_id: &str,
        question_index: usize,
        original_index: usize,
    ) -> Result<(), S::Error> {
        let update = self.select(question_index, original_index);
        match store.save(&Self::patch(user_id, vec![update])) {
            Ok(confirmed) => {
                self.reconcile(confirmed);
                // A store that echoes nothing still accepted the write.
                self.pending.remove(&question_index);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to save answer for question {question_index}: {e}");
                self.revert(question_index);
                Err(e)
            }
        }
    }
}
