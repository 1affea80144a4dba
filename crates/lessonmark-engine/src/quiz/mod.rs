//! Inline questions after parsing: stable option order per learner context
//! and the learner's selected answers.

pub mod answers;
pub mod shuffle;

pub use answers::{AnswerStore, AnswerUpdate, InlineAnswers, InlineAnswersPatch, Verdict};
pub use shuffle::{Shuffled, ShuffledQuestion, question_seed, seed_from_key, seeded_random, shuffle};
