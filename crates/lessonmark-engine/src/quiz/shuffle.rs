//! Deterministic option shuffling.
//!
//! The permutation must be identical on every device and in every session:
//! answers are stored in original option order and located again in a fresh
//! render. The hash and generator are therefore fixed 32-bit integer
//! algorithms, not a general-purpose RNG.

use crate::parsing::blocks::{QuestionBlock, QuestionOption};

/// Polynomial string hash (`h = h * 31 + unit`) over UTF-16 code units with
/// 32-bit wrap-around, returned as an absolute value.
pub fn seed_from_key(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .unsigned_abs()
}

/// Seed for question `question_index` of a lesson.
pub fn question_seed(question_index: usize, course_id: &str, lesson_id: &str) -> u32 {
    seed_from_key(&format!("{course_id}-{lesson_id}-{question_index}"))
}

/// Mulberry32: a single draw in `[0, 1)` for `seed`.
pub fn seeded_random(seed: u32) -> f64 {
    let mut t = seed.wrapping_add(0x6D2B_79F5);
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    f64::from(t ^ (t >> 14)) / 4_294_967_296.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shuffled<T> {
    pub shuffled: Vec<T>,
    /// `shuffled_to_original[i]` is the original index of `shuffled[i]`.
    pub shuffled_to_original: Vec<usize>,
}

/// Fisher-Yates from the last element down, drawing `seeded_random(seed + i)`
/// for position `i`.
pub fn shuffle<T: Clone>(items: &[T], seed: u32) -> Shuffled<T> {
    let mut shuffled = items.to_vec();
    let mut shuffled_to_original: Vec<usize> = (0..items.len()).collect();

    for i in (1..items.len()).rev() {
        let draw = seeded_random(seed.wrapping_add(i as u32));
        let j = ((draw * (i + 1) as f64) as usize).min(i);
        shuffled.swap(i, j);
        shuffled_to_original.swap(i, j);
    }

    Shuffled {
        shuffled,
        shuffled_to_original,
    }
}

/// A question's options in display order for one learner context.
#[derive(Debug, Clone, PartialEq)]
pub struct ShuffledQuestion {
    pub options: Vec<QuestionOption>,
    pub shuffled_to_original: Vec<usize>,
    /// Display position of the correct option, if the question has a key.
    pub original_correct_in_shuffled: Option<usize>,
}

impl ShuffledQuestion {
    pub fn new(
        question: &QuestionBlock,
        question_index: usize,
        course_id: &str,
        lesson_id: &str,
    ) -> Self {
        let seed = question_seed(question_index, course_id, lesson_id);
        let Shuffled {
            shuffled,
            shuffled_to_original,
        } = shuffle(&question.options, seed);

        let original_correct_in_shuffled = question
            .correct_index
            .and_then(|correct| shuffled_to_original.iter().position(|&o| o == correct));

        Self {
            options: shuffled,
            shuffled_to_original,
            original_correct_in_shuffled,
        }
    }

    pub fn original_index(&self, shuffled: usize) -> Option<usize> {
        self.shuffled_to_original.get(shuffled).copied()
    }

    pub fn shuffled_index(&self, original: usize) -> Option<usize> {
        self.shuffled_to_original.iter().position(|&o| o == original)
    }
}
