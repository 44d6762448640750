//! Weighted-random answer selection for a single question round.
//!
//! Word weights decay by the golden ratio along the question: the first word
//! takes 1/φ of the probability mass, every interior word takes 1/φ of what
//! remains, and the last word closes the remainder, so the weights always
//! sum to 1.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::person::{Person, Sex};

/// Golden-ratio decay constant for word weights.
pub const PHI: f64 = 1.618;

/// Probability that the examiner keeps drawing additional accepted answers.
const REDRAW_PROBABILITY: f64 = 1.0 / 3.0;

/// Positional weights for a question of `n` words.
pub fn word_weights(n: usize) -> Vec<f64> {
    let mut weights = Vec::with_capacity(n);
    let mut total = 0.0;
    for i in 0..n {
        let weight = if i == n - 1 {
            1.0 - total
        } else if i == 0 {
            1.0 / PHI
        } else {
            (1.0 - total) / PHI
        };
        weights.push(weight);
        total += weight;
    }
    weights
}

/// One question posed by an examiner to a student.
///
/// The round owns the word pool: a `Women` participant reads it reversed,
/// and both the reversal and the pool removals made while the examiner
/// collects accepted answers persist for the rest of the round.
#[derive(Debug)]
pub struct QuizRound {
    words: Vec<String>,
}

impl QuizRound {
    pub fn new(question: &str) -> Self {
        Self {
            words: question.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Draw one word using the positional weights, or `None` for an empty pool.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        if self.words.is_empty() {
            return None;
        }
        let dist = WeightedIndex::new(word_weights(self.words.len())).ok()?;
        Some(self.words[dist.sample(rng)].clone())
    }

    /// The student's single guess. A `Women` student reads the words reversed.
    pub fn student_answer<R: Rng + ?Sized>(
        &mut self,
        student: &Person,
        rng: &mut R,
    ) -> Option<String> {
        if student.sex() == Sex::Women {
            self.words.reverse();
        }
        self.draw(rng)
    }

    /// The examiner's accepted answers: one draw always, then with
    /// probability 1/3 per step the previous pick leaves the pool and
    /// another draw is made, until the stop branch hits or the pool dries up.
    pub fn examiner_answers<R: Rng + ?Sized>(
        &mut self,
        examiner: &Person,
        rng: &mut R,
    ) -> Vec<String> {
        if examiner.sex() == Sex::Women {
            self.words.reverse();
        }

        let mut accepted = Vec::new();
        match self.draw(rng) {
            Some(word) => accepted.push(word),
            None => return accepted,
        }

        while !self.words.is_empty() {
            if !rng.gen_bool(REDRAW_PROBABILITY) {
                break;
            }
            if let Some(last) = accepted.last() {
                if let Some(pos) = self.words.iter().position(|w| w == last) {
                    self.words.remove(pos);
                }
            }
            if let Some(word) = self.draw(rng) {
                accepted.push(word);
            }
        }
        accepted
    }
}

/// Run one full round and report whether the student's guess is accepted.
pub fn check_answer<R: Rng + ?Sized>(
    examiner: &Person,
    student: &Person,
    question: &str,
    rng: &mut R,
) -> bool {
    let mut round = QuizRound::new(question);
    let guess = round.student_answer(student, rng);
    let accepted = round.examiner_answers(examiner, rng);
    match guess {
        Some(word) => accepted.contains(&word),
        // a question with no words yields no guess and nothing to reject it
        None => accepted.is_empty(),
    }
}
