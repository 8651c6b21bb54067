//! Game round tracking - guesses, points and accuracy

use chrono::{DateTime, Utc};
#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::MatchDecision;
use crate::error::{MatchError, Result};
use crate::questions::QuestionBank;

/// One submitted guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub question_id: u64,
    pub user_answer: String,
    pub is_correct: bool,
    pub time_taken_secs: f64,
    pub points_earned: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of [`GameRound::submit_guess`]
#[cfg_attr(feature = "python", pyclass(frozen))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessOutcome {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub question_name: String,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub description: String,
    /// Every accepted answer, for revealing after the guess.
    #[cfg_attr(feature = "python", pyo3(get))]
    pub acceptable_answers: Vec<String>,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub decision: MatchDecision,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub points_earned: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub current_score: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub questions_remaining: usize,
}

/// Final tally of a completed round
#[cfg_attr(feature = "python", pyclass(frozen))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub final_score: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub questions_answered: usize,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub correct_answers: usize,
    /// Percentage of answered questions that were correct.
    #[cfg_attr(feature = "python", pyo3(get))]
    pub accuracy: f64,
}

/// A single game session over questions drawn from a [`QuestionBank`]
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRound {
    question_ids: Vec<u64>,
    guesses: Vec<GuessRecord>,
    total_score: i64,
    correct_answers: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl GameRound {
    pub fn start<R: Rng + ?Sized>(bank: &QuestionBank, count: usize, rng: &mut R) -> Self {
        Self::with_questions(bank.draw_round(count, rng))
    }

    pub fn with_questions(question_ids: Vec<u64>) -> Self {
        debug!("Starting round with {} questions", question_ids.len());
        Self {
            question_ids,
            guesses: Vec::new(),
            total_score: 0,
            correct_answers: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn question_ids(&self) -> &[u64] {
        &self.question_ids
    }

    pub fn guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    pub fn questions_answered(&self) -> usize {
        self.guesses.len()
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn accuracy(&self) -> f64 {
        if self.guesses.is_empty() {
            return 0.0;
        }
        self.correct_answers as f64 / self.guesses.len() as f64 * 100.0
    }

    /// Validate a guess with the question's cached engine and update the tally.
    pub fn submit_guess(
        &mut self,
        bank: &QuestionBank,
        question_id: u64,
        user_answer: &str,
        time_taken_secs: f64,
    ) -> Result<GuessOutcome> {
        if self.is_completed() {
            return Err(MatchError::RoundCompleted);
        }
        let (question, engine) = bank
            .get(question_id)
            .zip(bank.engine(question_id))
            .ok_or(MatchError::UnknownQuestion(question_id))?;

        let decision = engine.validate(user_answer);
        let points_earned = if decision.is_correct {
            question.points_value
        } else {
            0
        };

        if decision.is_correct {
            self.correct_answers += 1;
        }
        self.total_score += points_earned;
        self.guesses.push(GuessRecord {
            question_id,
            user_answer: user_answer.to_string(),
            is_correct: decision.is_correct,
            time_taken_secs,
            points_earned,
            created_at: Utc::now(),
        });

        Ok(GuessOutcome {
            question_name: question.name.clone(),
            description: question.description.clone(),
            acceptable_answers: question.acceptable_answers.clone(),
            decision,
            points_earned,
            current_score: self.total_score,
            questions_remaining: self.question_ids.len().saturating_sub(self.guesses.len()),
        })
    }

    /// Close the round and report its tally.
    pub fn complete(&mut self) -> Result<RoundSummary> {
        if self.is_completed() {
            return Err(MatchError::RoundCompleted);
        }
        self.completed_at = Some(Utc::now());

        let summary = RoundSummary {
            final_score: self.total_score,
            questions_answered: self.questions_answered(),
            correct_answers: self.correct_answers,
            accuracy: self.accuracy(),
        };
        info!(
            "Round completed: score {}, {}/{} correct",
            summary.final_score, summary.correct_answers, summary.questions_answered
        );
        Ok(summary)
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pymethods]
impl GameRound {
    #[getter(question_ids)]
    fn py_question_ids(&self) -> Vec<u64> {
        self.question_ids.clone()
    }

    #[getter(total_score)]
    fn py_total_score(&self) -> i64 {
        self.total_score
    }

    #[getter(accuracy)]
    fn py_accuracy(&self) -> f64 {
        self.accuracy()
    }

    #[getter(started_at)]
    fn py_started_at(&self) -> String {
        self.started_at.to_rfc3339()
    }

    #[pyo3(name = "submit_guess", signature = (bank, question_id, answer, time_taken = 0.0))]
    fn py_submit_guess(
        &mut self,
        bank: PyRef<'_, QuestionBank>,
        question_id: u64,
        answer: &str,
        time_taken: f64,
    ) -> PyResult<GuessOutcome> {
        Ok(self.submit_guess(&bank, question_id, answer, time_taken)?)
    }

    #[pyo3(name = "complete")]
    fn py_complete(&mut self) -> PyResult<RoundSummary> {
        Ok(self.complete()?)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl RoundSummary {
    fn __repr__(&self) -> String {
        format!(
            "RoundSummary(score={}, correct={}/{}, accuracy={:.1}%)",
            self.final_score, self.correct_answers, self.questions_answered, self.accuracy
        )
    }
}
