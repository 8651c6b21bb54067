//! Trivia question bank with one cached match engine per question

use std::collections::HashMap;

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::engine::MatchEngine;
use crate::error::{MatchError, Result};

/// Questions drawn for one game round
pub const ROUND_SIZE: usize = 7;
pub const DEFAULT_POINTS: i64 = 100;

fn default_points() -> i64 {
    DEFAULT_POINTS
}

/// A trivia question about a UIC event
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub id: u64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub name: String,
    #[cfg_attr(feature = "python", pyo3(get))]
    #[serde(default)]
    pub description: String,
    #[cfg_attr(feature = "python", pyo3(get))]
    #[serde(default)]
    pub organization: String,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub acceptable_answers: Vec<String>,
    #[cfg_attr(feature = "python", pyo3(get))]
    #[serde(default = "default_points")]
    pub points_value: i64,
}

impl Question {
    pub fn new(id: u64, name: impl Into<String>, acceptable_answers: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            organization: String::new(),
            acceptable_answers,
            points_value: DEFAULT_POINTS,
        }
    }

    pub fn with_points(mut self, points_value: i64) -> Self {
        self.points_value = points_value;
        self
    }
}

/// Read-only set of questions, each with its engine built once up front.
#[cfg_attr(feature = "python", pyclass(frozen))]
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    engines: HashMap<u64, MatchEngine>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>, config: MatchConfig) -> Result<Self> {
        let mut engines = HashMap::with_capacity(questions.len());

        for question in &questions {
            let answers = question.acceptable_answers.iter().cloned();
            let engine = MatchEngine::with_config(answers, config.clone())?;
            if engines.insert(question.id, engine).is_some() {
                return Err(MatchError::DuplicateQuestion(question.id));
            }
        }

        info!("Question bank ready: {} questions", questions.len());
        Ok(Self { questions, engines })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn engine(&self, id: u64) -> Option<&MatchEngine> {
        self.engines.get(&id)
    }

    /// Pick question ids for a round.
    ///
    /// With fewer than `count` questions every id is returned in bank order;
    /// otherwise `count` distinct ids are sampled uniformly.
    pub fn draw_round<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<u64> {
        if self.questions.len() < count {
            return self.questions.iter().map(|q| q.id).collect();
        }
        self.questions
            .choose_multiple(rng, count)
            .map(|q| q.id)
            .collect()
    }
}

// ============= Python Binding =============

#[cfg(feature = "python")]
#[pymethods]
impl Question {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        acceptable_answers,
        description = String::new(),
        organization = String::new(),
        points_value = DEFAULT_POINTS
    ))]
    fn py_new(
        id: u64,
        name: String,
        acceptable_answers: Vec<String>,
        description: String,
        organization: String,
        points_value: i64,
    ) -> Self {
        Self {
            id,
            name,
            description,
            organization,
            acceptable_answers,
            points_value,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Question(id={}, name='{}', answers={})",
            self.id,
            self.name,
            self.acceptable_answers.len()
        )
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl QuestionBank {
    #[new]
    #[pyo3(signature = (questions, tolerance = 0.8))]
    fn py_new(questions: Vec<Question>, tolerance: f64) -> PyResult<Self> {
        Ok(Self::new(questions, MatchConfig::with_tolerance(tolerance))?)
    }

    #[pyo3(name = "validate")]
    fn py_validate(&self, question_id: u64, user_answer: &str) -> PyResult<crate::MatchDecision> {
        let engine = self
            .engine(question_id)
            .ok_or(MatchError::UnknownQuestion(question_id))?;
        Ok(engine.validate(user_answer))
    }

    #[pyo3(name = "start_round", signature = (count = ROUND_SIZE))]
    fn py_start_round(&self, count: usize) -> crate::GameRound {
        crate::GameRound::start(self, count, &mut rand::thread_rng())
    }

    #[pyo3(name = "questions")]
    fn py_questions(&self) -> Vec<Question> {
        self.questions.clone()
    }

    fn __len__(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn answers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_bank(size: u64) -> QuestionBank {
        let questions = (1..=size)
            .map(|id| {
                let answer = format!("answer {id}");
                Question::new(id, format!("Event {id}"), answers(&[answer.as_str()]))
            })
            .collect();
        QuestionBank::new(questions, MatchConfig::default()).unwrap()
    }

    #[test]
    fn test_engine_per_question() {
        let bank = QuestionBank::new(
            vec![
                Question::new(1, "Spark Festival", answers(&["Spark", "Spark Fest"])),
                Question::new(2, "Homecoming", answers(&["Homecoming"])),
            ],
            MatchConfig::default(),
        )
        .unwrap();

        assert!(bank.engine(1).unwrap().validate("spark fest").is_correct);
        assert!(!bank.engine(2).unwrap().validate("spark fest").is_correct);
        assert!(bank.engine(3).is_none());
        assert_eq!(bank.get(2).unwrap().name, "Homecoming");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = QuestionBank::new(
            vec![
                Question::new(1, "A", answers(&["a"])),
                Question::new(1, "B", answers(&["b"])),
            ],
            MatchConfig::default(),
        );
        assert!(matches!(result, Err(MatchError::DuplicateQuestion(1))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = QuestionBank::new(
            vec![Question::new(1, "A", answers(&["a"]))],
            MatchConfig::with_tolerance(3.0),
        );
        assert!(matches!(result, Err(MatchError::InvalidTolerance(_))));
    }

    #[test]
    fn test_small_bank_returns_everything_in_order() {
        let bank = sample_bank(4);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(bank.draw_round(ROUND_SIZE, &mut rng), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_draw_is_distinct_sample() {
        let bank = sample_bank(20);
        let mut rng = StdRng::seed_from_u64(42);
        let mut drawn = bank.draw_round(ROUND_SIZE, &mut rng);

        assert_eq!(drawn.len(), ROUND_SIZE);
        assert!(drawn.iter().all(|id| bank.get(*id).is_some()));
        drawn.sort_unstable();
        drawn.dedup();
        assert_eq!(drawn.len(), ROUND_SIZE);
    }

    #[test]
    fn test_draw_is_reproducible_with_seed() {
        let bank = sample_bank(20);
        let a = bank.draw_round(ROUND_SIZE, &mut StdRng::seed_from_u64(1));
        let b = bank.draw_round(ROUND_SIZE, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_question_json_defaults() {
        let json = r#"{"id": 3, "name": "Dance Marathon", "acceptable_answers": ["Marathon"]}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.points_value, DEFAULT_POINTS);
        assert!(q.description.is_empty());
    }
}
