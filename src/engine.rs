//! MatchEngine - tiered answer validation
//!
//! A guess is checked against a question's acceptable answers in three tiers,
//! and the first tier that succeeds decides:
//! 1. Exact match after normalization (confidence: 1.0)
//! 2. Prefix of a stored answer, via the [`PrefixIndex`] (confidence: 0.95)
//! 3. Iterative-deepening fuzzy search over single-character edits
//!    (confidence: the similarity ratio, accepted at or above `tolerance`)
//!
//! The engine is immutable once built, so one instance can serve concurrent
//! callers without locking.
//!
//! The fuzzy search generates edits only from the original guess: deeper
//! levels re-score those one-edit candidates against a looser bar but never
//! edit them again.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{MatchConfig, SearchGuard};
use crate::edits::SingleEdits;
use crate::error::Result;
use crate::normalize::normalize;
use crate::similarity::ratio_chars;
use crate::trie::PrefixIndex;

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const PREFIX_CONFIDENCE: f64 = 0.95;

/// Acceptance bar for the unedited guess.
const ROOT_ACCEPTANCE: f64 = 0.90;
/// Acceptance bar at depth `d > 0` is `EDIT_ACCEPTANCE - EDIT_RELAXATION * d`.
const EDIT_ACCEPTANCE: f64 = 0.80;
const EDIT_RELAXATION: f64 = 0.05;

/// Which tier decided a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Prefix,
    Fuzzy,
    NoMatch,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Prefix => "prefix",
            MatchTier::Fuzzy => "fuzzy",
            MatchTier::NoMatch => "no_match",
        }
    }
}

/// Outcome of validating one guess
#[cfg_attr(feature = "python", pyclass(frozen))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub is_correct: bool,
    /// Authored answer that was matched; `None` when incorrect.
    #[cfg_attr(feature = "python", pyo3(get))]
    pub matched_answer: Option<String>,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub confidence: f64,
    pub tier: MatchTier,
}

impl MatchDecision {
    fn accepted(answer: &str, confidence: f64, tier: MatchTier) -> Self {
        Self {
            is_correct: true,
            matched_answer: Some(answer.to_string()),
            confidence,
            tier,
        }
    }

    pub fn incorrect() -> Self {
        Self {
            is_correct: false,
            matched_answer: None,
            confidence: 0.0,
            tier: MatchTier::NoMatch,
        }
    }
}

/// One entry of [`MatchEngine::rank`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAnswer {
    pub answer: String,
    pub confidence: f64,
}

/// Remaining acceptance tests for one `validate` call.
struct Budget(Option<usize>);

impl Budget {
    fn new(guard: &SearchGuard) -> Self {
        Self(guard.max_candidates)
    }

    /// Consume one test; false once the budget is spent.
    fn spend(&mut self) -> bool {
        match &mut self.0 {
            None => true,
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
        }
    }

    fn exhausted(&self) -> bool {
        self.0 == Some(0)
    }
}

/// Validates guesses against one question's acceptable answers
#[cfg_attr(feature = "python", pyclass(frozen))]
#[derive(Debug, Clone)]
pub struct MatchEngine {
    /// Answers as authored, in original order.
    answers: Vec<String>,
    /// Normalized answers as character vectors, parallel to `answers`.
    normalized: Vec<Vec<char>>,
    index: PrefixIndex,
    config: MatchConfig,
}

impl MatchEngine {
    /// Build an engine with the given tolerance and default search settings.
    pub fn build<I, S>(acceptable_answers: I, tolerance: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(acceptable_answers, MatchConfig::with_tolerance(tolerance))
    }

    pub fn with_config<I, S>(acceptable_answers: I, config: MatchConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;

        let answers: Vec<String> = acceptable_answers.into_iter().map(Into::into).collect();
        let normalized = answers
            .iter()
            .map(|a| normalize(a).chars().collect())
            .collect();
        let index = PrefixIndex::from_answers(&answers);

        debug!(
            "Built match engine: {} answers, {} trie nodes, tolerance {}",
            answers.len(),
            index.node_count(),
            config.tolerance
        );

        Ok(Self {
            answers,
            normalized,
            index,
            config,
        })
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Decide whether `user_answer` is correct.
    pub fn validate(&self, user_answer: &str) -> MatchDecision {
        let guess = normalize(user_answer);
        if guess.is_empty() {
            return MatchDecision::incorrect();
        }
        let guess_chars: Vec<char> = guess.chars().collect();

        if let Some(idx) = self.normalized.iter().position(|n| *n == guess_chars) {
            debug!("Exact match for {:?}: {:?}", guess, self.answers[idx]);
            return MatchDecision::accepted(&self.answers[idx], EXACT_CONFIDENCE, MatchTier::Exact);
        }

        if let Some(first) = self.index.contains_prefix(&guess).first() {
            if let Some(idx) = self.position_of_normalized(first) {
                debug!("Prefix match for {:?}: {:?}", guess, self.answers[idx]);
                return MatchDecision::accepted(
                    &self.answers[idx],
                    PREFIX_CONFIDENCE,
                    MatchTier::Prefix,
                );
            }
        }

        if let Some(limit) = self.config.guard.max_input_chars {
            if guess_chars.len() > limit {
                warn!(
                    "Guess of {} chars exceeds fuzzy limit {}, skipping fuzzy search",
                    guess_chars.len(),
                    limit
                );
                return MatchDecision::incorrect();
            }
        }

        match self.iterative_deepening_search(&guess) {
            Some((idx, confidence)) if confidence >= self.config.tolerance => {
                debug!(
                    "Fuzzy match for {:?}: {:?} ({:.3})",
                    guess, self.answers[idx], confidence
                );
                MatchDecision::accepted(&self.answers[idx], confidence, MatchTier::Fuzzy)
            }
            _ => MatchDecision::incorrect(),
        }
    }

    /// Score every answer directly against `user_answer`, best first.
    ///
    /// Sorting is stable, so equal scores keep answer-list order. The list is
    /// cut to `top_n` before entries below `tolerance` are dropped.
    pub fn rank(&self, user_answer: &str, top_n: usize) -> Vec<RankedAnswer> {
        let guess: Vec<char> = normalize(user_answer).chars().collect();

        let mut ranked: Vec<RankedAnswer> = self
            .answers
            .iter()
            .zip(&self.normalized)
            .map(|(answer, normalized)| RankedAnswer {
                answer: answer.clone(),
                confidence: ratio_chars(&guess, normalized),
            })
            .collect();

        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked.truncate(top_n);
        ranked.retain(|m| m.confidence >= self.config.tolerance);
        ranked
    }

    fn position_of_normalized(&self, word: &str) -> Option<usize> {
        self.normalized
            .iter()
            .position(|n| n.iter().copied().eq(word.chars()))
    }

    /// Try depth limits `1..=max_depth`; the shallowest hit wins.
    fn iterative_deepening_search(&self, guess: &str) -> Option<(usize, f64)> {
        let mut budget = Budget::new(&self.config.guard);

        for depth_limit in 1..=self.config.max_depth {
            trace!("Fuzzy search for {:?} at depth limit {}", guess, depth_limit);
            if let Some(hit) = self.depth_bounded_search(guess, 0, depth_limit, &mut budget) {
                return Some(hit);
            }
            if budget.exhausted() {
                warn!("Fuzzy search budget exhausted for {:?}", guess);
                return None;
            }
        }

        None
    }

    fn depth_bounded_search(
        &self,
        candidate: &str,
        depth: usize,
        depth_limit: usize,
        budget: &mut Budget,
    ) -> Option<(usize, f64)> {
        if depth > depth_limit || !budget.spend() {
            return None;
        }

        if let Some(hit) = self.accept(candidate, depth) {
            return Some(hit);
        }

        if depth == 0 {
            for edited in SingleEdits::new(candidate) {
                let hit = self.depth_bounded_search(&edited, depth + 1, depth_limit, budget);
                if hit.is_some() {
                    return hit;
                }
                if budget.exhausted() {
                    break;
                }
            }
        }

        None
    }

    /// First answer (in list order) clearing the bar for `depth`.
    fn accept(&self, candidate: &str, depth: usize) -> Option<(usize, f64)> {
        let threshold = if depth == 0 {
            ROOT_ACCEPTANCE
        } else {
            EDIT_ACCEPTANCE - EDIT_RELAXATION * depth as f64
        };
        let candidate: Vec<char> = candidate.chars().collect();

        self.normalized.iter().enumerate().find_map(|(idx, answer)| {
            let similarity = ratio_chars(&candidate, answer);
            (similarity >= threshold).then_some((idx, similarity))
        })
    }
}

// ============= Python Binding =============

#[cfg(feature = "python")]
#[pymethods]
impl MatchDecision {
    #[getter(tier)]
    fn py_tier(&self) -> &'static str {
        self.tier.as_str()
    }

    fn __repr__(&self) -> String {
        format!(
            "MatchDecision(is_correct={}, matched_answer={:?}, confidence={:.2}, tier='{}')",
            self.is_correct,
            self.matched_answer,
            self.confidence,
            self.tier.as_str()
        )
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl MatchEngine {
    #[new]
    #[pyo3(signature = (
        acceptable_answers,
        tolerance = 0.8,
        max_candidates = None,
        max_input_chars = None
    ))]
    fn py_new(
        acceptable_answers: Vec<String>,
        tolerance: f64,
        max_candidates: Option<usize>,
        max_input_chars: Option<usize>,
    ) -> PyResult<Self> {
        let config = MatchConfig {
            tolerance,
            guard: SearchGuard {
                max_candidates,
                max_input_chars,
            },
            ..MatchConfig::default()
        };
        Ok(Self::with_config(acceptable_answers, config)?)
    }

    #[pyo3(name = "validate")]
    fn py_validate(&self, py: Python<'_>, user_answer: &str) -> MatchDecision {
        py.allow_threads(|| self.validate(user_answer))
    }

    #[pyo3(name = "rank", signature = (user_answer, top_n = 3))]
    fn py_rank(&self, user_answer: &str, top_n: usize) -> Vec<(String, f64)> {
        self.rank(user_answer, top_n)
            .into_iter()
            .map(|m| (m.answer, m.confidence))
            .collect()
    }

    #[getter(answers)]
    fn py_answers(&self) -> Vec<String> {
        self.answers.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "MatchEngine(answers={}, tolerance={:.2})",
            self.answers.len(),
            self.config.tolerance
        )
    }
}
