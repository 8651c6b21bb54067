//! Trivia Match - answer validation core for the UIC trivia game
//!
//! Decides whether a typed guess matches one of a question's acceptable
//! answers: exact match, then prefix match through a trie, then a bounded
//! iterative-deepening search over single-character edits. Also provides the
//! question bank, question import and per-round scoring built on top of it.
//!
//! ```
//! use trivia_match::MatchEngine;
//!
//! let engine = MatchEngine::build(["Bulls", "Chicago Bulls"], 0.8).unwrap();
//! assert!(engine.validate("chicago").is_correct);
//! assert!(!engine.validate("xyz123").is_correct);
//! ```
//!
//! With the `python` feature the crate builds as a Python extension module.

#[macro_use]
extern crate log;

pub mod config;
pub mod edits;
pub mod engine;
pub mod error;
pub mod excel;
pub mod normalize;
pub mod progress;
pub mod questions;
pub mod similarity;
pub mod trie;

pub use config::{MatchConfig, SearchGuard};
pub use engine::{MatchDecision, MatchEngine, MatchTier, RankedAnswer};
pub use error::{MatchError, Result};
pub use excel::{load_questions, parse_csv};
pub use normalize::normalize;
pub use progress::{GameRound, GuessOutcome, GuessRecord, RoundSummary};
pub use questions::{Question, QuestionBank, ROUND_SIZE};
pub use similarity::ratio;
pub use trie::PrefixIndex;

/// Install `env_logger` once; the level comes from `RUST_LOG`
/// (e.g. `RUST_LOG=trivia_match=debug`).
pub fn init_logger() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // Another logger may already be installed by the host application.
        if env_logger::try_init().is_ok() {
            info!("Trivia match logging initialized");
        }
    });
}

// ============= Python Module =============

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;

    #[pyfunction]
    #[pyo3(name = "similarity")]
    fn py_similarity(a: &str, b: &str) -> f64 {
        crate::similarity::ratio(&crate::normalize(a), &crate::normalize(b))
    }

    #[pyfunction]
    #[pyo3(name = "init_logger")]
    fn py_init_logger() {
        crate::init_logger();
    }

    /// Trivia Match Python Module
    #[pymodule]
    fn trivia_match(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(py_similarity, m)?)?;
        m.add_function(wrap_pyfunction!(py_init_logger, m)?)?;
        m.add_function(wrap_pyfunction!(crate::excel::py_load_questions, m)?)?;

        m.add_class::<crate::MatchEngine>()?;
        m.add_class::<crate::MatchDecision>()?;
        m.add_class::<crate::Question>()?;
        m.add_class::<crate::QuestionBank>()?;
        m.add_class::<crate::GameRound>()?;
        m.add_class::<crate::GuessOutcome>()?;
        m.add_class::<crate::RoundSummary>()?;

        Ok(())
    }
}
