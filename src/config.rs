//! Match engine configuration
//!
//! All fields have defaults, so an empty JSON object is a valid configuration
//! and reproduces the unguarded search.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

pub const DEFAULT_TOLERANCE: f64 = 0.8;
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Largest accepted `max_depth`.
pub const MAX_DEPTH_CEILING: usize = 8;

/// Limits on the fuzzy tier for latency-sensitive callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchGuard {
    /// Maximum candidate strings scored per `validate` call.
    pub max_candidates: Option<usize>,
    /// Guesses longer than this (in characters, after normalization) skip the fuzzy tier.
    pub max_input_chars: Option<usize>,
}

impl SearchGuard {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = Some(max);
        self
    }

    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = Some(max);
        self
    }
}

/// Configuration for [`MatchEngine`](crate::MatchEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum similarity (0.0-1.0) for fuzzy acceptance and ranking.
    pub tolerance: f64,
    /// Deepest level tried by the iterative-deepening search.
    pub max_depth: usize,
    pub guard: SearchGuard,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_depth: DEFAULT_MAX_DEPTH,
            guard: SearchGuard::default(),
        }
    }
}

impl MatchConfig {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(MatchError::InvalidTolerance(self.tolerance));
        }
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(MatchError::InvalidConfig(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH_CEILING, self.max_depth
            )));
        }
        if self.guard.max_candidates == Some(0) {
            return Err(MatchError::InvalidConfig(
                "guard.max_candidates must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
