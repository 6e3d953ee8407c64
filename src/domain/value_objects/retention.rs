//! Retention policy value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on the number of release directories kept on a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct RetentionPolicy {
    max_keep: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("max_keep must be at least 1, got {0}")]
pub struct InvalidRetention(pub usize);

impl RetentionPolicy {
    pub const DEFAULT_MAX_KEEP: usize = 5;

    pub fn new(max_keep: usize) -> Result<Self, InvalidRetention> {
        if max_keep == 0 {
            return Err(InvalidRetention(max_keep));
        }
        Ok(Self { max_keep })
    }

    pub fn max_keep(&self) -> usize {
        self.max_keep
    }

    /// How many of `count` releases exceed the budget
    pub fn excess(&self, count: usize) -> usize {
        count.saturating_sub(self.max_keep)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_keep: Self::DEFAULT_MAX_KEEP,
        }
    }
}

impl TryFrom<usize> for RetentionPolicy {
    type Error = InvalidRetention;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RetentionPolicy> for usize {
    fn from(value: RetentionPolicy) -> Self {
        value.max_keep
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keep {}", self.max_keep)
    }
}
