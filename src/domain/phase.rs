//! Deploy phase state machine
//!
//! `Resolving -> Transferring -> Merging -> ConfiguringHost -> Pruning ->
//! Activating -> Done`, with `Failed` reachable from any non-terminal phase.
//! There are no backward edges: a failed deploy is retried from the start.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployPhase {
    Resolving,
    Transferring,
    Merging,
    ConfiguringHost,
    Pruning,
    Activating,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal phase transition {from} -> {to}")]
pub struct IllegalTransition {
    pub from: DeployPhase,
    pub to: DeployPhase,
}

impl DeployPhase {
    /// The phase that follows a successful completion of this one
    pub fn next(self) -> Option<DeployPhase> {
        match self {
            DeployPhase::Resolving => Some(DeployPhase::Transferring),
            DeployPhase::Transferring => Some(DeployPhase::Merging),
            DeployPhase::Merging => Some(DeployPhase::ConfiguringHost),
            DeployPhase::ConfiguringHost => Some(DeployPhase::Pruning),
            DeployPhase::Pruning => Some(DeployPhase::Activating),
            DeployPhase::Activating => Some(DeployPhase::Done),
            DeployPhase::Done | DeployPhase::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeployPhase::Done | DeployPhase::Failed)
    }

    /// Validate and perform a transition
    pub fn advance(self, to: DeployPhase) -> Result<DeployPhase, IllegalTransition> {
        let legal = match to {
            DeployPhase::Failed => !self.is_terminal(),
            _ => self.next() == Some(to),
        };
        if legal {
            Ok(to)
        } else {
            Err(IllegalTransition { from: self, to })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeployPhase::Resolving => "resolving",
            DeployPhase::Transferring => "transferring",
            DeployPhase::Merging => "merging",
            DeployPhase::ConfiguringHost => "configuring_host",
            DeployPhase::Pruning => "pruning",
            DeployPhase::Activating => "activating",
            DeployPhase::Done => "done",
            DeployPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
