//! Events module for completed turns
//!
//! Every successful turn ends in exactly one event: either the active state
//! changed, or an operation ran.

use serde::{Deserialize, Serialize};

use crate::operation::builtin;
use crate::state::StateKind;

/// Outcome of one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// A mode-switch phrase replaced the active state
    Transitioned {
        from: StateKind,
        to: StateKind,
    },

    /// An operation produced the turn's output
    Executed {
        /// State that was active for the turn
        state: StateKind,
        /// Registry name of the operation
        operation: String,
    },
}

impl TurnEvent {
    /// Whether the shutdown acknowledgement ran this turn
    pub fn is_shutdown(&self) -> bool {
        matches!(self, TurnEvent::Executed { operation, .. } if operation == builtin::STOPPED.name)
    }
}

impl std::fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnEvent::Transitioned { from, to } => write!(f, "TRANSITIONED ({} -> {})", from, to),
            TurnEvent::Executed { state, operation } => {
                write!(f, "EXECUTED ({} in {})", operation, state)
            }
        }
    }
}
