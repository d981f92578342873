//! Process-wide named variables held by the session

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::operation::OperationRegistry;
use crate::state::StateRegistry;

/// Name of the operation registry variable
pub const ALL_OPERATIONS: &str = "__all_operations";
/// Name of the state registry variable
pub const ALL_STATES: &str = "__all_states";
/// Name of the connectivity flag variable
pub const INTERNET_CONNECTION: &str = "__internet_connection";

/// Value stored under a global variable name
pub enum GlobalValue {
    Operations(OperationRegistry),
    States(StateRegistry),
    /// Shared with a writer outside the turn loop
    Flag(Arc<AtomicBool>),
}

impl GlobalValue {
    /// Short description of the value's shape, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            GlobalValue::Operations(_) => "an operation registry",
            GlobalValue::States(_) => "a state registry",
            GlobalValue::Flag(_) => "a flag",
        }
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            GlobalValue::Flag(flag) => Some(flag.load(Ordering::SeqCst)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for GlobalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobalValue::Operations(registry) => f
                .debug_tuple("Operations")
                .field(&registry.names())
                .finish(),
            GlobalValue::States(registry) => {
                f.debug_tuple("States").field(&registry.names()).finish()
            }
            GlobalValue::Flag(flag) => f
                .debug_tuple("Flag")
                .field(&flag.load(Ordering::SeqCst))
                .finish(),
        }
    }
}

/// Errors from looking up session variables
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown global variable: {0}")]
    UnknownVariable(String),

    #[error("global variable {name} holds {found}, expected {expected}")]
    VariableType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}
