//! emma: mode-dispatch core for a conversational assistant
//!
//! Provides:
//! - Five interaction modes sharing one turn pipeline
//! - Ordered operation registry with first-match classification
//! - Session context that routes every side effect through capabilities
//!
//! Speech, shell, logging and canned replies are capabilities; the crate
//! ships console-backed stand-ins for each.

pub mod capability;
pub mod config;
pub mod driver;
pub mod events;
pub mod lifecycle;
pub mod operation;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use events::TurnEvent;
pub use session::SessionContext;
pub use state::{State, StateKind, TurnError};
