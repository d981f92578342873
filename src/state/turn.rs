//! The turn pipeline shared by every state
//!
//! acquire input -> mode-switch check -> classify -> execute -> output ->
//! after-processing. A mode switch replaces classification and execution for
//! that turn.

use std::io;
use std::rc::Rc;

use tracing::{debug, info, Level};

use super::State;
use crate::events::TurnEvent;
use crate::operation;
use crate::session::{SessionContext, SessionError};

/// Errors that abort a turn
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to read input: {0}")]
    Input(#[source] io::Error),

    #[error("input closed")]
    InputClosed,

    #[error("error during logging")]
    LoggingFailed,
}

impl From<io::Error> for TurnError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            TurnError::InputClosed
        } else {
            TurnError::Input(e)
        }
    }
}

pub(super) fn run<S: State + ?Sized>(
    state: &S,
    session: &mut SessionContext,
) -> Result<TurnEvent, TurnError> {
    if session.input.text.is_empty() {
        state.acquire_input(session)?;
    }

    if let Some(next) = find_transition(state, session)? {
        return change_state(state, next, session);
    }

    let input = session.input.text.clone();
    let entry = state.classify(session, &input)?;
    debug!(state = %state.kind(), operation = entry.name, "operation selected");

    operation::perform(entry, session)?;

    state.deliver_output(session);
    after_processing(session)?;

    Ok(TurnEvent::Executed {
        state: state.kind(),
        operation: entry.name.to_string(),
    })
}

/// First other state whose entry phrases match the trimmed input.
///
/// Blank input never switches modes.
fn find_transition<S: State + ?Sized>(
    current: &S,
    session: &SessionContext,
) -> Result<Option<Rc<dyn State>>, TurnError> {
    let trimmed = session.input.text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let next = session
        .states()?
        .iter()
        .filter(|s| s.kind() != current.kind())
        .find(|s| s.enters_on(trimmed))
        .cloned();
    Ok(next)
}

fn change_state<S: State + ?Sized>(
    current: &S,
    next: Rc<dyn State>,
    session: &mut SessionContext,
) -> Result<TurnEvent, TurnError> {
    let from = session.current_state().kind();
    let to = next.kind();

    session.previous_state_name = from.to_string();
    session.set_state(next);
    session.output.text = format!("State changed from {} to {}", from, to);

    info!(from = %from, to = %to, "state transition");

    // the departing state still owns this turn's output
    current.deliver_output(session);
    after_processing(session)?;

    Ok(TurnEvent::Transitioned { from, to })
}

fn after_processing(session: &mut SessionContext) -> Result<(), TurnError> {
    let record = format!(
        "\nInput: {}\nOutput: {}",
        session.input.text, session.output.text
    );
    if !session.log(&record, Level::DEBUG) {
        return Err(TurnError::LoggingFailed);
    }

    session.reset_input();
    Ok(())
}
