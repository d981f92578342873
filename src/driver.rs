//! Driver loop: runs turns until shutdown is acknowledged or input closes

use tracing::{debug, error, info};

use crate::session::SessionContext;
use crate::state::TurnError;

/// Run turns on `session` until the stop state acknowledges shutdown
pub fn run(session: &mut SessionContext) -> Result<(), TurnError> {
    info!(state = %session.current_state().kind(), "driver loop started");

    loop {
        match session.process_turn() {
            Ok(event) => {
                match serde_json::to_string(&event) {
                    Ok(json) => debug!(event = %json, "turn complete"),
                    Err(e) => debug!(%event, ?e, "turn complete"),
                }
                if event.is_shutdown() {
                    info!("shutdown acknowledged");
                    return Ok(());
                }
            }
            Err(TurnError::InputClosed) => {
                info!("input closed");
                return Ok(());
            }
            Err(e) => {
                error!(?e, "turn failed");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateKind;
    use crate::testing;

    #[test]
    fn test_runs_until_stopped() {
        let (mut session, script) = testing::session(StateKind::Text);
        script.borrow_mut().keyboard.extend(
            ["hello", "stop", "", "never read"].map(String::from),
        );

        run(&mut session).unwrap();

        let script = script.borrow();
        assert_eq!(script.keyboard, vec!["never read"]);
        assert_eq!(script.printed.len(), 3);
        assert_eq!(script.printed[1], "State changed from TextState to StopState");
        assert_eq!(script.printed[2], "Shutting down. Goodbye!");
        assert_eq!(script.logged.len(), 3);
    }

    #[test]
    fn test_stop_can_be_cancelled() {
        let (mut session, script) = testing::session(StateKind::Text);
        script
            .borrow_mut()
            .keyboard
            .extend(["stop", "text mode", "stop", ""].map(String::from));

        run(&mut session).unwrap();

        assert_eq!(session.current_state().kind(), StateKind::Stop);
        assert_eq!(script.borrow().printed.len(), 4);
    }

    #[test]
    fn test_audio_then_stop_listens() {
        let (mut session, script) = testing::session(StateKind::Audio);
        {
            let mut script = script.borrow_mut();
            script.heard.push_back(testing::utterance("stop", "en"));
            script.heard.push_back(testing::utterance("", "en"));
        }

        run(&mut session).unwrap();

        let script = script.borrow();
        assert_eq!(script.listens, 2);
        assert!(script.prompts.is_empty());
    }

    #[test]
    fn test_closed_input_ends_cleanly() {
        let (mut session, script) = testing::session(StateKind::Text);
        script.borrow_mut().keyboard.push_back("hello".to_string());

        run(&mut session).unwrap();
        assert_eq!(script.borrow().logged.len(), 1);
    }

    #[test]
    fn test_logging_failure_stops_loop() {
        let (mut session, script) = testing::session(StateKind::Text);
        {
            let mut script = script.borrow_mut();
            script.keyboard.push_back("hello".to_string());
            script.log_ok = false;
        }

        let err = run(&mut session).unwrap_err();
        assert!(matches!(err, TurnError::LoggingFailed));
    }
}
