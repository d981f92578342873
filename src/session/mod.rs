//! Session context shared by every turn
//!
//! The session owns the turn buffers, the active state, the process-wide
//! variables and the capability handles. States and operations receive it by
//! `&mut` and go through its methods for every side effect.

mod globals;

use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, Level};

use crate::capability::{Capabilities, Utterance};
use crate::events::TurnEvent;
use crate::operation::OperationRegistry;
use crate::state::{State, StateKind, StateRegistry, TurnError};

pub use globals::{GlobalValue, SessionError, ALL_OPERATIONS, ALL_STATES, INTERNET_CONNECTION};

/// Input buffer for the current turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnInput {
    pub text: String,
    pub lang: String,
}

/// Output buffer for the current turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutput {
    pub text: String,
}

/// Mutable conversation state that lives for the whole process
pub struct SessionContext {
    pub input: TurnInput,
    pub output: TurnOutput,
    /// Name of the state active right before the most recent transition
    pub previous_state_name: String,
    state: Rc<dyn State>,
    spoken_language: String,
    globals: HashMap<String, GlobalValue>,
    caps: Capabilities,
}

impl SessionContext {
    /// Create a session with no global variables registered
    pub fn new(
        initial_state: Rc<dyn State>,
        spoken_language: impl Into<String>,
        capabilities: Capabilities,
    ) -> Self {
        let spoken_language = spoken_language.into();
        Self {
            input: TurnInput {
                text: String::new(),
                lang: spoken_language.clone(),
            },
            output: TurnOutput::default(),
            previous_state_name: String::new(),
            state: initial_state,
            spoken_language,
            globals: HashMap::new(),
            caps: capabilities,
        }
    }

    /// Create a session with the built-in operations and all five states
    /// registered, starting in `initial`.
    pub fn standard(
        initial: StateKind,
        spoken_language: impl Into<String>,
        capabilities: Capabilities,
        connectivity: Arc<AtomicBool>,
    ) -> Self {
        let states = StateRegistry::standard();
        let initial_state = states.get(initial);

        let mut session = Self::new(initial_state, spoken_language, capabilities);
        session.set_global_var(ALL_OPERATIONS, GlobalValue::Operations(OperationRegistry::builtin()));
        session.set_global_var(ALL_STATES, GlobalValue::States(states));
        session.set_global_var(INTERNET_CONNECTION, GlobalValue::Flag(connectivity));
        session
    }

    /// Run one turn of the active state
    pub fn process_turn(&mut self) -> Result<TurnEvent, TurnError> {
        let state = self.current_state();
        state.processing(self)
    }

    pub fn current_state(&self) -> Rc<dyn State> {
        Rc::clone(&self.state)
    }

    pub fn set_state(&mut self, state: Rc<dyn State>) {
        self.state = state;
    }

    /// Configured default language tag
    pub fn spoken_language(&self) -> &str {
        &self.spoken_language
    }

    pub fn set_global_var(&mut self, name: impl Into<String>, value: GlobalValue) {
        self.globals.insert(name.into(), value);
    }

    pub fn global_var(&self, name: &str) -> Result<&GlobalValue, SessionError> {
        self.globals
            .get(name)
            .ok_or_else(|| SessionError::UnknownVariable(name.to_string()))
    }

    pub fn operations(&self) -> Result<&OperationRegistry, SessionError> {
        match self.global_var(ALL_OPERATIONS)? {
            GlobalValue::Operations(registry) => Ok(registry),
            other => Err(type_mismatch(ALL_OPERATIONS, "an operation registry", other)),
        }
    }

    pub fn states(&self) -> Result<&StateRegistry, SessionError> {
        match self.global_var(ALL_STATES)? {
            GlobalValue::States(registry) => Ok(registry),
            other => Err(type_mismatch(ALL_STATES, "a state registry", other)),
        }
    }

    pub fn internet_connected(&self) -> Result<bool, SessionError> {
        let value = self.global_var(INTERNET_CONNECTION)?;
        value
            .flag()
            .ok_or_else(|| type_mismatch(INTERNET_CONNECTION, "a flag", value))
    }

    /// Write a record to the audit log. Returns `false` if it was lost.
    pub fn log(&mut self, message: &str, level: Level) -> bool {
        self.caps.log.log(message, level)
    }

    pub fn say(&mut self, text: &str) {
        self.caps.voice.say(text);
    }

    /// Speak the current output text
    pub fn say_output(&mut self) {
        let text = self.output.text.clone();
        self.caps.voice.say(&text);
    }

    pub fn listen(&mut self) -> io::Result<Utterance> {
        let heard = self.caps.voice.listen()?;
        debug!(lang = %heard.lang, "heard utterance");
        Ok(heard)
    }

    /// Read one keyboard line
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.caps.terminal.read_line(prompt)
    }

    /// Write the current output text to the user-visible channel
    pub fn print_output(&mut self) {
        self.caps.terminal.write_line(&self.output.text);
    }

    pub fn run_shell(&mut self, command: &str) -> String {
        self.caps.shell.run(command)
    }

    /// Ask the conversational responder for a reply
    pub fn respond(&mut self, text: &str) -> String {
        self.caps.responder.reply(text)
    }

    /// Empty the input buffer and restore the default language tag
    pub fn reset_input(&mut self) {
        self.input.text.clear();
        self.input.lang = self.spoken_language.clone();
    }
}

fn type_mismatch(name: &str, expected: &'static str, found: &GlobalValue) -> SessionError {
    SessionError::VariableType {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing;

    #[test]
    fn test_unknown_variable() {
        let (session, _) = testing::bare_session();
        let err = session.global_var("__nope").unwrap_err();
        assert!(matches!(err, SessionError::UnknownVariable(ref name) if name == "__nope"));
        assert!(matches!(
            session.operations(),
            Err(SessionError::UnknownVariable(_))
        ));
        assert!(matches!(session.states(), Err(SessionError::UnknownVariable(_))));
        assert!(matches!(
            session.internet_connected(),
            Err(SessionError::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_variable_type_mismatch() {
        let (mut session, _) = testing::bare_session();
        session.set_global_var(ALL_STATES, GlobalValue::Flag(Arc::new(AtomicBool::new(true))));

        let err = session.states().unwrap_err();
        assert_eq!(
            err.to_string(),
            "global variable __all_states holds a flag, expected a state registry"
        );
    }

    #[test]
    fn test_standard_registers_globals() {
        let (session, _) = testing::session(StateKind::Cmd);
        assert_eq!(session.current_state().kind(), StateKind::Cmd);
        assert_eq!(session.states().unwrap().names().len(), 5);
        assert!(session.operations().unwrap().names().contains(&"fallback"));
        assert!(session.internet_connected().unwrap());
    }

    #[test]
    fn test_connectivity_is_read_live() {
        let flag = Arc::new(AtomicBool::new(true));
        let (session, _) = testing::session_with_connectivity(StateKind::Text, Arc::clone(&flag));
        assert!(session.internet_connected().unwrap());

        flag.store(false, Ordering::SeqCst);
        assert!(!session.internet_connected().unwrap());
    }

    #[test]
    fn test_reset_input_restores_default_language() {
        let (mut session, _) = testing::session(StateKind::Audio);
        session.input.text = "hola".to_string();
        session.input.lang = "es".to_string();

        session.reset_input();

        assert_eq!(session.input.text, "");
        assert_eq!(session.input.lang, testing::LANG);
    }

    #[test]
    fn test_capabilities_route_through_session() {
        let (mut session, script) = testing::session(StateKind::Text);
        session.output.text = "hello there".to_string();
        session.print_output();
        session.say_output();
        assert_eq!(session.run_shell("echo hi"), "hi");

        let script = script.borrow();
        assert_eq!(script.printed, vec!["hello there"]);
        assert_eq!(script.spoken, vec!["hello there"]);
        assert_eq!(script.shell_calls, vec!["echo hi"]);
    }
}
