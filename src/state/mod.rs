//! Interaction modes and the turn pipeline they share
//!
//! Five modes:
//! - TextState: keyboard in, screen out (the default)
//! - HalfAudioState: keyboard in, screen and speaker out
//! - AudioState: microphone in, screen and speaker out
//! - CMDState: every line goes to the shell
//! - StopState: acknowledges shutdown

mod modes;
mod turn;

use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::events::TurnEvent;
use crate::operation::OperationEntry;
use crate::session::SessionContext;

pub use modes::{AudioState, CmdState, HalfAudioState, StopState, TextState};
pub use turn::TurnError;

/// Identity of a state. Two states are the same state iff their kinds match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    #[serde(rename = "TextState")]
    Text,
    #[serde(rename = "HalfAudioState")]
    HalfAudio,
    #[serde(rename = "AudioState")]
    Audio,
    #[serde(rename = "CMDState")]
    Cmd,
    #[serde(rename = "StopState")]
    Stop,
}

impl StateKind {
    pub const ALL: [StateKind; 5] = [
        StateKind::Text,
        StateKind::HalfAudio,
        StateKind::Audio,
        StateKind::Cmd,
        StateKind::Stop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StateKind::Text => "TextState",
            StateKind::HalfAudio => "HalfAudioState",
            StateKind::Audio => "AudioState",
            StateKind::Cmd => "CMDState",
            StateKind::Stop => "StopState",
        }
    }
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for state names that match no known state
#[derive(Debug, thiserror::Error)]
#[error("unknown state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for StateKind {
    type Err = UnknownState;

    /// Accepts the full names (`AudioState`) and short forms (`audio`,
    /// `half_audio`, `cmd`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "textstate" | "text" => Ok(StateKind::Text),
            "halfaudiostate" | "half_audio" | "halfaudio" => Ok(StateKind::HalfAudio),
            "audiostate" | "audio" => Ok(StateKind::Audio),
            "cmdstate" | "cmd" | "command" => Ok(StateKind::Cmd),
            "stopstate" | "stop" => Ok(StateKind::Stop),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}

/// One interaction mode.
///
/// A state only decides how input is acquired, which operation handles it,
/// which phrases switch into it and how output is delivered. The pipeline
/// itself lives in [`State::processing`] and is the same for every state.
pub trait State {
    fn kind(&self) -> StateKind;

    /// Fill the empty input buffer from this state's input source
    fn acquire_input(&self, session: &mut SessionContext) -> Result<(), TurnError>;

    /// Pick the operation that handles `input`
    fn classify(&self, session: &SessionContext, input: &str) -> Result<OperationEntry, TurnError>;

    /// Whether `input` (already trimmed) asks to switch into this state
    fn enters_on(&self, input: &str) -> bool;

    /// Show the output text. Voice states also speak it.
    fn deliver_output(&self, session: &mut SessionContext) {
        session.print_output();
    }

    /// Run one full turn with `self` as the active state
    fn processing(&self, session: &mut SessionContext) -> Result<TurnEvent, TurnError> {
        turn::run(self, session)
    }
}

/// Ordered list of every state, one instance per kind
pub struct StateRegistry {
    states: Vec<Rc<dyn State>>,
}

impl StateRegistry {
    pub fn new(states: Vec<Rc<dyn State>>) -> Self {
        Self { states }
    }

    /// All five states, in scan order
    pub fn standard() -> Self {
        Self::new(StateKind::ALL.into_iter().map(instance_of).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn State>> {
        self.states.iter()
    }

    /// Registered instance of `kind`, or a fresh one if it was not registered
    pub fn get(&self, kind: StateKind) -> Rc<dyn State> {
        self.states
            .iter()
            .find(|s| s.kind() == kind)
            .cloned()
            .unwrap_or_else(|| instance_of(kind))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.states.iter().map(|s| s.kind().name()).collect()
    }
}

impl std::fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn instance_of(kind: StateKind) -> Rc<dyn State> {
    match kind {
        StateKind::Text => Rc::new(TextState),
        StateKind::HalfAudio => Rc::new(HalfAudioState),
        StateKind::Audio => Rc::new(AudioState),
        StateKind::Cmd => Rc::new(CmdState),
        StateKind::Stop => Rc::new(StopState),
    }
}
