//! Capability interfaces the core calls but does not implement
//!
//! Speech, keyboard, shell, audit logging and the canned conversational
//! responder all sit behind these traits. The session context holds one
//! boxed handle per capability, so tests can swap any of them for a fake.

mod console;
mod log;
mod responder;
mod shell;

use std::io;

pub use console::{ConsoleVoice, StdTerminal};
pub use log::{FileLog, TracingLog};
pub use responder::CannedResponder;
pub use shell::SystemShell;

/// Text captured from the microphone along with its detected language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
}

/// Speech output and speech input. Both calls block the turn.
pub trait Voice {
    fn say(&mut self, text: &str);
    fn listen(&mut self) -> io::Result<Utterance>;
}

/// Keyboard input and the user-visible output channel
pub trait Terminal {
    /// Read one line, without its trailing newline.
    ///
    /// Returns `ErrorKind::UnexpectedEof` once input is closed.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
    fn write_line(&mut self, text: &str);
}

/// Audit trail for completed turns
pub trait TurnLog {
    /// Record a message. Returns `false` if the record was lost.
    fn log(&mut self, message: &str, level: tracing::Level) -> bool;
}

/// Runs a raw command line and returns whatever it printed
pub trait Shell {
    /// Never fails: spawn errors are rendered into the returned text.
    fn run(&mut self, command: &str) -> String;
}

/// Free-text conversational reply for input no operation claimed
pub trait Responder {
    fn reply(&mut self, text: &str) -> String;
}

/// The full set of handles a session is built with
pub struct Capabilities {
    pub terminal: Box<dyn Terminal>,
    pub voice: Box<dyn Voice>,
    pub log: Box<dyn TurnLog>,
    pub shell: Box<dyn Shell>,
    pub responder: Box<dyn Responder>,
}
