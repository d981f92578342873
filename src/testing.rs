//! Recording fakes for every capability, shared through one script

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::Level;

use crate::capability::{Capabilities, Responder, Shell, Terminal, TurnLog, Utterance, Voice};
use crate::session::SessionContext;
use crate::state::{StateKind, TextState};

pub const LANG: &str = "en";
pub const REPLY: &str = "canned reply";

/// Queued inputs and everything the fakes were asked to do
#[derive(Debug)]
pub struct Script {
    pub keyboard: VecDeque<String>,
    pub heard: VecDeque<Utterance>,
    pub prompts: Vec<String>,
    pub printed: Vec<String>,
    pub spoken: Vec<String>,
    pub listens: usize,
    pub logged: Vec<(String, Level)>,
    pub log_ok: bool,
    pub shell_calls: Vec<String>,
    pub replies: Vec<String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            keyboard: VecDeque::new(),
            heard: VecDeque::new(),
            prompts: Vec::new(),
            printed: Vec::new(),
            spoken: Vec::new(),
            listens: 0,
            logged: Vec::new(),
            log_ok: true,
            shell_calls: Vec::new(),
            replies: Vec::new(),
        }
    }
}

pub type SharedScript = Rc<RefCell<Script>>;

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
}

struct FakeTerminal(SharedScript);

impl Terminal for FakeTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut script = self.0.borrow_mut();
        script.prompts.push(prompt.to_string());
        script.keyboard.pop_front().ok_or_else(closed)
    }

    fn write_line(&mut self, text: &str) {
        self.0.borrow_mut().printed.push(text.to_string());
    }
}

struct FakeVoice(SharedScript);

impl Voice for FakeVoice {
    fn say(&mut self, text: &str) {
        self.0.borrow_mut().spoken.push(text.to_string());
    }

    fn listen(&mut self) -> io::Result<Utterance> {
        let mut script = self.0.borrow_mut();
        script.listens += 1;
        script.heard.pop_front().ok_or_else(closed)
    }
}

struct FakeLog(SharedScript);

impl TurnLog for FakeLog {
    fn log(&mut self, message: &str, level: Level) -> bool {
        let mut script = self.0.borrow_mut();
        script.logged.push((message.to_string(), level));
        script.log_ok
    }
}

/// `echo X` prints X; everything else prints nothing
struct FakeShell(SharedScript);

impl Shell for FakeShell {
    fn run(&mut self, command: &str) -> String {
        self.0.borrow_mut().shell_calls.push(command.to_string());
        command.strip_prefix("echo ").unwrap_or_default().to_string()
    }
}

struct FakeResponder(SharedScript);

impl Responder for FakeResponder {
    fn reply(&mut self, text: &str) -> String {
        self.0.borrow_mut().replies.push(text.to_string());
        REPLY.to_string()
    }
}

pub fn capabilities(script: &SharedScript) -> Capabilities {
    Capabilities {
        terminal: Box::new(FakeTerminal(Rc::clone(script))),
        voice: Box::new(FakeVoice(Rc::clone(script))),
        log: Box::new(FakeLog(Rc::clone(script))),
        shell: Box::new(FakeShell(Rc::clone(script))),
        responder: Box::new(FakeResponder(Rc::clone(script))),
    }
}

/// Fully registered session, online
pub fn session(initial: StateKind) -> (SessionContext, SharedScript) {
    session_with_connectivity(initial, Arc::new(AtomicBool::new(true)))
}

pub fn session_with_connectivity(
    initial: StateKind,
    connectivity: Arc<AtomicBool>,
) -> (SessionContext, SharedScript) {
    let script = SharedScript::default();
    let session = SessionContext::standard(initial, LANG, capabilities(&script), connectivity);
    (session, script)
}

/// Session in text mode with no global variables registered
pub fn bare_session() -> (SessionContext, SharedScript) {
    let script = SharedScript::default();
    let session = SessionContext::new(Rc::new(TextState), LANG, capabilities(&script));
    (session, script)
}

pub fn utterance(text: &str, lang: &str) -> Utterance {
    Utterance {
        text: text.to_string(),
        lang: lang.to_string(),
    }
}
