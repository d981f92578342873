//! Built-in operations

use std::sync::LazyLock;

use chrono::{Local, Timelike};
use regex::Regex;

use super::{Operation, OperationEntry};
use crate::session::SessionContext;

pub const GREETING: OperationEntry = OperationEntry::new("greeting", Greeting::matches, boxed::<Greeting>);

pub const CURRENT_TIME: OperationEntry =
    OperationEntry::new("current_time", CurrentTime::matches, boxed::<CurrentTime>);

pub const CURRENT_DATE: OperationEntry =
    OperationEntry::new("current_date", CurrentDate::matches, boxed::<CurrentDate>);

pub const LIST_MODES: OperationEntry =
    OperationEntry::new("list_modes", ListModes::matches, boxed::<ListModes>).needs_session_context();

pub const LIST_OPERATIONS: OperationEntry =
    OperationEntry::new("list_operations", ListOperations::matches, boxed::<ListOperations>)
        .needs_session_context();

pub const REPEAT: OperationEntry =
    OperationEntry::new("repeat", Repeat::matches, boxed::<Repeat>).needs_input_extraction();

pub const SHELL_COMMAND: OperationEntry =
    OperationEntry::new("shell_command", ShellCommand::matches, boxed::<ShellCommand>)
        .needs_input_extraction()
        .needs_session_context();

/// Raw command-line passthrough. Only dispatched by command mode.
pub const SHELL_LINE: OperationEntry = OperationEntry::new("shell_line", never, boxed::<ShellLine>)
    .needs_input_extraction()
    .needs_session_context();

pub const OPEN_WEBSITE: OperationEntry =
    OperationEntry::new("open_website", OpenWebsite::matches, boxed::<OpenWebsite>)
        .needs_internet()
        .needs_input_extraction()
        .needs_session_context();

pub const FALLBACK: OperationEntry = OperationEntry::new("fallback", Fallback::matches, boxed::<Fallback>)
    .needs_input_extraction()
    .needs_session_context();

/// Shutdown acknowledgement. Only dispatched by the stop state.
pub const STOPPED: OperationEntry = OperationEntry::new("stopped", never, boxed::<Stopped>);

/// Scan registry, in priority order
pub fn registry() -> Vec<OperationEntry> {
    vec![
        GREETING,
        CURRENT_TIME,
        CURRENT_DATE,
        LIST_MODES,
        LIST_OPERATIONS,
        REPEAT,
        SHELL_COMMAND,
        OPEN_WEBSITE,
        FALLBACK,
    ]
}

fn boxed<T: Operation + Default + 'static>() -> Box<dyn Operation> {
    Box::new(T::default())
}

fn never(_input: &str) -> bool {
    false
}

/// Lowercased input with surrounding whitespace and trailing punctuation
/// removed
fn normalize(input: &str) -> String {
    input
        .trim()
        .trim_end_matches(['?', '!', '.'])
        .trim_end()
        .to_lowercase()
}

static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:hi|hello|hey|good (?:morning|afternoon|evening))(?: emma)?$").unwrap()
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:time|what time is it|what's the time|what is the time|tell me the time)$").unwrap()
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:date|what is the date|what's the date|what day is it|what is today's date)$").unwrap()
});

static REPEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*(?:repeat after me|say)\s+(?P<text>.+?)\s*$").unwrap());

static SHELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*\$\s+(?P<command>\S.*?)\s*$").unwrap());

static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*open\s+(?:website\s+|site\s+)?(?P<target>(?:https?://)?[\w-]+(?:\.[\w-]+)*\.[a-z]{2,}(?:/[^\s']*)?)\s*$",
    )
    .unwrap()
});

/// Time-of-day greeting
#[derive(Debug, Default)]
pub struct Greeting;

impl Greeting {
    fn matches(input: &str) -> bool {
        GREETING_RE.is_match(&normalize(input))
    }
}

impl Operation for Greeting {
    fn execute(&mut self) -> String {
        let salutation = match Local::now().hour() {
            5..=11 => "Good morning",
            12..=17 => "Good afternoon",
            _ => "Good evening",
        };
        format!("{}! How can I help you?", salutation)
    }
}

#[derive(Debug, Default)]
pub struct CurrentTime;

impl CurrentTime {
    fn matches(input: &str) -> bool {
        TIME_RE.is_match(&normalize(input))
    }
}

impl Operation for CurrentTime {
    fn execute(&mut self) -> String {
        format!("It's {}.", Local::now().format("%H:%M"))
    }
}

#[derive(Debug, Default)]
pub struct CurrentDate;

impl CurrentDate {
    fn matches(input: &str) -> bool {
        DATE_RE.is_match(&normalize(input))
    }
}

impl Operation for CurrentDate {
    fn execute(&mut self) -> String {
        format!("Today is {}.", Local::now().format("%A, %B %-d, %Y"))
    }
}

/// Lists the registered interaction modes
#[derive(Debug, Default)]
pub struct ListModes;

impl ListModes {
    fn matches(input: &str) -> bool {
        matches!(
            normalize(input).as_str(),
            "list modes" | "what modes do you have" | "which modes are there" | "modes"
        )
    }
}

impl Operation for ListModes {
    fn execute_with(&mut self, session: &mut SessionContext) -> String {
        match session.states() {
            Ok(states) => format!("Available modes: {}", states.names().join(", ")),
            Err(e) => format!("Could not list modes: {}", e),
        }
    }
}

/// Lists the registered operations
#[derive(Debug, Default)]
pub struct ListOperations;

impl ListOperations {
    fn matches(input: &str) -> bool {
        matches!(
            normalize(input).as_str(),
            "list operations" | "what can you do" | "help" | "operations"
        )
    }
}

impl Operation for ListOperations {
    fn execute_with(&mut self, session: &mut SessionContext) -> String {
        match session.operations() {
            Ok(registry) => {
                let fallback = registry.fallback().name;
                let names: Vec<&str> = registry
                    .names()
                    .into_iter()
                    .filter(|name| *name != fallback)
                    .collect();
                format!("I can do: {}", names.join(", "))
            }
            Err(e) => format!("Could not list operations: {}", e),
        }
    }
}

/// `repeat after me <text>` / `say <text>`
#[derive(Debug, Default)]
pub struct Repeat {
    text: String,
}

impl Repeat {
    fn matches(input: &str) -> bool {
        REPEAT_RE.is_match(input)
    }
}

impl Operation for Repeat {
    fn extract_parameters(&mut self, input: &str) {
        self.text = REPEAT_RE
            .captures(input)
            .and_then(|caps| caps.name("text"))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
    }

    fn execute(&mut self) -> String {
        if self.text.is_empty() {
            return "What should I repeat?".to_string();
        }
        self.text.clone()
    }
}

/// Runs a `$ <command>` line through the shell capability
#[derive(Debug, Default)]
pub struct ShellCommand {
    command: String,
}

impl ShellCommand {
    fn matches(input: &str) -> bool {
        SHELL_RE.is_match(input)
    }
}

impl Operation for ShellCommand {
    fn extract_parameters(&mut self, input: &str) {
        self.command = SHELL_RE
            .captures(input)
            .map(|caps| caps["command"].to_string())
            .unwrap_or_default();
    }

    fn execute_with(&mut self, session: &mut SessionContext) -> String {
        run_command(session, &self.command)
    }
}

/// Hands the whole line to the shell, `$` and all
#[derive(Debug, Default)]
pub struct ShellLine {
    command: String,
}

impl Operation for ShellLine {
    fn extract_parameters(&mut self, input: &str) {
        self.command = input.trim().to_string();
    }

    fn execute_with(&mut self, session: &mut SessionContext) -> String {
        run_command(session, &self.command)
    }
}

fn run_command(session: &mut SessionContext, command: &str) -> String {
    if command.is_empty() {
        return "No command given.".to_string();
    }
    session.run_shell(command)
}

/// Opens a website in the default browser
#[derive(Debug, Default)]
pub struct OpenWebsite {
    url: Option<String>,
}

impl OpenWebsite {
    fn matches(input: &str) -> bool {
        WEBSITE_RE.is_match(input)
    }

    fn opener() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl Operation for OpenWebsite {
    fn extract_parameters(&mut self, input: &str) {
        self.url = WEBSITE_RE
            .captures(input)
            .and_then(|caps| caps.name("target"))
            .map(|m| {
                let target = m.as_str();
                let lower = target.to_ascii_lowercase();
                if lower.starts_with("http://") || lower.starts_with("https://") {
                    target.to_string()
                } else {
                    format!("https://{}", target)
                }
            });
    }

    fn execute_with(&mut self, session: &mut SessionContext) -> String {
        let Some(url) = self.url.as_deref() else {
            return "I couldn't find a website address in that.".to_string();
        };

        let output = session.run_shell(&format!("{} '{}'", Self::opener(), url));
        if output.trim().is_empty() {
            format!("Opening {}", url)
        } else {
            format!("Opening {}\n{}", url, output)
        }
    }
}

/// Canned conversational reply for input nothing else claimed
#[derive(Debug, Default)]
pub struct Fallback {
    text: String,
}

impl Fallback {
    fn matches(_input: &str) -> bool {
        true
    }
}

impl Operation for Fallback {
    fn extract_parameters(&mut self, input: &str) {
        self.text = input.trim().to_string();
    }

    fn execute_with(&mut self, session: &mut SessionContext) -> String {
        session.respond(&self.text)
    }
}

/// Acknowledges that the assistant is shutting down
#[derive(Debug, Default)]
pub struct Stopped;

impl Operation for Stopped {
    fn execute(&mut self) -> String {
        "Shutting down. Goodbye!".to_string()
    }
}
