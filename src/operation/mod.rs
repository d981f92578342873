//! Operations: units of work selected by matching the turn input
//!
//! Each registry entry carries a predicate, a constructor and three
//! capability flags. Classification scans entries in registration order and
//! the first match wins; the fallback entry is never scanned and is returned
//! when nothing else matches.

pub mod builtin;

use tracing::{debug, info};

use crate::session::{SessionContext, SessionError};

/// Output for internet-bound operations while offline
pub const NO_INTERNET_MESSAGE: &str = "This operation requires an internet connection. \
If you would like to do this operation, please connect to the internet.";

/// A unit of work. A fresh instance is built for every invocation.
pub trait Operation {
    /// Parse the raw turn input into the operation's own fields.
    ///
    /// Only called when the entry sets `needs_input_extraction`.
    fn extract_parameters(&mut self, _input: &str) {}

    /// Run without session access
    fn execute(&mut self) -> String {
        String::new()
    }

    /// Run with session access. Only called when the entry sets
    /// `needs_session_context`.
    fn execute_with(&mut self, _session: &mut SessionContext) -> String {
        self.execute()
    }
}

/// Registration record for one operation
#[derive(Clone, Copy)]
pub struct OperationEntry {
    pub name: &'static str,
    pub needs_internet: bool,
    pub needs_input_extraction: bool,
    pub needs_session_context: bool,
    matcher: fn(&str) -> bool,
    build: fn() -> Box<dyn Operation>,
}

impl OperationEntry {
    /// Entry with every capability flag off
    pub const fn new(
        name: &'static str,
        matcher: fn(&str) -> bool,
        build: fn() -> Box<dyn Operation>,
    ) -> Self {
        Self {
            name,
            needs_internet: false,
            needs_input_extraction: false,
            needs_session_context: false,
            matcher,
            build,
        }
    }

    pub const fn needs_internet(mut self) -> Self {
        self.needs_internet = true;
        self
    }

    pub const fn needs_input_extraction(mut self) -> Self {
        self.needs_input_extraction = true;
        self
    }

    pub const fn needs_session_context(mut self) -> Self {
        self.needs_session_context = true;
        self
    }

    /// Does this operation claim `input`?
    pub fn matches(&self, input: &str) -> bool {
        (self.matcher)(input)
    }

    pub fn instantiate(&self) -> Box<dyn Operation> {
        (self.build)()
    }
}

impl std::fmt::Debug for OperationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationEntry")
            .field("name", &self.name)
            .field("needs_internet", &self.needs_internet)
            .field("needs_input_extraction", &self.needs_input_extraction)
            .field("needs_session_context", &self.needs_session_context)
            .finish()
    }
}

/// Ordered operation entries plus the fallback sentinel
#[derive(Debug)]
pub struct OperationRegistry {
    entries: Vec<OperationEntry>,
    fallback: OperationEntry,
}

impl OperationRegistry {
    /// `entries` may include `fallback`; it is skipped during classification
    /// either way.
    pub fn new(entries: Vec<OperationEntry>, fallback: OperationEntry) -> Self {
        Self { entries, fallback }
    }

    /// Built-in operations in priority order
    pub fn builtin() -> Self {
        Self::new(builtin::registry(), builtin::FALLBACK)
    }

    /// First non-fallback entry whose predicate matches, else the fallback
    pub fn classify(&self, input: &str) -> OperationEntry {
        self.entries
            .iter()
            .filter(|entry| entry.name != self.fallback.name)
            .find(|entry| entry.matches(input))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> OperationEntry {
        self.fallback
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }
}

/// Run `entry` against the current turn input and store its output.
///
/// Internet-bound operations are never built while the connectivity flag is
/// down; the output becomes [`NO_INTERNET_MESSAGE`] instead.
pub fn perform(entry: OperationEntry, session: &mut SessionContext) -> Result<(), SessionError> {
    if entry.needs_internet && !session.internet_connected()? {
        info!(operation = entry.name, "operation skipped: no internet connection");
        session.output.text = NO_INTERNET_MESSAGE.to_string();
        return Ok(());
    }

    let mut operation = entry.instantiate();

    if entry.needs_input_extraction {
        let input = session.input.text.clone();
        operation.extract_parameters(&input);
    }

    let output = if entry.needs_session_context {
        operation.execute_with(session)
    } else {
        operation.execute()
    };

    debug!(operation = entry.name, output_len = output.len(), "operation executed");
    session.output.text = output;
    Ok(())
}
