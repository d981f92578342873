//! The five interaction modes

use colored::Colorize;

use super::{State, StateKind, TurnError};
use crate::operation::{builtin, OperationEntry};
use crate::session::SessionContext;

const KEYBOARD_PROMPT: &str = "You: ";

const TEXT_PHRASES: &[&str] = &[
    "text state mode",
    "go to text state mode",
    "go to text state",
    "text state",
    "text mode",
];

const HALF_AUDIO_PHRASES: &[&str] = &[
    "half audio state",
    "go to half audio state",
    "half audio mode",
    "go to half audio mode",
];

const AUDIO_PHRASES: &[&str] = &[
    "audio mode",
    "go to audio mode",
    "audio state",
    "go to audio state",
];

const CMD_PHRASES: &[&str] = &[
    "cmd mode",
    "command line mode",
    "go to cmd mode",
    "go cmd",
    "go command line",
    "cmd state",
    "command line state",
    "go to cmd state",
    "go to command line state",
];

const STOP_PHRASES: &[&str] = &["stop yourself", "stop", "kill yourself", "stop mode", "stop state"];

fn read_keyboard(session: &mut SessionContext) -> Result<(), TurnError> {
    session.input.text = session.read_line(KEYBOARD_PROMPT)?;
    Ok(())
}

fn read_microphone(session: &mut SessionContext) -> Result<(), TurnError> {
    let heard = session.listen()?;
    session.input.text = heard.text;
    session.input.lang = heard.lang;
    Ok(())
}

fn scan_operations(session: &SessionContext, input: &str) -> Result<OperationEntry, TurnError> {
    Ok(session.operations()?.classify(input))
}

fn print_and_speak(session: &mut SessionContext) {
    session.print_output();
    session.say_output();
}

/// Keyboard in, screen out. The default mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextState;

impl State for TextState {
    fn kind(&self) -> StateKind {
        StateKind::Text
    }

    fn acquire_input(&self, session: &mut SessionContext) -> Result<(), TurnError> {
        read_keyboard(session)
    }

    fn classify(&self, session: &SessionContext, input: &str) -> Result<OperationEntry, TurnError> {
        scan_operations(session, input)
    }

    fn enters_on(&self, input: &str) -> bool {
        TEXT_PHRASES.contains(&input)
    }
}

/// Keyboard in, screen and speaker out
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfAudioState;

impl State for HalfAudioState {
    fn kind(&self) -> StateKind {
        StateKind::HalfAudio
    }

    fn acquire_input(&self, session: &mut SessionContext) -> Result<(), TurnError> {
        read_keyboard(session)
    }

    fn classify(&self, session: &SessionContext, input: &str) -> Result<OperationEntry, TurnError> {
        scan_operations(session, input)
    }

    fn enters_on(&self, input: &str) -> bool {
        HALF_AUDIO_PHRASES.contains(&input)
    }

    fn deliver_output(&self, session: &mut SessionContext) {
        print_and_speak(session);
    }
}

/// Microphone in, screen and speaker out
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioState;

impl State for AudioState {
    fn kind(&self) -> StateKind {
        StateKind::Audio
    }

    fn acquire_input(&self, session: &mut SessionContext) -> Result<(), TurnError> {
        read_microphone(session)
    }

    fn classify(&self, session: &SessionContext, input: &str) -> Result<OperationEntry, TurnError> {
        scan_operations(session, input)
    }

    fn enters_on(&self, input: &str) -> bool {
        AUDIO_PHRASES.contains(&input)
    }

    fn deliver_output(&self, session: &mut SessionContext) {
        print_and_speak(session);
    }
}

/// Every line is a shell command. Always text, never voice.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmdState;

impl CmdState {
    /// `$PS1` if set, otherwise a colored `user@host:cwd$ `
    fn prompt(session: &mut SessionContext) -> String {
        if let Ok(ps1) = std::env::var("PS1") {
            return ps1;
        }

        let user = session.run_shell("whoami");
        let host = session.run_shell("hostname");
        let cwd = std::env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();

        format!(
            "{}{}$ ",
            format!("{}@{}:", user, host).bright_green(),
            cwd.bright_blue()
        )
    }
}

impl State for CmdState {
    fn kind(&self) -> StateKind {
        StateKind::Cmd
    }

    fn acquire_input(&self, session: &mut SessionContext) -> Result<(), TurnError> {
        let prompt = Self::prompt(session);
        session.input.text = session.read_line(&prompt)?;
        Ok(())
    }

    fn classify(&self, _session: &SessionContext, _input: &str) -> Result<OperationEntry, TurnError> {
        Ok(builtin::SHELL_LINE)
    }

    fn enters_on(&self, input: &str) -> bool {
        CMD_PHRASES.contains(&input)
    }
}

/// Acknowledges shutdown. The driver loop decides when to actually exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopState;

impl State for StopState {
    fn kind(&self) -> StateKind {
        StateKind::Stop
    }

    /// Listen if we came here from audio mode, otherwise read the keyboard
    fn acquire_input(&self, session: &mut SessionContext) -> Result<(), TurnError> {
        if session.previous_state_name == StateKind::Audio.name() {
            read_microphone(session)
        } else {
            read_keyboard(session)
        }
    }

    fn classify(&self, _session: &SessionContext, _input: &str) -> Result<OperationEntry, TurnError> {
        Ok(builtin::STOPPED)
    }

    fn enters_on(&self, input: &str) -> bool {
        STOP_PHRASES.contains(&input)
    }
}
