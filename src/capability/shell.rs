//! Shell executor backed by `sh -c`

use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::Shell;

/// Runs commands through the system shell and captures their output
#[derive(Debug, Default)]
pub struct SystemShell;

impl SystemShell {
    pub fn new() -> Self {
        Self
    }
}

impl Shell for SystemShell {
    fn run(&mut self, command: &str) -> String {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(command, "running shell command");

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                warn!(?e, command, "failed to spawn shell");
                return format!("Failed to run command: {}", e);
            }
        };

        // stdout then stderr, like a terminal would show them
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let trimmed_len = text.trim_end_matches('\n').len();
        text.truncate(trimmed_len);
        text
    }
}
