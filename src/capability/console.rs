//! Console stand-ins for the keyboard and the voice channel

use std::io::{self, BufRead, Write};

use super::{Terminal, Utterance, Voice};

/// Reads lines from stdin and writes to stdout
#[derive(Debug, Default)]
pub struct StdTerminal;

impl StdTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Terminal for StdTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        read_prompted_line(prompt)
    }

    fn write_line(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Voice channel that prints what would be spoken and reads what was "heard"
/// from stdin.
///
/// Real speech synthesis and recognition plug in by implementing [`Voice`].
#[derive(Debug)]
pub struct ConsoleVoice {
    lang: String,
}

impl ConsoleVoice {
    /// Create a console voice that tags everything it hears with `lang`
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

impl Voice for ConsoleVoice {
    fn say(&mut self, text: &str) {
        println!("(speaking) {}", text);
    }

    fn listen(&mut self) -> io::Result<Utterance> {
        let text = read_prompted_line("(listening) ")?;
        Ok(Utterance {
            text,
            lang: self.lang.clone(),
        })
    }
}

fn read_prompted_line(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }

    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(line)
}
