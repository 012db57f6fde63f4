//! Key event sources for the terminal UI.
//!
//! The UI loop is async and only ever sees a channel of [`Event`]s. A
//! blocking pump feeds that channel from an [`EventSource`]: the real
//! terminal in production, or a scripted source so tests and demos can drive
//! the UI without a tty.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Environment variable naming a script file to replay instead of reading the terminal.
pub const SCRIPT_ENV: &str = "USER_DIRECTORY_TUI_SCRIPT";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub trait EventSource: Send + 'static {
    /// Waits up to `timeout` for the next event. `Ok(None)` on timeout.
    fn next(&mut self, timeout: Duration) -> io::Result<Option<Event>>;

    /// Whether the source has nothing left to deliver.
    fn is_exhausted(&self) -> bool {
        false
    }

    fn is_scripted(&self) -> bool {
        false
    }
}

pub struct CrosstermEventSource;

impl EventSource for CrosstermEventSource {
    fn next(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read TUI script: {0}")]
    Read(#[from] io::Error),
    #[error("Unrecognized TUI script token at line {line}: {token}")]
    UnknownToken { line: usize, token: String },
}

/// Replays keys from a line-oriented script:
///   up|down|tab|backtab|enter|esc|backspace|delete|ctrl-c|ctrl-s|<single char>|type:<text>
/// Lines beginning with `#` and blank lines are skipped.
pub struct ScriptEventSource {
    events: Vec<Event>,
    cursor: usize,
}

impl ScriptEventSource {
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_script(&contents)
    }

    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let mut events = Vec::new();
        for (idx, raw) in script.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut push_key = |code: KeyCode, modifiers: KeyModifiers| {
                events.push(Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind: KeyEventKind::Press,
                    state: KeyEventState::NONE,
                }));
            };

            match line {
                "up" => push_key(KeyCode::Up, KeyModifiers::NONE),
                "down" => push_key(KeyCode::Down, KeyModifiers::NONE),
                "tab" => push_key(KeyCode::Tab, KeyModifiers::NONE),
                "backtab" => push_key(KeyCode::BackTab, KeyModifiers::SHIFT),
                "enter" => push_key(KeyCode::Enter, KeyModifiers::NONE),
                "esc" => push_key(KeyCode::Esc, KeyModifiers::NONE),
                "backspace" => push_key(KeyCode::Backspace, KeyModifiers::NONE),
                "delete" => push_key(KeyCode::Delete, KeyModifiers::NONE),
                "ctrl-c" => push_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
                "ctrl-s" => push_key(KeyCode::Char('s'), KeyModifiers::CONTROL),
                _ => {
                    if let Some(text) = raw.trim_start().strip_prefix("type:") {
                        for ch in text.chars() {
                            push_key(KeyCode::Char(ch), KeyModifiers::NONE);
                        }
                    } else {
                        let mut chars = line.chars();
                        match (chars.next(), chars.next()) {
                            (Some(ch), None) => push_key(KeyCode::Char(ch), KeyModifiers::NONE),
                            _ => {
                                return Err(ScriptError::UnknownToken {
                                    line: idx + 1,
                                    token: line.to_string(),
                                })
                            }
                        }
                    }
                }
            }
        }

        Ok(Self { events, cursor: 0 })
    }
}

impl EventSource for ScriptEventSource {
    fn next(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
        let event = self.events.get(self.cursor).cloned();
        if event.is_some() {
            self.cursor += 1;
        }
        Ok(event)
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }

    fn is_scripted(&self) -> bool {
        true
    }
}

/// Picks the scripted source when [`SCRIPT_ENV`] is set, else the terminal.
pub fn event_source_from_env() -> Result<Box<dyn EventSource>, ScriptError> {
    match std::env::var_os(SCRIPT_ENV) {
        Some(path) => Ok(Box::new(ScriptEventSource::from_path(Path::new(&path))?)),
        None => Ok(Box::new(CrosstermEventSource)),
    }
}

/// Forwards events from `source` into `sender` on a blocking thread.
///
/// Stops when the source is exhausted or fails, or once the receiving side
/// is gone. Dropping `sender` on exit tells the UI that input has ended.
pub fn pump_events(mut source: Box<dyn EventSource>, sender: mpsc::Sender<Event>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !sender.is_closed() && !source.is_exhausted() {
            match source.next(POLL_INTERVAL) {
                Ok(Some(event)) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Reading terminal events failed");
                    break;
                }
            }
        }
        debug!("Event pump stopped");
    })
}
