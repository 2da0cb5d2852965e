use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

/// Commands read from the terminal.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlCmd {
    Quit,
    PlayPause,
    Stop,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    CycleRepeat,
    Shuffle,
    /// Flip the liked flag of the active track.
    ToggleLike,
    Seek(Duration),
    /// Zero-based position in the library listing.
    Select(usize),
}

/// Parse one input line. Unknown input yields `None`.
pub fn parse_command(line: &str) -> Option<ControlCmd> {
    let line = line.trim();
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, Some(arg.trim())),
        None => (line, None),
    };

    let cmd = match (word, arg) {
        ("q" | "quit", None) => ControlCmd::Quit,
        ("p" | "play", None) => ControlCmd::PlayPause,
        ("s" | "stop", None) => ControlCmd::Stop,
        ("n" | "next", None) => ControlCmd::Next,
        ("b" | "prev", None) => ControlCmd::Prev,
        ("+", None) => ControlCmd::VolumeUp,
        ("-", None) => ControlCmd::VolumeDown,
        ("r" | "repeat", None) => ControlCmd::CycleRepeat,
        ("z" | "shuffle", None) => ControlCmd::Shuffle,
        ("l" | "like", None) => ControlCmd::ToggleLike,
        ("f" | "seek", Some(secs)) => {
            let secs: f64 = secs.parse().ok()?;
            if !secs.is_finite() || secs < 0.0 {
                return None;
            }
            ControlCmd::Seek(Duration::from_secs_f64(secs))
        }
        (number, None) => {
            // listing is 1-based
            let n: usize = number.parse().ok()?;
            ControlCmd::Select(n.checked_sub(1)?)
        }
        _ => return None,
    };
    Some(cmd)
}

/// Read commands from stdin on a background thread. End of input quits.
pub fn spawn_stdin(tx: Sender<ControlCmd>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(cmd) => {
                    if tx.send(cmd).is_err() {
                        return;
                    }
                }
                None => debug!(input = %line, "unrecognised command"),
            }
        }
        let _ = tx.send(ControlCmd::Quit);
    });
}
