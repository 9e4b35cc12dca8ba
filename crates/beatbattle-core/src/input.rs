//! Timestamped press/release input and scripted input files.
//!
//! Script format, one transition per line:
//!
//! ```text
//! # comment
//! press 0.00
//! release 1.00   # trailing comments are fine too
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[strum(serialize = "press")]
    Press,
    #[strum(serialize = "release")]
    Release,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name)
    }
}

/// Input transition stamped on the music clock's judgement timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputKind,
    pub time: f64,
}

impl InputEvent {
    pub fn press(time: f64) -> Self {
        Self {
            kind: InputKind::Press,
            time,
        }
    }

    pub fn release(time: f64) -> Self {
        Self {
            kind: InputKind::Release,
            time,
        }
    }
}

/// Pre-recorded input, replayed in time order
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    events: Vec<InputEvent>,
    cursor: usize,
}

impl InputScript {
    pub fn new(mut events: Vec<InputEvent>) -> Self {
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { events, cursor: 0 }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut events = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let mut parts = text.split_whitespace();
            let (Some(kind), Some(time), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(Error::InputParse {
                    line,
                    message: format!("expected '<press|release> <seconds>', got '{text}'"),
                });
            };

            let kind = match kind.to_ascii_lowercase().as_str() {
                "press" => InputKind::Press,
                "release" => InputKind::Release,
                other => {
                    return Err(Error::InputParse {
                        line,
                        message: format!("unknown input kind '{other}'"),
                    });
                }
            };
            let time: f64 = time.parse().map_err(|_| Error::InputParse {
                line,
                message: format!("invalid time '{time}'"),
            })?;
            if !time.is_finite() {
                return Err(Error::InputParse {
                    line,
                    message: format!("time must be finite (got {time})"),
                });
            }

            events.push(InputEvent { kind, time });
        }

        Ok(Self::new(events))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events not yet handed out
    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    /// Take every remaining event stamped at or before `now`
    pub fn next_batch(&mut self, now: f64) -> &[InputEvent] {
        let start = self.cursor;
        while self
            .events
            .get(self.cursor)
            .is_some_and(|event| event.time <= now)
        {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
