// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log record and severity levels.

use std::fmt;
use std::str::FromStr;

use jiff::Zoned;

use crate::Error;

/// A formatted log entry, ready to be encoded by a [`Layout`](crate::Layout).
#[derive(Clone, Debug)]
pub struct Record {
    /// The severity of this record.
    pub level: Level,
    /// The observed time.
    pub time: Zoned,
    /// The call site, formatted as `dir/file.rs:line`, if captured.
    pub caller: Option<String>,
    /// The message body.
    pub message: String,
    /// A captured stack trace, for [`Level::Stack`] and [`Level::Fatal`].
    pub stack: Option<String>,
}

/// An enum representing the available severity levels of the logger.
///
/// Levels are ordered from the most verbose to the most severe, so `Level::Trace < Level::Fatal`.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    /// Designates very low priority, often extremely verbose, information.
    Trace = 0,
    /// Designates lower priority information.
    Debug = 1,
    /// Designates useful information.
    Info = 2,
    /// Designates hazardous situations.
    Warn = 3,
    /// Designates very serious errors.
    Error = 4,
    /// Designates errors reported along with a stack trace.
    Stack = 5,
    /// Designates unrecoverable errors. Never filtered out.
    Fatal = 6,
}

impl Level {
    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "Trace",
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Warn => "Warn",
            Level::Error => "Error",
            Level::Stack => "Stack",
            Level::Fatal => "Fatal",
        }
    }

    pub(crate) fn from_u8(n: u8) -> Option<Level> {
        match n {
            0 => Some(Level::Trace),
            1 => Some(Level::Debug),
            2 => Some(Level::Info),
            3 => Some(Level::Warn),
            4 => Some(Level::Error),
            5 => Some(Level::Stack),
            6 => Some(Level::Fatal),
            _ => None,
        }
    }

    /// Iterate over all levels, from the most verbose to the most severe.
    pub fn iter() -> impl Iterator<Item = Level> {
        (0..=Level::Fatal as u8).filter_map(Level::from_u8)
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Parse a level name, ignoring ASCII case. The empty string parses as [`Level::Info`].
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        if s.is_empty() {
            return Ok(Level::Info);
        }

        Level::iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::new(format!("unrecognized level: {s:?}")))
    }
}
