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

use std::backtrace::Backtrace;
use std::fmt;
use std::io::Write;
use std::panic::Location;

use jiff::Zoned;

use crate::Append;
use crate::Error;
use crate::Filter;
use crate::Layout;
use crate::append::Stdout;
use crate::buffer::BufferPool;
use crate::filter::AtomicLevel;
use crate::record::Level;
use crate::record::Record;

/// Messages longer than this many characters are truncated before being written.
pub const MAX_MESSAGE_CHARS: usize = 15000;

const TRUNCATED_MARKER: &str = "...";

/// A logger formatting records and submitting them to a writer backend.
///
/// Build one from a [`Config`](crate::Config). Each severity has a method taking pre-formatted
/// arguments, and a macro of the same name taking a format string:
///
/// ```
/// use stratalog::Config;
/// use stratalog::record::Level;
///
/// let logger = Config::new()
///     .with_level(Level::Debug)
///     .with_writer("stderr")
///     .build()
///     .unwrap();
///
/// stratalog::info!(logger, "listening on {}", 8080);
/// logger.warn(format_args!("disk usage at {}%", 91));
/// logger.flush().unwrap();
/// ```
#[derive(Debug)]
pub struct Logger {
    level: AtomicLevel,
    writer: Box<dyn Append>,
    layout: Box<dyn Layout>,
    echo: Option<Box<dyn Append>>,
    disable_caller: bool,
    buffers: BufferPool,
}

impl Logger {
    pub(crate) fn new(
        level: AtomicLevel,
        writer: Box<dyn Append>,
        layout: Box<dyn Layout>,
        development: bool,
        disable_caller: bool,
    ) -> Self {
        Self {
            level,
            writer,
            layout,
            echo: development.then(|| Box::new(Stdout::default()) as Box<dyn Append>),
            disable_caller,
            buffers: BufferPool::default(),
        }
    }

    /// Whether records of `level` pass the level gate.
    pub fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    /// The current minimum level.
    pub fn level(&self) -> Level {
        self.level.level()
    }

    /// Change the minimum level; [`Level::Fatal`] records are always written.
    pub fn set_level(&self, level: Level) {
        self.level.set_level(level);
    }

    /// Log a record at `level`, attributed to the caller of this method.
    #[track_caller]
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let caller = if self.disable_caller {
            None
        } else {
            let location = Location::caller();
            Some(format!(
                "{}:{}",
                trimmed_path(location.file()),
                location.line()
            ))
        };
        self.log_record(level, caller, args);
    }

    /// Log at [`Level::Trace`].
    #[track_caller]
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args);
    }

    /// Log at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    /// Log at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    /// Log at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    /// Log at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    /// Log at [`Level::Stack`], with a stack trace of the calling thread.
    #[track_caller]
    pub fn stack(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Stack, args);
    }

    /// Log at [`Level::Fatal`], with a stack trace of the calling thread.
    ///
    /// The record bypasses the level gate. The process keeps running.
    #[track_caller]
    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Fatal, args);
    }

    /// Block until every record logged before this call is durably written.
    ///
    /// # Errors
    ///
    /// Return the first error the writer hit while flushing.
    pub fn flush(&self) -> Result<(), Error> {
        self.writer.flush()
    }

    /// Alias of [`Logger::flush`].
    pub fn sync(&self) -> Result<(), Error> {
        self.flush()
    }

    #[cfg(feature = "bridge-log")]
    pub(crate) fn disable_caller(&self) -> bool {
        self.disable_caller
    }

    pub(crate) fn log_record(
        &self,
        level: Level,
        caller: Option<String>,
        args: fmt::Arguments<'_>,
    ) {
        let record = Record {
            level,
            time: Zoned::now(),
            caller,
            message: truncate_message(fmt::format(args)),
            stack: (level >= Level::Stack).then(|| Backtrace::force_capture().to_string()),
        };

        let mut buf = self.buffers.get();
        let result = self
            .layout
            .format(&record, &mut buf)
            .and_then(|()| self.writer.append(&buf));
        if let Err(err) = result {
            handle_error(&mut std::io::stderr(), &record, err);
        }

        if let Some(echo) = &self.echo {
            if let Err(err) = echo.append(&buf) {
                handle_error(&mut std::io::stderr(), &record, err);
            }
        }
    }
}

fn truncate_message(mut message: String) -> String {
    if let Some((idx, _)) = message.char_indices().nth(MAX_MESSAGE_CHARS) {
        message.truncate(idx);
        message.push_str(TRUNCATED_MARKER);
    }
    message
}

/// Keep the last directory and the file name: `/src/server/main.rs` becomes `server/main.rs`.
pub(crate) fn trimmed_path(file: &str) -> &str {
    let is_separator = |c: char| c == '/' || c == '\\';
    let Some(idx) = file.rfind(is_separator) else {
        return file;
    };
    match file[..idx].rfind(is_separator) {
        Some(idx) => &file[idx + 1..],
        None => file,
    }
}

fn handle_error(out: &mut impl Write, record: &Record, error: Error) {
    let _ = write!(
        out,
        r###"
Error perform logging.
    Attempted to log: {message}
    Record: {record:?}
    Error: {error}
"###,
        message = record.message,
        record = record,
        error = error,
    );
}
