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

//! Route records emitted through the [`log`] crate facade into a [`Logger`].

use std::io::Write;

use crate::Error;
use crate::Logger;
use crate::record::Level;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let level = Level::from(record.level());
        if !Logger::enabled(self, level) {
            return;
        }

        let caller = if self.disable_caller() {
            None
        } else {
            record.file().map(|file| match record.line() {
                Some(line) => format!("{}:{line}", crate::logger::trimmed_path(file)),
                None => crate::logger::trimmed_path(file).to_string(),
            })
        };
        self.log_record(level, caller, *record.args());
    }

    fn flush(&self) {
        if let Err(err) = Logger::flush(self) {
            handle_flush_error(&mut std::io::stderr(), err);
        }
    }
}

fn handle_flush_error(out: &mut impl Write, error: Error) {
    let _ = writeln!(out, "Error flushing log records: {error}");
}

impl Logger {
    /// Install this logger as the global [`log`] logger.
    ///
    /// The `log` max level is set to `Trace`; the logger's own level gate decides what is written.
    ///
    /// # Errors
    ///
    /// Return an error if a global logger has already been set.
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;
    use crate::Append;
    use crate::filter::AtomicLevel;
    use crate::layout::TextLayout;

    #[derive(Debug)]
    struct Unsynced;

    impl Append for Unsynced {
        fn append(&self, _: &[u8]) -> Result<(), Error> {
            Ok(())
        }

        fn flush(&self) -> Result<(), Error> {
            Err(Error::new("failed to sync log file").with_context("path", "/var/log/app.log"))
        }
    }

    #[test]
    fn test_flush_error_is_reported() {
        let mut out = Vec::new();
        handle_flush_error(&mut out, Error::new("failed to sync log file"));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error flushing log records: failed to sync log file\n"
        );
    }

    #[test]
    fn test_facade_flush_survives_writer_error() {
        let logger = Logger::new(
            AtomicLevel::new(),
            Box::new(Unsynced),
            Box::new(TextLayout::default().no_color()),
            false,
            false,
        );
        Log::flush(&logger);
        assert!(Logger::flush(&logger).is_err());
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(Level::from(log::Level::Trace), Level::Trace);
        assert_eq!(Level::from(log::Level::Debug), Level::Debug);
        assert_eq!(Level::from(log::Level::Info), Level::Info);
        assert_eq!(Level::from(log::Level::Warn), Level::Warn);
        assert_eq!(Level::from(log::Level::Error), Level::Error);
    }
}
