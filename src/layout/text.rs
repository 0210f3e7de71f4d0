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

use std::io::Write;

use crate::Error;
use crate::layout::Layout;
use crate::record::Level;
use crate::record::Record;

/// A layout that formats log records as a line of text.
///
/// Output format:
///
/// ```text
/// [Error] 2024-08-11 22:44:57.172 server/main.rs:51 Hello error!
/// [Warn] 2024-08-11 22:44:57.172 server/main.rs:52 Hello warn!
/// [Info] 2024-08-11 22:44:57.172 server/main.rs:53 Hello info!
/// ```
///
/// Records carrying a stack trace have it appended on the following lines.
///
/// By default, the level tag is colored when the `colored` feature is enabled. Call
/// [`TextLayout::no_color`] to always write plain tags.
///
/// # Examples
///
/// ```
/// use stratalog::layout::TextLayout;
///
/// let text_layout = TextLayout::default().no_color();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    no_color: bool,
}

impl TextLayout {
    /// Write the level tag without ANSI colors.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    fn write_level(&self, level: Level, buf: &mut Vec<u8>) -> std::io::Result<()> {
        #[cfg(feature = "colored")]
        if !self.no_color {
            use colored::Color;
            use colored::Colorize;

            let color = match level {
                Level::Trace | Level::Debug | Level::Info => Color::Green,
                Level::Warn => Color::Yellow,
                Level::Error | Level::Stack | Level::Fatal => Color::Red,
            };
            return write!(buf, "{}", format!("[{level}]").color(color));
        }

        write!(buf, "[{level}]")
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record, buf: &mut Vec<u8>) -> Result<(), Error> {
        let time = record.time.strftime("%Y-%m-%d %H:%M:%S.%3f");
        let caller = record.caller.as_deref().unwrap_or_default();

        self.write_level(record.level, buf)
            .and_then(|()| writeln!(buf, " {time} {caller} {}", record.message))
            .map_err(Error::from_io_error)?;

        if let Some(stack) = &record.stack {
            buf.extend_from_slice(stack.as_bytes());
            buf.push(b'\n');
        }

        Ok(())
    }
}
