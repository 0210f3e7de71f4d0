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

use crate::Error;
use crate::Layout;
use crate::Logger;
use crate::append::rolling_file::WriterConfig;
use crate::filter::AtomicLevel;
use crate::layout::TextLayout;
use crate::record::Level;
use crate::registry::FILE_WRITER;
use crate::registry::Registry;

/// Configuration for building a [`Logger`].
///
/// # Examples
///
/// ```
/// use stratalog::Config;
/// use stratalog::append::rolling_file::WriterConfig;
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = Config::production("server")
///     .with_writer_config(WriterConfig::new("server").with_base_dir(dir.path()))
///     .build()
///     .unwrap();
///
/// stratalog::info!(logger, "started");
/// logger.flush().unwrap();
/// ```
#[must_use = "call `build` to construct a logger"]
#[derive(Debug)]
pub struct Config {
    level: Option<AtomicLevel>,
    development: bool,
    disable_caller: bool,
    writer: String,
    writer_config: WriterConfig,
    layout: Box<dyn Layout>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create an empty config. A level must be set before [`Config::build`] succeeds.
    pub fn new() -> Self {
        Config {
            level: None,
            development: false,
            disable_caller: false,
            writer: String::new(),
            writer_config: WriterConfig::new(""),
            layout: Box::new(TextLayout::default()),
        }
    }

    /// A config logging `Info` and above to rolling files named after `file_name`.
    pub fn production(file_name: impl Into<String>) -> Self {
        Config::new()
            .with_level(Level::Info)
            .with_writer(FILE_WRITER)
            .with_writer_config(WriterConfig::new(file_name))
    }

    /// A config logging everything to rolling files named after `file_name`, echoing each record
    /// to the standard output.
    pub fn development(file_name: impl Into<String>) -> Self {
        Config::production(file_name)
            .with_level(Level::Trace)
            .with_development(true)
    }

    /// Set the level gate. Pass an [`AtomicLevel`] to keep a handle for changing it later.
    pub fn with_level(mut self, level: impl Into<AtomicLevel>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Echo every record to the standard output as well.
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Leave the call site out of records.
    pub fn with_disable_caller(mut self, disable_caller: bool) -> Self {
        self.disable_caller = disable_caller;
        self
    }

    /// Set the registered name of the writer backend.
    pub fn with_writer(mut self, name: impl Into<String>) -> Self {
        self.writer = name.into();
        self
    }

    /// Set the config handed to the writer backend.
    pub fn with_writer_config(mut self, config: WriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Set the layout records are encoded with. Defaults to [`TextLayout`].
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Build the logger with the writer backends of [`Registry::new`].
    ///
    /// # Errors
    ///
    /// See [`Config::build_with`].
    pub fn build(self) -> Result<Logger, Error> {
        self.build_with(&Registry::new())
    }

    /// Build the logger, looking the writer backend up in `registry`.
    ///
    /// # Errors
    ///
    /// Return an error if no level is set, if the writer name is empty or unknown, or if the
    /// writer backend fails to start.
    pub fn build_with(self, registry: &Registry) -> Result<Logger, Error> {
        let Config {
            level,
            development,
            disable_caller,
            writer,
            writer_config,
            layout,
        } = self;

        let level = level.ok_or_else(|| Error::new("missing level"))?;
        let writer = registry.build(&writer, writer_config)?;
        Ok(Logger::new(level, writer, layout, development, disable_caller))
    }
}
