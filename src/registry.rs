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

//! A name to constructor mapping for writer backends.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Append;
use crate::Error;
use crate::append::RollingFile;
use crate::append::Stderr;
use crate::append::Stdout;
use crate::append::rolling_file::WriterConfig;

/// The name of the built-in [`RollingFile`] backend.
pub const FILE_WRITER: &str = "file";
/// The name of the built-in [`Stdout`] backend.
pub const STDOUT_WRITER: &str = "stdout";
/// The name of the built-in [`Stderr`] backend.
pub const STDERR_WRITER: &str = "stderr";

/// Build a writer backend from its configuration.
pub type Constructor = Arc<dyn Fn(WriterConfig) -> Result<Box<dyn Append>, Error> + Send + Sync>;

/// A registry of writer backends, looked up by name when a logger is built.
///
/// Cloning a registry yields a handle to the same mappings.
///
/// # Examples
///
/// ```
/// use stratalog::append::Stderr;
/// use stratalog::registry::Registry;
///
/// let registry = Registry::new();
/// registry
///     .register("console", |_| Ok(Box::new(Stderr::default())))
///     .unwrap();
/// assert!(registry.register("console", |_| Ok(Box::new(Stderr::default()))).is_err());
/// ```
#[derive(Clone)]
pub struct Registry {
    constructors: Arc<RwLock<HashMap<String, Constructor>>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constructors = self.constructors.read();
        let mut names = constructors.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Registry").field("names", &names).finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry holding the built-in `file`, `stdout` and `stderr` backends.
    pub fn new() -> Self {
        let mut constructors: HashMap<String, Constructor> = HashMap::new();
        constructors.insert(FILE_WRITER.to_string(), Arc::new(file_writer));
        constructors.insert(STDOUT_WRITER.to_string(), Arc::new(stdout_writer));
        constructors.insert(STDERR_WRITER.to_string(), Arc::new(stderr_writer));

        Self {
            constructors: Arc::new(RwLock::new(constructors)),
        }
    }

    /// Create a registry without any backend.
    pub fn empty() -> Self {
        Self {
            constructors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a writer backend under `name`.
    ///
    /// # Errors
    ///
    /// Return an error if `name` is empty or already registered.
    pub fn register<F>(&self, name: impl Into<String>, constructor: F) -> Result<(), Error>
    where
        F: Fn(WriterConfig) -> Result<Box<dyn Append>, Error> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::new("no writer name specified"));
        }

        let mut constructors = self.constructors.write();
        if constructors.contains_key(&name) {
            return Err(Error::new("writer already registered").with_context("name", name));
        }
        constructors.insert(name, Arc::new(constructor));
        Ok(())
    }

    /// Whether a backend is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.read().contains_key(name)
    }

    /// Build the writer backend registered under `name`.
    ///
    /// # Errors
    ///
    /// Return an error if `name` is empty or unknown, or if the constructor fails.
    pub fn build(&self, name: &str, config: WriterConfig) -> Result<Box<dyn Append>, Error> {
        if name.is_empty() {
            return Err(Error::new("no writer name specified"));
        }

        // release the lock before running the constructor
        let constructor = self
            .constructors
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::new("no writer registered").with_context("name", name))?;
        constructor(config)
    }
}

fn file_writer(config: WriterConfig) -> Result<Box<dyn Append>, Error> {
    Ok(Box::new(RollingFile::new(config)?))
}

fn stdout_writer(_: WriterConfig) -> Result<Box<dyn Append>, Error> {
    Ok(Box::new(Stdout::default()))
}

fn stderr_writer(_: WriterConfig) -> Result<Box<dyn Append>, Error> {
    Ok(Box::new(Stderr::default()))
}
