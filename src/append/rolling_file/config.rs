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

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::Trap;
use crate::append::rolling_file::clock::Clock;
use crate::append::rolling_file::rotation::DailyRotation;
use crate::append::rolling_file::rotation::RotationPolicy;
use crate::trap::DefaultTrap;

/// The default maximum size of a log file, 500 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;
/// The default interval between two size checks of the current file.
pub const DEFAULT_CHECK_FULL_INTERVAL: Duration = Duration::from_secs(5);
/// The default number of records the submission queue holds.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100_000;
/// The default permission bits of created files and directories.
pub const DEFAULT_PERM: u32 = 0o777;

/// The configuration of a [`RollingFile`](super::RollingFile) writer.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use stratalog::append::rolling_file::WriterConfig;
///
/// let config = WriterConfig::new("my_app")
///     .with_base_dir("logs")
///     .with_max_file_size(64 * 1024 * 1024)
///     .with_check_full_interval(Duration::from_secs(1));
/// assert_eq!(config.base_file_name(), "my_app");
/// ```
#[derive(Debug, Clone)]
pub struct WriterConfig {
    base_dir: PathBuf,
    base_file_name: String,
    max_file_size: u64,
    check_full_interval: Duration,
    rotation: Arc<dyn RotationPolicy>,
    queue_capacity: usize,
    perm: u32,
    thread_name: String,
    trap: Arc<dyn Trap>,
    pub(crate) clock: Clock,
}

impl WriterConfig {
    /// Create a config writing files named after `base_file_name`, with every other setting at
    /// its default.
    ///
    /// The base directory defaults to the directory of the running executable.
    pub fn new(base_file_name: impl Into<String>) -> Self {
        Self {
            base_dir: default_base_dir(),
            base_file_name: base_file_name.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            check_full_interval: DEFAULT_CHECK_FULL_INTERVAL,
            rotation: Arc::new(DailyRotation::default()),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            perm: DEFAULT_PERM,
            thread_name: "stratalog-rolling-file".to_string(),
            trap: Arc::new(DefaultTrap::default()),
            clock: Clock::DefaultClock,
        }
    }

    /// Set the directory log files are written to. Created on first write if missing.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Set the stem every log file name starts with.
    #[must_use]
    pub fn with_base_file_name(mut self, name: impl Into<String>) -> Self {
        self.base_file_name = name.into();
        self
    }

    /// Set the size in bytes at which the current file is rotated.
    ///
    /// A file is also rotated before a batch that would push it past the maximum, unless the
    /// file is still empty. A single batch larger than the maximum still lands in one file.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set how often the size of the current file is inspected.
    ///
    /// Between two checks the previous verdict is reused, so a file may grow past the maximum
    /// size by what is written within one interval. `Duration::ZERO` checks on every batch.
    #[must_use]
    pub fn with_check_full_interval(mut self, interval: Duration) -> Self {
        self.check_full_interval = interval;
        self
    }

    /// Set the policy deciding when a new file is opened and how it is named.
    ///
    /// Default to [`DailyRotation`].
    #[must_use]
    pub fn with_rotation(mut self, rotation: impl RotationPolicy) -> Self {
        self.rotation = Arc::new(rotation);
        self
    }

    /// Set the number of records the submission queue holds before dropping new ones.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the permission bits of created files and directories. Only applied on Unix.
    #[must_use]
    pub fn with_perm(mut self, perm: u32) -> Self {
        self.perm = perm;
        self
    }

    /// Set the name of the writer thread.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the trap receiving dropped-record diagnostics and fatal writer errors.
    ///
    /// Default to [`DefaultTrap`], which terminates the process on a fatal error.
    #[must_use]
    pub fn with_trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = Arc::from(trap.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The directory log files are written to.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The stem every log file name starts with.
    pub fn base_file_name(&self) -> &str {
        &self.base_file_name
    }

    /// The size in bytes at which the current file is rotated.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// How often the size of the current file is inspected.
    pub fn check_full_interval(&self) -> Duration {
        self.check_full_interval
    }

    /// The rotation policy.
    pub fn rotation(&self) -> &dyn RotationPolicy {
        self.rotation.as_ref()
    }

    /// The capacity of the submission queue.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// The permission bits of created files and directories.
    pub fn perm(&self) -> u32 {
        self.perm
    }

    /// The name of the writer thread.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// The trap of the writer.
    pub fn trap(&self) -> &Arc<dyn Trap> {
        &self.trap
    }
}

fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
