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

//! An asynchronous, crash-safe rolling file writer.
//!
//! Records are submitted to a bounded queue and written by a dedicated thread, which batches
//! whatever is queued, opens or rotates the destination file as needed and writes the batch.
//! [`RollingFile::flush`](crate::Append::flush) blocks until everything submitted before it has
//! been written and synced to disk.
//!
//! # Examples
//!
//! ```
//! use stratalog::Append;
//! use stratalog::append::RollingFile;
//! use stratalog::append::rolling_file::WriterConfig;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let writer = RollingFile::new(WriterConfig::new("my_app").with_base_dir(dir.path())).unwrap();
//!
//! writer.append(b"hello\n").unwrap();
//! writer.flush().unwrap();
//! ```

pub use self::append::RollingFile;
pub use self::config::DEFAULT_CHECK_FULL_INTERVAL;
pub use self::config::DEFAULT_MAX_FILE_SIZE;
pub use self::config::DEFAULT_PERM;
pub use self::config::DEFAULT_QUEUE_CAPACITY;
pub use self::config::WriterConfig;
pub use self::rotation::DailyRotation;
pub use self::rotation::NoRotation;
pub use self::rotation::RotationPolicy;

mod append;
mod clock;
mod config;
mod rolling;
mod rotation;
mod worker;

type FlushReply = oneshot::Sender<Result<(), crate::Error>>;
