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

//! Stratalog is a leveled logging library built around an asynchronous, crash-safe rolling file
//! writer.
//!
//! # Overview
//!
//! A [`Logger`] gates records by [`Level`](record::Level), encodes them with a [`Layout`] and
//! submits the bytes to a writer backend. The default backend,
//! [`RollingFile`](append::RollingFile), queues records without blocking the caller, writes them
//! from a dedicated thread, rotates files by day and by size, and offers a
//! [`flush`](Logger::flush) barrier that returns once everything logged before it is on disk.
//!
//! Backends are looked up by name in a [`Registry`](registry::Registry), so applications can plug
//! in their own.
//!
//! # Examples
//!
//! ```
//! use stratalog::Config;
//! use stratalog::append::rolling_file::WriterConfig;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let logger = Config::production("server")
//!     .with_writer_config(WriterConfig::new("server").with_base_dir(dir.path()))
//!     .build()
//!     .unwrap();
//!
//! stratalog::info!(logger, "listening on {}", "0.0.0.0:8080");
//! stratalog::error!(logger, "upstream {} unreachable", "db-1");
//! logger.flush().unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod buffer;
pub mod filter;
pub mod layout;
pub mod record;
pub mod registry;
pub mod trap;

#[cfg(feature = "bridge-log")]
mod bridge;
mod error;
mod logger;
mod macros;

pub use append::Append;
pub use error::Error;
pub use filter::Filter;
pub use layout::Layout;
pub use logger::Config;
pub use logger::Logger;
pub use logger::MAX_MESSAGE_CHARS;
pub use trap::Trap;
