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

//! Filters deciding whether a log record should be formatted at all.

use std::fmt;

use crate::record::Level;

pub use self::level::AtomicLevel;

mod level;

/// A filter consulted before a log record is formatted.
pub trait Filter: fmt::Debug + Send + Sync + 'static {
    /// Whether records of the given level are enabled.
    fn enabled(&self, level: Level) -> bool;
}

impl Filter for Level {
    fn enabled(&self, level: Level) -> bool {
        level == Level::Fatal || level >= *self
    }
}
