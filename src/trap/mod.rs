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

//! Traps for errors that cannot be returned to the caller.

use std::fmt;

use crate::Error;

mod default;

pub use self::default::DefaultTrap;

/// The exit code used when a writer loop terminates the process.
pub const FATAL_EXIT_CODE: i32 = 70;

/// A trap for errors raised off the caller's path.
///
/// Background writers cannot hand their errors back to whoever submitted a record, so they report
/// them here instead.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Report a recoverable error, such as a record dropped on a full queue.
    fn trap(&self, err: &Error);

    /// Report an error that stopped a writer for good.
    ///
    /// The default implementation reports the error through [`Trap::trap`] and then terminates
    /// the process with [`FATAL_EXIT_CODE`].
    fn fatal(&self, err: &Error) {
        self.trap(err);
        std::process::exit(FATAL_EXIT_CODE);
    }
}

impl<T: Trap> From<T> for Box<dyn Trap> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
