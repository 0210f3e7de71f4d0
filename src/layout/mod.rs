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

//! Layouts for encoding log records into bytes.

use std::fmt;

use crate::Error;
use crate::record::Record;

pub use self::text::TextLayout;

mod text;

/// A layout for encoding log records.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Encode `record` by appending its bytes to `buf`.
    fn format(&self, record: &Record, buf: &mut Vec<u8>) -> Result<(), Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
