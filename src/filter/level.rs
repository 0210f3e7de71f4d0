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

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::filter::Filter;
use crate::record::Level;

/// A minimum-severity threshold that can be changed at runtime.
///
/// Clones share the same threshold, so a handle kept by the application can raise or lower the
/// level of a logger that is already running. Reads and writes are single atomic operations.
///
/// [`Level::Fatal`] always passes, regardless of the threshold.
///
/// # Examples
///
/// ```
/// use stratalog::Filter;
/// use stratalog::filter::AtomicLevel;
/// use stratalog::record::Level;
///
/// let level = AtomicLevel::new_at(Level::Warn);
/// assert!(!level.enabled(Level::Info));
///
/// level.set_level(Level::Debug);
/// assert!(level.enabled(Level::Info));
/// ```
#[derive(Debug, Clone)]
pub struct AtomicLevel(Arc<AtomicU8>);

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicLevel {
    /// Create a threshold enabling [`Level::Info`] and above.
    pub fn new() -> Self {
        Self::new_at(Level::Info)
    }

    /// Create a threshold enabling `level` and above.
    pub fn new_at(level: Level) -> Self {
        AtomicLevel(Arc::new(AtomicU8::new(level as u8)))
    }

    /// The current threshold.
    pub fn level(&self) -> Level {
        // only valid levels are ever stored
        Level::from_u8(self.0.load(Ordering::Relaxed)).unwrap_or(Level::Info)
    }

    /// Replace the threshold; visible to every clone.
    pub fn set_level(&self, level: Level) {
        self.0.store(level as u8, Ordering::Relaxed);
    }
}

impl Filter for AtomicLevel {
    fn enabled(&self, level: Level) -> bool {
        self.level().enabled(level)
    }
}

impl From<Level> for AtomicLevel {
    fn from(level: Level) -> Self {
        AtomicLevel::new_at(level)
    }
}

impl FromStr for AtomicLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_str(s).map(AtomicLevel::new_at)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn enabled_set(gate: &AtomicLevel) -> Vec<Level> {
        Level::iter().filter(|l| gate.enabled(*l)).collect()
    }

    #[test]
    fn test_raising_threshold_shrinks_enabled_set() {
        let gate = AtomicLevel::new_at(Level::Trace);
        let mut previous = enabled_set(&gate);
        assert_eq!(previous.len(), 7);

        for threshold in Level::iter().skip(1) {
            gate.set_level(threshold);
            let current = enabled_set(&gate);
            assert!(current.len() < previous.len(), "{threshold} did not shrink the set");
            assert!(current.iter().all(|l| previous.contains(l)));
            previous = current;
        }
    }

    #[test]
    fn test_fatal_always_enabled() {
        for threshold in Level::iter() {
            let gate = AtomicLevel::new_at(threshold);
            assert!(gate.enabled(Level::Fatal));
        }
    }

    #[test]
    fn test_default_is_info() {
        let gate = AtomicLevel::default();
        assert_eq!(gate.level(), Level::Info);
        assert!(!gate.enabled(Level::Debug));
        assert!(gate.enabled(Level::Info));
    }

    #[test]
    fn test_clones_share_threshold() {
        let gate = AtomicLevel::new();
        let handle = gate.clone();

        thread::spawn(move || handle.set_level(Level::Error))
            .join()
            .unwrap();

        assert_eq!(gate.level(), Level::Error);
        assert!(!gate.enabled(Level::Warn));
    }

    #[test]
    fn test_parse() {
        let gate: AtomicLevel = "debug".parse().unwrap();
        assert_eq!(gate.level(), Level::Debug);
        assert!("loud".parse::<AtomicLevel>().is_err());
    }
}
