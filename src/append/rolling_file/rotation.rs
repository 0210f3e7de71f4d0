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

use std::fmt;

use jiff::Zoned;

/// Decides when the writer opens a new log file, and what the file is called.
///
/// The writer asks the policy before every batch it writes. The returned suffix is appended to
/// the configured base file name to form the new file's name.
pub trait RotationPolicy: fmt::Debug + Send + Sync + 'static {
    /// Return the suffix of a new file to open, or `None` to keep writing the current one.
    ///
    /// `last_opened` is the time the current file was opened, or `None` if no file is open. A
    /// policy returning `None` while no file is open leaves the writer with nowhere to write,
    /// which fails the write.
    fn should_open_new_file(&self, last_opened: Option<&Zoned>, now: &Zoned) -> Option<String>;
}

/// Open a new file whenever the calendar day changes, named `<base>.MM-DD.log`.
///
/// This is the default policy.
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct DailyRotation {}

impl RotationPolicy for DailyRotation {
    fn should_open_new_file(&self, last_opened: Option<&Zoned>, now: &Zoned) -> Option<String> {
        match last_opened {
            Some(last) if last.date() == now.date() => None,
            _ => Some(now.strftime(".%m-%d.log").to_string()),
        }
    }
}

/// Keep writing a single file named `<base><suffix>`; only size-based rotation applies.
#[derive(Debug, Clone)]
pub struct NoRotation {
    suffix: String,
}

impl NoRotation {
    /// Create a policy writing to `<base><suffix>`, for example `NoRotation::new(".log")`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl RotationPolicy for NoRotation {
    fn should_open_new_file(&self, last_opened: Option<&Zoned>, _: &Zoned) -> Option<String> {
        match last_opened {
            None => Some(self.suffix.clone()),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn zoned(s: &str) -> Zoned {
        Zoned::from_str(s).unwrap()
    }

    #[test]
    fn test_daily_first_file() {
        let now = zoned("2024-08-10T17:12:52+08[+08]");
        assert_eq!(
            DailyRotation::default().should_open_new_file(None, &now),
            Some(".08-10.log".to_string())
        );
    }

    #[test]
    fn test_daily_same_day_keeps_file() {
        let opened = zoned("2024-08-10T00:00:01+08[+08]");
        let now = zoned("2024-08-10T23:59:59+08[+08]");
        assert_eq!(
            DailyRotation::default().should_open_new_file(Some(&opened), &now),
            None
        );
    }

    #[test]
    fn test_daily_day_change_opens_new_file() {
        let policy = DailyRotation::default();
        let opened = zoned("2024-08-10T23:59:59+08[+08]");

        let now = zoned("2024-08-11T00:00:00+08[+08]");
        assert_eq!(
            policy.should_open_new_file(Some(&opened), &now),
            Some(".08-11.log".to_string())
        );

        // same day of month, another month
        let now = zoned("2024-09-10T12:00:00+08[+08]");
        assert_eq!(
            policy.should_open_new_file(Some(&opened), &now),
            Some(".09-10.log".to_string())
        );

        // same day and month, another year
        let now = zoned("2025-08-10T12:00:00+08[+08]");
        assert_eq!(
            policy.should_open_new_file(Some(&opened), &now),
            Some(".08-10.log".to_string())
        );
    }

    #[test]
    fn test_no_rotation() {
        let policy = NoRotation::new(".log");
        let now = zoned("2024-08-10T17:12:52+08[+08]");
        assert_eq!(
            policy.should_open_new_file(None, &now),
            Some(".log".to_string())
        );
        assert_eq!(policy.should_open_new_file(Some(&now), &now), None);
    }
}
