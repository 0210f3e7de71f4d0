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

/// Log a formatted message at [`Level::Trace`](crate::record::Level::Trace).
///
/// ```
/// # let logger = stratalog::Config::new().with_level(stratalog::record::Level::Trace)
/// #     .with_writer("stderr").build().unwrap();
/// stratalog::trace!(logger, "polled {} events", 3);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at [`Level::Debug`](crate::record::Level::Debug).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at [`Level::Info`](crate::record::Level::Info).
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at [`Level::Warn`](crate::record::Level::Warn).
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at [`Level::Error`](crate::record::Level::Error).
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at [`Level::Stack`](crate::record::Level::Stack), with a stack trace.
#[macro_export]
macro_rules! stack {
    ($logger:expr, $($arg:tt)+) => {
        $logger.stack(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at [`Level::Fatal`](crate::record::Level::Fatal), with a stack trace.
///
/// The process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(::std::format_args!($($arg)+))
    };
}
