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

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;

use crate::Append;
use crate::Error;
use crate::Trap;
use crate::append::rolling_file::FlushReply;
use crate::append::rolling_file::WriterConfig;
use crate::append::rolling_file::rolling::State;
use crate::append::rolling_file::worker::Worker;

/// An appender writing to rolling log files from a dedicated thread.
///
/// [`append`](Append::append) never blocks: when the queue is full the record is dropped and the
/// loss is reported to the configured [`Trap`]. [`flush`](Append::flush) blocks until every record
/// submitted before it is written and the file is synced, and returns the first error of that
/// cycle. It has no timeout, so a stalled file system stalls the flushing caller too.
///
/// An I/O error outside a flush stops the writer thread and is escalated through
/// [`Trap::fatal`], which by default terminates the process.
///
/// Dropping the appender writes out whatever is still queued, syncs the file and joins the
/// writer thread.
#[derive(Debug)]
pub struct RollingFile {
    inner: Option<Inner>,
}

#[derive(Debug)]
struct Inner {
    records: Sender<Vec<u8>>,
    flushes: Sender<FlushReply>,
    handle: Option<JoinHandle<()>>,
    trap: Arc<dyn Trap>,
}

impl RollingFile {
    /// Create the appender and start its writer thread.
    ///
    /// No file is touched until the first record or flush arrives.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The configured base file name is empty.
    /// * The writer thread cannot be spawned.
    pub fn new(config: WriterConfig) -> Result<RollingFile, Error> {
        let thread_name = config.thread_name().to_string();
        let (mut writer, worker) = RollingFile::create(config)?;
        writer.start(thread_name, worker)?;
        Ok(writer)
    }

    fn create(config: WriterConfig) -> Result<(RollingFile, Worker), Error> {
        if config.base_file_name().is_empty() {
            return Err(Error::new("base file name must not be empty"));
        }

        let (records, record_receiver) = crossbeam_channel::bounded(config.queue_capacity());
        let (flushes, flush_receiver) = crossbeam_channel::bounded(0);
        let trap = config.trap().clone();
        let worker = Worker::new(record_receiver, flush_receiver, State::new(config));

        let writer = RollingFile {
            inner: Some(Inner {
                records,
                flushes,
                handle: None,
                trap,
            }),
        };
        Ok((writer, worker))
    }

    fn start(&mut self, thread_name: String, worker: Worker) -> Result<(), Error> {
        let inner = self.inner.as_mut().ok_or_else(closed)?;
        let trap = inner.trap.clone();

        let handle = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                if let Err(err) = worker.run() {
                    let err = Error::new("log writer stopped")
                        .with_context("thread", thread_name)
                        .with_source(err);
                    trap.fatal(&err);
                }
            })
            .map_err(|err| Error::new("failed to spawn log writer thread").with_source(err))?;

        inner.handle = Some(handle);
        Ok(())
    }

    fn inner(&self) -> Result<&Inner, Error> {
        self.inner.as_ref().ok_or_else(closed)
    }
}

fn closed() -> Error {
    Error::new("log writer is closed")
}

impl Append for RollingFile {
    fn append(&self, bytes: &[u8]) -> Result<(), Error> {
        let inner = self.inner()?;

        let (message, bytes) = match inner.records.try_send(bytes.to_vec()) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(bytes)) => ("log queue is full, record dropped", bytes),
            Err(TrySendError::Disconnected(bytes)) => {
                ("log writer has stopped, record dropped", bytes)
            }
        };

        let err = Error::new(message).with_context("lost", String::from_utf8_lossy(&bytes));
        inner.trap.trap(&err);
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let inner = self.inner()?;

        let (reply, done) = oneshot::channel();
        inner
            .flushes
            .send(reply)
            .map_err(|_| Error::new("failed to send flush request, log writer has stopped"))?;

        done.recv()
            .map_err(|_| Error::new("log writer stopped before completing flush"))?
    }
}

impl Drop for RollingFile {
    fn drop(&mut self) {
        let Some(Inner {
            records,
            flushes,
            handle,
            trap,
        }) = self.inner.take()
        else {
            return;
        };

        // the writer thread drains what is left and exits once both channels are disconnected
        drop(records);
        drop(flushes);

        if let Some(handle) = handle {
            if handle.join().is_err() {
                trap.trap(&Error::new("log writer thread panicked"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    use crossbeam_channel::Receiver;
    use tempfile::TempDir;

    use super::*;
    use crate::append::rolling_file::NoRotation;

    #[derive(Debug)]
    struct RecordingTrap {
        errors: Sender<String>,
        fatals: Sender<String>,
    }

    impl Trap for RecordingTrap {
        fn trap(&self, err: &Error) {
            let _ = self.errors.send(err.to_string());
        }

        fn fatal(&self, err: &Error) {
            let _ = self.fatals.send(err.to_string());
        }
    }

    struct Traps {
        errors: Receiver<String>,
        fatals: Receiver<String>,
    }

    fn config(dir: &Path) -> (WriterConfig, Traps) {
        let (errors, error_receiver) = crossbeam_channel::unbounded();
        let (fatals, fatal_receiver) = crossbeam_channel::unbounded();
        let config = WriterConfig::new("app")
            .with_base_dir(dir)
            .with_rotation(NoRotation::new(".log"))
            .with_trap(RecordingTrap { errors, fatals });
        let traps = Traps {
            errors: error_receiver,
            fatals: fatal_receiver,
        };
        (config, traps)
    }

    fn read_log(dir: &Path) -> String {
        fs::read_to_string(dir.join("app.log")).unwrap()
    }

    #[test]
    fn test_flush_writes_in_submission_order() {
        let temp_dir = TempDir::new().unwrap();
        let (config, traps) = config(temp_dir.path());
        let writer = RollingFile::new(config).unwrap();

        let mut expected = String::new();
        for i in 0..1000 {
            let line = format!("line {i}\n");
            writer.append(line.as_bytes()).unwrap();
            expected.push_str(&line);
        }
        writer.flush().unwrap();

        assert_eq!(read_log(temp_dir.path()), expected);
        assert!(traps.errors.try_recv().is_err());
    }

    #[test]
    fn test_flush_without_records_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _traps) = config(temp_dir.path());
        let writer = RollingFile::new(config).unwrap();

        writer.flush().unwrap();
        assert_eq!(read_log(temp_dir.path()), "");
    }

    #[test]
    fn test_queue_full_drops_without_blocking() {
        let temp_dir = TempDir::new().unwrap();
        let (config, traps) = config(temp_dir.path());
        let config = config.with_queue_capacity(4);

        // the worker is not running yet, so nothing drains the queue
        let (mut writer, worker) = RollingFile::create(config).unwrap();
        for i in 0..10 {
            writer.append(format!("record {i}\n").as_bytes()).unwrap();
        }

        let dropped = traps.errors.try_iter().collect::<Vec<_>>();
        assert_eq!(dropped.len(), 6);
        assert!(dropped[0].contains("log queue is full"));
        assert!(dropped[0].contains("record 4"));

        writer.start("queue-full".to_string(), worker).unwrap();
        writer.flush().unwrap();
        assert_eq!(
            read_log(temp_dir.path()),
            "record 0\nrecord 1\nrecord 2\nrecord 3\n"
        );
    }

    #[test]
    fn test_flush_reports_io_error_and_keeps_running() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("file");
        fs::write(&not_a_dir, b"").unwrap();

        let (config, traps) = config(&not_a_dir.join("logs"));
        let writer = RollingFile::new(config).unwrap();

        let err = writer.flush().unwrap_err();
        assert!(err.to_string().contains("failed to create log directory"));

        // the loop survives a failed flush
        let err = writer.flush().unwrap_err();
        assert!(err.to_string().contains("failed to create log directory"));
        assert!(traps.fatals.try_recv().is_err());
    }

    #[test]
    fn test_write_error_outside_flush_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("file");
        fs::write(&not_a_dir, b"").unwrap();

        let (config, traps) = config(&not_a_dir.join("logs"));
        let writer = RollingFile::new(config).unwrap();
        writer.append(b"doomed\n").unwrap();

        let fatal = traps
            .fatals
            .recv_timeout(Duration::from_secs(10))
            .expect("writer loop did not escalate");
        assert!(fatal.contains("log writer stopped"));
        assert!(fatal.contains("failed to create log directory"));

        let err = writer.flush().unwrap_err();
        assert!(err.to_string().contains("log writer has stopped"));

        writer.append(b"after\n").unwrap();
        let dropped = traps.errors.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(dropped.contains("log writer has stopped, record dropped"));
    }

    #[test]
    fn test_concurrent_producers_and_flushers() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _traps) = config(temp_dir.path());
        let writer = Arc::new(RollingFile::new(config).unwrap());

        let handles = (0..4)
            .map(|t| {
                let writer = writer.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        writer.append(format!("{t} {i}\n").as_bytes()).unwrap();
                        if i % 50 == 0 {
                            writer.flush().unwrap();
                        }
                    }
                    writer.flush().unwrap();
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = read_log(temp_dir.path());
        assert_eq!(content.lines().count(), 1000);
        for t in 0..4 {
            let seen = content
                .lines()
                .filter_map(|line| line.split_once(' '))
                .filter(|(thread, _)| *thread == t.to_string())
                .map(|(_, i)| i.parse::<usize>().unwrap())
                .collect::<Vec<_>>();
            assert_eq!(seen, (0..250).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_drop_writes_pending_records() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _traps) = config(temp_dir.path());
        let writer = RollingFile::new(config).unwrap();

        for i in 0..100 {
            writer.append(format!("pending {i}\n").as_bytes()).unwrap();
        }
        drop(writer);

        assert_eq!(read_log(temp_dir.path()).lines().count(), 100);
    }

    #[test]
    fn test_empty_base_file_name_is_rejected() {
        let err = RollingFile::new(WriterConfig::new("")).unwrap_err();
        assert!(err.to_string().contains("base file name must not be empty"));
    }
}
