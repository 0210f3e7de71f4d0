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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jiff::SignedDuration;
use jiff::Timestamp;
use jiff::Zoned;

use crate::Error;
use crate::append::rolling_file::WriterConfig;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S.%3f";

#[derive(Debug)]
struct ActiveFile {
    file: File,
    path: PathBuf,
    opened_at: Zoned,
}

impl ActiveFile {
    fn sync(&self) -> Result<(), Error> {
        self.file
            .sync_all()
            .map_err(|err| Error::from_path_io_error("failed to sync log file", &self.path, err))
    }
}

/// Everything about the destination file. Owned by the writer thread alone.
#[derive(Debug)]
pub(crate) struct State {
    config: WriterConfig,
    check_full_interval: SignedDuration,
    file: Option<ActiveFile>,
    last_full_check: Option<Timestamp>,
    is_full: bool,
}

impl State {
    pub(crate) fn new(config: WriterConfig) -> Self {
        let check_full_interval =
            SignedDuration::try_from(config.check_full_interval()).unwrap_or(SignedDuration::MAX);
        Self {
            config,
            check_full_interval,
            file: None,
            last_full_check: None,
            is_full: false,
        }
    }

    /// Open or rotate the destination as needed, then write `batch` to it.
    ///
    /// An empty batch still goes through the open and rotation checks.
    pub(crate) fn write_batch(&mut self, batch: &[u8]) -> Result<(), Error> {
        let now = self.config.clock.now();

        self.try_open_new_file(&now)?;
        if self.check_full(&now, batch.len())? {
            self.rotate(&now)?;
        }

        if batch.is_empty() {
            return Ok(());
        }

        let active = self
            .file
            .as_mut()
            .ok_or_else(|| Error::new("no log file to write to"))?;
        active
            .file
            .write_all(batch)
            .map_err(|err| Error::from_path_io_error("failed to write log file", &active.path, err))
    }

    pub(crate) fn sync(&self) -> Result<(), Error> {
        match &self.file {
            Some(active) => active.sync(),
            None => Ok(()),
        }
    }

    fn try_open_new_file(&mut self, now: &Zoned) -> Result<(), Error> {
        let opened_at = self.file.as_ref().map(|active| &active.opened_at);
        let Some(suffix) = self.config.rotation().should_open_new_file(opened_at, now) else {
            return match self.file {
                Some(_) => Ok(()),
                None => Err(Error::new(
                    "no log file to write to: the rotation policy named no first file",
                )
                .with_context("base_dir", self.config.base_dir().display())),
            };
        };

        let dir = self.config.base_dir();
        create_dir(dir, self.config.perm())?;

        let path = dir.join(format!("{}{suffix}", self.config.base_file_name()));
        let file = open_file(&path, self.config.perm())?;
        let previous = self.file.replace(ActiveFile {
            file,
            path,
            opened_at: now.clone(),
        });
        self.is_full = false;
        self.last_full_check = None;

        // bytes already written to the previous file must survive the switch
        match previous {
            Some(previous) => previous.sync(),
            None => Ok(()),
        }
    }

    fn check_full(&mut self, now: &Zoned, incoming: usize) -> Result<bool, Error> {
        let Some(active) = &self.file else {
            return Ok(false);
        };

        let now = now.timestamp();
        if let Some(last) = self.last_full_check {
            if now.duration_since(last) < self.check_full_interval {
                return Ok(self.is_full);
            }
        }

        let size = active
            .file
            .metadata()
            .map_err(|err| Error::from_path_io_error("failed to stat log file", &active.path, err))?
            .len();
        let max = self.config.max_file_size();
        self.is_full = size >= max || (size > 0 && size.saturating_add(incoming as u64) > max);
        self.last_full_check = Some(now);

        Ok(self.is_full)
    }

    fn rotate(&mut self, now: &Zoned) -> Result<(), Error> {
        if let Some(active) = self.file.take() {
            active.sync()?;
            let ActiveFile { file, path, .. } = active;
            drop(file);

            let backup = backup_name(&path, now);
            fs::rename(&path, &backup).map_err(|err| {
                Error::from_path_io_error("failed to rename log file", &path, err)
                    .with_context("backup", backup.display())
            })?;
        }

        self.try_open_new_file(now)
    }

    #[cfg(test)]
    pub(crate) fn current_path(&self) -> Option<&Path> {
        self.file.as_ref().map(|active| active.path.as_path())
    }
}

/// `dir/app.08-10.log` becomes `dir/app.08-10_2024-08-10T17-12-52.123.log`.
///
/// A numeric suffix is added to the stem if that name is already taken.
fn backup_name(path: &Path, now: &Zoned) -> PathBuf {
    let dir = path.parent().unwrap_or(Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let timestamp = now.strftime(BACKUP_TIME_FORMAT);

    let backup = dir.join(format!("{stem}_{timestamp}{ext}"));
    if !backup.exists() {
        return backup;
    }

    (1..)
        .map(|n| dir.join(format!("{stem}_{timestamp}_{n}{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(backup)
}

fn create_dir(dir: &Path, perm: u32) -> Result<(), Error> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(perm);
    }
    #[cfg(not(unix))]
    let _ = perm;

    builder
        .create(dir)
        .map_err(|err| Error::from_path_io_error("failed to create log directory", dir, err))
}

fn open_file(path: &Path, perm: u32) -> Result<File, Error> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(perm);
    }
    #[cfg(not(unix))]
    let _ = perm;

    options
        .open(path)
        .map_err(|err| Error::from_path_io_error("failed to open log file", path, err))
}
