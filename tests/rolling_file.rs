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
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use rand::distr::Alphanumeric;
use stratalog::Append;
use stratalog::append::RollingFile;
use stratalog::append::rolling_file::NoRotation;
use stratalog::append::rolling_file::WriterConfig;
use tempfile::TempDir;

fn list_files(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let mut files = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let name = path.file_name()?.to_str()?;
            name.starts_with(prefix).then_some(path)
        })
        .collect::<Vec<_>>();
    files.sort();
    files
}

fn random_line(len: usize) -> String {
    let mut line = rand::rng()
        .sample_iter(Alphanumeric)
        .take(len - 1)
        .map(char::from)
        .collect::<String>();
    line.push('\n');
    line
}

#[test]
fn test_size_rotation_keeps_each_payload_whole() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let config = WriterConfig::new("app")
        .with_base_dir(temp_dir.path())
        .with_rotation(NoRotation::new(".log"))
        .with_max_file_size(100)
        .with_check_full_interval(Duration::ZERO);
    let writer = RollingFile::new(config).unwrap();

    let first = random_line(60);
    let second = random_line(60);
    writer.append(first.as_bytes()).unwrap();
    writer.flush().unwrap();
    writer.append(second.as_bytes()).unwrap();
    writer.flush().unwrap();

    let active = temp_dir.path().join("app.log");
    assert_eq!(fs::read_to_string(&active).unwrap(), second);

    let backups = list_files(temp_dir.path(), "app_");
    assert_eq!(backups.len(), 1, "{backups:?}");
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), first);

    let name = backups[0].file_name().unwrap().to_str().unwrap();
    assert!(name.ends_with(".log"), "{name}");
}

#[test]
fn test_flush_makes_every_prior_record_visible() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let config = WriterConfig::new("app")
        .with_base_dir(temp_dir.path())
        .with_rotation(NoRotation::new(".log"));
    let writer = RollingFile::new(config).unwrap();

    let mut expected = String::new();
    for i in 0..500 {
        let line = format!("{i:04} {}", random_line(rand::rng().random_range(2..80)));
        writer.append(line.as_bytes()).unwrap();
        expected.push_str(&line);
    }
    writer.flush().unwrap();

    let active = temp_dir.path().join("app.log");
    assert_eq!(fs::read_to_string(active).unwrap(), expected);
}

#[test]
fn test_rotated_files_preserve_order() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let config = WriterConfig::new("app")
        .with_base_dir(temp_dir.path())
        .with_rotation(NoRotation::new(".log"))
        .with_max_file_size(256)
        .with_check_full_interval(Duration::ZERO);
    let writer = RollingFile::new(config).unwrap();

    let mut expected = String::new();
    for i in 0..40 {
        let line = format!("line {i:03}\n");
        writer.append(line.as_bytes()).unwrap();
        expected.push_str(&line);
        writer.flush().unwrap();
        // backup names carry millisecond timestamps
        thread::sleep(Duration::from_millis(2));
    }

    // backups sort chronologically by name, the active file holds the newest records
    let mut content = String::new();
    for backup in list_files(temp_dir.path(), "app_") {
        let data = fs::read_to_string(&backup).unwrap();
        assert!(data.len() <= 256, "{backup:?} holds {} bytes", data.len());
        content.push_str(&data);
    }
    content.push_str(&fs::read_to_string(temp_dir.path().join("app.log")).unwrap());
    assert_eq!(content, expected);
}

#[test]
fn test_concurrent_producers() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let config = WriterConfig::new("app")
        .with_base_dir(temp_dir.path())
        .with_rotation(NoRotation::new(".log"));
    let writer = Arc::new(RollingFile::new(config).unwrap());

    let handles = (0..8)
        .map(|t| {
            let writer = writer.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    writer.append(format!("{t} {i}\n").as_bytes()).unwrap();
                    if i % 50 == 0 {
                        writer.flush().unwrap();
                    }
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    writer.flush().unwrap();

    let content = fs::read_to_string(temp_dir.path().join("app.log")).unwrap();
    assert_eq!(content.lines().count(), 8 * 200);

    // each producer's records keep their relative order
    for t in 0..8 {
        let indices = content
            .lines()
            .filter_map(|line| {
                let (thread, index) = line.split_once(' ')?;
                (thread == t.to_string()).then(|| index.parse::<usize>().unwrap())
            })
            .collect::<Vec<_>>();
        assert_eq!(indices, (0..200).collect::<Vec<_>>());
    }
}

#[test]
fn test_daily_file_name() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let writer = RollingFile::new(WriterConfig::new("app").with_base_dir(temp_dir.path())).unwrap();
    writer.append(b"hello\n").unwrap();
    writer.flush().unwrap();

    let files = list_files(temp_dir.path(), "app");
    assert_eq!(files.len(), 1, "{files:?}");

    // app.MM-DD.log
    let name = files[0].file_name().unwrap().to_str().unwrap();
    let (month, day) = name
        .strip_prefix("app.")
        .and_then(|rest| rest.strip_suffix(".log"))
        .and_then(|date| date.split_once('-'))
        .unwrap();
    assert!((1..=12).contains(&month.parse::<u32>().unwrap()), "{name}");
    assert!((1..=31).contains(&day.parse::<u32>().unwrap()), "{name}");
}

#[test]
fn test_drop_writes_pending_records() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let config = WriterConfig::new("app")
        .with_base_dir(temp_dir.path().join("nested").join("logs"))
        .with_rotation(NoRotation::new(".log"));
    let writer = RollingFile::new(config).unwrap();
    for i in 0..100 {
        writer.append(format!("{i}\n").as_bytes()).unwrap();
    }
    drop(writer);

    let content = fs::read_to_string(temp_dir.path().join("nested/logs/app.log")).unwrap();
    assert_eq!(content.lines().count(), 100);
}
