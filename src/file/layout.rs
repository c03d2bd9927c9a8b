// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where log files live on disk, and how the previous session's files are moved
//! out of the way.
//!
//! ```text
//! <root>/latest.log
//! <root>/debug/latest.log
//! <root>/error/latest.log
//! <root>/fatal/latest.log
//! <root>/20261019T081502.117Z.zip
//! ```

use crate::error::{Error, IoContext, Result};
use crate::level::Level;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub(crate) const LATEST: &str = "latest";

/// One log stream and its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Category {
    Latest,
    Debug,
    Error,
    Fatal,
}

impl Category {
    pub(crate) fn dir(self, root: &Path) -> PathBuf {
        match self {
            Category::Latest => root.to_path_buf(),
            Category::Debug => root.join("debug"),
            Category::Error => root.join("error"),
            Category::Fatal => root.join("fatal"),
        }
    }

    pub(crate) fn latest(self, root: &Path, extension: &str) -> PathBuf {
        self.dir(root).join(format!("{LATEST}.{extension}"))
    }

    /// Whether a message of `level` belongs in this stream.
    pub(crate) fn accepts(self, level: Level, debug: bool) -> bool {
        match self {
            Category::Latest => level != Level::Debug || debug,
            Category::Debug => level == Level::Debug,
            Category::Error => matches!(level, Level::Error | Level::Fatal),
            Category::Fatal => level == Level::Fatal,
        }
    }
}

/// Checks the configured folder and creates it when missing.
pub(crate) fn prepare_root(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Error::MissingLogFolder);
    }
    if path.exists() && !path.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    std::fs::create_dir_all(path).at(path)?;
    Ok(path.to_path_buf())
}

/// `YYYYMMDDTHHMMSS.mmmZ`
pub(crate) fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y%m%dT%H%M%S%.3fZ")
        .to_string()
}

/// `<dir>/<stem>.<extension>`, or `<stem>-N.<extension>` if that is taken.
fn free_name(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.{extension}"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{stem}-{n}.{extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Renames `latest.<extension>` in `dir` after its modification time.
///
/// Returns the new path, or `None` when there was nothing to rotate.
pub(crate) fn rotate(dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
    let latest = dir.join(format!("{LATEST}.{extension}"));
    if !latest.is_file() {
        return Ok(None);
    }
    let modified = latest
        .metadata()
        .and_then(|m| m.modified())
        .unwrap_or_else(|_| SystemTime::now());
    let target = free_name(dir, &timestamp(modified), extension);
    std::fs::rename(&latest, &target).at(&latest)?;
    Ok(Some(target))
}

/// Timestamped `.<extension>` files in `dir`: what earlier sessions left behind.
pub(crate) fn previous_logs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).at(dir)? {
        let path = entry.at(dir)?.path();
        let matches = path.is_file()
            && path.extension().is_some_and(|e| e == extension)
            && path.file_stem().is_some_and(|stem| stem != LATEST);
        if matches {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Bundles `files` into `<root>/<now>.zip` and removes them.
///
/// Entries are named by their path relative to `root`.
pub(crate) fn archive(root: &Path, files: &[PathBuf]) -> Result<PathBuf> {
    let target = free_name(root, &timestamp(SystemTime::now()), "zip");
    let mut zip = ZipWriter::new(File::create(&target).at(&target)?);
    let options = SimpleFileOptions::default();
    for file in files {
        let name = file
            .strip_prefix(root)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/");
        zip.start_file(name, options)?;
        let contents = std::fs::read(file).at(file)?;
        zip.write_all(&contents).at(&target)?;
    }
    zip.finish()?;
    for file in files {
        std::fs::remove_file(file).at(file)?;
    }
    Ok(target)
}
