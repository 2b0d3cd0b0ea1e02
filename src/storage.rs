use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::error::Error;

pub const EXTENSION: &str = ".md";
pub const DEFAULT_PREFIX: &str = "weather_record_";
pub const FILENAME_TIME_FMT: &str = "%Y%m%d_%H%M%S";

/// Arguments of the `save_to_markdown` tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveRequest {
    pub content: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Final file name for a save. A missing or empty name becomes a
/// second-resolution timestamp; anything not ending in `.md` gets it.
pub fn resolve_filename<Tz: TimeZone>(
    filename: Option<&str>,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let name = match filename {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{DEFAULT_PREFIX}{}{EXTENSION}", now.format(FILENAME_TIME_FMT)),
    };
    if name.ends_with(EXTENSION) {
        name
    } else {
        format!("{name}{EXTENSION}")
    }
}

/// Writes markdown files into one directory.
#[derive(Debug, Clone)]
pub struct MarkdownStore {
    dir: PathBuf,
}

impl MarkdownStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save(
        &self,
        content: &str,
        filename: Option<&str>,
    ) -> Result<PathBuf, Error> {
        self.save_at(content, filename, &Local::now())
    }

    /// Same as [`MarkdownStore::save`] with an explicit clock. Two saves in
    /// the same second without a name land on the same file; the second
    /// one wins.
    pub fn save_at<Tz: TimeZone>(
        &self,
        content: &str,
        filename: Option<&str>,
        now: &DateTime<Tz>,
    ) -> Result<PathBuf, Error>
    where
        Tz::Offset: std::fmt::Display,
    {
        let path = self.dir.join(resolve_filename(filename, now));
        let persist = |source| Error::Persistence { path: path.clone(), source };

        debug!("ensuring {} exists", self.dir.display());
        fs::create_dir_all(&self.dir).map_err(persist)?;
        fs::write(&path, content).map_err(persist)?;
        info!("saved {} bytes to {}", content.len(), path.display());
        Ok(path)
    }
}
