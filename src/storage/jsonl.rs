//! JSONL storage for habits and completion logs
//!
//! - `.habits/habits.jsonl`: one habit per line, in collection order
//! - `.habits/logs.jsonl`: one `{"date": ..., "habits": [...]}` per line, ascending
//!
//! Reads take a shared lock, writes an exclusive one. Full rewrites go to a
//! temp file first and are renamed into place.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{Habit, HabitId, LogBook};

/// A JSONL file with locked reads and atomic rewrites
#[derive(Debug, Clone)]
struct JsonlFile {
    path: PathBuf,
}

impl JsonlFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads every non-blank line; a missing file reads as empty
    fn read_lines<T: DeserializeOwned>(&self, what: &str) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {} store: {}", what, self.path.display()))?;

        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {} store", what))?;

        let reader = BufReader::new(&file);
        let mut items = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let item: T = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse {} at line {}", what, line_num + 1))?;
            items.push(item);
        }

        Ok(items)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }

    /// Rewrites the whole file through a temp file + rename
    fn write_lines<'a, T, I>(&self, items: I, what: &str) -> Result<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        self.ensure_parent()?;

        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire write lock on {} store", what))?;

            let mut writer = BufWriter::new(&file);

            for item in items {
                let line = serde_json::to_string(item)
                    .with_context(|| format!("Failed to serialize {}", what))?;
                writeln!(writer, "{}", line).with_context(|| format!("Failed to write {}", what))?;
            }

            writer
                .flush()
                .with_context(|| format!("Failed to flush {} store", what))?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

/// Store for habit definitions, preserving collection order
#[derive(Debug, Clone)]
pub struct HabitStore {
    file: JsonlFile,
}

impl HabitStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonlFile::new(path.into()),
        }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".habits").join("habits.jsonl"))
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    /// Reads all habits in file order
    ///
    /// A habit ID seen twice keeps its first position and its last value.
    pub fn read_all(&self) -> Result<Vec<Habit>> {
        let lines: Vec<Habit> = self.file.read_lines("habit")?;

        let mut habits: Vec<Habit> = Vec::with_capacity(lines.len());
        let mut positions: HashMap<HabitId, usize> = HashMap::new();

        for habit in lines {
            match positions.get(&habit.id) {
                Some(&pos) => {
                    tracing::warn!(id = %habit.id, "duplicate habit line, keeping the later one");
                    habits[pos] = habit;
                }
                None => {
                    positions.insert(habit.id.clone(), habits.len());
                    habits.push(habit);
                }
            }
        }

        Ok(habits)
    }

    /// Writes all habits (full rewrite, order preserved)
    pub fn write_all(&self, habits: &[Habit]) -> Result<()> {
        self.file.write_lines(habits, "habit")
    }
}

/// Store for the per-day completion log
#[derive(Debug, Clone)]
pub struct LogStore {
    file: JsonlFile,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonlFile::new(path.into()),
        }
    }

    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".habits").join("logs.jsonl"))
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    /// Reads the log; lines for the same day are merged
    pub fn read_all(&self) -> Result<LogBook> {
        let entries = self.file.read_lines("log entry")?;
        Ok(entries.into_iter().collect())
    }

    /// Writes the whole log, one line per recorded day
    pub fn write_all(&self, logs: &LogBook) -> Result<()> {
        let entries = logs.to_entries();
        self.file.write_lines(&entries, "log entry")
    }
}
