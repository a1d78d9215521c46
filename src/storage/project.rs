//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::HABIT_DIR_NAME;
use super::{Config, FileBackend, HabitStore, LogStore, Tracker};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a habit project. Run 'habit init' first.")]
    NotInProject,

    #[error("No habit project at {0}. Run 'habit init' there first.")]
    NotAProject(PathBuf),
}

const DEFAULT_CONFIG: &str = r#"# habitstack configuration

# Category for 'habit add' when --category is not given
default_category = "health"

# Install the default habit set when there are no habits
seed_defaults = true

[grid]
# Days shown before and after today by 'habit grid'
past_days = 40
future_days = 5
"#;

const GITIGNORE: &str = r#"# Interrupted writes
*.tmp
"#;

/// A directory holding a `.habits/` data directory
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(HABIT_DIR_NAME).is_dir() {
            return Err(ProjectError::NotAProject(root).into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left alone, so running it twice is harmless.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let habit_dir = root.join(HABIT_DIR_NAME);

        fs::create_dir_all(&habit_dir).with_context(|| {
            format!("Failed to create .habits directory: {}", habit_dir.display())
        })?;

        let config_path = habit_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = habit_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, GITIGNORE).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        tracing::debug!(root = %root.display(), "initialized project");

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn habit_store(&self) -> HabitStore {
        HabitStore::for_project(&self.root)
    }

    pub fn log_store(&self) -> LogStore {
        LogStore::for_project(&self.root)
    }

    /// Opens the tracker over this project's files, seeding per config
    pub fn tracker(&self) -> Result<Tracker> {
        let backend = FileBackend::new(self.habit_store(), self.log_store());
        Tracker::open(backend, self.config.project.seed_defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let habit_dir = dir.path().join(HABIT_DIR_NAME);
        assert!(habit_dir.is_dir());
        assert!(habit_dir.join("config.toml").is_file());
        assert!(habit_dir.join(".gitignore").is_file());
    }

    #[test]
    fn default_config_file_matches_defaults() {
        let parsed: crate::storage::ProjectConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, crate::storage::ProjectConfig::default());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap();

        assert!(dir.path().join(HABIT_DIR_NAME).is_dir());
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let err = Project::open(dir.path()).unwrap_err();

        assert!(err.to_string().contains("habit init"));
    }

    #[test]
    fn stores_are_accessible() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.habit_store().path().ends_with("habits.jsonl"));
        assert!(project.log_store().path().ends_with("logs.jsonl"));
    }

    #[test]
    fn tracker_seeds_new_project() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let tracker = project.tracker().unwrap();
        assert_eq!(tracker.habits().len(), 10);
        assert!(project.habit_store().path().exists());
    }

    #[test]
    fn tracker_respects_seed_setting() {
        let dir = TempDir::new().unwrap();
        let habit_dir = dir.path().join(HABIT_DIR_NAME);
        fs::create_dir_all(&habit_dir).unwrap();
        fs::write(habit_dir.join("config.toml"), "seed_defaults = false\n").unwrap();

        let project = Project::init(dir.path()).unwrap();
        assert!(!project.config().project.seed_defaults);
        assert!(project.tracker().unwrap().habits().is_empty());
    }
}
