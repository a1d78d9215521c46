//! # Storage Layer
//!
//! Persistence for habitstack in plain, diff-friendly files.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Habits | JSONL, one habit per line, collection order | `.habits/habits.jsonl` |
//! | Logs | JSONL, one `{"date","habits"}` per line, ascending | `.habits/logs.jsonl` |
//! | Config | TOML | `.habits/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`HabitStore`] and [`LogStore`] use file locking (`fs2`)
//! - All rewrites are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for a `.habits/` directory
//! - [`Tracker`] - Owns the state; every mutation persists, then notifies
//! - [`Persistence`] - Backend seam ([`FileBackend`], [`MemoryBackend`])
//! - [`Config`] - Project and global configuration

mod jsonl;
mod config;
mod project;
mod tracker;

pub use jsonl::{HabitStore, LogStore};
pub use config::{
    Config, ConfigError, GlobalConfig, GridConfig, OutputFormat, ProjectConfig, HABIT_DIR_NAME,
};
pub use project::{Project, ProjectError};
pub use tracker::{
    FileBackend, MemoryBackend, Persistence, Snapshot, SubscriptionId, ToggleOutcome, ToggleReport,
    Tracker, TrackerState,
};
