//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Habits | Define and stack habits | `add`, `edit`, `remove`, `list`, `show` |
//! | Logging | Daily completion | `toggle`, `day` |
//! | Views | Streaks and statistics | `stats`, `grid` |
//!
//! ## Output Formats
//!
//! All commands support `--format text|json`. Without the flag, the global
//! config's `default_format` applies.
//!
//! ## Logging
//!
//! `--verbose` (or `-v`) turns on debug logs on stderr; `RUST_LOG` overrides:
//! ```bash
//! habit --verbose toggle h-1a2b3c4
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod habit;
mod stats;
mod grid;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
