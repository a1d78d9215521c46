//! Main CLI application structure

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::output::{Output, OutputFormat};
use super::{grid, habit, stats};
use crate::domain::{Category, HabitId};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "habit")]
#[command(author, version, about = "Local-first habit tracker with streaks and habit stacking")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the nearest parent with a .habits directory)
    #[arg(long, global = true, env = "HABIT_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a habit project
    Init {
        /// Path to initialize (defaults to --dir, then the current directory)
        path: Option<PathBuf>,
    },

    /// Add a habit
    ///
    /// Examples:
    ///   habit add "Read"                          # Uses the default category
    ///   habit add "Stretch" --time 07:00 --place gym
    ///   habit add "Floss" --after h-1a2b3c4       # Stacked after another habit
    Add {
        /// Habit name
        name: String,

        /// Category (health, work, personal, learning)
        #[arg(long, short)]
        category: Option<Category>,

        /// Time of day, HH:MM
        #[arg(long)]
        time: Option<String>,

        /// Where the habit happens
        #[arg(long)]
        place: Option<String>,

        /// Habit that must be completed first each day
        #[arg(long)]
        after: Option<HabitId>,
    },

    /// Edit a habit
    Edit {
        /// Habit ID
        id: HabitId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short)]
        category: Option<Category>,

        /// Time of day, HH:MM (empty string clears it)
        #[arg(long)]
        time: Option<String>,

        /// Place (empty string clears it)
        #[arg(long)]
        place: Option<String>,

        /// Stack after another habit
        #[arg(long, conflicts_with = "unstack")]
        after: Option<HabitId>,

        /// Remove the stacking link
        #[arg(long)]
        unstack: bool,
    },

    /// Remove a habit (its history is kept)
    Remove {
        /// Habit ID
        id: HabitId,
    },

    /// List habits in stacking order with their streaks
    List,

    /// Show habit details
    Show {
        /// Habit ID
        id: HabitId,
    },

    /// Toggle a habit's completion for a day
    Toggle {
        /// Habit ID
        id: HabitId,

        /// Day to toggle, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the habits completed on a day
    Day {
        /// Day, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the dashboard summary
    Stats,

    /// Show the completion heatmap
    Grid {
        /// Days before today (defaults to grid.past_days from config)
        #[arg(long)]
        past: Option<u32>,

        /// Days after today (defaults to grid.future_days from config)
        #[arg(long)]
        future: Option<u32>,
    },
}

/// Sets up stderr logging; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

fn open_project(dir: Option<&Path>) -> Result<Project> {
    match dir {
        Some(dir) => Project::open(dir),
        None => Project::open_current(),
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format);
    let today = Local::now().date_naive();

    tracing::debug!(%today, "habit starting");

    if let Commands::Init { path } = &cli.command {
        let path = path
            .clone()
            .or_else(|| cli.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        return habit::init(&output, &path);
    }

    let project = open_project(cli.dir.as_deref())?;
    tracing::debug!(root = %project.root().display(), "opened project");

    match cli.command {
        Commands::Init { .. } => {}

        Commands::Add {
            name,
            category,
            time,
            place,
            after,
        } => {
            let category = category.unwrap_or(project.config().project.default_category);
            habit::add(&output, &project, &name, category, time, place, after)?
        }

        Commands::Edit {
            id,
            name,
            category,
            time,
            place,
            after,
            unstack,
        } => {
            let stack_after = match (after, unstack) {
                (Some(parent), _) => Some(Some(parent)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let edit = habit::Edit {
                name,
                category,
                time,
                place,
                stack_after,
            };
            habit::edit(&output, &project, &id, edit)?
        }

        Commands::Remove { id } => habit::remove(&output, &project, &id)?,
        Commands::List => habit::list(&output, &project, today)?,
        Commands::Show { id } => habit::show(&output, &project, &id, today)?,

        Commands::Toggle { id, date } => {
            let day = habit::resolve_date(date.as_deref(), today)?;
            habit::toggle(&output, &project, &id, day, today)?
        }

        Commands::Day { date } => {
            let day = habit::resolve_date(date.as_deref(), today)?;
            habit::day(&output, &project, day)?
        }

        Commands::Stats => stats::run(&output, &project, today)?,

        Commands::Grid { past, future } => {
            let grid_config = project.config().project.grid;
            let past = past.unwrap_or(grid_config.past_days);
            let future = future.unwrap_or(grid_config.future_days);
            grid::run(&output, &project, today, past, future)?
        }
    }

    tracing::debug!("command completed");
    Ok(())
}
