//! Domain models for habitstack
//!
//! Contains the core business logic without any I/O concerns.

mod id;
mod habit;
mod log;
mod graph;
pub mod stats;
pub mod policy;
pub mod seed;

pub use id::{HabitId, IdError};
pub use habit::{Category, CategoryError, Habit, HabitPatch, Intention, NewHabit};
pub use log::{day_key, parse_day, DayEntry, LogBook, DATE_FORMAT};
pub use graph::{stack_order, stacked_rows, GraphError, StackGraph, StackedHabit};
pub use stats::{streak_level, HabitWeekly, Milestone, Stats, Summary, WeeklyRate};
pub use policy::{can_toggle, cell_state, BlockReason, CellState, ToggleDecision};
