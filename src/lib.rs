//! habitstack - a local-first habit tracker
//!
//! Habits are logged once per day. Consecutive days form streaks, and a habit
//! can be stacked after another so it unlocks only once its parent is done
//! that day. Past days freeze after yesterday.
//!
//! - [`domain`] holds the pure logic: streaks, statistics, stacking, policy
//! - [`storage`] persists to a `.habits/` directory and owns the [`storage::Tracker`]
//! - [`cli`] is the `habit` command

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Category, Habit, HabitId, LogBook};
pub use storage::Tracker;
