//! Editability policy
//!
//! Decides whether a (habit, day) cell may be toggled. The check never
//! mutates anything; callers run it before touching the log and use the
//! returned reason for feedback.
//!
//! Rules, in order:
//! 1. **Locked** - the habit is stacked after a parent that is not logged
//!    that day. A parent that no longer exists is never logged, so the
//!    dependent stays locked.
//! 2. **Frozen** - the day is older than yesterday.
//!
//! Future days are not rejected here; presentation layers hide them.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

use super::habit::Habit;
use super::id::HabitId;
use super::log::LogBook;

/// Why a toggle was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Locked,
    Frozen,
}

impl BlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockReason::Locked => "locked",
            BlockReason::Frozen => "frozen",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of [`can_toggle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleDecision {
    Allowed,
    /// The stacking parent must be completed first
    Locked { parent: HabitId },
    Frozen,
}

impl ToggleDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ToggleDecision::Allowed)
    }

    pub fn reason(&self) -> Option<BlockReason> {
        match self {
            ToggleDecision::Allowed => None,
            ToggleDecision::Locked { .. } => Some(BlockReason::Locked),
            ToggleDecision::Frozen => Some(BlockReason::Frozen),
        }
    }
}

/// Display state of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    /// After today; not actionable
    Future,
    Logged,
    /// Waiting on the stacking parent
    Locked,
    /// Older than yesterday and not logged
    Frozen,
    /// Can be logged now
    Editable,
}

/// Earliest day that can still be edited relative to `today`
pub fn edit_window_start(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// Returns true if `day` lies before yesterday
pub fn is_frozen(day: NaiveDate, today: NaiveDate) -> bool {
    day < edit_window_start(today)
}

/// Returns the unmet stacking parent of `habit_id` on `day`, if any
///
/// Unknown habits have no parent to wait on.
pub fn blocking_parent<'a>(
    habits: &'a [Habit],
    logs: &LogBook,
    habit_id: &HabitId,
    day: NaiveDate,
) -> Option<&'a HabitId> {
    let habit = habits.iter().find(|h| &h.id == habit_id)?;
    let parent = habit.stack_after.as_ref()?;
    (!logs.is_logged(parent, day)).then_some(parent)
}

/// Checks whether `habit_id` may be toggled on `day`
pub fn can_toggle(
    habits: &[Habit],
    logs: &LogBook,
    habit_id: &HabitId,
    day: NaiveDate,
    today: NaiveDate,
) -> ToggleDecision {
    if let Some(parent) = blocking_parent(habits, logs, habit_id, day) {
        return ToggleDecision::Locked {
            parent: parent.clone(),
        };
    }

    if is_frozen(day, today) {
        return ToggleDecision::Frozen;
    }

    ToggleDecision::Allowed
}

/// Classifies a grid cell for display
pub fn cell_state(
    habits: &[Habit],
    logs: &LogBook,
    habit_id: &HabitId,
    day: NaiveDate,
    today: NaiveDate,
) -> CellState {
    if day > today {
        CellState::Future
    } else if logs.is_logged(habit_id, day) {
        CellState::Logged
    } else if blocking_parent(habits, logs, habit_id, day).is_some() {
        CellState::Locked
    } else if is_frozen(day, today) {
        CellState::Frozen
    } else {
        CellState::Editable
    }
}
