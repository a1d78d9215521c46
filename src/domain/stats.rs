//! Streak and statistics engine
//!
//! Pure reads over the habit list and the completion log. Anything that
//! depends on "today" takes it as an argument so callers decide the clock.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::habit::{Category, Habit};
use super::id::HabitId;
use super::log::LogBook;

/// Length of the trailing window used by weekly statistics
pub const WEEK_DAYS: u64 = 7;

/// Streak lengths that earn a celebration
pub const MILESTONES: [u32; 8] = [7, 14, 21, 30, 60, 90, 100, 365];

/// Highest heatmap intensity tier
pub const MAX_LEVEL: u8 = 4;

/// Completion rate over the trailing week, across all habits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct WeeklyRate {
    /// Percentage 0-100
    pub rate: u8,
    pub done: usize,
    pub total: usize,
}

/// Trailing-week completion for a single habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct HabitWeekly {
    pub done: usize,
    /// Percentage 0-100, always relative to seven days
    pub rate: u8,
}

/// A streak worth celebrating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum Milestone {
    /// Three days in a row
    Warmup,
    /// One of [`MILESTONES`]
    Major(u32),
}

/// Per-habit row of the dashboard breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitBreakdown {
    pub id: HabitId,
    pub name: String,
    pub category: Category,
    pub weekly: HabitWeekly,
}

/// Dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Best streak ever recorded across all habits
    pub best_streak: u32,
    /// Current habits completed today
    pub today_done: usize,
    pub habit_count: usize,
    pub weekly: WeeklyRate,
    /// Habits with a streak running through today
    pub active_streaks: usize,
    pub breakdown: Vec<HabitBreakdown>,
}

/// Maps a streak length to a heatmap intensity tier in `0..=4`
pub fn streak_level(streak: u32) -> u8 {
    if streak == 0 {
        return 0;
    }
    let tier = streak.div_ceil(3).min(u32::from(MAX_LEVEL));
    tier as u8
}

/// Returns the milestone reached by a streak of exactly `streak` days
pub fn milestone(streak: u32) -> Option<Milestone> {
    if MILESTONES.contains(&streak) {
        Some(Milestone::Major(streak))
    } else if streak == 3 {
        Some(Milestone::Warmup)
    } else {
        None
    }
}

/// `round(100 * done / total)`, rounding halves up; 0 when `total` is 0
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * done + total) / (2 * total);
    rounded.min(100) as u8
}

/// The last seven days, today first
fn trailing_week(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..WEEK_DAYS).filter_map(move |i| today.checked_sub_days(Days::new(i)))
}

fn days_before(day: NaiveDate, n: u64) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(n))
}

/// Read-only view for computing statistics
#[derive(Debug, Clone, Copy)]
pub struct Stats<'a> {
    habits: &'a [Habit],
    logs: &'a LogBook,
}

impl<'a> Stats<'a> {
    pub fn new(habits: &'a [Habit], logs: &'a LogBook) -> Self {
        Self { habits, logs }
    }

    /// Consecutive logged days walking backward from `as_of` (inclusive)
    pub fn streak(&self, habit_id: &HabitId, as_of: NaiveDate) -> u32 {
        let mut count = 0;
        let mut day = Some(as_of);
        while let Some(d) = day {
            if !self.logs.is_logged(habit_id, d) {
                break;
            }
            count += 1;
            day = d.pred_opt();
        }
        count
    }

    /// Longest run over the recorded days
    ///
    /// Only days present in the log count: a recorded day without the habit
    /// resets the run, but a day with no record at all is skipped.
    pub fn best_streak(&self, habit_id: &HabitId) -> u32 {
        let mut best = 0;
        let mut current = 0;
        for (_, habits) in self.logs.iter() {
            if habits.contains(habit_id) {
                current += 1;
                best = best.max(current);
            } else {
                current = 0;
            }
        }
        best
    }

    /// Completion over the trailing week for every habit that existed each day
    pub fn weekly_rate(&self, today: NaiveDate) -> WeeklyRate {
        let mut done = 0;
        let mut total = 0;
        for day in trailing_week(today) {
            for habit in self.habits.iter().filter(|h| h.existed_on(day)) {
                total += 1;
                if self.logs.is_logged(&habit.id, day) {
                    done += 1;
                }
            }
        }
        WeeklyRate {
            rate: percent(done, total),
            done,
            total,
        }
    }

    /// Trailing-week completion for one habit, always out of seven days
    pub fn habit_weekly(&self, habit_id: &HabitId, today: NaiveDate) -> HabitWeekly {
        let done = trailing_week(today)
            .filter(|day| self.logs.is_logged(habit_id, *day))
            .count();
        HabitWeekly {
            done,
            rate: percent(done, WEEK_DAYS as usize),
        }
    }

    /// Two-Day Rule: done the day before yesterday, missed yesterday, not yet done today
    pub fn is_at_risk(&self, habit_id: &HabitId, today: NaiveDate) -> bool {
        let (Some(yesterday), Some(day_before)) = (days_before(today, 1), days_before(today, 2))
        else {
            return false;
        };
        !self.logs.is_logged(habit_id, yesterday)
            && self.logs.is_logged(habit_id, day_before)
            && !self.logs.is_logged(habit_id, today)
    }

    /// Returns true when logging `day` closed a one-day gap (missed the day
    /// before, but not the one before that)
    pub fn two_day_rule_saved(&self, habit_id: &HabitId, day: NaiveDate) -> bool {
        let (Some(prev), Some(prev2)) = (days_before(day, 1), days_before(day, 2)) else {
            return false;
        };
        !self.logs.is_logged(habit_id, prev) && self.logs.is_logged(habit_id, prev2)
    }

    /// Aggregates the dashboard numbers
    pub fn summary(&self, today: NaiveDate) -> Summary {
        let best_streak = self
            .habits
            .iter()
            .map(|h| self.best_streak(&h.id))
            .max()
            .unwrap_or(0);

        let today_done = self
            .habits
            .iter()
            .filter(|h| self.logs.is_logged(&h.id, today))
            .count();

        let active_streaks = self
            .habits
            .iter()
            .filter(|h| self.streak(&h.id, today) > 0)
            .count();

        let breakdown = self
            .habits
            .iter()
            .map(|h| HabitBreakdown {
                id: h.id.clone(),
                name: h.name.clone(),
                category: h.category,
                weekly: self.habit_weekly(&h.id, today),
            })
            .collect();

        Summary {
            best_streak,
            today_done,
            habit_count: self.habits.len(),
            weekly: self.weekly_rate(today),
            active_streaks,
            breakdown,
        }
    }
}
