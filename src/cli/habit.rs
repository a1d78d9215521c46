//! Habit CLI commands

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use super::output::Output;
use crate::domain::{
    day_key, parse_day, BlockReason, Category, Habit, HabitId, HabitPatch, Intention, Milestone,
    NewHabit, StackGraph, ToggleDecision, DATE_FORMAT,
};
use crate::storage::{Project, ToggleOutcome, ToggleReport, Tracker};

/// Field changes requested by `habit edit`
#[derive(Debug, Default)]
pub struct Edit {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub time: Option<String>,
    pub place: Option<String>,
    pub stack_after: Option<Option<HabitId>>,
}

/// Parses `--date`, defaulting to today
pub fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        None => Ok(today),
        Some(s) => parse_day(s.trim())
            .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD", s)),
    }
}

/// Checks an intention time is `HH:MM`; empty means unset
fn validate_time(time: Option<String>) -> Result<Option<String>> {
    match time {
        Some(t) if !t.trim().is_empty() => {
            let t = t.trim().to_string();
            NaiveTime::parse_from_str(&t, "%H:%M")
                .with_context(|| format!("Invalid time '{}': expected HH:MM", t))?;
            Ok(Some(t))
        }
        _ => Ok(None),
    }
}

fn find<'a>(tracker: &'a Tracker, id: &HabitId) -> Result<&'a Habit> {
    tracker
        .get_habit(id)
        .ok_or_else(|| anyhow::anyhow!("Habit not found: {}", id))
}

fn describe(tracker: &Tracker, id: &HabitId) -> String {
    match tracker.get_habit(id) {
        Some(habit) => format!("{} ({})", habit.name, id),
        None => id.to_string(),
    }
}

pub fn init(output: &Output, path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "initializing project");
    let project = Project::init(path)?;
    let tracker = project.tracker()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "root": project.root().display().to_string(),
            "habits": tracker.habits().len(),
        }));
    } else {
        output.success(&format!(
            "Initialized habit project at {} ({} habits)",
            project.root().display(),
            tracker.habits().len()
        ));
    }

    Ok(())
}

pub fn add(
    output: &Output,
    project: &Project,
    name: &str,
    category: Category,
    time: Option<String>,
    place: Option<String>,
    after: Option<HabitId>,
) -> Result<()> {
    let mut tracker = project.tracker()?;

    let intention = Intention::new(validate_time(time)?, place);
    let mut new = NewHabit::new(name, category).intention(intention);
    if let Some(parent) = after {
        new = new.stack_after(parent);
    }

    let habit = tracker
        .add_habit(new)?
        .ok_or_else(|| anyhow::anyhow!("Habit name must not be empty"))?;

    if output.is_json() {
        output.data(&habit);
    } else {
        output.success(&format!("Created habit: {} - {}", habit.id, habit.name));
    }

    Ok(())
}

pub fn edit(output: &Output, project: &Project, id: &HabitId, edit: Edit) -> Result<()> {
    let mut tracker = project.tracker()?;
    let current = find(&tracker, id)?;

    let intention = if edit.time.is_some() || edit.place.is_some() {
        let time = match edit.time {
            Some(t) => validate_time(Some(t))?,
            None => current.intention.time.clone(),
        };
        let place = edit.place.or_else(|| current.intention.place.clone());
        Some(Intention::new(time, place))
    } else {
        None
    };

    let patch = HabitPatch {
        name: edit.name,
        category: edit.category,
        intention,
        stack_after: edit.stack_after,
    };

    if patch.is_empty() {
        anyhow::bail!(
            "Nothing to change. Pass --name, --category, --time, --place, --after or --unstack."
        );
    }

    let habit = tracker
        .update_habit(id, patch)?
        .ok_or_else(|| anyhow::anyhow!("Habit not found: {}", id))?;

    if output.is_json() {
        output.data(&habit);
    } else {
        output.success(&format!("Updated habit: {} - {}", habit.id, habit.name));
    }

    Ok(())
}

pub fn remove(output: &Output, project: &Project, id: &HabitId) -> Result<()> {
    let mut tracker = project.tracker()?;
    let unstacked = StackGraph::from_habits(tracker.habits()).dependents(id);

    if !tracker.delete_habit(id)? {
        anyhow::bail!("Habit not found: {}", id);
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "removed": true,
            "unstacked": unstacked,
        }));
    } else {
        output.success(&format!("Removed habit: {}", id));
        for child in &unstacked {
            println!("  Unstacked: {}", describe(&tracker, child));
        }
    }

    Ok(())
}

pub fn list(output: &Output, project: &Project, today: NaiveDate) -> Result<()> {
    let tracker = project.tracker()?;
    let stats = tracker.stats();
    let rows = tracker.stacked_rows();

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|row| {
                let h = row.habit;
                serde_json::json!({
                    "id": h.id,
                    "name": h.name,
                    "category": h.category,
                    "intention": h.intention,
                    "stack_after": h.stack_after,
                    "chained": row.chained,
                    "logged_today": tracker.is_logged(&h.id, today),
                    "streak": stats.streak(&h.id, today),
                    "best_streak": stats.best_streak(&h.id),
                    "at_risk": stats.is_at_risk(&h.id, today),
                })
            })
            .collect();
        output.data(&items);
    } else if rows.is_empty() {
        println!("No habits");
    } else {
        println!(
            "{:<12} {:<28} {:<10} {:>6} {:>5}  NOTE",
            "ID", "NAME", "CATEGORY", "STREAK", "BEST"
        );
        println!("{}", "-".repeat(76));

        for row in rows {
            let h = row.habit;
            let marker = if tracker.is_logged(&h.id, today) { "x" } else { " " };
            let name = if row.chained {
                format!("└ {}", h.name)
            } else {
                h.name.clone()
            };

            let mut notes = Vec::new();
            if stats.is_at_risk(&h.id, today) {
                notes.push("at risk".to_string());
            }
            if let Some(parent) = &h.stack_after {
                if !row.chained {
                    notes.push(format!("after {}", parent));
                }
            }
            if h.intention.is_complete() {
                notes.push(h.intention.to_string());
            }

            println!(
                "{:<12} [{}] {:<24} {:<10} {:>6} {:>5}  {}",
                h.id,
                marker,
                name,
                h.category,
                stats.streak(&h.id, today),
                stats.best_streak(&h.id),
                notes.join(", ")
            );
        }
    }

    Ok(())
}

pub fn show(output: &Output, project: &Project, id: &HabitId, today: NaiveDate) -> Result<()> {
    let tracker = project.tracker()?;
    let habit = find(&tracker, id)?;
    let stats = tracker.stats();
    let weekly = stats.habit_weekly(id, today);
    let dependents = StackGraph::from_habits(tracker.habits()).dependents(id);

    if output.is_json() {
        output.data(&serde_json::json!({
            "habit": habit,
            "streak": stats.streak(id, today),
            "best_streak": stats.best_streak(id),
            "at_risk": stats.is_at_risk(id, today),
            "weekly": weekly,
            "logged_today": tracker.is_logged(id, today),
            "dependents": dependents,
        }));
    } else {
        println!("Habit: {}", habit.id);
        println!("Name: {}", habit.name);
        println!("Category: {}", habit.category);
        if habit.intention.is_complete() {
            println!("Intention: {}", habit.intention);
        }
        if let Some(parent) = &habit.stack_after {
            println!("After: {}", describe(&tracker, parent));
        }
        if !dependents.is_empty() {
            println!("Stacked habits:");
            for child in &dependents {
                println!("  - {}", describe(&tracker, child));
            }
        }
        println!("Created: {}", habit.created_on().format(DATE_FORMAT));
        println!();
        println!(
            "Today: {}",
            if tracker.is_logged(id, today) { "done" } else { "not done" }
        );
        println!("Streak: {} (best {})", stats.streak(id, today), stats.best_streak(id));
        println!("This week: {}/7 ({}%)", weekly.done, weekly.rate);
        if stats.is_at_risk(id, today) {
            println!("At risk: missed yesterday, log today to keep the chain alive");
        }
    }

    Ok(())
}

pub fn toggle(
    output: &Output,
    project: &Project,
    id: &HabitId,
    day: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    let mut tracker = project.tracker()?;
    let name = find(&tracker, id)?.name.clone();

    match tracker.try_toggle(id, day, today)? {
        ToggleOutcome::Denied(decision) => {
            let reason = decision.reason().map(|r| r.as_str());
            let parent = match &decision {
                ToggleDecision::Locked { parent } => Some(parent.clone()),
                _ => None,
            };

            if output.is_json() {
                output.data(&serde_json::json!({
                    "id": id,
                    "date": day_key(day),
                    "toggled": false,
                    "reason": reason,
                    "parent": parent,
                }));
            } else {
                let message = match (decision.reason(), parent) {
                    (Some(BlockReason::Locked), Some(parent)) => format!(
                        "Locked: complete {} first",
                        describe(&tracker, &parent)
                    ),
                    _ => "Frozen: only today and yesterday can be changed".to_string(),
                };
                output.warn(&message);
            }
        }

        ToggleOutcome::Toggled(report) => {
            if output.is_json() {
                output.data(&serde_json::json!({
                    "id": id,
                    "date": day_key(day),
                    "toggled": true,
                    "logged": report.logged,
                    "streak": report.streak,
                    "milestone": report.milestone,
                    "two_day_rule_saved": report.two_day_rule_saved,
                }));
            } else {
                print_toggle(output, &name, day, &report);
            }
        }
    }

    Ok(())
}

fn print_toggle(output: &Output, name: &str, day: NaiveDate, report: &ToggleReport) {
    let state = if report.logged { "done" } else { "not done" };
    output.success(&format!("{} marked {} for {}", name, state, day_key(day)));

    match report.milestone {
        Some(Milestone::Warmup) => println!("3 days in a row! Keep it going!"),
        Some(Milestone::Major(days)) => println!("Amazing! {} day streak!", days),
        None => {}
    }
    if report.two_day_rule_saved {
        println!("Two-Day Rule saved: you missed one day, but never two.");
    }
}

pub fn day(output: &Output, project: &Project, day: NaiveDate) -> Result<()> {
    let tracker = project.tracker()?;
    let done = tracker.logs_for_date(day);

    if output.is_json() {
        output.data(&serde_json::json!({
            "date": day_key(day),
            "habits": done,
            "done": done.len(),
            "total": tracker.habits().len(),
        }));
    } else if done.is_empty() {
        println!("Nothing logged on {}", day_key(day));
    } else {
        println!("Completed on {}:", day_key(day));
        for id in &done {
            println!("  - {}", describe(&tracker, id));
        }
        println!();
        println!("{}/{} habits", done.len(), tracker.habits().len());
    }

    Ok(())
}
