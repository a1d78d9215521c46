//! Heatmap grid command
//!
//! One row per habit in stacking order, one column per day. Logged cells are
//! shaded by the streak running through that day.

use std::io::stdout;

use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate};
use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;
use serde::Serialize;

use super::output::Output;
use crate::domain::{day_key, streak_level, CellState, HabitId, Stats};
use crate::storage::{Project, Tracker};

/// Days from `today - past` through `today + future`, ascending
pub fn date_range(today: NaiveDate, past: u32, future: u32) -> Vec<NaiveDate> {
    let start = today
        .checked_sub_days(Days::new(u64::from(past)))
        .unwrap_or(today);
    let end = today
        .checked_add_days(Days::new(u64::from(future)))
        .unwrap_or(today);
    start.iter_days().take_while(|d| *d <= end).collect()
}

#[derive(Debug, Serialize)]
struct Cell {
    date: String,
    state: CellState,
    /// Heatmap intensity 0-4
    level: u8,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a HabitId,
    name: &'a str,
    chained: bool,
    streak: u32,
    at_risk: bool,
    cells: Vec<Cell>,
}

fn build_rows<'a>(tracker: &'a Tracker, days: &[NaiveDate], today: NaiveDate) -> Vec<Row<'a>> {
    let stats = tracker.stats();

    tracker
        .stacked_rows()
        .into_iter()
        .map(|row| {
            let id = &row.habit.id;
            let cells = days
                .iter()
                .map(|&day| Cell {
                    date: day_key(day),
                    state: tracker.cell_state(id, day, today),
                    level: level_on(&stats, id, day),
                })
                .collect();

            Row {
                id,
                name: &row.habit.name,
                chained: row.chained,
                streak: stats.streak(id, today),
                at_risk: stats.is_at_risk(id, today),
                cells,
            }
        })
        .collect()
}

fn level_on(stats: &Stats<'_>, id: &HabitId, day: NaiveDate) -> u8 {
    streak_level(stats.streak(id, day))
}

fn level_color(level: u8) -> Color {
    match level {
        0 | 1 => Color::DarkGreen,
        2 => Color::Green,
        3 => Color::DarkYellow,
        _ => Color::Yellow,
    }
}

fn render_cell(cell: &Cell, color: bool) -> String {
    let (glyph, tint) = match cell.state {
        CellState::Logged => ("■", Some(level_color(cell.level))),
        CellState::Editable => ("□", None),
        CellState::Locked => ("×", Some(Color::DarkGrey)),
        CellState::Frozen => ("·", Some(Color::DarkGrey)),
        CellState::Future => (" ", None),
    };

    match tint {
        Some(tint) if color => glyph.with(tint).to_string(),
        _ => glyph.to_string(),
    }
}

pub fn run(
    output: &Output,
    project: &Project,
    today: NaiveDate,
    past: u32,
    future: u32,
) -> Result<()> {
    let tracker = project.tracker()?;
    let days = date_range(today, past, future);
    let rows = build_rows(&tracker, &days, today);

    if output.is_json() {
        output.data(&serde_json::json!({
            "today": day_key(today),
            "days": days.iter().map(|d| day_key(*d)).collect::<Vec<_>>(),
            "rows": rows,
        }));
        return Ok(());
    }

    if rows.is_empty() {
        println!("No habits. Add one with 'habit add <name>'.");
        return Ok(());
    }

    let color = stdout().is_tty();
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count() + if r.chained { 2 } else { 0 })
        .max()
        .unwrap_or(0)
        .clamp(8, 32);

    // day-of-month, ones digit; today marked with '|'
    let header: String = days
        .iter()
        .map(|d| {
            if *d == today {
                "|".to_string()
            } else {
                (d.day() % 10).to_string()
            }
        })
        .collect();
    println!("{:<width$}  {}", "", header, width = name_width);

    for row in &rows {
        let name: String = if row.chained {
            format!("└ {}", row.name)
        } else {
            row.name.to_string()
        };
        let name: String = name.chars().take(name_width).collect();
        let cells: String = row.cells.iter().map(|c| render_cell(c, color)).collect();

        let mut suffix = format!(" {}", row.streak);
        if row.at_risk {
            suffix.push_str(" !");
        }

        println!("{:<width$}  {}{}", name, cells, suffix, width = name_width);
    }

    Ok(())
}
