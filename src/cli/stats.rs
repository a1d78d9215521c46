//! Dashboard summary command

use anyhow::Result;
use chrono::NaiveDate;

use super::output::Output;
use crate::storage::Project;

pub fn run(output: &Output, project: &Project, today: NaiveDate) -> Result<()> {
    let tracker = project.tracker()?;
    let summary = tracker.stats().summary(today);

    if output.is_json() {
        output.data(&summary);
        return Ok(());
    }

    println!("Best streak:     {} days", summary.best_streak);
    println!("Today:           {}/{}", summary.today_done, summary.habit_count);
    println!(
        "This week:       {}% ({}/{})",
        summary.weekly.rate, summary.weekly.done, summary.weekly.total
    );
    println!("Active streaks:  {}", summary.active_streaks);

    if !summary.breakdown.is_empty() {
        println!();
        println!("{:<12} {:<28} {:<10} WEEK", "ID", "NAME", "CATEGORY");
        println!("{}", "-".repeat(62));
        for row in &summary.breakdown {
            println!(
                "{:<12} {:<28} {:<10} {}/7 ({}%)",
                row.id, row.name, row.category, row.weekly.done, row.weekly.rate
            );
        }
    }

    Ok(())
}
