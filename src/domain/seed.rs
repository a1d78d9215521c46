//! Default habits installed on first run
//!
//! Five daily prayers, two reading habits stacked after the first and last
//! prayer, then exercise and nutrition.

use chrono::{DateTime, Utc};

use super::habit::{Category, Habit, Intention};
use super::id::HabitId;

struct SeedHabit {
    id: &'static str,
    name: &'static str,
    category: Category,
    time: Option<&'static str>,
    place: Option<&'static str>,
    stack_after: Option<&'static str>,
}

const SEED: &[SeedHabit] = &[
    SeedHabit {
        id: "h_fajr",
        name: "Fajr prayer",
        category: Category::Personal,
        time: Some("05:30"),
        place: Some("home"),
        stack_after: None,
    },
    SeedHabit {
        id: "h_dhuhr",
        name: "Dhuhr prayer",
        category: Category::Personal,
        time: Some("13:00"),
        place: Some("work/home"),
        stack_after: None,
    },
    SeedHabit {
        id: "h_asr",
        name: "Asr prayer",
        category: Category::Personal,
        time: Some("16:30"),
        place: Some("work/home"),
        stack_after: None,
    },
    SeedHabit {
        id: "h_maghrib",
        name: "Maghrib prayer",
        category: Category::Personal,
        time: Some("18:30"),
        place: Some("home"),
        stack_after: None,
    },
    SeedHabit {
        id: "h_isha",
        name: "Isha prayer",
        category: Category::Personal,
        time: Some("20:30"),
        place: Some("home"),
        stack_after: None,
    },
    SeedHabit {
        id: "h_quran",
        name: "Read Quran (1 page)",
        category: Category::Learning,
        time: Some("06:00"),
        place: Some("home"),
        stack_after: Some("h_fajr"),
    },
    SeedHabit {
        id: "h_hadith",
        name: "Read Hadith",
        category: Category::Learning,
        time: Some("21:00"),
        place: Some("home"),
        stack_after: Some("h_isha"),
    },
    SeedHabit {
        id: "h_exercise",
        name: "Exercise (30 min)",
        category: Category::Health,
        time: Some("07:00"),
        place: Some("home/gym"),
        stack_after: None,
    },
    SeedHabit {
        id: "h_water",
        name: "Drink water (2L)",
        category: Category::Health,
        time: None,
        place: None,
        stack_after: None,
    },
    SeedHabit {
        id: "h_meal",
        name: "Healthy meal",
        category: Category::Health,
        time: None,
        place: None,
        stack_after: None,
    },
];

/// Builds the default habit set, all created at `now`
pub fn default_habits(now: DateTime<Utc>) -> Vec<Habit> {
    SEED.iter()
        .map(|seed| {
            let intention = Intention::new(
                seed.time.map(str::to_string),
                seed.place.map(str::to_string),
            );
            let mut habit = Habit::new(HabitId::from_static(seed.id), seed.name, seed.category)
                .with_intention(intention)
                .with_created_at(now);
            habit.stack_after = seed.stack_after.map(HabitId::from_static);
            habit
        })
        .collect()
}
