//! Habit domain model
//!
//! Habits are the things a user wants to do every day. A habit may be
//! stacked after another one, which gates its completion on the parent's
//! completion for the same day.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::HabitId;

#[derive(Debug, Error, PartialEq)]
#[error("Unknown category '{0}': expected one of health, work, personal, learning")]
pub struct CategoryError(String);

/// Fixed set of habit categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Health,
    Work,
    Personal,
    Learning,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Health,
        Category::Work,
        Category::Personal,
        Category::Learning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Learning => "learning",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}

/// Implementation intention: "I will do X at TIME in PLACE"
///
/// Purely descriptive. Nothing schedules or enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intention {
    /// Time of day as `HH:MM`
    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub place: Option<String>,
}

impl Intention {
    pub fn new(time: Option<String>, place: Option<String>) -> Self {
        Self {
            time: time.filter(|t| !t.trim().is_empty()),
            place: place
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }

    /// Returns true when both time and place are set
    pub fn is_complete(&self) -> bool {
        self.time.is_some() && self.place.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_none() && self.place.is_none()
    }
}

impl fmt::Display for Intention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.time, &self.place) {
            (Some(time), Some(place)) => write!(f, "{} @ {}", time, place),
            (Some(time), None) => f.write_str(time),
            (None, Some(place)) => write!(f, "@ {}", place),
            (None, None) => Ok(()),
        }
    }
}

/// A habit definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier, never changes
    pub id: HabitId,

    /// Display name
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Category,

    #[serde(default)]
    pub intention: Intention,

    /// Habit that must be completed first on the same day
    #[serde(
        default,
        deserialize_with = "deserialize_stack_after",
        skip_serializing_if = "Option::is_none"
    )]
    pub stack_after: Option<HabitId>,

    /// Creation time; records without one are treated as existing since the epoch
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// Unknown or missing categories load as health
fn deserialize_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

/// Older records write `""` or `null` for "no stacking"
fn deserialize_stack_after<'de, D>(deserializer: D) -> Result<Option<HabitId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl Habit {
    /// Creates a habit with the given ID, created now
    pub fn new(id: HabitId, name: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            intention: Intention::default(),
            stack_after: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_intention(mut self, intention: Intention) -> Self {
        self.intention = intention;
        self
    }

    pub fn with_stack_after(mut self, parent: HabitId) -> Self {
        self.stack_after = Some(parent);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns true if this habit is stacked after another one
    pub fn is_stacked(&self) -> bool {
        self.stack_after.is_some()
    }

    /// Local calendar day the habit was created on
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }

    /// Returns true if the habit already existed on `day`
    pub fn existed_on(&self, day: NaiveDate) -> bool {
        self.created_on() <= day
    }

    /// Merges the set fields of a patch into this habit
    pub fn apply(&mut self, patch: HabitPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(intention) = patch.intention {
            self.intention = intention;
        }
        if let Some(stack_after) = patch.stack_after {
            self.stack_after = stack_after;
        }
    }
}

/// Input for creating a habit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHabit {
    pub name: String,
    pub category: Category,
    pub intention: Intention,
    pub stack_after: Option<HabitId>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            ..Self::default()
        }
    }

    pub fn intention(mut self, intention: Intention) -> Self {
        self.intention = intention;
        self
    }

    pub fn stack_after(mut self, parent: HabitId) -> Self {
        self.stack_after = Some(parent);
        self
    }
}

/// Partial update of a habit; `None` fields are left untouched
///
/// `stack_after: Some(None)` clears the stacking link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub intention: Option<Intention>,
    pub stack_after: Option<Option<HabitId>>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.intention.is_none()
            && self.stack_after.is_none()
    }

    /// The new stacking parent, if this patch sets one
    pub fn new_parent(&self) -> Option<&HabitId> {
        self.stack_after.as_ref().and_then(|p| p.as_ref())
    }
}
