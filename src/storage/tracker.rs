//! The habit tracker state controller
//!
//! [`Tracker`] owns the habit list and the completion log. Every mutation
//! goes through it and follows the same sequence: change the state, persist
//! it through the [`Persistence`] backend, then notify subscribers in the
//! order they registered. Read-only statistics and policy checks borrow the
//! state directly.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

use super::jsonl::{HabitStore, LogStore};
use crate::domain::policy;
use crate::domain::seed::default_habits;
use crate::domain::stats::milestone;
use crate::domain::{
    stack_order, stacked_rows, CellState, GraphError, Habit, HabitId, HabitPatch, LogBook,
    Milestone, NewHabit, StackGraph, StackedHabit, Stats, ToggleDecision,
};

/// Everything the tracker persists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    /// Habits in collection order
    pub habits: Vec<Habit>,
    pub logs: LogBook,
}

/// State as read back from a backend
pub type Snapshot = TrackerState;

/// Where tracker state is loaded from and saved to
pub trait Persistence {
    fn load(&self) -> Result<Snapshot>;
    fn save(&mut self, state: &TrackerState) -> Result<()>;
}

/// Persists to the JSONL files of a `.habits/` directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    habits: HabitStore,
    logs: LogStore,
}

impl FileBackend {
    pub fn new(habits: HabitStore, logs: LogStore) -> Self {
        Self { habits, logs }
    }

    pub fn for_project(project_root: &Path) -> Self {
        Self::new(
            HabitStore::for_project(project_root),
            LogStore::for_project(project_root),
        )
    }
}

impl Persistence for FileBackend {
    fn load(&self) -> Result<Snapshot> {
        let habits = self.habits.read_all()?;
        let logs = self.logs.read_all()?;
        tracing::debug!(
            habits = habits.len(),
            days = logs.len(),
            path = %self.habits.path().display(),
            "loaded tracker state"
        );
        Ok(Snapshot { habits, logs })
    }

    fn save(&mut self, state: &TrackerState) -> Result<()> {
        self.habits.write_all(&state.habits)?;
        self.logs.write_all(&state.logs)?;
        tracing::debug!(path = %self.habits.path().display(), "saved tracker state");
        Ok(())
    }
}

/// In-process backend; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<TrackerState>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing state
    pub fn with_state(state: TrackerState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            saves: Rc::new(Cell::new(0)),
        }
    }

    /// Copy of the last saved state
    pub fn snapshot(&self) -> TrackerState {
        self.state.borrow().clone()
    }

    /// Number of saves so far
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl Persistence for MemoryBackend {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.state.borrow().clone())
    }

    fn save(&mut self, state: &TrackerState) -> Result<()> {
        *self.state.borrow_mut() = state.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Handle returned by [`Tracker::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TrackerState)>;

/// What happened after a policy-gated toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleReport {
    /// Whether the habit is now logged for the day
    pub logged: bool,
    /// Streak as of the toggled day (0 when unlogged)
    pub streak: u32,
    /// Reached when logging today lands exactly on a milestone
    pub milestone: Option<Milestone>,
    /// Logging today closed a one-day gap
    pub two_day_rule_saved: bool,
}

/// Result of [`Tracker::try_toggle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The policy rejected the toggle; nothing changed
    Denied(ToggleDecision),
    Toggled(ToggleReport),
}

/// Single owner of the habit list and completion log
pub struct Tracker {
    state: TrackerState,
    backend: Box<dyn Persistence>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Tracker {
    /// Loads state from `backend`
    ///
    /// When the habit list is empty and `seed_defaults` is set, the default
    /// habits are installed and saved right away.
    pub fn open(backend: impl Persistence + 'static, seed_defaults: bool) -> Result<Self> {
        let mut backend: Box<dyn Persistence> = Box::new(backend);
        let mut state = backend.load()?;

        if state.habits.is_empty() && seed_defaults {
            state.habits = default_habits(Utc::now());
            tracing::info!(count = state.habits.len(), "installed default habits");
            backend.save(&state)?;
        }

        Ok(Self {
            state,
            backend,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn logs(&self) -> &LogBook {
        &self.state.logs
    }

    /// Statistics over the current state
    pub fn stats(&self) -> Stats<'_> {
        Stats::new(&self.state.habits, &self.state.logs)
    }

    // ---- subscribers ----

    /// Registers a callback run after every persisted change
    pub fn subscribe(&mut self, callback: impl FnMut(&TrackerState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self) -> Result<()> {
        self.backend.save(&self.state)?;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.state);
        }
        Ok(())
    }

    // ---- habits ----

    pub fn get_habit(&self, id: &HabitId) -> Option<&Habit> {
        self.state.habits.iter().find(|h| &h.id == id)
    }

    fn position(&self, id: &HabitId) -> Option<usize> {
        self.state.habits.iter().position(|h| &h.id == id)
    }

    /// Mints an ID not used by any current habit
    fn fresh_id(&self, name: &str) -> HabitId {
        let now = Utc::now();
        let mut attempt = 0;
        loop {
            let id = HabitId::generate(name, now + Duration::nanoseconds(attempt));
            if self.get_habit(&id).is_none() {
                return id;
            }
            tracing::debug!(%id, "habit id collision, regenerating");
            attempt += 1;
        }
    }

    /// Adds a habit; an empty name adds nothing and returns `None`
    pub fn add_habit(&mut self, new: NewHabit) -> Result<Option<Habit>> {
        let name = new.name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(parent) = &new.stack_after {
            if self.get_habit(parent).is_none() {
                return Err(GraphError::HabitNotFound(parent.clone()).into());
            }
        }

        let id = self.fresh_id(name);
        let mut habit = Habit::new(id, name, new.category).with_intention(new.intention);
        habit.stack_after = new.stack_after;

        tracing::debug!(id = %habit.id, name = %habit.name, "adding habit");
        self.state.habits.push(habit.clone());
        self.commit()?;

        Ok(Some(habit))
    }

    /// Merges a patch into a habit; unknown IDs return `None`
    ///
    /// Setting a stacking parent is validated: the parent must exist, must
    /// not be the habit itself, and must not already depend on it.
    pub fn update_habit(&mut self, id: &HabitId, mut patch: HabitPatch) -> Result<Option<Habit>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        if let Some(parent) = patch.new_parent() {
            StackGraph::from_habits(&self.state.habits).validate_stack(id, parent)?;
        }

        patch.name = patch
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let habit = &mut self.state.habits[index];
        habit.apply(patch);
        let updated = habit.clone();

        tracing::debug!(%id, "updated habit");
        self.commit()?;

        Ok(Some(updated))
    }

    /// Deletes a habit and unstacks its dependents; logs are kept
    pub fn delete_habit(&mut self, id: &HabitId) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        self.state.habits.remove(index);

        let mut unstacked = 0;
        for habit in self.state.habits.iter_mut() {
            if habit.stack_after.as_ref() == Some(id) {
                habit.stack_after = None;
                unstacked += 1;
            }
        }

        tracing::debug!(%id, unstacked, "deleted habit");
        self.commit()?;

        Ok(true)
    }

    /// Habits with each root followed by its stacked chain
    pub fn habits_in_stack_order(&self) -> Vec<&Habit> {
        stack_order(&self.state.habits)
    }

    /// [`Self::habits_in_stack_order`] with chain markers
    pub fn stacked_rows(&self) -> Vec<StackedHabit<'_>> {
        stacked_rows(&self.state.habits)
    }

    // ---- logs ----

    /// Flips completion of a habit on a day, without any policy check
    ///
    /// Returns the new state (true = completed).
    pub fn toggle_log(&mut self, habit_id: &HabitId, day: NaiveDate) -> Result<bool> {
        let logged = self.state.logs.toggle(habit_id, day);
        tracing::debug!(%habit_id, %day, logged, "toggled log");
        self.commit()?;
        Ok(logged)
    }

    pub fn is_logged(&self, habit_id: &HabitId, day: NaiveDate) -> bool {
        self.state.logs.is_logged(habit_id, day)
    }

    pub fn logs_for_date(&self, day: NaiveDate) -> BTreeSet<HabitId> {
        self.state.logs.for_day(day)
    }

    pub fn can_toggle(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        today: NaiveDate,
    ) -> ToggleDecision {
        policy::can_toggle(&self.state.habits, &self.state.logs, habit_id, day, today)
    }

    pub fn cell_state(&self, habit_id: &HabitId, day: NaiveDate, today: NaiveDate) -> CellState {
        policy::cell_state(&self.state.habits, &self.state.logs, habit_id, day, today)
    }

    /// Toggles only if the editability policy allows it
    ///
    /// Logging `today` also reports the streak milestone and whether the
    /// Two-Day Rule was saved.
    pub fn try_toggle(
        &mut self,
        habit_id: &HabitId,
        day: NaiveDate,
        today: NaiveDate,
    ) -> Result<ToggleOutcome> {
        let decision = self.can_toggle(habit_id, day, today);
        if !decision.is_allowed() {
            tracing::debug!(%habit_id, %day, ?decision, "toggle denied");
            return Ok(ToggleOutcome::Denied(decision));
        }

        let logged = self.toggle_log(habit_id, day)?;

        let stats = self.stats();
        let streak = stats.streak(habit_id, day);
        let celebrate = logged && day == today;

        Ok(ToggleOutcome::Toggled(ToggleReport {
            logged,
            streak,
            milestone: if celebrate { milestone(streak) } else { None },
            two_day_rule_saved: celebrate && stats.two_day_rule_saved(habit_id, day),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_day, Category};
    use tempfile::TempDir;

    fn id(s: &str) -> HabitId {
        s.parse().unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    fn empty_tracker() -> (Tracker, MemoryBackend) {
        let backend = MemoryBackend::new();
        let tracker = Tracker::open(backend.clone(), false).unwrap();
        (tracker, backend)
    }

    fn add(tracker: &mut Tracker, name: &str) -> HabitId {
        tracker
            .add_habit(NewHabit::new(name, Category::Health))
            .unwrap()
            .unwrap()
            .id
    }

    #[test]
    fn open_seeds_empty_store() {
        let backend = MemoryBackend::new();
        let tracker = Tracker::open(backend.clone(), true).unwrap();

        assert_eq!(tracker.habits().len(), 10);
        assert_eq!(backend.snapshot().habits.len(), 10);
        assert_eq!(backend.save_count(), 1);
    }

    #[test]
    fn open_does_not_seed_existing_habits() {
        let backend = MemoryBackend::with_state(TrackerState {
            habits: vec![Habit::new(id("h1"), "Walk", Category::Health)],
            logs: LogBook::new(),
        });
        let tracker = Tracker::open(backend.clone(), true).unwrap();

        assert_eq!(tracker.habits().len(), 1);
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn add_habit_trims_and_persists() {
        let (mut tracker, backend) = empty_tracker();

        let habit = tracker
            .add_habit(NewHabit::new("  Read  ", Category::Learning))
            .unwrap()
            .unwrap();

        assert_eq!(habit.name, "Read");
        assert!(habit.id.as_str().starts_with("h-"));
        assert_eq!(backend.snapshot().habits, vec![habit]);
    }

    #[test]
    fn add_habit_with_empty_name_is_noop() {
        let (mut tracker, backend) = empty_tracker();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        tracker.subscribe(move |_| c.set(c.get() + 1));

        assert_eq!(tracker.add_habit(NewHabit::new("   ", Category::Health)).unwrap(), None);
        assert_eq!(backend.save_count(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn add_habit_ids_are_unique() {
        let (mut tracker, _) = empty_tracker();
        let a = add(&mut tracker, "Same");
        let b = add(&mut tracker, "Same");
        assert_ne!(a, b);
    }

    #[test]
    fn add_habit_stacked_on_unknown_parent_fails() {
        let (mut tracker, _) = empty_tracker();
        let err = tracker
            .add_habit(NewHabit::new("Floss", Category::Health).stack_after(id("ghost")))
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<GraphError>(),
            Some(&GraphError::HabitNotFound(id("ghost")))
        );
        assert!(tracker.habits().is_empty());
    }

    #[test]
    fn update_unknown_habit_returns_none() {
        let (mut tracker, backend) = empty_tracker();
        let patch = HabitPatch {
            name: Some("x".to_string()),
            ..HabitPatch::default()
        };

        assert_eq!(tracker.update_habit(&id("nope"), patch).unwrap(), None);
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn update_merges_fields() {
        let (mut tracker, _) = empty_tracker();
        let a = add(&mut tracker, "Run");

        let patch = HabitPatch {
            category: Some(Category::Work),
            name: Some("   ".to_string()),
            ..HabitPatch::default()
        };
        let updated = tracker.update_habit(&a, patch).unwrap().unwrap();

        assert_eq!(updated.category, Category::Work);
        assert_eq!(updated.name, "Run");
    }

    #[test]
    fn update_rejects_cycles_and_self_stack() {
        let (mut tracker, _) = empty_tracker();
        let a = add(&mut tracker, "A");
        let b = add(&mut tracker, "B");

        let stack_b_on_a = HabitPatch {
            stack_after: Some(Some(a.clone())),
            ..HabitPatch::default()
        };
        tracker.update_habit(&b, stack_b_on_a).unwrap();

        let stack_a_on_b = HabitPatch {
            stack_after: Some(Some(b.clone())),
            ..HabitPatch::default()
        };
        let err = tracker.update_habit(&a, stack_a_on_b).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::CycleDetected(_, _))
        ));

        let self_stack = HabitPatch {
            stack_after: Some(Some(a.clone())),
            ..HabitPatch::default()
        };
        assert!(tracker.update_habit(&a, self_stack).is_err());
        assert_eq!(tracker.get_habit(&a).unwrap().stack_after, None);
    }

    #[test]
    fn update_can_unstack() {
        let (mut tracker, _) = empty_tracker();
        let a = add(&mut tracker, "A");
        let b = tracker
            .add_habit(NewHabit::new("B", Category::Health).stack_after(a))
            .unwrap()
            .unwrap()
            .id;

        let unstack = HabitPatch {
            stack_after: Some(None),
            ..HabitPatch::default()
        };
        let updated = tracker.update_habit(&b, unstack).unwrap().unwrap();
        assert!(!updated.is_stacked());
    }

    #[test]
    fn delete_clears_stack_references_and_keeps_logs() {
        let (mut tracker, backend) = empty_tracker();
        let x = add(&mut tracker, "X");
        let y = tracker
            .add_habit(NewHabit::new("Y", Category::Health).stack_after(x.clone()))
            .unwrap()
            .unwrap()
            .id;
        tracker.toggle_log(&x, day("2024-03-01")).unwrap();

        assert!(tracker.delete_habit(&x).unwrap());

        assert!(tracker.get_habit(&x).is_none());
        assert_eq!(tracker.get_habit(&y).unwrap().stack_after, None);
        assert!(tracker.is_logged(&x, day("2024-03-01")));
        assert_eq!(backend.snapshot().habits.len(), 1);
    }

    #[test]
    fn delete_unknown_habit_is_noop() {
        let (mut tracker, backend) = empty_tracker();
        assert!(!tracker.delete_habit(&id("nope")).unwrap());
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn stack_order_through_tracker() {
        let backend = MemoryBackend::with_state(TrackerState {
            habits: vec![
                Habit::new(id("A"), "A", Category::Health),
                Habit::new(id("C"), "C", Category::Health),
                Habit::new(id("B"), "B", Category::Health).with_stack_after(id("A")),
            ],
            logs: LogBook::new(),
        });
        let tracker = Tracker::open(backend, false).unwrap();

        let order: Vec<_> = tracker
            .habits_in_stack_order()
            .iter()
            .map(|h| h.id.to_string())
            .collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn toggle_log_flips_and_persists() {
        let (mut tracker, backend) = empty_tracker();
        let h = id("h1");
        let d = day("2024-01-01");

        assert!(tracker.toggle_log(&h, d).unwrap());
        assert!(backend.snapshot().logs.is_logged(&h, d));
        assert!(!tracker.toggle_log(&h, d).unwrap());
        assert!(tracker.logs_for_date(d).is_empty());
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let (mut tracker, _) = empty_tracker();
        let calls = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            tracker.subscribe(move |state| calls.borrow_mut().push((name, state.habits.len())));
        }

        add(&mut tracker, "Walk");

        assert_eq!(
            *calls.borrow(),
            vec![("first", 1), ("second", 1), ("third", 1)]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let (mut tracker, _) = empty_tracker();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let sub = tracker.subscribe(move |_| c.set(c.get() + 1));

        tracker.toggle_log(&id("h1"), day("2024-01-01")).unwrap();
        assert!(tracker.unsubscribe(sub));
        assert!(!tracker.unsubscribe(sub));
        tracker.toggle_log(&id("h1"), day("2024-01-01")).unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn subscriber_sees_state_after_persist() {
        let (mut tracker, backend) = empty_tracker();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let b = backend.clone();
        tracker.subscribe(move |_| s.set(b.save_count()));

        tracker.toggle_log(&id("h1"), day("2024-01-01")).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn try_toggle_denies_locked_and_frozen() {
        let (mut tracker, backend) = empty_tracker();
        let parent = add(&mut tracker, "Parent");
        let child = tracker
            .add_habit(NewHabit::new("Child", Category::Health).stack_after(parent.clone()))
            .unwrap()
            .unwrap()
            .id;
        let saves = backend.save_count();
        let today = day("2024-05-10");

        assert_eq!(
            tracker.try_toggle(&child, today, today).unwrap(),
            ToggleOutcome::Denied(ToggleDecision::Locked {
                parent: parent.clone()
            })
        );
        assert_eq!(
            tracker.try_toggle(&parent, day("2024-05-01"), today).unwrap(),
            ToggleOutcome::Denied(ToggleDecision::Frozen)
        );
        assert_eq!(backend.save_count(), saves);

        tracker.try_toggle(&parent, today, today).unwrap();
        assert!(matches!(
            tracker.try_toggle(&child, today, today).unwrap(),
            ToggleOutcome::Toggled(ToggleReport { logged: true, .. })
        ));
    }

    #[test]
    fn try_toggle_reports_milestone_and_two_day_rule() {
        let (mut tracker, _) = empty_tracker();
        let h = add(&mut tracker, "Walk");
        // logs on 05-07 and 05-08 are frozen for `today`, so write them directly
        tracker.toggle_log(&h, day("2024-05-07")).unwrap();
        tracker.toggle_log(&h, day("2024-05-08")).unwrap();
        tracker.toggle_log(&h, day("2024-05-09")).unwrap();

        let today = day("2024-05-10");
        let outcome = tracker.try_toggle(&h, today, today).unwrap();
        assert_eq!(
            outcome,
            ToggleOutcome::Toggled(ToggleReport {
                logged: true,
                streak: 4,
                milestone: None,
                two_day_rule_saved: false,
            })
        );

        let g = add(&mut tracker, "Stretch");
        tracker.toggle_log(&g, day("2024-05-08")).unwrap();
        let outcome = tracker.try_toggle(&g, today, today).unwrap();
        assert_eq!(
            outcome,
            ToggleOutcome::Toggled(ToggleReport {
                logged: true,
                streak: 1,
                milestone: None,
                two_day_rule_saved: true,
            })
        );
    }

    #[test]
    fn try_toggle_warmup_milestone_only_for_today() {
        let (mut tracker, _) = empty_tracker();
        let h = add(&mut tracker, "Walk");
        let today = day("2024-05-10");
        tracker.toggle_log(&h, day("2024-05-08")).unwrap();

        // logging yesterday makes a 2-day run; not celebrated
        let outcome = tracker.try_toggle(&h, day("2024-05-09"), today).unwrap();
        assert!(matches!(
            outcome,
            ToggleOutcome::Toggled(ToggleReport { milestone: None, streak: 2, .. })
        ));

        let outcome = tracker.try_toggle(&h, today, today).unwrap();
        assert!(matches!(
            outcome,
            ToggleOutcome::Toggled(ToggleReport {
                milestone: Some(Milestone::Warmup),
                streak: 3,
                ..
            })
        ));
    }

    #[test]
    fn file_backend_roundtrip() {
        let dir = TempDir::new().unwrap();
        let d = day("2024-01-01");

        let a = {
            let mut tracker = Tracker::open(FileBackend::for_project(dir.path()), false).unwrap();
            let a = add(&mut tracker, "A");
            tracker
                .add_habit(NewHabit::new("B", Category::Work).stack_after(a.clone()))
                .unwrap();
            tracker.toggle_log(&a, d).unwrap();
            a
        };

        let tracker = Tracker::open(FileBackend::for_project(dir.path()), true).unwrap();
        assert_eq!(tracker.habits().len(), 2);
        assert_eq!(tracker.habits()[1].stack_after.as_ref(), Some(&a));
        assert!(tracker.is_logged(&a, d));
    }
}
