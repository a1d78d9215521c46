//! Habit stacking graph
//!
//! A habit stacked after another forms an edge `parent -> child`. The graph
//! validates new edges (no self-stacking, no unknown parents, no cycles) and
//! answers dependents queries. Ordering for display lives in [`stack_order`],
//! which tolerates whatever links are already persisted.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::habit::Habit;
use super::id::HabitId;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Stacking would create a cycle: {0} -> {1}")]
    CycleDetected(HabitId, HabitId),

    #[error("Habit not found: {0}")]
    HabitNotFound(HabitId),

    #[error("A habit cannot be stacked after itself: {0}")]
    SelfStack(HabitId),
}

/// Directed graph of stacking links
#[derive(Debug, Default)]
pub struct StackGraph {
    graph: DiGraph<HabitId, ()>,
    node_map: HashMap<HabitId, NodeIndex>,
}

impl StackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from habits, skipping links to habits that don't exist
    pub fn from_habits<'a>(habits: impl IntoIterator<Item = &'a Habit>) -> Self {
        let mut graph = Self::new();

        let habits: Vec<_> = habits.into_iter().collect();
        for habit in &habits {
            graph.add_habit(habit.id.clone());
        }

        for habit in &habits {
            if let Some(parent) = &habit.stack_after {
                let parent_idx = graph.node_map.get(parent);
                let child_idx = graph.node_map.get(&habit.id);
                if let (Some(&p), Some(&c)) = (parent_idx, child_idx) {
                    graph.graph.add_edge(p, c, ());
                }
            }
        }

        graph
    }

    pub fn add_habit(&mut self, habit_id: HabitId) {
        if !self.node_map.contains_key(&habit_id) {
            let idx = self.graph.add_node(habit_id.clone());
            self.node_map.insert(habit_id, idx);
        }
    }

    /// Checks that `child` may be stacked after `parent`
    ///
    /// Existing edges into `child` are ignored, since stacking replaces them.
    pub fn validate_stack(&self, child: &HabitId, parent: &HabitId) -> Result<(), GraphError> {
        if child == parent {
            return Err(GraphError::SelfStack(child.clone()));
        }

        let child_idx = self
            .node_map
            .get(child)
            .ok_or_else(|| GraphError::HabitNotFound(child.clone()))?;

        let parent_idx = self
            .node_map
            .get(parent)
            .ok_or_else(|| GraphError::HabitNotFound(parent.clone()))?;

        // parent -> child closes a cycle iff child already reaches parent
        if has_path_connecting(&self.graph, *child_idx, *parent_idx, None) {
            return Err(GraphError::CycleDetected(child.clone(), parent.clone()));
        }

        Ok(())
    }

    /// Habits stacked directly after `habit_id`
    pub fn dependents(&self, habit_id: &HabitId) -> Vec<HabitId> {
        let idx = match self.node_map.get(habit_id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut ids: Vec<_> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        ids.sort();
        ids
    }
}

/// A habit in display order, with whether it hangs directly off the previous row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedHabit<'a> {
    pub habit: &'a Habit,
    pub chained: bool,
}

/// Orders habits so each root is followed by its stacked chain
///
/// Roots keep collection order; each is followed depth-first by the habits
/// stacked after it (siblings in collection order). Habits that never get
/// reached - dangling parents, cycles - come last in collection order. Every
/// habit appears exactly once.
pub fn stack_order(habits: &[Habit]) -> Vec<&Habit> {
    let mut result = Vec::with_capacity(habits.len());
    let mut visited: HashSet<&HabitId> = HashSet::with_capacity(habits.len());

    for root in habits.iter().filter(|h| h.stack_after.is_none()) {
        let mut stack = vec![root];
        while let Some(habit) = stack.pop() {
            if !visited.insert(&habit.id) {
                continue;
            }
            result.push(habit);

            let children = habits
                .iter()
                .filter(|h| h.stack_after.as_ref() == Some(&habit.id));
            stack.extend(children.rev());
        }
    }

    for habit in habits {
        if visited.insert(&habit.id) {
            result.push(habit);
        }
    }

    result
}

/// [`stack_order`] annotated with chain markers
pub fn stacked_rows(habits: &[Habit]) -> Vec<StackedHabit<'_>> {
    let ordered = stack_order(habits);
    let mut rows = Vec::with_capacity(ordered.len());
    let mut prev: Option<&HabitId> = None;

    for habit in ordered {
        let chained = habit.stack_after.is_some() && habit.stack_after.as_ref() == prev;
        rows.push(StackedHabit { habit, chained });
        prev = Some(&habit.id);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::habit::Category;

    fn id(s: &str) -> HabitId {
        s.parse().unwrap()
    }

    fn root(s: &str) -> Habit {
        Habit::new(id(s), s, Category::Health)
    }

    fn stacked(s: &str, parent: &str) -> Habit {
        root(s).with_stack_after(id(parent))
    }

    fn ids(order: &[&Habit]) -> Vec<String> {
        order.iter().map(|h| h.id.to_string()).collect()
    }

    #[test]
    fn dependent_follows_its_root() {
        let habits = vec![root("A"), root("C"), stacked("B", "A")];
        assert_eq!(ids(&stack_order(&habits)), vec!["A", "B", "C"]);
    }

    #[test]
    fn chains_are_depth_first() {
        let habits = vec![
            root("A"),
            stacked("A2", "A"),
            root("B"),
            stacked("A1", "A"),
            stacked("A1x", "A1"),
        ];
        assert_eq!(
            ids(&stack_order(&habits)),
            vec!["A", "A2", "A1", "A1x", "B"]
        );
    }

    #[test]
    fn broken_links_go_last() {
        let habits = vec![stacked("X", "missing"), root("A"), stacked("Y", "X")];
        assert_eq!(ids(&stack_order(&habits)), vec!["A", "X", "Y"]);
    }

    #[test]
    fn cycles_appear_once() {
        let habits = vec![stacked("A", "B"), stacked("B", "A"), root("C"), stacked("S", "S")];
        let order = stack_order(&habits);
        assert_eq!(ids(&order), vec!["C", "A", "B", "S"]);
    }

    #[test]
    fn empty_input() {
        assert!(stack_order(&[]).is_empty());
    }

    #[test]
    fn rows_mark_chained_habits() {
        let habits = vec![root("A"), stacked("B", "A"), stacked("C", "A"), root("D")];
        let rows = stacked_rows(&habits);
        let chained: Vec<_> = rows.iter().map(|r| r.chained).collect();

        // C is stacked on A but follows B, so it is not drawn as chained
        assert_eq!(chained, vec![false, true, false, false]);
    }

    #[test]
    fn validate_accepts_plain_stack() {
        let habits = vec![root("A"), root("B")];
        let graph = StackGraph::from_habits(&habits);
        assert_eq!(graph.validate_stack(&id("B"), &id("A")), Ok(()));
    }

    #[test]
    fn validate_rejects_self_stack() {
        let habits = vec![root("A")];
        let graph = StackGraph::from_habits(&habits);
        assert_eq!(
            graph.validate_stack(&id("A"), &id("A")),
            Err(GraphError::SelfStack(id("A")))
        );
    }

    #[test]
    fn validate_rejects_unknown_parent() {
        let habits = vec![root("A")];
        let graph = StackGraph::from_habits(&habits);
        assert_eq!(
            graph.validate_stack(&id("A"), &id("Z")),
            Err(GraphError::HabitNotFound(id("Z")))
        );
    }

    #[test]
    fn validate_rejects_cycle() {
        let habits = vec![root("A"), stacked("B", "A"), stacked("C", "B")];
        let graph = StackGraph::from_habits(&habits);

        assert!(matches!(
            graph.validate_stack(&id("A"), &id("C")),
            Err(GraphError::CycleDetected(_, _))
        ));
        // restacking within the chain is fine
        assert_eq!(graph.validate_stack(&id("C"), &id("A")), Ok(()));
    }

    #[test]
    fn from_habits_skips_dangling_links() {
        let habits = vec![stacked("A", "gone"), stacked("B", "A")];
        let graph = StackGraph::from_habits(&habits);

        assert_eq!(
            graph.validate_stack(&id("B"), &id("gone")),
            Err(GraphError::HabitNotFound(id("gone")))
        );
        assert_eq!(graph.dependents(&id("A")), vec![id("B")]);
        assert!(graph.dependents(&id("gone")).is_empty());
    }
}
