//! Dependency graph built from a plan's task set and edge list.
//!
//! Edge direction follows work order: an edge from `a` to `b` means `b`
//! depends on `a`, so finishing `a` unblocks `b`. The graph is rebuilt
//! from scratch on every engine invocation and never outlives it.

use std::collections::{HashMap, VecDeque};

use crate::project::Dependency;
use crate::task::{Task, TaskId};

/// Adjacency and in-degree maps over one plan's tasks.
///
/// Lookups on ids the graph has never seen return empty defaults instead
/// of panicking.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// task -> tasks that directly depend on it.
    adj: HashMap<TaskId, Vec<TaskId>>,
    /// task -> number of direct prerequisites.
    in_degree: HashMap<TaskId, usize>,
    /// Task ids in plan order. Traversals seed from this so results are
    /// deterministic regardless of map iteration order.
    order: Vec<TaskId>,
}

impl DependencyGraph {
    /// Build the adjacency and in-degree maps.
    ///
    /// Edges naming a task outside the task set are dropped whole: a
    /// dangling reference neither creates a phantom node nor bumps a
    /// real task's in-degree.
    pub fn build(tasks: &[Task], dependencies: &[Dependency]) -> Self {
        let mut adj: HashMap<TaskId, Vec<TaskId>> = HashMap::with_capacity(tasks.len());
        let mut in_degree: HashMap<TaskId, usize> = HashMap::with_capacity(tasks.len());
        let mut order: Vec<TaskId> = Vec::with_capacity(tasks.len());

        for task in tasks {
            adj.entry(task.id).or_default();
            if in_degree.insert(task.id, 0).is_none() {
                order.push(task.id);
            }
        }

        for dep in dependencies {
            if !in_degree.contains_key(&dep.task_id) {
                continue;
            }
            let Some(dependents) = adj.get_mut(&dep.depends_on_id) else {
                continue;
            };
            dependents.push(dep.task_id);
            if let Some(degree) = in_degree.get_mut(&dep.task_id) {
                *degree += 1;
            }
        }

        Self {
            adj,
            in_degree,
            order,
        }
    }

    /// Tasks that directly depend on `id`. Empty for unknown ids.
    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        self.adj.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of direct prerequisites of `id`. Zero for unknown ids.
    pub fn in_degree_of(&self, id: TaskId) -> usize {
        self.in_degree.get(&id).copied().unwrap_or(0)
    }

    /// How many tasks `id` is blocking.
    pub fn fan_out(&self, id: TaskId) -> usize {
        self.dependents_of(id).len()
    }

    /// Task ids in plan order.
    pub fn task_ids(&self) -> &[TaskId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Working copy of the in-degree map for Kahn traversals.
    pub(crate) fn in_degrees(&self) -> HashMap<TaskId, usize> {
        self.in_degree.clone()
    }

    /// Transposed graph: every edge flipped, so a task's "dependents"
    /// become its prerequisites.
    ///
    /// Seeding a Kahn traversal from the transposed zero-in-degree nodes
    /// walks the original graph from its final tasks backwards, which is
    /// exactly what the CPM backward pass needs.
    pub fn reversed(&self) -> DependencyGraph {
        let mut adj: HashMap<TaskId, Vec<TaskId>> = HashMap::with_capacity(self.order.len());
        let mut in_degree: HashMap<TaskId, usize> = HashMap::with_capacity(self.order.len());

        for &id in &self.order {
            adj.entry(id).or_default();
            in_degree.insert(id, 0);
        }

        for &from in &self.order {
            for &to in self.dependents_of(from) {
                adj.entry(to).or_default().push(from);
                if let Some(degree) = in_degree.get_mut(&from) {
                    *degree += 1;
                }
            }
        }

        DependencyGraph {
            adj,
            in_degree,
            order: self.order.clone(),
        }
    }

    /// Kahn's algorithm reachability check.
    ///
    /// Repeatedly dequeues tasks whose prerequisites are all satisfied.
    /// If some task is never dequeued, a cycle is holding its in-degree
    /// above zero and no valid work order exists.
    pub fn has_cycle(&self) -> bool {
        let mut degrees = self.in_degrees();
        let mut queue: VecDeque<TaskId> = self
            .order
            .iter()
            .copied()
            .filter(|id| degrees.get(id) == Some(&0))
            .collect();

        let mut processed = 0usize;
        while let Some(current) = queue.pop_front() {
            processed += 1;
            for &dependent in self.dependents_of(current) {
                if let Some(degree) = degrees.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        processed != self.order.len()
    }
}
