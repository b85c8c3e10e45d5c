// core/schedule.rs
//
// Cooperative timers keyed by the entity they act on.
// Replaces fire-and-forget delayed callbacks: when the popup switches to a
// new attack, the old dismissal is cancelled by key instead of firing late
// and hiding the wrong popup.
//
// Usage:
//   let mut tasks = TaskScheduler::new();
//   tasks.schedule(TaskKey::Popup(id), 5.0, TaskAction::DismissPopup(id));
//   for action in tasks.advance(dt) { ... }   // apply with staleness checks

use std::collections::HashMap;
use crate::api::types::AttackId;

/// What a task is about. At most one task exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// Auto-dismissal of the popup showing this attack.
    Popup(AttackId),
    /// Periodic pull of display statistics.
    StatsRefresh,
}

/// What to do when a task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    DismissPopup(AttackId),
    RefreshStats,
}

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u32);

#[derive(Debug, Clone)]
struct Task {
    key: TaskKey,
    /// Seconds until the next firing.
    remaining: f32,
    /// Re-arm interval for periodic tasks.
    repeat: Option<f32>,
    action: TaskAction,
}

/// Owns all pending timers. Advanced once per tick by the frame driver.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    tasks: HashMap<TaskId, Task>,
    next_id: u32,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot task. An existing task with the same key is replaced.
    pub fn schedule(&mut self, key: TaskKey, delay: f32, action: TaskAction) -> TaskId {
        self.insert(key, delay, None, action)
    }

    /// Schedule a task that fires every `interval` seconds until cancelled.
    pub fn schedule_repeating(&mut self, key: TaskKey, interval: f32, action: TaskAction) -> TaskId {
        let interval = interval.max(1e-3);
        self.insert(key, interval, Some(interval), action)
    }

    fn insert(&mut self, key: TaskKey, delay: f32, repeat: Option<f32>, action: TaskAction) -> TaskId {
        self.cancel_key(key);
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tasks.insert(id, Task {
            key,
            remaining: delay.max(0.0),
            repeat,
            action,
        });
        id
    }

    /// Cancel a task by handle. Cancelling twice is a no-op.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Cancel whatever is scheduled under `key`. Returns how many tasks were dropped.
    pub fn cancel_key(&mut self, key: TaskKey) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, t| t.key != key);
        before - self.tasks.len()
    }

    pub fn contains_key(&self, key: TaskKey) -> bool {
        self.tasks.values().any(|t| t.key == key)
    }

    /// Advance all timers and return the actions that came due, oldest task first.
    /// A periodic task fires at most once per call.
    pub fn advance(&mut self, dt: f32) -> Vec<TaskAction> {
        let mut due: Vec<TaskId> = Vec::new();
        for (&id, task) in self.tasks.iter_mut() {
            task.remaining -= dt;
            if task.remaining <= 0.0 {
                due.push(id);
            }
        }
        due.sort();

        let mut fired = Vec::with_capacity(due.len());
        for id in due {
            let Some(task) = self.tasks.get_mut(&id) else { continue };
            fired.push(task.action);
            match task.repeat {
                Some(interval) => task.remaining = interval,
                None => {
                    self.tasks.remove(&id);
                }
            }
        }
        fired
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every task. Idempotent; used on teardown.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
