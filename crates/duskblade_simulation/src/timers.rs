//! Deferred actions advanced once per tick.
//!
//! Replaces engine coroutines / delayed invokes: the owner keeps a
//! `ScheduledTasks<A>` and feeds it `dt` every tick. Tasks are never
//! cancelled individually; they disappear together with their owner.

/// One pending action with its remaining delay (seconds).
#[derive(Debug, Clone, PartialEq)]
struct ScheduledTask<A> {
    remaining: f32,
    action: A,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTasks<A> {
    tasks: Vec<ScheduledTask<A>>,
}

impl<A> Default for ScheduledTasks<A> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<A> ScheduledTasks<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire after `delay` seconds (negative delay = next advance).
    pub fn schedule(&mut self, delay: f32, action: A) {
        self.tasks.push(ScheduledTask {
            remaining: delay.max(0.0),
            action,
        });
    }

    /// Advance every task by `dt` and return the actions that became due.
    ///
    /// Due actions come out ordered by how overdue they are (earliest first);
    /// ties keep scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        for task in self.tasks.iter_mut() {
            task.remaining -= dt;
        }

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| task.remaining <= 0.0);
        self.tasks = pending;

        // Stable sort: equal remaining keeps insertion order
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter().map(|task| task.action).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_in_due_order() {
        let mut tasks = ScheduledTasks::new();
        tasks.schedule(0.5, "late");
        tasks.schedule(0.25, "early");
        tasks.schedule(1.0, "never");

        assert!(tasks.advance(0.125).is_empty());
        assert_eq!(tasks.advance(0.5), vec!["early", "late"]);
        assert_eq!(tasks.len(), 1);

        // Already fired actions do not come back
        assert!(tasks.advance(0.25).is_empty());
        assert_eq!(tasks.advance(0.25), vec!["never"]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut tasks = ScheduledTasks::new();
        tasks.schedule(0.0, 1);
        tasks.schedule(-3.0, 2);
        assert_eq!(tasks.advance(0.0), vec![1, 2]);
    }

    #[test]
    fn test_many_tasks_keep_order() {
        let mut tasks = ScheduledTasks::new();
        for i in 0..100 {
            tasks.schedule((i % 10) as f32, i);
        }

        let first = tasks.advance(0.0);
        assert_eq!(first, (0..100).step_by(10).collect::<Vec<_>>());
        assert_eq!(tasks.len(), 90);

        // Overdue by different amounts: most overdue first, ties by scheduling order
        let second = tasks.advance(2.0);
        let expected: Vec<i32> = (1..100)
            .step_by(10)
            .chain((2..100).step_by(10))
            .collect();
        assert_eq!(second, expected);
        assert_eq!(tasks.len(), 70);
    }
}
