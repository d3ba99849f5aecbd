//! Per-instance queue of delayed actions.
//!
//! Stands in for `setTimeout` chains: an engine schedules an action with a
//! due time and the host later calls the engine's `advance(now)`, which pops
//! due actions one at a time in `(due, insertion)` order. Popping one at a
//! time lets an action schedule a follow-up that is itself already due.

use crate::exercise_engine::timer::Millis;

#[derive(Debug, Clone)]
struct Scheduled<A> {
    due: Millis,
    seq: u64,
    action: A,
}

#[derive(Debug, Clone)]
pub struct Deferred<A> {
    queue: Vec<Scheduled<A>>,
    seq: u64,
}

impl<A> Default for Deferred<A> {
    fn default() -> Self {
        Deferred { queue: Vec::new(), seq: 0 }
    }
}

impl<A> Deferred<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Millis, action: A) {
        self.seq += 1;
        self.queue.push(Scheduled { due, seq: self.seq, action });
    }

    /// Remove and return the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, A)> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i)?;
        let s = self.queue.swap_remove(idx);
        Some((s.due, s.action))
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.iter().map(|s| s.due).min()
    }

    /// Drop every pending action; returns how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_then_insertion_order() {
        let mut q = Deferred::new();
        q.schedule(300, "c");
        q.schedule(100, "a");
        q.schedule(100, "b");
        assert_eq!(q.pop_due(50), None);
        assert_eq!(q.pop_due(1000), Some((100, "a")));
        assert_eq!(q.pop_due(1000), Some((100, "b")));
        assert_eq!(q.next_due(), Some(300));
        assert_eq!(q.pop_due(299), None);
        assert_eq!(q.pop_due(300), Some((300, "c")));
        assert!(q.is_empty());
    }

    #[test]
    fn clear_cancels_everything() {
        let mut q = Deferred::new();
        q.schedule(10, 1);
        q.schedule(20, 2);
        assert_eq!(q.clear(), 2);
        assert_eq!(q.pop_due(u64::MAX), None);
        assert_eq!(q.len(), 0);
    }
}
