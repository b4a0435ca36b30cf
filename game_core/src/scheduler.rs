//! Tick-driven timer scheduler
//!
//! Timers are plain values handed back to the caller when due; nothing runs
//! on its own. The owner drains due timers once per tick with
//! [`Scheduler::pop_due`], which makes firing order and cancellation
//! deterministic.

/// Delays and intervals are clamped to at least this many milliseconds
const MIN_INTERVAL_MS: f64 = 1.0;

/// Cancel token for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: TimerHandle,
    due: f64,
    interval: Option<f64>,
    timer: T,
}

/// Millisecond clock with one-shot and repeating timers
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: f64,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Current scheduler time in milliseconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire `timer` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: f64, timer: T) -> TimerHandle {
        self.insert(self.now + delay_ms.max(MIN_INTERVAL_MS), None, timer)
    }

    /// Fire `timer` every `interval_ms`, first after one interval
    pub fn schedule_repeating(&mut self, interval_ms: f64, timer: T) -> TimerHandle {
        let interval = interval_ms.max(MIN_INTERVAL_MS);
        self.insert(self.now + interval, Some(interval), timer)
    }

    fn insert(&mut self, due: f64, interval: Option<f64>, timer: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due,
            interval,
            timer,
        });
        handle
    }

    /// Cancel one timer; false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Cancel everything; safe to call with nothing scheduled
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the earliest timer due at or before `deadline`
    ///
    /// The clock moves to the timer's due time, so anything scheduled while
    /// handling it is measured from when it was due. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, deadline: f64) -> Option<(TimerHandle, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= deadline)
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.handle.cmp(&b.handle))
            })
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        let fired = (entry.handle, entry.timer);
        self.now = self.now.max(entry.due);

        match entry.interval {
            Some(interval) => entry.due += interval,
            None => {
                self.entries.remove(idx);
            }
        }

        Some(fired)
    }

    /// Move the clock to `deadline` once every due timer has been taken
    pub fn settle(&mut self, deadline: f64) {
        self.now = self.now.max(deadline);
    }

    /// Drain every timer due within `dt_ms` and advance the clock
    pub fn advance(&mut self, dt_ms: f64) -> Vec<(TimerHandle, T)> {
        let deadline = self.now + dt_ms;
        let mut fired = Vec::new();
        while let Some(due) = self.pop_due(deadline) {
            fired.push(due);
        }
        self.settle(deadline);
        fired
    }
}

impl<T: Copy> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        A,
        B,
    }

    #[test]
    fn test_once_fires_once() {
        let mut s = Scheduler::new();
        s.schedule_once(100.0, Tag::A);
        assert!(s.advance(99.0).is_empty());
        assert_eq!(s.advance(1.0).len(), 1);
        assert!(s.advance(1000.0).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_repeating_catches_up_in_one_advance() {
        let mut s = Scheduler::new();
        s.schedule_repeating(100.0, Tag::A);
        let fired = s.advance(350.0);
        assert_eq!(fired.len(), 3);
        assert_eq!(s.advance(50.0).len(), 1);
    }

    #[test]
    fn test_order_is_by_due_then_schedule() {
        let mut s = Scheduler::new();
        let b = s.schedule_once(50.0, Tag::B);
        let a = s.schedule_once(20.0, Tag::A);
        let b2 = s.schedule_once(50.0, Tag::A);
        let fired: Vec<_> = s.advance(60.0).into_iter().map(|(h, _)| h).collect();
        assert_eq!(fired, vec![a, b, b2]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let h = s.schedule_repeating(10.0, Tag::A);
        assert!(s.is_pending(h));
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(s.advance(100.0).is_empty());
    }

    #[test]
    fn test_cancel_all_is_repeatable() {
        let mut s = Scheduler::new();
        s.schedule_once(10.0, Tag::A);
        s.schedule_repeating(10.0, Tag::B);
        assert_eq!(s.cancel_all(), 2);
        assert_eq!(s.cancel_all(), 0);
        assert!(s.advance(100.0).is_empty());
    }

    #[test]
    fn test_reschedule_from_due_time() {
        let mut s = Scheduler::new();
        s.schedule_once(100.0, Tag::A);
        // Handle the first firing 30ms late within one big step
        let deadline = s.now() + 130.0;
        let (_, tag) = s.pop_due(deadline).unwrap();
        assert_eq!(tag, Tag::A);
        assert_eq!(s.now(), 100.0);
        s.schedule_once(20.0, Tag::B);
        let (_, tag) = s.pop_due(deadline).unwrap();
        assert_eq!(tag, Tag::B);
        assert!(s.pop_due(deadline).is_none());
        s.settle(deadline);
        assert_eq!(s.now(), 130.0);
    }

    #[test]
    fn test_self_rescheduling_zero_delay_terminates() {
        let mut s = Scheduler::new();
        s.schedule_once(0.0, Tag::A);
        let deadline = s.now() + 10.0;
        let mut fired = 0;
        while let Some((_, tag)) = s.pop_due(deadline) {
            fired += 1;
            s.schedule_once(0.0, tag);
            assert!(fired <= 10, "timer kept firing within one step");
        }
        assert_eq!(fired, 10);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut s = Scheduler::new();
        s.schedule_repeating(0.0, Tag::A);
        assert_eq!(s.advance(10.0).len(), 10);
    }
}
