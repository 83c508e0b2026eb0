//! Toast notification queue
//!
//! One toast is visible at a time. Later toasts wait in a bounded queue
//! ordered by severity priority (error, warning, success, info) and by
//! arrival within the same priority. Time is passed in by the caller.

use std::time::{Duration, Instant};

use connectcargo_types::Severity;
use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_CAPACITY: usize = 16;

/// Display time for a severity
pub fn ttl_for(severity: Severity) -> Duration {
    match severity {
        Severity::Success | Severity::Info => Duration::from_secs(3),
        Severity::Warning | Severity::Error => Duration::from_secs(5),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    #[serde(skip)]
    pub shown_at: Option<Instant>,
    #[serde(skip)]
    pub ttl: Duration,
    #[serde(skip)]
    seq: u64,
}

impl Toast {
    pub fn color(&self) -> &'static str {
        self.severity.color()
    }

    pub fn icon(&self) -> &'static str {
        self.severity.icon()
    }

    fn expires_at(&self) -> Option<Instant> {
        self.shown_at.map(|at| at + self.ttl)
    }
}

#[derive(Debug)]
pub struct Notifier {
    visible: Option<Toast>,
    queue: Vec<Toast>,
    capacity: usize,
    next_seq: u64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    /// `capacity` bounds the waiting toasts, not counting the visible one
    pub fn new(capacity: usize) -> Self {
        Self {
            visible: None,
            queue: Vec::new(),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    /// Queue a toast. Returns the toast dropped to make room, if any.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) -> Option<Toast> {
        let toast = Toast {
            id: Uuid::new_v4(),
            severity,
            message: message.into(),
            shown_at: None,
            ttl: ttl_for(severity),
            seq: self.next_seq,
        };
        self.next_seq += 1;

        if self.visible.is_none() {
            self.show(toast, now);
            return None;
        }

        self.queue.push(toast);
        if self.queue.len() > self.capacity {
            return self.drop_lowest();
        }
        None
    }

    /// Close a toast by id, visible or waiting
    pub fn dismiss(&mut self, id: Uuid, now: Instant) -> bool {
        if self.visible.as_ref().is_some_and(|t| t.id == id) {
            self.visible = None;
            self.promote(now);
            return true;
        }
        match self.queue.iter().position(|t| t.id == id) {
            Some(index) => {
                self.queue.remove(index);
                true
            }
            None => false,
        }
    }

    /// Expire the visible toast when its time is up and show the next one.
    /// Returns the expired toasts, oldest first.
    pub fn tick(&mut self, now: Instant) -> Vec<Toast> {
        let mut expired = Vec::new();
        while let Some(expires_at) = self.visible.as_ref().and_then(Toast::expires_at) {
            if expires_at > now {
                break;
            }
            if let Some(toast) = self.visible.take() {
                expired.push(toast);
            }
            self.promote(expires_at);
        }
        expired
    }

    pub fn visible(&self) -> Option<&Toast> {
        self.visible.as_ref()
    }

    /// Waiting toasts in the order they will be shown
    pub fn pending(&self) -> Vec<&Toast> {
        let mut waiting: Vec<&Toast> = self.queue.iter().collect();
        waiting.sort_by(|a, b| {
            b.severity
                .priority()
                .cmp(&a.severity.priority())
                .then(a.seq.cmp(&b.seq))
        });
        waiting
    }

    pub fn is_idle(&self) -> bool {
        self.visible.is_none() && self.queue.is_empty()
    }

    fn show(&mut self, mut toast: Toast, now: Instant) {
        toast.shown_at = Some(now);
        self.visible = Some(toast);
    }

    fn promote(&mut self, now: Instant) {
        let next = self
            .queue
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.severity
                    .priority()
                    .cmp(&b.severity.priority())
                    .then(b.seq.cmp(&a.seq))
            })
            .map(|(index, _)| index);

        if let Some(index) = next {
            let toast = self.queue.remove(index);
            self.show(toast, now);
        }
    }

    /// Remove the oldest toast of the lowest priority
    fn drop_lowest(&mut self) -> Option<Toast> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.severity
                    .priority()
                    .cmp(&b.severity.priority())
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(index, _)| index)?;
        Some(self.queue.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(n: &Notifier) -> Vec<String> {
        n.pending().iter().map(|t| t.message.clone()).collect()
    }

    #[test]
    fn test_first_toast_shown_immediately() {
        let now = Instant::now();
        let mut n = Notifier::default();
        assert!(n.push(Severity::Success, "¡Carga aceptada!", now).is_none());

        let toast = n.visible().unwrap();
        assert_eq!(toast.message, "¡Carga aceptada!");
        assert_eq!(toast.color(), "#10B981");
        assert_eq!(toast.ttl, Duration::from_secs(3));
        assert!(n.pending().is_empty());
    }

    #[test]
    fn test_queue_orders_by_priority_then_arrival() {
        let now = Instant::now();
        let mut n = Notifier::default();
        n.push(Severity::Info, "visible", now);
        n.push(Severity::Info, "info", now);
        n.push(Severity::Success, "success", now);
        n.push(Severity::Error, "error 1", now);
        n.push(Severity::Warning, "warning", now);
        n.push(Severity::Error, "error 2", now);

        assert_eq!(n.visible().unwrap().message, "visible");
        assert_eq!(
            messages(&n),
            vec!["error 1", "error 2", "warning", "success", "info"]
        );
    }

    #[test]
    fn test_tick_expires_and_promotes() {
        let start = Instant::now();
        let mut n = Notifier::default();
        n.push(Severity::Success, "first", start);
        n.push(Severity::Error, "second", start);

        assert!(n.tick(start + Duration::from_secs(2)).is_empty());
        assert_eq!(n.visible().unwrap().message, "first");

        let expired = n.tick(start + Duration::from_secs(3));
        assert_eq!(expired.len(), 1);
        let second = n.visible().unwrap();
        assert_eq!(second.message, "second");
        assert_eq!(second.shown_at, Some(start + Duration::from_secs(3)));

        // error stays 5 s from when it was shown
        assert!(n.tick(start + Duration::from_secs(7)).is_empty());
        assert_eq!(n.tick(start + Duration::from_secs(8)).len(), 1);
        assert!(n.is_idle());
    }

    #[test]
    fn test_tick_catches_up_over_several_toasts() {
        let start = Instant::now();
        let mut n = Notifier::default();
        n.push(Severity::Info, "a", start);
        n.push(Severity::Info, "b", start);
        n.push(Severity::Info, "c", start);

        let expired = n.tick(start + Duration::from_secs(7));
        let names: Vec<_> = expired.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(n.visible().unwrap().message, "c");
    }

    #[test]
    fn test_dismiss() {
        let now = Instant::now();
        let mut n = Notifier::default();
        n.push(Severity::Warning, "visible", now);
        n.push(Severity::Info, "waiting", now);
        let waiting_id = n.pending()[0].id;
        let visible_id = n.visible().unwrap().id;

        assert!(n.dismiss(visible_id, now));
        assert_eq!(n.visible().unwrap().id, waiting_id);
        assert!(!n.dismiss(visible_id, now));
        assert!(n.dismiss(waiting_id, now));
        assert!(n.is_idle());
    }

    #[test]
    fn test_full_queue_drops_oldest_lowest_priority() {
        let now = Instant::now();
        let mut n = Notifier::new(2);
        n.push(Severity::Error, "visible", now);
        n.push(Severity::Info, "old info", now);
        n.push(Severity::Info, "new info", now);

        let dropped = n.push(Severity::Error, "urgent", now).unwrap();
        assert_eq!(dropped.message, "old info");
        assert_eq!(messages(&n), vec!["urgent", "new info"]);

        // a new lowest-priority toast is itself dropped when older ones outrank it
        n.push(Severity::Warning, "warn", now);
        assert_eq!(messages(&n), vec!["urgent", "warn"]);
        let dropped = n.push(Severity::Info, "late info", now).unwrap();
        assert_eq!(dropped.message, "late info");
    }
}
