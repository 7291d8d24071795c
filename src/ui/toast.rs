use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    /// Background colour of the toast
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Error => "#e53935",
            Severity::Success => "#43a047",
            Severity::Info => "#1976d2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

/// Transient notifications. Each toast expires on its own timer; nothing is
/// merged, so simultaneous toasts simply stack.
#[derive(Debug, Clone)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: u64,
    duration: Duration,
}

impl ToastStack {
    pub fn new(duration: Duration) -> Self {
        Self { toasts: Vec::new(), next_id: 1, duration }
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.show_at(message, severity, Instant::now())
    }

    pub fn show_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        self.prune(now);
        tracing::debug!(id, ?severity, %message, "toast");
        self.toasts.push(Toast { id, message, severity, shown_at: now });
        id
    }

    /// Toasts still on screen at `now`, oldest first
    pub fn visible(&self, now: Instant) -> Vec<&Toast> {
        self.toasts
            .iter()
            .filter(|t| now.saturating_duration_since(t.shown_at) < self.duration)
            .collect()
    }

    /// Drop expired toasts, returning how many were dismissed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        let duration = self.duration;
        self.toasts.retain(|t| now.saturating_duration_since(t.shown_at) < duration);
        before - self.toasts.len()
    }

    /// Remove and return everything pending, expired or not
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(Duration::from_millis(4000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_stack_and_expire_independently() {
        let mut stack = ToastStack::new(Duration::from_millis(4000));
        let t0 = Instant::now();
        stack.show_at("Saved", Severity::Success, t0);
        stack.show_at("Saved", Severity::Success, t0 + Duration::from_millis(1000));
        assert_eq!(stack.visible(t0 + Duration::from_millis(1500)).len(), 2);

        assert_eq!(stack.visible(t0 + Duration::from_millis(4500)).len(), 1);
        assert_eq!(stack.prune(t0 + Duration::from_millis(4500)), 1);
        assert_eq!(stack.prune(t0 + Duration::from_millis(5000)), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_showing_a_toast_dismisses_expired_ones() {
        let mut stack = ToastStack::new(Duration::from_millis(4000));
        let t0 = Instant::now();
        for i in 0..10 {
            stack.show_at("Record updated", Severity::Success, t0 + Duration::from_millis(i * 100));
        }
        assert_eq!(stack.len(), 10);

        let id = stack.show_at("Record deleted", Severity::Success, t0 + Duration::from_millis(6000));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.drain()[0].id, id);
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Error.color(), "#e53935");
        assert_eq!(Severity::Success.color(), "#43a047");
        assert_eq!(Severity::default().color(), "#1976d2");
    }
}
