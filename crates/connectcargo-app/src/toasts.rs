//! Shared toast queue for a session

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use connectcargo_domain::notifier::{Notifier, Toast};
use connectcargo_types::Severity;
use uuid::Uuid;

/// Thread-safe wrapper over the domain `Notifier`, reading time from tokio so
/// paused-clock tests stay deterministic.
pub struct ToastCenter {
    notifier: Mutex<Notifier>,
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

impl ToastCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            notifier: Mutex::new(Notifier::new(capacity)),
        }
    }

    fn notifier(&self) -> MutexGuard<'_, Notifier> {
        // a panic while holding the lock leaves the queue usable
        self.notifier
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%severity, %message, "toast");
        if let Some(dropped) = self.notifier().push(severity, message, now()) {
            tracing::warn!(
                severity = %dropped.severity,
                message = %dropped.message,
                "toast queue full, dropped"
            );
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        self.notifier().dismiss(id, now())
    }

    /// Expire due toasts; returns what expired
    pub fn tick(&self) -> Vec<Toast> {
        self.notifier().tick(now())
    }

    pub fn visible(&self) -> Option<Toast> {
        self.notifier().visible().cloned()
    }

    /// Visible toast first, then the queue in display order
    pub fn snapshot(&self) -> Vec<Toast> {
        let notifier = self.notifier();
        notifier
            .visible()
            .into_iter()
            .chain(notifier.pending())
            .cloned()
            .collect()
    }

    /// Take every toast, leaving the queue empty
    pub fn drain(&self) -> Vec<Toast> {
        let mut notifier = self.notifier();
        let toasts: Vec<Toast> = notifier
            .visible()
            .into_iter()
            .chain(notifier.pending())
            .cloned()
            .collect();
        for toast in &toasts {
            notifier.dismiss(toast.id, now());
        }
        toasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_on_tokio_clock() {
        let center = ToastCenter::new(4);
        center.success("¡Carga aceptada!");
        center.error("No se pudo aceptar la carga");

        tokio::time::advance(Duration::from_secs(3)).await;
        let expired = center.tick();
        assert_eq!(expired.len(), 1);
        assert_eq!(center.visible().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_drain_empties_in_display_order() {
        let center = ToastCenter::new(4);
        center.info("Aceptando viaje...");
        center.success("ok");
        center.error("fallo");

        let messages: Vec<String> = center.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["Aceptando viaje...", "fallo", "ok"]);
        assert!(center.snapshot().is_empty());
    }
}
