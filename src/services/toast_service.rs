use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Stack of transient notifications. Cloning shares the same stack, so one
/// instance is handed to everything that needs to notify.
#[derive(Clone, Debug)]
pub struct ToastService {
    default_duration: Duration,
    next_id: Arc<AtomicU64>,
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastService {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            default_duration,
            next_id: Arc::new(AtomicU64::new(1)),
            toasts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        self.notify_for(message, kind, self.default_duration)
    }

    pub fn notify_for(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            message: message.into(),
            kind,
            expires_at: Instant::now() + duration,
        };
        tracing::debug!(id, kind = kind.as_str(), message = %toast.message, "Toast");
        self.lock().push(toast);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, ToastKind::Error)
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Toasts still alive at `now`, oldest first. Expired ones are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Toast> {
        let mut toasts = self.lock();
        toasts.retain(|t| t.expires_at > now);
        toasts.clone()
    }

    pub fn active(&self) -> Vec<Toast> {
        self.active_at(Instant::now())
    }

    /// Removes and returns every live toast.
    pub fn drain(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut toasts = self.lock();
        toasts.drain(..).filter(|t| t.expires_at > now).collect()
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}
