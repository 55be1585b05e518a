use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// How long a toast stays up unless dismissed
pub const DEFAULT_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: DateTime<Utc>,
}

impl Toast {
    /// Style class; errors use the danger palette
    pub fn css_class(&self) -> String {
        match self.kind {
            ToastKind::Error => "bg-danger".to_string(),
            kind => format!("bg-{}", kind),
        }
    }
}

/// Transient messages, oldest first
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) -> Uuid {
        self.show_at(message, kind, Utc::now())
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: ToastKind, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.push_back(Toast {
            id,
            message: message.into(),
            kind,
            shown_at: now,
        });
        id
    }

    /// Remove one toast; returns whether it was still shown
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drop toasts older than the TTL and return them
    pub fn expire(&mut self, now: DateTime<Utc>) -> Vec<Toast> {
        let ttl = self.ttl;
        let (expired, kept): (Vec<_>, Vec<_>) =
            self.toasts.drain(..).partition(|t| now - t.shown_at >= ttl);
        self.toasts = kept.into();
        expired
    }

    pub fn active(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
