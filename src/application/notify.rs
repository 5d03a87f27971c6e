//! Toast-style notifications.
//!
//! Notices are a side channel: they report what happened to the user and
//! never drive control flow. Callers that must react to a failure rely on the
//! returned `Result` where an operation documents one.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

use crate::util::lock::mutex_lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Emits toasts as log events only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => info!(target: "postdesk::toast", text = %toast.text, "toast"),
            ToastKind::Error => warn!(target: "postdesk::toast", text = %toast.text, "toast"),
        }
    }
}

/// Collects toasts so a front end can render them after an action completes.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every toast collected so far.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *mutex_lock(
            &self.toasts,
            "application::notify",
            "drain",
        ))
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        mutex_lock(&self.toasts, "application::notify", "snapshot").clone()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        TracingNotifier.notify(toast.clone());
        mutex_lock(&self.toasts, "application::notify", "notify").push(toast);
    }
}
