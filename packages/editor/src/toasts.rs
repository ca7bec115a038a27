//! Transient notifications shown after background work finishes.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// At most this many toasts are queued; older ones fall off
const MAX_TOASTS: usize = 5;

/// How long a toast stays visible
const TOAST_TTL_SECS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(TOAST_TTL_SECS)
    }
}

#[derive(Debug, Default)]
struct ToastQueue {
    toasts: VecDeque<Toast>,
    next_id: u64,
}

/// Shared toast queue. Clones push into the same queue.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    queue: Arc<Mutex<ToastQueue>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, ToastQueue> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let mut queue = self.queue();
        queue.next_id += 1;
        let toast = Toast {
            id: queue.next_id,
            kind,
            message: message.into(),
            created_at: Utc::now(),
        };

        queue.toasts.push_back(toast);
        while queue.toasts.len() > MAX_TOASTS {
            queue.toasts.pop_front();
        }
        queue.next_id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    pub fn dismiss(&self, id: u64) {
        self.queue().toasts.retain(|toast| toast.id != id);
    }

    /// Toasts still visible at `now`, dropping expired ones
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut queue = self.queue();
        queue.toasts.retain(|toast| toast.expires_at() > now);
        queue.toasts.iter().cloned().collect()
    }

    /// Take everything queued
    pub fn drain(&self) -> Vec<Toast> {
        self.queue().toasts.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
