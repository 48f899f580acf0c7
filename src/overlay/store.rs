// SPDX-License-Identifier: MPL-2.0
//! The single synchronization point of the overlay.
//!
//! An ordered, newest-first sequence of toasts and the dirty flag live
//! together behind one exclusive lock. Surface construction happens
//! entirely outside the lock; only list mutation and render/hit-test reads
//! acquire it, and every critical section is short.

use super::layout::LaidOutToast;
use super::toast::{Toast, ToastId};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct StoreInner {
    /// Newest first. Order only ever changes by front-insertion or removal.
    toasts: VecDeque<Toast>,
    /// Set whenever the composited output became stale.
    dirty: bool,
    next_id: i64,
}

/// Owns all active toasts. There is no capacity bound and no automatic
/// expiry: toasts stay until the user dismisses them.
#[derive(Debug)]
pub struct ToastStore {
    inner: Mutex<StoreInner>,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                toasts: VecDeque::new(),
                dirty: false,
                next_id: 1,
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prepends a freshly laid-out toast, assigns the next id and marks the
    /// output dirty. The insertion is fully visible to subsequent lock
    /// holders before the id is returned.
    pub fn insert(&self, laid: LaidOutToast, created: Duration, link: Option<String>) -> ToastId {
        let mut inner = self.locked();
        let id = ToastId::new(inner.next_id);
        inner.next_id += 1;
        inner.toasts.push_front(Toast::new(
            id,
            laid.width,
            laid.height,
            created,
            laid.surfaces,
            link,
        ));
        inner.dirty = true;
        id
    }

    /// Removes the toast with the given id. Returns `false` (and leaves the
    /// dirty flag alone) if no such toast exists.
    pub fn remove(&self, id: ToastId) -> bool {
        let mut inner = self.locked();
        let Some(position) = inner.toasts.iter().position(|t| t.id() == id) else {
            return false;
        };
        inner.toasts.remove(position);
        inner.dirty = true;
        true
    }

    /// Runs `f` over the ordered sequence while holding the lock. Used by
    /// the compositor and the hit test; `f` must stay cheap.
    pub fn snapshot<R>(&self, f: impl FnOnce(&VecDeque<Toast>) -> R) -> R {
        f(&self.locked().toasts)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locked().toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locked().toasts.is_empty()
    }

    pub fn mark_dirty(&self) {
        self.locked().dirty = true;
    }

    /// Clears the dirty flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        let mut inner = self.locked();
        std::mem::take(&mut inner.dirty)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.locked().dirty
    }
}
