//! Scoped transient numeric buffers.
//!
//! Training tensors, mini-batch copies and single-row inference inputs are all
//! acquired through a [`BufferTracker`]. The returned [`ScopedBuffer`] releases
//! itself on drop, so every exit path (including `?` and panics) gives the
//! allocation back. The tracker counts live buffers, which lets tests assert
//! that nothing outlives the operation that allocated it.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-session allocation counter for transient buffers.
#[derive(Debug, Clone, Default)]
pub struct BufferTracker {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    live: AtomicUsize,
    acquired: AtomicUsize,
}

impl BufferTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `value` as a tracked buffer.
    pub fn acquire<T>(&self, value: T) -> ScopedBuffer<T> {
        self.inner.live.fetch_add(1, Ordering::SeqCst);
        self.inner.acquired.fetch_add(1, Ordering::SeqCst);
        ScopedBuffer {
            value,
            counters: Arc::clone(&self.inner),
        }
    }

    /// Buffers currently alive.
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Buffers ever acquired through this tracker.
    pub fn total_acquired(&self) -> usize {
        self.inner.acquired.load(Ordering::SeqCst)
    }
}

/// A tracked buffer; released when dropped.
#[derive(Debug)]
pub struct ScopedBuffer<T> {
    value: T,
    counters: Arc<Counters>,
}

impl<T> Deref for ScopedBuffer<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for ScopedBuffer<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Drop for ScopedBuffer<T> {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}
