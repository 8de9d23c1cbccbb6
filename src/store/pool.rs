//! Shared page-buffer pool.
//!
//! File-backed containers allocate page buffers constantly while their LRU
//! cache churns. A `BufferPool` lets callers share those allocations across
//! containers and across builds. The pool itself is internally synchronized;
//! each buffer is owned by exactly one page while checked out.

use std::sync::Mutex;

/// Default number of buffers a pool retains before dropping returns.
const DEFAULT_CAPACITY: usize = 64;

/// A synchronized pool of page buffers.
pub struct BufferPool {
    capacity: usize,
    bufs: Mutex<Vec<Box<[u8]>>>,
}

impl BufferPool {
    /// Create a pool retaining up to `capacity` buffers.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            bufs: Mutex::new(Vec::new()),
        }
    }

    /// Take a zeroed buffer of exactly `size` bytes, recycling a pooled one
    /// when available.
    pub fn acquire(&self, size: usize) -> Box<[u8]> {
        let mut bufs = self.bufs.lock().unwrap();
        if let Some(i) = bufs.iter().position(|b| b.len() == size) {
            let mut buf = bufs.swap_remove(i);
            drop(bufs);
            buf.fill(0);
            return buf;
        }
        drop(bufs);
        vec![0u8; size].into_boxed_slice()
    }

    /// Return a buffer to the pool. Dropped silently once the pool is full.
    pub fn release(&self, buf: Box<[u8]>) {
        let mut bufs = self.bufs.lock().unwrap();
        if bufs.len() < self.capacity {
            bufs.push(buf);
        }
    }

    /// Number of buffers currently parked in the pool.
    pub fn idle(&self) -> usize {
        self.bufs.lock().unwrap().len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .finish()
    }
}
