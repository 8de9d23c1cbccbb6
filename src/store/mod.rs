//! Paged, optionally file-backed storage containers.
//!
//! The algorithms in [`crate::index`] never touch memory directly; they go
//! through these containers, so a build can transparently spill to disk:
//!
//! - [`ValueArray`] - fixed-width unsigned integers
//! - [`BitVector`] - single bits
//! - [`BufferPool`] - shared page buffers, reusable across builds
//! - [`StoreConfig`] - page size, spill threshold, pool
//!
//! Each container lives in one of three backings chosen at creation time:
//! a single memory allocation, an LRU page cache over a file (an explicit
//! one or an anonymous temp file), or a read-only memory mapping.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod bit_vector;
mod paged;
mod pool;
mod value_array;

pub use bit_vector::{BitIter, BitVector};
pub use pool::BufferPool;
pub use value_array::{ValueArray, ValueIter};

/// Default page granularity: 64 KiB.
pub const DEFAULT_PAGE_SIZE: usize = 64 * 1024;

/// Build-wide container options, shared by every array a build creates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Page granularity in bytes for file-backed containers.
    pub page_size: usize,
    /// Byte size at or above which a container spills to a file; `None`
    /// keeps everything in memory, `Some(0)` forces everything onto disk.
    pub on_disk_threshold: Option<u64>,
    /// Shared page-buffer pool.
    #[serde(skip)]
    pub pool: Option<Arc<BufferPool>>,
}

impl StoreConfig {
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn on_disk_threshold(mut self, bytes: u64) -> Self {
        self.on_disk_threshold = Some(bytes);
        self
    }

    pub fn pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = Some(pool);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            on_disk_threshold: None,
            pool: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serialization_round_trip() {
        let config = StoreConfig::default()
            .page_size(4096)
            .on_disk_threshold(1024)
            .pool(Arc::new(BufferPool::default()));
        let json = serde_json::to_string(&config).unwrap();
        let back: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.page_size, 4096);
        assert_eq!(back.on_disk_threshold, Some(1024));
        // The pool is a runtime handle and is not persisted.
        assert!(back.pool.is_none());
    }
}
