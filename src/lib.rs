//! # sarix - suffix arrays over paged storage
//!
//! sarix builds and queries suffix arrays for texts whose alphabet and
//! size may exceed comfortable in-memory limits. Construction is SA-IS
//! (linear-time induced sorting), queries run in O(|P| + log n + occ)
//! symbol comparisons via a precomputed LCP-LR array, and every array
//! involved can transparently live on disk.
//!
//! ## Architecture
//!
//! The crate is organized into two module trees:
//!
//! - [`store`] - paged, optionally file-backed containers: fixed-width
//!   integer arrays, bit vectors, a shared buffer pool
//! - [`index`] - the algorithms: SA-IS construction, Kasai LCP, LCP-LR,
//!   accelerated search
//!
//! ## Quick Start
//!
//! ```
//! use sarix::{build_lcp_array, build_lcp_lr_array, build_suffix_array};
//! use sarix::{byte_symbols, search, StoreConfig, Text};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = StoreConfig::default();
//! let text = Text::from_bytes(&config, b"banana.banana")?;
//!
//! let sa = build_suffix_array(&config, &text)?;
//! let lcp = build_lcp_array(&config, &text, &sa)?;
//! let lcp_lr = build_lcp_lr_array(&config, &lcp)?;
//!
//! let offsets = search(&text, &sa, &lcp_lr, &byte_symbols(b"banana"))?;
//! assert_eq!(offsets, vec![0, 7]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage
//!
//! Algorithms reach storage only through the container API, so swapping
//! in file-backed storage changes no result. A `StoreConfig` with
//! `on_disk_threshold(0)` forces every intermediate onto disk; a shared
//! [`BufferPool`] recycles page buffers across builds. Finished arrays
//! can be frozen for concurrent reads.

pub mod index;
pub mod store;

pub use index::{
    build_lcp_array, build_lcp_lr_array, build_suffix_array, byte_symbols, search, LcpArray,
    SuffixArray, Text, TypeMap, PLACEHOLDER,
};
pub use store::{BitVector, BufferPool, StoreConfig, ValueArray};
