//! Suffix-index construction and querying.
//!
//! The pipeline builds three arrays from a [`Text`] and then answers
//! pattern queries against them:
//!
//! - [`builder`] - SA-IS suffix array construction
//! - [`lcp`] - Kasai LCP array and the LCP-LR search accelerator
//! - [`search`] - O(|P| + log n) pattern location
//! - [`text`], [`type_map`], [`buckets`], [`types`] - supporting pieces
//!
//! ## Usage
//!
//! ```ignore
//! use sarix::store::StoreConfig;
//! use sarix::index::{build_lcp_array, build_lcp_lr_array, build_suffix_array};
//! use sarix::index::{byte_symbols, search, Text};
//!
//! let config = StoreConfig::default();
//! let text = Text::from_bytes(&config, b"banana.banana")?;
//! let sa = build_suffix_array(&config, &text)?;
//! let lcp = build_lcp_array(&config, &text, &sa)?;
//! let lcp_lr = build_lcp_lr_array(&config, &lcp)?;
//! let offsets = search(&text, &sa, &lcp_lr, &byte_symbols(b"ana"))?;
//! ```

pub mod buckets;
pub mod builder;
pub mod lcp;
pub mod search;
pub mod text;
pub mod type_map;
pub mod types;

pub use builder::build_suffix_array;
pub use lcp::{build_lcp_array, build_lcp_lr_array};
pub use search::search;
pub use text::{byte_symbols, Text};
pub use type_map::{SuffixKind, TypeMap};
pub use types::{LcpArray, SuffixArray, PLACEHOLDER};
