//! `dosemap` is a small toolkit for reconstructing absorbed dose from binned
//! energy deposition and comparing dose fields across material cases
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use dosemap_grid as grid;

#[doc(inline)]
pub use dosemap_utils as utils;

#[cfg(feature = "compare")]
#[cfg_attr(docsrs, doc(cfg(feature = "compare")))]
#[doc(inline)]
pub use dosemap_compare as compare;

#[cfg(feature = "analysis")]
#[cfg_attr(docsrs, doc(cfg(feature = "analysis")))]
#[doc(inline)]
pub use dosemap_analysis as analysis;
