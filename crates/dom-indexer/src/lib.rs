//! Snapshot indexer: turns a live, mutating DOM into a stable, addressable
//! summary for one generation, and resolves the identifiers it issued back
//! into live element handles on demand.
//!
//! One capture = one snapshot generation. Identifiers are assigned in
//! traversal order starting at 1, stamped onto elements as a marker
//! attribute, and are meaningless outside the generation that produced
//! them: any DOM-mutating action must invalidate the [`HandleCache`] before
//! the next capture.

pub mod errors;
pub mod handles;
pub mod indexer;
pub mod model;
pub mod scripts;

pub use errors::IndexError;
pub use handles::{HandleCache, MARKER_ATTRIBUTE};
pub use indexer::capture;
pub use model::{ScannedElement, MAX_SCAN_ITEMS};
