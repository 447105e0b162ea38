//! Analysis modules.
//!
//! Pure statistics over fetched repository listings.

pub mod aggregator;

pub use aggregator::*;
