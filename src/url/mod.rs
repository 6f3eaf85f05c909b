//! URL handling module for Spider-Nest
//!
//! This module provides URL normalization and registrable-domain extraction,
//! the two primitives the link collector and the spiders key their
//! deduplication and throttling on.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::normalize_url;
