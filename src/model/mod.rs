//! Data model for the crawl
//!
//! # Components
//!
//! - `Page`: a crawl unit keyed by its canonical URL, with its enrichment data
//!   and the related pages discovered on it
//! - `Domain`: the registrable domain a page belongs to, used for throttling
//!   and as a shared node in the graph store

mod domain;
mod page;

// Re-export main types
pub use domain::Domain;
pub use page::{Page, RelatedPages};
