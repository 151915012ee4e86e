//! URL handling module for mkt-crawler
//!
//! This module provides link resolution, host extraction and the domain
//! allow-list filter.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::{is_allowed, matches_entry, DomainFilter, MatchMode};
pub use normalize::{normalize, normalize_absolute, strip_tracking_params};
