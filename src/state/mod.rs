//! State module for tracking crawl progress
//!
//! This module provides the state shared between crawl workers.
//!
//! # Components
//!
//! - `SeenSet`: The dedup gate; every absolute URL passes it at most once
//! - `LinkOutcome`: The terminal state each discovered link ends in
//! - `DomainState` / `HostThrottle`: Per-host parallelism, pacing and request caps

mod domain_state;
mod link_state;
mod seen_set;

// Re-export main types
pub use domain_state::{Admission, DomainState, HostPermit, HostThrottle, ThrottleConfig};
pub use link_state::LinkOutcome;
pub use seen_set::SeenSet;
