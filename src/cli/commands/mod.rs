//! CLI command implementations

pub mod completions;
pub mod property;
pub mod resolve;
pub mod search;
pub mod stats;
pub mod status;
pub mod tx;
