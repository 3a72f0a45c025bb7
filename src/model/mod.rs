//! Core data model types: posts and calendar periods.

pub mod period;
pub mod post;
