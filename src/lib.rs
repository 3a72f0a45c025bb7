//! `ngarchive`: ingest and search a historical newsgroup mbox archive.
//!
//! This crate recovers individual posts from a hand-edited mbox dump, links
//! them into a reply graph, buckets them by calendar period and builds an
//! inverted word index over their bodies.

pub mod archive;
pub mod config;
pub mod error;
pub mod flags;
pub mod model;
pub mod parser;
pub mod search;
pub mod text;
