//! CLI command implementations.
//!
//! Each command writes to a caller-supplied writer and takes the store and
//! clock explicitly, so tests drive them against an in-memory store and a
//! fixed instant.

pub mod categories;
pub mod copy;
pub mod edit;
pub mod entries;
pub mod list;
pub mod sheets;
pub mod start;
pub mod summary;
pub mod util;
