//! Segment lookup and per-relationship reconstruction over a parsed file.

pub mod index;
pub mod relationship;
