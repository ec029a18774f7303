//! Core data types for GFA records and nucleotide sequences.
//!
//! - [`records`]: `Header`, `Segment`, `Link`, `Containment` and the
//!   closed [`Record`](records::Record) enum a parsed line becomes
//! - [`sequence`]: reverse complement over `{A,C,G,T,N}`
//!
//! ## Orientation
//!
//! Links and containments state an orientation for each of their two
//! segments:
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `+`    | sequence as stored |
//! | `-`    | reverse complement of the stored sequence |

pub mod records;
pub mod sequence;
