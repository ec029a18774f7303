//! # gfa-align
//!
//! Reconstruct base-level pairwise alignments from the links and containments
//! of a GFA assembly graph.
//!
//! A GFA file lists sequence segments and the relationships between them.
//! Every link or containment carries a CIGAR edit script; `gfa-align` applies
//! that script to the two (oriented) segment sequences to rebuild the explicit
//! alignment and report its identity.
//!
//! ## Example
//!
//! ```rust
//! use gfa_align::parsing::gfa::parse_gfa_text;
//! use gfa_align::{OrientationMode, SegmentIndex};
//! use gfa_align::graph::relationship::reconstruct_all;
//!
//! let gfa = parse_gfa_text("S\t1\tTTTACG\nS\t2\tACGCC\nL\t1\t+\t2\t+\t3M\n").unwrap();
//! let index = SegmentIndex::build(&gfa.segments).unwrap();
//!
//! for (relationship, result) in reconstruct_all(&gfa, &index, OrientationMode::Independent) {
//!     let reconstruction = result.unwrap();
//!     println!("{}: {:.3}", relationship.describe(), reconstruction.alignment.stats.identity);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: GFA record types and sequence transforms
//! - [`parsing`]: GFA file parser
//! - [`alignment`]: CIGAR parsing and alignment reconstruction
//! - [`graph`]: Segment index and per-relationship reconstruction
//! - [`cli`]: Command-line interface implementation

pub mod alignment;
pub mod cli;
pub mod core;
pub mod graph;
pub mod parsing;

// Re-export commonly used types for convenience
pub use alignment::cigar::{Cigar, Consumption};
pub use alignment::engine::{align_and_score, Alignment, AlignmentStats};
pub use crate::core::records::{Containment, GfaFile, Header, Link, Orientation, Record, Segment};
pub use crate::core::sequence::reverse_complement;
pub use graph::index::SegmentIndex;
pub use graph::relationship::{OrientationMode, Reconstruction, Relationship};
