//! Edit-script interpretation.
//!
//! - [`cigar`]: parse a CIGAR string and count how much of each sequence it
//!   consumes
//! - [`engine`]: lay two oriented sequences out as explicit alignment rows and
//!   score them
//!
//! ## Example
//!
//! ```rust
//! use gfa_align::alignment::cigar::Cigar;
//! use gfa_align::alignment::engine::align_and_score;
//!
//! let cigar = Cigar::parse("2M1D2M").unwrap();
//! let aln = align_and_score("AACGT", "AAGT", 0, &cigar).unwrap();
//!
//! assert_eq!(aln.reference_row, "AACGT");
//! assert_eq!(aln.query_row, "AA-GT");
//! assert_eq!(aln.stats.gaps, 1);
//! ```

pub mod cigar;
pub mod engine;
