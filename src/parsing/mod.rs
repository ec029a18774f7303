//! Parser for GFA assembly graph files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gfa_align::parsing::gfa::{parse_gfa_text, read_file};
//! use std::path::Path;
//!
//! // Parse from a file (plain or gzip compressed)
//! let gfa = read_file(Path::new("assembly.gfa")).unwrap();
//!
//! // Or parse from raw text
//! let gfa = parse_gfa_text("S\t1\tACGT\nS\t2\tGTAA\nL\t1\t+\t2\t+\t2M\n").unwrap();
//! assert_eq!(gfa.links.len(), 1);
//! ```
//!
//! ## Supported Records
//!
//! | Tag | Fields | Optional tags |
//! |-----|--------|---------------|
//! | H   | free text to end of line | - |
//! | S   | id, sequence | skipped |
//! | L   | id0, orient0, id1, orient1, cigar | skipped |
//! | C   | id0, orient0, id1, orient1, offset, cigar | skipped |
//!
//! Any other tag stops parsing with an error.

pub mod gfa;
