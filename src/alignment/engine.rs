//! Reconstruct an explicit two-row alignment from an edit script.

use serde::Serialize;
use thiserror::Error;

use crate::alignment::cigar::{Cigar, CigarKind};

/// Gap column marker
pub const GAP: u8 = b'-';

/// Marker for flanking sequence outside the aligned region
pub const UNALIGNED: u8 = b'.';

/// Which of the two sequences a cursor walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Reference,
    Query,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Query => write!(f, "query"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("CIGAR overrun on {side} sequence: needs {needed} bases but only {available} available")]
    Overrun {
        side: Side,
        needed: usize,
        available: usize,
    },
}

#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Column counts over the aligned (non-flanking) region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AlignmentStats {
    pub matches: usize,
    pub mismatches: usize,
    pub gaps: usize,
    /// `matches / (matches + mismatches + gaps)`, `0.0` with no scored columns
    pub identity: f64,
}

impl AlignmentStats {
    pub fn new(matches: usize, mismatches: usize, gaps: usize) -> Self {
        let total = matches + mismatches + gaps;
        let identity = if total == 0 {
            0.0
        } else {
            count_to_f64(matches) / count_to_f64(total)
        };
        Self {
            matches,
            mismatches,
            gaps,
            identity,
        }
    }

    /// Score two equal-length rows column by column.
    ///
    /// Columns with an unaligned mark in either row are skipped; a gap mark
    /// in either row makes a gap, otherwise equal bytes are a match.
    pub fn from_rows(reference_row: &[u8], query_row: &[u8]) -> Self {
        let mut matches = 0;
        let mut mismatches = 0;
        let mut gaps = 0;

        for (&r, &q) in reference_row.iter().zip(query_row) {
            if r == UNALIGNED || q == UNALIGNED {
                continue;
            }
            if r == GAP || q == GAP {
                gaps += 1;
            } else if r == q {
                matches += 1;
            } else {
                mismatches += 1;
            }
        }

        Self::new(matches, mismatches, gaps)
    }

    pub fn scored_columns(&self) -> usize {
        self.matches + self.mismatches + self.gaps
    }
}

/// A reconstructed pairwise alignment. Both rows have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    pub reference_row: String,
    pub query_row: String,
    pub stats: AlignmentStats,
}

impl Alignment {
    /// Number of alignment columns
    pub fn columns(&self) -> usize {
        self.reference_row.chars().count()
    }

    /// Split both rows into chunks of at most `width` columns.
    ///
    /// Chunks end on `char` boundaries. A row that runs out first yields
    /// empty chunks until the other one is exhausted.
    pub fn wrapped(&self, width: usize) -> impl Iterator<Item = (&str, &str)> {
        let width = width.max(1);
        let mut reference = self.reference_row.as_str();
        let mut query = self.query_row.as_str();
        std::iter::from_fn(move || {
            if reference.is_empty() && query.is_empty() {
                return None;
            }
            let (r, r_rest) = split_columns(reference, width);
            let (q, q_rest) = split_columns(query, width);
            reference = r_rest;
            query = q_rest;
            Some((r, q))
        })
    }
}

/// Split `row` after its first `width` characters
fn split_columns(row: &str, width: usize) -> (&str, &str) {
    let end = row.char_indices().nth(width).map_or(row.len(), |(i, _)| i);
    row.split_at(end)
}

/// Slice `n` bases of `seq` starting at `start`, or report how far past the
/// end the read would go.
fn take(seq: &[u8], start: usize, n: usize, side: Side) -> Result<&[u8], AlignError> {
    let end = start.checked_add(n).unwrap_or(usize::MAX);
    seq.get(start..end).ok_or(AlignError::Overrun {
        side,
        needed: end,
        available: seq.len(),
    })
}

/// Lay out `reference` and `query` according to `cigar`, starting the aligned
/// region `anchor` bases into the reference.
///
/// The reference prefix before `anchor` and the query suffix left after the
/// script are emitted against [`UNALIGNED`] marks and never scored. The
/// reference suffix past the script is not emitted. Soft clips are laid out
/// like `M`.
///
/// # Errors
///
/// Returns `AlignError::Overrun` if `anchor` lies past the end of the
/// reference or the script consumes more of either sequence than it has.
pub fn align_and_score(
    reference: &str,
    query: &str,
    anchor: usize,
    cigar: &Cigar,
) -> Result<Alignment, AlignError> {
    let reference = reference.as_bytes();
    let query = query.as_bytes();

    let mut ref_row = Vec::with_capacity(reference.len() + query.len());
    let mut query_row = Vec::with_capacity(reference.len() + query.len());

    ref_row.extend_from_slice(take(reference, 0, anchor, Side::Reference)?);
    query_row.resize(anchor, UNALIGNED);

    let mut c_ref = anchor;
    let mut c_query = 0;

    for op in cigar.ops() {
        let n = op.len;
        match op.kind {
            CigarKind::Deletion => {
                ref_row.extend_from_slice(take(reference, c_ref, n, Side::Reference)?);
                query_row.resize(query_row.len() + n, GAP);
                c_ref += n;
            }
            CigarKind::Insertion => {
                ref_row.resize(ref_row.len() + n, GAP);
                query_row.extend_from_slice(take(query, c_query, n, Side::Query)?);
                c_query += n;
            }
            CigarKind::Match | CigarKind::SoftClip => {
                ref_row.extend_from_slice(take(reference, c_ref, n, Side::Reference)?);
                query_row.extend_from_slice(take(query, c_query, n, Side::Query)?);
                c_ref += n;
                c_query += n;
            }
        }
    }

    // c_query never passes query.len(): every advance went through `take`
    let tail = &query[c_query..];
    query_row.extend_from_slice(tail);
    ref_row.resize(ref_row.len() + tail.len(), UNALIGNED);

    debug_assert_eq!(ref_row.len(), query_row.len());

    let stats = AlignmentStats::from_rows(&ref_row, &query_row);

    Ok(Alignment {
        reference_row: String::from_utf8_lossy(&ref_row).into_owned(),
        query_row: String::from_utf8_lossy(&query_row).into_owned(),
        stats,
    })
}
