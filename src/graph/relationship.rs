//! Per-relationship alignment reconstruction.
//!
//! A relationship is a Link or a Containment. Reconstructing one resolves
//! both segment ids, orients the sequences, finds where the aligned region
//! starts on segment 0, and hands everything to the alignment engine.

use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::alignment::cigar::{Cigar, CigarError, Consumption};
use crate::alignment::engine::{align_and_score, AlignError, Alignment, Side};
use crate::core::records::{Containment, GfaFile, Link, Orientation, Segment};
use crate::core::sequence::{reverse_complement, SequenceError};
use crate::graph::index::{IndexError, SegmentIndex};

/// How relationship orientations are applied to the two sequences
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OrientationMode {
    /// Reverse complement each segment whose orientation is `-`
    #[default]
    Independent,
    /// Keep segment 0 as stored; reverse complement segment 1 only when the
    /// two orientations differ
    Relative,
}

impl OrientationMode {
    /// Which of the two segments get reverse complemented
    pub fn flips(self, orientation: [Orientation; 2]) -> [bool; 2] {
        match self {
            OrientationMode::Independent => {
                [orientation[0].is_reverse(), orientation[1].is_reverse()]
            }
            OrientationMode::Relative => [false, orientation[0] != orientation[1]],
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Cigar(#[from] CigarError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Align(#[from] AlignError),
}

/// A Link or Containment borrowed from a parsed file
#[derive(Debug, Clone, Copy)]
pub enum Relationship<'a> {
    Link(&'a Link),
    Containment(&'a Containment),
}

impl<'a> Relationship<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Relationship::Link(_) => "Link",
            Relationship::Containment(_) => "Containment",
        }
    }

    pub fn ids(&self) -> [&'a str; 2] {
        let id = match *self {
            Relationship::Link(link) => &link.id,
            Relationship::Containment(containment) => &containment.id,
        };
        [id[0].as_str(), id[1].as_str()]
    }

    pub fn orientation(&self) -> [Orientation; 2] {
        match self {
            Relationship::Link(link) => link.orientation,
            Relationship::Containment(containment) => containment.orientation,
        }
    }

    pub fn cigar(&self) -> &'a str {
        match *self {
            Relationship::Link(link) => &link.cigar,
            Relationship::Containment(containment) => &containment.cigar,
        }
    }

    /// Containment offset; `None` for links
    pub fn offset(&self) -> Option<usize> {
        match self {
            Relationship::Link(_) => None,
            Relationship::Containment(containment) => Some(containment.offset),
        }
    }

    /// The relationship as it appears in the file, e.g. `Link 1 + 2 - 4M`
    pub fn describe(&self) -> String {
        let [id0, id1] = self.ids();
        let [o0, o1] = self.orientation();
        match self.offset() {
            Some(offset) => format!(
                "{} {id0} {o0} {id1} {o1} {offset} {}",
                self.kind(),
                self.cigar()
            ),
            None => format!("{} {id0} {o0} {id1} {o1} {}", self.kind(), self.cigar()),
        }
    }

    /// Rebuild the base-level alignment of this relationship
    ///
    /// # Errors
    ///
    /// Returns `ReconstructError::Index` when a segment id is not defined,
    /// `ReconstructError::Cigar` for a malformed edit script,
    /// `ReconstructError::Sequence` when a sequence to reverse complement has
    /// an unknown base, and `ReconstructError::Align` when the edit script
    /// overruns either sequence.
    pub fn reconstruct(
        &self,
        index: &SegmentIndex<'_>,
        mode: OrientationMode,
    ) -> Result<Reconstruction, ReconstructError> {
        let [id0, id1] = self.ids();
        let segments = [index.resolve(id0)?, index.resolve(id1)?];
        let cigar = Cigar::parse(self.cigar())?;
        let consumption = cigar.consumption();

        let [flip0, flip1] = mode.flips(self.orientation());
        let reference = oriented(segments[0], flip0)?;
        let query = oriented(segments[1], flip1)?;

        let anchor = match self {
            // The overlap sits at the end of segment 0
            Relationship::Link(_) => {
                reference
                    .len()
                    .checked_sub(consumption.reference)
                    .ok_or(AlignError::Overrun {
                        side: Side::Reference,
                        needed: consumption.reference,
                        available: reference.len(),
                    })?
            }
            Relationship::Containment(containment) => containment.offset,
        };

        debug!(
            relationship = %self.describe(),
            consumed_reference = consumption.reference,
            consumed_query = consumption.query,
            anchor,
            "Reconstructing alignment"
        );

        let alignment = align_and_score(&reference, &query, anchor, &cigar)?;

        Ok(Reconstruction {
            consumption,
            anchor,
            alignment,
        })
    }
}

fn oriented(segment: &Segment, flip: bool) -> Result<Cow<'_, str>, SequenceError> {
    if flip {
        reverse_complement(&segment.sequence).map(Cow::Owned)
    } else {
        Ok(Cow::Borrowed(segment.sequence.as_str()))
    }
}

/// Result of reconstructing one relationship
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconstruction {
    pub consumption: Consumption,
    /// Column where the aligned region starts on segment 0
    pub anchor: usize,
    pub alignment: Alignment,
}

/// All relationships of a file: links first, then containments, each in file
/// order
pub fn relationships(gfa: &GfaFile) -> impl Iterator<Item = Relationship<'_>> {
    gfa.links
        .iter()
        .map(Relationship::Link)
        .chain(gfa.containments.iter().map(Relationship::Containment))
}

/// Reconstruct every relationship of `gfa`.
///
/// Each relationship is independent; a failure is reported alongside its
/// relationship and does not stop the iterator.
pub fn reconstruct_all<'a>(
    gfa: &'a GfaFile,
    index: &'a SegmentIndex<'a>,
    mode: OrientationMode,
) -> impl Iterator<Item = (Relationship<'a>, Result<Reconstruction, ReconstructError>)> + 'a {
    relationships(gfa).map(move |rel| (rel, rel.reconstruct(index, mode)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::gfa::parse_gfa_text;

    const GRAPH: &str = "H\tVN:Z:1.0
S\t1\tACGTTGCA
S\t2\tTGCAGG
S\t3\tGTT
S\t5\tGCATT
L\t1\t+\t2\t+\t4M
L\t1\t-\t5\t-\t3M
C\t1\t+\t3\t+\t2\t3M
";

    fn reconstruct(gfa: &GfaFile, mode: OrientationMode) -> Vec<Reconstruction> {
        let index = SegmentIndex::build(&gfa.segments).unwrap();
        reconstruct_all(gfa, &index, mode)
            .map(|(_, result)| result.unwrap())
            .collect()
    }

    #[test]
    fn test_relationship_order_and_description() {
        let gfa = parse_gfa_text(GRAPH).unwrap();
        let described: Vec<String> = relationships(&gfa).map(|r| r.describe()).collect();
        assert_eq!(
            described,
            vec![
                "Link 1 + 2 + 4M".to_string(),
                "Link 1 - 5 - 3M".to_string(),
                "Containment 1 + 3 + 2 3M".to_string(),
            ]
        );
    }

    #[test]
    fn test_link_anchors_on_segment_end() {
        let gfa = parse_gfa_text(GRAPH).unwrap();
        let results = reconstruct(&gfa, OrientationMode::Independent);

        let link = &results[0];
        assert_eq!(link.anchor, 4);
        assert_eq!(
            link.consumption,
            Consumption {
                reference: 4,
                query: 4
            }
        );
        assert_eq!(link.alignment.reference_row, "ACGTTGCA..");
        assert_eq!(link.alignment.query_row, "....TGCAGG");
        assert_eq!(link.alignment.stats.matches, 4);
    }

    #[test]
    fn test_containment_anchors_on_offset() {
        let gfa = parse_gfa_text(GRAPH).unwrap();
        let results = reconstruct(&gfa, OrientationMode::Independent);

        let containment = &results[2];
        assert_eq!(containment.anchor, 2);
        assert_eq!(containment.alignment.reference_row, "ACGTT");
        assert_eq!(containment.alignment.query_row, "..GTT");
        assert!((containment.alignment.stats.identity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_independent_orientation() {
        let gfa = parse_gfa_text(GRAPH).unwrap();
        let results = reconstruct(&gfa, OrientationMode::Independent);

        // Both segments reverse complemented: TGCAACGT vs AATGC
        let link = &results[1];
        assert_eq!(link.alignment.reference_row, "TGCAACGT..");
        assert_eq!(link.alignment.query_row, ".....AATGC");
        assert_eq!(link.alignment.stats.matches, 1);
        assert_eq!(link.alignment.stats.mismatches, 2);
    }

    #[test]
    fn test_relative_orientation() {
        let gfa = parse_gfa_text(GRAPH).unwrap();
        let results = reconstruct(&gfa, OrientationMode::Relative);

        // Same orientation on both sides: neither is flipped
        let link = &results[1];
        assert_eq!(link.alignment.reference_row, "ACGTTGCA..");
        assert_eq!(link.alignment.query_row, ".....GCATT");
        assert_eq!(link.alignment.stats.matches, 3);
    }

    #[test]
    fn test_orientation_mode_flips() {
        use Orientation::{Forward, Reverse};

        assert_eq!(
            OrientationMode::Independent.flips([Forward, Reverse]),
            [false, true]
        );
        assert_eq!(
            OrientationMode::Independent.flips([Reverse, Reverse]),
            [true, true]
        );
        assert_eq!(
            OrientationMode::Relative.flips([Reverse, Forward]),
            [false, true]
        );
        assert_eq!(
            OrientationMode::Relative.flips([Reverse, Reverse]),
            [false, false]
        );
    }

    #[test]
    fn test_missing_segment_reference() {
        let gfa = parse_gfa_text("S\t1\tACGT\nL\t1\t+\t9\t+\t2M\n").unwrap();
        let index = SegmentIndex::build(&gfa.segments).unwrap();
        let rel = relationships(&gfa).next().unwrap();

        let err = rel.reconstruct(&index, OrientationMode::default()).unwrap_err();
        assert_eq!(
            err,
            ReconstructError::Index(IndexError::MissingSegmentReference("9".to_string()))
        );
    }

    #[test]
    fn test_link_consumption_exceeds_segment() {
        let gfa = parse_gfa_text("S\t1\tACG\nS\t2\tACGTACGT\nL\t1\t+\t2\t+\t5M\n").unwrap();
        let index = SegmentIndex::build(&gfa.segments).unwrap();
        let rel = relationships(&gfa).next().unwrap();

        let err = rel.reconstruct(&index, OrientationMode::default()).unwrap_err();
        assert!(matches!(
            err,
            ReconstructError::Align(AlignError::Overrun {
                side: Side::Reference,
                needed: 5,
                available: 3
            })
        ));
    }

    #[test]
    fn test_link_query_overrun() {
        let gfa = parse_gfa_text("S\t1\tACGTACGT\nS\t2\tACG\nL\t1\t+\t2\t+\t5M\n").unwrap();
        let index = SegmentIndex::build(&gfa.segments).unwrap();
        let rel = relationships(&gfa).next().unwrap();

        let err = rel.reconstruct(&index, OrientationMode::default()).unwrap_err();
        assert!(matches!(
            err,
            ReconstructError::Align(AlignError::Overrun {
                side: Side::Query,
                ..
            })
        ));
    }

    #[test]
    fn test_containment_offset_past_end() {
        let gfa = parse_gfa_text("S\t1\tACGT\nS\t2\tA\nC\t1\t+\t2\t+\t9\t1M\n").unwrap();
        let index = SegmentIndex::build(&gfa.segments).unwrap();
        let rel = relationships(&gfa).next().unwrap();

        assert!(matches!(
            rel.reconstruct(&index, OrientationMode::default()),
            Err(ReconstructError::Align(_))
        ));
    }

    #[test]
    fn test_malformed_cigar_and_unknown_base() {
        let gfa = parse_gfa_text(
            "S\t1\tACGT\nS\t2\tAXGT\nL\t1\t+\t2\t+\t3X\nL\t1\t+\t2\t-\t2M\n",
        )
        .unwrap();
        let index = SegmentIndex::build(&gfa.segments).unwrap();
        let results: Vec<_> = reconstruct_all(&gfa, &index, OrientationMode::Independent)
            .map(|(_, result)| result)
            .collect();

        assert!(matches!(results[0], Err(ReconstructError::Cigar(_))));
        assert!(matches!(
            results[1],
            Err(ReconstructError::Sequence(SequenceError::UnknownBase {
                base: 'X',
                ..
            }))
        ));
    }
}
