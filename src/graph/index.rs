use std::collections::HashMap;

use thiserror::Error;

use crate::core::records::Segment;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Duplicate segment id '{0}'")]
    DuplicateSegmentId(String),

    #[error("Segment '{0}' is referenced but not defined")]
    MissingSegmentReference(String),
}

/// Looks up segments by id.
///
/// Holds positions into a borrowed segment slice, so it cannot outlive the
/// parsed collection.
pub struct SegmentIndex<'a> {
    segments: &'a [Segment],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> SegmentIndex<'a> {
    /// Index `segments` by id
    ///
    /// # Errors
    ///
    /// Returns `IndexError::DuplicateSegmentId` for the first id seen twice.
    pub fn build(segments: &'a [Segment]) -> Result<Self, IndexError> {
        let mut by_id = HashMap::with_capacity(segments.len());

        for (idx, segment) in segments.iter().enumerate() {
            if by_id.insert(segment.id.as_str(), idx).is_some() {
                return Err(IndexError::DuplicateSegmentId(segment.id.clone()));
            }
        }

        Ok(Self { segments, by_id })
    }

    /// Position of `id` in the indexed slice
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&'a Segment> {
        let segments = self.segments;
        self.position(id).map(|idx| &segments[idx])
    }

    /// Like [`get`](Self::get), but a missing id is an error
    ///
    /// # Errors
    ///
    /// Returns `IndexError::MissingSegmentReference` if no segment has `id`.
    pub fn resolve(&self, id: &str) -> Result<&'a Segment, IndexError> {
        self.get(id)
            .ok_or_else(|| IndexError::MissingSegmentReference(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
