use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    #[error("Malformed CIGAR '{cigar}': {reason}")]
    Malformed { cigar: String, reason: String },
}

/// Supported edit operations.
///
/// Only `M`, `I`, `D` and `S` are accepted; the other SAM operators
/// (`H`, `N`, `P`, `X`, `=`) are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CigarKind {
    /// `M`: aligned column, match or mismatch
    Match,
    /// `I`: bases present only in the query
    Insertion,
    /// `D`: bases present only in the reference
    Deletion,
    /// `S`: soft clip, consumed on both sides
    SoftClip,
}

impl CigarKind {
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol {
            b'M' => Some(CigarKind::Match),
            b'I' => Some(CigarKind::Insertion),
            b'D' => Some(CigarKind::Deletion),
            b'S' => Some(CigarKind::SoftClip),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CigarKind::Match => 'M',
            CigarKind::Insertion => 'I',
            CigarKind::Deletion => 'D',
            CigarKind::SoftClip => 'S',
        }
    }

    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            CigarKind::Match | CigarKind::Deletion | CigarKind::SoftClip
        )
    }

    pub fn consumes_query(self) -> bool {
        matches!(
            self,
            CigarKind::Match | CigarKind::Insertion | CigarKind::SoftClip
        )
    }
}

/// One run-length encoded operation; `len` is always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CigarOp {
    pub len: usize,
    pub kind: CigarKind,
}

impl CigarOp {
    pub fn new(len: usize, kind: CigarKind) -> Self {
        Self { len, kind }
    }
}

/// Bases of each sequence covered by an edit script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Consumption {
    pub reference: usize,
    pub query: usize,
}

/// A parsed edit script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cigar {
    ops: Vec<CigarOp>,
}

impl Cigar {
    /// Parse `(<positive-int><op>)+` with `op` in `{M, I, D, S}`.
    ///
    /// # Errors
    ///
    /// Returns `CigarError::Malformed` if the text is empty, an operation has
    /// no length or a zero length, a length overflows, digits trail the last
    /// operation, or an operation is unsupported.
    pub fn parse(text: &str) -> Result<Self, CigarError> {
        let malformed = |reason: String| CigarError::Malformed {
            cigar: text.to_string(),
            reason,
        };

        if text.is_empty() {
            return Err(malformed("empty edit script".to_string()));
        }

        let mut ops = Vec::new();
        let mut len: Option<usize> = None;

        for (position, c) in text.char_indices() {
            if let Some(digit) = c.to_digit(10) {
                let value = len
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit as usize))
                    .ok_or_else(|| malformed(format!("length overflows at position {position}")))?;
                len = Some(value);
                continue;
            }

            let n = len
                .take()
                .ok_or_else(|| malformed(format!("operation '{c}' at position {position} has no length")))?;
            if n == 0 {
                return Err(malformed(format!(
                    "zero-length operation '{c}' at position {position}"
                )));
            }
            let kind = u8::try_from(c)
                .ok()
                .and_then(CigarKind::from_symbol)
                .ok_or_else(|| malformed(format!("unsupported operation '{c}'")))?;

            ops.push(CigarOp::new(n, kind));
        }

        if len.is_some() {
            return Err(malformed("length without a trailing operation".to_string()));
        }

        Ok(Self { ops })
    }

    pub fn ops(&self) -> &[CigarOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Count the bases each sequence contributes.
    ///
    /// `M`, `D` and `S` consume the reference; `M`, `I` and `S` consume the
    /// query. Soft clips count on both sides.
    pub fn consumption(&self) -> Consumption {
        self.ops.iter().fold(Consumption::default(), |mut acc, op| {
            if op.kind.consumes_reference() {
                acc.reference += op.len;
            }
            if op.kind.consumes_query() {
                acc.query += op.len;
            }
            acc
        })
    }
}

impl FromStr for Cigar {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for op in &self.ops {
            write!(f, "{}{}", op.len, op.kind.symbol())?;
        }
        Ok(())
    }
}
