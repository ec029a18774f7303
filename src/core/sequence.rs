//! Base-level transforms on nucleotide strings.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Unknown base '{base}' at position {position}")]
    UnknownBase { base: char, position: usize },
}

/// Complement a single base over `{A,C,G,T,N}`, preserving case.
#[must_use]
pub fn complement(base: u8) -> Option<u8> {
    match base {
        b'A' => Some(b'T'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'T' => Some(b'A'),
        b'N' => Some(b'N'),
        b'a' => Some(b't'),
        b'c' => Some(b'g'),
        b'g' => Some(b'c'),
        b't' => Some(b'a'),
        b'n' => Some(b'n'),
        _ => None,
    }
}

/// Reverse complement a sequence.
///
/// # Errors
///
/// Returns `SequenceError::UnknownBase` for a character outside
/// `{A,C,G,T,N}` (either case). Bases are visited from the 3' end, so the
/// reported `position` (byte offset in the input) is the last bad one.
pub fn reverse_complement(seq: &str) -> Result<String, SequenceError> {
    let mut out = String::with_capacity(seq.len());

    for (position, base) in seq.char_indices().rev() {
        let comp = u8::try_from(base)
            .ok()
            .and_then(complement)
            .ok_or(SequenceError::UnknownBase { base, position })?;
        out.push(char::from(comp));
    }

    Ok(out)
}
