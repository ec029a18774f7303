//! Parser for GFA text files.
//!
//! Every non-blank line is one record; the first whitespace-separated token is
//! a single-character tag selecting the record kind. Reading stops at the first
//! malformed line and the error carries its 1-based line number.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::debug;

use crate::core::records::{Containment, GfaFile, Header, Link, Orientation, Record, Segment};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("Unknown record type '{tag}' on line {line}")]
    UnknownRecordType { tag: String, line: usize },

    #[error("Truncated {kind} record on line {line}: expected {expected} fields, found {found}")]
    TruncatedRecord {
        kind: char,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid orientation '{value}' on line {line}: expected '+' or '-'")]
    InvalidOrientation { value: String, line: usize },

    #[error("Invalid containment offset '{value}' on line {line}")]
    InvalidOffset { value: String, line: usize },
}

impl ParseError {
    /// Line number the error was raised on, if it came from a record
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io(_) => None,
            ParseError::Read { line, .. }
            | ParseError::InvalidUtf8 { line }
            | ParseError::UnknownRecordType { line, .. }
            | ParseError::TruncatedRecord { line, .. }
            | ParseError::InvalidOrientation { line, .. }
            | ParseError::InvalidOffset { line, .. } => Some(*line),
        }
    }
}

/// Parse one GFA line.
///
/// Returns `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns `ParseError::UnknownRecordType` for a tag other than `H`, `S`, `L`
/// or `C`, `ParseError::TruncatedRecord` when required fields are missing, and
/// `ParseError::InvalidOrientation` / `ParseError::InvalidOffset` for bad
/// field values.
pub fn parse_record(line: &str, line_number: usize) -> Result<Option<Record>, ParseError> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n').trim_start();

    let Some(tag_token) = line.split_whitespace().next() else {
        return Ok(None);
    };

    let mut chars = tag_token.chars();
    let tag = match (chars.next(), chars.next()) {
        (Some(tag), None) => tag,
        _ => {
            return Err(ParseError::UnknownRecordType {
                tag: tag_token.to_string(),
                line: line_number,
            })
        }
    };

    let rest = &line[tag_token.len()..];

    let record = match tag {
        'H' => {
            // Drop only the separator after the tag
            let mut text = rest.chars();
            text.next();
            Record::Header(Header {
                text: text.as_str().to_string(),
            })
        }
        'S' => {
            let fields = required_fields(rest, 'S', 2, line_number)?;
            Record::Segment(Segment::new(fields[0], fields[1]))
        }
        'L' => {
            let fields = required_fields(rest, 'L', 5, line_number)?;
            Record::Link(Link {
                id: [fields[0].to_string(), fields[2].to_string()],
                orientation: [
                    parse_orientation(fields[1], line_number)?,
                    parse_orientation(fields[3], line_number)?,
                ],
                cigar: fields[4].to_string(),
            })
        }
        'C' => {
            let fields = required_fields(rest, 'C', 6, line_number)?;
            let offset = fields[4]
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidOffset {
                    value: fields[4].to_string(),
                    line: line_number,
                })?;
            Record::Containment(Containment {
                id: [fields[0].to_string(), fields[2].to_string()],
                orientation: [
                    parse_orientation(fields[1], line_number)?,
                    parse_orientation(fields[3], line_number)?,
                ],
                offset,
                cigar: fields[5].to_string(),
            })
        }
        _ => {
            return Err(ParseError::UnknownRecordType {
                tag: tag.to_string(),
                line: line_number,
            })
        }
    };

    Ok(Some(record))
}

/// Split the fields after the tag, requiring at least `expected` of them.
/// Anything past `expected` is optional tag fields and is dropped.
fn required_fields(
    rest: &str,
    kind: char,
    expected: usize,
    line: usize,
) -> Result<Vec<&str>, ParseError> {
    let mut fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() < expected {
        return Err(ParseError::TruncatedRecord {
            kind,
            line,
            expected,
            found: fields.len(),
        });
    }
    fields.truncate(expected);
    Ok(fields)
}

fn parse_orientation(value: &str, line: usize) -> Result<Orientation, ParseError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Orientation::from_symbol(symbol),
        _ => None,
    }
    .ok_or_else(|| ParseError::InvalidOrientation {
        value: value.to_string(),
        line,
    })
}

/// Iterator over the records of a GFA stream.
///
/// Blank lines are skipped. The iterator is fused after the first error, so
/// nothing past a malformed line is read.
pub struct Records<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
            done: false,
        }
    }

    /// Read and parse the next line; `Ok(None)` at end of input
    fn next_line(&mut self) -> Result<Option<Option<Record>>, ParseError> {
        self.buf.clear();
        let line_number = self.line_number + 1;
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| ParseError::Read {
                line: line_number,
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.line_number = line_number;

        let line = std::str::from_utf8(&self.buf)
            .map_err(|_| ParseError::InvalidUtf8 { line: line_number })?;
        parse_record(line, line_number).map(Some)
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.next_line() {
                Ok(Some(Some(record))) => return Some(Ok(record)),
                Ok(Some(None)) => {}
                Ok(None) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Read every record from a buffered reader.
///
/// # Errors
///
/// Returns the first `ParseError` encountered; no partial result is returned.
pub fn read_records<R: BufRead>(reader: R) -> Result<GfaFile, ParseError> {
    Records::new(reader).collect()
}

/// Parse GFA from text
///
/// # Errors
///
/// Returns the first `ParseError` encountered.
pub fn parse_gfa_text(text: &str) -> Result<GfaFile, ParseError> {
    read_records(text.as_bytes())
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("gz" | "bgz")
    )
}

/// Read a GFA file, decompressing `.gz` / `.bgz` input transparently.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened or read, or the first
/// record-level `ParseError`.
pub fn read_file(path: &Path) -> Result<GfaFile, ParseError> {
    let file = File::open(path)?;

    let gfa = if is_gzipped(path) {
        read_records(BufReader::new(MultiGzDecoder::new(file)))?
    } else {
        read_records(BufReader::new(file))?
    };

    debug!(
        path = %path.display(),
        headers = gfa.headers.len(),
        segments = gfa.segments.len(),
        links = gfa.links.len(),
        containments = gfa.containments.len(),
        "Parsed GFA file"
    );

    Ok(gfa)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_GFA: &str = "H\tVN:Z:1.0
S\t1\tACGTTGCA\tLN:i:8
S\t2\tTGCAGG
L\t1\t+\t2\t+\t4M
C\t1\t-\t2\t+\t1\t3M
";

    #[test]
    fn test_parse_gfa_text() {
        let gfa = parse_gfa_text(SMALL_GFA).unwrap();

        assert_eq!(gfa.headers.len(), 1);
        assert_eq!(gfa.headers[0].text, "VN:Z:1.0");

        assert_eq!(gfa.segments.len(), 2);
        assert_eq!(gfa.segments[0], Segment::new("1", "ACGTTGCA"));
        assert_eq!(gfa.segments[1].sequence, "TGCAGG");

        assert_eq!(gfa.links.len(), 1);
        let link = &gfa.links[0];
        assert_eq!(link.id, ["1".to_string(), "2".to_string()]);
        assert_eq!(link.orientation, [Orientation::Forward, Orientation::Forward]);
        assert_eq!(link.cigar, "4M");

        assert_eq!(gfa.containments.len(), 1);
        let containment = &gfa.containments[0];
        assert_eq!(
            containment.orientation,
            [Orientation::Reverse, Orientation::Forward]
        );
        assert_eq!(containment.offset, 1);
        assert_eq!(containment.cigar, "3M");
    }

    #[test]
    fn test_header_keeps_text_verbatim() {
        let record = parse_record("H VN:Z:1.0  free   text ", 1).unwrap().unwrap();
        assert_eq!(
            record,
            Record::Header(Header {
                text: "VN:Z:1.0  free   text ".to_string()
            })
        );

        let record = parse_record("H", 1).unwrap().unwrap();
        assert_eq!(record, Record::Header(Header { text: String::new() }));
    }

    #[test]
    fn test_segment_tags_are_discarded() {
        let record = parse_record("S s1 ACGT LN:i:4 RC:i:10\r", 3)
            .unwrap()
            .unwrap();
        assert_eq!(record, Record::Segment(Segment::new("s1", "ACGT")));
    }

    #[test]
    fn test_link_trailing_tags_ignored() {
        let record = parse_record("L\ta\t-\tb\t+\t2M1I\tID:Z:e1", 1)
            .unwrap()
            .unwrap();
        let Record::Link(link) = record else {
            panic!("expected a link record");
        };
        assert_eq!(link.orientation, [Orientation::Reverse, Orientation::Forward]);
        assert_eq!(link.cigar, "2M1I");
    }

    #[test]
    fn test_header_drops_one_separator() {
        let record = parse_record("H\t\tVN:Z:1.0", 1).unwrap().unwrap();
        assert_eq!(
            record,
            Record::Header(Header {
                text: "\tVN:Z:1.0".to_string()
            })
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        assert!(parse_record("", 1).unwrap().is_none());
        assert!(parse_record("  \t \r", 1).unwrap().is_none());

        let gfa = parse_gfa_text("\nS\t1\tACGT\n\n\nS\t2\tAC\n").unwrap();
        assert_eq!(gfa.segments.len(), 2);
    }

    #[test]
    fn test_unknown_record_type() {
        let err = parse_record("X foo bar", 1).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownRecordType { ref tag, line: 1 } if tag == "X"
        ));

        // Multi-character tags are not guessed at
        let err = parse_record("Sx 1 ACGT", 4).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownRecordType { ref tag, line: 4 } if tag == "Sx"
        ));
    }

    #[test]
    fn test_unknown_record_stops_reading() {
        let text = "S\t1\tACGT\nX foo bar\nS\t2\tACGT\nQ nope\n";
        let mut records = Records::new(text.as_bytes());

        assert!(matches!(records.next(), Some(Ok(Record::Segment(_)))));
        assert!(matches!(
            records.next(),
            Some(Err(ParseError::UnknownRecordType { line: 2, .. }))
        ));
        assert!(records.next().is_none());

        let err = parse_gfa_text(text).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let bytes: &[u8] = b"S\t1\tACGT\nS\t2\tAC\xffGT\nL\t1\t+\t2\t+\t2M\n";
        let err = read_records(bytes).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUtf8 { line: 2 }));
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.to_string(), "Line 2 is not valid UTF-8");
    }

    #[test]
    fn test_line_numbers_count_blank_lines() {
        let err = parse_gfa_text("\n\nS\t1\tACGT\n\nX\n").unwrap_err();
        assert_eq!(err.line(), Some(5));
    }

    #[test]
    fn test_truncated_records() {
        let err = parse_record("S only_id", 7).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedRecord {
                kind: 'S',
                line: 7,
                expected: 2,
                found: 1
            }
        ));

        let err = parse_record("L 1 + 2 +", 2).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedRecord {
                kind: 'L',
                expected: 5,
                found: 4,
                ..
            }
        ));

        let err = parse_record("C 1 + 2 + 5", 2).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedRecord { kind: 'C', .. }
        ));

        // A record that runs into end of input is truncated, not joined with
        // the next line
        let err = parse_gfa_text("S\t1\tACGT\nL\t1\t+\t1\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedRecord { kind: 'L', line: 2, .. }
        ));
    }

    #[test]
    fn test_invalid_orientation() {
        let err = parse_record("L 1 * 2 + 3M", 5).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidOrientation { ref value, line: 5 } if value == "*"
        ));

        let err = parse_record("L 1 ++ 2 + 3M", 5).unwrap_err();
        assert!(matches!(err, ParseError::InvalidOrientation { .. }));
    }

    #[test]
    fn test_invalid_offset() {
        let err = parse_record("C 1 + 2 + -3 3M", 9).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidOffset { ref value, line: 9 } if value == "-3"
        ));
        assert!(parse_record("C 1 + 2 + x 3M", 9).is_err());
    }

    #[test]
    fn test_read_file_missing_path() {
        let err = read_file(Path::new("/nonexistent/graph.gfa")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("graph.gfa.gz")));
        assert!(is_gzipped(Path::new("graph.GFA.BGZ")));
        assert!(!is_gzipped(Path::new("graph.gfa")));
        assert!(!is_gzipped(Path::new("graph")));
    }
}
