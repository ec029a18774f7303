use serde::{Deserialize, Serialize};

/// Reading direction of a segment within a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// `+`: the sequence as stored
    #[serde(rename = "+")]
    Forward,
    /// `-`: the reverse complement of the stored sequence
    #[serde(rename = "-")]
    Reverse,
}

impl Orientation {
    /// Parse an orientation from its GFA symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Orientation::Forward),
            '-' => Some(Orientation::Reverse),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
        }
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, Orientation::Reverse)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// `H` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Everything after the tag, unparsed
    pub text: String,
}

/// `S` line: a named base sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub sequence: String,
}

impl Segment {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// `L` line: overlap between the end of `id[0]` and the start of `id[1]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: [String; 2],
    pub orientation: [Orientation; 2],
    pub cigar: String,
}

/// `C` line: `id[1]` lies inside `id[0]` starting at `offset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Containment {
    pub id: [String; 2],
    pub orientation: [Orientation; 2],
    pub offset: usize,
    pub cigar: String,
}

/// One parsed GFA line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Header(Header),
    Segment(Segment),
    Link(Link),
    Containment(Containment),
}

impl Record {
    /// The single-character tag this record was read from
    pub fn tag(&self) -> char {
        match self {
            Record::Header(_) => 'H',
            Record::Segment(_) => 'S',
            Record::Link(_) => 'L',
            Record::Containment(_) => 'C',
        }
    }
}

/// All records of a GFA file, split by kind and kept in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GfaFile {
    pub headers: Vec<Header>,
    pub segments: Vec<Segment>,
    pub links: Vec<Link>,
    pub containments: Vec<Containment>,
}

impl GfaFile {
    pub fn push(&mut self, record: Record) {
        match record {
            Record::Header(h) => self.headers.push(h),
            Record::Segment(s) => self.segments.push(s),
            Record::Link(l) => self.links.push(l),
            Record::Containment(c) => self.containments.push(c),
        }
    }

    /// Number of relationships (links plus containments)
    pub fn relationship_count(&self) -> usize {
        self.links.len() + self.containments.len()
    }
}

impl FromIterator<Record> for GfaFile {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut file = GfaFile::default();
        for record in iter {
            file.push(record);
        }
        file
    }
}
