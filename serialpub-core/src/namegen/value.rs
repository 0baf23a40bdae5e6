//! The typed accumulator threaded through a channel pipeline
//!
//! A value moves monotonically from structured bibliographic data towards a
//! plain string:
//!
//! ```text
//! Part -> Volume -> Series -> SeriesString -> String
//! ```
//!
//! Non-terminal values carry three annotation slots (volume numbers, part
//! numbers and the finality/completeness marker). Rules either transform a
//! slot in place or render it to text; rendered slots are joined, in slot
//! order, when the value collapses into a [`Value::String`].

use crate::types::Fc;

/// Kind of one segment of a volume number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VnKind {
    /// Internal catalog number
    Internal,
    /// "Volume N" parsed from the title
    Volume,
    /// "Part X" parsed from the title
    Part,
    /// Several segments merged into a dotted number
    Merged,
    /// Free text that could not be parsed ("Short Stories")
    Special,
}

impl VnKind {
    /// Label used when the segment is spelled out
    pub fn label(self) -> Option<&'static str> {
        match self {
            VnKind::Volume | VnKind::Internal | VnKind::Merged => Some("Volume"),
            VnKind::Part => Some("Part"),
            VnKind::Special => None,
        }
    }
}

/// One segment of a volume number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VnSegment {
    pub text: String,
    pub kind: VnKind,
}

impl VnSegment {
    pub fn new(text: impl Into<String>, kind: VnKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Number of a single volume, possibly compound ("Volume 3 Part Two")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeNumber {
    /// Index of the volume in the request
    pub volume: usize,
    pub segments: Vec<VnSegment>,
}

impl VolumeNumber {
    pub fn internal(volume: usize, num: u32) -> Self {
        Self {
            volume,
            segments: vec![VnSegment::new(num.to_string(), VnKind::Internal)],
        }
    }

    /// Dotted single-string form ("6.1")
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Volume numbers of a value, one per volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeNumbers {
    pub numbers: Vec<VolumeNumber>,
    /// Set by `vn_merge`: the list renders in compact notation
    pub merged: bool,
}

impl VolumeNumbers {
    pub fn new(numbers: Vec<VolumeNumber>) -> Self {
        Self {
            numbers,
            merged: false,
        }
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Number of the volume at index `volume` in the request
    pub fn find(&self, volume: usize) -> Option<&VolumeNumber> {
        self.numbers.iter().find(|vn| vn.volume == volume)
    }

    /// Compact list notation: contiguous runs become `first-last`, the rest
    /// is comma-joined ("1-3,5"). Entries that are not plain integers never
    /// join a run.
    pub fn compact(&self) -> String {
        let texts: Vec<String> = self.numbers.iter().map(VolumeNumber::dotted).collect();
        let values: Vec<Option<u64>> = texts.iter().map(|t| t.parse().ok()).collect();

        let mut groups: Vec<String> = Vec::new();
        let mut start = 0;
        while start < texts.len() {
            let mut end = start;
            while end + 1 < texts.len() {
                match (values[end], values[end + 1]) {
                    (Some(a), Some(b)) if b == a + 1 => end += 1,
                    _ => break,
                }
            }
            if end > start {
                groups.push(format!("{}-{}", texts[start], texts[end]));
            } else {
                groups.push(texts[start].clone());
            }
            start = end + 1;
        }
        groups.join(",")
    }
}

/// Number of a single part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartNumber {
    /// Index of the part in the request
    pub part: usize,
    pub text: String,
}

/// State of an annotation slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    Absent,
    Raw(T),
    Rendered(String),
}

impl<T> Slot<T> {
    pub fn raw(&self) -> Option<&T> {
        match self {
            Slot::Raw(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Slot::Raw(_))
    }

    fn rendered(&self) -> Option<&str> {
        match self {
            Slot::Rendered(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Annotation slots shared by every non-terminal value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notes {
    pub volume_numbers: Slot<VolumeNumbers>,
    pub part_numbers: Slot<Vec<PartNumber>>,
    pub marker: Slot<Fc>,
}

impl Notes {
    /// Notes carrying only the FC marker
    pub fn marker(fc: Fc) -> Self {
        Self {
            volume_numbers: Slot::Absent,
            part_numbers: Slot::Absent,
            marker: Slot::Raw(fc),
        }
    }

    /// Rendered slots, in output order
    fn rendered(&self) -> impl Iterator<Item = &str> {
        [
            self.volume_numbers.rendered(),
            self.part_numbers.rendered(),
            self.marker.rendered(),
        ]
        .into_iter()
        .flatten()
    }
}

/// A single part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartValue {
    pub part: usize,
    pub notes: Notes,
}

/// A single volume with the parts packaged from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeValue {
    pub volume: usize,
    pub parts: Vec<usize>,
    pub notes: Notes,
}

/// The series, with the volumes and parts packaged from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesValue {
    pub volumes: Vec<usize>,
    pub parts: Vec<usize>,
    pub notes: Notes,
}

/// A derived series name no longer tied to the catalog title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesStringValue {
    pub name: String,
    pub volumes: Vec<usize>,
    pub parts: Vec<usize>,
    pub notes: Notes,
}

/// A terminal string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    pub text: String,
    /// Marker that was still unrendered when the value collapsed; `fc_short`
    /// and `fc_full` can append it once
    pub marker: Option<Fc>,
}

/// The pipeline accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Part(PartValue),
    Volume(VolumeValue),
    Series(SeriesValue),
    SeriesString(SeriesStringValue),
    /// Terminal: only string-level rules apply from here on
    String(StringValue),
}

impl Value {
    /// A terminal string with no pending marker
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(StringValue {
            text: text.into(),
            marker: None,
        })
    }

    /// Variant name used in error messages
    pub fn variant(&self) -> &'static str {
        match self {
            Value::Part(_) => "PartValue",
            Value::Volume(_) => "VolumeValue",
            Value::Series(_) => "SeriesValue",
            Value::SeriesString(_) => "SeriesStringValue",
            Value::String(_) => "StringValue",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Annotation slots of a non-terminal value
    pub fn notes(&self) -> Option<&Notes> {
        match self {
            Value::Part(v) => Some(&v.notes),
            Value::Volume(v) => Some(&v.notes),
            Value::Series(v) => Some(&v.notes),
            Value::SeriesString(v) => Some(&v.notes),
            Value::String(_) => None,
        }
    }

    pub fn notes_mut(&mut self) -> Option<&mut Notes> {
        match self {
            Value::Part(v) => Some(&mut v.notes),
            Value::Volume(v) => Some(&mut v.notes),
            Value::Series(v) => Some(&mut v.notes),
            Value::SeriesString(v) => Some(&mut v.notes),
            Value::String(_) => None,
        }
    }

    /// Collapse into a terminal string
    ///
    /// `head` is the text standing for the structural part of the value, if
    /// any; it is followed by every rendered slot. Raw number slots are
    /// dropped, a raw marker stays pending on the string.
    pub fn collapse(self, head: Option<String>) -> Value {
        let notes = match self {
            Value::String(s) => return Value::String(s),
            Value::Part(v) => v.notes,
            Value::Volume(v) => v.notes,
            Value::Series(v) => v.notes,
            Value::SeriesString(v) => v.notes,
        };
        let mut pieces: Vec<&str> = Vec::new();
        if let Some(head) = head.as_deref().filter(|h| !h.is_empty()) {
            pieces.push(head);
        }
        pieces.extend(notes.rendered());
        Value::String(StringValue {
            text: pieces.join(" "),
            marker: notes.marker.raw().copied(),
        })
    }
}
