use crate::error::{FormatError, Result};

/// Marker character that opens every FASTA header line
pub const HEADER_MARKER: char = '>';

/// A single FASTA record: one header line paired with one sequence line
///
/// Records are read transiently from a stream and never mutated. The header
/// keeps its `>` marker and any description text; the sequence is one line
/// of residue characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// The full header line, including the leading `>` marker
    pub header: String,
    /// The sequence line paired with the header
    pub sequence: String,
}

impl FastaRecord {
    #[must_use]
    pub fn new(header: String, sequence: String) -> Self {
        Self { header, sequence }
    }
}

/// Tests whether a line is a valid FASTA header line
///
/// Returns `Ok(true)` iff the first character of the line is the `>` marker.
/// An empty line is not a valid record line of either kind and yields
/// [`FormatError::EmptyLine`] rather than `Ok(false)`.
pub fn is_header_line(line: &str) -> Result<bool> {
    match line.chars().next() {
        Some(c) => Ok(c == HEADER_MARKER),
        None => Err(FormatError::EmptyLine.into()),
    }
}

/// Extracts every sequence ID from a header line, in order of appearance
///
/// A header line may concatenate multiple sub-headers using `>` as an
/// internal separator (`>ID1 desc>ID2 desc`). Each non-empty segment
/// contributes its first whitespace-delimited token as one ID; segments
/// with no token are skipped. Fails with [`FormatError::MissingMarker`]
/// when the line is not a header line at all.
pub fn extract_ids(line: &str) -> Result<Vec<&str>> {
    if !is_header_line(line)? {
        return Err(FormatError::MissingMarker(line.to_string()).into());
    }
    let ids = line
        .split(HEADER_MARKER)
        .filter_map(|segment| segment.split_whitespace().next())
        .collect();
    Ok(ids)
}
