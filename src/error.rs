/// Custom Result type for fastaseek operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the fastaseek library, encompassing all possible error
/// cases that can occur while indexing or searching FASTA files.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors related to FASTA record structure and validity
    FormatError(#[from] FormatError),
    /// Errors that occur while positioning or advancing the scanner
    ScanError(#[from] ScanError),
    /// Errors that occur while loading a persisted offset index
    IndexError(#[from] IndexError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// Errors from compiling a wildcard search pattern
    PatternError(#[from] regex::Error),
}

/// Errors specific to the structure of FASTA record lines
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// An empty line was found where a record line was expected
    ///
    /// Emptiness is a distinct condition from "not a header line": callers
    /// asking whether a line is a header must not receive a plain `false`
    /// for input that has no first character at all.
    #[error("Empty line encountered where a record line was expected")]
    EmptyLine,

    /// A line asserted to be a header does not begin with the `>` marker
    ///
    /// # Arguments
    /// * `String` - The offending line
    #[error("Sequence header line does not begin with '>': {0:?}")]
    MissingMarker(String),

    /// A line in sequence position unexpectedly begins with the `>` marker
    ///
    /// # Arguments
    /// * `String` - The offending line
    #[error("Sequence line unexpectedly begins with '>': {0:?}")]
    UnexpectedMarker(String),

    /// End of stream was reached after a header line but before its
    /// paired sequence line
    ///
    /// # Arguments
    /// * `String` - The header line left without a sequence
    #[error("Record truncated: end of file reached after header {0:?}")]
    TruncatedRecord(String),
}

/// Errors that can occur while positioning or advancing over a FASTA stream
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Fewer lines remain in the stream than were requested
    ///
    /// # Fields
    /// * `requested` - The number of lines or records asked for
    /// * `available` - The number actually consumed before end of stream
    #[error("Requested {requested} lines but only {available} remain before end of file")]
    InsufficientData { requested: usize, available: usize },

    /// A positional read was given an even (or zero) start line
    ///
    /// Header lines occupy odd positions in a well-formed file, so an even
    /// start is an invalid argument rejected before any I/O is attempted.
    ///
    /// # Arguments
    /// * `usize` - The rejected start line
    #[error("Start line must be an odd positive number, got {0}")]
    EvenStartLine(usize),
}

/// Errors that can occur while loading a persisted ID-to-offset index
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// An index line does not split into exactly two whitespace-separated fields
    ///
    /// # Fields
    /// * `line` - The 1-based line number within the index file
    /// * `content` - The malformed line
    #[error("Malformed index entry at line {line}: expected '<id> <offset>', got {content:?}")]
    MalformedEntry { line: usize, content: String },

    /// The offset field of an index line is not a valid non-negative integer
    ///
    /// # Fields
    /// * `line` - The 1-based line number within the index file
    /// * `source` - The underlying integer parse failure
    #[error("Invalid byte offset in index entry at line {line}: {source}")]
    InvalidOffset {
        line: usize,
        source: std::num::ParseIntError,
    },
}
