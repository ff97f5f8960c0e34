mod error;
mod index;
mod record;
mod scanner;
mod search;

pub use error::{Error, FormatError, IndexError, Result, ScanError};
pub use index::{index_fasta, LineSpan, OffsetIndex, OffsetIndexer, LINE_TERMINATOR_WIDTH};
pub use record::{extract_ids, is_header_line, FastaRecord, HEADER_MARKER};
pub use scanner::FastaScanner;
pub use search::{compile_wildcard, SearchEngine};
