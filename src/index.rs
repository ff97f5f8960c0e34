//! Byte-offset index over FASTA header lines
//!
//! This module provides the two halves of the offset index:
//!
//! 1. [`OffsetIndexer`] scans a FASTA stream once and emits a persisted
//!    mapping of sequence ID to header-line byte offset.
//! 2. [`OffsetIndex`] loads a persisted mapping back for O(1) lookup,
//!    enabling seek-based record retrieval instead of a linear scan.
//!
//! The persisted format is plain text, one `<ID><space><decimal offset>`
//! record per line, with no header row and no ordering guarantee beyond
//! the order IDs were encountered.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::record::{extract_ids, HEADER_MARKER};

/// Width of the line terminator assumed by the offset arithmetic, in bytes
///
/// Offsets are accumulated as `line length + LINE_TERMINATOR_WIDTH`, so the
/// index is only valid for input using single-byte (`\n`) terminators. A
/// file with two-byte (`\r\n`) terminators would drift by one byte per
/// preceding line.
pub const LINE_TERMINATOR_WIDTH: u64 = 1;

/// Position and extent of one line within the source file
///
/// The length includes the line terminator. Spans are accumulated while
/// indexing and exposed read-only; their running sum is by construction
/// the byte offset of the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// Byte offset of the first byte of the line
    pub offset: u64,
    /// Line length in bytes, including the terminator
    pub len: u64,
}

/// Single-pass builder of the persisted ID-to-offset mapping
///
/// The indexer maintains a running byte cursor from the start of the
/// stream. Every header line has each of its IDs written as one
/// `ID offset` output record, where the offset is the byte position of the
/// start of that line. All IDs on one header line share the same offset,
/// since they all resolve to the same line start.
#[derive(Debug)]
pub struct OffsetIndexer<W: Write> {
    out: W,
    cursor: u64,
    lines: Vec<LineSpan>,
    n_ids: usize,
}

impl<W: Write> OffsetIndexer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cursor: 0,
            lines: Vec::new(),
            n_ids: 0,
        }
    }

    /// Consumes every line of a FASTA stream in original line order
    pub fn scan<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            self.index_line(&line?)?;
        }
        Ok(())
    }

    /// Accounts for one line, emitting index entries if it is a header
    ///
    /// The line must be passed without its terminator; the cursor advances
    /// by `line.len() + LINE_TERMINATOR_WIDTH` afterwards.
    pub fn index_line(&mut self, line: &str) -> Result<()> {
        if line.starts_with(HEADER_MARKER) {
            for id in extract_ids(line)? {
                self.write_entry(id)?;
            }
        }
        let len = line.len() as u64 + LINE_TERMINATOR_WIDTH;
        self.lines.push(LineSpan {
            offset: self.cursor,
            len,
        });
        self.cursor += len;
        Ok(())
    }

    fn write_entry(&mut self, id: &str) -> Result<()> {
        let mut buf = itoa::Buffer::new();
        self.out.write_all(id.as_bytes())?;
        self.out.write_all(b" ")?;
        self.out.write_all(buf.format(self.cursor).as_bytes())?;
        self.out.write_all(b"\n")?;
        self.n_ids += 1;
        Ok(())
    }

    /// Line-position table accumulated so far
    #[must_use]
    pub fn line_table(&self) -> &[LineSpan] {
        &self.lines
    }

    /// Number of `ID offset` entries written so far
    #[must_use]
    pub fn ids_written(&self) -> usize {
        self.n_ids
    }

    /// Total number of bytes accounted for, terminators included
    #[must_use]
    pub fn bytes_scanned(&self) -> u64 {
        self.cursor
    }

    /// Flushes the output and returns the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        log::info!(
            "indexed {} lines ({} bytes), wrote {} id entries",
            self.lines.len(),
            self.cursor,
            self.n_ids
        );
        Ok(self.out)
    }
}

/// Builds an index file for a FASTA file, returning the entry count
pub fn index_fasta<P: AsRef<Path>, Q: AsRef<Path>>(fasta: P, index: Q) -> Result<usize> {
    let reader = File::open(fasta).map(BufReader::new)?;
    let out = File::create(index).map(BufWriter::new)?;
    let mut indexer = OffsetIndexer::new(out);
    indexer.scan(reader)?;
    let n_ids = indexer.ids_written();
    indexer.finish()?;
    Ok(n_ids)
}

/// A loaded ID-to-offset mapping for random-access lookup
///
/// The mapping is an explicit-ownership key-value structure: construct it
/// once per invocation and pass it by reference into the lookup operation.
/// On duplicate IDs the later occurrence overwrites the earlier
/// (last-write-wins).
///
/// ```rust
/// use fastaseek::OffsetIndex;
///
/// let index = OffsetIndex::from_reader("NR_0001 0\nNR_0002 56\n".as_bytes()).unwrap();
/// assert_eq!(index.lookup("NR_0002"), Some(56));
/// assert_eq!(index.lookup("NR_9999"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OffsetIndex {
    entries: HashMap<String, u64>,
}

impl OffsetIndex {
    /// Loads a persisted index from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path).map(BufReader::new)?;
        Self::from_reader(reader)
    }

    /// Parses a persisted index from any buffered reader
    ///
    /// Every line must split into exactly two whitespace-separated fields
    /// with the second a decimal `u64`; anything else aborts the load with
    /// an [`IndexError`] carrying the 1-based line number.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries = HashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(id), Some(offset), None) => {
                    let offset = offset
                        .parse::<u64>()
                        .map_err(|source| IndexError::InvalidOffset {
                            line: line_no,
                            source,
                        })?;
                    entries.insert(id.to_string(), offset);
                }
                _ => {
                    return Err(IndexError::MalformedEntry {
                        line: line_no,
                        content: line.clone(),
                    }
                    .into())
                }
            }
        }
        log::debug!("loaded offset index with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Returns the stored offset for an ID, if present
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<u64> {
        self.entries.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
