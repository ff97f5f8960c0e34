//! Stream-based FASTA scanner
//!
//! This module exposes FASTA content as a rewindable sequence of
//! (header, sequence) record pairs, plus raw positional and line access.
//! The scanner is generic over any `BufRead + Seek` source, so the same
//! code path serves buffered files and in-memory streams.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::{FormatError, Result, ScanError};
use crate::record::FastaRecord;

/// A rewindable reader over a FASTA stream producing header/sequence pairs
#[derive(Debug)]
pub struct FastaScanner<R> {
    inner: R,
    line: String,
}

impl FastaScanner<BufReader<File>> {
    /// Opens a FASTA file for scanning through a buffered reader
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = File::open(path).map(BufReader::new)?;
        Ok(Self::new(inner))
    }
}

impl<R: BufRead + Seek> FastaScanner<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
        }
    }

    /// Reads the next line into the internal buffer, stripping the terminator
    ///
    /// Returns `Ok(false)` on a clean end of stream.
    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        if self.inner.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        if self.line.ends_with('\n') {
            self.line.pop();
            if self.line.ends_with('\r') {
                self.line.pop();
            }
        }
        Ok(true)
    }

    /// Seeks the underlying stream to an absolute byte offset
    ///
    /// Used for index-guided lookup. Any buffered read-ahead is discarded
    /// on seek (`BufReader` drops its buffer), so no stale line can leak
    /// into the next read.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Repositions the stream to its start, discarding buffered state
    pub fn rewind(&mut self) -> Result<()> {
        self.seek_to(0)
    }

    /// Reads one header line and one sequence line
    ///
    /// Returns `Ok(None)` when the header read hits a clean end of stream.
    /// A header followed by end of stream is a truncated record and is
    /// signaled, never silently dropped. No validity checks are applied
    /// here; strictness belongs to the individual search modes.
    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if !self.read_line()? {
            return Ok(None);
        }
        let header = self.line.clone();
        if !self.read_line()? {
            return Err(FormatError::TruncatedRecord(header).into());
        }
        Ok(Some(FastaRecord::new(header, self.line.clone())))
    }

    /// Advances past exactly `n` lines without interpreting them
    pub fn skip_lines(&mut self, n: usize) -> Result<()> {
        for consumed in 0..n {
            if !self.read_line()? {
                return Err(ScanError::InsufficientData {
                    requested: n,
                    available: consumed,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    const FASTA: &str = ">ID1 first\nAAAA\n>ID2 second\nCCCC\n";

    fn scanner() -> FastaScanner<Cursor<&'static [u8]>> {
        FastaScanner::new(Cursor::new(FASTA.as_bytes()))
    }

    #[test]
    fn reads_records_in_order() -> Result<()> {
        let mut sc = scanner();
        let first = sc.next_record()?.unwrap();
        assert_eq!(first.header, ">ID1 first");
        assert_eq!(first.sequence, "AAAA");
        let second = sc.next_record()?.unwrap();
        assert_eq!(second.header, ">ID2 second");
        assert_eq!(second.sequence, "CCCC");
        assert!(sc.next_record()?.is_none());
        Ok(())
    }

    #[test]
    fn truncated_record_is_signaled() {
        let mut sc = FastaScanner::new(Cursor::new(b">ID1 lonely header\n".as_slice()));
        let err = sc.next_record().unwrap_err();
        assert!(matches!(
            err,
            Error::FormatError(FormatError::TruncatedRecord(_))
        ));
    }

    #[test]
    fn rewind_restarts_the_stream() -> Result<()> {
        let mut sc = scanner();
        sc.next_record()?;
        sc.next_record()?;
        sc.rewind()?;
        let first = sc.next_record()?.unwrap();
        assert_eq!(first.header, ">ID1 first");
        Ok(())
    }

    #[test]
    fn seek_discards_buffered_state() -> Result<()> {
        let mut sc = scanner();
        sc.next_record()?;
        // ">ID1 first\nAAAA\n" is 16 bytes; the second header starts there
        sc.seek_to(16)?;
        let rec = sc.next_record()?.unwrap();
        assert_eq!(rec.header, ">ID2 second");
        Ok(())
    }

    #[test]
    fn skip_lines_counts_exactly() -> Result<()> {
        let mut sc = scanner();
        sc.skip_lines(2)?;
        let rec = sc.next_record()?.unwrap();
        assert_eq!(rec.header, ">ID2 second");
        Ok(())
    }

    #[test]
    fn skip_lines_past_end_is_insufficient_data() {
        let mut sc = scanner();
        let err = sc.skip_lines(5).unwrap_err();
        match err {
            Error::ScanError(ScanError::InsufficientData {
                requested,
                available,
            }) => {
                assert_eq!(requested, 5);
                assert_eq!(available, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn crlf_terminators_are_stripped_from_lines() -> Result<()> {
        let mut sc = FastaScanner::new(Cursor::new(b">ID1 desc\r\nACGT\r\n".as_slice()));
        let rec = sc.next_record()?.unwrap();
        assert_eq!(rec.header, ">ID1 desc");
        assert_eq!(rec.sequence, "ACGT");
        Ok(())
    }
}
