//! Search engine over FASTA streams
//!
//! Implements the seven search modes: positional range retrieval, header
//! substring match, batch brute-force lookup, offset-index-accelerated
//! lookup, exact subsequence search, keyword search, and wildcard pattern
//! search.
//!
//! Every mode consumes the engine, so the source stream is released on all
//! exit paths, success or failure. Matches stream to a generic `Write`
//! sink; the batch modes additionally take a console sink for per-query
//! not-found reports. Zero matches is a reported outcome, never an error.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, Write};
use std::path::Path;

use memchr::memmem::Finder;
use regex::Regex;

use crate::error::{FormatError, Result, ScanError};
use crate::index::OffsetIndex;
use crate::record::{extract_ids, is_header_line};
use crate::scanner::FastaScanner;

/// Search modes over one open FASTA source
#[derive(Debug)]
pub struct SearchEngine<R> {
    scanner: FastaScanner<R>,
}

impl SearchEngine<BufReader<File>> {
    /// Opens a FASTA file and positions the engine at its start
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(FastaScanner::from_path(path)?))
    }
}

impl<R: BufRead + Seek> SearchEngine<R> {
    pub fn new(scanner: FastaScanner<R>) -> Self {
        Self { scanner }
    }

    /// Positional range read: prints `count` record pairs starting at a
    /// 1-based odd line number
    ///
    /// Header lines occupy odd positions in a well-formed file, so an even
    /// (or zero) `start_line` is rejected before any I/O. Each pair is
    /// checked (first line a header, second not) and a violation aborts
    /// the remainder of the call, leaving previously printed pairs emitted.
    pub fn print_range<W: Write>(
        mut self,
        start_line: usize,
        count: usize,
        out: &mut W,
    ) -> Result<()> {
        if start_line % 2 == 0 {
            return Err(ScanError::EvenStartLine(start_line).into());
        }
        self.scanner.skip_lines(start_line - 1)?;
        for emitted in 0..count {
            let Some(record) = self.scanner.next_record()? else {
                return Err(ScanError::InsufficientData {
                    requested: count,
                    available: emitted,
                }
                .into());
            };
            if !is_header_line(&record.header)? {
                return Err(FormatError::MissingMarker(record.header).into());
            }
            if is_header_line(&record.sequence)? {
                return Err(FormatError::UnexpectedMarker(record.sequence).into());
            }
            writeln!(out, "{}", record.header)?;
            writeln!(out, "{}", record.sequence)?;
        }
        Ok(())
    }

    /// Header substring search: prints every pair whose header contains
    /// the uppercased query
    ///
    /// Lookups are query-case-insensitive but header text is not altered.
    pub fn find_by_header<W: Write>(mut self, query: &str, out: &mut W) -> Result<usize> {
        let needle = query.to_uppercase();
        let finder = Finder::new(needle.as_bytes());
        let matched = Self::scan_headers(&mut self.scanner, &finder, out)?;
        if matched == 0 {
            writeln!(out, "Error: sequence {query} not found")?;
        }
        Ok(matched)
    }

    /// Batch substring search: one full linear scan per query line
    ///
    /// Matches go to `out`; a not-found report per unmatched query goes to
    /// `console`. Cost is O(queries x file size); the indexed variant
    /// [`Self::find_indexed`] exists for exactly this contrast.
    pub fn find_batch<Q, W, C>(mut self, queries: Q, out: &mut W, console: &mut C) -> Result<usize>
    where
        Q: BufRead,
        W: Write,
        C: Write,
    {
        let mut total = 0;
        for query in queries.lines() {
            let query = query?;
            self.scanner.rewind()?;
            let needle = query.to_uppercase();
            let finder = Finder::new(needle.as_bytes());
            let matched = Self::scan_headers(&mut self.scanner, &finder, out)?;
            if matched == 0 {
                writeln!(console, "Error: sequence {query} not found")?;
            }
            total += matched;
        }
        Ok(total)
    }

    /// Indexed exact-ID lookup: O(1) seek per query instead of a scan
    ///
    /// The caller owns the loaded index and passes it by reference. A hit
    /// seeks straight to the recorded offset and reads exactly one pair.
    pub fn find_indexed<Q, W, C>(
        mut self,
        index: &OffsetIndex,
        queries: Q,
        out: &mut W,
        console: &mut C,
    ) -> Result<usize>
    where
        Q: BufRead,
        W: Write,
        C: Write,
    {
        let mut total = 0;
        for query in queries.lines() {
            let query = query?;
            if let Some(offset) = index.lookup(&query) {
                self.scanner.seek_to(offset)?;
                let Some(record) = self.scanner.next_record()? else {
                    // stale index entry pointing past the end of the file
                    return Err(FormatError::TruncatedRecord(query).into());
                };
                writeln!(out, "{}", record.header)?;
                writeln!(out, "{}", record.sequence)?;
                total += 1;
            } else {
                writeln!(console, "Error: sequence {query} not found")?;
            }
        }
        Ok(total)
    }

    /// Exact subsequence search: prints every ID of records whose sequence
    /// line contains the literal subsequence, case-sensitive
    ///
    /// Unlike the header searches, every encountered header is checked for
    /// validity and a violation propagates.
    pub fn find_by_subsequence<W: Write>(
        mut self,
        subsequence: &str,
        out: &mut W,
    ) -> Result<usize> {
        let finder = Finder::new(subsequence.as_bytes());
        let mut matched = 0;
        while let Some(record) = self.scanner.next_record()? {
            if !is_header_line(&record.header)? {
                return Err(FormatError::MissingMarker(record.header).into());
            }
            if finder.find(record.sequence.as_bytes()).is_some() {
                for id in extract_ids(&record.header)? {
                    writeln!(out, "{id}")?;
                }
                matched += 1;
            }
        }
        if matched == 0 {
            writeln!(out, "Error: sequence {subsequence} not found")?;
        }
        Ok(matched)
    }

    /// Keyword search: prints every ID of records whose header contains
    /// the word as a literal, case-sensitive substring
    pub fn find_by_keyword<W: Write>(mut self, word: &str, out: &mut W) -> Result<usize> {
        let finder = Finder::new(word.as_bytes());
        let mut matched = 0;
        while let Some(record) = self.scanner.next_record()? {
            if !is_header_line(&record.header)? {
                return Err(FormatError::MissingMarker(record.header).into());
            }
            if finder.find(record.header.as_bytes()).is_some() {
                for id in extract_ids(&record.header)? {
                    writeln!(out, "{id}")?;
                }
                matched += 1;
            }
        }
        if matched == 0 {
            writeln!(out, "Error: word '{word}' not found")?;
        }
        Ok(matched)
    }

    /// Wildcard pattern search over sequence lines
    ///
    /// The match counter increments once per ID of each matching record,
    /// not once per record. The total and an echo of the original pattern
    /// are always reported, matches or not.
    pub fn find_by_pattern<W: Write>(mut self, pattern: &str, out: &mut W) -> Result<usize> {
        let matcher = compile_wildcard(pattern)?;
        let mut total = 0;
        let mut any_record_matched = false;
        while let Some(record) = self.scanner.next_record()? {
            if !is_header_line(&record.header)? {
                return Err(FormatError::MissingMarker(record.header).into());
            }
            if matcher.is_match(&record.sequence) {
                any_record_matched = true;
                for id in extract_ids(&record.header)? {
                    total += 1;
                    writeln!(out, "Match found in: {id}")?;
                }
            }
        }
        if !any_record_matched {
            writeln!(out, "Error: word '{pattern}' not found")?;
        }
        writeln!(out, "Total matches found: {total}")?;
        writeln!(out, "Search string used:")?;
        writeln!(out, "{pattern}")?;
        Ok(total)
    }

    fn scan_headers<W: Write>(
        scanner: &mut FastaScanner<R>,
        finder: &Finder<'_>,
        out: &mut W,
    ) -> Result<usize> {
        let mut matched = 0;
        while let Some(record) = scanner.next_record()? {
            if finder.find(record.header.as_bytes()).is_some() {
                writeln!(out, "{}", record.header)?;
                writeln!(out, "{}", record.sequence)?;
                matched += 1;
            }
        }
        Ok(matched)
    }
}

/// Translates a wildcard pattern into a compiled matcher
///
/// Every `*` matches any run of characters; everything else is matched
/// literally, with pattern metacharacters in the query escaped rather than
/// passed through to the pattern engine. The pattern is unanchored.
pub fn compile_wildcard(pattern: &str) -> Result<Regex> {
    let translated = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Ok(Regex::new(&translated)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::index::OffsetIndexer;
    use std::io::Cursor;

    const FASTA: &str = ">ID1 desc\nAAAA\n>ID2 desc\nCCCC\n";

    fn engine(data: &'static str) -> SearchEngine<Cursor<&'static [u8]>> {
        SearchEngine::new(FastaScanner::new(Cursor::new(data.as_bytes())))
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn range_rejects_even_start_before_any_output() {
        let mut out = Vec::new();
        let err = engine(FASTA).print_range(2, 1, &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::ScanError(ScanError::EvenStartLine(2))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn range_prints_pairs_from_odd_start() -> Result<()> {
        let mut out = Vec::new();
        engine(FASTA).print_range(3, 1, &mut out)?;
        assert_eq!(text(out), ">ID2 desc\nCCCC\n");
        Ok(())
    }

    #[test]
    fn range_past_end_is_insufficient_data() {
        let mut out = Vec::new();
        let err = engine(FASTA).print_range(1, 3, &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::ScanError(ScanError::InsufficientData {
                requested: 3,
                available: 2,
            })
        ));
        // the two complete pairs stay emitted; no rollback
        assert_eq!(text(out), FASTA);
    }

    #[test]
    fn range_detects_misplaced_marker() {
        let mut out = Vec::new();
        let err = engine(">ID1 desc\n>ID2 desc\nCCCC\nAAAA\n")
            .print_range(1, 2, &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FormatError(FormatError::UnexpectedMarker(_))
        ));
    }

    #[test]
    fn header_search_is_query_case_insensitive() -> Result<()> {
        let mut out = Vec::new();
        let matched = engine(FASTA).find_by_header("id1", &mut out)?;
        assert_eq!(matched, 1);
        assert_eq!(text(out), ">ID1 desc\nAAAA\n");
        Ok(())
    }

    #[test]
    fn header_search_reports_not_found() -> Result<()> {
        let mut out = Vec::new();
        let matched = engine(FASTA).find_by_header("ID9", &mut out)?;
        assert_eq!(matched, 0);
        assert_eq!(text(out), "Error: sequence ID9 not found\n");
        Ok(())
    }

    #[test]
    fn batch_search_rewinds_per_query() -> Result<()> {
        let queries = Cursor::new(b"ID2\nID1\nID9\n".as_slice());
        let (mut out, mut console) = (Vec::new(), Vec::new());
        let total = engine(FASTA).find_batch(queries, &mut out, &mut console)?;
        assert_eq!(total, 2);
        assert_eq!(text(out), ">ID2 desc\nCCCC\n>ID1 desc\nAAAA\n");
        assert_eq!(text(console), "Error: sequence ID9 not found\n");
        Ok(())
    }

    #[test]
    fn empty_query_file_produces_no_output_at_all() -> Result<()> {
        let queries = Cursor::new(b"".as_slice());
        let (mut out, mut console) = (Vec::new(), Vec::new());
        let total = engine(FASTA).find_batch(queries, &mut out, &mut console)?;
        assert_eq!(total, 0);
        assert!(out.is_empty());
        assert!(console.is_empty());
        Ok(())
    }

    #[test]
    fn indexed_lookup_seeks_to_the_recorded_pair() -> Result<()> {
        let mut indexer = OffsetIndexer::new(Vec::new());
        indexer.scan(Cursor::new(FASTA.as_bytes()))?;
        let index = OffsetIndex::from_reader(indexer.finish()?.as_slice())?;

        let queries = Cursor::new(b"ID2\nID9\n".as_slice());
        let (mut out, mut console) = (Vec::new(), Vec::new());
        let total = engine(FASTA).find_indexed(&index, queries, &mut out, &mut console)?;
        assert_eq!(total, 1);
        assert_eq!(text(out), ">ID2 desc\nCCCC\n");
        assert_eq!(text(console), "Error: sequence ID9 not found\n");
        Ok(())
    }

    #[test]
    fn absent_id_leaves_results_sink_untouched() -> Result<()> {
        let index = OffsetIndex::from_reader("ID1 0\n".as_bytes())?;
        let queries = Cursor::new(b"ID9\n".as_slice());
        let (mut out, mut console) = (Vec::new(), Vec::new());
        engine(FASTA).find_indexed(&index, queries, &mut out, &mut console)?;
        assert!(out.is_empty());
        assert_eq!(text(console), "Error: sequence ID9 not found\n");
        Ok(())
    }

    #[test]
    fn batch_and_indexed_agree_on_exact_id_queries() -> Result<()> {
        let mut indexer = OffsetIndexer::new(Vec::new());
        indexer.scan(Cursor::new(FASTA.as_bytes()))?;
        let index = OffsetIndex::from_reader(indexer.finish()?.as_slice())?;

        let (mut brute, mut seek) = (Vec::new(), Vec::new());
        let mut console = Vec::new();
        engine(FASTA).find_batch(
            Cursor::new(b"ID1\nID2\n".as_slice()),
            &mut brute,
            &mut console,
        )?;
        engine(FASTA).find_indexed(
            &index,
            Cursor::new(b"ID1\nID2\n".as_slice()),
            &mut seek,
            &mut console,
        )?;
        assert_eq!(brute, seek);
        assert!(console.is_empty());
        Ok(())
    }

    #[test]
    fn subsequence_search_prints_ids_of_matching_records() -> Result<()> {
        let mut out = Vec::new();
        let matched = engine(FASTA).find_by_subsequence("CC", &mut out)?;
        assert_eq!(matched, 1);
        assert_eq!(text(out), "ID2\n");
        Ok(())
    }

    #[test]
    fn subsequence_search_is_case_sensitive() -> Result<()> {
        let mut out = Vec::new();
        let matched = engine(FASTA).find_by_subsequence("cc", &mut out)?;
        assert_eq!(matched, 0);
        assert_eq!(text(out), "Error: sequence cc not found\n");
        Ok(())
    }

    #[test]
    fn subsequence_search_propagates_invalid_headers() {
        let mut out = Vec::new();
        let err = engine("BAD HEADER\nACGT\n")
            .find_by_subsequence("ACGT", &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FormatError(FormatError::MissingMarker(_))
        ));
    }

    #[test]
    fn keyword_search_hits_every_record_with_the_word() -> Result<()> {
        let mut out = Vec::new();
        let matched = engine(FASTA).find_by_keyword("desc", &mut out)?;
        assert_eq!(matched, 2);
        assert_eq!(text(out), "ID1\nID2\n");
        Ok(())
    }

    #[test]
    fn keyword_search_reports_multi_id_headers() -> Result<()> {
        let mut out = Vec::new();
        let matched = engine(">ID1 group>ID2 group\nAAAA\n").find_by_keyword("group", &mut out)?;
        assert_eq!(matched, 1);
        assert_eq!(text(out), "ID1\nID2\n");
        Ok(())
    }

    #[test]
    fn wildcard_translation_matches_any_run() -> Result<()> {
        let matcher = compile_wildcard("AC*GT")?;
        assert!(matcher.is_match("ACXXXXGT"));
        assert!(matcher.is_match("ACGT"));
        assert!(!matcher.is_match("AGT"));
        Ok(())
    }

    #[test]
    fn wildcard_escapes_other_metacharacters() -> Result<()> {
        let matcher = compile_wildcard("AC.G")?;
        assert!(matcher.is_match("AC.G"));
        assert!(!matcher.is_match("ACTG"));
        Ok(())
    }

    #[test]
    fn pattern_search_counts_per_id_and_echoes_pattern() -> Result<()> {
        let mut out = Vec::new();
        let total = engine(">ID1 a>ID2 b\nACGGGGT\n>ID3 c\nTTTT\n")
            .find_by_pattern("AC*GT", &mut out)?;
        assert_eq!(total, 2);
        assert_eq!(
            text(out),
            "Match found in: ID1\nMatch found in: ID2\n\
             Total matches found: 2\nSearch string used:\nAC*GT\n"
        );
        Ok(())
    }

    #[test]
    fn pattern_search_echoes_even_without_matches() -> Result<()> {
        let mut out = Vec::new();
        let total = engine(FASTA).find_by_pattern("GGGG", &mut out)?;
        assert_eq!(total, 0);
        assert_eq!(
            text(out),
            "Error: word 'GGGG' not found\n\
             Total matches found: 0\nSearch string used:\nGGGG\n"
        );
        Ok(())
    }

    #[test]
    fn truncated_file_is_signaled_mid_scan() {
        let mut out = Vec::new();
        let err = engine(">ID1 desc\nAAAA\n>ID2 orphan\n")
            .find_by_header("ID1", &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FormatError(FormatError::TruncatedRecord(_))
        ));
        // the matching pair seen before the truncation stays emitted
        assert_eq!(text(out), ">ID1 desc\nAAAA\n");
    }
}
