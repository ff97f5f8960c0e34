use std::fs::File;
use std::io::{stdout, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use fastaseek::{index_fasta, OffsetIndex, SearchEngine};

#[derive(Parser)]
#[command(
    name = "fastaseek",
    about = "Index and search FASTA sequence files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the ID-to-offset index for a FASTA file
    Index {
        /// FASTA file to scan
        fasta: PathBuf,
        /// Index file to write
        index: PathBuf,
    },
    /// Print record pairs starting at an odd 1-based line number
    Range {
        /// FASTA file to read
        fasta: PathBuf,
        /// 1-based start line; must be odd, since headers occupy odd lines
        start_line: usize,
        /// Number of header/sequence pairs to print
        count: usize,
    },
    /// Print every record whose header contains the query, query-case-insensitively
    Header {
        /// FASTA file to scan
        fasta: PathBuf,
        /// Sequence ID or header fragment to look for
        query: String,
    },
    /// Run one full scan per query line, writing matches to a results file
    Batch {
        /// FASTA file to scan
        fasta: PathBuf,
        /// Text file with one query per line
        queries: PathBuf,
        /// File the matching records are written to
        results: PathBuf,
    },
    /// Seek-based exact-ID lookup through a prebuilt offset index
    Lookup {
        /// FASTA file to read
        fasta: PathBuf,
        /// Offset index built by the `index` command
        index: PathBuf,
        /// Text file with one sequence ID per line
        queries: PathBuf,
        /// File the matching records are written to
        results: PathBuf,
    },
    /// Print the IDs of records whose sequence contains a literal subsequence
    Subseq {
        /// FASTA file to scan
        fasta: PathBuf,
        /// Subsequence to look for, case-sensitive
        subsequence: String,
    },
    /// Print the IDs of records whose header contains a word, case-sensitively
    Keyword {
        /// FASTA file to scan
        fasta: PathBuf,
        /// Word to look for in header lines
        word: String,
    },
    /// Match sequence lines against a pattern where '*' matches any run
    Wildcard {
        /// FASTA file to scan
        fasta: PathBuf,
        /// Search pattern; every character other than '*' is matched literally
        pattern: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Index { fasta, index } => {
            let n_ids = index_fasta(&fasta, &index)?;
            info!("wrote {n_ids} entries to {}", index.display());
        }
        Command::Range {
            fasta,
            start_line,
            count,
        } => {
            if start_line == 0 || count == 0 {
                anyhow::bail!("start line and pair count must be positive integers");
            }
            if start_line % 2 == 0 {
                anyhow::bail!("start line must be an odd number, got {start_line}");
            }
            let mut out = stdout().lock();
            SearchEngine::from_path(&fasta)?.print_range(start_line, count, &mut out)?;
        }
        Command::Header { fasta, query } => {
            let mut out = stdout().lock();
            SearchEngine::from_path(&fasta)?.find_by_header(&query, &mut out)?;
        }
        Command::Batch {
            fasta,
            queries,
            results,
        } => {
            let queries = File::open(queries).map(BufReader::new)?;
            let mut out = File::create(&results).map(BufWriter::new)?;
            let mut console = stdout().lock();
            let total =
                SearchEngine::from_path(&fasta)?.find_batch(queries, &mut out, &mut console)?;
            out.flush()?;
            info!("wrote {total} matching records to {}", results.display());
        }
        Command::Lookup {
            fasta,
            index,
            queries,
            results,
        } => {
            let index = OffsetIndex::from_path(&index)?;
            let queries = File::open(queries).map(BufReader::new)?;
            let mut out = File::create(&results).map(BufWriter::new)?;
            let mut console = stdout().lock();
            let total = SearchEngine::from_path(&fasta)?.find_indexed(
                &index,
                queries,
                &mut out,
                &mut console,
            )?;
            out.flush()?;
            info!("wrote {total} matching records to {}", results.display());
        }
        Command::Subseq {
            fasta,
            subsequence,
        } => {
            let mut out = stdout().lock();
            SearchEngine::from_path(&fasta)?.find_by_subsequence(&subsequence, &mut out)?;
        }
        Command::Keyword { fasta, word } => {
            let mut out = stdout().lock();
            SearchEngine::from_path(&fasta)?.find_by_keyword(&word, &mut out)?;
        }
        Command::Wildcard { fasta, pattern } => {
            let mut out = stdout().lock();
            SearchEngine::from_path(&fasta)?.find_by_pattern(&pattern, &mut out)?;
        }
    }

    Ok(())
}
