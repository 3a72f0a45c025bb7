//! Archive construction: the ordered ingestion pipeline.
//!
//! 1. Chunk the raw bytes, repairing known-bad header lines.
//! 2. Parse every chunk and apply the moderation tables.
//! 3. Register the posts, rejecting duplicate identities.
//! 4. Link references, synthesizing placeholders for missing posts.
//! 5. Bucket and index the listed posts.
//!
//! Each stage finishes before the next one starts. Per-message failures are
//! collected in the [`IngestReport`] rather than aborting the run.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::archive::Archive;
use crate::error::{ArchiveError, IngestFailure, Result};
use crate::flags::FlagTables;
use crate::model::post::Post;
use crate::parser::chunk::split_chunks;
use crate::parser::header::split_header;
use crate::parser::post::parse_post;
use crate::parser::repair::RepairTable;

/// How many failures the summary shows verbatim.
pub const FAILURE_SAMPLES: usize = 10;

/// Switches for one ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Build the word index and frequency counts.
    pub build_corpus: bool,
    /// Turn any failure or duplicate into an error.
    pub require_clean: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            build_corpus: true,
            require_clean: false,
        }
    }
}

/// What happened during an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub total_lines: usize,
    pub chunks: usize,
    /// Real posts registered in the archive.
    pub posts: usize,
    pub flagged: usize,
    pub synthetic: usize,
    /// Distinct terms in the word index.
    pub terms: usize,
    /// Chunks that could not be parsed, in archive order.
    pub failures: Vec<IngestFailure>,
    /// Identity and line of every rejected duplicate.
    pub duplicates: Vec<(String, usize)>,
    pub elapsed: Duration,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.duplicates.is_empty()
    }

    /// Fail with [`ArchiveError::Unclean`] unless the run was clean.
    pub fn ensure_clean(&self) -> Result<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(ArchiveError::Unclean {
                failures: self.failures.len(),
                duplicates: self.duplicates.len(),
            })
        }
    }

    /// Failure counts grouped by error kind, most frequent first.
    pub fn failure_kinds(&self) -> Vec<(&'static str, usize)> {
        let mut kinds: Vec<(&'static str, usize)> = Vec::new();
        for failure in &self.failures {
            let kind = failure.error.kind();
            match kinds.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, count)) => *count += 1,
                None => kinds.push((kind, 1)),
            }
        }
        kinds.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        kinds
    }

    /// Human-readable diagnostic summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} lines, {} chunks, {} posts ({} flagged), {} placeholders, {} terms in {:.2?}\n",
            self.total_lines,
            self.chunks,
            self.posts,
            self.flagged,
            self.synthetic,
            self.terms,
            self.elapsed
        );

        if !self.failures.is_empty() {
            out.push_str(&format!("{} failed message(s):\n", self.failures.len()));
            for (kind, count) in self.failure_kinds() {
                out.push_str(&format!("  {count:>6}  {kind}\n"));
            }
            for failure in self.failures.iter().take(FAILURE_SAMPLES) {
                out.push_str(&format!("  {failure}\n"));
            }
            if self.failures.len() > FAILURE_SAMPLES {
                out.push_str(&format!(
                    "  ... and {} more\n",
                    self.failures.len() - FAILURE_SAMPLES
                ));
            }
        }

        if !self.duplicates.is_empty() {
            out.push_str(&format!("{} duplicate id(s):\n", self.duplicates.len()));
            for (identity, line) in self.duplicates.iter().take(FAILURE_SAMPLES) {
                out.push_str(&format!("  line {line}: {identity}\n"));
            }
        }
        out
    }
}

/// Build an archive from raw archive bytes.
///
/// The progress callback receives `(chunks_done, chunks_total)` while
/// chunks are parsed. With `require_clean` set, any failure or duplicate
/// turns into [`ArchiveError::Unclean`] after the full pass.
pub fn build(
    input: &[u8],
    flags: &FlagTables,
    repairs: &RepairTable,
    options: IngestOptions,
    progress: Option<&dyn Fn(u64, u64)>,
) -> Result<(Archive, IngestReport)> {
    let start = Instant::now();
    let mut archive = Archive::new();
    let mut report = IngestReport::default();

    // Stage 1: chunk
    let chunks = split_chunks(input, repairs);
    report.total_lines = chunks.total_lines;
    report.chunks = chunks.chunks.len();
    info!(
        lines = chunks.total_lines,
        chunks = report.chunks,
        preamble = chunks.preamble,
        "Chunked archive"
    );

    // Stage 2: parse and classify
    let total = chunks.chunks.len() as u64;
    let mut parsed: Vec<Post> = Vec::with_capacity(chunks.chunks.len());
    for (i, chunk) in chunks.chunks.iter().enumerate() {
        for line in &chunk.header {
            if let Some((key, _)) = split_header(line) {
                archive.record_header_key(key);
            }
        }

        match parse_post(chunk) {
            Ok(mut post) => {
                if flags.classify(&mut post) {
                    report.flagged += 1;
                }
                parsed.push(post);
            }
            Err(error) => {
                warn!(line = chunk.line, error = %error, "Skipping unparseable message");
                report.failures.push(IngestFailure {
                    line: chunk.line,
                    from: chunk.from.clone(),
                    error,
                });
            }
        }

        if let Some(cb) = progress {
            if i % 256 == 0 {
                cb(i as u64, total);
            }
        }
    }
    if let Some(cb) = progress {
        cb(total, total);
    }
    info!(
        posts = parsed.len(),
        failures = report.failures.len(),
        flagged = report.flagged,
        "Parsed messages"
    );

    // Stage 3: register
    for post in parsed {
        match archive.insert(post) {
            Ok(_) => report.posts += 1,
            Err(ArchiveError::DuplicateIdentity { identity, line }) => {
                warn!(identity = %identity, line, "Duplicate message id");
                report.duplicates.push((identity, line));
            }
            Err(e) => return Err(e),
        }
    }
    // Count flags over registered posts only.
    report.flagged = archive.posts().iter().filter(|p| p.is_flagged()).count();

    // Stage 4: link
    report.synthetic = archive.link_references();

    // Stage 5: bucket and index
    let mut indexed = 0usize;
    for position in 0..archive.len() {
        if archive.index_post(position, options.build_corpus) {
            indexed += 1;
        }
    }
    report.terms = archive.index().len();
    debug!(indexed, periods = archive.periods().len(), "Indexed posts");

    report.elapsed = start.elapsed();
    info!(
        posts = report.posts,
        synthetic = report.synthetic,
        terms = report.terms,
        duplicates = report.duplicates.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Archive built"
    );

    if options.require_clean {
        report.ensure_clean()?;
    }
    Ok((archive, report))
}

/// Read an archive file and [`build`] it.
pub fn build_from_path(
    path: &Path,
    flags: &FlagTables,
    repairs: &RepairTable,
    options: IngestOptions,
    progress: Option<&dyn Fn(u64, u64)>,
) -> Result<(Archive, IngestReport)> {
    if !path.exists() {
        return Err(ArchiveError::FileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|e| ArchiveError::io(path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "Read archive");
    build(&bytes, flags, repairs, options, progress)
}
