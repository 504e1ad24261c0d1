use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::discovery::{collect_session_files, default_session_files};
use crate::backlinks::relink_collection;
use crate::collection::CollectionWriter;
use crate::models::{Conversation, Source};
use crate::parsers::parse_source;
use crate::utils::{file_stem, read_input_file};

/// Counts from one ingestion run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Input files read (one for JSON exports)
    pub files: usize,
    /// Session files that could not be read
    pub failed_files: usize,
    /// Conversations produced by the parsers
    pub parsed: usize,
    /// New documents written
    pub written: usize,
    /// Conversations already present in the collection
    pub duplicates: usize,
}

impl IngestReport {
    pub fn merge(&mut self, other: &IngestReport) {
        self.files += other.files;
        self.failed_files += other.failed_files;
        self.parsed += other.parsed;
        self.written += other.written;
        self.duplicates += other.duplicates;
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} conversations parsed from {} files: {} written, {} already in collection",
            self.parsed, self.files, self.written, self.duplicates
        )?;
        if self.failed_files > 0 {
            write!(f, ", {} files failed", self.failed_files)?;
        }
        Ok(())
    }
}

/// Ingest one source into the collection
///
/// JSON exports (`chatgpt`, `claude-web`) need an input file. Session logs
/// (`claude-code`, `codex`) take a file or directory, or fall back to the
/// tool's default location.
pub fn ingest(
    writer: &mut CollectionWriter,
    source: Source,
    input: Option<&Path>,
) -> Result<IngestReport> {
    match source {
        Source::ChatGpt | Source::ClaudeWeb => {
            let Some(input) = input else {
                bail!("--input is required for {}", source);
            };
            ingest_export(writer, source, input)
        }
        Source::ClaudeCode | Source::Codex => {
            let files = match input {
                Some(input) => collect_session_files(input)?,
                None => default_session_files(source)?,
            };
            ingest_sessions(writer, source, &files)
        }
    }
}

/// Ingest a single JSON export file
pub fn ingest_export(
    writer: &mut CollectionWriter,
    source: Source,
    input: &Path,
) -> Result<IngestReport> {
    let raw = read_input_file(input)?;
    let conversations = parse_source(source, &raw, &file_stem(input))
        .with_context(|| format!("Failed to parse {} export {}", source, input.display()))?;

    let mut report = IngestReport { files: 1, ..Default::default() };
    write_all(writer, conversations, &mut report)?;
    tracing::info!(
        %source,
        input = %input.display(),
        written = report.written,
        duplicates = report.duplicates,
        "Ingested export"
    );
    Ok(report)
}

/// Ingest session log files, one conversation per file
///
/// Unreadable files are logged and skipped. The run fails if more than half of
/// the files fail, since that points at a systematic problem.
pub fn ingest_sessions(
    writer: &mut CollectionWriter,
    source: Source,
    files: &[PathBuf],
) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    for file in files {
        report.files += 1;
        let conversations = match read_input_file(file)
            .and_then(|raw| parse_source(source, &raw, &file_stem(file)))
        {
            Ok(conversations) => conversations,
            Err(e) => {
                report.failed_files += 1;
                tracing::warn!(path = %file.display(), error = %e, "Failed to read session log");
                continue;
            }
        };
        write_all(writer, conversations, &mut report)?;
    }

    if report.files > 0 {
        let failure_rate = report.failed_files as f64 / report.files as f64;
        if failure_rate > 0.5 {
            bail!(
                "Ingest failed: {}/{} {} session files could not be read ({}% failure rate)",
                report.failed_files,
                report.files,
                source,
                (failure_rate * 100.0) as u32
            );
        }
    }

    tracing::info!(
        %source,
        files = report.files,
        failed = report.failed_files,
        written = report.written,
        "Ingested sessions"
    );
    Ok(report)
}

fn write_all(
    writer: &mut CollectionWriter,
    conversations: Vec<Conversation>,
    report: &mut IngestReport,
) -> Result<()> {
    for conversation in conversations {
        report.parsed += 1;
        match writer.write(conversation)? {
            Some(_) => report.written += 1,
            None => report.duplicates += 1,
        }
    }
    Ok(())
}

/// Ingest every available source, then relink the collection
///
/// JSON exports are ingested only when a path is given; session logs always
/// come from their default locations. Returns the combined report and the
/// number of documents relinked.
pub fn sync_collection(
    root: &Path,
    chatgpt: Option<&Path>,
    claude_web: Option<&Path>,
) -> Result<(IngestReport, usize)> {
    let mut writer = CollectionWriter::open(root)?;
    let mut report = IngestReport::default();

    for (source, input) in [(Source::ChatGpt, chatgpt), (Source::ClaudeWeb, claude_web)] {
        if let Some(input) = input {
            report.merge(&ingest_export(&mut writer, source, input)?);
        }
    }
    for source in [Source::ClaudeCode, Source::Codex] {
        report.merge(&ingest(&mut writer, source, None)?);
    }

    let relinked = relink_collection(root)?;
    Ok((report, relinked))
}
