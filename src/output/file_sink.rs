//! File-backed output sink
//!
//! Writes the classification CSV, the page list, the discovery log, and one
//! JSON artifact per completed job.

use crate::config::OutputConfig;
use crate::output::traits::{OutputSink, SiteReport};
use crate::state::JobResult;
use crate::{OutputError, OutputResult};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Header row of the classification output
pub const RESULTS_HEADER: [&str; 3] = ["Name", "URL", "Discovery"];

struct Writers {
    results: csv::Writer<File>,
    pages: BufWriter<File>,
    log: BufWriter<File>,
}

/// Output sink writing to the paths from `OutputConfig`
///
/// The classification CSV is recreated on every run; the page list and the
/// log are append-only.
pub struct FileSink {
    writers: Mutex<Writers>,
    job_results_dir: PathBuf,
}

impl FileSink {
    /// Opens every output file and writes the classification header
    ///
    /// # Arguments
    ///
    /// * `config` - Output paths
    ///
    /// # Returns
    ///
    /// * `Ok(FileSink)` - All files are open
    /// * `Err(OutputError)` - A file or directory could not be created
    pub fn create(config: &OutputConfig) -> OutputResult<Self> {
        let results_path = Path::new(&config.results_path);
        ensure_parent(results_path)?;
        let mut results = csv::Writer::from_path(results_path)?;
        results.write_record(RESULTS_HEADER)?;
        results.flush()?;

        let pages = BufWriter::new(open_append(Path::new(&config.pages_path))?);
        let log = BufWriter::new(open_append(Path::new(&config.log_path))?);

        Ok(Self {
            writers: Mutex::new(Writers {
                results,
                pages,
                log,
            }),
            job_results_dir: PathBuf::from(&config.job_results_dir),
        })
    }

    /// Path of the artifact for a job identifier
    pub fn job_result_path(&self, job_id: &str) -> PathBuf {
        self.job_results_dir
            .join(format!("{}.json", encode_file_stem(job_id)))
    }
}

impl OutputSink for FileSink {
    fn record_site(&self, report: &SiteReport) -> OutputResult<()> {
        let mut writers = self.writers.lock().map_err(|_| OutputError::Poisoned)?;

        writers.results.write_record(report.record.row())?;
        for page in &report.pages {
            writeln!(writers.pages, "{}", page.url)?;
        }
        for event in &report.events {
            writeln!(writers.log, "{}", event)?;
        }

        // Flush per site so a crash never leaves half a site on disk
        writers.results.flush()?;
        writers.pages.flush()?;
        writers.log.flush()?;
        Ok(())
    }

    fn record_job_result(&self, result: &JobResult) -> OutputResult<()> {
        std::fs::create_dir_all(&self.job_results_dir)?;
        let path = self.job_result_path(&result.job_id);

        let mut file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut file, &result.payload)?;
        file.flush()?;

        tracing::debug!("Persisted job {} to {}", result.job_id, path.display());
        Ok(())
    }

    fn finalize(&self) -> OutputResult<()> {
        let mut writers = self.writers.lock().map_err(|_| OutputError::Poisoned)?;
        writers.results.flush()?;
        writers.pages.flush()?;
        writers.log.flush()?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    ensure_parent(path)?;
    OpenOptions::new().create(true).append(true).open(path)
}

/// Encodes a job identifier as a file stem
///
/// Bytes outside `[A-Za-z0-9_-]` become `%XX`, so distinct identifiers
/// always get distinct files and no identifier can escape the directory.
fn encode_file_stem(job_id: &str) -> String {
    if job_id.is_empty() {
        // Never produced by a non-empty id: a literal '%' is always encoded
        return "%".to_string();
    }

    let mut stem = String::with_capacity(job_id.len());
    for byte in job_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}
