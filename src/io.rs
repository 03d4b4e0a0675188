//! Reading document directories and writing event summaries.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SummarizerError};
use crate::types::{EventSummary, Summary, TextUnit};

/// Reads every matching file of a directory as one document.
#[derive(Debug, Clone, Default)]
pub struct CorpusReader {
    extension: Option<String>,
}

impl CorpusReader {
    /// Reader accepting every regular file
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read files with this extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Read the documents of `dir`, ordered by file name.
    ///
    /// Document ids are file names. Files that cannot be read or are not
    /// UTF-8 are skipped with a warning; failing to list `dir` is an error.
    pub fn read(&self, dir: impl AsRef<Path>) -> Result<Vec<TextUnit>> {
        let dir = dir.as_ref();
        let io_err = |source: std::io::Error| SummarizerError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && self.accepts(path))
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let id = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!(path = %path.display(), "skipping file with non UTF-8 name");
                    continue;
                }
            };
            match fs::read_to_string(&path) {
                Ok(text) => documents.push(TextUnit::new(id, text)),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
                }
            }
        }

        tracing::debug!(dir = %dir.display(), documents = documents.len(), "read corpus");
        Ok(documents)
    }

    fn accepts(&self, path: &Path) -> bool {
        match &self.extension {
            None => true,
            Some(ext) => path.extension().and_then(|e| e.to_str()) == Some(ext.as_str()),
        }
    }
}

/// Outcome of writing a summary: what was written and what failed.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(usize, SummarizerError)>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Persists each event summary as `<event id>.txt`, one sentence per line.
#[derive(Debug, Clone)]
pub struct SummaryWriter {
    out_dir: PathBuf,
}

impl SummaryWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Path of the file holding one event's summary
    pub fn path_for(&self, event_id: usize) -> PathBuf {
        self.out_dir.join(format!("{event_id}.txt"))
    }

    /// Write one event's summary.
    pub fn write_event(&self, event: &EventSummary) -> Result<PathBuf> {
        let path = self.path_for(event.event_id);
        let mut body = event.texts().join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        fs::write(&path, body).map_err(|source| SummarizerError::Persistence {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Write every event. A failed write is logged and recorded, and the
    /// remaining events are still written.
    ///
    /// Only failing to create the output directory is an error.
    pub fn write(&self, summary: &Summary) -> Result<WriteReport> {
        fs::create_dir_all(&self.out_dir).map_err(|source| SummarizerError::Persistence {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut report = WriteReport::default();
        for (&event_id, event) in summary.iter() {
            match self.write_event(event) {
                Ok(path) => report.written.push(path),
                Err(err) => {
                    tracing::warn!(event_id, error = %err, "failed to write event summary");
                    report.failed.push((event_id, err));
                }
            }
        }
        Ok(report)
    }
}
