//! Log appender: one open-append-close cycle per observation

use crate::schema::{header_line, LogRecord};
use crate::{LogError, LogResult};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use wxlog_core::{NormalizedObservation, ObservationSink};

/// How an existing log ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    /// New or zero-length file, needs a header
    Empty,
    Terminated,
    /// Last line lacks its `\n`, e.g. after an interrupted write
    Unterminated,
}

/// Appends records to a single log file.
///
/// Assumes a single writer. Each call issues one `write_all` on a file
/// opened in append mode, so a record is never split across writes.
pub struct LogAppender {
    path: PathBuf,
}

impl LogAppender {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one observation, writing the header first if the log is new
    #[instrument(skip(self, observation), fields(path = %self.path.display()))]
    pub fn append(&self, observation: &NormalizedObservation) -> LogResult<()> {
        let (mut file, tail) = self.open()?;

        let mut buf = String::new();
        match tail {
            Tail::Empty => {
                debug!("starting new log");
                buf.push_str(&header_line());
                buf.push('\n');
            }
            Tail::Unterminated => {
                warn!("last line of log is unterminated, closing it");
                buf.push('\n');
            }
            Tail::Terminated => {}
        }
        buf.push_str(&LogRecord::from(observation).to_line());
        buf.push('\n');

        file.write_all(buf.as_bytes()).map_err(|e| self.io_error(e))?;

        info!(timestamp = %observation.timestamp(), "observation appended");
        Ok(())
    }

    /// Open for append and report how the existing content ends
    fn open(&self) -> LogResult<(File, Tail)> {
        match OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => Ok((file, Tail::Empty)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .append(true)
                    .open(&self.path)
                    .map_err(|e| self.io_error(e))?;
                let tail = self.tail(&mut file)?;
                Ok((file, tail))
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn tail(&self, file: &mut File) -> LogResult<Tail> {
        if file.metadata().map_err(|e| self.io_error(e))?.len() == 0 {
            return Ok(Tail::Empty);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|e| self.io_error(e))?;
        Ok(if last[0] == b'\n' {
            Tail::Terminated
        } else {
            Tail::Unterminated
        })
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ObservationSink for LogAppender {
    fn emit(&mut self, observation: &NormalizedObservation) -> anyhow::Result<()> {
        self.append(observation)?;
        Ok(())
    }
}
