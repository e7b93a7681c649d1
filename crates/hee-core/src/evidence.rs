// crates/hee-core/src/evidence.rs

//! Append-only evidence log.
//!
//! One mark per line: `<timestamp> <message>\n`, where the timestamp is RFC 3339
//! in UTC with exactly nine fractional digits. Fixed width keeps lines sorting
//! in time order.
//!
//! Concurrent writers are safe without locking: the file is opened in append
//! mode and each mark goes out in a single `write` call, so lines from
//! different processes may interleave but never overwrite each other.
//!
//! A single `write` is only all-or-nothing when the kernel accepts the whole
//! buffer, which local filesystems do for line-sized appends. If it ever
//! accepts fewer bytes (disk full, some network mounts), the partial line is
//! already in the log when the short-write error is returned.

use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{HeeError, Result};

pub const MARK_USAGE: &str = "hee mark <msg>";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvidenceMark {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl EvidenceMark {
    /// Stamp `message` with the current instant.
    pub fn now(message: impl Into<String>) -> Result<Self> {
        Self::at(Utc::now(), message)
    }

    pub fn at(timestamp: DateTime<Utc>, message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        validate_message(&message)?;
        Ok(EvidenceMark { timestamp, message })
    }

    pub fn timestamp_str(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    /// Newline-terminated log line.
    pub fn to_line(&self) -> String {
        format!("{} {}\n", self.timestamp_str(), self.message)
    }

    /// Parse one log line (without its trailing newline). `line_no` is 1-based.
    pub fn parse_line(line_no: usize, line: &str) -> Result<Self> {
        let malformed = |reason: String| HeeError::MalformedMark {
            line: line_no,
            reason,
        };

        let (ts, message) = line
            .split_once(' ')
            .ok_or_else(|| malformed("missing separator between timestamp and message".into()))?;
        let timestamp = DateTime::parse_from_rfc3339(ts)
            .map_err(|e| malformed(format!("bad timestamp `{ts}`: {e}")))?
            .with_timezone(&Utc);

        Ok(EvidenceMark {
            timestamp,
            message: message.to_string(),
        })
    }
}

/// Join the remaining command arguments into one message, single-space separated.
pub fn message_from_args<S: AsRef<OsStr>>(args: &[S]) -> Result<String> {
    let tokens = args
        .iter()
        .map(|a| {
            AsRef::<OsStr>::as_ref(a).to_str().ok_or_else(|| HeeError::Usage {
                message: "message must be valid UTF-8".into(),
                usage: MARK_USAGE,
            })
        })
        .collect::<Result<Vec<&str>>>()?;
    let message = tokens.join(" ");
    validate_message(&message)?;
    Ok(message)
}

// Whitespace-only messages are recorded verbatim; only an empty one is missing.
fn validate_message(message: &str) -> Result<()> {
    if message.is_empty() {
        return Err(HeeError::Usage {
            message: "missing message".into(),
            usage: MARK_USAGE,
        });
    }
    if message.contains(['\n', '\r']) {
        return Err(HeeError::Usage {
            message: "message must be a single line".into(),
            usage: MARK_USAGE,
        });
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct EvidenceLog {
    path: PathBuf,
}

impl EvidenceLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EvidenceLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `mark`, creating the log and its parent directory on first use.
    /// Returns the exact line written.
    pub fn append(&self, mark: &EvidenceMark) -> Result<String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HeeError::io(parent, e))?;
        }

        let line = mark.to_line();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| HeeError::io(&self.path, e))?;

        let written =
            write_once(&mut file, line.as_bytes()).map_err(|e| HeeError::io(&self.path, e))?;

        tracing::info!(path = %self.path.display(), bytes = written, "evidence mark appended");
        Ok(line)
    }

    /// Read every mark back for audit. Library-only: no `hee` command reads
    /// the log. A log that does not exist yet is empty.
    pub fn read_all(&self) -> Result<Vec<EvidenceMark>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HeeError::io(&self.path, e)),
        };

        text.lines()
            .enumerate()
            .map(|(i, line)| EvidenceMark::parse_line(i + 1, line))
            .collect()
    }
}

/// One `write` call, never a loop: a retried tail could land after another
/// writer's line. A short write is an error.
fn write_once(w: &mut impl Write, buf: &[u8]) -> std::io::Result<usize> {
    let written = w.write(buf)?;
    if written != buf.len() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            format!("short write: {written} of {} bytes", buf.len()),
        ));
    }
    Ok(written)
}
