//! Chronological merge across several exported debug-log files.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, NaiveTime};
use tracing::trace;

use crate::error::{Result, StreamError};
use crate::peeker::LinePeeker;

/// Yields the chronologically next line across one or more log files.
///
/// With a single file the lines pass through untouched, blanks and all. With
/// several files each line's timestamp is parsed to decide which file goes
/// next, which requires logs exported with `juju debug-log --date`. Ties go
/// to the file listed first.
#[derive(Debug)]
pub struct LogInterlacer {
    sources: Vec<LogSource>,
}

#[derive(Debug)]
struct LogSource {
    path: PathBuf,
    peeker: LinePeeker<BufReader<File>>,
}

impl LogInterlacer {
    /// Opens the given files for interlaced reading.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Open`] if any file cannot be opened.
    pub fn open(paths: &[PathBuf]) -> Result<Self> {
        let sources = paths
            .iter()
            .map(|path| {
                let file = File::open(path).map_err(|source| StreamError::Open {
                    path: path.clone(),
                    source,
                })?;
                Ok(LogSource {
                    path: path.clone(),
                    peeker: LinePeeker::new(BufReader::new(file)),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sources })
    }

    /// Returns the chronologically next line, or `None` once every file is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::MissingDate`] or [`StreamError::Unparseable`]
    /// when merging files whose lines cannot be ordered, and I/O errors from
    /// the underlying readers.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        if self.sources.len() == 1 {
            return Ok(self.sources[0].peeker.next_line()?);
        }

        let mut next: Option<(usize, NaiveDateTime)> = None;
        for (index, source) in self.sources.iter_mut().enumerate() {
            let Some(stamp) = source.peek_stamp()? else {
                continue;
            };
            match next {
                Some((_, best)) if stamp >= best => {}
                _ => next = Some((index, stamp)),
            }
        }

        match next {
            Some((index, stamp)) => {
                trace!(file = %self.sources[index].path.display(), %stamp, "advancing");
                Ok(self.sources[index].peeker.next_line()?)
            }
            None => Ok(None),
        }
    }
}

impl LogSource {
    /// Timestamp of this source's next line, skipping over blanks. `None`
    /// once the file is exhausted.
    fn peek_stamp(&mut self) -> Result<Option<NaiveDateTime>> {
        loop {
            let Some(line) = self.peeker.peek_line()? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                self.peeker.next_line()?;
                continue;
            }
            let stamp = parse_timestamp(line, &self.path)?;
            return Ok(Some(stamp));
        }
    }
}

/// Extracts the datetime from a `<prefix>: <timestamp> <rest>` log line.
fn parse_timestamp(line: &str, path: &Path) -> Result<NaiveDateTime> {
    let rest = line.split_once(": ").map_or("", |(_, rest)| rest);
    let mut tokens = rest.split_whitespace();
    let first = tokens.next().unwrap_or_default();
    let second = tokens.next().unwrap_or_default();

    let dated = format!("{first} {second}");
    if let Ok(stamp) = NaiveDateTime::parse_from_str(&dated, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(stamp);
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(first, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(stamp);
    }

    if NaiveTime::parse_from_str(first, "%H:%M:%S%.f").is_ok() {
        return Err(StreamError::MissingDate {
            path: path.to_path_buf(),
        });
    }
    Err(StreamError::Unparseable {
        path: path.to_path_buf(),
        line: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn drain(interlacer: &mut LogInterlacer) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = interlacer.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn single_file_passes_lines_through_untouched() {
        let dir = TempDir::new().unwrap();
        // single-source reading does no parsing at all
        let path = write_log(
            &dir,
            "a.log",
            "unit-prom-0: 12:00:01 DEBUG unit.prom/0.juju-log Emitting Juju event install.\n\
             not a log line at all\n\
             \n\
             unit-prom-0: 12:00:02 DEBUG unit.prom/0.juju-log Emitting Juju event start.\n",
        );
        let mut interlacer = LogInterlacer::open(&[path]).unwrap();
        let lines = drain(&mut interlacer);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "not a log line at all");
        assert_eq!(lines[2], "");
    }

    #[test]
    fn merges_two_files_chronologically() {
        let dir = TempDir::new().unwrap();
        let a = write_log(
            &dir,
            "a.log",
            "unit-prom-0: 2024-02-10 12:00:01 DEBUG unit.prom/0.juju-log Emitting Juju event install.\n\
             unit-prom-0: 2024-02-10 12:00:04 DEBUG unit.prom/0.juju-log Emitting Juju event start.\n",
        );
        let b = write_log(
            &dir,
            "b.log",
            "unit-trfk-0: 2024-02-10 12:00:02 DEBUG unit.trfk/0.juju-log Emitting Juju event install.\n\
             unit-trfk-0: 2024-02-10 12:00:03 DEBUG unit.trfk/0.juju-log Emitting Juju event start.\n",
        );
        let mut interlacer = LogInterlacer::open(&[a, b]).unwrap();
        let units: Vec<String> = drain(&mut interlacer)
            .iter()
            .map(|line| line.split(':').next().unwrap().to_string())
            .collect();
        assert_eq!(
            units,
            vec!["unit-prom-0", "unit-trfk-0", "unit-trfk-0", "unit-prom-0"]
        );
    }

    #[test]
    fn tie_goes_to_first_file() {
        let dir = TempDir::new().unwrap();
        let a = write_log(
            &dir,
            "a.log",
            "unit-a-0: 2024-02-10 12:00:01 DEBUG unit.a/0.juju-log Emitting Juju event install.\n",
        );
        let b = write_log(
            &dir,
            "b.log",
            "unit-b-0: 2024-02-10 12:00:01 DEBUG unit.b/0.juju-log Emitting Juju event install.\n",
        );
        let mut interlacer = LogInterlacer::open(&[a, b]).unwrap();
        let first = interlacer.next_line().unwrap().unwrap();
        assert!(first.starts_with("unit-a-0"));
    }

    #[test]
    fn blank_lines_skipped_when_merging() {
        let dir = TempDir::new().unwrap();
        let a = write_log(
            &dir,
            "a.log",
            "\nunit-a-0: 2024-02-10 12:00:02 DEBUG unit.a/0.juju-log Emitting Juju event install.\n\n",
        );
        let b = write_log(
            &dir,
            "b.log",
            "unit-b-0: 2024-02-10 12:00:01 DEBUG unit.b/0.juju-log Emitting Juju event install.\n",
        );
        let mut interlacer = LogInterlacer::open(&[a, b]).unwrap();
        let lines = drain(&mut interlacer);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("unit-b-0"));
        assert!(lines[1].starts_with("unit-a-0"));
    }

    #[test]
    fn time_only_timestamps_are_rejected_when_merging() {
        let dir = TempDir::new().unwrap();
        let a = write_log(
            &dir,
            "a.log",
            "unit-a-0: 12:00:01 DEBUG unit.a/0.juju-log Emitting Juju event install.\n",
        );
        let b = write_log(
            &dir,
            "b.log",
            "unit-b-0: 2024-02-10 12:00:01 DEBUG unit.b/0.juju-log Emitting Juju event install.\n",
        );
        let mut interlacer = LogInterlacer::open(&[a, b]).unwrap();
        let err = interlacer.next_line().unwrap_err();
        assert!(matches!(err, StreamError::MissingDate { .. }));
        assert!(err.to_string().contains("juju debug-log --date"));
    }

    #[test]
    fn unrecognized_lines_are_rejected_when_merging() {
        let dir = TempDir::new().unwrap();
        let a = write_log(&dir, "a.log", "what even is this\n");
        let b = write_log(
            &dir,
            "b.log",
            "unit-b-0: 2024-02-10 12:00:01 DEBUG unit.b/0.juju-log Emitting Juju event install.\n",
        );
        let mut interlacer = LogInterlacer::open(&[a, b]).unwrap();
        let err = interlacer.next_line().unwrap_err();
        assert!(matches!(err, StreamError::Unparseable { .. }));
    }

    #[test]
    fn exhausted_interlacer_stays_exhausted() {
        let dir = TempDir::new().unwrap();
        let a = write_log(
            &dir,
            "a.log",
            "unit-a-0: 2024-02-10 12:00:01 DEBUG unit.a/0.juju-log Emitting Juju event install.\n",
        );
        let b = write_log(
            &dir,
            "b.log",
            "unit-b-0: 2024-02-10 12:00:02 DEBUG unit.b/0.juju-log Emitting Juju event install.\n",
        );
        let mut interlacer = LogInterlacer::open(&[a, b]).unwrap();
        assert_eq!(drain(&mut interlacer).len(), 2);
        assert_eq!(interlacer.next_line().unwrap(), None);
        assert_eq!(interlacer.next_line().unwrap(), None);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let err = LogInterlacer::open(&[PathBuf::from("/definitely/not/here.log")]).unwrap_err();
        assert!(matches!(err, StreamError::Open { .. }));
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let stamp = parse_timestamp(
            "unit-a-0: 2024-02-10 12:00:01.123 DEBUG unit.a/0.juju-log Emitting Juju event install.",
            Path::new("a.log"),
        )
        .unwrap();
        assert_eq!(stamp.and_utc().timestamp_subsec_millis(), 123);
    }
}
