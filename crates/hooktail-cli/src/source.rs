//! Line sources: the spawned log command and pre-dumped files.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

use hooktail_stream::LogInterlacer;

use crate::cli::Level;
use crate::error::{CliError, Result};

/// The binary the live stream is read from.
pub const JUJU: &str = "juju";

/// Arguments for a `juju debug-log` invocation.
///
/// The live stream passes `--tail` to keep the connection open; the replay
/// drain instead asks for the model's replay buffer and exits at its end.
#[must_use]
pub fn debug_log_args(model: Option<&str>, level: Level, tail: bool, replay: bool) -> Vec<String> {
    let mut args = vec!["debug-log".to_string()];
    if let Some(model) = model {
        args.push("-m".to_string());
        args.push(model.to_string());
    }
    if tail {
        args.push("--tail".to_string());
    }
    args.push("--level".to_string());
    args.push(level.as_str().to_string());
    if replay {
        args.push("--replay".to_string());
        args.push("--no-tail".to_string());
    }
    args
}

/// The full command line, for display and error messages.
#[must_use]
pub fn render_command(args: &[String]) -> String {
    format!("{JUJU} {}", args.join(" "))
}

/// Where log lines come from.
pub enum LineSource {
    /// Pre-dumped files, interlaced by timestamp.
    Files(LogInterlacer),
    /// A spawned log command streaming its stdout.
    Command {
        /// The running process, reaped once its stream ends.
        child: Child,
        /// Line reader over the process stdout.
        lines: Lines<BufReader<ChildStdout>>,
    },
}

impl LineSource {
    /// Opens pre-dumped log files as a source.
    pub fn from_files(paths: &[PathBuf]) -> Result<Self> {
        Ok(Self::Files(LogInterlacer::open(paths)?))
    }

    /// Spawns the log command and streams its stdout.
    pub fn spawn(args: &[String]) -> Result<Self> {
        let mut child = Command::new(JUJU)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CliError::Spawn {
                command: render_command(args),
                source,
            })?;
        let stdout = child.stdout.take().ok_or_else(|| CliError::Spawn {
            command: render_command(args),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "stdout was not captured"),
        })?;
        let lines = BufReader::new(stdout).lines();
        Ok(Self::Command { child, lines })
    }

    /// The next line, or `None` once the source is exhausted.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            Self::Files(interlacer) => Ok(interlacer.next_line()?),
            Self::Command { child, lines } => {
                let line = lines.next_line().await?;
                if line.is_none() {
                    // reap the process so it does not linger as a zombie
                    let _ = child.wait().await;
                }
                Ok(line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn live_args_tail_at_the_requested_level() {
        let args = debug_log_args(None, Level::Debug, true, false);
        assert_eq!(args, ["debug-log", "--tail", "--level", "DEBUG"]);
    }

    #[test]
    fn model_slots_in_before_the_flags() {
        let args = debug_log_args(Some("prod"), Level::Warning, true, false);
        assert_eq!(args, ["debug-log", "-m", "prod", "--tail", "--level", "WARNING"]);
    }

    #[test]
    fn replay_args_drain_without_tailing() {
        let args = debug_log_args(Some("prod"), Level::Debug, false, true);
        assert_eq!(
            args,
            ["debug-log", "-m", "prod", "--level", "DEBUG", "--replay", "--no-tail"]
        );
    }

    #[test]
    fn rendered_command_is_the_full_invocation() {
        let args = debug_log_args(None, Level::Trace, true, false);
        assert_eq!(render_command(&args), "juju debug-log --tail --level TRACE");
    }

    #[tokio::test]
    async fn file_source_yields_lines_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();
        file.flush().unwrap();

        let mut source = LineSource::from_files(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(source.next_line().await.unwrap(), None);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let missing = PathBuf::from("/definitely/not/here.log");
        assert!(LineSource::from_files(&[missing]).is_err());
    }
}
