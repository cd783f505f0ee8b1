//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// hooktail - live tailing of charm events from the Juju debug-log.
#[derive(Parser, Debug, Clone)]
#[command(name = "hooktail")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Units (`myapp/0`) or applications (`myapp`) to follow. All units when empty.
    pub targets: Vec<String>,

    /// Model to read the log stream from. Defaults to the current model.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Log level to request from the stream.
    ///
    /// Framework emission lines only show up at debug and trace; the coarser
    /// levels carry uniter operation lines only.
    #[arg(long, value_enum, default_value_t = Level::Debug)]
    pub level: Level,

    /// Drain the model's replay buffer before going live.
    #[arg(short, long)]
    pub replay: bool,

    /// Print the log command that would be spawned, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum live frames per second.
    #[arg(long, default_value_t = 0.5)]
    pub framerate: f64,

    /// Number of events to keep on screen. 0 shows everything.
    #[arg(short, long, default_value_t = 10)]
    pub length: usize,

    /// Track deferrals and draw their rails next to the events.
    #[arg(short = 'd', long)]
    pub show_defer: bool,

    /// Show the framework notice number next to deferred events.
    #[arg(short = 'n', long)]
    pub show_defer_id: bool,

    /// Show the root trace id next to each event.
    #[arg(short = 't', long)]
    pub show_trace_ids: bool,

    /// Keep operator-framework debug events instead of dropping them.
    #[arg(long)]
    pub show_operator_events: bool,

    /// Exit after the backlog instead of following the stream.
    #[arg(long)]
    pub no_watch: bool,

    /// Do not pull in sibling units of a unit target as they appear.
    #[arg(long)]
    pub no_add: bool,

    /// Oldest event first instead of newest first.
    #[arg(long)]
    pub flip: bool,

    /// Frame renderer to use.
    #[arg(long, value_enum, default_value_t = PrinterKind::Rich)]
    pub printer: PrinterKind,

    /// Avoid box-drawing characters and emoji in the output.
    #[arg(long)]
    pub ascii: bool,

    /// Read pre-dumped log files instead of spawning the log command.
    ///
    /// May be given more than once; the files are interlaced by timestamp.
    #[arg(long, value_name = "PATH")]
    pub file: Vec<PathBuf>,

    /// Only process events whose name matches this regex.
    ///
    /// Lookarounds are supported, so `(?!update)` skips update-status noise.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Write the full captured history to this file on exit.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Resolves the flag interactions that force a mode off.
    ///
    /// Dumping to a file means the run has to end, so `--output` turns
    /// watching off. Pre-dumped files already contain everything there is
    /// to read, so `--file` turns both watching and replay off.
    #[must_use]
    pub fn modes(&self) -> Modes {
        let mut watch = !self.no_watch;
        let mut replay = self.replay;
        if self.output.is_some() {
            watch = false;
        }
        if !self.file.is_empty() {
            watch = false;
            replay = false;
        }
        Modes { watch, replay }
    }
}

/// Source lifetime modes after flag interactions are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modes {
    /// Keep following the stream after the backlog.
    pub watch: bool,
    /// Drain the replay buffer before going live.
    pub replay: bool,
}

/// Log levels the stream can be requested at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Level {
    /// Everything, including controller internals.
    Trace,
    /// Framework emissions plus uniter operations.
    #[default]
    Debug,
    /// Uniter operations only.
    Info,
    /// Warnings and errors only.
    Warning,
    /// Errors only.
    Error,
}

impl Level {
    /// The level string the log command expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Frame renderer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum PrinterKind {
    /// Redrawn table frames with deferral rails.
    #[default]
    Rich,
    /// One appended line per event, suitable for piping.
    Raw,
}
