//! hooktail binary entrypoint.
//!
//! Feeds debug-log lines from a spawned `juju debug-log` (or pre-dumped
//! files) through the event correlator and draws frames as events land.

use std::io;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hooktail_cli::cli::{Cli, PrinterKind};
use hooktail_cli::error::Result;
use hooktail_cli::printer::{Printer, RawPrinter, RichPrinter};
use hooktail_cli::source::{LineSource, debug_log_args, render_command};
use hooktail_engine::{Correlator, CorrelatorConfig, Outcome, Verbosity};
use hooktail_render::TableOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logging goes to stderr so it never tears the frames on stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let modes = cli.modes();

    if cli.dry_run {
        let args = debug_log_args(cli.model.as_deref(), cli.level, modes.watch, false);
        println!("{}", render_command(&args));
        return Ok(());
    }

    let mut config = CorrelatorConfig::new()
        .with_targets(cli.targets.clone())
        .with_new_units(!cli.no_add)
        .with_defer_tracking(cli.show_defer)
        .with_trace_ids(cli.show_trace_ids)
        .with_operator_events(cli.show_operator_events)
        .with_verbosity(Verbosity::from_level(cli.level.as_str()));
    if let Some(pattern) = &cli.filter {
        config = config.with_event_filter(pattern);
    }
    let mut correlator = Correlator::new(config)?;

    let mut printer = match cli.printer {
        PrinterKind::Rich => Printer::Rich(RichPrinter::new(
            TableOptions {
                max_length: cli.length,
                flip: cli.flip,
                show_ns: cli.show_defer_id,
                show_defer: cli.show_defer,
                show_trace_ids: cli.show_trace_ids,
                ascii: cli.ascii,
            },
            cli.framerate,
            cli.output.clone(),
        )),
        PrinterKind::Raw => Printer::Raw(RawPrinter::new(cli.output.clone())),
    };

    let mut out = io::stdout();

    let pumped = async {
        if modes.replay {
            let args = debug_log_args(cli.model.as_deref(), cli.level, false, true);
            debug!(command = %render_command(&args), "draining the replay buffer");
            let mut drain = LineSource::spawn(&args)?;
            pump(&mut drain, &mut correlator, &mut printer, &mut out).await?;
        }

        let mut source = if cli.file.is_empty() {
            let args = debug_log_args(cli.model.as_deref(), cli.level, modes.watch, false);
            debug!(command = %render_command(&args), "spawning the log stream");
            LineSource::spawn(&args)?
        } else {
            LineSource::from_files(&cli.file)?
        };
        pump(&mut source, &mut correlator, &mut printer, &mut out).await
    };

    tokio::select! {
        result = pumped => result?,
        _ = tokio::signal::ctrl_c() => {
            debug!("interrupted");
        }
    }

    printer.finish(&mut out, &correlator)?;
    Ok(())
}

/// Feeds the source dry, rendering after every line that lands an event.
async fn pump(
    source: &mut LineSource,
    correlator: &mut Correlator,
    printer: &mut Printer,
    out: &mut io::Stdout,
) -> Result<()> {
    while let Some(line) = source.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match correlator.process(line) {
            Some(Outcome::Captured(_) | Outcome::Updated(_)) => {
                printer.render(out, correlator)?;
            }
            Some(Outcome::TraceNoted) | None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hooktail_cli::cli::Level;
    use std::io::Write;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["hooktail"]);
        assert!(cli.targets.is_empty());
        assert_eq!(cli.length, 10);
        assert!((cli.framerate - 0.5).abs() < f64::EPSILON);
        assert_eq!(cli.printer, PrinterKind::Rich);
        assert_eq!(cli.level, Level::Debug);
        assert!(cli.modes().watch);
    }

    #[test]
    fn cli_parses_targets_and_toggles() {
        let cli = Cli::parse_from(["hooktail", "myapp/0", "other", "-d", "-t", "-n", "--flip"]);
        assert_eq!(cli.targets, vec!["myapp/0", "other"]);
        assert!(cli.show_defer);
        assert!(cli.show_trace_ids);
        assert!(cli.show_defer_id);
        assert!(cli.flip);
    }

    #[test]
    fn cli_parses_the_raw_printer() {
        let cli = Cli::parse_from(["hooktail", "--printer", "raw"]);
        assert_eq!(cli.printer, PrinterKind::Raw);
    }

    #[test]
    fn cli_parses_level_names() {
        let cli = Cli::parse_from(["hooktail", "--level", "info"]);
        assert_eq!(cli.level, Level::Info);
    }

    #[tokio::test]
    async fn run_in_file_mode_processes_a_dump() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "unit-myapp-0: 12:17:50 DEBUG unit.myapp/0.juju-log Emitting Juju event install."
        )
        .unwrap();
        file.flush().unwrap();

        let cli = Cli::parse_from([
            "hooktail",
            "--file",
            file.path().to_str().unwrap(),
            "--printer",
            "raw",
        ]);
        run(cli).await.unwrap();
    }
}
