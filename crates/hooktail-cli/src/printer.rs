//! Frame printers: redrawn table frames and appended raw lines.
//!
//! The rich printer clears the screen and redraws a [`TableBuilder`] frame,
//! throttled by a [`FrameLimiter`]. The raw printer appends one plain line
//! per event instead, which survives piping and dumb terminals. Both can
//! write the full history to a file when the run ends.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use hooktail_engine::{Correlator, EventRecord};
use hooktail_render::{FrameLimiter, TableBuilder, TableOptions, symbols};

/// Column width of the raw printer's unit columns.
const COLWIDTH: usize = 20;

/// Either of the two frame printers.
pub enum Printer {
    /// Redrawn table frames.
    Rich(RichPrinter),
    /// One appended line per event.
    Raw(RawPrinter),
}

impl Printer {
    /// Renders the current state after a processed line.
    pub fn render<W: Write>(&mut self, out: &mut W, correlator: &Correlator) -> io::Result<()> {
        match self {
            Self::Rich(printer) => printer.render(out, correlator),
            Self::Raw(printer) => printer.render(out, correlator),
        }
    }

    /// Draws the final frame and writes the dump file, if one was requested.
    pub fn finish<W: Write>(&mut self, out: &mut W, correlator: &Correlator) -> io::Result<()> {
        match self {
            Self::Rich(printer) => printer.finish(out, correlator),
            Self::Raw(printer) => printer.finish(out, correlator),
        }
    }
}

/// Clears the screen and redraws one table frame per update.
pub struct RichPrinter {
    table: TableBuilder,
    limiter: FrameLimiter,
    output: Option<PathBuf>,
}

impl RichPrinter {
    /// Creates a rich printer drawing at most `framerate` frames per second.
    #[must_use]
    pub fn new(options: TableOptions, framerate: f64, output: Option<PathBuf>) -> Self {
        Self {
            table: TableBuilder::new(options),
            limiter: FrameLimiter::new(framerate),
            output,
        }
    }

    /// Redraws the frame, unless the framerate says to sit this one out.
    pub fn render<W: Write>(&mut self, out: &mut W, correlator: &Correlator) -> io::Result<()> {
        if !self.limiter.ready() {
            return Ok(());
        }
        let frame = self
            .table
            .frame(correlator.captured(), correlator.deferred(), correlator.leaders());
        redraw(out, &frame)
    }

    /// Draws the final frame with capture counts, then dumps if requested.
    pub fn finish<W: Write>(&mut self, out: &mut W, correlator: &Correlator) -> io::Result<()> {
        let frame = self.table.final_frame(
            correlator.captured(),
            correlator.deferred(),
            correlator.leaders(),
        );
        redraw(out, &frame)?;
        if let Some(path) = self.output.take() {
            let dump = self
                .table
                .dump(correlator.captured(), correlator.deferred(), correlator.leaders());
            fs::write(path, dump)?;
        }
        Ok(())
    }
}

fn redraw<W: Write>(out: &mut W, frame: &str) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.write_all(frame.as_bytes())?;
    out.flush()
}

/// Appends one plain-text line per event.
///
/// A header row reprints whenever a unit shows up for the first time. Cells
/// always use the ASCII glyph set. When a dump file is requested the rows go
/// only to the transcript, so stdout stays quiet until the summary line.
pub struct RawPrinter {
    known_units: BTreeSet<String>,
    live: bool,
    transcript: String,
    output: Option<PathBuf>,
}

impl RawPrinter {
    /// Creates a raw printer, optionally collecting a dump for `output`.
    #[must_use]
    pub fn new(output: Option<PathBuf>) -> Self {
        Self {
            known_units: BTreeSet::new(),
            live: output.is_none(),
            transcript: String::new(),
            output,
        }
    }

    /// Appends the row for the most recently touched record.
    pub fn render<W: Write>(&mut self, out: &mut W, correlator: &Correlator) -> io::Result<()> {
        let captured = correlator.captured();
        let Some(last) = captured.last() else {
            return self.write(out, "Listening for events...\n");
        };

        let mut targets: Vec<&str> = captured.iter().map(|r| r.unit.as_str()).collect();
        targets.sort_unstable();
        targets.dedup();

        if targets.iter().any(|t| !self.known_units.contains(*t)) {
            for target in &targets {
                self.known_units.insert((*target).to_string());
            }
            let header = header_row(&targets);
            self.write(out, &header)?;
        }

        let row = event_row(last, &targets);
        self.write(out, &row)
    }

    /// Prints the capture summary and writes the transcript, if requested.
    pub fn finish<W: Write>(&mut self, out: &mut W, correlator: &Correlator) -> io::Result<()> {
        let total = correlator.captured().len();
        let units = correlator.counts_by_unit().len();
        writeln!(
            out,
            "hooktail {}: captured {total} events in {units} units.",
            env!("CARGO_PKG_VERSION")
        )?;
        if let Some(path) = self.output.take() {
            fs::write(path, &self.transcript)?;
        }
        Ok(())
    }

    fn write<W: Write>(&mut self, out: &mut W, text: &str) -> io::Result<()> {
        self.transcript.push_str(text);
        if self.live {
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }
}

fn header_row(targets: &[&str]) -> String {
    let cells: Vec<String> = targets.iter().map(|t| header_cell(t)).collect();
    format!("TIMESTAMP | {}\n", cells.join(" | "))
}

fn header_cell(title: &str) -> String {
    let padded = format!(" {} ", title.to_uppercase());
    let len = padded.chars().count();
    let extra = COLWIDTH.saturating_sub(len);
    let pre = "=".repeat(extra / 2);
    let post = "=".repeat(extra / 2 + usize::from(len % 2 != 0));
    format!("{pre}{padded}{post}")
}

fn event_row(record: &EventRecord, targets: &[&str]) -> String {
    let filler = format!(
        "{}.{}",
        " ".repeat(COLWIDTH / 2),
        " ".repeat(COLWIDTH / 2 - 1)
    );

    let mut line = format!("{}  | ", record.timestamp);
    let mut spill = 0usize;
    for target in targets {
        if *target == record.unit {
            let mut cell = symbols::decorate(record, true);
            let width = cell.chars().count();
            if width < COLWIDTH {
                cell.push_str(&" ".repeat(COLWIDTH - width));
            }
            spill = width.saturating_sub(COLWIDTH);
            line.push_str(&cell);
        } else if spill > 0 {
            // a long event name from the previous column eats into this one
            line.push_str(filler.get(spill..).unwrap_or(""));
            spill = spill.saturating_sub(COLWIDTH);
        } else {
            line.push_str(&filler);
        }
        line.push_str(if spill > 0 { " < " } else { " | " });
    }
    line.push('\n');
    line
}
