//! Plain-text table frames for the captured event history.
//!
//! One column per tracked unit plus a timestamp column, most recent row
//! first (oldest first with `flip`). The deferral rails from
//! [`LaneAllocator`] sit next to the event names; open deferrals and
//! per-unit capture counts show up as footer rows.

use std::collections::BTreeMap;

use hooktail_engine::{DeferredEntry, EventRecord};

use crate::lanes::{Connector, LaneAllocator, rail_text};
use crate::symbols;

/// Column toggles and layout options for [`TableBuilder`].
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Most recent rows to show; 0 disables cropping.
    pub max_length: usize,
    /// Oldest event first instead of newest first.
    pub flip: bool,
    /// Show deferral notice numbers next to event names.
    pub show_ns: bool,
    /// Show deferral rails.
    pub show_defer: bool,
    /// Show trace ids next to event names.
    pub show_trace_ids: bool,
    /// Box-drawing-free output.
    pub ascii: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_length: 10,
            flip: false,
            show_ns: true,
            show_defer: false,
            show_trace_ids: false,
            ascii: false,
        }
    }
}

/// Builds table frames from the engine's captured history.
#[derive(Debug)]
pub struct TableBuilder {
    options: TableOptions,
    lanes: LaneAllocator,
}

impl TableBuilder {
    /// Creates a builder with the given options.
    #[must_use]
    pub fn new(options: TableOptions) -> Self {
        Self {
            options,
            lanes: LaneAllocator::new(),
        }
    }

    /// A live frame over the cropped history window.
    pub fn frame(
        &mut self,
        captured: &[EventRecord],
        deferred: &[DeferredEntry],
        leaders: &BTreeMap<String, String>,
    ) -> String {
        self.build(captured, deferred, leaders, self.options.max_length, false)
    }

    /// The shutdown frame: the live view plus per-unit capture counts.
    pub fn final_frame(
        &mut self,
        captured: &[EventRecord],
        deferred: &[DeferredEntry],
        leaders: &BTreeMap<String, String>,
    ) -> String {
        self.build(captured, deferred, leaders, self.options.max_length, true)
    }

    /// The full uncropped history with counts, for writing to a file.
    pub fn dump(
        &mut self,
        captured: &[EventRecord],
        deferred: &[DeferredEntry],
        leaders: &BTreeMap<String, String>,
    ) -> String {
        self.build(captured, deferred, leaders, 0, true)
    }

    fn build(
        &mut self,
        captured: &[EventRecord],
        deferred: &[DeferredEntry],
        leaders: &BTreeMap<String, String>,
        max_length: usize,
        with_counts: bool,
    ) -> String {
        let cropped = crop(captured, max_length);
        if cropped.is_empty() {
            return String::from("Listening for events...\n");
        }

        let mut units: Vec<&str> = cropped.iter().map(|r| r.unit.as_str()).collect();
        units.sort_unstable();
        units.dedup();

        let columns = self.compose_columns(cropped, deferred, &units);

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(cropped.len() + 2);
        let order: Vec<usize> = if self.options.flip {
            (0..cropped.len()).collect()
        } else {
            (0..cropped.len()).rev().collect()
        };
        for row in order {
            let mut cells = Vec::with_capacity(units.len() + 1);
            cells.push(cropped[row].timestamp.clone());
            for column in &columns {
                cells.push(column[row].clone());
            }
            rows.push(cells);
        }

        if !deferred.is_empty() {
            let mut cells = vec![String::from("Currently deferred:")];
            for unit in &units {
                let open: Vec<String> = deferred
                    .iter()
                    .filter(|d| d.unit == *unit)
                    .map(|d| format!("{}:{}", d.n, d.event))
                    .collect();
                cells.push(open.join(", "));
            }
            rows.push(cells);
        }

        if with_counts {
            let mut cells = vec![String::from("Captured:")];
            for unit in &units {
                let count = captured.iter().filter(|r| r.unit == *unit).count();
                cells.push(count.to_string());
            }
            rows.push(cells);
        }

        let mut headers = Vec::with_capacity(units.len() + 1);
        headers.push(format!("hooktail v{}", env!("CARGO_PKG_VERSION")));
        for unit in &units {
            let app = unit.split('/').next().unwrap_or(unit);
            if leaders.get(app).is_some_and(|leader| leader == unit) {
                headers.push(format!("{unit}{}", symbols::LEADER_MARK));
            } else {
                headers.push((*unit).to_string());
            }
        }

        render_table(&headers, &rows, self.options.ascii)
    }

    /// One composed cell per window row for each unit column. The event part
    /// is padded to a per-column width so the rails line up vertically.
    fn compose_columns(
        &mut self,
        cropped: &[EventRecord],
        deferred: &[DeferredEntry],
        units: &[&str],
    ) -> Vec<Vec<String>> {
        let mut columns = Vec::with_capacity(units.len());
        for unit in units {
            let grid: Vec<Vec<Connector>> = if self.options.show_defer {
                self.lanes.rails(unit, cropped, deferred)
            } else {
                Vec::new()
            };
            let rail_width = grid.first().map_or(0, Vec::len);

            let parts: Vec<String> = cropped
                .iter()
                .map(|record| {
                    if record.unit == *unit {
                        self.event_part(record)
                    } else {
                        String::new()
                    }
                })
                .collect();
            let part_width = parts.iter().map(|p| p.chars().count()).max().unwrap_or(0);

            let mut column = Vec::with_capacity(cropped.len());
            for (row, record) in cropped.iter().enumerate() {
                let mut cell = parts[row].clone();
                if rail_width > 0 {
                    let rail = rail_text(&grid[row], self.options.ascii);
                    cell = format!("{cell:<part_width$} {rail}");
                }
                if self.options.show_trace_ids && record.unit == *unit {
                    let trace = record.trace_id.as_deref().unwrap_or("-");
                    cell.push(' ');
                    cell.push_str(trace);
                }
                column.push(cell.trim_end().to_string());
            }
            columns.push(column);
        }
        columns
    }

    fn event_part(&self, record: &EventRecord) -> String {
        let mut part = match (self.options.show_ns, record.n) {
            (true, Some(n)) => format!("{n} "),
            _ => String::new(),
        };
        part.push_str(&symbols::decorate(record, self.options.ascii));
        part
    }
}

fn crop(captured: &[EventRecord], max_length: usize) -> &[EventRecord] {
    if max_length == 0 || captured.len() <= max_length {
        captured
    } else {
        &captured[captured.len() - max_length..]
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>], ascii: bool) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let (vsep, joint, hbar) = if ascii {
        ("|", "|", '-')
    } else {
        ("│", "┼", '─')
    };

    let mut out = String::new();
    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!(" {h:<width$} ", width = widths[i]))
        .collect::<Vec<_>>()
        .join(vsep);
    out.push_str(header_line.trim_end());
    out.push('\n');

    let separator = widths
        .iter()
        .map(|w| hbar.to_string().repeat(w + 2))
        .collect::<Vec<_>>()
        .join(joint);
    out.push_str(&separator);
    out.push('\n');

    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!(" {cell:<width$} ", width = widths[i]))
            .collect::<Vec<_>>()
            .join(vsep);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
