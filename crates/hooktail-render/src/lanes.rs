//! Lane assignment and rail grids for concurrent deferral chains.
//!
//! Every deferral chain (one notice number cycling between deferred and
//! re-emitted) gets a lane: a column in the rail area next to the unit's
//! event column. Chains whose lifetimes overlap get distinct lanes so their
//! rails run in parallel; a lane frees up when its chain resolves and is
//! reused by later chains. Assignment is sticky across frames for chains
//! that are still open, so the picture does not jump around while watching.

use std::collections::BTreeMap;

use hooktail_engine::{DeferralStatus, DeferredEntry, EventRecord};
use tracing::trace;

/// One cell of the deferral rail grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connector {
    /// Nothing in this cell.
    #[default]
    Empty,
    /// A rail passing vertically through this row.
    Vline,
    /// A lead running from the event text out to its rail.
    Hline,
    /// A lead crossing another chain's rail.
    Cross,
    /// The row where a deferral opens.
    Open,
    /// The row where a deferral resolves.
    Close,
    /// A re-emission that was immediately deferred again.
    Bounce,
}

impl Connector {
    /// The character drawn for this cell.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Vline => '│',
            Self::Hline => '─',
            Self::Cross => '┼',
            Self::Open => '❯',
            Self::Close => '❮',
            Self::Bounce => '●',
        }
    }

    /// The character drawn in terminals without box-drawing support.
    #[must_use]
    pub const fn glyph_ascii(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Vline => '|',
            Self::Hline => '-',
            Self::Cross => '+',
            Self::Open => '>',
            Self::Close => '<',
            Self::Bounce => 'o',
        }
    }
}

/// The rail cells of one row, rendered as text.
#[must_use]
pub fn rail_text(cells: &[Connector], ascii: bool) -> String {
    cells
        .iter()
        .map(|cell| {
            if ascii {
                cell.glyph_ascii()
            } else {
                cell.glyph()
            }
        })
        .collect()
}

/// A deferral chain visible in the current window.
#[derive(Debug)]
struct Chain {
    n: u64,
    start: usize,
    end: usize,
    marks: Vec<(usize, DeferralStatus)>,
    open: bool,
}

const fn overlaps(a: &Chain, b: &Chain) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// Assigns stable lanes to deferral chains and paints rail grids.
#[derive(Debug, Default)]
pub struct LaneAllocator {
    // sticky assignments for chains that are still open
    lanes: BTreeMap<(String, u64), usize>,
}

impl LaneAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints the rail grid for one unit over the given window.
    ///
    /// The result has one entry per window row; each entry holds the row's
    /// rail cells, left to right from the event column outward. The width is
    /// uniform across rows and zero when the unit has no visible chains.
    pub fn rails(
        &mut self,
        unit: &str,
        view: &[EventRecord],
        deferred: &[DeferredEntry],
    ) -> Vec<Vec<Connector>> {
        if view.is_empty() {
            return Vec::new();
        }

        let chains = visible_chains(unit, view, deferred);
        let assigned = self.assign(unit, &chains);
        self.lanes.retain(|(u, n), _| {
            u.as_str() != unit || deferred.iter().any(|d| d.unit == *u && d.n == *n)
        });

        let width = assigned
            .iter()
            .map(|&(_, lane)| lane + 1)
            .max()
            .unwrap_or(0);
        let mut grid = vec![vec![Connector::Empty; width]; view.len()];

        for &(index, lane) in &assigned {
            let chain = &chains[index];
            for row in chain.start..=chain.end {
                grid[row][lane] = Connector::Vline;
            }
        }
        // marks go on top of the rails, with leads out to their lane
        for &(index, lane) in &assigned {
            let chain = &chains[index];
            for &(row, status) in &chain.marks {
                for cell in &mut grid[row][..lane] {
                    *cell = match *cell {
                        Connector::Vline | Connector::Cross => Connector::Cross,
                        _ => Connector::Hline,
                    };
                }
                grid[row][lane] = match status {
                    DeferralStatus::Deferred => Connector::Open,
                    DeferralStatus::Reemitted => Connector::Close,
                    DeferralStatus::Bounced => Connector::Bounce,
                    DeferralStatus::Null => Connector::Vline,
                };
            }
        }
        grid
    }

    /// Lane choice: the sticky pin where possible, otherwise the lowest lane
    /// not taken by an overlapping chain.
    fn assign(&mut self, unit: &str, chains: &[Chain]) -> Vec<(usize, usize)> {
        let mut order: Vec<usize> = (0..chains.len()).collect();
        order.sort_by_key(|&i| (chains[i].start, chains[i].n));

        let mut assigned: Vec<(usize, usize)> = Vec::new();
        for &i in &order {
            let chain = &chains[i];
            let taken: Vec<usize> = assigned
                .iter()
                .filter(|&&(other, _)| overlaps(chain, &chains[other]))
                .map(|&(_, lane)| lane)
                .collect();
            let key = (unit.to_string(), chain.n);
            let lane = match self.lanes.get(&key) {
                Some(&pinned) if !taken.contains(&pinned) => pinned,
                _ => (0..).find(|lane| !taken.contains(lane)).unwrap_or(0),
            };
            assigned.push((i, lane));
            if chain.open {
                trace!(unit, n = chain.n, lane, "pinned open deferral to lane");
                self.lanes.insert(key, lane);
            } else {
                self.lanes.remove(&key);
            }
        }
        assigned
    }
}

fn visible_chains(unit: &str, view: &[EventRecord], deferred: &[DeferredEntry]) -> Vec<Chain> {
    let mut chains: Vec<Chain> = Vec::new();
    for (row, record) in view.iter().enumerate() {
        if record.unit != unit || record.deferral == DeferralStatus::Null {
            continue;
        }
        let Some(n) = record.n else { continue };
        match chains.iter_mut().find(|c| c.n == n) {
            Some(chain) => {
                chain.end = row;
                chain.marks.push((row, record.deferral));
            }
            None => chains.push(Chain {
                n,
                start: row,
                end: row,
                marks: vec![(row, record.deferral)],
                open: false,
            }),
        }
    }

    let last_row = view.len() - 1;
    for chain in &mut chains {
        // a chain whose first visible mark is not the opening defer got
        // cropped; its rail threads in from the top of the window
        if let Some(&(_, first)) = chain.marks.first() {
            if first != DeferralStatus::Deferred {
                chain.start = 0;
            }
        }
        if deferred.iter().any(|d| d.unit == unit && d.n == chain.n) {
            chain.open = true;
            chain.end = last_row;
        }
    }

    // open chains with no visible row still thread the whole column
    for entry in deferred.iter().filter(|d| d.unit == unit) {
        if !chains.iter().any(|c| c.n == entry.n) {
            chains.push(Chain {
                n: entry.n,
                start: 0,
                end: last_row,
                marks: Vec::new(),
                open: true,
            });
        }
    }
    chains
}
