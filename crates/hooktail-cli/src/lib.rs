//! # hooktail-cli
//!
//! Command-line front end for live charm event tailing.
//!
//! Wires together:
//! - [`cli::Cli`] flag parsing and mode resolution
//! - [`source::LineSource`] for the spawned log command or pre-dumped files
//! - the correlation engine from `hooktail-engine`
//! - [`printer::Printer`] frames built by `hooktail-render`
//!
//! The binary entrypoint lives in `main.rs`; everything here is library
//! code so the pipeline stays testable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod printer;
pub mod source;

pub use cli::{Cli, Level, Modes, PrinterKind};
pub use error::{CliError, Result};
pub use printer::{Printer, RawPrinter, RichPrinter};
pub use source::LineSource;
