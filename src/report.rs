//! Outcome formatting: colorized terminal lines plus a plain-text log sink.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use colored::Colorize;
use log::warn;

use crate::detect::Outcome;

/// Branch marker for every grouped line except the last.
pub const BRANCH_TEE: &str = "\u{251c}\u{2500}";
/// Branch marker for the last grouped line.
pub const BRANCH_ELBOW: &str = "\u{2514}\u{2500}";

/// Where a domain sits within one tick's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Single-domain layout: one standalone line per outcome.
    Only,
    /// Multi-domain layout: branch-prefixed line under a timestamp header.
    Grouped { is_last: bool },
}

enum LogSink {
    Stdout,
    File(File),
}

impl LogSink {
    fn writeln(&mut self, line: &str) {
        match self {
            LogSink::Stdout => println!("{line}"),
            LogSink::File(file) => {
                let _ = writeln!(file, "{line}");
            }
        }
    }
}

/// Renders detection outcomes to the terminal (colorized unless disabled)
/// and duplicates every event line, uncolored, to the log sink.
pub struct Reporter {
    sink: LogSink,
}

impl Reporter {
    /// Opens the configured log destination in append mode.
    ///
    /// An unopenable destination is a warning, not a startup failure: the
    /// reporter falls back to stdout.
    pub fn new(output: Option<&Path>, no_color: bool) -> Self {
        colored::control::set_override(!no_color);

        let sink = match output {
            Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => LogSink::File(file),
                Err(err) => {
                    warn!(
                        "failed to open output file {}: {err}; falling back to stdout",
                        path.display()
                    );
                    LogSink::Stdout
                }
            },
            None => LogSink::Stdout,
        };

        Reporter { sink }
    }

    pub fn report(&mut self, outcome: &Outcome, timestamp: &str, position: Position) {
        match position {
            Position::Only => self.report_single(outcome, timestamp),
            Position::Grouped { is_last } => {
                let prefix = if is_last { BRANCH_ELBOW } else { BRANCH_TEE };
                self.report_grouped(outcome, prefix);
            }
        }
    }

    /// Timestamp header opening a multi-domain tick. Display only.
    pub fn group_header(&mut self, timestamp: &str) {
        println!("[{timestamp}]");
    }

    /// Blank line closing a multi-domain tick. Display only.
    pub fn group_separator(&mut self) {
        println!();
    }

    fn report_single(&mut self, outcome: &Outcome, ts: &str) {
        let domain = outcome.domain();
        let kind = outcome.kind();
        match outcome {
            Outcome::Error { cause, .. } => {
                let line = format!("[{ts}] {domain} ({kind}) - ERROR: {cause}");
                println!("{}", line.yellow());
                self.sink.writeln(&line);
            }
            Outcome::Initial(record) => {
                let line = format!("[{ts}] {domain} ({kind}) - Initial: {record}");
                println!("{}", line.green());
                self.sink.writeln(&line);
            }
            Outcome::Unchanged(record) => {
                let line = format!("[{ts}] {domain} ({kind}) - No change: {record}");
                println!("{}", line.green());
                self.sink.writeln(&line);
            }
            Outcome::Changed { previous, current } => {
                let header = format!("[{ts}] {domain} ({kind}) - CHANGE DETECTED:");
                let before = format!("  Before: {previous}");
                let after = format!("  After:  {current}");
                println!("{}", header.red());
                println!("{}", before.red());
                println!("{}", after.blue());
                self.sink.writeln(&header);
                self.sink.writeln(&before);
                self.sink.writeln(&after);
            }
        }
    }

    fn report_grouped(&mut self, outcome: &Outcome, prefix: &str) {
        let domain = outcome.domain();
        let kind = outcome.kind();
        match outcome {
            Outcome::Error { cause, .. } => {
                let line = format!("{prefix} {domain} ({kind}): ERROR - {cause}");
                println!("{}", line.yellow());
                self.sink.writeln(&format!("ERROR: {domain} ({kind}) - {cause}"));
            }
            Outcome::Initial(record) => {
                let line = format!("{prefix} {domain} ({kind}): {record} (initial)");
                println!("{}", line.green());
                self.sink.writeln(&format!("INITIAL: {domain} ({kind}) - {record}"));
            }
            Outcome::Unchanged(record) => {
                let line = format!("{prefix} {domain} ({kind}): {record} (no change)");
                println!("{}", line.green());
                self.sink
                    .writeln(&format!("NO CHANGE: {domain} ({kind}) - {record}"));
            }
            Outcome::Changed { previous, current } => {
                let line = format!(
                    "{prefix} {domain} ({kind}): {previous} \u{2192} {current} (CHANGED)"
                );
                println!("{}", line.red());
                self.sink.writeln(&format!(
                    "CHANGE: {domain} ({kind}) - {previous} \u{2192} {current}"
                ));
            }
        }
    }
}
