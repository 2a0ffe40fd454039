//! dns-monitor library: periodic DNS change detection.
//!
//! Resolves one record type for a set of domains on a fixed interval,
//! compares each result against the last-observed value per (domain, type)
//! target, and reports initial/unchanged/changed/error outcomes to the
//! terminal and a log sink.
//!
//! # Example
//!
//! ```no_run
//! use dns_monitor::{run_monitor, Config, RecordKind};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     domains: vec!["example.com".to_string()],
//!     record_kind: RecordKind::A,
//!     interval: Duration::from_secs(30),
//!     servers: vec![],
//!     until_change: false,
//!     output: None,
//!     no_color: false,
//! };
//!
//! run_monitor(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

pub mod config;
pub mod detect;
pub mod dns;
pub mod monitor;
pub mod record;
pub mod report;
pub mod store;

// Re-export public API
pub use config::{Config, ConfigError, Opt};
pub use detect::{classify, Outcome};
pub use dns::{DnsClient, LookupError};
pub use monitor::Monitor;
pub use record::{monitor_key, DnsRecord, RecordKind};
pub use report::{Position, Reporter};
pub use store::RecordStore;

use anyhow::{Context, Result};

/// Runs the monitoring loop with the provided configuration.
///
/// Returns when the user interrupts the monitor or, in `--until-change`
/// mode, after the first tick containing a detected change.
pub async fn run_monitor(config: Config) -> Result<()> {
    let mut monitor = Monitor::new(config).context("failed to initialize monitor")?;
    monitor.run().await
}
