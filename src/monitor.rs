//! Scheduler: drives periodic domain checks until interrupted, or until the
//! first detected change when `--until-change` is set.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::time::{self, Instant, Interval};

use crate::config::{Config, ConfigError, DNS_TIMEOUT_SECS};
use crate::detect;
use crate::dns::DnsClient;
use crate::report::{Position, Reporter};
use crate::store::RecordStore;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What the blocking wait observed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitEvent {
    TickElapsed,
    InterruptReceived,
}

/// The monitoring loop: owns the record store and threads it through the
/// change detector on every tick.
pub struct Monitor {
    config: Config,
    client: DnsClient,
    store: RecordStore,
    reporter: Reporter,
}

impl Monitor {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let client = DnsClient::new(&config.servers, Duration::from_secs(DNS_TIMEOUT_SECS))?;
        let reporter = Reporter::new(config.output.as_deref(), config.no_color);
        Ok(Monitor {
            config,
            client,
            store: RecordStore::new(),
            reporter,
        })
    }

    /// Runs until interrupt, or until the first tick containing a change
    /// when `--until-change` is set. A tick is always completed before the
    /// stop-on-change condition is evaluated.
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        // Registered once up front: a SIGINT or SIGTERM that lands while a
        // check is in flight stays pending in the stream and is observed at
        // the next wait instead of being lost.
        let mut interrupt =
            InterruptStreams::new().context("failed to install signal handlers")?;

        // First tick fires one full interval after start, like a plain ticker.
        let mut ticker = time::interval_at(
            Instant::now() + self.config.interval,
            self.config.interval,
        );

        loop {
            match wait_next(&mut ticker, &mut interrupt).await {
                WaitEvent::TickElapsed => {
                    let changed = self.check_domains().await;
                    if changed && self.config.until_change {
                        println!("Change detected. Exiting due to --until-change mode.");
                        return Ok(());
                    }
                }
                WaitEvent::InterruptReceived => {
                    println!("\nReceived interrupt signal. Stopping monitor...");
                    return Ok(());
                }
            }
        }
    }

    /// One full pass over the configured domains, in list order.
    /// Returns true when any outcome in the pass was a change.
    async fn check_domains(&mut self) -> bool {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let domains = self.config.domains.clone();
        let kind = self.config.record_kind;
        let mut has_changes = false;

        if let [domain] = domains.as_slice() {
            let result = self.client.query(domain, kind).await;
            let outcome = detect::classify(&mut self.store, domain, kind, result);
            self.reporter.report(&outcome, &timestamp, Position::Only);
            has_changes = outcome.is_changed();
        } else {
            self.reporter.group_header(&timestamp);
            for (index, domain) in domains.iter().enumerate() {
                let is_last = index + 1 == domains.len();
                let result = self.client.query(domain, kind).await;
                let outcome = detect::classify(&mut self.store, domain, kind, result);
                self.reporter
                    .report(&outcome, &timestamp, Position::Grouped { is_last });
                has_changes |= outcome.is_changed();
            }
            self.reporter.group_separator();
        }

        has_changes
    }

    fn print_banner(&self) {
        println!("dns-monitor v{}", env!("CARGO_PKG_VERSION"));
        println!(
            "Monitoring {} domain(s) every {}",
            self.config.domains.len(),
            format_interval(self.config.interval)
        );
        println!("Record type: {}", self.config.record_kind);
        if !self.config.servers.is_empty() {
            println!("DNS servers: {}", self.config.servers.join(", "));
        }
        println!("Press Ctrl+C to stop");
        println!();
    }
}

/// SIGINT and SIGTERM streams, both treated as a request to stop.
struct InterruptStreams {
    sigint: Signal,
    sigterm: Signal,
}

impl InterruptStreams {
    fn new() -> std::io::Result<Self> {
        Ok(InterruptStreams {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) {
        tokio::select! {
            _ = self.sigint.recv() => {}
            _ = self.sigterm.recv() => {}
        }
    }
}

/// Blocks until the next tick or a user interrupt, whichever the runtime
/// delivers first. Cancellation is cooperative: an in-flight lookup is never
/// preempted, the interrupt is observed here at the tick boundary.
async fn wait_next(ticker: &mut Interval, interrupt: &mut InterruptStreams) -> WaitEvent {
    tokio::select! {
        _ = ticker.tick() => WaitEvent::TickElapsed,
        _ = interrupt.recv() => WaitEvent::InterruptReceived,
    }
}

fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}
