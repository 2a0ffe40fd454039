//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dns_monitor` library that handles:
//! - Command-line argument parsing and exit-code mapping
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use std::io::Write;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;

use dns_monitor::{run_monitor, Config, Opt};

#[tokio::main]
async fn main() {
    // Help and version exit 0; every parse or validation failure exits 1.
    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                process::exit(0);
            }
            _ => {
                let _ = err.print();
                process::exit(1);
            }
        },
    };

    init_logger();

    let config = Config::from(opt);
    if let Err(e) = run_monitor(config).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Initializes `env_logger` with a colorized level prefix.
///
/// `RUST_LOG` is honored; the default level is `warn` because the monitor's
/// primary output goes straight to the terminal and the log sink, not
/// through the logging facade.
fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Warn);
    // Suppress hickory warnings about malformed UDP responses; they are
    // handled inside the resolver and retried.
    builder.filter_module("hickory_proto", log::LevelFilter::Error);

    builder.format(|buf, record| {
        let level = record.level();
        let colored_level = match level {
            log::Level::Error => level.to_string().red(),
            log::Level::Warn => level.to_string().yellow(),
            log::Level::Info => level.to_string().green(),
            log::Level::Debug => level.to_string().blue(),
            log::Level::Trace => level.to_string().purple(),
        };
        writeln!(buf, "[{}] {}", colored_level, record.args())
    });

    // try_init() so tests that initialize a logger twice do not panic
    let _ = builder.try_init();
}
