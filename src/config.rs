use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::record::RecordKind;

/// Fatal configuration problems detected before monitoring starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A `-s` address did not parse as `ip:port` after normalization.
    #[error("invalid DNS server address '{addr}': {source}")]
    InvalidServer {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

// constants (used as defaults)
/// Default tick interval when `-i` is not given.
pub const DEFAULT_INTERVAL: &str = "5s";
/// Per-query DNS timeout in seconds.
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// Port appended to `-s` addresses that carry none.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// The three well-known public resolvers selected by `--all-servers`.
pub const PUBLIC_RESOLVERS: &[&str] = &["8.8.8.8:53", "1.1.1.1:53", "1.0.0.1:53"];

const AFTER_HELP: &str = "\
EXAMPLES:
    dns-monitor example.com
    dns-monitor -i 30s example.com api.example.com
    dns-monitor -t CNAME --until-change www.example.com
    dns-monitor -s 8.8.8.8 -s 1.1.1.1 example.com
    dns-monitor -o /var/log/dns-monitor.log example.com
";

/// Command-line options.
///
/// This struct is generated by `clap` from the field attributes. Parse
/// failures (unknown flag, bad interval, bad record type, missing domains)
/// are mapped to exit code 1 in `main.rs`; `-h` and `-v` exit 0.
#[derive(Debug, Parser)]
#[command(
    name = "dns-monitor",
    version,
    disable_version_flag = true,
    about = "Monitors DNS records and reports when the resolved values change.",
    after_help = AFTER_HELP
)]
pub struct Opt {
    /// Domain names to monitor
    #[arg(value_name = "DOMAIN", required = true, num_args = 1..)]
    pub domains: Vec<String>,

    /// DNS record type (A, AAAA, CNAME, MX, TXT)
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        default_value = "A",
        value_parser = parse_record_kind
    )]
    pub record_kind: RecordKind,

    /// Check interval: <n>s, <n>m, <n>h, or bare seconds
    #[arg(
        short = 'i',
        long,
        value_name = "DURATION",
        default_value = DEFAULT_INTERVAL,
        value_parser = parse_interval
    )]
    pub interval: Duration,

    /// DNS server to query (repeatable); port 53 assumed when omitted
    #[arg(short = 's', long = "server", value_name = "SERVER")]
    pub servers: Vec<String>,

    /// Query the major public resolvers (8.8.8.8, 1.1.1.1, 1.0.0.1)
    #[arg(long)]
    pub all_servers: bool,

    /// Stop after the first tick that detects a change
    #[arg(long)]
    pub until_change: bool,

    /// Log file destination (appended to, created if absent)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Disable ANSI colors on terminal output (the log file is always plain)
    #[arg(long)]
    pub no_color: bool,

    /// Display version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: (),
}

/// Validated, read-only monitor configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub domains: Vec<String>,
    pub record_kind: RecordKind,
    pub interval: Duration,
    /// Normalized `host:port` server addresses; empty means resolver default.
    pub servers: Vec<String>,
    pub until_change: bool,
    pub output: Option<PathBuf>,
    pub no_color: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        // --all-servers wins over any -s flags also present
        let servers = if opt.all_servers {
            PUBLIC_RESOLVERS.iter().map(|s| s.to_string()).collect()
        } else {
            opt.servers.iter().map(|s| normalize_server(s)).collect()
        };

        Config {
            domains: opt.domains,
            record_kind: opt.record_kind,
            interval: opt.interval,
            servers,
            until_change: opt.until_change,
            output: opt.output,
            no_color: opt.no_color,
        }
    }
}

/// Parses a record type token, case-insensitively.
fn parse_record_kind(s: &str) -> Result<RecordKind, String> {
    s.parse::<RecordKind>().map_err(|_| {
        let valid: Vec<String> = RecordKind::iter().map(|k| k.to_string()).collect();
        format!(
            "unsupported record type '{}' (expected one of {})",
            s,
            valid.join(", ")
        )
    })
}

/// Parses an interval string: `<int>s`, `<int>m`, `<int>h`, or a bare
/// integer meaning seconds.
pub fn parse_interval(s: &str) -> Result<Duration, String> {
    let (digits, unit_secs) = match s.strip_suffix(['s', 'm', 'h']) {
        Some(stripped) => {
            let unit = match s.as_bytes()[s.len() - 1] {
                b's' => 1,
                b'm' => 60,
                _ => 3600,
            };
            (stripped, unit)
        }
        None => (s, 1),
    };

    let count: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration '{s}' (use formats like 5s, 2m, 1h)"))?;
    let secs = count
        .checked_mul(unit_secs)
        .filter(|secs| *secs > 0)
        .ok_or_else(|| format!("interval '{s}' must be a positive duration"))?;
    Ok(Duration::from_secs(secs))
}

/// Appends the default DNS port to addresses that carry none.
pub fn normalize_server(server: &str) -> String {
    if server.contains(':') {
        server.to_string()
    } else {
        format!("{server}:{DEFAULT_DNS_PORT}")
    }
}
