//! DNS record value types shared across the monitor.

use std::fmt;

use strum_macros::{Display as StrumDisplay, EnumIter as EnumIterMacro, EnumString};

/// DNS record categories the monitor can watch.
///
/// Parsed case-insensitively from the CLI (`-t cname` and `-t CNAME` are
/// equivalent) and displayed as the uppercase token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, EnumIterMacro)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
}

/// A normalized resolution result for one (domain, record kind) target.
///
/// `values` is sorted ascending before construction completes, so equality is
/// independent of the order the resolver returned the entries in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub domain: String,
    pub kind: RecordKind,
    pub values: Vec<String>,
}

impl DnsRecord {
    pub fn new(domain: impl Into<String>, kind: RecordKind, mut values: Vec<String>) -> Self {
        values.sort();
        DnsRecord {
            domain: domain.into(),
            kind,
            values,
        }
    }

    /// The store key identifying this record's monitored target.
    pub fn key(&self) -> String {
        monitor_key(&self.domain, self.kind)
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.values.join(", "))
    }
}

/// Composite key identifying one monitored (domain, record kind) target.
///
/// Case-sensitive in the domain part, exactly as configured.
pub fn monitor_key(domain: &str, kind: RecordKind) -> String {
    format!("{domain}:{kind}")
}
