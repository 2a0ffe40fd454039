//! Change detection: classifies a fresh lookup result against the store.

use crate::dns::LookupError;
use crate::record::{DnsRecord, RecordKind};
use crate::store::RecordStore;

/// The classified result of comparing a fresh lookup against the store.
///
/// Consumed immediately by the reporter.
#[derive(Debug)]
pub enum Outcome {
    /// First observation for this target.
    Initial(DnsRecord),
    /// Identical to the stored record.
    Unchanged(DnsRecord),
    /// The resolved values differ from the stored record.
    Changed {
        previous: DnsRecord,
        current: DnsRecord,
    },
    /// The lookup itself failed.
    Error {
        domain: String,
        kind: RecordKind,
        cause: LookupError,
    },
}

impl Outcome {
    pub fn domain(&self) -> &str {
        match self {
            Outcome::Initial(r) | Outcome::Unchanged(r) => &r.domain,
            Outcome::Changed { current, .. } => &current.domain,
            Outcome::Error { domain, .. } => domain,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Outcome::Initial(r) | Outcome::Unchanged(r) => r.kind,
            Outcome::Changed { current, .. } => current.kind,
            Outcome::Error { kind, .. } => *kind,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed { .. })
    }
}

/// Classifies one lookup result, updating the store only for `Initial` and
/// `Changed` outcomes. `Unchanged` and `Error` leave the store untouched.
pub fn classify(
    store: &mut RecordStore,
    domain: &str,
    kind: RecordKind,
    result: Result<DnsRecord, LookupError>,
) -> Outcome {
    let current = match result {
        Ok(record) => record,
        Err(cause) => {
            return Outcome::Error {
                domain: domain.to_string(),
                kind,
                cause,
            }
        }
    };

    let key = current.key();
    match store.get(&key) {
        None => {
            store.put(key, current.clone());
            Outcome::Initial(current)
        }
        Some(previous) if *previous == current => Outcome::Unchanged(current),
        Some(previous) => {
            let previous = previous.clone();
            store.put(key, current.clone());
            Outcome::Changed { previous, current }
        }
    }
}
