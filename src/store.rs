//! Last-observed record per monitored target.

use std::collections::HashMap;

use crate::record::DnsRecord;

/// Holds the last-observed [`DnsRecord`] per monitor key.
///
/// At most one entry per key; entries are replaced wholesale, never merged.
/// The key set is fixed by the configured domain list, so there is no
/// eviction, size bound, or expiry.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<String, DnsRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore::default()
    }

    pub fn get(&self, key: &str) -> Option<&DnsRecord> {
        self.records.get(key)
    }

    /// Unconditional overwrite.
    pub fn put(&mut self, key: String, record: DnsRecord) {
        self.records.insert(key, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{monitor_key, RecordKind};

    #[test]
    fn put_replaces_existing_entry() {
        let mut store = RecordStore::new();
        let key = monitor_key("example.com", RecordKind::A);
        let first = DnsRecord::new("example.com", RecordKind::A, vec!["1.1.1.1".into()]);
        let second = DnsRecord::new("example.com", RecordKind::A, vec!["2.2.2.2".into()]);

        store.put(key.clone(), first);
        store.put(key.clone(), second.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key), Some(&second));
    }

    #[test]
    fn keys_distinguish_record_kinds() {
        let mut store = RecordStore::new();
        let a = DnsRecord::new("example.com", RecordKind::A, vec!["1.1.1.1".into()]);
        let txt = DnsRecord::new("example.com", RecordKind::Txt, vec!["v=spf1".into()]);

        store.put(a.key(), a.clone());
        store.put(txt.key(), txt.clone());

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&a.key()), Some(&a));
        assert_eq!(store.get(&txt.key()), Some(&txt));
    }
}
