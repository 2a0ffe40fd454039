//! End-to-end flow of the store and change detector across ticks,
//! mirroring what the scheduler does with real lookup results.

use dns_monitor::{classify, monitor_key, DnsRecord, Outcome, RecordKind, RecordStore};

fn resolved(domain: &str, kind: RecordKind, values: &[&str]) -> DnsRecord {
    DnsRecord::new(domain, kind, values.iter().map(|v| v.to_string()).collect())
}

#[test]
fn three_tick_scenario_initial_unchanged_changed() {
    let mut store = RecordStore::new();

    // Tick 1: first observation
    let outcome = classify(
        &mut store,
        "example.com",
        RecordKind::A,
        Ok(resolved("example.com", RecordKind::A, &["93.184.216.34"])),
    );
    assert!(matches!(outcome, Outcome::Initial(_)));

    // Tick 2: same value set
    let outcome = classify(
        &mut store,
        "example.com",
        RecordKind::A,
        Ok(resolved("example.com", RecordKind::A, &["93.184.216.34"])),
    );
    assert!(matches!(outcome, Outcome::Unchanged(_)));

    // Tick 3: the address moved
    let outcome = classify(
        &mut store,
        "example.com",
        RecordKind::A,
        Ok(resolved("example.com", RecordKind::A, &["93.184.216.35"])),
    );
    match outcome {
        Outcome::Changed { previous, current } => {
            assert_eq!(previous.values, vec!["93.184.216.34"]);
            assert_eq!(current.values, vec!["93.184.216.35"]);
        }
        other => panic!("expected Changed, got {other:?}"),
    }

    // The store now holds the new value for the next tick
    let stored = store
        .get(&monitor_key("example.com", RecordKind::A))
        .unwrap();
    assert_eq!(stored.values, vec!["93.184.216.35"]);
}

#[test]
fn domains_are_tracked_independently() {
    let mut store = RecordStore::new();

    classify(
        &mut store,
        "example.com",
        RecordKind::A,
        Ok(resolved("example.com", RecordKind::A, &["1.1.1.1"])),
    );
    let outcome = classify(
        &mut store,
        "api.example.com",
        RecordKind::A,
        Ok(resolved("api.example.com", RecordKind::A, &["1.1.1.1"])),
    );

    // Same values on a different domain are still a first observation
    assert!(matches!(outcome, Outcome::Initial(_)));
    assert_eq!(store.len(), 2);
}

#[test]
fn error_ticks_do_not_disturb_later_detection() {
    let mut store = RecordStore::new();

    classify(
        &mut store,
        "example.com",
        RecordKind::Txt,
        Ok(resolved("example.com", RecordKind::Txt, &["v=spf1 -all"])),
    );

    // A failing tick reports an error and leaves history intact
    let outcome = classify(
        &mut store,
        "example.com",
        RecordKind::Txt,
        Err(dns_monitor::LookupError::NotFound {
            domain: "example.com".to_string(),
            kind: RecordKind::Txt,
        }),
    );
    assert!(matches!(outcome, Outcome::Error { .. }));

    // The next successful tick compares against the pre-error record
    let outcome = classify(
        &mut store,
        "example.com",
        RecordKind::Txt,
        Ok(resolved("example.com", RecordKind::Txt, &["v=spf1 -all"])),
    );
    assert!(matches!(outcome, Outcome::Unchanged(_)));
}

#[test]
fn mx_values_sort_lexicographically() {
    // The combined "preference exchange" strings sort as text: "10 ..."
    // sorts before "5 ..." because '1' < '5'. Deliberately not numeric.
    let record = resolved(
        "example.com",
        RecordKind::Mx,
        &["5 alt.example.com", "10 mail.example.com"],
    );
    assert_eq!(
        record.values,
        vec!["10 mail.example.com", "5 alt.example.com"]
    );
}

#[test]
fn changed_outcome_reports_current_domain_and_kind() {
    let mut store = RecordStore::new();
    classify(
        &mut store,
        "example.com",
        RecordKind::Cname,
        Ok(resolved("example.com", RecordKind::Cname, &["a.example.net"])),
    );
    let outcome = classify(
        &mut store,
        "example.com",
        RecordKind::Cname,
        Ok(resolved("example.com", RecordKind::Cname, &["b.example.net"])),
    );

    assert!(outcome.is_changed());
    assert_eq!(outcome.domain(), "example.com");
    assert_eq!(outcome.kind(), RecordKind::Cname);
}
