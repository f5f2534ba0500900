//! Property-Based Tests for the conversion runner
//!
//! Uses `proptest` to check the runner's ordering and gating laws over
//! random registries and save stamps.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use savemig_core::transforms::remap_and_compact;
use savemig_core::{Conversion, ConversionRegistry, EngineVersions, SaveError, SaveRecord, Version};

const ENGINE: u64 = 30;
/// Thresholds are drawn up to this bound, past the running version.
const BEYOND: u64 = ENGINE + 5;

/// A registry whose conversions log their index when invoked, one per
/// threshold in `thresholds`, registered in that order.
fn logging_registry(thresholds: &[u64]) -> (ConversionRegistry, Arc<Mutex<Vec<usize>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ConversionRegistry::new();
    for (index, &threshold) in thresholds.iter().enumerate() {
        let log = Arc::clone(&log);
        let conversion = Conversion::builder(format!("c{index}"))
            .essentials_version(Version::from(threshold))
            .to_all(move |record| {
                log.lock().expect("lock").push(index);
                Ok(record)
            })
            .expect("build");
        registry.register(conversion).expect("register");
    }
    (registry, log)
}

fn stamped(major: u64) -> SaveRecord {
    SaveRecord {
        essentials_version: Some(Version::from(major)),
        game_version: Some(Version::zero()),
        ..SaveRecord::default()
    }
}

fn engine() -> EngineVersions {
    EngineVersions::new(Version::from(ENGINE), Version::zero())
}

// ---------------------------------------------------------------------------
// Property: after a run the stamp is the engine version and never decreases
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn stamp_becomes_engine_version(
        stamp in 0..=ENGINE,
        thresholds in prop::collection::vec(0..=ENGINE, 0..8),
    ) {
        let (registry, _) = logging_registry(&thresholds);
        let mut record = stamped(stamp);
        registry.run(&mut record, &engine()).expect("run");

        let after = record.essentials_version.clone().expect("stamped");
        prop_assert_eq!(&after, &Version::from(ENGINE));
        prop_assert!(after >= Version::from(stamp));
    }
}

// ---------------------------------------------------------------------------
// Property: every step that ran is covered by the new stamp, and a registry
// with an unreachable threshold touches nothing
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn stamp_covers_every_step_that_ran(
        stamp in 0..=ENGINE,
        thresholds in prop::collection::vec(0..=BEYOND, 0..10),
    ) {
        let (registry, log) = logging_registry(&thresholds);
        let mut record = stamped(stamp);
        let before = record.clone();

        if thresholds.iter().any(|&t| t > ENGINE) {
            let err = registry.run(&mut record, &engine()).expect_err("unreachable threshold");
            prop_assert!(matches!(err, SaveError::Config(_)));
            prop_assert_eq!(&record, &before);
            prop_assert!(log.lock().expect("lock").is_empty());
            prop_assert!(registry.pending(&record, &engine()).is_err());
        } else {
            registry.run(&mut record, &engine()).expect("run");
            let after = record.essentials_version.clone().expect("stamped");
            let invoked = log.lock().expect("lock").clone();
            prop_assert!(invoked.iter().all(|&i| after >= Version::from(thresholds[i])));
            prop_assert!(
                (0..thresholds.len())
                    .filter(|&i| thresholds[i] > stamp)
                    .all(|i| invoked.contains(&i))
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property: due conversions run exactly once, ascending, registration
// order among equal thresholds; the rest never run
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn due_conversions_run_once_in_order(
        stamp in 0..=ENGINE,
        thresholds in prop::collection::vec(0..=ENGINE, 0..12),
    ) {
        let (registry, log) = logging_registry(&thresholds);
        let mut record = stamped(stamp);
        let report = registry.run(&mut record, &engine()).expect("run");

        let mut expected: Vec<usize> = (0..thresholds.len())
            .filter(|&i| thresholds[i] > stamp)
            .collect();
        expected.sort_by_key(|&i| thresholds[i]);

        let invoked = log.lock().expect("lock").clone();
        prop_assert_eq!(&invoked, &expected);
        prop_assert_eq!(report.applied.len(), expected.len());
        prop_assert_eq!(report.applied.len() + report.skipped.len(), thresholds.len());
        prop_assert!(invoked.iter().all(|&i| thresholds[i] > stamp));
    }
}

// ---------------------------------------------------------------------------
// Property: running twice is the same as running once
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn second_run_applies_nothing(
        stamp in 0..=ENGINE,
        thresholds in prop::collection::vec(0..=ENGINE, 0..8),
    ) {
        let (registry, log) = logging_registry(&thresholds);
        let mut record = stamped(stamp);
        registry.run(&mut record, &engine()).expect("first run");
        let first = log.lock().expect("lock").len();

        let report = registry.run(&mut record, &engine()).expect("second run");
        prop_assert!(report.applied.is_empty());
        prop_assert_eq!(log.lock().expect("lock").len(), first);
    }
}

// ---------------------------------------------------------------------------
// Property: remap-and-compact keeps survivors in their original order
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn remap_and_compact_is_stable(entries in prop::collection::vec(prop::option::of(0u32..100), 0..32)) {
        let mut remapped = entries.clone();
        let dropped = remap_and_compact(&mut remapped, |id| (id % 3 != 0).then_some(id * 10));

        let expected: Vec<Option<u32>> = entries
            .iter()
            .flatten()
            .filter(|&&id| id % 3 != 0)
            .map(|&id| Some(id * 10))
            .collect();
        let occupied = entries.iter().flatten().count();

        prop_assert_eq!(&remapped, &expected);
        prop_assert_eq!(dropped, occupied - expected.len());
        prop_assert!(remapped.iter().all(Option::is_some));
    }
}
