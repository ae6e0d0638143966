//! Property tests for pin derivation.
//!
//! Whatever the upstream list looks like, a reconciliation pass leaves at
//! most one pin (and one marker) per entity, and only for located entities.

use chrono::{TimeDelta, TimeZone, Utc};
use corral_map::{pin_id, AgeBucket, MapConfig, Reconciler, SimulatedSurface};
use corral_types::{EntityId, EntityKind, Location, LocationSource, TrackedEntity};
use proptest::prelude::*;
use serde_json::Map;
use std::collections::HashSet;

fn entity_strategy() -> impl Strategy<Value = TrackedEntity> {
    (0u8..6, proptest::option::of((-89.0f64..89.0, -179.0f64..179.0, 0i64..100_000)))
        .prop_map(|(id, located)| {
            let mut entity =
                TrackedEntity::new(EntityId::server(format!("c{id}")), EntityKind::Cattle, Map::new());
            entity.location = located.map(|(lat, lng, age_s)| {
                let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
                    - TimeDelta::seconds(age_s);
                Location::new(lat, lng, LocationSource::Gps).with_timestamp(ts)
            });
            entity
        })
}

proptest! {
    #[test]
    fn at_most_one_pin_per_entity(
        passes in prop::collection::vec(prop::collection::vec(entity_strategy(), 0..12), 1..5)
    ) {
        let mut map = Reconciler::new(Box::new(SimulatedSurface::new()), MapConfig::default());
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        for entities in &passes {
            let report = map.reconcile(entities, now).unwrap();

            let located: HashSet<String> = entities
                .iter()
                .filter(|e| e.has_location())
                .map(|e| pin_id(&e.id))
                .collect();
            let pins: Vec<String> = map.pins().map(|p| p.id.clone()).collect();
            let unique: HashSet<String> = pins.iter().cloned().collect();

            prop_assert_eq!(pins.len(), unique.len());
            prop_assert_eq!(&unique, &located);
            prop_assert_eq!(report.pins, located.len());
            prop_assert_eq!(map.surface().marker_count(), located.len());
            prop_assert_eq!(report.recentered, located.len() == 1);
        }
    }

    #[test]
    fn pin_id_is_stable(n in 0u32..10_000) {
        let id = EntityId::server(format!("cow-{n}"));
        prop_assert_eq!(pin_id(&id), pin_id(&EntityId::server(format!("cow-{n}"))));
        prop_assert_eq!(pin_id(&id), format!("pin-cow-{n}"));
    }

    #[test]
    fn age_buckets_are_monotonic(a in -10_000i64..200_000, b in -10_000i64..200_000) {
        let (young, old) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            AgeBucket::of(TimeDelta::seconds(young)) <= AgeBucket::of(TimeDelta::seconds(old))
        );
    }
}

#[test]
fn bucket_edges() {
    assert_eq!(AgeBucket::of(TimeDelta::minutes(59)), AgeBucket::Fresh);
    assert_eq!(AgeBucket::of(TimeDelta::hours(1)), AgeBucket::Recent);
    assert_eq!(AgeBucket::of(TimeDelta::hours(6)), AgeBucket::Stale);
    assert_eq!(AgeBucket::of(TimeDelta::hours(24)), AgeBucket::Stale);
    assert_eq!(AgeBucket::of(TimeDelta::hours(24) + TimeDelta::seconds(1)), AgeBucket::Old);
    assert_eq!(AgeBucket::of(TimeDelta::minutes(-30)), AgeBucket::Fresh);
}

#[test]
fn pin_detail_lists_reading() {
    let mut entity = TrackedEntity::new(EntityId::server("c9"), EntityKind::Cattle, Map::new());
    entity
        .data
        .insert("earTag".into(), serde_json::Value::String("MX-009".into()));
    entity
        .data
        .insert("activity".into(), serde_json::Value::String("grazing".into()));
    entity.location = Some(
        Location::new(17.98912, -92.94651, LocationSource::Manual)
            .with_accuracy(8.4)
            .with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
    );

    let pin = corral_map::LocationPin::from_entity(&entity).unwrap();

    assert_eq!(pin.added_by, LocationSource::Manual);
    assert_eq!(
        pin.detail(),
        "MX-009\n17.98912, -92.94651\n±8 m\ngrazing\n2024-05-01 09:30 UTC"
    );
}
