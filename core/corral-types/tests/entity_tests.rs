use chrono::{TimeZone, Utc};
use corral_types::{
    ApiEnvelope, CattleFields, EntityId, EntityKind, EnvelopeMessage, Location, LocationSource,
    LocationUpdate, Sex, TrackedEntity, TrackingConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn cow_001() -> CattleFields {
    CattleFields {
        ear_tag: Some("COW-001".into()),
        breed: Some("Holstein".into()),
        age: Some(3.0),
        weight: Some(450.0),
        sex: Some(Sex::Female),
        ..Default::default()
    }
}

// ── TrackedEntity wire format ────────────────────────────────────

#[test]
fn decodes_backend_cattle_record() {
    let raw = json!({
        "_id": "65f1a2",
        "earTag": "COW-001",
        "breed": "Holstein",
        "weight": 450,
        "location": {
            "latitude": 17.989,
            "longitude": -92.9465,
            "accuracy": 5.0,
            "timestamp": "2024-03-01T12:00:00Z",
            "source": "GPS"
        }
    });

    let entity: TrackedEntity = serde_json::from_value(raw).unwrap();
    assert_eq!(entity.id, EntityId::server("65f1a2"));
    assert_eq!(entity.kind, EntityKind::Cattle);
    assert_eq!(entity.ear_tag(), Some("COW-001"));
    assert_eq!(entity.get_number("weight"), Some(450.0));

    let location = entity.location.unwrap();
    assert_eq!(location.source, LocationSource::Gps);
    assert_eq!(location.accuracy, Some(5.0));
    assert_eq!(location.altitude, None);
}

#[test]
fn unknown_fields_survive_roundtrip() {
    let raw = json!({ "id": "x1", "earTag": "T-9", "vaccinated": true });
    let entity: TrackedEntity = serde_json::from_value(raw).unwrap();
    let back = serde_json::to_value(&entity).unwrap();
    assert_eq!(back["vaccinated"], json!(true));
    assert_eq!(back["id"], json!("x1"));
}

#[test]
fn label_prefers_ear_tag_then_name() {
    let mut entity = TrackedEntity::new(EntityId::server("id-7"), EntityKind::Cattle, Default::default());
    assert_eq!(entity.label(), "id-7");

    entity.data.insert("name".into(), json!("Lucera"));
    assert_eq!(entity.label(), "Lucera");

    entity.data.insert("earTag".into(), json!("COW-7"));
    assert_eq!(entity.label(), "COW-7");
}

// ── CattleFields ─────────────────────────────────────────────────

#[test]
fn cattle_fields_use_wire_names() {
    let value = serde_json::to_value(cow_001()).unwrap();
    assert_eq!(
        value,
        json!({
            "earTag": "COW-001",
            "breed": "Holstein",
            "age": 3.0,
            "weight": 450.0,
            "sex": "female"
        })
    );
}

#[test]
fn cattle_fields_to_entity_has_no_location() {
    let id = EntityId::local();
    let entity = cow_001().to_entity(id.clone()).unwrap();
    assert_eq!(entity.id, id);
    assert!(!entity.has_location());
    assert_eq!(entity.ear_tag(), Some("COW-001"));
    assert!(!entity.data.contains_key("location"));
}

// ── Location update body ─────────────────────────────────────────

#[test]
fn location_update_body_shape() {
    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let update = LocationUpdate::new(
        Location::new(17.989, -92.9465, LocationSource::Manual)
            .with_accuracy(5.0)
            .with_timestamp(ts),
    );

    let value = serde_json::to_value(&update).unwrap();
    assert_eq!(
        value,
        json!({
            "location": {
                "latitude": 17.989,
                "longitude": -92.9465,
                "accuracy": 5.0,
                "timestamp": "2024-03-01T12:00:00Z",
                "source": "MANUAL"
            },
            "trackingConfig": {
                "enableGPS": true,
                "updateInterval": 300,
                "geofenceAlerts": true,
                "activityMonitoring": false
            }
        })
    );
}

#[test]
fn location_update_keeps_tracking_config_last() {
    let update = LocationUpdate::new(Location::new(1.0, 2.0, LocationSource::Gps))
        .with_tracking_config(TrackingConfig::default());
    let text = serde_json::to_string(&update).unwrap();
    assert!(text.find("\"location\"").unwrap() < text.find("\"trackingConfig\"").unwrap());
}

// ── Envelope ─────────────────────────────────────────────────────

#[test]
fn envelope_without_data() {
    let env: ApiEnvelope<Vec<TrackedEntity>> =
        serde_json::from_value(json!({ "success": false, "message": "nope" })).unwrap();
    assert!(!env.success);
    assert!(env.data.is_none());
    assert_eq!(env.message.as_deref(), Some("nope"));
}

/// Generic over any payload, including ones without a `Default`.
fn decode_envelope<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> ApiEnvelope<T> {
    serde_json::from_value(body).unwrap()
}

#[derive(Debug, PartialEq, serde::Deserialize)]
struct Ping {
    latency: u32,
}

#[test]
fn envelope_decodes_payload_without_default() {
    let env: ApiEnvelope<Ping> = decode_envelope(json!({ "success": true, "data": { "latency": 12 } }));
    assert_eq!(env.data, Some(Ping { latency: 12 }));

    let empty: ApiEnvelope<Ping> = decode_envelope(json!({ "success": true }));
    assert_eq!(empty.data, None);
    assert_eq!(empty.message, None);
}

#[test]
fn envelope_message_from_error_body() {
    assert_eq!(
        EnvelopeMessage::from_body(r#"{"success":false,"message":"Ear tag already exists"}"#),
        Some("Ear tag already exists".to_string())
    );
    assert_eq!(
        EnvelopeMessage::from_body(r#"{"error":"Unauthorized"}"#),
        Some("Unauthorized".to_string())
    );
    assert_eq!(EnvelopeMessage::from_body("<html>502</html>"), None);
    assert_eq!(EnvelopeMessage::from_body(r#"{"message":""}"#), None);
}
