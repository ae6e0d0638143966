//! Static demo data served when a live read fails.
//!
//! One small ranch outside Villahermosa, Tabasco. Every dataset has the exact
//! shape of the corresponding live endpoint; location timestamps are relative
//! to the moment the dataset is built so the map shows a spread of ages.

use chrono::{Duration, Utc};
use corral_types::{
    BoundingBox, CattleLocation, CattleStats, Coordinate, CountBy, DashboardOverview, EntityId,
    EntityKind, HealthBreakdown, HealthEvent, HealthMetrics, Infrastructure, Location,
    LocationSource, MetricPoint, Pasture, PastureBoundary, ProductionMetrics, RanchBoundaries,
    RanchContact, RanchOverview, RanchProfile, RanchSummary, TrackedEntity,
};
use serde_json::{json, Map, Value};

pub const RANCH_ID: &str = "demo-ranch";
pub const RANCH_NAME: &str = "Rancho El Ceibo (demo)";
pub const RANCH_CENTER: Coordinate = Coordinate::new(17.989, -92.9465);

struct DemoAnimal {
    id: &'static str,
    ear_tag: &'static str,
    name: &'static str,
    breed: &'static str,
    sex: &'static str,
    age: f64,
    weight: f64,
    health: &'static str,
    /// Offset from the ranch centre and minutes since the fix.
    fix: Option<(f64, f64, i64)>,
}

const HERD: [DemoAnimal; 8] = [
    DemoAnimal { id: "demo-001", ear_tag: "MX-001", name: "Lucera", breed: "Brahman", sex: "female", age: 4.0, weight: 520.0, health: "healthy", fix: Some((0.0012, -0.0009, 10)) },
    DemoAnimal { id: "demo-002", ear_tag: "MX-002", name: "Canela", breed: "Holstein", sex: "female", age: 3.0, weight: 480.0, health: "healthy", fix: Some((-0.0021, 0.0015, 45)) },
    DemoAnimal { id: "demo-003", ear_tag: "MX-003", name: "Toro Bravo", breed: "Nelore", sex: "male", age: 5.0, weight: 760.0, health: "healthy", fix: Some((0.0034, 0.0027, 150)) },
    DemoAnimal { id: "demo-004", ear_tag: "MX-004", name: "Paloma", breed: "Gyr", sex: "female", age: 2.0, weight: 390.0, health: "under_treatment", fix: Some((-0.0008, -0.0031, 420)) },
    DemoAnimal { id: "demo-005", ear_tag: "MX-005", name: "Chispa", breed: "Brahman", sex: "female", age: 1.0, weight: 240.0, health: "healthy", fix: Some((0.0045, -0.0040, 900)) },
    DemoAnimal { id: "demo-006", ear_tag: "MX-006", name: "Centeno", breed: "Suizo", sex: "male", age: 6.0, weight: 810.0, health: "sick", fix: Some((-0.0052, 0.0038, 2_000)) },
    DemoAnimal { id: "demo-007", ear_tag: "MX-007", name: "Rosita", breed: "Holstein", sex: "female", age: 2.5, weight: 430.0, health: "healthy", fix: None },
    DemoAnimal { id: "demo-008", ear_tag: "MX-008", name: "Nube", breed: "Gyr", sex: "female", age: 0.5, weight: 150.0, health: "quarantine", fix: None },
];

fn demo_location(fix: (f64, f64, i64)) -> Location {
    let (dlat, dlng, minutes) = fix;
    Location::new(
        RANCH_CENTER.lat + dlat,
        RANCH_CENTER.lng + dlng,
        LocationSource::Gps,
    )
    .with_accuracy(8.0)
    .with_timestamp(Utc::now() - Duration::minutes(minutes))
}

fn offset(dlat: f64, dlng: f64) -> Coordinate {
    Coordinate::new(RANCH_CENTER.lat + dlat, RANCH_CENTER.lng + dlng)
}

fn perimeter() -> Vec<Coordinate> {
    vec![
        offset(0.008, -0.008),
        offset(0.008, 0.008),
        offset(-0.008, 0.008),
        offset(-0.008, -0.008),
    ]
}

fn pastures() -> Vec<Pasture> {
    vec![
        Pasture {
            id: EntityId::server("demo-potrero-norte"),
            name: "Potrero Norte".into(),
            area_hectares: 85.0,
            capacity: 40,
            current_occupancy: 4,
            status: "active".into(),
            boundary: vec![
                offset(0.008, -0.008),
                offset(0.008, 0.008),
                offset(0.0, 0.008),
                offset(0.0, -0.008),
            ],
        },
        Pasture {
            id: EntityId::server("demo-potrero-sur"),
            name: "Potrero Sur".into(),
            area_hectares: 85.0,
            capacity: 40,
            current_occupancy: 4,
            status: "resting".into(),
            boundary: vec![
                offset(0.0, -0.008),
                offset(0.0, 0.008),
                offset(-0.008, 0.008),
                offset(-0.008, -0.008),
            ],
        },
    ]
}

/// `GET /cattle`.
pub fn cattle() -> Vec<TrackedEntity> {
    HERD.iter()
        .map(|a| {
            let mut data = Map::new();
            data.insert("earTag".into(), json!(a.ear_tag));
            data.insert("name".into(), json!(a.name));
            data.insert("breed".into(), json!(a.breed));
            data.insert("sex".into(), json!(a.sex));
            data.insert("age".into(), json!(a.age));
            data.insert("weight".into(), json!(a.weight));
            data.insert("healthStatus".into(), Value::String(a.health.into()));
            let mut entity = TrackedEntity::new(EntityId::server(a.id), EntityKind::Cattle, data);
            entity.location = a.fix.map(demo_location);
            entity
        })
        .collect()
}

/// `GET /maps/cattle-locations`; also the base of the nearby/by-area fallbacks.
pub fn cattle_locations() -> Vec<CattleLocation> {
    HERD.iter()
        .filter_map(|a| {
            let fix = a.fix?;
            Some(CattleLocation {
                cattle_id: EntityId::server(a.id),
                ear_tag: a.ear_tag.into(),
                name: Some(a.name.into()),
                location: demo_location(fix),
                health_status: Some(a.health.into()),
                activity: Some(if fix.2 < 60 { "grazing" } else { "resting" }.into()),
            })
        })
        .collect()
}

/// `GET /cattle/stats`.
pub fn cattle_stats() -> CattleStats {
    let count = |f: &dyn Fn(&DemoAnimal) -> bool| HERD.iter().filter(|a| f(a)).count() as u32;
    let total = HERD.len() as u32;
    let mut by_breed: Vec<CountBy> = Vec::new();
    for animal in &HERD {
        match by_breed.iter_mut().find(|c| c.label == animal.breed) {
            Some(entry) => entry.count += 1,
            None => by_breed.push(CountBy::new(animal.breed, 1)),
        }
    }

    CattleStats {
        total,
        tracked: count(&|a: &DemoAnimal| a.fix.is_some()),
        average_weight: HERD.iter().map(|a| a.weight).sum::<f64>() / f64::from(total),
        by_breed,
        by_sex: vec![
            CountBy::new("female", count(&|a: &DemoAnimal| a.sex == "female")),
            CountBy::new("male", count(&|a: &DemoAnimal| a.sex == "male")),
        ],
        health: health_breakdown(),
    }
}

fn health_breakdown() -> HealthBreakdown {
    let count = |status: &str| HERD.iter().filter(|a| a.health == status).count() as u32;
    HealthBreakdown {
        healthy: count("healthy"),
        sick: count("sick"),
        under_treatment: count("under_treatment"),
        quarantine: count("quarantine"),
    }
}

/// `GET /maps/ranch-overview` with every collection included.
pub fn ranch_overview() -> RanchOverview {
    let outline = perimeter();
    RanchOverview {
        ranch: RanchSummary {
            id: RANCH_ID.into(),
            name: RANCH_NAME.into(),
            center: RANCH_CENTER,
            total_area_hectares: 170.0,
        },
        potreros: pastures(),
        ganado: cattle_locations(),
        infraestructura: vec![
            Infrastructure {
                id: "demo-bebedero-1".into(),
                name: "Bebedero 1".into(),
                category: "water".into(),
                coordinate: offset(0.0030, -0.0020),
            },
            Infrastructure {
                id: "demo-corral".into(),
                name: "Corral de manejo".into(),
                category: "corral".into(),
                coordinate: offset(-0.0010, 0.0005),
            },
        ],
        bounds: BoundingBox::around(outline)
            .unwrap_or(BoundingBox::new(RANCH_CENTER, RANCH_CENTER)),
    }
}

/// `GET /maps/ranch-boundaries`.
pub fn ranch_boundaries() -> RanchBoundaries {
    RanchBoundaries {
        perimeter: perimeter(),
        pastures: pastures()
            .into_iter()
            .map(|p| PastureBoundary {
                id: p.id,
                name: p.name,
                boundary: p.boundary,
            })
            .collect(),
        total_area_hectares: 170.0,
    }
}

/// `GET /ranch/profile`.
pub fn ranch_profile() -> RanchProfile {
    RanchProfile {
        id: RANCH_ID.into(),
        name: RANCH_NAME.into(),
        owner: "Demo".into(),
        address: "Carretera Villahermosa-Frontera km 12, Centro, Tabasco".into(),
        location: Some(RANCH_CENTER),
        total_area_hectares: 170.0,
        established_year: Some(1998),
        contact: Some(RanchContact {
            phone: "+52 993 000 0000".into(),
            email: "demo@corral.invalid".into(),
        }),
    }
}

/// `GET /dashboard/overview`.
pub fn dashboard_overview() -> DashboardOverview {
    let health = health_breakdown();
    let pastures = pastures();
    let capacity: u32 = pastures.iter().map(|p| p.capacity).sum();
    let occupancy: u32 = pastures.iter().map(|p| p.current_occupancy).sum();
    DashboardOverview {
        total_cattle: HERD.len() as u32,
        healthy_cattle: health.healthy,
        pending_vaccinations: 3,
        active_alerts: health.sick + health.quarantine,
        total_pastures: pastures.len() as u32,
        occupancy_rate: f64::from(occupancy) / f64::from(capacity.max(1)),
        last_updated: None,
    }
}

/// `GET /dashboard/production-metrics`.
pub fn production_metrics() -> ProductionMetrics {
    ProductionMetrics {
        period: "last_30_days".into(),
        milk_liters_daily_avg: 14.2,
        weight_gain_kg_daily_avg: 0.8,
        births: 1,
        sales: 0,
        series: ["week 1", "week 2", "week 3", "week 4"]
            .iter()
            .zip([13.8, 14.1, 14.4, 14.5])
            .map(|(label, value)| MetricPoint::new(*label, value))
            .collect(),
    }
}

/// `GET /dashboard/health-metrics`.
pub fn health_metrics() -> HealthMetrics {
    HealthMetrics {
        breakdown: health_breakdown(),
        vaccination_coverage: 0.75,
        upcoming_vaccinations: 3,
        recent_events: vec![
            HealthEvent {
                ear_tag: "MX-004".into(),
                description: "Tratamiento antiparasitario".into(),
                date: Utc::now() - Duration::days(2),
            },
            HealthEvent {
                ear_tag: "MX-006".into(),
                description: "Revisión veterinaria".into(),
                date: Utc::now() - Duration::days(5),
            },
        ],
    }
}
