use corral_types::{area_query, haversine_m, BoundingBox, Coordinate, NearbyQuery, OverviewOptions};

#[test]
fn haversine_zero_for_same_point() {
    let p = Coordinate::new(17.989, -92.9465);
    assert!(haversine_m(p, p).abs() < 1e-6);
}

#[test]
fn haversine_one_degree_of_latitude() {
    let d = haversine_m(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
    assert!((d - 111_195.0).abs() < 50.0, "got {d}");
}

#[test]
fn haversine_is_symmetric() {
    let a = Coordinate::new(17.989, -92.9465);
    let b = Coordinate::new(17.995, -92.94);
    assert!((haversine_m(a, b) - haversine_m(b, a)).abs() < 1e-9);
}

#[test]
fn bounding_box_around_points() {
    let bbox = BoundingBox::around([
        Coordinate::new(17.98, -92.95),
        Coordinate::new(17.99, -92.94),
        Coordinate::new(17.985, -92.96),
    ])
    .unwrap();

    assert_eq!(bbox.ne, Coordinate::new(17.99, -92.94));
    assert_eq!(bbox.sw, Coordinate::new(17.98, -92.96));
    assert!(bbox.contains(Coordinate::new(17.985, -92.95)));
    assert!(bbox.contains(bbox.ne));
    assert!(!bbox.contains(Coordinate::new(18.0, -92.95)));
}

#[test]
fn bounding_box_around_nothing() {
    assert!(BoundingBox::around(Vec::new()).is_none());
}

#[test]
fn coordinate_validity() {
    assert!(Coordinate::new(17.989, -92.9465).is_valid());
    assert!(!Coordinate::new(91.0, 0.0).is_valid());
    assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
}

#[test]
fn query_pairs_use_wire_names() {
    let nearby = NearbyQuery {
        center: Coordinate::new(17.5, -92.5),
        radius_m: 250.0,
    };
    let keys: Vec<_> = nearby.to_query().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["lat", "lng", "radius"]);

    let area = BoundingBox::new(Coordinate::new(18.0, -92.0), Coordinate::new(17.0, -93.0));
    let pairs = area_query(&area);
    assert_eq!(pairs[0], ("ne_lat".to_string(), "18".to_string()));
    assert_eq!(pairs[3], ("sw_lng".to_string(), "-93".to_string()));

    let overview = OverviewOptions {
        include_ganado: false,
        ..Default::default()
    };
    assert!(overview
        .to_query()
        .contains(&("includeGanado".to_string(), "false".to_string())));
}
