use skylane_lib::{
    build_flight_graph, plan_flight, CityAtlas, Error, FlightRequest, PlaneCatalog, UpgradeLevel,
};

const PLANE_HEADER: &str = "name,special,level,class,capacity,range,speed,weight,cost,full_cost";

fn atlas_from(rows: &str) -> CityAtlas {
    let table = format!("name,x,y,class,population\n{rows}");
    CityAtlas::from_reader(table.as_bytes()).expect("atlas parses")
}

fn catalog_from(rows: &str) -> PlaneCatalog {
    let table = format!("{PLANE_HEADER}\n{rows}");
    PlaneCatalog::from_reader(table.as_bytes()).expect("catalog parses")
}

/// 3-4-5 triangle: Alpha-Beta is 12 mi., Beta-Gamma 16 mi., Alpha-Gamma 20 mi.
fn triangle_atlas() -> CityAtlas {
    atlas_from("Alpha,0,0,1,100\nBeta,3,0,1,100\nGamma,3,4,1,100\n")
}

#[test]
fn direct_edge_beats_detour_when_shorter() {
    let atlas = triangle_atlas();
    let catalog = catalog_from("Testwing,false,1,1,2,20,100,1.0,1000,\n");

    let plan = plan_flight(&atlas, &catalog, &FlightRequest::new("Alpha", "Gamma", "Testwing"))
        .expect("route exists");

    assert_eq!(plan.steps, vec!["Alpha", "Gamma"]);
    assert_eq!(plan.legs, vec![20]);
    assert_eq!(plan.total_distance, 20);
}

#[test]
fn detour_is_taken_when_direct_hop_exceeds_range() {
    let atlas = triangle_atlas();
    let catalog = catalog_from("Shortwing,false,1,1,2,16,100,1.0,1000,\n");

    let plan = plan_flight(&atlas, &catalog, &FlightRequest::new("Alpha", "Gamma", "Shortwing"))
        .expect("route exists");

    assert_eq!(plan.steps, vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(plan.legs, vec![12, 16]);
    assert_eq!(plan.total_distance, 28);
}

#[test]
fn exhausted_search_reports_route_not_found() {
    let atlas = triangle_atlas();
    let catalog = catalog_from("Gnat,false,1,1,2,8,100,1.0,1000,\n");

    let error = plan_flight(&atlas, &catalog, &FlightRequest::new("Alpha", "Gamma", "Gnat"))
        .expect_err("no hop fits an 8 mi. range");

    assert!(matches!(error, Error::RouteNotFound { .. }));
    assert!(format!("{error}").contains("no route found"));
}

#[test]
fn search_returns_none_instead_of_panicking_without_edges() {
    let atlas = triangle_atlas();
    let gamma = atlas.resolve("Gamma").expect("city exists").clone();

    let graph = build_flight_graph(&atlas, 1, 8, &gamma);
    assert_eq!(skylane_lib::a_star(&graph, "Alpha", "Gamma"), None);
}

#[test]
fn equal_cost_paths_resolve_to_the_earlier_waypoint() {
    // North and South are mirror detours of identical length; the scan
    // settles on whichever entered the open set first.
    let atlas = atlas_from(
        "Origin,0,0,1,100\nNorth,3,4,1,100\nSouth,3,-4,1,100\nTarget,6,0,1,100\n",
    );
    let catalog = catalog_from("Testwing,false,1,1,2,20,100,1.0,1000,\n");

    let plan = plan_flight(&atlas, &catalog, &FlightRequest::new("Origin", "Target", "Testwing"))
        .expect("route exists");

    assert_eq!(plan.steps, vec!["Origin", "North", "Target"]);
}

#[test]
fn identical_requests_return_identical_plans() {
    let atlas = CityAtlas::builtin();
    let catalog = PlaneCatalog::builtin();
    let request = FlightRequest::new("San Francisco", "Sydney", "Pearjet");

    let first = plan_flight(atlas, catalog, &request).expect("route exists");
    let second = plan_flight(atlas, catalog, &request).expect("route exists");

    assert_eq!(first, second);
}

#[test]
fn heuristic_never_exceeds_true_remaining_distance() {
    let atlas = triangle_atlas();
    let catalog = catalog_from("Shortwing,false,1,1,2,16,100,1.0,1000,\n");
    let gamma = atlas.resolve("Gamma").expect("city exists").clone();

    let graph = build_flight_graph(&atlas, 1, 16, &gamma);
    for (_, waypoint) in graph.vertices() {
        let plan = plan_flight(
            &atlas,
            &catalog,
            &FlightRequest::new(waypoint.name.clone(), "Gamma", "Shortwing"),
        )
        .expect("route exists");
        assert!(
            waypoint.heuristic <= plan.total_distance,
            "straight line from {} must not exceed the flown distance",
            waypoint.name
        );
    }
}

#[test]
fn class_filter_excludes_small_airfields() {
    let atlas = atlas_from("Alpha,0,0,2,100\nBeta,5,0,1,100\nGamma,10,0,2,100\n");
    let catalog = catalog_from(
        "Hopper,false,1,1,2,24,100,1.0,1000,\nClipper,false,1,2,2,24,100,1.0,1000,\n",
    );

    let via_beta = plan_flight(&atlas, &catalog, &FlightRequest::new("Alpha", "Gamma", "Hopper"))
        .expect("class 1 plane may stop at Beta");
    assert_eq!(via_beta.steps, vec!["Alpha", "Beta", "Gamma"]);

    let error = plan_flight(&atlas, &catalog, &FlightRequest::new("Alpha", "Gamma", "Clipper"))
        .expect_err("class 2 plane cannot stop at Beta");
    assert!(matches!(error, Error::RouteNotFound { .. }));
}

#[test]
fn range_upgrade_extends_reach() {
    let atlas = atlas_from("Alpha,0,0,1,100\nGamma,10,0,1,100\n");
    let catalog = catalog_from("Stretcher,false,1,1,2,34,100,1.0,1000,\n");

    let base = FlightRequest::new("Alpha", "Gamma", "Stretcher");
    let error = plan_flight(&atlas, &catalog, &base).expect_err("40 mi. hop exceeds 34 mi.");
    assert!(matches!(error, Error::RouteNotFound { .. }));

    let upgraded = FlightRequest {
        range_upgrade: UpgradeLevel::new(4).expect("valid level"),
        ..base
    };
    let plan = plan_flight(&atlas, &catalog, &upgraded).expect("41 mi. reaches Gamma");
    assert_eq!(plan.effective_range, 41);
    assert_eq!(plan.steps, vec!["Alpha", "Gamma"]);
}

#[test]
fn origin_equal_to_destination_is_a_single_step() {
    let atlas = triangle_atlas();
    let catalog = catalog_from("Testwing,false,1,1,2,20,100,1.0,1000,\n");

    let plan = plan_flight(&atlas, &catalog, &FlightRequest::new("Alpha", "Alpha", "Testwing"))
        .expect("trivial route");

    assert_eq!(plan.steps, vec!["Alpha"]);
    assert_eq!(plan.hop_count(), 0);
    assert_eq!(plan.total_distance, 0);
}

#[test]
fn builtin_tables_route_across_the_map() {
    let plan = plan_flight(
        CityAtlas::builtin(),
        PlaneCatalog::builtin(),
        &FlightRequest::new("San Francisco", "New York", "Pearjet"),
    )
    .expect("route exists");

    assert_eq!(plan.steps.first().map(String::as_str), Some("San Francisco"));
    assert_eq!(plan.steps.last().map(String::as_str), Some("New York"));
    assert!(plan.hop_count() >= 2, "direct hop exceeds the Pearjet range");
    assert!(plan.legs.iter().all(|leg| *leg <= plan.effective_range));
}

#[test]
fn isolated_destination_is_unreachable_by_short_range_planes() {
    let error = plan_flight(
        CityAtlas::builtin(),
        PlaneCatalog::builtin(),
        &FlightRequest::new("San Francisco", "Honolulu", "Airvan"),
    )
    .expect_err("no city lies within 300 mi. of Honolulu");

    assert!(matches!(error, Error::RouteNotFound { .. }));
}

#[test]
fn unknown_origin_reports_suggestions() {
    let error = plan_flight(
        CityAtlas::builtin(),
        PlaneCatalog::builtin(),
        &FlightRequest::new("San Fransisco", "Sydney", "Pearjet"),
    )
    .expect_err("typo should not resolve");

    let message = format!("{error}");
    assert!(message.contains("unknown city name"));
    assert!(message.contains("San Francisco"));
}
