use skylane_lib::{CityAtlas, Error, PlaneCatalog, UpgradeLevel};

const PLANE_HEADER: &str = "name,special,level,class,capacity,range,speed,weight,cost,full_cost";

#[test]
fn builtin_tables_are_populated() {
    let atlas = CityAtlas::builtin();
    let catalog = PlaneCatalog::builtin();

    assert!(!atlas.is_empty());
    assert!(!catalog.is_empty());
    assert!(atlas.get("San Francisco").is_some());
    assert!(catalog.get("Pearjet").is_some());
}

#[test]
fn city_lookup_ignores_case_spacing_and_punctuation() {
    let atlas = CityAtlas::builtin();

    let expected = atlas.get("St. Louis").expect("city exists");
    for spelling in ["st louis", "ST LOUIS", "StLouis", "st.louis"] {
        let found = atlas.get(spelling).expect("normalized lookup succeeds");
        assert_eq!(found, expected, "{spelling} should resolve");
    }
}

#[test]
fn plane_lookup_ignores_case_and_spacing() {
    let catalog = PlaneCatalog::builtin();

    let expected = catalog.get("Sea Knight").expect("plane exists");
    assert_eq!(catalog.get("seaknight"), Some(expected));
    assert_eq!(catalog.get("SEA KNIGHT"), Some(expected));
}

#[test]
fn unresolved_city_gets_fuzzy_suggestions() {
    let atlas = CityAtlas::builtin();

    let error = atlas.resolve("Sidney").expect_err("misspelling");
    let message = format!("{error}");
    assert!(message.contains("unknown city name"));
    assert!(message.contains("Sydney"));
}

#[test]
fn duplicate_city_rows_are_rejected() {
    let table = "name,x,y,class,population\nAlpha,0,0,1,100\nalpha,5,5,1,200\n";
    let error = CityAtlas::from_reader(table.as_bytes()).expect_err("duplicate key");

    assert!(matches!(error, Error::DuplicateCityName { .. }));
}

#[test]
fn out_of_range_city_class_is_rejected() {
    let table = "name,x,y,class,population\nAlpha,0,0,0,100\n";
    let error = CityAtlas::from_reader(table.as_bytes()).expect_err("class zero");

    assert!(matches!(error, Error::CatalogValidation { .. }));
}

#[test]
fn duplicate_plane_rows_are_rejected() {
    let table = format!(
        "{PLANE_HEADER}\nTestwing,false,1,1,2,20,100,1.0,1000,\nTest Wing,false,1,1,2,20,100,1.0,1000,\n"
    );
    let error = PlaneCatalog::from_reader(table.as_bytes()).expect_err("duplicate key");

    assert!(matches!(error, Error::DuplicatePlaneName { .. }));
}

#[test]
fn nonpositive_plane_stats_are_rejected() {
    let table = format!("{PLANE_HEADER}\nDud,false,1,1,2,0,100,1.0,1000,\n");
    let error = PlaneCatalog::from_reader(table.as_bytes()).expect_err("zero range");

    assert!(matches!(error, Error::CatalogValidation { .. }));
}

#[test]
fn special_planes_parse_optional_columns() {
    let catalog = PlaneCatalog::builtin();

    let anan = catalog.get("Anan").expect("plane exists");
    assert!(anan.special);
    assert_eq!(anan.level, None);
    assert_eq!(anan.full_cost, Some(420_000));

    let airvan = catalog.get("Airvan").expect("plane exists");
    assert!(!airvan.special);
    assert_eq!(airvan.level, Some(1));
    assert_eq!(airvan.full_cost, None);
}

#[test]
fn upgrade_levels_are_bounded() {
    assert!(UpgradeLevel::new(0).is_ok());
    assert!(UpgradeLevel::new(4).is_ok());
    assert!(matches!(
        UpgradeLevel::new(5),
        Err(Error::InvalidUpgradeLevel { level: 5 })
    ));
    assert!(matches!(
        UpgradeLevel::new(-1),
        Err(Error::InvalidUpgradeLevel { level: -1 })
    ));
}

#[test]
fn upgrades_scale_plane_stats() {
    let catalog = PlaneCatalog::builtin();
    let pearjet = catalog.get("Pearjet").expect("plane exists");

    let two = UpgradeLevel::new(2).expect("valid level");
    let one = UpgradeLevel::new(1).expect("valid level");
    let four = UpgradeLevel::new(4).expect("valid level");

    assert_eq!(pearjet.effective_range(UpgradeLevel::default()), 700);
    assert_eq!(pearjet.effective_range(two), 770);
    // 310 * 1.05 = 325.5 rounds up.
    assert_eq!(pearjet.effective_speed(one), 326);
    assert_eq!(pearjet.effective_weight(four), 3.2);
}

#[test]
fn scaled_distance_floors_before_scaling() {
    let atlas = CityAtlas::builtin();
    let chicago = atlas.get("Chicago").expect("city exists");
    let new_york = atlas.get("New York").expect("city exists");

    // dx 60, dy 5 -> sqrt(3625) = 60.2... floors to 60, scaled by 4.
    assert_eq!(chicago.distance_to(new_york), 240);
    assert_eq!(chicago.raw_distance_to(new_york), 60.0);
    // Symmetric by construction.
    assert_eq!(new_york.distance_to(chicago), 240);
}
