//! Integration tests importing several sources into one collection.

use bethyw_core::{
    builtin, Error, ImportFilters, InputFile, RegionCollection, SourceDataType, YearRange,
};
use std::fs;

const AREAS_CSV: &str = "Local authority code,Name (eng),Name (cym)\n\
    W06000011,Swansea,Abertawe\n\
    W06000015,Cardiff,Caerdydd\n\
    W06000023,Powys,Powys\n";

const POPDEN_JSON: &str = r#"{"value": [
    {"Localauthority_Code": "W06000023", "Localauthority_ItemName_ENG": "Powys",
     "Measure_Code": "Pop", "Measure_ItemName_ENG": "Population",
     "Year_Code": "1992", "Data": 999.0},
    {"Localauthority_Code": "W06000023", "Localauthority_ItemName_ENG": "Powys",
     "Measure_Code": "Dens", "Measure_ItemName_ENG": "Population density",
     "Year_Code": "1991", "Data": 23.5},
    {"Localauthority_Code": "W06000011", "Localauthority_ItemName_ENG": "Swansea",
     "Measure_Code": "Dens", "Measure_ItemName_ENG": "Population density",
     "Year_Code": "1991", "Data": 600.0}
]}"#;

const POP_CSV: &str = "AuthorityCode,1991,1992,1993\n\
    W06000011,230000,231000,232000\n\
    W06000015,300000,301000,302000\n\
    W06000023,120000,121000,122000\n";

fn load_all(filters: &ImportFilters) -> RegionCollection {
    let catalogue = builtin();
    let mut regions = RegionCollection::new();

    regions
        .populate(
            AREAS_CSV.as_bytes(),
            SourceDataType::AuthorityCodeCsv,
            &catalogue.areas.cols,
            filters,
        )
        .unwrap();

    let pop = catalogue.find("complete-pop").unwrap();
    regions
        .populate(POP_CSV.as_bytes(), pop.parser, &pop.cols, filters)
        .unwrap();

    let popden = catalogue.find("popden").unwrap();
    regions
        .populate(POPDEN_JSON.as_bytes(), popden.parser, &popden.cols, filters)
        .unwrap();

    regions
}

#[test]
fn test_sources_merge_into_one_region() {
    let regions = load_all(&ImportFilters::default());
    assert_eq!(regions.size(), 3);

    let powys = regions.get_area("W06000023").unwrap();
    assert_eq!(powys.get_name("eng").unwrap(), "Powys");
    assert_eq!(powys.get_name("cym").unwrap(), "Powys");
    assert_eq!(powys.size(), 2);

    // The later JSON import wins for 1992 only
    let pop = powys.get_measure("pop").unwrap();
    assert_eq!(pop.label(), "Population");
    assert_eq!(pop.get_value(1991).unwrap(), 120000.0);
    assert_eq!(pop.get_value(1992).unwrap(), 999.0);
    assert_eq!(pop.get_value(1993).unwrap(), 122000.0);

    let dens = powys.get_measure("DENS").unwrap();
    assert_eq!(dens.get_value(1991).unwrap(), 23.5);
}

#[test]
fn test_area_filter_limits_collection() {
    let filters = ImportFilters::new().with_areas(["W06000015"]);
    let regions = load_all(&filters);

    assert_eq!(regions.size(), 1);
    let cardiff = regions.get_area("W06000015").unwrap();
    assert_eq!(cardiff.display_name(), "Cardiff / Caerdydd");
    assert_eq!(cardiff.size(), 1);
}

#[test]
fn test_year_and_measure_filters() {
    let filters = ImportFilters::new()
        .with_measures(["pop"])
        .with_years(YearRange::new(1992, 1993));
    let regions = load_all(&filters);

    let swansea = regions.get_area("W06000011").unwrap();
    assert!(swansea.get_measure("dens").is_err());
    let pop = swansea.get_measure("pop").unwrap();
    assert!(pop.get_value(1991).is_err());
    assert_eq!(pop.get_value(1992).unwrap(), 231000.0);
}

#[test]
fn test_wide_table_before_reference_fails() {
    let catalogue = builtin();
    let pop = catalogue.find("complete-pop").unwrap();
    let mut regions = RegionCollection::new();

    let err = regions
        .populate(POP_CSV.as_bytes(), pop.parser, &pop.cols, &ImportFilters::default())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_json_output_round_trips_through_serde() {
    let regions = load_all(&ImportFilters::new().with_areas(["W06000011"]));
    let value: serde_json::Value = serde_json::from_str(&regions.to_json()).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "W06000011": {
                "names": {"eng": "Swansea", "cym": "Abertawe"},
                "measures": {
                    "dens": {"1991": 600.0},
                    "pop": {"1991": 230000.0, "1992": 231000.0, "1993": 232000.0}
                }
            }
        })
    );
}

#[test]
fn test_populate_from_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("areas.csv"), AREAS_CSV).unwrap();
    fs::write(dir.path().join("empty.json"), "").unwrap();

    let catalogue = builtin();
    let mut regions = RegionCollection::new();

    let reader = InputFile::new(dir.path().join("areas.csv")).open().unwrap();
    regions
        .populate_unfiltered(reader, catalogue.areas.parser, &catalogue.areas.cols)
        .unwrap();
    assert_eq!(regions.size(), 3);

    let popden = catalogue.find("popden").unwrap();
    let reader = InputFile::new(dir.path().join("empty.json")).open().unwrap();
    let err = regions
        .populate_unfiltered(reader, popden.parser, &popden.cols)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidStream(_)));
}
