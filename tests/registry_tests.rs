use std::sync::Arc;

use cim_workload::{
    save_initial_parameters_to_file, BuilderConfig, Dna, DnaElement, Parameters, Registry,
    SimpleTemplate, Template, WorkloadError,
};
use test_case::test_case;

#[test_case("EL", 1, &[5397] ; "empty loop")]
#[test_case("Assert", 1, &[2657] ; "assert true")]
#[test_case("TTS", 1, &[26] ; "transfer to self")]
#[test_case("ABrSt", 1, &[1326] ; "borrow string")]
#[test_case("ACpStSv", 1, &[1223] ; "copy string and save")]
#[test_case("CEC", 1, &[1144] ; "call empty contract function")]
#[test_case("CEES", 1, &[960] ; "emit event with string")]
#[test_case("STLD", 2, &[1, 1] ; "scheduled transaction with large data")]
#[test_case("KGet", 1, &[177] ; "get account key")]
#[test_case("GetCon", 1, &[65] ; "get contracts")]
#[test_case("STL", 1, &[5221] ; "string to lower")]
#[test_case("ACpDStSv", 1, &[1179] ; "copy dict string and save")]
#[test_case("DestDict", 1, &[967] ; "destroy dict")]
#[test_case("DictItrCpy", 1, &[667] ; "dict iterate and copy")]
#[test_case("ArrCB", 1, &[226] ; "array create batch")]
#[test_case("CMNFT", 1, &[157] ; "mint nft")]
fn default_catalog_template(label: &str, cardinality: usize, initial: &[u64]) {
    let registry = Registry::with_default_catalog().unwrap();
    let template = registry.get(label).unwrap();

    assert_eq!(template.label().as_str(), label);
    assert_eq!(template.cardinality(), cardinality);
    assert_eq!(template.initial_parameters(), Parameters::from(initial.to_vec()));
}

#[test_case(vec![DnaElement::new("EL", [10])] => true ; "single valid element")]
#[test_case(vec![DnaElement::new("EL", [10]), DnaElement::new("EL", [3])] => true ; "repeated label")]
#[test_case(vec![DnaElement::new("STLD", [1])] => false ; "too few parameters")]
#[test_case(vec![DnaElement::new("EL", [1, 2])] => false ; "too many parameters")]
#[test_case(vec![DnaElement::new("NOPE", [1])] => false ; "unknown label")]
#[test_case(Vec::new() => true ; "empty dna")]
fn validate_dna(elements: Vec<DnaElement>) -> bool {
    let registry = Registry::with_default_catalog().unwrap();
    registry.validate_dna(&Dna::new(elements)).is_ok()
}

#[test]
fn default_catalog_size() {
    let registry = Registry::with_default_catalog().unwrap();
    assert_eq!(registry.len(), 60);
    assert!(registry.get("VerSig").is_err());
}

#[test]
fn default_catalog_rejects_duplicate_registration() {
    let mut registry = Registry::with_default_catalog().unwrap();
    let before = registry.len();

    let duplicate: SimpleTemplate = SimpleTemplate::new("another empty loop", "EL", 1);
    let err = registry.register(Arc::new(duplicate)).unwrap_err();

    assert!(matches!(err, WorkloadError::TemplateAlreadyRegistered { .. }));
    assert_eq!(registry.len(), before);
    assert_eq!(registry.get("EL").unwrap().name(), "empty loop");
}

#[test]
fn unregistered_labels_fail_validation() {
    let mut registry = Registry::with_default_catalog().unwrap();
    registry.unregister(["CEC", "CEE"]);

    let dna = Dna::new(vec![DnaElement::new("EL", [1]), DnaElement::new("CEE", [1])]);
    let err = registry.validate_dna(&dna).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.label().map(|label| label.as_str()), Some("CEE"));
}

#[test]
fn config_loads_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("initial_parameters.json");
    std::fs::write(
        &path,
        r#"{"templates": {"EL": {"parameters": [100]}, "STLD": {"parameters": [4, 8]}}}"#,
    )
    .unwrap();

    let config = BuilderConfig {
        initial_parameters_path: Some(path),
        ..BuilderConfig::default()
    };
    let registry = Registry::from_config(&config).unwrap();

    assert_eq!(registry.get("EL").unwrap().initial_parameters(), Parameters::from([100]));
    assert_eq!(registry.get("STLD").unwrap().initial_parameters(), Parameters::from([4, 8]));
    assert_eq!(registry.get("CS").unwrap().initial_parameters(), Parameters::from([2092]));
}

#[test]
fn snapshot_round_trips_through_file() {
    let registry = Registry::with_default_catalog().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let snapshot = registry.initial_parameters_snapshot();
    save_initial_parameters_to_file(&path, &snapshot).unwrap();

    let mut reloaded = Registry::with_default_catalog().unwrap();
    let applied = reloaded.load_initial_parameters_from_file(&path).unwrap();

    assert_eq!(applied, registry.len());
    assert_eq!(reloaded.initial_parameters_snapshot(), snapshot);
}

#[test]
fn malformed_override_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"templates": {"EL": {"parameters": "many"}}}"#).unwrap();

    let mut registry = Registry::with_default_catalog().unwrap();
    let err = registry.load_initial_parameters_from_file(&path).unwrap_err();
    assert!(matches!(err, WorkloadError::Serialization(_)));
}
