use proptest::prelude::*;
use shipyard_core::{
    load, load_str, to_pretty_json, Document, DocumentError, EmitOptions, Number,
};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

const FLEET_YAML: &str = r#"
# spaceship registry
ships:
  - name: Enterprise
    registry: NCC-1701-D
    crew: 1014
    warp: 9.6
    systems: [bridge, sickbay, engineering]
  - name: Defiant
    registry: NX-74205
    crew: 50
    cloaked: false
fleet: starfleet
"#;

#[test]
fn test_load_file_and_emit() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", FLEET_YAML).unwrap();

    let doc = load(tmp.path()).expect("fleet file should load");
    let json = to_pretty_json(&doc, &EmitOptions::default()).unwrap();

    assert!(json.starts_with("{\n    \"fleet\": \"starfleet\",\n    \"ships\": ["));
    assert!(json.contains("\"registry\": \"NCC-1701-D\""));
    assert!(json.contains("\"warp\": 9.6"));
    assert!(json.contains("\"cloaked\": false"));
    // crew < name < registry < systems < warp
    let crew = json.find("\"crew\": 1014").unwrap();
    let warp = json.find("\"warp\"").unwrap();
    assert!(crew < warp);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spaceship2.zaml");

    let err = load(&path).unwrap_err();
    match err {
        DocumentError::Io { path: p, source } => {
            assert_eq!(p, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_invalid_file_is_parse_error() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "ships:\n  - name: [Enterprise\n").unwrap();

    let err = load(tmp.path()).unwrap_err();
    assert!(matches!(err, DocumentError::Parse { .. }), "got: {:?}", err);
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_emit_is_deterministic_for_file() {
    let options = EmitOptions::default();
    let first = to_pretty_json(&load_str(FLEET_YAML).unwrap(), &options).unwrap();
    let again = to_pretty_json(&load_str(FLEET_YAML).unwrap(), &options).unwrap();
    assert_eq!(first, again);
}

#[test]
fn test_emitted_astral_text_loads_back() {
    let doc = Document::Sequence(vec![Document::from("🚀 launch")]);
    let json = to_pretty_json(&doc, &EmitOptions::default()).unwrap();
    assert_eq!(json, "[\n    \"\\ud83d\\ude80 launch\"\n]");
    assert_eq!(load_str(&json).unwrap(), doc);
}

fn assert_sorted(value: &serde_yaml::Value) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            let keys: Vec<&str> = map.keys().map(|k| k.as_str().unwrap()).collect();
            for pair in keys.windows(2) {
                assert!(pair[0] < pair[1], "keys out of order: {:?}", keys);
            }
            map.values().for_each(assert_sorted);
        }
        serde_yaml::Value::Sequence(items) => items.iter().for_each(assert_sorted),
        _ => {}
    }
}

fn document_strategy() -> impl Strategy<Value = Document> {
    let leaf = prop_oneof![
        Just(Document::Null),
        any::<bool>().prop_map(Document::Bool),
        any::<i64>().prop_map(Document::from),
        ((i64::MAX as u64 + 1)..=u64::MAX).prop_map(|u| Document::Number(Number::UInt(u))),
        any::<f64>()
            .prop_filter("JSON has no inf or NaN", |f| f.is_finite())
            .prop_map(Document::from),
        "[a-zA-Z0-9 _:#-]{0,12}".prop_map(Document::String),
        "[a-zé漢🚀𝄞]{0,6}".prop_map(Document::String),
    ];

    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Document::Sequence),
            prop::collection::btree_map("[a-z🚀]{1,6}", inner, 0..6)
                .prop_map(|m: BTreeMap<String, Document>| Document::Mapping(m)),
        ]
    })
}

proptest! {
    #[test]
    fn prop_emit_then_load_reproduces_document(doc in document_strategy()) {
        let json = to_pretty_json(&doc, &EmitOptions::default()).unwrap();
        prop_assert_eq!(load_str(&json).unwrap(), doc);
    }

    #[test]
    fn prop_unicode_emit_then_load_reproduces_document(doc in document_strategy()) {
        let options = EmitOptions::default().with_ensure_ascii(false);
        let json = to_pretty_json(&doc, &options).unwrap();
        prop_assert_eq!(load_str(&json).unwrap(), doc);
    }

    #[test]
    fn prop_yaml_source_converts_to_same_json(doc in document_strategy()) {
        let yaml = serde_yaml::to_string(&doc).unwrap();
        let json = to_pretty_json(&load_str(&yaml).unwrap(), &EmitOptions::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, serde_json::to_value(&doc).unwrap());
    }

    #[test]
    fn prop_keys_ascending_at_every_level(doc in document_strategy()) {
        let json = to_pretty_json(&doc, &EmitOptions::default()).unwrap();
        // serde_yaml::Value keeps mapping keys in document order
        let reparsed: serde_yaml::Value = serde_json::from_str(&json).unwrap();
        assert_sorted(&reparsed);
    }

    #[test]
    fn prop_emit_is_byte_identical(doc in document_strategy()) {
        let options = EmitOptions::default();
        let first = to_pretty_json(&doc, &options).unwrap();
        let second = to_pretty_json(&doc.clone(), &options).unwrap();
        prop_assert_eq!(first, second);
    }
}
