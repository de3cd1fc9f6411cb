use serde_json::json;
use survey_tools::derive::derive_relationships;
use survey_tools::model::{ClassRecord, RecordMap};
use survey_tools::report;
use survey_tools::validate::{Issue, ValidationReport, validate};

fn records(value: serde_json::Value) -> RecordMap<ClassRecord> {
    serde_json::from_value(value).expect("records parsed")
}

#[test]
fn created_by_is_sorted_unique_and_sound() {
    let input = records(json!({
        "Zed": {"creates": ["Target", "Target"]},
        "Alpha": {"creates": ["Target"]},
        "Mid": {"creates": ["Target", "Alpha"]},
        "Target": {}
    }));

    let derivation = derive_relationships(&input);

    assert_eq!(derivation.records["Target"].created_by, ["Alpha", "Mid", "Zed"]);
    assert_eq!(derivation.records["Alpha"].created_by, ["Mid"]);
    for (name, record) in &derivation.records {
        for creator in &record.created_by {
            assert!(input[creator].creates().contains(name));
        }
    }
}

#[test]
fn derivation_leaves_input_untouched() {
    let input = records(json!({"A": {"creates": ["B"]}, "B": {}}));
    let before = input.clone();

    let _ = derive_relationships(&input);

    assert_eq!(input, before);
}

#[test]
fn self_edges_do_not_count_towards_fans() {
    let input = records(json!({
        "Loop": {"creates": ["Loop"], "references": ["Loop", "Other"]},
        "Other": {}
    }));

    let derivation = derive_relationships(&input);
    let looped = &derivation.records["Loop"];

    assert_eq!(looped.created_by, ["Loop"]);
    assert_eq!(looped.fan_out, 1.0);
    assert_eq!(looped.fan_in, 0.0);
    assert_eq!(derivation.records["Other"].fan_in, 1.0);
    assert_eq!(derivation.normalization.max_fan_out, 1);
}

#[test]
fn fans_are_normalised_against_the_maximum() {
    let input = records(json!({
        "Hub": {"creates": ["A", "B"], "references": ["C"]},
        "A": {"references": ["B"]},
        "B": {"references": ["Hub", "Unknown"]},
        "C": {}
    }));

    let derivation = derive_relationships(&input);
    let fan_out = |name: &str| derivation.records[name].fan_out;
    let fan_in = |name: &str| derivation.records[name].fan_in;

    assert_eq!(derivation.normalization.max_fan_out, 3);
    assert_eq!(derivation.normalization.max_fan_in, 2);
    assert_eq!(fan_out("Hub"), 1.0);
    assert_eq!(fan_out("A"), 0.33);
    assert_eq!(fan_out("B"), 0.33);
    assert_eq!(fan_out("C"), 0.0);
    assert_eq!(fan_in("B"), 1.0);
    assert_eq!(fan_in("Hub"), 0.5);
    assert_eq!(fan_in("C"), 0.5);
    for record in derivation.records.values() {
        assert!((0.0..=1.0).contains(&record.fan_out));
        assert!((0.0..=1.0).contains(&record.fan_in));
    }
}

#[test]
fn unconnected_survey_scores_zero() {
    let input = records(json!({"A": {}, "B": {"references": ["Missing"]}}));

    let derivation = derive_relationships(&input);

    assert_eq!(derivation.normalization.max_fan_out, 1);
    assert_eq!(derivation.normalization.max_fan_in, 1);
    assert!(derivation
        .records
        .values()
        .all(|record| record.fan_out == 0.0 && record.fan_in == 0.0));
}

#[test]
fn stale_derived_fields_are_replaced() {
    let input = records(json!({
        "A": {"creates": ["B"], "fanOut": 0.2, "kind": "factory"},
        "B": {"createdBy": ["Nobody"]}
    }));

    let derivation = derive_relationships(&input);
    let b = serde_json::to_value(&derivation.records["B"]).expect("serialised");
    let a = serde_json::to_value(&derivation.records["A"]).expect("serialised");

    assert_eq!(b["createdBy"], json!(["A"]));
    assert_eq!(a["fanOut"], json!(1.0));
    assert_eq!(a["kind"], json!("factory"));
}

#[test]
fn missing_reciprocal_see_also_is_reported_once() {
    let input = records(json!({
        "A": {"seeAlso": [{"class": "B"}]},
        "B": {"seeAlso": []}
    }));

    let report = validate(&input);

    assert_eq!(
        report.see_also,
        [Issue::NonReciprocal {
            source: "A".to_string(),
            target: "B".to_string(),
        }]
    );
    assert_eq!(report.see_also[0].to_string(), "A -> B: not reciprocal");
    assert!(report.creates.is_empty());
}

#[test]
fn reciprocal_see_also_is_clean() {
    let input = records(json!({
        "A": {"seeAlso": [{"class": "B", "reason": "sibling"}]},
        "B": {"seeAlso": [{"class": "A"}]}
    }));

    assert!(validate(&input).is_empty());
}

#[test]
fn unknown_see_also_target_is_reported() {
    let input = records(json!({"A": {"seeAlso": [{"class": "Nowhere"}, {"note": "no class"}]}}));

    let report = validate(&input);

    assert_eq!(report.see_also.len(), 2);
    assert_eq!(
        report.see_also[0].to_string(),
        "A -> Nowhere: target class not found"
    );
    assert_eq!(report.see_also[1].to_string(), "A -> : target class not found");
}

#[test]
fn ghost_creation_target_is_reported_and_not_inverted() {
    let input = records(json!({"A": {"creates": ["Ghost"]}, "B": {}}));

    let report = validate(&input);
    let derivation = derive_relationships(&input);

    assert_eq!(
        report.creates,
        [Issue::UnknownCreationTarget {
            source: "A".to_string(),
            target: "Ghost".to_string(),
        }]
    );
    assert_eq!(report.creates[0].to_string(), "A creates Ghost: not a known class");
    assert!(!derivation.records.contains_key("Ghost"));
    assert!(derivation
        .records
        .values()
        .all(|record| !record.created_by.iter().any(|name| name == "Ghost")));
}

#[test]
fn issue_listing_is_capped_but_counted() {
    let issues: Vec<Issue> = (0..35)
        .map(|index| Issue::UnknownCreationTarget {
            source: "A".to_string(),
            target: format!("Ghost{index:02}"),
        })
        .collect();
    let report = ValidationReport {
        see_also: Vec::new(),
        creates: issues,
    };

    let mut console = Vec::new();
    report::write_issues(&mut console, &report).expect("issues written");
    let console = String::from_utf8(console).expect("utf-8 console output");

    assert!(console.starts_with("\ncreates reference issues (35):\n"));
    assert!(console.contains("  A creates Ghost29: not a known class\n"));
    assert!(!console.contains("Ghost30"));
    assert!(console.ends_with("  ... and 5 more\n"));
    assert!(!console.contains("seeAlso reciprocity issues"));
}
