use kgeval::graph::{GraphStore, IdSequence, Label, PropertyMap, PropertyValue, RelationType, SerializedGraph};
use kgeval::pattern::catalog::{ALBUTEROL_ID, RHEUMATOID_ARTHRITIS_ID};
use kgeval::pattern::{default_catalog, Anchor, GroundTruthSet, PatternError, PatternQueryEngine};

const MEDICAL_GRAPH: &str = include_str!("fixtures/medical_graph.json");

fn medical_store() -> GraphStore {
    GraphStore::from_json_str(MEDICAL_GRAPH).unwrap()
}

fn codes(items: &[&str]) -> GroundTruthSet {
    items.iter().map(|s| s.to_string()).collect()
}

fn patient(graph: &mut SerializedGraph, ids: &mut IdSequence, code: &str) -> String {
    let id = ids.next_id();
    let mut props = PropertyMap::new();
    props.insert("patient_id".to_string(), PropertyValue::from(code));
    graph.add_node(id.clone(), Label::Patient, props);
    id
}

fn named(graph: &mut SerializedGraph, ids: &mut IdSequence, label: Label, name: &str) -> String {
    let id = ids.next_id();
    let mut props = PropertyMap::new();
    props.insert("name".to_string(), PropertyValue::from(name));
    graph.add_node(id.clone(), label, props);
    id
}

#[test]
fn test_single_conflict_contraindication() {
    let mut ids = IdSequence::new("n-", 1);
    let mut edges = IdSequence::new("e-", 1);
    let mut graph = SerializedGraph::new();

    let p1 = patient(&mut graph, &mut ids, "PT-10001");
    let m1 = named(&mut graph, &mut ids, Label::Medication, "Propranolol");
    let c1 = named(&mut graph, &mut ids, Label::Condition, "Bronchial Asthma");
    graph
        .add_edge(edges.next_id(), p1.clone(), m1.clone(), RelationType::PrescribedMedication)
        .add_edge(edges.next_id(), m1, c1.clone(), RelationType::ContraindicatedFor)
        .add_edge(edges.next_id(), p1, c1, RelationType::HasCondition);

    let store = GraphStore::load(&graph).unwrap();
    let engine = PatternQueryEngine::new(&store);
    assert_eq!(engine.contraindicated_patients(), codes(&["PT-10001"]));
}

#[test]
fn test_patient_zero_excludes_anchor() {
    let mut ids = IdSequence::new("n-", 1);
    let mut edges = IdSequence::new("e-", 1);
    let mut graph = SerializedGraph::new();

    let p1 = patient(&mut graph, &mut ids, "PT-10001");
    let p2 = patient(&mut graph, &mut ids, "PT-10002");
    let d1 = named(&mut graph, &mut ids, Label::Doctor, "Dr. Patel");
    graph
        .add_edge(edges.next_id(), p1, d1.clone(), RelationType::TreatedBy)
        .add_edge(edges.next_id(), p2, d1, RelationType::TreatedBy);

    let store = GraphStore::load(&graph).unwrap();
    let engine = PatternQueryEngine::new(&store);
    assert_eq!(
        engine.shared_provider_peers("PT-10001").unwrap(),
        codes(&["PT-10002"])
    );
}

#[test]
fn test_medical_catalog_ground_truth() {
    let store = medical_store();
    let outcome = PatternQueryEngine::new(&store).run_catalog(&default_catalog());

    assert!(outcome.is_complete(), "failures: {:?}", outcome.failures);
    let expected = [
        ("Patient Zero", codes(&["PT-10002", "PT-10003"])),
        ("Contraindications", codes(&["PT-10001", "PT-10006"])),
        ("Smokers with Asthma", codes(&["PT-10002", "PT-10003"])),
        ("Intersection", codes(&["PT-10003", "PT-10004"])),
        ("Root Cause Analysis", codes(&["PT-10005"])),
        ("Indirect Contraindication Risk", codes(&["PT-10002", "PT-10006"])),
        (
            "Shared Doctor Risk",
            codes(&["PT-10001", "PT-10002", "PT-10003", "PT-10004"]),
        ),
    ];
    for (scenario, truth) in expected {
        assert_eq!(outcome.truth(scenario), Some(&truth), "scenario {}", scenario);
    }

    // Catalog order is preserved
    let order: Vec<&str> = outcome.truths.keys().map(String::as_str).collect();
    assert_eq!(order[0], "Patient Zero");
    assert_eq!(order[6], "Shared Doctor Risk");
}

#[test]
fn test_contraindications_idempotent() {
    let store = medical_store();
    let engine = PatternQueryEngine::new(&store);
    let first = engine.contraindicated_patients();
    for _ in 0..5 {
        assert_eq!(engine.contraindicated_patients(), first);
    }
}

#[test]
fn test_current_smoker_matches_both_pack_variants() {
    let store = medical_store();
    let engine = PatternQueryEngine::new(&store);
    let asthma = Anchor::name("Bronchial Asthma");

    let current = engine
        .status_with_condition(&asthma, "smoking_status", "Current Smoker")
        .unwrap();
    assert_eq!(current, codes(&["PT-10002", "PT-10003"]));

    let heavy = engine
        .status_with_condition(&asthma, "smoking_status", "( > 1 pack/day)")
        .unwrap();
    assert_eq!(heavy, codes(&["PT-10003"]));

    // "Smoker" is a substring of every status, including former and never
    let any = engine
        .status_with_condition(&asthma, "smoking_status", "Smoker")
        .unwrap();
    assert_eq!(any, codes(&["PT-10001", "PT-10002", "PT-10003"]));
}

#[test]
fn test_id_and_name_anchors_agree() {
    let store = medical_store();
    let engine = PatternQueryEngine::new(&store);

    let by_id = engine
        .condition_and_medication(&Anchor::id(RHEUMATOID_ARTHRITIS_ID), &Anchor::id(ALBUTEROL_ID))
        .unwrap();
    let by_name = engine
        .condition_and_medication(
            &Anchor::name("Rheumatoid Arthritis"),
            &Anchor::name("Albuterol"),
        )
        .unwrap();
    assert_eq!(by_id, by_name);
}

#[test]
fn test_unknown_anchors() {
    let store = medical_store();
    let engine = PatternQueryEngine::new(&store);

    let err = engine.shared_provider_peers("PT-99999").unwrap_err();
    assert!(matches!(&err, PatternError::Graph(e) if e.is_unknown_identifier()));

    let err = engine.indirect_risk(&Anchor::id("cond-missing")).unwrap_err();
    assert!(matches!(&err, PatternError::Graph(e) if e.is_unknown_identifier()));

    let err = engine.indirect_risk(&Anchor::name("Gout")).unwrap_err();
    assert!(matches!(err, PatternError::AnchorNotFound { label: Label::Condition, .. }));
}

#[test]
fn test_missing_anchor_fails_only_its_scenario() {
    let mut graph = SerializedGraph::from_json_str(MEDICAL_GRAPH).unwrap();
    graph.nodes.retain(|n| n.id.as_deref() != Some("cond-chf"));
    graph.edges.retain(|e| {
        e.source_node_id.as_deref() != Some("cond-chf") && e.target_node_id.as_deref() != Some("cond-chf")
    });

    let store = GraphStore::load(&graph).unwrap();
    let outcome = PatternQueryEngine::new(&store).run_catalog(&default_catalog());

    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures.contains_key("Indirect Contraindication Risk"));
    assert_eq!(outcome.truths.len(), 6);
    // The removed conflict no longer flags PT-10006
    assert_eq!(outcome.truth("Contraindications"), Some(&codes(&["PT-10001"])));
}

#[test]
fn test_shared_provider_risk_contains_patients_without_condition() {
    let store = medical_store();
    let engine = PatternQueryEngine::new(&store);
    let truth = engine
        .shared_provider_risk(&Anchor::id(RHEUMATOID_ARTHRITIS_ID))
        .unwrap();

    // PT-10001 and PT-10002 only share doctor doc-1 with an RA patient
    assert!(truth.contains("PT-10001"));
    assert!(truth.contains("PT-10002"));
    assert!(!truth.contains("PT-10005"));
}
