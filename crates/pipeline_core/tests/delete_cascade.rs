use pipeline_core::{EntityKind, PipelineService};

fn pipeline() -> PipelineService {
    let mut service = PipelineService::new();
    service.add_concern("C1", 50).expect("concern should be added");
    service.add_concern("C2", 50).expect("concern should be added");
    service.add_question("Q1", "C1", 50).expect("question should be added");
    service.add_question("Q2", "C2", 50).expect("question should be added");
    service.add_decision("D1", "R1", ["Q1", "Q2"], 50).expect("decision should be added");
    service.add_decision("D2", "R2", ["Q2"], 50).expect("decision should be added");
    service.add_goal("G1", "D1", 50).expect("goal should be added");
    service.add_goal("G2", "D2", 50).expect("goal should be added");
    service.add_task("T1", "Ana", "G1", 50).expect("task should be added");
    service.add_task("T2", "Ben", "G2", 50).expect("task should be added");
    service
        .add_todo("Standalone", "", ["home"], 50)
        .expect("todo should be added");
    service
}

#[test]
fn deleting_a_concern_removes_its_whole_subtree() {
    let mut service = pipeline();
    assert!(service.delete_entity(EntityKind::Concern, "C1"));

    let store = service.store();
    assert!(store.concern("C1").is_none());
    assert!(store.question("Q1").is_none());
    // D1 cites Q1, so it goes in full along with its goal and task.
    assert!(store.decision("D1").is_none());
    assert!(store.goal("G1").is_none());
    assert!(store.task("T1").is_none());

    assert!(store.concern("C2").is_some());
    assert!(store.question("Q2").is_some());
    assert!(store.decision("D2").is_some());
    assert!(store.task("T2").is_some());
    assert_eq!(store.len(EntityKind::Todo), 1);

    assert_eq!(
        service.relations().children(EntityKind::Question, "Q2"),
        ["D2".to_string()]
    );
}

#[test]
fn membership_in_a_deleted_question_deletes_the_decision() {
    let mut service = pipeline();
    assert!(service.delete_entity(EntityKind::Question, "Q2"));

    let store = service.store();
    assert!(store.decision("D1").is_none());
    assert!(store.decision("D2").is_none());
    assert!(store.goal("G1").is_none());
    assert!(store.goal("G2").is_none());
    assert_eq!(store.len(EntityKind::Task), 0);
    assert!(store.question("Q1").is_some());
    assert!(service
        .relations()
        .children(EntityKind::Question, "Q1")
        .is_empty());
}

#[test]
fn shared_descendants_are_deleted_once() {
    let mut service = PipelineService::new();
    service.add_concern("C", 50).expect("concern should be added");
    service.add_question("Q1", "C", 50).expect("question should be added");
    service.add_question("Q2", "C", 50).expect("question should be added");
    service.add_decision("D", "R", ["Q1", "Q2"], 50).expect("decision should be added");
    service.add_goal("G", "D", 50).expect("goal should be added");

    assert!(service.delete_entity(EntityKind::Concern, "C"));
    assert!(service.store().is_empty());
}

#[test]
fn delete_is_idempotent() {
    let mut service = pipeline();
    assert!(service.delete_entity(EntityKind::Goal, "G1"));
    let after_first = service.store().clone();

    assert!(!service.delete_entity(EntityKind::Goal, "G1"));
    assert_eq!(service.store(), &after_first);
    assert!(service.store().task("T1").is_none());
    assert!(service.store().decision("D1").is_some());
}

#[test]
fn deleting_a_todo_does_not_cascade() {
    let mut service = pipeline();
    let lineage_before = service.store().len(EntityKind::Task);
    assert!(service.delete_entity(EntityKind::Todo, "Standalone"));
    assert_eq!(service.store().len(EntityKind::Todo), 0);
    assert_eq!(service.store().len(EntityKind::Task), lineage_before);
}

#[test]
fn deleted_keys_can_be_reused() {
    let mut service = pipeline();
    assert!(service.delete_entity(EntityKind::Decision, "D2"));
    service.add_decision("D2", "again", ["Q1"], 10).expect("decision should be added");
    assert_eq!(
        service.relations().children(EntityKind::Question, "Q1"),
        ["D1".to_string(), "D2".to_string()]
    );
    assert!(service
        .relations()
        .children(EntityKind::Decision, "D2")
        .is_empty());
}
