use pipeline_core::{
    EntityKind, PipelineError, PipelineService, Record, TaskStatus, ValidationError,
};

fn seeded() -> PipelineService {
    let mut service = PipelineService::new();
    service
        .add_concern("Cost", 70)
        .expect("seed concern should be added");
    service
        .add_question("Buy or build?", "Cost", 60)
        .expect("seed question should be added");
    service
}

#[test]
fn added_records_are_retrievable_with_fields() {
    let mut service = seeded();
    let decision = service
        .add_decision("Build", "Cheaper long term", ["Buy or build?"], 80)
        .expect("decision should be added");
    service.add_goal("Ship v1", "Build", 50).expect("goal should be added");
    let task = service
        .add_task("Write spec", "Ana", "Ship v1", 40)
        .expect("task should be added");

    assert_eq!(decision.related_questions, vec!["Buy or build?"]);
    assert_eq!(task.status, TaskStatus::NotStarted);
    assert!(task.created_at > 0);

    match service.entity(EntityKind::Decision, "Build") {
        Some(Record::Decision(stored)) => {
            assert_eq!(stored.rationale, "Cheaper long term");
            assert_eq!(stored.urgency.get(), 80);
        }
        other => panic!("unexpected record: {other:?}"),
    }
    assert_eq!(service.store().len(EntityKind::Task), 1);
}

#[test]
fn blank_key_is_rejected() {
    let mut service = PipelineService::new();
    let err = service.add_concern("   ", 50).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Validation(ValidationError::BlankField {
            kind: EntityKind::Concern,
            field: "concern",
        })
    );
    assert!(service.store().is_empty());
}

#[test]
fn urgency_outside_range_is_rejected_not_clamped() {
    let mut service = PipelineService::new();
    for urgency in [0, 101, -5] {
        let err = service.add_concern("Risk", urgency).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::UrgencyOutOfRange { value, .. }) if value == urgency
        ));
    }
    service.add_concern("Low", 1).expect("concern should be added");
    service.add_concern("High", 100).expect("concern should be added");
    assert_eq!(service.store().len(EntityKind::Concern), 2);
}

#[test]
fn duplicate_key_is_a_conflict() {
    let mut service = seeded();
    let err = service.add_concern("Cost", 10).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Conflict {
            kind: EntityKind::Concern,
            key: "Cost".to_string(),
        }
    );
    assert_eq!(err.code(), "conflict");
}

#[test]
fn missing_parent_on_add_is_a_validation_error() {
    let mut service = seeded();
    let err = service
        .add_question("Why?", "Ghost", 50)
        .expect_err("unknown concern should be rejected");
    assert_eq!(
        err,
        PipelineError::Validation(ValidationError::UnknownParent {
            kind: EntityKind::Concern,
            key: "Ghost".to_string(),
        })
    );
    assert_eq!(err.code(), "validation");

    let err = service
        .add_decision("D", "R", ["Buy or build?", "Missing"], 50)
        .expect_err("unknown question should be rejected");
    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::UnknownParent {
            kind: EntityKind::Question,
            ..
        })
    ));
    assert!(matches!(
        service.add_goal("G", "Nope", 50),
        Err(PipelineError::Validation(ValidationError::UnknownParent { .. }))
    ));
    assert_eq!(service.store().len(EntityKind::Decision), 0);
    assert_eq!(service.store().len(EntityKind::Question), 1);
}

#[test]
fn decision_question_list_must_be_non_empty_and_distinct() {
    let mut service = seeded();
    let empty: [&str; 0] = [];
    let err = service.add_decision("D", "R", empty, 50).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::MissingParent { .. })
    ));

    let err = service
        .add_decision("D", "R", ["Buy or build?", "Buy or build?"], 50)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::DuplicateParent { .. })
    ));
}

#[test]
fn required_secondary_fields_are_checked() {
    let mut service = seeded();
    let err = service
        .add_decision("D", " ", ["Buy or build?"], 50)
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::Validation(ValidationError::BlankField {
            kind: EntityKind::Decision,
            field: "rationale",
        })
    );

    service
        .add_decision("D", "R", ["Buy or build?"], 50)
        .expect("decision should be added");
    service.add_goal("G", "D", 50).expect("goal should be added");
    let err = service.add_task("T", "", "G", 50).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Validation(ValidationError::BlankField {
            kind: EntityKind::Task,
            field: "assignee",
        })
    );
}

#[test]
fn todo_categories_are_normalized() {
    let mut service = PipelineService::new();
    let todo = service
        .add_todo("Call bank", "", [" home ", "", "work", "home"], 30)
        .expect("todo should be added");
    assert_eq!(todo.categories, vec!["home", "work"]);
    assert_eq!(todo.details, "");

    let err = service
        .add_todo("Other", "", Vec::<String>::new(), 0)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::UrgencyOutOfRange { field: "importance", .. })
    ));
}

#[test]
fn records_serialize_with_kind_tag_and_status_label() {
    let mut service = seeded();
    service
        .add_decision("D", "R", ["Buy or build?"], 50)
        .expect("decision should be added");
    service.add_goal("G", "D", 50).expect("goal should be added");
    service.add_task("T", "Ana", "G", 50).expect("task should be added");

    let record = service.entity(EntityKind::Task, "T").unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["kind"], "task");
    assert_eq!(value["status"], "Not Started");
    assert_eq!(value["urgency"], 50);
}
