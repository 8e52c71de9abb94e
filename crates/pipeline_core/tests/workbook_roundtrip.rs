use pipeline_core::db::migrations::{apply_migrations_to, latest_version};
use pipeline_core::db::{open_workbook, open_workbook_read_only, DbError};
use pipeline_core::{
    export_workbook, import_workbook, load_workbook, EntityKind, PipelineError, PipelineService,
    TabularError, TaskStatus, TaskUpdate,
};
use rusqlite::Connection;

fn pipeline() -> PipelineService {
    let mut service = PipelineService::new();
    service.add_concern("Cost", 70).expect("concern should be added");
    service.add_concern("Risk", 40).expect("concern should be added");
    service.add_question("Q-b", "Cost", 60).expect("question should be added");
    service.add_question("Q-a", "Risk", 30).expect("question should be added");
    service
        .add_decision("Build", "Control, \"mostly\"", ["Q-b", "Q-a"], 80)
        .expect("decision should be added");
    service.add_goal("Ship", "Build", 50).expect("goal should be added");
    service.add_task("Prototype", "Ana", "Ship", 45).expect("task should be added");
    service
        .update_task(
            "Prototype",
            TaskUpdate {
                status: Some(TaskStatus::InProgress),
                ..TaskUpdate::default()
            },
        )
        .unwrap();
    service
        .add_todo("Call bank", "before Friday", ["work", "home"], 90)
        .expect("todo should be added");
    service
}

#[test]
fn export_then_import_restores_an_equal_store() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("pipeline.db");
    let service = pipeline();

    export_workbook(service.store(), &path).expect("workbook should export");
    let imported = import_workbook(&path).expect("workbook should import");

    assert_eq!(&imported, service.store());
    assert_eq!(
        imported.decision("Build").unwrap().related_questions,
        vec!["Q-b", "Q-a"]
    );
    assert_eq!(imported.todo("Call bank").unwrap().categories, vec!["work", "home"]);
    assert_eq!(imported.task("Prototype").unwrap().status, TaskStatus::InProgress);
}

#[test]
fn re_export_replaces_previous_rows() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("pipeline.db");
    let mut service = pipeline();

    export_workbook(service.store(), &path).expect("workbook should export");
    service.delete_entity(EntityKind::Concern, "Cost");
    export_workbook(service.store(), &path).expect("workbook should export");

    let imported = import_workbook(&path).expect("workbook should import");
    assert_eq!(&imported, service.store());
    assert_eq!(imported.len(EntityKind::Decision), 0);
}

#[test]
fn list_fields_are_stored_as_json_text() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("pipeline.db");
    export_workbook(pipeline().store(), &path).expect("workbook should export");

    let conn = Connection::open(&path).expect("sqlite file should open");
    let questions: String = conn
        .query_row("SELECT related_questions FROM Decisions;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(questions, r#"["Q-b","Q-a"]"#);
    let status: String = conn
        .query_row("SELECT status FROM Tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(status, "In Progress");
}

#[test]
fn legacy_workbook_without_todos_imports_with_no_todos() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("legacy.db");
    {
        let mut conn = Connection::open(&path).expect("sqlite file should open");
        apply_migrations_to(&mut conn, 1).unwrap();
        conn.execute_batch(
            "INSERT INTO Concerns (concern, urgency, date_added) VALUES ('Cost', 50, 1);
             INSERT INTO Questions (question, related_concern, urgency, date_added)
                 VALUES ('Why?', 'Cost', 50, 2);",
        )
        .unwrap();
    }

    let store = import_workbook(&path).expect("workbook should import");
    assert_eq!(store.len(EntityKind::Concern), 1);
    assert_eq!(store.len(EntityKind::Question), 1);
    assert_eq!(store.len(EntityKind::Todo), 0);
}

#[test]
fn missing_lineage_sheet_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("broken.db");
    {
        let conn = Connection::open(&path).expect("sqlite file should open");
        conn.execute_batch(
            "CREATE TABLE Concerns (concern TEXT, urgency INTEGER, date_added INTEGER);",
        )
        .unwrap();
    }

    let err = import_workbook(&path).unwrap_err();
    assert!(matches!(err, TabularError::MissingSheet("Questions")));
}

#[test]
fn invalid_rows_are_rejected_with_position() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("invalid.db");
    {
        let conn = open_workbook(&path).expect("workbook should open");
        conn.execute_batch(
            "INSERT INTO Concerns (concern, urgency, date_added) VALUES ('A', 50, 1);
             INSERT INTO Concerns (concern, urgency, date_added) VALUES ('B', 150, 1);",
        )
        .unwrap();
    }

    match import_workbook(&path).unwrap_err() {
        TabularError::InvalidData { sheet, row, message } => {
            assert_eq!(sheet, "Concerns");
            assert_eq!(row, 2);
            assert!(message.contains("150"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("dupes.db");
    {
        let conn = open_workbook(&path).expect("workbook should open");
        conn.execute_batch(
            "INSERT INTO Todos (title, details, categories, importance, date_added)
                 VALUES ('Same', '', '[]', 10, 1);
             INSERT INTO Todos (title, details, categories, importance, date_added)
                 VALUES ('Same', '', '[]', 20, 2);",
        )
        .unwrap();
    }

    assert!(matches!(
        import_workbook(&path).unwrap_err(),
        TabularError::InvalidData { sheet: "Todos", row: 2, .. }
    ));
}

#[test]
fn dangling_reference_import_leaves_store_intact() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("dangling.db");
    {
        let conn = open_workbook(&path).expect("workbook should open");
        conn.execute_batch(
            "INSERT INTO Questions (question, related_concern, urgency, date_added)
                 VALUES ('Orphan', 'Ghost', 50, 1);",
        )
        .unwrap();
    }

    let mut service = pipeline();
    let before = service.store().clone();
    let err = load_workbook(&mut service, &path).unwrap_err();
    assert!(matches!(
        err,
        TabularError::Integrity(PipelineError::NotFound {
            kind: EntityKind::Concern,
            ..
        })
    ));
    assert_eq!(service.store(), &before);
}

#[test]
fn load_workbook_replaces_store_and_rebuilds_indices() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("pipeline.db");
    export_workbook(pipeline().store(), &path).expect("workbook should export");

    let mut service = PipelineService::new();
    service.add_concern("Unrelated", 10).expect("concern should be added");
    load_workbook(&mut service, &path).unwrap();

    assert!(service.store().concern("Unrelated").is_none());
    assert_eq!(
        service.relations().children(EntityKind::Question, "Q-a"),
        ["Build".to_string()]
    );
    assert!(service.delete_entity(EntityKind::Concern, "Risk"));
    assert!(service.store().decision("Build").is_none());
}

#[test]
fn newer_workbook_schema_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("future.db");
    {
        let conn = Connection::open(&path).expect("sqlite file should open");
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    }

    match open_workbook_read_only(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            workbook_version,
            latest_supported,
        } => {
            assert_eq!(workbook_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        export_workbook(pipeline().store(), &path),
        Err(TabularError::Db(DbError::UnsupportedSchemaVersion { .. }))
    ));
}

#[test]
fn opening_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("pipeline.db");
    drop(open_workbook(&path).expect("workbook should open"));
    let conn = open_workbook(&path).expect("workbook should open");
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn importing_a_missing_workbook_does_not_create_it() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("absent.db");

    let err = import_workbook(&path).expect_err("absent workbook should be rejected");
    assert!(matches!(
        &err,
        TabularError::Db(DbError::MissingWorkbook(missing)) if missing == &path
    ));
    assert_eq!(err.code(), "workbook_missing");
    assert!(err.to_string().contains("absent.db"));
    assert!(!path.exists());
}
