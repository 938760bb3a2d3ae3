use student_records_manager::storage::{GROUPS_KEY, STUDENTS_KEY};
use student_records_manager::{
    Gradebook, KeyValueStore, LoadOutcome, MemoryStore, RecordsError, SqliteStore,
};
use tempfile::tempdir;

#[test]
fn records_survive_reopening_the_database() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("records.sqlite");

    let ada_id = {
        let store = SqliteStore::open(&db_path).unwrap();
        let (mut gradebook, outcome) = Gradebook::open(Box::new(store));
        assert_eq!(outcome, LoadOutcome::Empty);

        let ada = gradebook.register_student("Ada", "Lovelace", 20).unwrap();
        assert!(ada.is_persisted());
        let id = ada.value.id().to_string();
        gradebook.enroll(&id, "Math").unwrap();
        gradebook.enroll(&id, "Art").unwrap();
        gradebook.set_grade(&id, "Math", 87.5).unwrap();
        gradebook.create_group("G1").unwrap();
        gradebook.add_member("G1", &id).unwrap();
        id
    };

    let store = SqliteStore::open(&db_path).unwrap();
    let (gradebook, outcome) = Gradebook::open(Box::new(store));
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            students: 1,
            groups: 1
        }
    );

    let records = gradebook.records();
    let ada = records.roster().find_by_id(&ada_id).unwrap();
    assert_eq!(ada.full_name(), "Ada Lovelace");
    assert_eq!(ada.enrolled_subjects().collect::<Vec<_>>(), vec!["Math", "Art"]);
    assert_eq!(ada.grade("Math"), Some(Some(87.5)));
    assert_eq!(ada.grade("Art"), Some(None));
    assert_eq!(records.groups().get("G1").unwrap().members(), [ada_id]);
}

#[test]
fn stored_payload_uses_the_two_keys() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("records.sqlite");
    let store = SqliteStore::open(&db_path).unwrap();
    let (mut gradebook, _) = Gradebook::open(Box::new(store));
    let id = gradebook
        .register_student("Grace", "Hopper", 40)
        .unwrap()
        .value
        .id()
        .to_string();
    gradebook.create_group("Navy").unwrap();
    drop(gradebook);

    let store = SqliteStore::open(&db_path).unwrap();
    let students: serde_json::Value =
        serde_json::from_str(&store.get(STUDENTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(students[0]["id"], id.as_str());
    assert_eq!(students[0]["firstName"], "Grace");
    assert_eq!(students[0]["enrolledSubjects"], serde_json::json!([]));

    let groups: serde_json::Value =
        serde_json::from_str(&store.get(GROUPS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(groups, serde_json::json!({ "Navy": [] }));
}

#[test]
fn corrupt_payload_starts_empty_and_reports_failure() {
    let mut store = MemoryStore::new();
    store.set(STUDENTS_KEY, "{not json").unwrap();

    let (gradebook, outcome) = Gradebook::open(Box::new(store));
    assert!(outcome.is_failure());
    assert!(outcome.message().starts_with("Failed to load saved data:"));
    assert!(gradebook.records().is_empty());
}

#[test]
fn save_failure_keeps_the_change_in_memory() {
    let (mut gradebook, _) = Gradebook::open(Box::new(MemoryStore::failing()));
    let committed = gradebook.register_student("Alan", "Turing", 41).unwrap();
    assert!(matches!(committed.save_error, Some(RecordsError::Storage(_))));
    assert_eq!(gradebook.records().roster().len(), 1);
}
