use student_records_manager::query::{
    group_average, group_summaries, roster_sorted, search_by_id, search_by_name, student_average,
    StudentSummary,
};
use student_records_manager::{Gradebook, MemoryStore, NameField, SortDirection, SortKey};

fn gradebook() -> (Gradebook, Vec<String>) {
    let (mut gradebook, _) = Gradebook::open(Box::new(MemoryStore::new()));
    let mut ids = Vec::new();
    for (first, last, age, grades) in [
        ("Ada", "Lovelace", 36, vec![("Math", 90.0), ("Physics", 100.0)]),
        ("Grace", "Hopper", 45, vec![("Math", 80.0)]),
        ("Alan", "Turing", 41, vec![]),
    ] {
        let id = gradebook
            .register_student(first, last, age)
            .unwrap()
            .value
            .id()
            .to_string();
        for (subject, grade) in grades {
            gradebook.enroll(&id, subject).unwrap();
            gradebook.set_grade(&id, subject, grade).unwrap();
        }
        ids.push(id);
    }
    (gradebook, ids)
}

#[test]
fn rankings_and_averages() {
    let (mut gradebook, ids) = gradebook();
    let records = gradebook.records();

    assert_eq!(student_average(records, &ids[0]), Some(95.0));
    assert_eq!(student_average(records, &ids[2]), Some(0.0));
    assert_eq!(student_average(records, "STU-missing"), None);

    let by_average: Vec<&str> = roster_sorted(records, SortKey::Average, SortDirection::Descending)
        .into_iter()
        .map(|s| s.first_name())
        .collect();
    assert_eq!(by_average, vec!["Ada", "Grace", "Alan"]);

    let by_age: Vec<&str> = roster_sorted(records, SortKey::Age, SortDirection::Ascending)
        .into_iter()
        .map(|s| s.first_name())
        .collect();
    assert_eq!(by_age, vec!["Ada", "Alan", "Grace"]);

    gradebook.create_group("Pioneers").unwrap();
    gradebook.add_member("Pioneers", &ids[0]).unwrap();
    gradebook.add_member("Pioneers", &ids[1]).unwrap();
    let records = gradebook.records();
    // Flat mean over (90, 100, 80).
    assert_eq!(group_average(records, "Pioneers"), Some(90.0));
    assert_eq!(group_average(records, "Nobody"), None);

    let summaries = group_summaries(records);
    assert_eq!(summaries[0].average, "90.00");
    assert_eq!(summaries[0].members[1], format!("{} - Grace Hopper", ids[1]));
}

#[test]
fn searches_and_listing_rows() {
    let (gradebook, ids) = gradebook();
    let records = gradebook.records();

    let found = search_by_name(records, "a", NameField::First);
    assert_eq!(found.len(), 3);
    let found = search_by_name(records, "TUR", NameField::Last);
    assert_eq!(found[0].id(), ids[2]);
    assert!(search_by_name(records, "   ", NameField::Any).is_empty());

    let ada = search_by_id(records, &format!("  {}  ", ids[0])).unwrap();
    let summary = StudentSummary::of(ada);
    assert_eq!(summary.subjects, "Math, Physics");
    assert_eq!(summary.grades, "Math: 90; Physics: 100");
    assert_eq!(summary.average, "95.00");

    let alan = StudentSummary::of(search_by_id(records, &ids[2]).unwrap());
    assert_eq!(alan.subjects, "None");
    assert_eq!(alan.grades, "None");
    assert_eq!(alan.average, "0.00");
}
