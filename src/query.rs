//! Read-only reports over the current records: searches, averages, rankings
//! and the row summaries the listings render. Nothing here mutates state.

use crate::models::{NameField, SortDirection, Student};
use crate::records::Records;

/// Attribute a roster ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Average,
    Age,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Average => "Average",
            SortKey::Age => "Age",
        }
    }
}

pub fn search_by_name<'a>(records: &'a Records, text: &str, field: NameField) -> Vec<&'a Student> {
    records.roster().find_by_name(text, field)
}

/// Exact id lookup. Surrounding whitespace in the query is ignored.
pub fn search_by_id<'a>(records: &'a Records, id: &str) -> Option<&'a Student> {
    records.roster().find_by_id(id.trim())
}

/// Average of one student, `None` if the id is unknown.
pub fn student_average(records: &Records, id: &str) -> Option<f64> {
    search_by_id(records, id).map(Student::average)
}

/// Flat group average, `None` if the group does not exist.
pub fn group_average(records: &Records, name: &str) -> Option<f64> {
    records.groups().group_average(name, records.roster())
}

pub fn roster_sorted(records: &Records, key: SortKey, direction: SortDirection) -> Vec<&Student> {
    match key {
        SortKey::Average => records.roster().sorted_by_average(direction),
        SortKey::Age => records.roster().sorted_by_age(direction),
    }
}

/// One listing row for a student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSummary {
    pub id: String,
    pub full_name: String,
    pub age: u32,
    pub subjects: String,
    pub grades: String,
    pub average: String,
}

impl StudentSummary {
    pub fn of(student: &Student) -> Self {
        let subjects = student.enrolled_subjects().collect::<Vec<_>>().join(", ");
        let grades = student
            .grades()
            .iter()
            .map(|entry| match entry.grade {
                Some(grade) => format!("{}: {grade}", entry.subject),
                None => format!("{}: N/A", entry.subject),
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            id: student.id().to_string(),
            full_name: student.full_name(),
            age: student.age(),
            subjects: none_if_empty(subjects),
            grades: none_if_empty(grades),
            average: format_average(student.average()),
        }
    }
}

/// One listing row for a group, with members resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub members: Vec<String>,
    pub average: String,
}

/// Summaries for every group in creation order. Member ids missing from the
/// roster are shown as unknown rather than dropped.
pub fn group_summaries(records: &Records) -> Vec<GroupSummary> {
    records
        .groups()
        .groups()
        .iter()
        .map(|group| {
            let members = records
                .groups()
                .resolve_members(group.name(), records.roster())
                .unwrap_or_default()
                .into_iter()
                .map(|member| match member {
                    Ok(student) => format!("{} - {}", student.id(), student.full_name()),
                    Err(id) => format!("Unknown ID: {id}"),
                })
                .collect();
            let average = group_average(records, group.name())
                .map(format_average)
                .unwrap_or_else(|| "N/A".to_string());
            GroupSummary {
                name: group.name().to_string(),
                members,
                average,
            }
        })
        .collect()
}

/// Two-decimal rendering used everywhere an average is shown.
pub fn format_average(value: f64) -> String {
    format!("{value:.2}")
}

fn none_if_empty(text: String) -> String {
    if text.is_empty() {
        "None".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GroupRegistry;
    use crate::roster::Roster;

    fn records() -> (Records, String, String) {
        let mut roster = Roster::new();
        let a = roster.register("Ada", "Lovelace", 36).unwrap().id().to_string();
        let b = roster.register("Grace", "Hopper", 40).unwrap().id().to_string();
        {
            let ada = roster.find_by_id_mut(&a).unwrap();
            ada.enroll("Math");
            ada.set_grade("Math", 87.5).unwrap();
            ada.enroll("Art");
        }
        let mut groups = GroupRegistry::from_entries(vec![(
            "G1".to_string(),
            vec![a.clone(), "STU-gone".to_string()],
        )])
        .unwrap();
        groups.create_group("Empty").unwrap();
        (Records::from_parts(roster, groups), a, b)
    }

    #[test]
    fn lookups_by_id_and_name() {
        let (records, a, _) = records();
        assert_eq!(
            search_by_id(&records, &format!("  {a} ")).map(Student::first_name),
            Some("Ada")
        );
        assert!(search_by_id(&records, "nope").is_none());
        assert_eq!(search_by_name(&records, "hop", NameField::Last).len(), 1);
        assert!(search_by_name(&records, "hop", NameField::First).is_empty());
    }

    #[test]
    fn averages_and_missing_targets() {
        let (records, a, b) = records();
        assert_eq!(student_average(&records, &a), Some(87.5));
        assert_eq!(student_average(&records, &b), Some(0.0));
        assert_eq!(student_average(&records, "nope"), None);
        assert_eq!(group_average(&records, "G1"), Some(87.5));
        assert_eq!(group_average(&records, "Empty"), Some(0.0));
        assert_eq!(group_average(&records, "Nope"), None);
    }

    #[test]
    fn sorted_views_follow_key() {
        let (records, _, _) = records();
        let by_avg = roster_sorted(&records, SortKey::Average, SortDirection::Ascending);
        assert_eq!(by_avg[0].first_name(), "Grace");
        let by_age = roster_sorted(&records, SortKey::Age, SortDirection::Descending);
        assert_eq!(by_age[0].first_name(), "Grace");
    }

    #[test]
    fn student_summary_formats_record() {
        let (records, a, b) = records();
        let ada = StudentSummary::of(search_by_id(&records, &a).unwrap());
        assert_eq!(ada.full_name, "Ada Lovelace");
        assert_eq!(ada.subjects, "Math, Art");
        assert_eq!(ada.grades, "Math: 87.5; Art: N/A");
        assert_eq!(ada.average, "87.50");

        let grace = StudentSummary::of(search_by_id(&records, &b).unwrap());
        assert_eq!(grace.subjects, "None");
        assert_eq!(grace.grades, "None");
        assert_eq!(grace.average, "0.00");
    }

    #[test]
    fn group_summaries_mark_unknown_members() {
        let (records, a, _) = records();
        let summaries = group_summaries(&records);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].members[0], format!("{a} - Ada Lovelace"));
        assert_eq!(summaries[0].members[1], "Unknown ID: STU-gone");
        assert_eq!(summaries[0].average, "87.50");
        assert!(summaries[1].members.is_empty());
        assert_eq!(summaries[1].average, "0.00");
    }
}
