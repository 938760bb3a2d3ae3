//! The roster is the single owner of every `Student`. It hands out shared
//! references for display and only mutates students through their own
//! validated operations.

use std::cmp::Ordering;

use crate::error::{RecordsError, Result};
use crate::models::{generate_student_id, NameField, SortDirection, Student};

/// Ordered collection of registered students, unique by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from already-validated students, rejecting duplicate ids.
    pub(crate) fn from_students(students: Vec<Student>) -> Result<Self> {
        let mut roster = Self::new();
        for student in students {
            if roster.contains(student.id()) {
                return Err(RecordsError::Corrupt(format!(
                    "duplicate student id {}",
                    student.id()
                )));
            }
            roster.students.push(student);
        }
        Ok(roster)
    }

    /// Validate the inputs and append a new student with a fresh id.
    pub fn register(&mut self, first_name: &str, last_name: &str, age: i64) -> Result<&Student> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() {
            return Err(RecordsError::MissingField("First name"));
        }
        if last_name.is_empty() {
            return Err(RecordsError::MissingField("Last name"));
        }
        let age = u32::try_from(age)
            .ok()
            .filter(|age| *age > 0)
            .ok_or(RecordsError::InvalidAge(age))?;

        let id = generate_student_id(|candidate| self.contains(candidate));
        self.students.push(Student::new(
            id,
            first_name.to_string(),
            last_name.to_string(),
            age,
        ));
        let idx = self.students.len() - 1;
        Ok(&self.students[idx])
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students in registration order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id() == id)
    }

    pub(crate) fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Student> {
        self.students.iter_mut().find(|student| student.id() == id)
    }

    /// Case-insensitive substring search over first name, last name, or both.
    /// A blank query matches nothing.
    pub fn find_by_name(&self, text: &str, field: NameField) -> Vec<&Student> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.students
            .iter()
            .filter(|student| {
                let first = || student.first_name().to_lowercase().contains(&needle);
                let last = || student.last_name().to_lowercase().contains(&needle);
                match field {
                    NameField::First => first(),
                    NameField::Last => last(),
                    NameField::Any => first() || last(),
                }
            })
            .collect()
    }

    /// All students ordered by average. Ties keep registration order.
    pub fn sorted_by_average(&self, direction: SortDirection) -> Vec<&Student> {
        self.sorted_by(direction, |a, b| a.average().total_cmp(&b.average()))
    }

    /// All students ordered by age. Ties keep registration order.
    pub fn sorted_by_age(&self, direction: SortDirection) -> Vec<&Student> {
        self.sorted_by(direction, |a, b| a.age().cmp(&b.age()))
    }

    fn sorted_by<F>(&self, direction: SortDirection, compare: F) -> Vec<&Student>
    where
        F: Fn(&Student, &Student) -> Ordering,
    {
        let mut sorted: Vec<&Student> = self.students.iter().collect();
        // `sort_by` is stable, and reversing the comparator (not the output)
        // keeps equal elements in their original order for both directions.
        sorted.sort_by(|a, b| match direction {
            SortDirection::Ascending => compare(a, b),
            SortDirection::Descending => compare(b, a),
        });
        sorted
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn graded(roster: &mut Roster, first: &str, age: i64, grade: Option<f64>) -> String {
        let id = roster.register(first, "Test", age).unwrap().id().to_string();
        if let Some(grade) = grade {
            let student = roster.find_by_id_mut(&id).unwrap();
            student.enroll("Math");
            student.set_grade("Math", grade).unwrap();
        }
        id
    }

    fn first_names(students: &[&Student]) -> Vec<String> {
        students.iter().map(|s| s.first_name().to_string()).collect()
    }

    #[test]
    fn register_assigns_unique_ids() {
        let mut roster = Roster::new();
        let mut seen = HashSet::new();
        for n in 0..200 {
            let id = roster.register("Ada", "Lovelace", 20 + n % 5).unwrap().id().to_string();
            assert!(seen.insert(id));
        }
        assert_eq!(roster.len(), 200);
    }

    #[test]
    fn register_trims_and_validates() {
        let mut roster = Roster::new();
        let student = roster.register("  Ada ", " Lovelace", 36).unwrap();
        assert_eq!(student.full_name(), "Ada Lovelace");
        assert!(student.grades().is_empty());

        assert_eq!(
            roster.register("   ", "Lovelace", 36),
            Err(RecordsError::MissingField("First name"))
        );
        assert_eq!(
            roster.register("Ada", "", 36),
            Err(RecordsError::MissingField("Last name"))
        );
        assert_eq!(
            roster.register("Ada", "Lovelace", 0),
            Err(RecordsError::InvalidAge(0))
        );
        assert_eq!(
            roster.register("Ada", "Lovelace", -3),
            Err(RecordsError::InvalidAge(-3))
        );
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn find_by_name_matches_fields_separately() {
        let mut roster = Roster::new();
        roster.register("Ada", "Lovelace", 36).unwrap();
        roster.register("Grace", "Hopper", 40).unwrap();
        roster.register("Alan", "Adams", 41).unwrap();

        assert_eq!(
            first_names(&roster.find_by_name("AD", NameField::First)),
            vec!["Ada"]
        );
        assert_eq!(
            first_names(&roster.find_by_name("ad", NameField::Last)),
            vec!["Alan"]
        );
        assert_eq!(
            first_names(&roster.find_by_name("ad", NameField::Any)),
            vec!["Ada", "Alan"]
        );
        assert!(roster.find_by_name("zzz", NameField::Any).is_empty());
        assert!(roster.find_by_name("  ", NameField::Any).is_empty());
    }

    #[test]
    fn find_by_id_misses_unknown_ids() {
        let mut roster = Roster::new();
        let id = roster.register("Ada", "Lovelace", 36).unwrap().id().to_string();
        assert_eq!(roster.find_by_id(&id).map(Student::first_name), Some("Ada"));
        assert!(roster.find_by_id("STU-missing").is_none());
    }

    #[test]
    fn sorted_by_average_descending() {
        let mut roster = Roster::new();
        graded(&mut roster, "Seventy", 20, Some(70.0));
        graded(&mut roster, "Ninety", 20, Some(90.0));
        graded(&mut roster, "Eighty", 20, Some(80.0));

        let sorted = roster.sorted_by_average(SortDirection::Descending);
        assert_eq!(first_names(&sorted), vec!["Ninety", "Eighty", "Seventy"]);
        let sorted = roster.sorted_by_average(SortDirection::Ascending);
        assert_eq!(first_names(&sorted), vec!["Seventy", "Eighty", "Ninety"]);
    }

    #[test]
    fn sorts_are_stable_for_ties() {
        let mut roster = Roster::new();
        graded(&mut roster, "A", 30, Some(80.0));
        graded(&mut roster, "B", 20, Some(90.0));
        graded(&mut roster, "C", 30, Some(80.0));
        graded(&mut roster, "D", 20, None);

        let by_avg = roster.sorted_by_average(SortDirection::Descending);
        assert_eq!(first_names(&by_avg), vec!["B", "A", "C", "D"]);
        let by_age = roster.sorted_by_age(SortDirection::Ascending);
        assert_eq!(first_names(&by_age), vec!["B", "D", "A", "C"]);
        let by_age = roster.sorted_by_age(SortDirection::Descending);
        assert_eq!(first_names(&by_age), vec!["A", "C", "B", "D"]);

        // The underlying order is untouched.
        assert_eq!(roster.students()[0].first_name(), "A");
    }

    #[test]
    fn from_students_rejects_duplicate_ids() {
        let a = Student::restore("STU-1".into(), "A".into(), "B".into(), 20, vec![]).unwrap();
        let err = Roster::from_students(vec![a.clone(), a]).unwrap_err();
        assert!(matches!(err, RecordsError::Corrupt(_)));
    }
}
