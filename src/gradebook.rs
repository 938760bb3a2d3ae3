//! The session facade: owns the records and the store, applies one mutation
//! at a time and saves after every successful change. A failed save is handed
//! back next to the mutation's result instead of undoing it, because the
//! in-memory records stay authoritative for the rest of the session.

use tracing::{info, warn};

use crate::error::{RecordsError, Result};
use crate::models::Student;
use crate::records::Records;
use crate::storage::{self, KeyValueStore, LoadOutcome};

/// A mutation that was applied in memory, plus the outcome of persisting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    pub value: T,
    pub save_error: Option<RecordsError>,
}

impl<T> Committed<T> {
    pub fn is_persisted(&self) -> bool {
        self.save_error.is_none()
    }
}

pub struct Gradebook {
    records: Records,
    store: Box<dyn KeyValueStore>,
}

impl Gradebook {
    /// Hydrate a gradebook from `store`. Load failures are reported through the
    /// outcome and leave the gradebook empty.
    pub fn open(store: Box<dyn KeyValueStore>) -> (Self, LoadOutcome) {
        let (records, outcome) = storage::load(&*store);
        (Self { records, store }, outcome)
    }

    /// Wrap existing records without reading the store.
    pub fn with_records(records: Records, store: Box<dyn KeyValueStore>) -> Self {
        Self { records, store }
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    /// Write the current records to the store.
    pub fn save(&mut self) -> Result<()> {
        storage::save(&self.records, &mut *self.store)
    }

    /// Register a student and return a copy of the stored entity.
    pub fn register_student(
        &mut self,
        first_name: &str,
        last_name: &str,
        age: i64,
    ) -> Result<Committed<Student>> {
        let student = self
            .records
            .roster
            .register(first_name, last_name, age)?
            .clone();
        info!(id = student.id(), "registered student");
        Ok(self.commit(student))
    }

    /// Enroll a student in a subject. Enrolling twice is reported as
    /// `AlreadyEnrolled` and leaves the record untouched.
    pub fn enroll(&mut self, student_id: &str, subject: &str) -> Result<Committed<()>> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(RecordsError::MissingField("Subject"));
        }
        let student = self.student_mut(student_id)?;
        if !student.enroll(subject) {
            return Err(RecordsError::AlreadyEnrolled(subject.to_string()));
        }
        info!(student_id, subject, "enrolled student");
        Ok(self.commit(()))
    }

    pub fn set_grade(&mut self, student_id: &str, subject: &str, value: f64) -> Result<Committed<()>> {
        self.student_mut(student_id)?.set_grade(subject, value)?;
        info!(student_id, subject, value, "assigned grade");
        Ok(self.commit(()))
    }

    /// Create an empty group and return its (trimmed) name.
    pub fn create_group(&mut self, name: &str) -> Result<Committed<String>> {
        let name = self.records.groups.create_group(name)?.name().to_string();
        info!(group = %name, "created group");
        Ok(self.commit(name))
    }

    pub fn add_member(&mut self, group_name: &str, student_id: &str) -> Result<Committed<()>> {
        let Records { roster, groups } = &mut self.records;
        groups.add_member(group_name, student_id, roster)?;
        info!(group = group_name, student_id, "added group member");
        Ok(self.commit(()))
    }

    fn student_mut(&mut self, student_id: &str) -> Result<&mut Student> {
        self.records
            .roster
            .find_by_id_mut(student_id)
            .ok_or_else(|| RecordsError::StudentNotFound(student_id.to_string()))
    }

    fn commit<T>(&mut self, value: T) -> Committed<T> {
        let save_error = match self.save() {
            Ok(()) => None,
            Err(err) => {
                warn!(error = %err, "failed to persist records");
                Some(err)
            }
        };
        Committed { value, save_error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn gradebook() -> Gradebook {
        Gradebook::with_records(Records::new(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn enroll_twice_reports_already_enrolled() {
        let mut book = gradebook();
        let id = book.register_student("Ada", "Lovelace", 20).unwrap().value.id().to_string();
        book.enroll(&id, "Math").unwrap();
        assert_eq!(
            book.enroll(&id, " Math "),
            Err(RecordsError::AlreadyEnrolled("Math".into()))
        );
        let ada = book.records().roster().find_by_id(&id).unwrap();
        assert_eq!(ada.grades().len(), 1);
    }

    #[test]
    fn enroll_requires_subject_and_student() {
        let mut book = gradebook();
        assert_eq!(
            book.enroll("STU-x", "Math"),
            Err(RecordsError::StudentNotFound("STU-x".into()))
        );
        assert_eq!(
            book.enroll("STU-x", "  "),
            Err(RecordsError::MissingField("Subject"))
        );
    }

    #[test]
    fn student_and_group_scenario() {
        let mut book = gradebook();
        let a = book.register_student("A", "One", 20).unwrap().value.id().to_string();
        book.enroll(&a, "Math").unwrap();
        book.set_grade(&a, "Math", 95.0).unwrap();
        book.enroll(&a, "Science").unwrap();
        assert_eq!(book.records().roster().find_by_id(&a).unwrap().average(), 95.0);

        let b = book.register_student("B", "Two", 21).unwrap().value.id().to_string();
        book.enroll(&b, "Math").unwrap();
        book.enroll(&b, "Science").unwrap();
        book.set_grade(&b, "Math", 80.0).unwrap();
        book.set_grade(&b, "Science", 100.0).unwrap();

        book.create_group("G1").unwrap();
        book.add_member("G1", &a).unwrap();
        book.add_member("G1", &b).unwrap();
        let records = book.records();
        assert_eq!(records.groups().group_average("G1", records.roster()), Some(91.67));
    }

    #[test]
    fn failed_save_keeps_mutation() {
        let mut book = Gradebook::with_records(Records::new(), Box::new(MemoryStore::failing()));
        let committed = book.register_student("Ada", "Lovelace", 20).unwrap();
        assert!(!committed.is_persisted());
        assert!(committed.save_error.unwrap().is_persistence());
        assert_eq!(book.records().roster().len(), 1);
    }

    #[test]
    fn rejected_mutation_does_not_touch_state() {
        let mut book = gradebook();
        let id = book.register_student("Ada", "Lovelace", 20).unwrap().value.id().to_string();
        book.enroll(&id, "Math").unwrap();
        assert_eq!(
            book.set_grade(&id, "Math", 101.0),
            Err(RecordsError::GradeOutOfRange(101.0))
        );
        assert_eq!(
            book.records().roster().find_by_id(&id).unwrap().grade("Math"),
            Some(None)
        );
    }

    #[test]
    fn open_hydrates_from_store() {
        let mut store = MemoryStore::new();
        let mut records = Records::new();
        records.roster.register("Ada", "Lovelace", 20).unwrap();
        records.groups.create_group("G1").unwrap();
        storage::save(&records, &mut store).unwrap();

        let (book, outcome) = Gradebook::open(Box::new(store));
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                students: 1,
                groups: 1
            }
        );
        assert_eq!(book.records(), &records);
    }
}
