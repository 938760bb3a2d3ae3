//! Domain models for the records manager. A `Student` owns its academic record
//! outright; groups and the roster refer to students by id only. Keeping the
//! grade bookkeeping inside the type means nothing outside this module can
//! produce a grade for a subject the student never enrolled in.

use std::fmt;

use uuid::Uuid;

use crate::error::{RecordsError, Result};

/// Lowest grade accepted by `Student::set_grade`.
pub const MIN_GRADE: f64 = 0.0;
/// Highest grade accepted by `Student::set_grade`.
pub const MAX_GRADE: f64 = 100.0;
/// Prefix used for generated student ids.
const ID_PREFIX: &str = "STU-";

/// One enrolled subject together with its grade. `None` means "not graded yet".
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGrade {
    pub subject: String,
    pub grade: Option<f64>,
}

/// A registered student.
///
/// Enrollment and grades are stored as a single ordered list of
/// [`SubjectGrade`] entries, so the set of graded subjects always equals the
/// set of enrolled subjects and both iterate in enrollment order.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    id: String,
    first_name: String,
    last_name: String,
    age: u32,
    subjects: Vec<SubjectGrade>,
}

impl Student {
    /// Build a fresh student with an empty record. Callers are expected to have
    /// validated the names and age already (see `Roster::register`).
    pub(crate) fn new(id: String, first_name: String, last_name: String, age: u32) -> Self {
        Self {
            id,
            first_name,
            last_name,
            age,
            subjects: Vec::new(),
        }
    }

    /// Rebuild a student from persisted parts, checking every invariant the
    /// live type guarantees. Used by the storage layer instead of trusting the
    /// stored payload blindly.
    pub(crate) fn restore(
        id: String,
        first_name: String,
        last_name: String,
        age: i64,
        subjects: Vec<SubjectGrade>,
    ) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(RecordsError::Corrupt("student without an id".into()));
        }
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(RecordsError::Corrupt(format!("student {id} has a blank name")));
        }
        let age = u32::try_from(age)
            .ok()
            .filter(|age| *age > 0)
            .ok_or_else(|| RecordsError::Corrupt(format!("student {id} has invalid age {age}")))?;

        let mut student = Self::new(id, first_name, last_name, age);
        for entry in subjects {
            if !student.enroll(&entry.subject) {
                return Err(RecordsError::Corrupt(format!(
                    "student {} is enrolled twice in {}",
                    student.id, entry.subject
                )));
            }
            if let Some(grade) = entry.grade {
                student.set_grade(&entry.subject, grade).map_err(|err| {
                    RecordsError::Corrupt(format!("student {}: {err}", student.id))
                })?;
            }
        }
        Ok(student)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// `First Last`, used by listings and status messages.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Subject names in enrollment order.
    pub fn enrolled_subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(|entry| entry.subject.as_str())
    }

    /// Subject/grade pairs in enrollment order.
    pub fn grades(&self) -> &[SubjectGrade] {
        &self.subjects
    }

    /// Grade for one subject. The outer `Option` is `None` when the student is
    /// not enrolled; the inner one when the subject is not graded yet.
    pub fn grade(&self, subject: &str) -> Option<Option<f64>> {
        self.subjects
            .iter()
            .find(|entry| entry.subject == subject)
            .map(|entry| entry.grade)
    }

    pub fn is_enrolled(&self, subject: &str) -> bool {
        self.subjects.iter().any(|entry| entry.subject == subject)
    }

    /// Enroll in `subject` with no grade. Returns `false` (and changes nothing)
    /// when the student is already enrolled.
    pub fn enroll(&mut self, subject: &str) -> bool {
        if self.is_enrolled(subject) {
            return false;
        }
        self.subjects.push(SubjectGrade {
            subject: subject.to_string(),
            grade: None,
        });
        true
    }

    /// Overwrite the grade of an enrolled subject.
    pub fn set_grade(&mut self, subject: &str, value: f64) -> Result<()> {
        let entry = self
            .subjects
            .iter_mut()
            .find(|entry| entry.subject == subject)
            .ok_or_else(|| RecordsError::NotEnrolled(subject.to_string()))?;

        // NaN fails both comparisons and lands here as well.
        if !(MIN_GRADE..=MAX_GRADE).contains(&value) {
            return Err(RecordsError::GradeOutOfRange(value));
        }

        entry.grade = Some(value);
        Ok(())
    }

    /// Non-null grades in enrollment order.
    pub fn graded_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.subjects.iter().filter_map(|entry| entry.grade)
    }

    /// Number of subjects that already carry a grade.
    pub fn graded_count(&self) -> usize {
        self.graded_values().count()
    }

    /// Mean of the graded subjects rounded to two decimals. Returns `0.0` when
    /// nothing is graded; check `graded_count` to tell that apart from a real
    /// zero average.
    pub fn average(&self) -> f64 {
        mean_rounded(self.graded_values())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.full_name(), self.id)
    }
}

/// Generate an id that does not collide with any id accepted by `taken`.
pub(crate) fn generate_student_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = format!("{ID_PREFIX}{}", Uuid::new_v4().simple());
        if !taken(&candidate) {
            return candidate;
        }
    }
}

/// Sort order for roster rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

/// Which name a search should match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
    Any,
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean rounded to two decimals, `0.0` for an empty input.
pub(crate) fn mean_rounded(values: impl Iterator<Item = f64>) -> f64 {
    let (total, count) = values.fold((0.0, 0usize), |(total, count), value| {
        (total + value, count + 1)
    });
    if count == 0 {
        0.0
    } else {
        round2(total / count as f64)
    }
}
