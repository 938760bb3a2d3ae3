//! Serialization of `Records` into the two stored entries. The wire shape
//! matches the one the browser version kept in local storage, so existing
//! exports can be imported as-is:
//!
//! ```text
//! registered_students = [{"id", "firstName", "lastName", "age",
//!                         "enrolledSubjects": [..], "grades": {subject: number|null}}]
//! groups              = {"group name": ["student id", ..]}
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{RecordsError, Result};
use crate::models::{Student, SubjectGrade};
use crate::records::Records;
use crate::registry::GroupRegistry;
use crate::roster::Roster;

use super::KeyValueStore;

/// Key holding the serialized student collection.
pub const STUDENTS_KEY: &str = "registered_students";
/// Key holding the serialized group mapping.
pub const GROUPS_KEY: &str = "groups";

/// Result of hydrating records at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// At least one key was present and everything parsed.
    Loaded { students: usize, groups: usize },
    /// Neither key was present.
    Empty,
    /// Storage could not be read or held corrupt data. Records start empty.
    Failed(RecordsError),
}

impl LoadOutcome {
    /// Footer-ready description of the outcome.
    pub fn message(&self) -> String {
        match self {
            LoadOutcome::Loaded { students, groups } => {
                format!("Data loaded successfully ({students} students, {groups} groups).")
            }
            LoadOutcome::Empty => "No saved data found. Starting fresh.".to_string(),
            LoadOutcome::Failed(err) => format!("Failed to load saved data: {err}"),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentRecord {
    id: String,
    first_name: String,
    last_name: String,
    age: i64,
    enrolled_subjects: Vec<String>,
    grades: BTreeMap<String, Option<f64>>,
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id().to_string(),
            first_name: student.first_name().to_string(),
            last_name: student.last_name().to_string(),
            age: i64::from(student.age()),
            enrolled_subjects: student.enrolled_subjects().map(str::to_string).collect(),
            grades: student
                .grades()
                .iter()
                .map(|entry| (entry.subject.clone(), entry.grade))
                .collect(),
        }
    }
}

impl TryFrom<StudentRecord> for Student {
    type Error = RecordsError;

    fn try_from(record: StudentRecord) -> Result<Self> {
        let StudentRecord {
            id,
            first_name,
            last_name,
            age,
            enrolled_subjects,
            mut grades,
        } = record;

        let distinct: HashSet<&String> = enrolled_subjects.iter().collect();
        if distinct.len() != grades.len() || !enrolled_subjects.iter().all(|s| grades.contains_key(s)) {
            return Err(RecordsError::Corrupt(format!(
                "student {id}: grades do not match enrolled subjects"
            )));
        }

        let mut subjects = Vec::with_capacity(enrolled_subjects.len());
        for subject in enrolled_subjects {
            // Duplicates fall through with `None` here and are rejected by
            // `Student::restore`.
            let grade = grades.remove(&subject).flatten();
            subjects.push(SubjectGrade { subject, grade });
        }

        Student::restore(id, first_name, last_name, age, subjects)
    }
}

/// Serialize both collections and write them under their fixed keys.
pub fn save(records: &Records, store: &mut dyn KeyValueStore) -> Result<()> {
    let students: Vec<StudentRecord> = records
        .roster()
        .students()
        .iter()
        .map(StudentRecord::from)
        .collect();
    let students = serde_json::to_string(&students)
        .map_err(|err| RecordsError::Storage(format!("failed to encode students: {err}")))?;

    let groups: Map<String, Value> = records
        .groups()
        .groups()
        .iter()
        .map(|group| (group.name().to_string(), Value::from(group.members().to_vec())))
        .collect();
    let groups = serde_json::to_string(&groups)
        .map_err(|err| RecordsError::Storage(format!("failed to encode groups: {err}")))?;

    store.set(STUDENTS_KEY, &students)?;
    store.set(GROUPS_KEY, &groups)?;
    Ok(())
}

/// Read both keys and rebuild the records. Any failure yields empty records
/// together with `LoadOutcome::Failed`.
pub fn load(store: &dyn KeyValueStore) -> (Records, LoadOutcome) {
    match try_load(store) {
        Ok(Some(records)) => {
            let outcome = LoadOutcome::Loaded {
                students: records.roster().len(),
                groups: records.groups().len(),
            };
            info!(?outcome, "records loaded");
            (records, outcome)
        }
        Ok(None) => {
            info!("no saved records found");
            (Records::new(), LoadOutcome::Empty)
        }
        Err(err) => {
            warn!(error = %err, "failed to load records");
            (Records::new(), LoadOutcome::Failed(err))
        }
    }
}

fn try_load(store: &dyn KeyValueStore) -> Result<Option<Records>> {
    let students = store.get(STUDENTS_KEY)?;
    let groups = store.get(GROUPS_KEY)?;
    if students.is_none() && groups.is_none() {
        return Ok(None);
    }

    let roster = match students {
        Some(raw) => decode_students(&raw)?,
        None => Roster::new(),
    };
    let groups = match groups {
        Some(raw) => decode_groups(&raw)?,
        None => GroupRegistry::new(),
    };
    Ok(Some(Records::from_parts(roster, groups)))
}

fn decode_students(raw: &str) -> Result<Roster> {
    let records: Vec<StudentRecord> = serde_json::from_str(raw)
        .map_err(|err| RecordsError::Corrupt(format!("students: {err}")))?;
    let students = records
        .into_iter()
        .map(Student::try_from)
        .collect::<Result<Vec<_>>>()?;
    Roster::from_students(students)
}

fn decode_groups(raw: &str) -> Result<GroupRegistry> {
    let map: Map<String, Value> = serde_json::from_str(raw)
        .map_err(|err| RecordsError::Corrupt(format!("groups: {err}")))?;
    let entries = map
        .into_iter()
        .map(|(name, members)| {
            serde_json::from_value::<Vec<String>>(members)
                .map(|members| (name.clone(), members))
                .map_err(|err| RecordsError::Corrupt(format!("group {name}: {err}")))
        })
        .collect::<Result<Vec<_>>>()?;
    GroupRegistry::from_entries(entries)
}
