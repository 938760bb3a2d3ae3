//! Named cohorts of students. Groups only hold student ids; every read resolves
//! them through the `Roster`, and ids that no longer resolve are tolerated.

use crate::error::{RecordsError, Result};
use crate::models::{mean_rounded, Student};
use crate::roster::Roster;

/// A named group and its members in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    members: Vec<String>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member ids in insertion order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn has_member(&self, student_id: &str) -> bool {
        self.members.iter().any(|id| id == student_id)
    }
}

/// Groups keyed by name, iterated in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupRegistry {
    groups: Vec<Group>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from stored `(name, member ids)` pairs. Names must be
    /// unique and non-empty, and a group may not list the same id twice.
    /// Member ids are not checked against a roster.
    pub(crate) fn from_entries(entries: Vec<(String, Vec<String>)>) -> Result<Self> {
        let mut registry = Self::new();
        for (name, members) in entries {
            if name.trim().is_empty() {
                return Err(RecordsError::Corrupt("group with a blank name".into()));
            }
            if registry.get(&name).is_some() {
                return Err(RecordsError::Corrupt(format!("duplicate group {name}")));
            }
            let mut group = Group {
                name,
                members: Vec::with_capacity(members.len()),
            };
            for id in members {
                if group.has_member(&id) {
                    return Err(RecordsError::Corrupt(format!(
                        "group {} lists {id} twice",
                        group.name
                    )));
                }
                group.members.push(id);
            }
            registry.groups.push(group);
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Add an empty group. Names are trimmed and must be unique.
    pub fn create_group(&mut self, name: &str) -> Result<&Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RecordsError::MissingField("Group name"));
        }
        if self.get(name).is_some() {
            return Err(RecordsError::GroupExists(name.to_string()));
        }
        self.groups.push(Group {
            name: name.to_string(),
            members: Vec::new(),
        });
        let idx = self.groups.len() - 1;
        Ok(&self.groups[idx])
    }

    /// Append a registered student to an existing group.
    pub fn add_member(&mut self, group_name: &str, student_id: &str, roster: &Roster) -> Result<()> {
        let group = self
            .groups
            .iter_mut()
            .find(|group| group.name == group_name)
            .ok_or_else(|| RecordsError::GroupNotFound(group_name.to_string()))?;
        if !roster.contains(student_id) {
            return Err(RecordsError::StudentNotFound(student_id.to_string()));
        }
        if group.has_member(student_id) {
            return Err(RecordsError::AlreadyMember {
                group: group.name.clone(),
                student_id: student_id.to_string(),
            });
        }
        group.members.push(student_id.to_string());
        Ok(())
    }

    /// Resolve each member id of `group_name` through the roster, keeping
    /// unknown ids as `Err(id)`. `None` when the group does not exist.
    pub fn resolve_members<'a>(
        &'a self,
        group_name: &str,
        roster: &'a Roster,
    ) -> Option<Vec<std::result::Result<&'a Student, &'a str>>> {
        let group = self.get(group_name)?;
        Some(
            group
                .members
                .iter()
                .map(|id| roster.find_by_id(id).ok_or(id.as_str()))
                .collect(),
        )
    }

    /// Flat mean of every graded subject of every known member, rounded to two
    /// decimals. Students with more graded subjects weigh more. Returns `None`
    /// for an unknown group and `Some(0.0)` when nothing is graded.
    pub fn group_average(&self, group_name: &str, roster: &Roster) -> Option<f64> {
        let members = self.resolve_members(group_name, roster)?;
        Some(mean_rounded(
            members
                .into_iter()
                .filter_map(|member| member.ok())
                .flat_map(|student| student.graded_values()),
        ))
    }
}
