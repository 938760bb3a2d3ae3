//! The explicit context object holding all session state. Everything that
//! reads or mutates students and groups takes a `Records` instead of reaching
//! for process-wide globals, so tests can build as many isolated instances as
//! they like.

use crate::registry::GroupRegistry;
use crate::roster::Roster;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records {
    pub(crate) roster: Roster,
    pub(crate) groups: GroupRegistry,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(roster: Roster, groups: GroupRegistry) -> Self {
        Self { roster, groups }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty() && self.groups.is_empty()
    }
}
