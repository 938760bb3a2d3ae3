use std::collections::HashSet;

use crate::models::{NameField, SortDirection, Student};
use crate::query::{
    group_summaries, roster_sorted, search_by_id, search_by_name, GroupSummary, SortKey,
};
use crate::records::Records;

/// Ordering applied to the student list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RosterView {
    Registration,
    Sorted(SortKey, SortDirection),
}

/// Which attribute an inline search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchField {
    FirstName,
    LastName,
    Id,
}

impl SearchField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SearchField::FirstName => "first name",
            SearchField::LastName => "last name",
            SearchField::Id => "ID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StudentFilter {
    pub(crate) field: SearchField,
    pub(crate) query: String,
}

/// State of the student list: ordering, optional search filter, and the ids
/// currently visible in display order.
pub(crate) struct StudentsScreen {
    pub(crate) view: RosterView,
    pub(crate) filter: Option<StudentFilter>,
    pub(crate) rows: Vec<String>,
    pub(crate) selected: usize,
}

impl StudentsScreen {
    pub(crate) fn new(records: &Records) -> Self {
        let mut screen = Self {
            view: RosterView::Registration,
            filter: None,
            rows: Vec::new(),
            selected: 0,
        };
        screen.refresh(records, None);
        screen
    }

    /// Recompute the visible rows. When `focus_id` is visible it becomes the
    /// selection; otherwise the previous index is kept in bounds.
    pub(crate) fn refresh(&mut self, records: &Records, focus_id: Option<&str>) {
        let ordered: Vec<&Student> = match self.view {
            RosterView::Registration => records.roster().students().iter().collect(),
            RosterView::Sorted(key, direction) => roster_sorted(records, key, direction),
        };

        let matches: Option<HashSet<&str>> = self
            .filter
            .as_ref()
            .filter(|filter| !filter.query.trim().is_empty())
            .map(|filter| {
                let found: Vec<&Student> = match filter.field {
                    SearchField::FirstName => search_by_name(records, &filter.query, NameField::First),
                    SearchField::LastName => search_by_name(records, &filter.query, NameField::Last),
                    SearchField::Id => search_by_id(records, &filter.query).into_iter().collect(),
                };
                found.into_iter().map(Student::id).collect()
            });

        self.rows = ordered
            .into_iter()
            .filter(|student| matches.as_ref().map_or(true, |ids| ids.contains(student.id())))
            .map(|student| student.id().to_string())
            .collect();

        if let Some(id) = focus_id {
            if let Some(idx) = self.rows.iter().position(|row| row == id) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn set_view(&mut self, records: &Records, view: RosterView) {
        let focus = self.current_id().map(str::to_string);
        self.view = view;
        self.refresh(records, focus.as_deref());
    }

    pub(crate) fn set_filter(&mut self, records: &Records, filter: Option<StudentFilter>) {
        let focus = self.current_id().map(str::to_string);
        self.filter = filter;
        self.refresh(records, focus.as_deref());
    }

    pub(crate) fn has_active_filter(&self) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|filter| !filter.query.trim().is_empty())
    }

    pub(crate) fn current_id(&self) -> Option<&str> {
        self.rows.get(self.selected).map(String::as_str)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }

    /// Heading for the list block, naming the ordering and any filter.
    pub(crate) fn title(&self) -> String {
        let mut title = match self.view {
            RosterView::Registration => "Students".to_string(),
            RosterView::Sorted(key, direction) => {
                format!("Students by {} ({})", key.label(), direction.label())
            }
        };
        if let Some(filter) = self.filter.as_ref().filter(|_| self.has_active_filter()) {
            title.push_str(&format!(" - {}: \"{}\"", filter.field.label(), filter.query.trim()));
        }
        title
    }
}

/// Group listing with members resolved for display.
pub(crate) struct GroupsScreen {
    pub(crate) summaries: Vec<GroupSummary>,
    pub(crate) selected: usize,
}

impl GroupsScreen {
    pub(crate) fn new(records: &Records) -> Self {
        let mut screen = Self {
            summaries: Vec::new(),
            selected: 0,
        };
        screen.refresh(records, None);
        screen
    }

    pub(crate) fn refresh(&mut self, records: &Records, focus_name: Option<&str>) {
        self.summaries = group_summaries(records);
        if let Some(name) = focus_name {
            if let Some(idx) = self.summaries.iter().position(|g| g.name == name) {
                self.selected = idx;
                return;
            }
        }
        if self.summaries.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.summaries.len() {
            self.selected = self.summaries.len() - 1;
        }
    }

    pub(crate) fn current(&self) -> Option<&GroupSummary> {
        self.summaries.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.summaries.is_empty() {
            return;
        }
        let len = self.summaries.len() as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GroupRegistry;
    use crate::roster::Roster;

    fn records() -> Records {
        let mut roster = Roster::new();
        for (first, last, age, grade) in [
            ("Ada", "Lovelace", 36, 70.0),
            ("Grace", "Hopper", 40, 90.0),
            ("Alan", "Adams", 41, 80.0),
        ] {
            let id = roster.register(first, last, age).unwrap().id().to_string();
            let student = roster.find_by_id_mut(&id).unwrap();
            student.enroll("Math");
            student.set_grade("Math", grade).unwrap();
        }
        Records::from_parts(roster, GroupRegistry::new())
    }

    fn names(screen: &StudentsScreen, records: &Records) -> Vec<String> {
        screen
            .rows
            .iter()
            .map(|id| records.roster().find_by_id(id).unwrap().first_name().to_string())
            .collect()
    }

    #[test]
    fn sorted_view_keeps_selected_student() {
        let records = records();
        let mut screen = StudentsScreen::new(&records);
        screen.move_selection(1);
        assert_eq!(names(&screen, &records)[screen.selected], "Grace");

        screen.set_view(
            &records,
            RosterView::Sorted(SortKey::Average, SortDirection::Descending),
        );
        assert_eq!(names(&screen, &records), vec!["Grace", "Alan", "Ada"]);
        assert_eq!(screen.selected, 0);
        assert_eq!(screen.title(), "Students by Average (Descending)");
    }

    #[test]
    fn filter_narrows_rows_in_view_order() {
        let records = records();
        let mut screen = StudentsScreen::new(&records);
        screen.set_view(&records, RosterView::Sorted(SortKey::Age, SortDirection::Descending));
        screen.set_filter(
            &records,
            Some(StudentFilter {
                field: SearchField::FirstName,
                query: "a".into(),
            }),
        );
        assert_eq!(names(&screen, &records), vec!["Alan", "Grace", "Ada"]);

        screen.set_filter(
            &records,
            Some(StudentFilter {
                field: SearchField::LastName,
                query: "ADA".into(),
            }),
        );
        assert_eq!(names(&screen, &records), vec!["Alan"]);
        assert!(screen.title().ends_with("last name: \"ADA\""));

        screen.set_filter(&records, None);
        assert_eq!(screen.rows.len(), 3);
    }

    #[test]
    fn id_filter_is_exact() {
        let records = records();
        let id = records.roster().students()[2].id().to_string();
        let mut screen = StudentsScreen::new(&records);
        screen.set_filter(
            &records,
            Some(StudentFilter {
                field: SearchField::Id,
                query: id.clone(),
            }),
        );
        assert_eq!(screen.rows, vec![id.clone()]);
        screen.set_filter(
            &records,
            Some(StudentFilter {
                field: SearchField::Id,
                query: id[..6].to_string(),
            }),
        );
        assert!(screen.rows.is_empty());
        assert_eq!(screen.current_id(), None);
    }
}
