use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::error::RecordsError;
use crate::gradebook::{Committed, Gradebook};
use crate::models::{SortDirection, Student};
use crate::query::{format_average, SortKey, StudentSummary};
use crate::storage::LoadOutcome;

use super::forms::{GradeForm, GroupPicker, StudentField, StudentForm, TextForm};
use super::helpers::{centered_rect, detail_line, key_hints, surface_error};
use super::screens::{GroupsScreen, RosterView, SearchField, StudentFilter, StudentsScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// High-level navigation states.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Students,
    Groups,
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    RegisteringStudent(StudentForm),
    Enrolling {
        student_id: String,
        student_name: String,
        form: TextForm,
    },
    Grading(GradeForm),
    CreatingGroup(TextForm),
    AssigningGroup(GroupPicker),
    Searching(SearchState),
}

/// State for an active inline search.
struct SearchState {
    field: SearchField,
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    gradebook: Gradebook,
    screen: Screen,
    students: StudentsScreen,
    groups: GroupsScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Wrap a hydrated gradebook. The load outcome is shown in the footer on
    /// the first frame.
    pub fn new(gradebook: Gradebook, outcome: &LoadOutcome) -> Self {
        let students = StudentsScreen::new(gradebook.records());
        let groups = GroupsScreen::new(gradebook.records());
        let kind = if outcome.is_failure() {
            StatusKind::Error
        } else {
            StatusKind::Info
        };
        let status = Some(StatusMessage {
            text: outcome.message(),
            kind,
        });
        Self {
            gradebook,
            screen: Screen::Students,
            students,
            groups,
            mode: Mode::Normal,
            status,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::RegisteringStudent(form) => self.handle_register(code, form)?,
            Mode::Enrolling {
                student_id,
                student_name,
                form,
            } => self.handle_enroll(code, student_id, student_name, form)?,
            Mode::Grading(form) => self.handle_grade(code, form)?,
            Mode::CreatingGroup(form) => self.handle_create_group(code, form)?,
            Mode::AssigningGroup(picker) => self.handle_assign_group(code, picker)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Students => self.handle_students_key(code, exit),
            Screen::Groups => self.handle_groups_key(code, exit),
        }
    }

    fn handle_students_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.students.has_active_filter() {
                    self.students.set_filter(self.gradebook.records(), None);
                    self.set_status("Search cleared.", StatusKind::Info);
                } else {
                    *exit = true;
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.clear_status();
                self.screen = Screen::Groups;
            }
            KeyCode::Up => self.students.move_selection(-1),
            KeyCode::Down => self.students.move_selection(1),
            KeyCode::PageUp => self.students.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.students.move_selection(PAGE_STEP),
            KeyCode::Home => self.students.select_first(),
            KeyCode::End => self.students.select_last(),
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::RegisteringStudent(StudentForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(student) = self.current_student().cloned() {
                    self.clear_status();
                    return Ok(Mode::Enrolling {
                        student_id: student.id().to_string(),
                        student_name: student.first_name().to_string(),
                        form: TextForm::default(),
                    });
                }
                self.set_status("No student selected to enroll.", StatusKind::Error);
            }
            KeyCode::Char('g') | KeyCode::Char('G') => match self.current_student() {
                Some(student) => match GradeForm::for_student(student) {
                    Some(form) => {
                        self.clear_status();
                        return Ok(Mode::Grading(form));
                    }
                    None => {
                        let message =
                            format!("{} is not enrolled in any subject.", student.first_name());
                        self.set_status(message, StatusKind::Error);
                    }
                },
                None => self.set_status("No student selected to grade.", StatusKind::Error),
            },
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let Some(student) = self.current_student().cloned() else {
                    self.set_status("No student selected to assign.", StatusKind::Error);
                    return Ok(Mode::Normal);
                };
                let groups: Vec<String> = self
                    .gradebook
                    .records()
                    .groups()
                    .groups()
                    .iter()
                    .map(|group| group.name().to_string())
                    .collect();
                if groups.is_empty() {
                    self.set_status("Create a group first.", StatusKind::Error);
                } else {
                    self.clear_status();
                    return Ok(Mode::AssigningGroup(GroupPicker {
                        student_id: student.id().to_string(),
                        student_name: student.first_name().to_string(),
                        groups,
                        selected: 0,
                    }));
                }
            }
            KeyCode::Char('f') => return Ok(self.start_search(SearchField::FirstName)),
            KeyCode::Char('l') => return Ok(self.start_search(SearchField::LastName)),
            KeyCode::Char('i') => return Ok(self.start_search(SearchField::Id)),
            KeyCode::Char('a') => self.sort_by(SortKey::Average, SortDirection::Ascending),
            KeyCode::Char('A') => self.sort_by(SortKey::Average, SortDirection::Descending),
            KeyCode::Char('y') => self.sort_by(SortKey::Age, SortDirection::Ascending),
            KeyCode::Char('Y') => self.sort_by(SortKey::Age, SortDirection::Descending),
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.students
                    .set_view(self.gradebook.records(), RosterView::Registration);
                self.set_status("Showing registration order.", StatusKind::Info);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_groups_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => {
                self.clear_status();
                self.screen = Screen::Students;
            }
            KeyCode::Up => self.groups.move_selection(-1),
            KeyCode::Down => self.groups.move_selection(1),
            KeyCode::PageUp => self.groups.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.groups.move_selection(PAGE_STEP),
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::CreatingGroup(TextForm::default()));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_register(&mut self, code: KeyCode, mut form: StudentForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Registration cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_student(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::RegisteringStudent(form))
    }

    fn handle_enroll(
        &mut self,
        code: KeyCode,
        student_id: String,
        student_name: String,
        mut form: TextForm,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Enrollment cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.gradebook.enroll(&student_id, &form.value) {
                Ok(committed) => {
                    let message = format!("{student_name} enrolled in {}.", form.value.trim());
                    self.report_commit(committed, message);
                    self.refresh_views(Some(&student_id), None);
                    return Ok(Mode::Normal);
                }
                Err(err) => {
                    let message = match &err {
                        RecordsError::AlreadyEnrolled(subject) => {
                            format!("{student_name} is already enrolled in {subject}.")
                        }
                        _ => err.to_string(),
                    };
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Enrolling {
            student_id,
            student_name,
            form,
        })
    }

    fn handle_grade(&mut self, code: KeyCode, mut form: GradeForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Grading cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Up => form.move_selection(-1),
            KeyCode::Down => form.move_selection(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_grade(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Grading(form))
    }

    fn handle_create_group(&mut self, code: KeyCode, mut form: TextForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Group creation cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.gradebook.create_group(&form.value) {
                Ok(committed) => {
                    let name = committed.value.clone();
                    self.report_commit(committed, format!("Group \"{name}\" created."));
                    self.refresh_views(None, Some(&name));
                    return Ok(Mode::Normal);
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::CreatingGroup(form))
    }

    fn handle_assign_group(&mut self, code: KeyCode, mut picker: GroupPicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Group assignment cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Up => {
                picker.move_selection(-1);
                Ok(Mode::AssigningGroup(picker))
            }
            KeyCode::Down => {
                picker.move_selection(1);
                Ok(Mode::AssigningGroup(picker))
            }
            KeyCode::Enter => {
                let Some(group) = picker.current_group().map(str::to_string) else {
                    return Ok(Mode::Normal);
                };
                match self.gradebook.add_member(&group, &picker.student_id) {
                    Ok(committed) => {
                        let message =
                            format!("{} added to group \"{group}\".", picker.student_name);
                        self.report_commit(committed, message);
                        self.refresh_views(Some(&picker.student_id), Some(&group));
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = match &err {
                            RecordsError::AlreadyMember { group, .. } => format!(
                                "{} is already in group \"{group}\".",
                                picker.student_name
                            ),
                            _ => err.to_string(),
                        };
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::AssigningGroup(picker))
                    }
                }
            }
            _ => Ok(Mode::AssigningGroup(picker)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.students.set_filter(self.gradebook.records(), None);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                if state.query.trim().is_empty() {
                    let message = format!("Enter a {} to search for.", state.field.label());
                    self.set_status(message, StatusKind::Error);
                    return Ok(Mode::Searching(state));
                }
                if self.students.rows.is_empty() {
                    let message = format!(
                        "No students found with {} \"{}\".",
                        state.field.label(),
                        state.query.trim()
                    );
                    self.set_status(message, StatusKind::Error);
                } else {
                    self.clear_status();
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Up => {
                self.students.move_selection(-1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Down => {
                self.students.move_selection(1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Ok(Mode::Searching(state)),
        }

        let filter = StudentFilter {
            field: state.field,
            query: state.query.clone(),
        };
        self.students.set_filter(self.gradebook.records(), Some(filter));
        Ok(Mode::Searching(state))
    }

    fn start_search(&mut self, field: SearchField) -> Mode {
        self.clear_status();
        self.students.set_filter(self.gradebook.records(), None);
        Mode::Searching(SearchState {
            field,
            query: String::new(),
        })
    }

    fn sort_by(&mut self, key: SortKey, direction: SortDirection) {
        self.students
            .set_view(self.gradebook.records(), RosterView::Sorted(key, direction));
        self.set_status(
            format!("Sorted by {} ({}).", key.label(), direction.label()),
            StatusKind::Info,
        );
    }

    fn save_new_student(&mut self, form: &StudentForm) -> Result<()> {
        let (first_name, last_name, age) = form.parse_inputs()?;
        let committed = self
            .gradebook
            .register_student(&first_name, &last_name, age)?;
        let id = committed.value.id().to_string();
        let message = format!(
            "Student {} registered with ID: {id}",
            committed.value.full_name()
        );
        self.report_commit(committed, message);
        self.refresh_views(Some(&id), None);
        Ok(())
    }

    fn save_grade(&mut self, form: &GradeForm) -> Result<()> {
        let (subject, value) = form.parse_inputs()?;
        let committed = self.gradebook.set_grade(&form.student_id, &subject, value)?;
        let message = format!(
            "Grade {value} assigned to {} in {subject}.",
            form.student_name
        );
        self.report_commit(committed, message);
        self.refresh_views(Some(&form.student_id), None);
        Ok(())
    }

    /// Show the success message, or the save failure next to it when the
    /// change only reached memory.
    fn report_commit<T>(&mut self, committed: Committed<T>, message: String) {
        match committed.save_error {
            None => self.set_status(message, StatusKind::Info),
            Some(err) => {
                self.set_status(format!("{message} Saving failed: {err}"), StatusKind::Error)
            }
        }
    }

    fn refresh_views(&mut self, focus_student: Option<&str>, focus_group: Option<&str>) {
        let records = self.gradebook.records();
        self.students.refresh(records, focus_student);
        self.groups.refresh(records, focus_group);
    }

    fn current_student(&self) -> Option<&Student> {
        let id = self.students.current_id()?;
        self.gradebook.records().roster().find_by_id(id)
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Students => self.draw_students(frame, content_area),
            Screen::Groups => self.draw_groups(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::RegisteringStudent(form) => self.draw_student_form(frame, area, form),
            Mode::Enrolling {
                student_name, form, ..
            } => self.draw_text_form(
                frame,
                area,
                &format!("Enroll {student_name}"),
                "Subject",
                form,
            ),
            Mode::Grading(form) => self.draw_grade_form(frame, area, form),
            Mode::CreatingGroup(form) => {
                self.draw_text_form(frame, area, "Create Group", "Group name", form)
            }
            Mode::AssigningGroup(picker) => self.draw_group_picker(frame, area, picker),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_students(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.students.title());

        if self.students.rows.is_empty() {
            let text = if self.students.has_active_filter() {
                "No students match this search."
            } else {
                "No students registered yet. Press '+' to register one."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, chunks[0]);
        } else {
            let roster = self.gradebook.records().roster();
            let items: Vec<ListItem> = self
                .students
                .rows
                .iter()
                .filter_map(|id| roster.find_by_id(id))
                .map(|student| {
                    ListItem::new(Line::from(vec![
                        Span::raw(student.full_name()),
                        Span::styled(
                            format!(
                                "  age {}  avg {}",
                                student.age(),
                                format_average(student.average())
                            ),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(self.students.selected));
            frame.render_stateful_widget(list, chunks[0], &mut state);
        }

        let detail_block = Block::default().borders(Borders::ALL).title("Details");
        let lines = match self.current_student() {
            Some(student) => {
                let summary = StudentSummary::of(student);
                vec![
                    detail_line("ID", summary.id),
                    detail_line("Name", summary.full_name),
                    detail_line("Age", summary.age.to_string()),
                    detail_line("Subjects", summary.subjects),
                    detail_line("Grades", summary.grades),
                    detail_line("Average", summary.average),
                ]
            }
            None => vec![Line::from("No student selected.")],
        };
        let details = Paragraph::new(lines)
            .block(detail_block)
            .wrap(Wrap { trim: true });
        frame.render_widget(details, chunks[1]);
    }

    fn draw_groups(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let block = Block::default().borders(Borders::ALL).title("Groups");
        if self.groups.summaries.is_empty() {
            let message = Paragraph::new("No groups yet. Press '+' to create one.")
                .alignment(Alignment::Center)
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .groups
                .summaries
                .iter()
                .map(|group| {
                    ListItem::new(Line::from(vec![
                        Span::raw(group.name.clone()),
                        Span::styled(
                            format!("  {} members  avg {}", group.members.len(), group.average),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(self.groups.selected));
            frame.render_stateful_widget(list, chunks[0], &mut state);
        }

        let detail_block = Block::default().borders(Borders::ALL).title("Members");
        let lines = match self.groups.current() {
            Some(group) => {
                let mut lines = vec![
                    detail_line("Group", group.name.clone()),
                    detail_line("Average", group.average.clone()),
                    Line::from(""),
                ];
                if group.members.is_empty() {
                    lines.push(Line::from("None"));
                } else {
                    lines.extend(group.members.iter().map(|member| Line::from(member.clone())));
                }
                lines
            }
            None => vec![Line::from("No group selected.")],
        };
        let details = Paragraph::new(lines)
            .block(detail_block)
            .wrap(Wrap { trim: true });
        frame.render_widget(details, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.mode, self.screen) {
            (Mode::Searching(_), _) => key_hints(&[
                ("↑↓", "Navigate"),
                ("Enter", "Keep results"),
                ("Esc", "Clear search"),
            ]),
            (Mode::Grading(_), _) | (Mode::AssigningGroup(_), _) => key_hints(&[
                ("↑↓", "Choose"),
                ("Enter", "Save"),
                ("Esc", "Cancel"),
            ]),
            (Mode::Normal, Screen::Students) => key_hints(&[
                ("+", "Register"),
                ("e", "Enroll"),
                ("g", "Grade"),
                ("m", "Add to group"),
                ("f/l/i", "Search first/last/ID"),
                ("a/A", "Avg ↑/↓"),
                ("y/Y", "Age ↑/↓"),
                ("o", "Original order"),
                ("Tab", "Groups"),
                ("q", "Quit"),
            ]),
            (Mode::Normal, Screen::Groups) => key_hints(&[
                ("+", "Create group"),
                ("↑↓", "Navigate"),
                ("Tab", "Students"),
                ("q", "Quit"),
            ]),
            _ => key_hints(&[("Tab", "Next field"), ("Enter", "Save"), ("Esc", "Cancel")]),
        }
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, form: &StudentForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Register Student").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = StudentField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(form_hint(form.error.as_deref()));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let row = StudentField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0);
        let prefix = format!("{}: ", form.active.label()).len();
        let cursor_x = inner.x + (prefix + form.value(form.active).chars().count()) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row as u16));
    }

    fn draw_text_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        field_name: &str,
        form: &TextForm,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            form.build_line(field_name),
            Line::from(""),
            form_hint(form.error.as_deref()),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let prefix = format!("{field_name}: ").len();
        let cursor_x = inner.x + (prefix + form.value.chars().count()) as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_grade_form(&self, frame: &mut Frame, area: Rect, form: &GradeForm) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Grade {}", form.student_name))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(inner);

        let items: Vec<ListItem> = form
            .subjects
            .iter()
            .map(|subject| ListItem::new(subject.clone()))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(form.selected));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let lines = vec![form.build_line(), form_hint(form.error.as_deref())];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[1]);

        let cursor_x = chunks[1].x + ("Grade: ".len() + form.value.chars().count()) as u16;
        frame.set_cursor_position((cursor_x, chunks[1].y));
    }

    fn draw_group_picker(&self, frame: &mut Frame, area: Rect, picker: &GroupPicker) {
        let popup_area = centered_rect(50, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Add {} to group", picker.student_name))
            .borders(Borders::ALL);
        let items: Vec<ListItem> = picker
            .groups
            .iter()
            .map(|group| ListItem::new(group.clone()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(picker.selected));
        frame.render_stateful_widget(list, popup_area, &mut state);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let prompt = format!("Search by {}: ", state.field.label());
        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("{prompt}{}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + (prompt.len() + state.query.chars().count()) as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

/// Error text when the last submit failed, the key reminder otherwise.
fn form_hint(error: Option<&str>) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "Enter to save • Tab to switch • Esc to cancel",
            Style::default().fg(Color::Gray),
        )),
    }
}
