use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Student;

/// Render `Name: value` with the active/placeholder styling shared by every
/// form.
fn field_line(field_name: &str, value: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<required>".to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Internal representation of the "register student" form fields.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) age: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

/// Fields available within the student form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum StudentField {
    #[default]
    FirstName,
    LastName,
    Age,
}

impl StudentField {
    pub(crate) const ALL: [StudentField; 3] =
        [StudentField::FirstName, StudentField::LastName, StudentField::Age];

    pub(crate) fn label(self) -> &'static str {
        match self {
            StudentField::FirstName => "First name",
            StudentField::LastName => "Last name",
            StudentField::Age => "Age",
        }
    }
}

impl StudentForm {
    /// Switch focus to a particular field.
    pub(crate) fn focus(&mut self, field: StudentField) {
        self.active = field;
    }

    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            StudentField::FirstName => StudentField::LastName,
            StudentField::LastName => StudentField::Age,
            StudentField::Age => StudentField::FirstName,
        };
    }

    pub(crate) fn prev_field(&mut self) {
        self.active = match self.active {
            StudentField::FirstName => StudentField::Age,
            StudentField::LastName => StudentField::FirstName,
            StudentField::Age => StudentField::LastName,
        };
    }

    /// Append a character to the active field. The age only takes digits.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            StudentField::Age => {
                if ch.is_ascii_digit() {
                    self.age.push(ch);
                    true
                } else {
                    false
                }
            }
            field => {
                if ch.is_control() {
                    return false;
                }
                self.value_mut(field).push(ch);
                true
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Parse the age; name presence and positivity are checked by the roster.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, i64)> {
        let age_raw = self.age.trim();
        if age_raw.is_empty() {
            return Err(anyhow!("Age is required."));
        }
        let age = age_raw
            .parse::<i64>()
            .context("Age must be a whole number.")?;
        Ok((self.first_name.clone(), self.last_name.clone(), age))
    }

    pub(crate) fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::FirstName => &self.first_name,
            StudentField::LastName => &self.last_name,
            StudentField::Age => &self.age,
        }
    }

    fn value_mut(&mut self, field: StudentField) -> &mut String {
        match field {
            StudentField::FirstName => &mut self.first_name,
            StudentField::LastName => &mut self.last_name,
            StudentField::Age => &mut self.age,
        }
    }

    pub(crate) fn build_line(&self, field: StudentField) -> Line<'static> {
        field_line(field.label(), self.value(field), self.active == field)
    }
}

/// Single free-text field, used for subject and group names.
#[derive(Default, Clone)]
pub(crate) struct TextForm {
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

impl TextForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            false
        } else {
            self.value.push(ch);
            true
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn build_line(&self, field_name: &str) -> Line<'static> {
        field_line(field_name, &self.value, true)
    }
}

/// Subject picker plus grade input for one student.
#[derive(Clone)]
pub(crate) struct GradeForm {
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) subjects: Vec<String>,
    pub(crate) selected: usize,
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

impl GradeForm {
    /// `None` when the student has no enrolled subjects to grade.
    pub(crate) fn for_student(student: &Student) -> Option<Self> {
        let subjects: Vec<String> = student.enrolled_subjects().map(str::to_string).collect();
        if subjects.is_empty() {
            return None;
        }
        Some(Self {
            student_id: student.id().to_string(),
            student_name: student.first_name().to_string(),
            subjects,
            selected: 0,
            value: String::new(),
            error: None,
        })
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.subjects.len() as isize;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn current_subject(&self) -> Option<&str> {
        self.subjects.get(self.selected).map(String::as_str)
    }

    /// Digits and a single decimal point.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() || (ch == '.' && !self.value.contains('.')) {
            self.value.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    /// Parse the grade; the 0..=100 range is enforced by the student record.
    pub(crate) fn parse_inputs(&self) -> Result<(String, f64)> {
        let subject = self
            .current_subject()
            .ok_or_else(|| anyhow!("Select a subject."))?
            .to_string();
        let raw = self.value.trim();
        if raw.is_empty() {
            return Err(anyhow!("Grade is required."));
        }
        let value = raw.parse::<f64>().context("Grade must be a number.")?;
        Ok((subject, value))
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line("Grade", &self.value, true)
    }
}

/// Group picker for assigning the selected student.
#[derive(Clone)]
pub(crate) struct GroupPicker {
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) groups: Vec<String>,
    pub(crate) selected: usize,
}

impl GroupPicker {
    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.groups.len() as isize;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn current_group(&self) -> Option<&str> {
        self.groups.get(self.selected).map(String::as_str)
    }
}
