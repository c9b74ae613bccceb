use crate::domain::{Student, StudentComparator};
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::validate_non_empty_string;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 學校：擁有學生清單的聚合根
///
/// Students are unique by id when added through [`School::add_student`].
/// [`School::set_students`] is a trusted bulk load and skips that check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchoolRecord")]
pub struct School {
    name: String,
    students: Vec<Student>,
}

#[derive(Deserialize)]
struct SchoolRecord {
    name: String,
    #[serde(default)]
    students: Vec<Student>,
}

impl School {
    pub fn new(name: &str) -> Result<Self> {
        validate_non_empty_string("School name", name)?;
        Ok(Self {
            name: name.to_string(),
            students: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        validate_non_empty_string("School name", name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Returns a copy of the students in their current order.
    pub fn students(&self) -> Vec<Student> {
        self.students.clone()
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Replaces the students with a copy of `students`. Ids are not re-checked.
    pub fn set_students(&mut self, students: &[Student]) {
        self.students = students.to_vec();
    }

    /// Appends the student unless it is missing or its id is taken.
    pub fn add_student(&mut self, student: impl Into<Option<Student>>) -> bool {
        let Some(student) = student.into() else {
            tracing::warn!("Cannot add a missing student");
            return false;
        };
        if self.students.iter().any(|s| s.id() == student.id()) {
            tracing::warn!("Student with ID {} already exists", student.id());
            return false;
        }
        tracing::debug!("Adding student {}", student.id());
        self.students.push(student);
        true
    }

    pub fn student_by_id(&self, id: i64) -> Option<Student> {
        self.students.iter().find(|s| s.id() == id).cloned()
    }

    /// Replaces the stored student with the same id. The replacement moves to the end.
    pub fn update_student(&mut self, updated: Student) -> bool {
        let Some(position) = self.students.iter().position(|s| s.id() == updated.id()) else {
            tracing::debug!("No student with ID {} to update", updated.id());
            return false;
        };
        self.students.remove(position);
        self.students.push(updated);
        true
    }

    pub fn remove_student(&mut self, id: i64) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id() != id);
        before != self.students.len()
    }

    /// Mean of the student averages, skipping students whose average is 0.0.
    pub fn calculate_school_average_grade(&self) -> f64 {
        let averages: Vec<f64> = self
            .students
            .iter()
            .map(Student::calculate_average_grade)
            .filter(|avg| *avg != 0.0)
            .collect();

        if averages.is_empty() {
            return 0.0;
        }
        averages.iter().sum::<f64>() / averages.len() as f64
    }

    /// Stable in-place sort by the given ordering.
    pub fn sort_students(&mut self, comparator: &dyn StudentComparator) {
        self.students.sort_by(|a, b| comparator.compare(a, b));
    }
}

impl TryFrom<SchoolRecord> for School {
    type Error = RosterError;

    fn try_from(record: SchoolRecord) -> Result<Self> {
        let mut school = School::new(&record.name)?;
        let mut seen = HashSet::new();
        for student in &record.students {
            if !seen.insert(student.id()) {
                tracing::warn!(
                    "Imported school {} lists student ID {} more than once",
                    record.name,
                    student.id()
                );
            }
        }
        school.set_students(&record.students);
        Ok(school)
    }
}

impl PartialEq for School {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.students == other.students
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} students, average {:.2})",
            self.name,
            self.students.len(),
            self.calculate_school_average_grade()
        )
    }
}
