use crate::domain::{same_name, Discipline};
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{validate_non_empty_string, validate_positive_id};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 學生：以 id 識別，擁有自己的學科清單
///
/// Two students are equal when their ids match, whatever their names.
/// Disciplines are unique by case-insensitive name and keep first-insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StudentRecord")]
pub struct Student {
    id: i64,
    first_name: String,
    last_name: String,
    disciplines: Vec<Discipline>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentRecord {
    id: i64,
    first_name: String,
    last_name: String,
    #[serde(default)]
    disciplines: Vec<Discipline>,
}

impl Student {
    pub fn new(id: i64, first_name: &str, last_name: &str) -> Result<Self> {
        validate_positive_id("Student ID", id)?;
        validate_non_empty_string("First name", first_name)?;
        validate_non_empty_string("Last name", last_name)?;
        Ok(Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            disciplines: Vec::new(),
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns a copy; changing it does not touch this student.
    pub fn disciplines(&self) -> Vec<Discipline> {
        self.disciplines.clone()
    }

    pub fn discipline_count(&self) -> usize {
        self.disciplines.len()
    }

    pub fn set_first_name(&mut self, first_name: &str) -> Result<()> {
        validate_non_empty_string("First name", first_name)?;
        self.first_name = first_name.to_string();
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: &str) -> Result<()> {
        validate_non_empty_string("Last name", last_name)?;
        self.last_name = last_name.to_string();
        Ok(())
    }

    /// Replaces the disciplines with a copy of `disciplines`.
    /// Entries whose names match case-insensitively collapse into one, last grade wins.
    pub fn set_disciplines(&mut self, disciplines: &[Discipline]) {
        self.disciplines.clear();
        for discipline in disciplines {
            self.add_or_update_discipline(discipline.clone());
        }
    }

    /// Overwrites the grade of a discipline with the same name (case-insensitive),
    /// or appends it. `None` is ignored with a warning.
    pub fn add_or_update_discipline(&mut self, discipline: impl Into<Option<Discipline>>) {
        let Some(discipline) = discipline.into() else {
            tracing::warn!("Cannot add a missing discipline to student {}", self.id);
            return;
        };

        match self
            .disciplines
            .iter_mut()
            .find(|d| same_name(d.name(), discipline.name()))
        {
            Some(existing) => {
                tracing::debug!(
                    "Updating {} for student {}: {} -> {}",
                    existing.name(),
                    self.id,
                    existing.grade(),
                    discipline.grade()
                );
                existing.set_grade(discipline.grade());
            }
            None => {
                tracing::debug!("Adding {} to student {}", discipline, self.id);
                self.disciplines.push(discipline);
            }
        }
    }

    /// Returns whether a discipline matching `name` (case-insensitive) was removed.
    pub fn remove_discipline(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        let before = self.disciplines.len();
        self.disciplines.retain(|d| !same_name(d.name(), name));
        before != self.disciplines.len()
    }

    /// Mean of all grades, or 0.0 when there are no disciplines.
    pub fn calculate_average_grade(&self) -> f64 {
        if self.disciplines.is_empty() {
            return 0.0;
        }
        let sum: i64 = self.disciplines.iter().map(|d| i64::from(d.grade())).sum();
        sum as f64 / self.disciplines.len() as f64
    }
}

impl TryFrom<StudentRecord> for Student {
    type Error = RosterError;

    fn try_from(record: StudentRecord) -> Result<Self> {
        let mut student = Student::new(record.id, &record.first_name, &record.last_name)?;
        student.set_disciplines(&record.disciplines);
        Ok(student)
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Student {}

impl std::hash::Hash for Student {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let disciplines: Vec<String> = self.disciplines.iter().map(|d| d.to_string()).collect();
        write!(
            f,
            "#{} {} {} (average {:.2}) [{}]",
            self.id,
            self.first_name,
            self.last_name,
            self.calculate_average_grade(),
            disciplines.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discipline(name: &str, grade: i32) -> Discipline {
        Discipline::new(name, grade).unwrap()
    }

    #[test]
    fn test_new_exposes_values() {
        let student = Student::new(10, "Zara", "Alpha").unwrap();
        assert_eq!(student.id(), 10);
        assert_eq!(student.first_name(), "Zara");
        assert_eq!(student.last_name(), "Alpha");
        assert!(student.disciplines().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_input() {
        for (id, first, last) in [
            (0, "Zara", "Alpha"),
            (-1, "Zara", "Alpha"),
            (1, "", "Alpha"),
            (1, "  ", "Alpha"),
            (1, "Zara", ""),
            (1, "Zara", "\t"),
        ] {
            assert!(
                matches!(
                    Student::new(id, first, last),
                    Err(RosterError::InvalidArgument { .. })
                ),
                "expected rejection for ({}, {:?}, {:?})",
                id,
                first,
                last
            );
        }
    }

    #[test]
    fn test_setters_validate() {
        let mut student = Student::new(1, "Adam", "Beta").unwrap();
        assert!(student.set_first_name(" ").is_err());
        assert!(student.set_last_name("").is_err());
        assert_eq!(student.first_name(), "Adam");

        student.set_first_name("Eve").unwrap();
        student.set_last_name("Gamma").unwrap();
        assert_eq!(student.first_name(), "Eve");
        assert_eq!(student.last_name(), "Gamma");
    }

    #[test]
    fn test_add_or_update_overwrites_case_insensitively() {
        let mut student = Student::new(1, "Adam", "Beta").unwrap();
        student.add_or_update_discipline(discipline("Math", 5));
        student.add_or_update_discipline(discipline("Physics", 8));
        student.add_or_update_discipline(discipline("MATH", 11));

        let disciplines = student.disciplines();
        assert_eq!(disciplines.len(), 2);
        assert_eq!(disciplines[0].name(), "Math");
        assert_eq!(disciplines[0].grade(), 11);
        assert_eq!(disciplines[1].name(), "Physics");
        assert_eq!(student.calculate_average_grade(), 9.5);
    }

    #[test]
    fn test_add_missing_discipline_is_ignored() {
        let mut student = Student::new(1, "Adam", "Beta").unwrap();
        student.add_or_update_discipline(None::<Discipline>);
        assert_eq!(student.discipline_count(), 0);
    }

    #[test]
    fn test_remove_discipline() {
        let mut student = Student::new(1, "Adam", "Beta").unwrap();
        student.add_or_update_discipline(discipline("History", 7));

        assert!(!student.remove_discipline(""));
        assert!(!student.remove_discipline("  "));
        assert!(!student.remove_discipline("Biology"));
        assert!(student.remove_discipline("history"));
        assert!(student.disciplines().is_empty());
    }

    #[test]
    fn test_average_grade() {
        let mut student = Student::new(1, "Adam", "Beta").unwrap();
        assert_eq!(student.calculate_average_grade(), 0.0);

        student.add_or_update_discipline(discipline("Math", 10));
        student.add_or_update_discipline(discipline("Art", 7));
        assert_eq!(student.calculate_average_grade(), 8.5);
    }

    #[test]
    fn test_disciplines_returns_copy() {
        let mut student = Student::new(1, "Adam", "Beta").unwrap();
        student.add_or_update_discipline(discipline("Math", 10));

        let mut copy = student.disciplines();
        copy.clear();
        copy.push(discipline("Chemistry", 2));

        let again = student.disciplines();
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].name(), "Math");
    }

    #[test]
    fn test_set_disciplines_collapses_duplicates() {
        let mut student = Student::new(1, "Adam", "Beta").unwrap();
        student.set_disciplines(&[discipline("Math", 3), discipline("math", 9)]);

        let disciplines = student.disciplines();
        assert_eq!(disciplines.len(), 1);
        assert_eq!(disciplines[0].grade(), 9);
    }

    #[test]
    fn test_equality_is_by_id() {
        let a = Student::new(3, "Adam", "Beta").unwrap();
        let b = Student::new(3, "Eve", "Gamma").unwrap();
        let c = Student::new(4, "Adam", "Beta").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_json_field_names() {
        let mut student = Student::new(5, "Adam", "Beta").unwrap();
        student.add_or_update_discipline(discipline("Physics", 9));

        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 5,
                "firstName": "Adam",
                "lastName": "Beta",
                "disciplines": [{"name": "Physics", "grade": 9}]
            })
        );
    }

    #[test]
    fn test_deserialize_defaults_and_validation() {
        let student: Student =
            serde_json::from_str(r#"{"id":2,"firstName":"Eve","lastName":"Gamma","nickname":"E"}"#)
                .unwrap();
        assert!(student.disciplines().is_empty());

        assert!(serde_json::from_str::<Student>(
            r#"{"id":0,"firstName":"Eve","lastName":"Gamma"}"#
        )
        .is_err());
    }
}
