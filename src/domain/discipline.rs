use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{is_typical_grade, validate_non_empty_string, MAX_GRADE, MIN_GRADE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一門學科及其成績
///
/// Equality compares the name exactly (case-sensitive). Lookups by name inside
/// [`Student`](crate::domain::Student) are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DisciplineRecord")]
pub struct Discipline {
    name: String,
    grade: i32,
}

#[derive(Deserialize)]
struct DisciplineRecord {
    name: String,
    grade: i32,
}

impl Discipline {
    pub fn new(name: &str, grade: i32) -> Result<Self> {
        validate_non_empty_string("Discipline name", name)?;
        warn_if_atypical(name, grade);
        Ok(Self {
            name: name.to_string(),
            grade,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grade(&self) -> i32 {
        self.grade
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        validate_non_empty_string("Discipline name", name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Out-of-range grades are stored as given; only a warning is logged.
    pub fn set_grade(&mut self, grade: i32) {
        warn_if_atypical(&self.name, grade);
        self.grade = grade;
    }
}

fn warn_if_atypical(name: &str, grade: i32) {
    if !is_typical_grade(grade) {
        tracing::warn!(
            "⚠️ Grade {} for {} is outside the typical range ({}-{})",
            grade,
            name,
            MIN_GRADE,
            MAX_GRADE
        );
    }
}

impl TryFrom<DisciplineRecord> for Discipline {
    type Error = RosterError;

    fn try_from(record: DisciplineRecord) -> Result<Self> {
        Discipline::new(&record.name, record.grade)
    }
}

impl PartialEq for Discipline {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Discipline {}

impl std::hash::Hash for Discipline {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.grade)
    }
}
