use crate::domain::{Student, StudentComparator};
use crate::utils::error::RosterError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 匯出前可選的排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SortKey {
    #[default]
    None,
    Id,
    LastName,
    AverageDesc,
}

impl SortKey {
    /// Maps the export menu's numbered options; anything unknown means no sorting.
    pub fn from_menu_choice(choice: i64) -> Self {
        match choice {
            2 => SortKey::Id,
            3 => SortKey::LastName,
            4 => SortKey::AverageDesc,
            _ => SortKey::None,
        }
    }

    pub fn as_comparator(&self) -> Option<&dyn StudentComparator> {
        match self {
            SortKey::None => None,
            _ => Some(self),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SortKey::None => "no sorting",
            SortKey::Id => "by ID",
            SortKey::LastName => "by last name",
            SortKey::AverageDesc => "by average grade (descending)",
        }
    }
}

impl StudentComparator for SortKey {
    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        match self {
            SortKey::None => Ordering::Equal,
            SortKey::Id => a.id().cmp(&b.id()),
            SortKey::LastName => a
                .last_name()
                .to_lowercase()
                .cmp(&b.last_name().to_lowercase())
                .then_with(|| {
                    a.first_name()
                        .to_lowercase()
                        .cmp(&b.first_name().to_lowercase())
                }),
            SortKey::AverageDesc => b
                .calculate_average_grade()
                .total_cmp(&a.calculate_average_grade()),
        }
    }
}

impl FromStr for SortKey {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "none" => Ok(SortKey::None),
            "id" => Ok(SortKey::Id),
            "last-name" => Ok(SortKey::LastName),
            "average-desc" => Ok(SortKey::AverageDesc),
            other => Err(RosterError::invalid_argument(format!(
                "unknown sort order '{}', expected one of: none, id, last-name, average-desc",
                other
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::None => "none",
            SortKey::Id => "id",
            SortKey::LastName => "last-name",
            SortKey::AverageDesc => "average-desc",
        };
        f.write_str(name)
    }
}
