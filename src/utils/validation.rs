use crate::utils::error::{RosterError, Result};

pub const MIN_GRADE: i32 = 1;
pub const MAX_GRADE: i32 = 12;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RosterError::invalid_argument(format!(
            "{} cannot be empty.",
            field_name
        )));
    }
    Ok(())
}

pub fn validate_positive_id(field_name: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(RosterError::invalid_argument(format!(
            "{} must be positive.",
            field_name
        )));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(RosterError::invalid_argument(format!(
            "{} cannot be empty.",
            field_name
        )));
    }

    if path.contains('\0') {
        return Err(RosterError::invalid_argument(format!(
            "{} contains null bytes.",
            field_name
        )));
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RosterError::invalid_argument(format!(
            "{} {} is outside the range {}-{}.",
            field_name, value, min, max
        )));
    }
    Ok(())
}

/// 成績是否落在常見範圍 (1-12)，只用於警告，不拒絕
pub fn is_typical_grade(grade: i32) -> bool {
    (MIN_GRADE..=MAX_GRADE).contains(&grade)
}

/// Appends `.json` unless the name already ends with it (case-insensitive).
pub fn ensure_json_extension(file_name: &str) -> String {
    if file_name.to_lowercase().ends_with(".json") {
        file_name.to_string()
    } else {
        format!("{}.json", file_name)
    }
}
