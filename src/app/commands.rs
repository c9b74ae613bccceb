use crate::app::export_file_name;
use crate::app::state::AppState;
use crate::config::{Command, Settings};
use crate::core::report::write_average_report;
use crate::domain::{Discipline, Storage, Student};
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{ensure_json_extension, validate_range, MAX_GRADE, MIN_GRADE};
use std::io::Write;

/// 執行單一子命令：載入資料檔、套用操作，有變更時寫回
///
/// Commands that change the school only report success once the data file is saved.
pub fn execute<W: Write>(command: Command, settings: &Settings, out: &mut W) -> Result<()> {
    let service = settings.persistence()?;
    let mut state = AppState::load(&service, &settings.data_file)?;
    tracing::debug!("Executing {:?} against {}", command, state.data_file());

    let saved_message = match command {
        Command::AddStudent {
            id,
            first_name,
            last_name,
        } => {
            let student = Student::new(id, first_name.trim(), last_name.trim())?;
            if !state.school_mut().add_student(student.clone()) {
                return Err(RosterError::invalid_argument(format!(
                    "Student with ID {} already exists.",
                    id
                )));
            }
            Some(format!("Student added: {}", student))
        }
        Command::List => {
            let students = state.school().students();
            if students.is_empty() {
                writeln!(out, "No students in {}.", state.school().name())?;
            }
            for student in &students {
                writeln!(out, "{}", student)?;
            }
            None
        }
        Command::Show { id } => {
            let student = find_student(&state, id)?;
            writeln!(out, "{}", student)?;
            None
        }
        Command::UpdateStudent { id, first, last } => {
            let existing = find_student(&state, id)?;
            let first = non_blank_or(first, existing.first_name());
            let last = non_blank_or(last, existing.last_name());

            let mut updated = Student::new(existing.id(), &first, &last)?;
            updated.set_disciplines(&existing.disciplines());
            state.school_mut().update_student(updated);
            Some(format!("Student {} updated.", id))
        }
        Command::RemoveStudent { id } => {
            if !state.school_mut().remove_student(id) {
                return Err(not_found(id));
            }
            Some(format!("Student {} removed.", id))
        }
        Command::SetGrade {
            id,
            discipline,
            grade,
        } => {
            validate_range("Grade", grade, MIN_GRADE, MAX_GRADE)?;
            let mut student = find_student(&state, id)?;
            let discipline = Discipline::new(discipline.trim(), grade)?;
            let message = format!(
                "Discipline '{}' set for {}.",
                discipline,
                student.first_name()
            );
            student.add_or_update_discipline(discipline);
            state.school_mut().update_student(student);
            Some(message)
        }
        Command::RemoveGrade { id, discipline } => {
            let mut student = find_student(&state, id)?;
            if !student.remove_discipline(&discipline) {
                return Err(RosterError::invalid_argument(format!(
                    "Discipline '{}' not found for student {}.",
                    discipline, id
                )));
            }
            state.school_mut().update_student(student);
            Some(format!(
                "Discipline '{}' removed from student {}.",
                discipline, id
            ))
        }
        Command::StudentAverage { id } => {
            let student = find_student(&state, id)?;
            writeln!(
                out,
                "Average grade for {} {} (ID: {}): {:.2}",
                student.first_name(),
                student.last_name(),
                student.id(),
                student.calculate_average_grade()
            )?;
            None
        }
        Command::SchoolAverage => {
            writeln!(
                out,
                "Average grade for school '{}': {:.2}",
                state.school().name(),
                state.school().calculate_school_average_grade()
            )?;
            None
        }
        Command::RenameSchool { name } => {
            state.school_mut().set_name(name.trim())?;
            Some(format!("School renamed to {}.", state.school().name()))
        }
        Command::Export { file, sort } => {
            let file = export_file_name(file.as_deref(), state.data_file());
            let sort = sort.unwrap_or(settings.default_sort);
            service.export_to_file(state.school(), &file, sort.as_comparator())?;
            writeln!(out, "Exported {} ({}).", file, sort.description())?;
            None
        }
        Command::Import { file } => {
            let file = ensure_json_extension(file.trim());
            // 匯入來源不存在時不可覆寫現有資料檔
            if !matches!(service.storage().file_len(&file)?, Some(len) if len > 0) {
                return Err(RosterError::invalid_argument(format!(
                    "Import file {} not found or empty; the data file was left unchanged.",
                    file
                )));
            }
            let school = service.import_from_file(&file)?;
            let message = format!(
                "Imported {} with {} students.",
                school.name(),
                school.student_count()
            );
            state.replace_school(school);
            Some(message)
        }
        Command::Report { output } => {
            match output {
                Some(path) => {
                    let mut buffer = Vec::new();
                    write_average_report(state.school(), &mut buffer)?;
                    service.storage().write_file(&path, &buffer)?;
                    writeln!(out, "Report written to {}.", path)?;
                }
                None => write_average_report(state.school(), &mut *out)?,
            }
            None
        }
    };

    if let Some(message) = saved_message {
        state.save(&service)?;
        writeln!(out, "{}", message)?;
    }
    Ok(())
}

fn find_student(state: &AppState, id: i64) -> Result<Student> {
    state.school().student_by_id(id).ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> RosterError {
    RosterError::invalid_argument(format!("Student with ID {} not found.", id))
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

