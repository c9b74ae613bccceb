use anyhow::Result;
use school_roster::{ConsoleMenu, LocalStorage, PersistenceService, Student};
use std::io::Cursor;
use tempfile::TempDir;

fn service(temp_dir: &TempDir) -> PersistenceService {
    PersistenceService::new(LocalStorage::new(
        temp_dir.path().to_string_lossy().to_string(),
    ))
}

/// 以腳本輸入驅動選單，回傳輸出文字
fn run_menu(temp_dir: &TempDir, script: &str) -> Result<(String, Vec<Student>)> {
    let mut output = Vec::new();
    let mut menu = ConsoleMenu::new(
        service(temp_dir),
        "school_data.json",
        Cursor::new(script.as_bytes().to_vec()),
        &mut output,
    )?;
    menu.run()?;
    let students = menu.into_state().school().students();
    Ok((String::from_utf8(output)?, students))
}

#[test]
fn test_menu_session_adds_grades_and_saves() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = [
        "1", "7", "Zara", "Alpha", // add student
        "1", "0", "-2", "8", "Adam", "Beta", // rejected ids, then add
        "6", "7", "Math", "15", "10", // invalid grade, then 10
        "6", "7", "math", "12", // overwrite
        "8", "7", // student average
        "9", // school average
        "0",
    ]
    .join("\n");

    let (output, students) = run_menu(&temp_dir, &script)?;

    assert!(output.contains("ID must be a positive number."));
    assert!(output.contains("Invalid grade."));
    assert!(output.contains("Average grade for Zara Alpha (ID: 7): 12.00"));
    assert!(output.contains("Average grade for school 'Default School Name': 12.00"));

    let ids: Vec<i64> = students.iter().map(Student::id).collect();
    assert_eq!(ids, vec![8, 7]);

    let saved = service(&temp_dir).import_from_file("school_data.json")?;
    let zara = saved.student_by_id(7).expect("zara saved");
    assert_eq!(zara.disciplines().len(), 1);
    assert_eq!(zara.disciplines()[0].grade(), 12);
    Ok(())
}

#[test]
fn test_menu_duplicate_id_is_refused() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = ["1", "3", "Zara", "Alpha", "1", "3", "4", "Adam", "Beta", "0"].join("\n");

    let (output, students) = run_menu(&temp_dir, &script)?;

    assert!(output.contains("Student with ID 3 already exists."));
    assert_eq!(students.len(), 2);
    Ok(())
}

#[test]
fn test_menu_update_keeps_blank_fields_and_disciplines() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = [
        "1", "1", "Zara", "Alpha", "6", "1", "Art", "9", "4", "1", "", "Omega", "3", "1", "0",
    ]
    .join("\n");

    let (output, students) = run_menu(&temp_dir, &script)?;

    assert!(output.contains("Student updated."));
    assert_eq!(students[0].first_name(), "Zara");
    assert_eq!(students[0].last_name(), "Omega");
    assert_eq!(students[0].disciplines().len(), 1);
    Ok(())
}

#[test]
fn test_menu_sorted_export_and_import() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = [
        "1", "9", "Zara", "Alpha", "1", "2", "Adam", "Beta", // two students
        "10", "2", "by_id", // export sorted by id to by_id.json
        "5", "9", // remove student 9
        "11", "no", // import cancelled
        "11", "yes", "by_id", // import restores both
        "0",
    ]
    .join("\n");

    let (output, students) = run_menu(&temp_dir, &script)?;

    assert!(output.contains("School data exported to by_id.json."));
    assert!(output.contains("Import cancelled."));
    let ids: Vec<i64> = students.iter().map(Student::id).collect();
    assert_eq!(ids, vec![2, 9]);
    Ok(())
}

#[test]
fn test_menu_remove_discipline_and_unknown_student() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = [
        "1", "4", "Eve", "Gamma", "6", "4", "History", "7", "7", "4", "HISTORY", "7", "4", "3",
        "42", "abc", "0",
    ]
    .join("\n");

    let (output, students) = run_menu(&temp_dir, &script)?;

    assert!(output.contains("Discipline 'HISTORY' removed for Eve."));
    assert!(output.contains("Eve has no disciplines to remove."));
    assert!(output.contains("Student with ID 42 not found."));
    assert!(output.contains("Invalid input. Please enter a whole number."));
    assert!(students[0].disciplines().is_empty());
    Ok(())
}

#[test]
fn test_menu_corrupt_data_file_starts_unnamed_school() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("school_data.json"), "not json at all")?;

    let (output, students) = run_menu(&temp_dir, "")?;

    assert!(output.contains("Current school: Unnamed School"));
    assert!(students.is_empty());
    Ok(())
}
