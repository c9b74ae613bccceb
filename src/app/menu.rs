use crate::app::export_file_name;
use crate::app::sorting::SortKey;
use crate::app::state::AppState;
use crate::config::cli::LocalStorage;
use crate::core::PersistenceService;
use crate::domain::{Discipline, School, Storage, Student};
use crate::utils::error::Result;
use crate::utils::validation::{ensure_json_extension, is_typical_grade, MAX_GRADE, MIN_GRADE};
use std::io::{BufRead, Write};

pub const UNNAMED_SCHOOL_NAME: &str = "Unnamed School";

/// 互動式文字選單，輸入輸出皆可替換以便測試
pub struct ConsoleMenu<R: BufRead, W: Write, S: Storage = LocalStorage> {
    state: AppState,
    service: PersistenceService<S>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write, S: Storage> ConsoleMenu<R, W, S> {
    /// Loads the data file; a failed import starts an empty, unnamed school instead.
    pub fn new(service: PersistenceService<S>, data_file: &str, input: R, output: W) -> Result<Self> {
        let state = match AppState::load(&service, data_file) {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(
                    "❌ Could not load {}: {}. Starting a new school.",
                    data_file,
                    e
                );
                AppState::new(School::new(UNNAMED_SCHOOL_NAME)?, data_file)
            }
        };
        tracing::info!("Loaded school: {}", state.school().name());

        Ok(Self {
            state,
            service,
            input,
            output,
        })
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Runs until the user picks 0 or input ends; both save to the data file.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.display_menu()?;
            let choice = self.prompt_int("Enter your choice: ")?.unwrap_or(0);

            let result = match choice {
                1 => self.add_student(),
                2 => self.view_all_students(),
                3 => self.find_student_by_id(),
                4 => self.update_student(),
                5 => self.remove_student(),
                6 => self.add_discipline_to_student(),
                7 => self.remove_discipline_from_student(),
                8 => self.calculate_student_average(),
                9 => self.calculate_school_average(),
                10 => self.export_data(),
                11 => self.import_data(),
                0 => {
                    self.save_on_exit()?;
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Ok(())
                }
            };

            if let Err(e) = result {
                tracing::warn!("Menu action failed: {}", e);
                writeln!(self.output, "❌ {}", e.user_friendly_message())?;
            }
            writeln!(self.output, "------------------------------------")?;
        }
    }

    fn display_menu(&mut self) -> Result<()> {
        let out = &mut self.output;
        writeln!(out)?;
        writeln!(out, "--- School management menu ---")?;
        writeln!(out, "Current school: {}", self.state.school().name())?;
        writeln!(out, "1. Add student")?;
        writeln!(out, "2. View all students")?;
        writeln!(out, "3. Find student by ID")?;
        writeln!(out, "4. Update student")?;
        writeln!(out, "5. Remove student")?;
        writeln!(out, "6. Add/update discipline for student")?;
        writeln!(out, "7. Remove discipline from student")?;
        writeln!(out, "8. Student average grade")?;
        writeln!(out, "9. School average grade")?;
        writeln!(out, "10. Export to JSON (with sorting options)")?;
        writeln!(out, "11. Import from JSON")?;
        writeln!(out, "0. Save and exit")?;
        writeln!(out, "------------------------------------")?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    /// `None` means input ended.
    fn prompt_int(&mut self, prompt: &str) -> Result<Option<i64>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<i64>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a whole number.")?,
            }
        }
    }

    fn prompt_text(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            if !line.is_empty() {
                return Ok(Some(line));
            }
            writeln!(self.output, "Input cannot be empty. Please try again.")?;
        }
    }

    fn prompt_grade(&mut self, prompt: &str) -> Result<Option<i32>> {
        let prompt = format!("{} ({}-{}): ", prompt, MIN_GRADE, MAX_GRADE);
        loop {
            let Some(value) = self.prompt_int(&prompt)? else {
                return Ok(None);
            };
            match i32::try_from(value) {
                Ok(grade) if is_typical_grade(grade) => return Ok(Some(grade)),
                _ => writeln!(
                    self.output,
                    "Invalid grade. Please enter a value from {} to {}.",
                    MIN_GRADE, MAX_GRADE
                )?,
            }
        }
    }

    /// Prompts for an id and looks the student up, reporting when it is missing.
    fn prompt_existing_student(&mut self, prompt: &str) -> Result<Option<Student>> {
        let Some(id) = self.prompt_int(prompt)? else {
            return Ok(None);
        };
        let student = self.state.school().student_by_id(id);
        if student.is_none() {
            writeln!(self.output, "Student with ID {} not found.", id)?;
        }
        Ok(student)
    }

    fn add_student(&mut self) -> Result<()> {
        writeln!(self.output, "--- Add a new student ---")?;
        let id = loop {
            let Some(id) = self.prompt_int("Enter student ID: ")? else {
                return Ok(());
            };
            if id <= 0 {
                writeln!(self.output, "ID must be a positive number.")?;
            } else if self.state.school().student_by_id(id).is_some() {
                writeln!(
                    self.output,
                    "Student with ID {} already exists. Please use another ID.",
                    id
                )?;
            } else {
                break id;
            }
        };
        let Some(first_name) = self.prompt_text("Enter first name: ")? else {
            return Ok(());
        };
        let Some(last_name) = self.prompt_text("Enter last name: ")? else {
            return Ok(());
        };

        let student = Student::new(id, &first_name, &last_name)?;
        if self.state.school_mut().add_student(student.clone()) {
            writeln!(self.output, "Student added: {}", student)?;
        } else {
            writeln!(self.output, "Could not add the student.")?;
        }
        Ok(())
    }

    fn view_all_students(&mut self) -> Result<()> {
        writeln!(self.output, "--- All students ---")?;
        let students = self.state.school().students();
        if students.is_empty() {
            writeln!(self.output, "There are no students in the school.")?;
        }
        for student in &students {
            writeln!(self.output, "{}", student)?;
        }
        Ok(())
    }

    fn find_student_by_id(&mut self) -> Result<()> {
        writeln!(self.output, "--- Find student by ID ---")?;
        if let Some(student) = self.prompt_existing_student("Enter student ID to find: ")? {
            writeln!(self.output, "Student found: {}", student)?;
        }
        Ok(())
    }

    fn update_student(&mut self) -> Result<()> {
        writeln!(self.output, "--- Update student ---")?;
        let Some(existing) = self.prompt_existing_student("Enter student ID to update: ")? else {
            return Ok(());
        };
        writeln!(self.output, "Found student: {}", existing)?;

        let first_prompt = format!(
            "Enter new first name (or press Enter to keep '{}'): ",
            existing.first_name()
        );
        let first_name = match self.prompt_line(&first_prompt)? {
            Some(name) if !name.is_empty() => name,
            _ => existing.first_name().to_string(),
        };
        let last_prompt = format!(
            "Enter new last name (or press Enter to keep '{}'): ",
            existing.last_name()
        );
        let last_name = match self.prompt_line(&last_prompt)? {
            Some(name) if !name.is_empty() => name,
            _ => existing.last_name().to_string(),
        };

        let mut updated = Student::new(existing.id(), &first_name, &last_name)?;
        updated.set_disciplines(&existing.disciplines());
        if self.state.school_mut().update_student(updated) {
            writeln!(self.output, "Student updated.")?;
        } else {
            writeln!(self.output, "Could not update the student.")?;
        }
        Ok(())
    }

    fn remove_student(&mut self) -> Result<()> {
        writeln!(self.output, "--- Remove student ---")?;
        let Some(id) = self.prompt_int("Enter student ID to remove: ")? else {
            return Ok(());
        };
        if self.state.school_mut().remove_student(id) {
            writeln!(self.output, "Student with ID {} removed.", id)?;
        } else {
            writeln!(self.output, "Student with ID {} not found.", id)?;
        }
        Ok(())
    }

    fn add_discipline_to_student(&mut self) -> Result<()> {
        writeln!(self.output, "--- Add/update discipline ---")?;
        let Some(mut student) = self.prompt_existing_student("Enter student ID: ")? else {
            return Ok(());
        };
        let Some(name) = self.prompt_text("Enter discipline name: ")? else {
            return Ok(());
        };
        let Some(grade) = self.prompt_grade(&format!("Enter grade for {}", name))? else {
            return Ok(());
        };

        student.add_or_update_discipline(Discipline::new(&name, grade)?);
        let first_name = student.first_name().to_string();
        self.state.school_mut().update_student(student);
        writeln!(
            self.output,
            "Discipline '{}' added/updated for {}.",
            name, first_name
        )?;
        Ok(())
    }

    fn remove_discipline_from_student(&mut self) -> Result<()> {
        writeln!(self.output, "--- Remove discipline ---")?;
        let Some(mut student) = self.prompt_existing_student("Enter student ID: ")? else {
            return Ok(());
        };
        let disciplines = student.disciplines();
        if disciplines.is_empty() {
            writeln!(
                self.output,
                "{} has no disciplines to remove.",
                student.first_name()
            )?;
            return Ok(());
        }
        let listed: Vec<String> = disciplines.iter().map(|d| d.to_string()).collect();
        writeln!(
            self.output,
            "Disciplines for {}: [{}]",
            student.first_name(),
            listed.join(", ")
        )?;

        let Some(name) = self.prompt_text("Enter discipline name to remove: ")? else {
            return Ok(());
        };
        if student.remove_discipline(&name) {
            let first_name = student.first_name().to_string();
            self.state.school_mut().update_student(student);
            writeln!(
                self.output,
                "Discipline '{}' removed for {}.",
                name, first_name
            )?;
        } else {
            writeln!(
                self.output,
                "Discipline '{}' not found for this student.",
                name
            )?;
        }
        Ok(())
    }

    fn calculate_student_average(&mut self) -> Result<()> {
        writeln!(self.output, "--- Student average grade ---")?;
        if let Some(student) = self.prompt_existing_student("Enter student ID: ")? {
            writeln!(
                self.output,
                "Average grade for {} {} (ID: {}): {:.2}",
                student.first_name(),
                student.last_name(),
                student.id(),
                student.calculate_average_grade()
            )?;
        }
        Ok(())
    }

    fn calculate_school_average(&mut self) -> Result<()> {
        writeln!(self.output, "--- School average grade ---")?;
        writeln!(
            self.output,
            "Average grade for school '{}': {:.2}",
            self.state.school().name(),
            self.state.school().calculate_school_average_grade()
        )?;
        Ok(())
    }

    fn export_data(&mut self) -> Result<()> {
        writeln!(self.output, "--- Export data ---")?;
        writeln!(self.output, "Sort students before export?")?;
        writeln!(self.output, "1. No sorting")?;
        writeln!(self.output, "2. Sort by ID")?;
        writeln!(self.output, "3. Sort by last name")?;
        writeln!(self.output, "4. Sort by average grade (descending)")?;
        let Some(choice) = self.prompt_int("Enter sorting option: ")? else {
            return Ok(());
        };
        let sort = SortKey::from_menu_choice(choice);
        writeln!(self.output, "Sorting: {}.", sort.description())?;

        let prompt = format!(
            "Enter export file name (default: {}): ",
            self.state.data_file()
        );
        let requested = self.prompt_line(&prompt)?;
        let file = export_file_name(requested.as_deref(), self.state.data_file());

        self.service
            .export_to_file(self.state.school(), &file, sort.as_comparator())?;
        writeln!(self.output, "School data exported to {}.", file)?;
        Ok(())
    }

    fn import_data(&mut self) -> Result<()> {
        writeln!(self.output, "--- Import data ---")?;
        writeln!(
            self.output,
            "WARNING: importing replaces the school currently in memory."
        )?;
        let Some(confirmation) = self.prompt_text("Are you sure you want to import? (yes/no): ")?
        else {
            return Ok(());
        };
        let confirmed = ["yes", "y", "так"]
            .iter()
            .any(|answer| confirmation.to_lowercase() == *answer);
        if !confirmed {
            writeln!(self.output, "Import cancelled.")?;
            return Ok(());
        }

        let prompt = format!(
            "Enter import file name (default: {}): ",
            self.state.data_file()
        );
        let file = match self.prompt_line(&prompt)? {
            Some(name) if !name.is_empty() => ensure_json_extension(&name),
            _ => ensure_json_extension(self.state.data_file()),
        };

        let school = self.service.import_from_file(&file)?;
        writeln!(
            self.output,
            "Data imported. Current school: {}",
            school.name()
        )?;
        self.state.replace_school(school);
        Ok(())
    }

    fn save_on_exit(&mut self) -> Result<()> {
        writeln!(self.output, "--- Saving data before exit ---")?;
        if let Err(e) = self.state.save(&self.service) {
            tracing::error!("❌ Could not save {}: {}", self.state.data_file(), e);
            writeln!(self.output, "❌ {}", e.user_friendly_message())?;
        }
        Ok(())
    }
}
