use crate::config::cli::LocalStorage;
use crate::domain::{School, Storage, StudentComparator};
use crate::utils::error::Result;
use crate::utils::validation::validate_path;

pub const DEFAULT_SCHOOL_NAME: &str = "Default School Name";

/// 將學校資料匯出成 JSON 檔，或從 JSON 檔匯入
pub struct PersistenceService<S: Storage = LocalStorage> {
    storage: S,
    default_school_name: String,
}

impl<S: Storage> PersistenceService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            default_school_name: DEFAULT_SCHOOL_NAME.to_string(),
        }
    }

    /// Name given to the fresh school returned when there is nothing to import.
    pub fn with_default_school_name(mut self, name: &str) -> Result<Self> {
        School::new(name)?;
        self.default_school_name = name.to_string();
        Ok(self)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes `school` as indented JSON. With a sorter, a sorted copy is written and
    /// `school` itself keeps its order.
    pub fn export_to_file(
        &self,
        school: &School,
        path: &str,
        sorter: Option<&dyn StudentComparator>,
    ) -> Result<()> {
        validate_path("File path", path)?;

        let json = match sorter {
            Some(sorter) => {
                let mut sorted = School::new(school.name())?;
                sorted.set_students(&school.students());
                sorted.sort_students(sorter);
                serde_json::to_string_pretty(&sorted)?
            }
            None => serde_json::to_string_pretty(school)?,
        };

        self.storage.write_file(path, json.as_bytes())?;
        tracing::info!(
            "✅ School data exported to {} ({} students)",
            path,
            school.student_count()
        );
        Ok(())
    }

    /// Reads a school from `path`. A missing or zero-length file yields an empty school
    /// with the default name; malformed content is a parse error.
    pub fn import_from_file(&self, path: &str) -> Result<School> {
        validate_path("File path", path)?;

        match self.storage.file_len(path)? {
            None => {
                tracing::info!(
                    "Import file not found: {}. Creating a new empty school.",
                    path
                );
                return School::new(&self.default_school_name);
            }
            Some(0) => {
                tracing::info!("Import file is empty: {}. Creating a new empty school.", path);
                return School::new(&self.default_school_name);
            }
            Some(_) => {}
        }

        let data = self.storage.read_file(path)?;
        let school: School = serde_json::from_slice(&data)?;
        tracing::info!(
            "📁 School data imported from {} ({} students)",
            path,
            school.student_count()
        );
        Ok(school)
    }
}

impl Default for PersistenceService<LocalStorage> {
    fn default() -> Self {
        Self::new(LocalStorage::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Discipline, Student};
    use crate::utils::error::RosterError;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> PersistenceService {
        PersistenceService::new(LocalStorage::new(
            temp_dir.path().to_string_lossy().to_string(),
        ))
    }

    fn sample_school() -> School {
        let mut school = School::new("Test Export School").unwrap();
        let mut zara = Student::new(10, "Zara", "Alpha").unwrap();
        zara.add_or_update_discipline(Discipline::new("Math", 10).unwrap());
        let mut adam = Student::new(5, "Adam", "Beta").unwrap();
        adam.add_or_update_discipline(Discipline::new("Physics", 9).unwrap());
        school.add_student(zara);
        school.add_student(adam);
        school
    }

    #[test]
    fn test_blank_path_is_invalid_argument() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        assert!(matches!(
            service.export_to_file(&sample_school(), "  ", None),
            Err(RosterError::InvalidArgument { .. })
        ));
        assert!(matches!(
            service.import_from_file(""),
            Err(RosterError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_export_writes_indented_json_with_fixed_field_names() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        service
            .export_to_file(&sample_school(), "out/school.json", None)
            .unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("out/school.json")).unwrap();
        assert!(content.contains('\n'));
        assert!(content.contains("\"firstName\": \"Zara\""));
        assert!(content.contains("\"lastName\": \"Beta\""));
        assert!(content.contains("\"disciplines\""));
        assert!(content.contains("\"grade\": 9"));
    }

    #[test]
    fn test_missing_and_empty_files_yield_default_school() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        let school = service.import_from_file("absent.json").unwrap();
        assert_eq!(school.name(), DEFAULT_SCHOOL_NAME);
        assert_eq!(school.student_count(), 0);

        std::fs::write(temp_dir.path().join("empty.json"), "").unwrap();
        let school = service.import_from_file("empty.json").unwrap();
        assert_eq!(school.name(), DEFAULT_SCHOOL_NAME);
    }

    #[test]
    fn test_custom_default_school_name() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir)
            .with_default_school_name("Gymnasium No. 5")
            .unwrap();

        let school = service.import_from_file("absent.json").unwrap();
        assert_eq!(school.name(), "Gymnasium No. 5");

        assert!(PersistenceService::<LocalStorage>::default()
            .with_default_school_name(" ")
            .is_err());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        std::fs::write(temp_dir.path().join("broken.json"), "{ \"name\": ").unwrap();

        assert!(matches!(
            service.import_from_file("broken.json"),
            Err(RosterError::ParseError(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        std::fs::write(
            temp_dir.path().join("shape.json"),
            r#"{"name":"X","students":[{"id":-4,"firstName":"A","lastName":"B"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            service.import_from_file("shape.json"),
            Err(RosterError::ParseError(_))
        ));
    }
}
