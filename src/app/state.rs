use crate::core::PersistenceService;
use crate::domain::{School, Storage};
use crate::utils::error::Result;

/// 目前作用中的學校與其資料檔，取代全域狀態
#[derive(Debug, Clone)]
pub struct AppState {
    school: School,
    data_file: String,
}

impl AppState {
    pub fn new(school: School, data_file: &str) -> Self {
        Self {
            school,
            data_file: data_file.to_string(),
        }
    }

    /// Imports the data file. Parse and IO errors reach the caller.
    pub fn load<S: Storage>(service: &PersistenceService<S>, data_file: &str) -> Result<Self> {
        let school = service.import_from_file(data_file)?;
        Ok(Self::new(school, data_file))
    }

    pub fn save<S: Storage>(&self, service: &PersistenceService<S>) -> Result<()> {
        service.export_to_file(&self.school, &self.data_file, None)
    }

    pub fn school(&self) -> &School {
        &self.school
    }

    pub fn school_mut(&mut self) -> &mut School {
        &mut self.school
    }

    pub fn replace_school(&mut self, school: School) {
        self.school = school;
    }

    pub fn data_file(&self) -> &str {
        &self.data_file
    }
}
