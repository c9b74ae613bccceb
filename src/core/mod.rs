pub mod persistence;
pub mod report;

pub use crate::domain::{Discipline, School, Storage, Student, StudentComparator};
pub use crate::utils::error::Result;
pub use persistence::{PersistenceService, DEFAULT_SCHOOL_NAME};
