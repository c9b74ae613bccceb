pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use app::{AppState, ConsoleMenu, SortKey};
pub use config::{cli::LocalStorage, Settings};
pub use crate::core::{persistence::PersistenceService, report::write_average_report};
pub use domain::{Discipline, School, Storage, Student, StudentComparator};
pub use utils::error::{Result, RosterError};
