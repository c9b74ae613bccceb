pub mod cli;
pub mod toml_config;

use crate::app::sorting::SortKey;
use crate::config::cli::LocalStorage;
use crate::config::toml_config::RosterConfig;
use crate::core::PersistenceService;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "school-roster")]
#[command(about = "Keep a school's students and their grades in a JSON file")]
pub struct CliConfig {
    #[arg(long, help = "JSON data file (default: school_data.json)")]
    pub data_file: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add a new student
    AddStudent {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        first_name: String,
        last_name: String,
    },
    /// List all students
    List,
    /// Show one student
    Show {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Change a student's names; omitted names are kept
    UpdateStudent {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        last: Option<String>,
    },
    /// Remove a student
    RemoveStudent {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Add a discipline grade, or overwrite the existing one
    SetGrade {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        discipline: String,
        #[arg(allow_negative_numbers = true)]
        grade: i32,
    },
    /// Remove a discipline from a student
    RemoveGrade {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        discipline: String,
    },
    /// Average grade of one student
    StudentAverage {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Average grade of the school
    SchoolAverage,
    /// Rename the school
    RenameSchool { name: String },
    /// Export the school to a JSON file
    Export {
        #[arg(long)]
        file: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },
    /// Replace the data file's school with one imported from FILE
    Import { file: String },
    /// Write a CSV report of student averages
    Report {
        #[arg(long)]
        output: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn settings(&self) -> Result<Settings> {
        Settings::resolve(self.config.as_deref(), self.data_file.as_deref())
    }
}

/// 合併預設值、設定檔與命令列參數後的最終設定
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_file: String,
    pub base_path: String,
    pub default_school_name: String,
    pub default_sort: SortKey,
}

impl Settings {
    pub fn resolve(config_path: Option<&str>, data_file: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                RosterConfig::from_file(path)?
            }
            None => RosterConfig::default(),
        };
        config.validate()?;

        let data_file = match data_file {
            Some(file) => {
                validate_path("data file", file)?;
                file.to_string()
            }
            None => config.storage.data_file.clone(),
        };

        Ok(Self {
            data_file,
            base_path: config
                .storage
                .base_path
                .clone()
                .unwrap_or_else(|| ".".to_string()),
            default_school_name: config.school.default_name.clone(),
            default_sort: config.default_sort()?,
        })
    }

    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new(self.base_path.clone())
    }

    pub fn persistence(&self) -> Result<PersistenceService> {
        PersistenceService::new(self.storage()).with_default_school_name(&self.default_school_name)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: toml_config::DEFAULT_DATA_FILE.to_string(),
            base_path: ".".to_string(),
            default_school_name: crate::core::DEFAULT_SCHOOL_NAME.to_string(),
            default_sort: SortKey::None,
        }
    }
}
