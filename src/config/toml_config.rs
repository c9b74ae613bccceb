use crate::app::sorting::SortKey;
use crate::core::DEFAULT_SCHOOL_NAME;
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_FILE: &str = "school_data.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub school: SchoolConfig,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolConfig {
    #[serde(default = "default_school_name")]
    pub default_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_sort: Option<String>,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_school_name() -> String {
    DEFAULT_SCHOOL_NAME.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            base_path: None,
        }
    }
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            default_name: default_school_name(),
        }
    }
}

impl RosterConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            RosterError::config(format!(
                "cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| RosterError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${ROSTER_HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::{Captures, Regex};

        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| RosterError::config(format!("invalid substitution pattern: {}", e)))?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if !missing.is_empty() {
            return Err(RosterError::config(format!(
                "environment variable(s) not set: {}",
                missing.join(", ")
            )));
        }

        Ok(result.into_owned())
    }

    pub fn default_sort(&self) -> Result<SortKey> {
        match self.export.as_ref().and_then(|e| e.default_sort.as_deref()) {
            Some(raw) => raw.parse(),
            None => Ok(SortKey::None),
        }
    }
}

fn as_config_error(e: RosterError) -> RosterError {
    match e {
        RosterError::InvalidArgument { message } => RosterError::ConfigError { message },
        other => other,
    }
}

impl Validate for RosterConfig {
    fn validate(&self) -> Result<()> {
        validate_path("storage.data_file", &self.storage.data_file).map_err(as_config_error)?;
        if let Some(base) = &self.storage.base_path {
            validate_path("storage.base_path", base).map_err(as_config_error)?;
        }
        validate_non_empty_string("school.default_name", &self.school.default_name)
            .map_err(as_config_error)?;
        self.default_sort().map_err(as_config_error)?;
        Ok(())
    }
}
