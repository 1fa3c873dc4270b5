//! Runtime settings, read once from the environment (and `.env`) plus an
//! optional YAML file, then passed explicitly to whatever needs them.

use serde::Deserialize;
use sheetload_core::usecase::LookupConfig;
use sheetload_core::SheetloadError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "config/excel_config.yaml";
pub const DEFAULT_INPUT_PATH: &str = "./input_excel";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_TARGET_TABLE: &str = "facturas_qwark";
pub const DEFAULT_PG_PORT: u16 = 5432;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl From<SettingsError> for SheetloadError {
    fn from(err: SettingsError) -> Self {
        SheetloadError::invalid_config(err.to_string())
    }
}

/// PostgreSQL connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct PgSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for PgSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl PgSettings {
    pub fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }

    /// Connection URL with the password masked, for logs
    pub fn display_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

/// Spreadsheet input settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcelSettings {
    pub input_path: PathBuf,
    pub sheet_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pg: PgSettings,
    pub excel: ExcelSettings,
    pub target_table: String,
    /// Incremental loading key; `None` means plain append
    pub primary_key: Option<String>,
    /// Lookup enrichment, from the `excel_lookup` YAML section
    pub lookup: Option<LookupConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    excel_lookup: Option<serde_yaml::Value>,
}

impl Settings {
    /// Load from the process environment after reading `.env`, if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        let config_file = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_vars(|name| std::env::var(name).ok(), &config_file)
    }

    /// Build settings from a variable lookup and a YAML file path.
    pub fn from_vars<F>(vars: F, config_file: &Path) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| vars(name).filter(|v| !v.is_empty());

        let port = match var("PG_PORT") {
            Some(value) => value.parse().map_err(|_| SettingsError::InvalidValue {
                name: "PG_PORT".to_string(),
                value,
            })?,
            None => DEFAULT_PG_PORT,
        };

        let pg = PgSettings {
            host: var("PG_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            database: var("PG_DB").or_else(|| var("PG_DBNAME")).unwrap_or_default(),
            user: var("PG_USER").unwrap_or_default(),
            password: var("PG_PASSWORD").unwrap_or_default(),
        };

        let excel = ExcelSettings {
            input_path: PathBuf::from(
                var("EXCEL_INPUT_PATH").unwrap_or_else(|| DEFAULT_INPUT_PATH.to_string()),
            ),
            sheet_name: var("EXCEL_SHEET_NAME").unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        };

        Ok(Self {
            pg,
            excel,
            target_table: var("ETL_TARGET_TABLE")
                .unwrap_or_else(|| DEFAULT_TARGET_TABLE.to_string()),
            primary_key: var("ETL_PRIMARY_KEY"),
            lookup: read_lookup_config(config_file)?,
        })
    }
}

/// `excel_lookup` section of the YAML file; a missing file or an empty
/// section disables the lookup.
fn read_lookup_config(path: &Path) -> Result<Option<LookupConfig>, SettingsError> {
    if !path.exists() {
        debug!("No config file at {}", path.display());
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let yaml_error = |source: serde_yaml::Error| SettingsError::Yaml {
        path: path.to_path_buf(),
        source,
    };

    let file: ConfigFile = if text.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str(&text).map_err(yaml_error)?
    };

    match file.excel_lookup {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::Mapping(map)) if map.is_empty() => Ok(None),
        Some(section) => serde_yaml::from_value(section).map(Some).map_err(yaml_error),
    }
}
