// ============================================================
// APPLICATION CONFIGURATION
// ============================================================
// Defaults < housing.toml < HOUSING_* environment variables

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Env var naming an alternative TOML file
pub const CONFIG_PATH_ENV: &str = "HOUSING_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "housing.toml";
const ENV_PREFIX: &str = "HOUSING_";

/// Source file names, relative to `data_dir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFiles {
    pub income: String,
    pub comparison: String,
    pub rent: String,
    pub vacancy: String,
    pub population: String,
    pub zoning: String,
    pub completions: String,
    pub housing_prices: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            income: "income.csv".to_string(),
            comparison: "comparison.csv".to_string(),
            rent: "rent.csv".to_string(),
            vacancy: "vacancy.csv".to_string(),
            population: "population.csv".to_string(),
            zoning: "zoning.csv".to_string(),
            completions: "completions.csv".to_string(),
            housing_prices: "housing_prices.csv".to_string(),
        }
    }
}

impl DataFiles {
    fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("income", &self.income),
            ("comparison", &self.comparison),
            ("rent", &self.rent),
            ("vacancy", &self.vacancy),
            ("population", &self.population),
            ("zoning", &self.zoning),
            ("completions", &self.completions),
            ("housing_prices", &self.housing_prices),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Petition/contact counters document
    pub action_data_path: PathBuf,
    /// Municipality the headline stats are computed for
    pub subject_municipality: String,
    /// Used when RUST_LOG is unset
    pub log_filter: String,
    pub files: DataFiles,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_dir: PathBuf::from("data"),
            action_data_path: PathBuf::from("data/action_data.json"),
            subject_municipality: "Burlington".to_string(),
            log_filter: "info".to_string(),
            files: DataFiles::default(),
        }
    }
}

impl AppConfig {
    /// Load from defaults, the TOML file and the environment.
    ///
    /// A missing TOML file is not an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::figment(&path).extract::<Self>().map_err(AppError::from)
    }

    pub fn figment(toml_path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(toml_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::ConfigError("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(AppError::ConfigError("port must be > 0".to_string()));
        }
        if self.subject_municipality.trim().is_empty() {
            return Err(AppError::ConfigError(
                "subject_municipality must not be empty".to_string(),
            ));
        }
        for (key, name) in self.files.entries() {
            if name.trim().is_empty() {
                return Err(AppError::ConfigError(format!("files.{} must not be empty", key)));
            }
        }
        Ok(())
    }

    /// Resolve a data file name against `data_dir`
    pub fn data_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}
