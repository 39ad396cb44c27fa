use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_DATASET: &str = "HuggingFaceH4/ultrachat_200k";
pub const DEFAULT_OUTPUT_DIR: &str = "reformatted";
pub const DEFAULT_TEST_SIZE: usize = 1000;
pub const DEFAULT_HUB_REVISION: &str = "refs/convert/parquet";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub data: String,
    pub keep_json: bool,
    pub split: SplitConfig,
    pub hub: HubConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            data: DEFAULT_DATASET.to_owned(),
            keep_json: false,
            split: SplitConfig::default(),
            hub: HubConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub seed: Option<u64>,
    pub test_size: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            seed: None,
            test_size: DEFAULT_TEST_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub revision: String,
    pub config_name: String,
    pub cache_dir: Option<PathBuf>,
    pub token: Option<String>,
    pub progress: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            revision: DEFAULT_HUB_REVISION.to_owned(),
            config_name: "default".to_owned(),
            cache_dir: None,
            token: None,
            progress: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
        }
    }
}
