use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_max_values")]
    pub max_values: usize,
    #[serde(default = "default_include_missing")]
    pub include_missing: bool,
    #[serde(default = "default_display_format")]
    pub format: String, // "text" or "json"
}

fn default_max_values() -> usize {
    10
}
fn default_include_missing() -> bool {
    true
}
fn default_display_format() -> String {
    "text".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_values: default_max_values(),
            include_missing: default_include_missing(),
            format: default_display_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    #[serde(default)]
    pub delimiter: Option<char>, // None: inferred from the file extension
    #[serde(default = "default_has_header")]
    pub has_header: bool,
    #[serde(default)]
    pub null_markers: Option<Vec<String>>, // None: built-in pandas-style markers
    #[serde(default)]
    pub infer_schema_rows: Option<usize>,
}

fn default_has_header() -> bool {
    true
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: default_has_header(),
            null_markers: None,
            infer_schema_rows: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilingConfig {
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_format() -> String {
    "json".into()
}
fn default_output_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
    #[serde(default)]
    pub profiling: ProfilingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("csv-lens")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("CSV_LENS_CONFIG") {
            PathBuf::from(env_path) // $CSV_LENS_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        Self::load_from(&path)
    }

    /// missing file means defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::CsvLensError::Config(e.to_string()))
    }

    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::CsvLensError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
