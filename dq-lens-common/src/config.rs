use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_row_cap")]
    pub row_cap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_infer_rows")]
    pub infer_schema_rows: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_row_cap() -> usize {
    100_000
}
fn default_top_k() -> usize {
    5
}
fn default_infer_rows() -> usize {
    10_000
}
fn default_batch_size() -> usize {
    8192
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            row_cap: default_row_cap(),
            top_k: default_top_k(),
            infer_schema_rows: default_infer_rows(),
            batch_size: default_batch_size(),
        }
    }
}

impl ProfileConfig {
    pub fn with_row_cap(mut self, row_cap: usize) -> Self {
        self.row_cap = row_cap;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_infer_schema_rows(mut self, rows: usize) -> Self {
        self.infer_schema_rows = rows;
        self
    }

    /// row_cap and top_k may be zero; readers need a positive batch and inference window
    pub fn validate(&self) -> crate::Result<()> {
        if self.batch_size == 0 {
            return Err(crate::DqLensError::Config("batch_size must be > 0".into()));
        }
        if self.infer_schema_rows == 0 {
            return Err(crate::DqLensError::Config(
                "infer_schema_rows must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_pretty() -> bool {
    true
}
fn default_output_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            output_dir: default_output_dir(),
        }
    }
}

impl ExportConfig {
    /// `<output_dir>/<dataset stem>.profile.json`, used when no explicit output is given
    pub fn default_output(&self, dataset_name: &str) -> PathBuf {
        let stem = Path::new(dataset_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".into());
        Path::new(&self.output_dir).join(format!("{stem}.profile.json"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profiling: ProfileConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dq-lens")
            .join("config.toml")
    }

    /// $DQ_LENS_CONFIG overrides the default config path
    pub fn active_path() -> PathBuf {
        std::env::var_os("DQ_LENS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(Self::config_path)
    }

    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::active_path())
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::DqLensError::Config(format!("{}: {e}", path.display())))?;
        let cfg: Self =
            toml::from_str(&content).map_err(|e| crate::DqLensError::Config(e.to_string()))?;
        cfg.profiling.validate()?;
        Ok(cfg)
    }

    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::active_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        let config_err = |e: &dyn std::fmt::Display| {
            crate::DqLensError::Config(format!("{}: {e}", path.display()))
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| config_err(&e))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| config_err(&e))?;
        std::fs::write(path, content).map_err(|e| config_err(&e))?;
        Ok(())
    }
}
