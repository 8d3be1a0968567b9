use crate::error::{DfgError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StagingConfig
// ---------------------------------------------------------------------------

/// Locations and names shared by every resolved operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Scratch directory handed to build and final-merge scripts.
    #[serde(default = "default_temp_path")]
    pub temp_path: String,
    /// Configuration file handed to build and final-merge scripts.
    #[serde(default = "default_config_path")]
    pub config_path: String,
    /// Directory name the merge stages collect into.
    #[serde(default = "default_merge_folder")]
    pub merge_folder: String,
    /// Where the last stage of a chain copies its output.
    #[serde(default = "default_final_path")]
    pub final_path: String,
    /// File a non-build stage leaves in its own directory for the next stage.
    #[serde(default = "default_handoff_name")]
    pub handoff_name: String,
}

fn default_temp_path() -> String {
    "/sharedFolder/temp".to_string()
}

fn default_config_path() -> String {
    "/sharedFolder/configurationFile.txt".to_string()
}

fn default_merge_folder() -> String {
    "merge".to_string()
}

fn default_final_path() -> String {
    "/sharedFolder/final".to_string()
}

fn default_handoff_name() -> String {
    "output".to_string()
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            temp_path: default_temp_path(),
            config_path: default_config_path(),
            merge_folder: default_merge_folder(),
            final_path: default_final_path(),
            handoff_name: default_handoff_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateConfig / ServerConfig
// ---------------------------------------------------------------------------

/// Page templates wrapped around the selection markup. Unset entries fall back
/// to the templates built into the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<PathBuf>,
}

impl TemplateConfig {
    fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Directory scanned for modules.
    #[serde(default = "default_modules_root")]
    pub modules_root: PathBuf,
    /// `key=value#key=value` table injected into the selection page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions_path: Option<PathBuf>,
    #[serde(default)]
    pub staging: StagingConfig,
    #[serde(default, skip_serializing_if = "TemplateConfig::is_empty")]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

fn default_modules_root() -> PathBuf {
    PathBuf::from("/home/dockerFileGenerator")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            modules_root: default_modules_root(),
            exceptions_path: None,
            staging: StagingConfig::default(),
            templates: TemplateConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DfgError::NotInitialized(path.to_path_buf()));
        }
        let data = crate::io::read_text(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` if given and present, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !self.modules_root.is_dir() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "modules_root '{}' is not a directory",
                    self.modules_root.display()
                ),
            });
        }

        if let Some(exceptions) = &self.exceptions_path {
            if !exceptions.is_file() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "exceptions_path '{}' does not exist; the page will carry an empty table",
                        exceptions.display()
                    ),
                });
            }
        }

        let staging = &self.staging;
        for (name, value) in [
            ("temp_path", &staging.temp_path),
            ("config_path", &staging.config_path),
            ("final_path", &staging.final_path),
        ] {
            if !value.starts_with('/') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "staging.{name} '{value}' is relative; scripts resolve it from their own directory"
                    ),
                });
            }
        }

        if staging.merge_folder.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "staging.merge_folder is empty".to_string(),
            });
        }

        if staging.handoff_name.trim().is_empty() || staging.handoff_name.contains('/') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "staging.handoff_name '{}' must be a plain file name",
                    staging.handoff_name
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
