//! Configuration management for mtyp.
//!
//! Parses `mtyp.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `renderer.command`
//! - `renderer.args`

mod expand;

use std::path::{Path, PathBuf};

use mtyp_diagrams::{DEFAULT_BACKGROUND, DEFAULT_OUTPUT_SUFFIX, DEFAULT_RENDERER, ImageFormat};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override renderer executable.
    pub renderer: Option<String>,
    /// Override renderer background.
    pub background: Option<String>,
    /// Override image format.
    pub format: Option<String>,
    /// Override output document suffix.
    pub suffix: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mtyp.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Renderer configuration.
    pub renderer: RendererConfig,
    /// Output document configuration.
    pub output: OutputConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Renderer executable.
    pub command: String,
    /// Arguments placed before the renderer's own flags.
    pub args: Vec<String>,
    /// Background passed via `-b`.
    pub background: String,
    /// Image format (`png`, `svg` or `pdf`).
    pub format: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_RENDERER.to_owned(),
            args: Vec::new(),
            background: DEFAULT_BACKGROUND.to_owned(),
            format: ImageFormat::default().extension().to_owned(),
        }
    }
}

impl RendererConfig {
    /// Parsed image format.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the format is not supported.
    pub fn image_format(&self) -> Result<ImageFormat, ConfigError> {
        ImageFormat::parse(&self.format).ok_or_else(|| {
            ConfigError::Validation(format!(
                "renderer.format '{}' is not supported (valid: png, svg, pdf)",
                self.format
            ))
        })
    }
}

/// Output document configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Suffix inserted before the extension (`doc.typ` -> `doc.<suffix>.typ`).
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_OUTPUT_SUFFIX.to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`renderer.command`").
        field: String,
        /// Error message (e.g., "${`MMDC`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mtyp.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading, taking precedence over config
    /// file values. The final configuration is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(renderer) = &settings.renderer {
            self.renderer.command.clone_from(renderer);
        }
        if let Some(background) = &settings.background {
            self.renderer.background.clone_from(background);
        }
        if let Some(format) = &settings.format {
            self.renderer.format.clone_from(format);
        }
        if let Some(suffix) = &settings.suffix {
            self.output.suffix.clone_from(suffix);
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_renderer()?;
        self.validate_output()?;
        Ok(())
    }

    /// Validate renderer configuration.
    fn validate_renderer(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.renderer.command, "renderer.command")?;
        require_non_empty(&self.renderer.background, "renderer.background")?;
        self.renderer.image_format()?;
        Ok(())
    }

    /// Validate output configuration.
    fn validate_output(&self) -> Result<(), ConfigError> {
        let suffix = &self.output.suffix;
        require_non_empty(suffix, "output.suffix")?;

        // The output must stay a sibling of the input document
        if suffix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "output.suffix cannot contain path separators".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.renderer.command = expand::expand_env(&self.renderer.command, "renderer.command")?;
        for arg in &mut self.renderer.args {
            *arg = expand::expand_env(arg, "renderer.args")?;
        }
        Ok(())
    }
}
