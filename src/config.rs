//! Configuration handling for generoo templates.
//! This module loads the template configuration file (variables, derived
//! variable rules and render options) and merges caller overrides into it.

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

use crate::constants::{
    DEFAULT_CLOSE_DELIMITER, DEFAULT_MAX_DEPTH, DEFAULT_OPEN_DELIMITER,
};
use crate::context::DerivedRule;
use crate::error::{Error, Result};
use crate::parser::Delimiters;
use crate::renderer::MissingPolicy;

/// A raw configuration value: either a string scalar or a boolean flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum ConfigValue {
    Bool(bool),
    Str(String),
}

impl TryFrom<serde_json::Value> for ConfigValue {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::String(s) => Ok(Self::Str(s)),
            serde_json::Value::Number(n) => Ok(Self::Str(n.to_string())),
            serde_json::Value::Null => Ok(Self::Str(String::new())),
            other => Err(Error::ConfigError(format!(
                "configuration values must be strings or booleans, got {other}"
            ))),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Ordered mapping from key to raw value, immutable once handed to the
/// context builder.
pub type Configuration = IndexMap<String, ConfigValue>;

/// Options controlling how templates are parsed and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    pub missing: MissingPolicy,
    pub max_depth: usize,
    pub delimiters: (String, String),
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            missing: MissingPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            delimiters: (
                DEFAULT_OPEN_DELIMITER.to_string(),
                DEFAULT_CLOSE_DELIMITER.to_string(),
            ),
        }
    }
}

impl RenderOptions {
    pub fn delimiters(&self) -> Result<Delimiters> {
        Delimiters::new(&self.delimiters.0, &self.delimiters.1)
    }
}

/// Contents of a `generoo.json` / `generoo.yml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub variables: Configuration,
    pub transformations: Vec<DerivedRule>,
    pub options: RenderOptions,
}

impl TemplateConfig {
    /// Applies caller overrides on top of the file variables. Overridden keys
    /// keep their original position; new keys are appended.
    pub fn apply_overrides<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, ConfigValue)>,
    {
        for (key, value) in overrides {
            debug!("Overriding configuration value '{key}'");
            self.variables.insert(key, value);
        }
    }

    /// Drops values for names a transformation derives; those are recomputed
    /// from their base on every run.
    pub fn retain_base_values(
        &self,
        values: Vec<(String, ConfigValue)>,
    ) -> Vec<(String, ConfigValue)> {
        values
            .into_iter()
            .filter(|(key, _)| {
                let derived = self.transformations.iter().any(|rule| &rule.name == key);
                if derived {
                    debug!("Ignoring stored value of derived variable '{key}'");
                }
                !derived
            })
            .collect()
    }
}

/// Finds the configuration file of a template directory, trying
/// `config_files` in order. Returns `None` if none of them exists.
pub fn find_config<P: AsRef<Path>>(
    template_dir: P,
    config_files: &[&str],
) -> Option<std::path::PathBuf> {
    config_files
        .iter()
        .map(|file| template_dir.as_ref().join(file))
        .find(|path| path.is_file())
}

/// Loads and parses a configuration file.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TemplateConfig> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(config_path)?;
    parse_config(&content)
}

/// Parses configuration content, trying JSON first and falling back to YAML.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML,
///   or does not match the configuration schema
pub fn parse_config(content: &str) -> Result<TemplateConfig> {
    match serde_json::from_str::<TemplateConfig>(content) {
        Ok(config) => Ok(config),
        Err(json_err) => serde_yaml::from_str(content).map_err(|yaml_err| {
            Error::ConfigError(format!(
                "invalid configuration format (as JSON: {json_err}; as YAML: {yaml_err})"
            ))
        }),
    }
}

/// Parses a `KEY=VALUE` override. `true` and `false` become flags.
pub fn parse_define(raw: &str) -> Result<(String, ConfigValue)> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        Error::ConfigError(format!("expected KEY=VALUE, got '{raw}'"))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::ConfigError(format!("empty key in '{raw}'")));
    }
    let value = match value {
        "true" => ConfigValue::Bool(true),
        "false" => ConfigValue::Bool(false),
        other => ConfigValue::Str(other.to_string()),
    };
    Ok((key.to_string(), value))
}

/// Converts a JSON object of answers (e.g. read from stdin) into overrides.
pub fn overrides_from_json(value: serde_json::Value) -> Result<Vec<(String, ConfigValue)>> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| Ok((key, ConfigValue::try_from(value)?)))
            .collect(),
        other => Err(Error::ConfigError(format!(
            "expected a JSON object of values, got {other}"
        ))),
    }
}

/// Loads a stored run configuration (a flat JSON or YAML object of values)
/// as overrides.
pub fn load_run_configuration<P: AsRef<Path>>(path: P) -> Result<Vec<(String, ConfigValue)>> {
    let path = path.as_ref();
    debug!("Loading run configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let value = match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(&content)?,
    };
    overrides_from_json(value)
}
