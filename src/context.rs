//! Context building: turns a flat configuration into the variable
//! environment used by every render, computing derived variables on the way.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::config::{ConfigValue, Configuration};
use crate::error::{Error, Result};
use crate::transform::Transform;

/// Declares that `name` is computed by applying `transform` to `base`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct DerivedRule {
    pub base: String,
    pub transform: Transform,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    base: String,
    transformation: String,
    name: String,
    from: Option<String>,
    to: Option<String>,
}

impl TryFrom<RawRule> for DerivedRule {
    type Error = Error;

    fn try_from(raw: RawRule) -> Result<Self> {
        let transform =
            Transform::from_parts(&raw.transformation, raw.from.as_deref(), raw.to.as_deref())?;
        Ok(Self { base: raw.base, transform, name: raw.name })
    }
}

impl DerivedRule {
    pub fn new(base: impl Into<String>, transform: Transform, name: impl Into<String>) -> Self {
        Self { base: base.into(), transform, name: name.into() }
    }

    /// The usual naming-convention rules for an identifier-like variable:
    /// `{base}_capitalized`, `_camel`, `_snake`, `_dashes`, `_periods`, `_slashes`.
    pub fn standard_set(base: &str) -> Vec<Self> {
        [
            (Transform::Capitalized, "capitalized"),
            (Transform::Camel, "camel"),
            (Transform::Snake, "snake"),
            (Transform::Dashes, "dashes"),
            (Transform::Periods, "periods"),
            (Transform::Slashes, "slashes"),
        ]
        .into_iter()
        .map(|(transform, suffix)| Self::new(base, transform, format!("{base}_{suffix}")))
        .collect()
    }
}

impl fmt::Display for DerivedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) -> {}", self.transform, self.base, self.name)
    }
}

/// The resolved variables and flags available during a render.
///
/// Built once by [`ContextBuilder::build`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Environment {
    variables: IndexMap<String, String>,
    flags: IndexMap<String, bool>,
}

impl Environment {
    /// Looks up the text a variable tag renders to. Flags render as
    /// `true` / `false`.
    pub fn value(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.variables.get(name) {
            return Some(Cow::Borrowed(value.as_str()));
        }
        self.flags.get(name).map(|flag| Cow::Owned(flag.to_string()))
    }

    /// Truthiness of an entry: flags are themselves. A string is falsy when
    /// it is empty or a negative answer (`false`, `no`, `n`, any case).
    /// `None` means the name is not defined at all.
    pub fn truthiness(&self, name: &str) -> Option<bool> {
        if let Some(flag) = self.flags.get(name) {
            return Some(*flag);
        }
        self.variables.get(name).map(|value| is_truthy_text(value))
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    pub fn flags(&self) -> &IndexMap<String, bool> {
        &self.flags
    }

    /// Flattens the environment into one JSON object, variables first.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.variables {
            map.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        for (key, flag) in &self.flags {
            map.insert(key.clone(), serde_json::Value::Bool(*flag));
        }
        serde_json::Value::Object(map)
    }
}

fn is_truthy_text(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty()
        || ["false", "no", "n"].iter().any(|negative| value.eq_ignore_ascii_case(negative)))
}

/// Builds [`Environment`]s from configurations using a fixed rule table.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    rules: Vec<DerivedRule>,
}

impl ContextBuilder {
    pub fn new(rules: Vec<DerivedRule>) -> Self {
        Self { rules }
    }

    /// Resolves `config` into an environment.
    ///
    /// Rules apply in declaration order, so a rule may use a variable derived
    /// by an earlier rule as its base.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a base is undefined (or not yet derived), if a
    ///   base is a boolean flag, or if a derived name is claimed by a
    ///   configuration key or by two different rules
    pub fn build(&self, config: &Configuration) -> Result<Environment> {
        let rules = self.validate(config)?;

        let mut env = Environment::default();
        for (key, value) in config {
            match value {
                ConfigValue::Bool(flag) => {
                    env.flags.insert(key.clone(), *flag);
                }
                ConfigValue::Str(value) => {
                    env.variables.insert(key.clone(), value.clone());
                }
            }
        }

        for rule in rules {
            let base = match env.variables.get(&rule.base) {
                Some(base) => base,
                None if env.flags.contains_key(&rule.base) => {
                    return Err(Error::ConfigError(format!(
                        "rule {rule} uses flag '{}' as its base; only string values can be transformed",
                        rule.base
                    )));
                }
                None => {
                    return Err(Error::ConfigError(format!(
                        "rule {rule} references undefined variable '{}'",
                        rule.base
                    )));
                }
            };
            let derived = rule.transform.apply(base);
            debug!("Derived '{}' = '{}'", rule.name, derived);
            env.variables.insert(rule.name.clone(), derived);
        }

        Ok(env)
    }

    /// Checks the rule table against `config` and drops identical duplicates.
    fn validate(&self, config: &Configuration) -> Result<Vec<&DerivedRule>> {
        let mut claimed: IndexMap<&str, &DerivedRule> = IndexMap::new();

        for rule in &self.rules {
            if config.contains_key(&rule.name) {
                return Err(Error::ConfigError(format!(
                    "rule {rule} would overwrite configuration key '{}'",
                    rule.name
                )));
            }
            match claimed.get(rule.name.as_str()) {
                Some(existing) if *existing != rule => {
                    return Err(Error::ConfigError(format!(
                        "derived variable '{}' is produced by both {existing} and {rule}",
                        rule.name
                    )));
                }
                Some(_) => continue,
                None => {
                    claimed.insert(rule.name.as_str(), rule);
                }
            }
        }

        Ok(claimed.into_values().collect())
    }
}
