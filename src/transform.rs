//! Value transforms used by derived-variable rules.
//!
//! Every transform except `upper` and `replace` works on the same word list:
//! - an uppercase letter preceded by a lowercase letter or digit starts a new word
//! - in a run of capitals, the last one starts a new word when a lowercase
//!   letter follows (`HTTPServer` -> `http`, `server`)
//! - `-`, `_`, `.`, `/` and whitespace separate words
//! - words are lower-cased and empty words are dropped

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("Invalid regex"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_./\s]+").expect("Invalid regex"));

/// A named, deterministic string transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// `my-service` -> `MyService`
    Capitalized,
    /// `my-service` -> `My Service`
    CapitalizedWithSpaces,
    /// `my-service` -> `myService`
    Camel,
    /// `MyService` -> `my_service`
    Snake,
    /// `my_service` -> `my-service`
    Dashes,
    /// `my-service` -> `my.service`
    Periods,
    /// `com.example` -> `com/example`
    Slashes,
    /// `MyService` -> `my service`
    Lower,
    /// Whole-string uppercase
    Upper,
    /// Literal replacement of every occurrence of `from` with `to`
    Replace { from: String, to: String },
}

impl Transform {
    /// Builds a transform from its configuration name. `from`/`to` are only
    /// consulted for `replace`.
    pub fn from_parts(name: &str, from: Option<&str>, to: Option<&str>) -> Result<Self> {
        if name.eq_ignore_ascii_case("replace") {
            return match (from, to) {
                (Some(from), Some(to)) if !from.is_empty() => {
                    Ok(Self::Replace { from: from.to_string(), to: to.to_string() })
                }
                _ => Err(Error::ConfigError(
                    "replace transformation requires a non-empty 'from' and a 'to'".to_string(),
                )),
            };
        }
        name.parse()
    }

    /// Applies the transform to `value`.
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::Capitalized => split_words(value).iter().map(|w| capitalize(w)).collect(),
            Self::CapitalizedWithSpaces => split_words(value)
                .iter()
                .map(|w| capitalize(w))
                .collect::<Vec<_>>()
                .join(" "),
            Self::Camel => split_words(value)
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect(),
            Self::Snake => split_words(value).join("_"),
            Self::Dashes => split_words(value).join("-"),
            Self::Periods => split_words(value).join("."),
            Self::Slashes => split_words(value).join("/"),
            Self::Lower => split_words(value).join(" "),
            Self::Upper => value.to_uppercase(),
            Self::Replace { from, to } => value.replace(from.as_str(), to),
        }
    }
}

impl FromStr for Transform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "capitalized" | "pascal" => Ok(Self::Capitalized),
            "capitalized_with_spaces" | "title" => Ok(Self::CapitalizedWithSpaces),
            "camel" => Ok(Self::Camel),
            "snake" => Ok(Self::Snake),
            "dashes" | "kebab" => Ok(Self::Dashes),
            "periods" => Ok(Self::Periods),
            "slashes" => Ok(Self::Slashes),
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            "replace" => Err(Error::ConfigError(
                "replace transformation requires 'from' and 'to'".to_string(),
            )),
            _ => Err(Error::ConfigError(format!("unknown transformation '{s}'"))),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capitalized => write!(f, "capitalized"),
            Self::CapitalizedWithSpaces => write!(f, "capitalized_with_spaces"),
            Self::Camel => write!(f, "camel"),
            Self::Snake => write!(f, "snake"),
            Self::Dashes => write!(f, "dashes"),
            Self::Periods => write!(f, "periods"),
            Self::Slashes => write!(f, "slashes"),
            Self::Lower => write!(f, "lower"),
            Self::Upper => write!(f, "upper"),
            Self::Replace { from, to } => write!(f, "replace('{from}' -> '{to}')"),
        }
    }
}

fn split_words(value: &str) -> Vec<String> {
    let spaced = ACRONYM_BOUNDARY.replace_all(value, "$1 $2");
    let spaced = CASE_BOUNDARY.replace_all(&spaced, "$1 $2");
    SEPARATORS
        .split(&spaced)
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
