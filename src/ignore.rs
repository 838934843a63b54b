//! File and directory ignore pattern handling for generoo templates.
//! This module processes .generooignore files to exclude specific paths
//! from the template tree, similar to .gitignore functionality.

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::path::Path;

use crate::constants::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE};
use crate::error::{Error, Result};

/// Reads the template's .generooignore file and compiles it, together with
/// the default patterns, into a set of globs matched against `/`-separated
/// paths relative to the template root.
///
/// # Notes
/// - A missing .generooignore yields only the default patterns
/// - Blank lines and lines starting with `#` are skipped
/// - Invalid patterns result in an `IgnoreError`
///
/// # Example
/// ```ignore
/// # Contents of .generooignore:
/// *.pyc
/// __pycache__/**
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(template_root: P) -> Result<GlobSet> {
    let ignore_path = template_root.as_ref().join(IGNORE_FILE);
    let mut patterns: Vec<String> =
        DEFAULT_IGNORE_PATTERNS.iter().map(|pattern| pattern.to_string()).collect();

    if ignore_path.is_file() {
        let contents = std::fs::read_to_string(&ignore_path)?;
        patterns.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    } else {
        debug!("{IGNORE_FILE} does not exist");
    }

    build_glob_set(&patterns)
}

/// Compiles glob patterns into a [`GlobSet`].
pub fn build_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_ref()).map_err(|e| {
            Error::IgnoreError(format!("{IGNORE_FILE} loading failed: {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::IgnoreError(format!("{IGNORE_FILE} loading failed: {e}")))
}
