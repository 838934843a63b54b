//! Error handling for generoo.
//! Defines the error type and result alias used throughout the engine and the CLI.

use std::io;
use thiserror::Error;

use crate::processor::RenderResult;

/// Errors raised while building a context, parsing or rendering templates,
/// and persisting the rendered tree.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while reading a JSON configuration
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents errors that occur while reading a YAML configuration
    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    /// Malformed or ambiguous configuration, including derived-variable rules
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Unbalanced or misnamed sections, unterminated tags, excessive nesting
    #[error("Template syntax error in '{template}' at line {line}, column {column}: {message}.")]
    TemplateSyntaxError { template: String, line: usize, column: usize, message: String },

    /// A tag references a name that is not defined (strict mode only)
    #[error("Missing variable '{name}' in '{template}' at line {line}, column {column}.")]
    MissingVariableError { template: String, name: String, line: usize, column: usize },

    /// A path component rendered to an empty string
    #[error("Path '{template}' renders an empty component at segment {index}.")]
    EmptyPathSegmentError { template: String, index: usize },

    /// A path component rendered to `.` or `..`
    #[error("Path '{template}' renders an invalid component '{segment}'.")]
    InvalidPathSegmentError { template: String, segment: String },

    /// Two templates resolve to the same output path
    #[error("Templates '{first}' and '{second}' both render to '{path}'.")]
    CollisionError { path: String, first: String, second: String },

    /// A tree render where one or more entries failed
    #[error("Rendering failed for {} template(s).", .failures.len())]
    RenderError { failures: Vec<Error>, partial: Box<RenderResult> },

    #[error("Template directory '{template_dir}' does not exist.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// Represents errors in processing .generooignore files
    #[error("Ignore file error: {0}.")]
    IgnoreError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// A failed tree render prints every collected failure before exiting.
pub fn default_error_handler(err: Error) {
    if let Error::RenderError { failures, .. } = &err {
        for failure in failures {
            eprintln!("{failure}");
        }
    }
    eprintln!("{err}");
    std::process::exit(1);
}
