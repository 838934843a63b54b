//! generoo is a project scaffolding engine.
//! It renders a tree of mustache-style templates, where file contents as
//! well as file and directory names carry placeholders and conditional
//! sections, into a concrete project tree.

/// Command-line interface module for the generoo binary
pub mod cli;

/// Template configuration: variables, derived-variable rules, render options
/// Supports JSON and YAML formats (generoo.json, generoo.yml, generoo.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Variable environment and derived-variable rules
pub mod context;

/// Error types and handling
pub mod error;

/// File and directory ignore patterns
/// Processes .generooignore files to exclude specific paths
pub mod ignore;

/// Loads a template directory into a template tree
pub mod loader;

/// Logger setup
pub mod logger;

/// Template tokenizing into literal, variable and section nodes
pub mod parser;

/// Path template rendering with gated segments
pub mod path;

/// Template tree rendering
pub mod processor;

/// User interaction
pub mod prompt;

/// Section evaluation and the renderer trait
pub mod renderer;

/// Value transforms for derived variables
pub mod transform;

/// Writes rendered trees to disk
pub mod writer;
