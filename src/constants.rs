//! Common constants used throughout generoo.

/// Supported configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["generoo.json", "generoo.yml", "generoo.yaml"];

/// generoo's ignore file name
pub const IGNORE_FILE: &str = ".generooignore";

/// Patterns ignored in every template directory
pub const DEFAULT_IGNORE_PATTERNS: [&str; 7] = [
    "**/.git",
    "**/.git/**",
    "**/.DS_Store",
    ".generooignore",
    "generoo.json",
    "generoo.yml",
    "generoo.yaml",
];

/// Default tag delimiters
pub const DEFAULT_OPEN_DELIMITER: &str = "{{";
pub const DEFAULT_CLOSE_DELIMITER: &str = "}}";

/// Maximum section nesting accepted by the parser unless configured otherwise
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Canonical separator of path templates and rendered paths
pub const PATH_SEPARATOR: char = '/';

/// Where the resolved environment is stored inside the generated project
pub const RUN_CONFIGURATION_DIR: &str = ".generoo";
pub const RUN_CONFIGURATION_FILE: &str = "run-configuration.json";
