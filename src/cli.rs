//! Command-line interface implementation for generoo.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for generoo.
#[derive(Parser, Debug)]
#[command(author, version, about = "generoo: render a project from a template tree", long_about = None)]
pub struct Args {
    /// Path to the template directory
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Directory where the generated project will be created
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Configuration file to use instead of the template's generoo.json/yml/yaml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reuse the values stored by an earlier run, e.g. `.generoo/run-configuration.json`
    #[arg(short, long, value_name = "FILE")]
    pub run_configuration: Option<PathBuf>,

    /// Set a variable, e.g. `-D artifact_id=my-service`. `true`/`false` set flags.
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub define: Vec<String>,

    /// Read a JSON object of variables from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Render undefined variables as empty strings instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Write into an existing output directory without asking
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not store the resolved variables in `.generoo/run-configuration.json`
    #[arg(long)]
    pub no_run_config: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
