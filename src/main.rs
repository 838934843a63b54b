//! generoo's application entry point.
//! Parses arguments, resolves the configuration, renders the template tree
//! and writes the result to the output directory.

use std::io::Read;

use generoo::{
    cli::{get_args, Args},
    config::{
        find_config, load_config, load_run_configuration, overrides_from_json, parse_define,
        TemplateConfig,
    },
    constants::CONFIG_FILES,
    context::ContextBuilder,
    error::{default_error_handler, Result},
    ignore::parse_ignore_file,
    loader::load_template_tree,
    logger::init_logger,
    processor::Processor,
    prompt::DialoguerPrompter,
    renderer::{MissingPolicy, SectionRenderer},
    writer::{ensure_output_dir, write_result, write_run_configuration},
};
use log::info;

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn read_stdin_overrides() -> Result<serde_json::Value> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    let buffer = buffer.trim();
    if buffer.is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(buffer)?)
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the configuration file and applies run-configuration, stdin and
///    `--define` overrides, in that order
/// 2. Builds the variable environment
/// 3. Loads the template tree, honouring .generooignore
/// 4. Renders the tree; nothing is written if any entry fails
/// 5. Writes the result and the run configuration
fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().or_else(|| find_config(&args.template, &CONFIG_FILES));
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => {
            info!("No configuration file found in {}", args.template.display());
            TemplateConfig::default()
        }
    };

    if let Some(path) = &args.run_configuration {
        let stored = config.retain_base_values(load_run_configuration(path)?);
        config.apply_overrides(stored);
    }
    if args.stdin {
        let answers = config.retain_base_values(overrides_from_json(read_stdin_overrides()?)?);
        config.apply_overrides(answers);
    }
    let defines = args.define.iter().map(|raw| parse_define(raw)).collect::<Result<Vec<_>>>()?;
    config.apply_overrides(defines);
    if args.lenient {
        config.options.missing = MissingPolicy::Lenient;
    }

    let env = ContextBuilder::new(config.transformations.clone()).build(&config.variables)?;
    let engine = SectionRenderer::from_options(&config.options)?;

    let ignored = parse_ignore_file(&args.template)?;
    let tree = load_template_tree(&args.template, &ignored)?;
    let result = Processor::new(&engine).render(&tree, &env)?;

    let prompt = DialoguerPrompter::new();
    let output_root = ensure_output_dir(&prompt, &args.output_dir, args.force)?;
    write_result(&result, &output_root)?;
    if !args.no_run_config {
        write_run_configuration(&env, &output_root)?;
    }

    println!(
        "Template generation completed successfully: {} file(s) in {}.",
        result.files.len(),
        output_root.display()
    );
    Ok(())
}
