//! Persisting rendered trees to disk.
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{RUN_CONFIGURATION_DIR, RUN_CONFIGURATION_FILE};
use crate::context::Environment;
use crate::error::{Error, Result};
use crate::processor::RenderResult;
use crate::prompt::Prompter;

/// Ensures the output directory is safe to write to.
///
/// An existing directory is accepted when `force` is set or the user
/// confirms through `prompt`.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and the
///   overwrite is declined
pub fn ensure_output_dir<P: AsRef<Path>>(
    prompt: &dyn Prompter,
    output_dir: P,
    force: bool,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        let overwrite = prompt.confirm(
            format!("Output directory '{}' already exists. Overwrite its files?", output_dir.display()),
            false,
        )?;
        if !overwrite {
            return Err(Error::OutputDirectoryExistsError {
                output_dir: output_dir.display().to_string(),
            });
        }
    }
    Ok(output_dir.to_path_buf())
}

/// Creates every surviving directory and writes every rendered file under
/// `output_root`.
pub fn write_result<P: AsRef<Path>>(result: &RenderResult, output_root: P) -> Result<()> {
    let output_root = output_root.as_ref();

    for directory in &result.directories {
        let target = output_root.join(directory);
        debug!("Creating directory: {}", target.display());
        fs::create_dir_all(target)?;
    }

    for file in &result.files {
        let target = output_root.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &file.content)?;
        info!("Rendered '{}' -> '{}'", file.source, target.display());
    }

    Ok(())
}

/// Stores the resolved environment as pretty JSON inside the generated
/// project. A later run reads it back with `--run-configuration`, which
/// recomputes derived values instead of taking the stored ones.
pub fn write_run_configuration<P: AsRef<Path>>(env: &Environment, output_root: P) -> Result<PathBuf> {
    let directory = output_root.as_ref().join(RUN_CONFIGURATION_DIR);
    fs::create_dir_all(&directory)?;

    let target = directory.join(RUN_CONFIGURATION_FILE);
    let content = serde_json::to_string_pretty(&env.to_json())?;
    fs::write(&target, content)?;
    debug!("Stored run configuration in {}", target.display());

    Ok(target)
}
