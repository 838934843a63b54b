//! Template loading for generoo.
//! Walks a template directory on disk and turns it into an in-memory
//! [`TemplateTree`] of `/`-separated path templates.
use globset::GlobSet;
use log::debug;
use std::path::{Component, Path};
use walkdir::WalkDir;

use crate::constants::PATH_SEPARATOR;
use crate::error::{Error, Result};
use crate::processor::{TemplateTree, TreeEntry};

/// Loads every directory and file under `template_root`, in file-name order,
/// skipping paths matched by `ignored`. The root itself is not an entry.
///
/// # Errors
/// * `Error::TemplateDoesNotExistsError` if `template_root` is not a directory
/// * `Error::IoError` if a file cannot be read as UTF-8 text
pub fn load_template_tree<P: AsRef<Path>>(template_root: P, ignored: &GlobSet) -> Result<TemplateTree> {
    let template_root = template_root.as_ref();
    if !template_root.is_dir() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: template_root.display().to_string(),
        });
    }

    let mut tree = TemplateTree::new();
    let walker = WalkDir::new(template_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            relative_template_path(template_root, entry.path())
                .map(|relative| !ignored.is_match(&relative))
                .unwrap_or(true)
        });

    for entry in walker {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        let relative = relative_template_path(template_root, entry.path())?;

        if entry.file_type().is_dir() {
            debug!("Loaded directory template: {relative}");
            tree.push(TreeEntry::directory(relative));
        } else {
            let content = std::fs::read_to_string(entry.path())?;
            debug!("Loaded file template: {relative}");
            tree.push(TreeEntry::file(relative, content));
        }
    }

    Ok(tree)
}

/// Converts `path` under `root` to a `/`-separated relative template path.
fn relative_template_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|e| Error::ConfigError(e.to_string()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| {
                Error::ConfigError(format!("non UTF-8 template path: {}", path.display()))
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join(&PATH_SEPARATOR.to_string()))
}
