//! Template tree processing.
//! Renders every path and file of a template tree into a fresh
//! [`RenderResult`], isolating per-entry failures and detecting collisions.

use indexmap::IndexMap;
use log::{debug, warn};

use crate::constants::PATH_SEPARATOR;
use crate::context::Environment;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;

/// One entry of a template tree. Paths are `/`-separated templates relative
/// to the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Directory { path: String },
    File { path: String, content: String },
}

impl TreeEntry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self::Directory { path: path.into() }
    }

    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::File { path: path.into(), content: content.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path } | Self::File { path, .. } => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

/// An ordered, read-only set of path and content templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    entries: Vec<TreeEntry>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn with_directory(mut self, path: impl Into<String>) -> Self {
        self.push(TreeEntry::directory(path));
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.push(TreeEntry::file(path, content));
        self
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TreeEntry> for TemplateTree {
    fn from_iter<I: IntoIterator<Item = TreeEntry>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// A rendered file and the path template it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: String,
    pub content: String,
    pub source: String,
}

/// Surviving directories and files, in template tree order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResult {
    pub directories: Vec<String>,
    pub files: Vec<RenderedFile>,
}

impl RenderResult {
    pub fn get(&self, path: &str) -> Option<&RenderedFile> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|file| file.path.as_str()).collect()
    }
}

/// Renders template trees with a [`TemplateRenderer`].
pub struct Processor<'a> {
    engine: &'a dyn TemplateRenderer,
}

impl<'a> Processor<'a> {
    pub fn new(engine: &'a dyn TemplateRenderer) -> Self {
        Self { engine }
    }

    /// Renders every entry of `tree`.
    ///
    /// Excluded directories skip every entry beneath them. A failing entry
    /// does not stop the others from rendering; the call fails afterwards.
    ///
    /// # Errors
    /// * `Error::RenderError` carrying every per-entry failure (syntax,
    ///   missing variable, path and collision errors) and the partial result
    pub fn render(&self, tree: &TemplateTree, env: &Environment) -> Result<RenderResult> {
        let mut result = RenderResult::default();
        let mut failures = Vec::new();
        let mut skipped_dirs: Vec<&str> = Vec::new();
        // resolved path -> source template
        let mut directories: IndexMap<String, &str> = IndexMap::new();
        let mut files: IndexMap<String, &str> = IndexMap::new();
        // parents of accepted entries that no directory entry declared
        let mut implied: IndexMap<String, &str> = IndexMap::new();

        for entry in tree.entries() {
            let source = entry.path();
            if let Some(dir) = skipped_dirs.iter().find(|dir| is_beneath(source, dir)) {
                debug!("Skipping '{source}' beneath excluded directory '{dir}'");
                continue;
            }

            debug!("Processing template path: {source}");
            let resolved = match self.engine.render_path(source, env) {
                Ok(Some(resolved)) => resolved,
                Ok(None) => {
                    debug!("Excluding '{source}'");
                    if entry.is_directory() {
                        skipped_dirs.push(source);
                    }
                    continue;
                }
                Err(e) => {
                    warn!("{e}");
                    if entry.is_directory() {
                        skipped_dirs.push(source);
                    }
                    failures.push(e);
                    continue;
                }
            };
            debug!("Processed target path: {resolved}");

            let clash = match files.get(&resolved) {
                Some(first) => Some(collision(resolved.clone(), first, source)),
                None if !entry.is_directory() => directories
                    .get(&resolved)
                    .or_else(|| implied.get(&resolved))
                    .map(|first| collision(resolved.clone(), first, source)),
                None => None,
            }
            .or_else(|| parent_collision(&resolved, source, &files));
            if let Some(e) = clash {
                warn!("{e}");
                failures.push(e);
                continue;
            }

            match entry {
                TreeEntry::Directory { .. } => {
                    if !directories.contains_key(&resolved) {
                        claim_parents(&resolved, source, &mut implied);
                        directories.insert(resolved.clone(), source);
                        result.directories.push(resolved);
                    }
                }
                TreeEntry::File { content, .. } => match self.engine.render(source, content, env) {
                    Ok(content) => {
                        claim_parents(&resolved, source, &mut implied);
                        files.insert(resolved.clone(), source);
                        result.files.push(RenderedFile {
                            path: resolved,
                            content,
                            source: source.to_string(),
                        });
                    }
                    Err(e) => {
                        warn!("{e}");
                        failures.push(e);
                    }
                },
            }
        }

        if failures.is_empty() {
            Ok(result)
        } else {
            Err(Error::RenderError { failures, partial: Box::new(result) })
        }
    }
}

fn is_beneath(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
}

/// Every proper `/`-prefix of `path`, shortest first.
fn parents(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices(PATH_SEPARATOR).map(move |(index, _)| &path[..index])
}

/// A file already accepted at one of the parents of `path`.
fn parent_collision(path: &str, source: &str, files: &IndexMap<String, &str>) -> Option<Error> {
    parents(path).find_map(|parent| {
        files.get(parent).map(|first| collision(parent.to_string(), first, source))
    })
}

fn claim_parents<'t>(path: &str, source: &'t str, implied: &mut IndexMap<String, &'t str>) {
    for parent in parents(path) {
        implied.entry(parent.to_string()).or_insert(source);
    }
}

fn collision(path: String, first: &str, second: &str) -> Error {
    Error::CollisionError { path, first: first.to_string(), second: second.to_string() }
}
