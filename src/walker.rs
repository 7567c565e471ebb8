use std::path::{Component, Path, PathBuf};

use crate::error::Result;

/// A guide content file found below the content root.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the content root directory.
    pub relative_path: PathBuf,
    /// Path used for reading; symlinks are resolved.
    pub absolute_path: PathBuf,
    /// Top-level folder the file is filed under (`ios` in
    /// `ios/screenshot.json`). `None` for files directly in the root.
    pub os_folder: Option<String>,
}

/// Extension of guide content files, compared case-insensitively.
const CONTENT_EXTENSION: &str = "json";

/// File at the content root holding an intent dictionary, not a guide.
pub const INTENTS_FILE_NAME: &str = "intents.json";

/// Find every guide file below `root`, sorted by relative path.
///
/// Guides are laid out as `<os>/<slug>.json`; deeper nesting is accepted
/// and keeps the top-level folder as its OS folder. Hidden entries, symlinked
/// directories and the root intent dictionary are skipped.
pub fn discover_files(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let root = root.canonicalize()?;
    let mut results = Vec::new();
    let mut pending = vec![root.clone()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(path);
                continue;
            }

            let absolute_path = if file_type.is_symlink() {
                match path.canonicalize() {
                    Ok(target) if target.is_file() => target,
                    _ => continue,
                }
            } else {
                path.clone()
            };
            if !is_content(&path) {
                continue;
            }

            let relative_path =
                path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            if relative_path == Path::new(INTENTS_FILE_NAME) {
                continue;
            }
            results.push(DiscoveredFile {
                os_folder: os_folder(&relative_path),
                relative_path,
                absolute_path,
            });
        }
    }

    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn is_content(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CONTENT_EXTENSION))
}

fn os_folder(relative_path: &Path) -> Option<String> {
    let mut components = relative_path.components();
    let first = components.next()?;
    // A single component is the file itself.
    components.next()?;
    match first {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}
