use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    walker::INTENTS_FILE_NAME,
};

/// Environment variable overriding the content directory.
pub const CONTENT_DIR_ENV: &str = "HOWTO_CONTENT_DIR";

#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
}

impl ContentDir {
    /// Resolve the content directory from, in order of priority:
    /// 1. An explicit path (from --content-dir)
    /// 2. The HOWTO_CONTENT_DIR environment variable
    /// 3. The XDG data directory (~/.local/share/howto-search/howtos/)
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var(CONTENT_DIR_ENV) {
            PathBuf::from(val)
        } else {
            xdg::BaseDirectories::with_prefix("howto-search")
                .get_data_home()
                .ok_or_else(|| {
                    Error::Config(
                        "could not determine XDG data home directory".into(),
                    )
                })?
                .join("howtos")
        };

        std::fs::create_dir_all(&root)
            .map_err(|_| Error::ContentDir(root.clone()))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Intent dictionary override stored next to the guides.
    pub fn intents_file(&self) -> PathBuf {
        self.root.join(INTENTS_FILE_NAME)
    }
}
