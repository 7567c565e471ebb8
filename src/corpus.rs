use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    model::Guide,
    validate::{ValidationErrors, validate_how_to, validate_how_to_list},
    walker::{self, DiscoveredFile},
};

/// Pages every offline install caches before any guide.
const PRECACHE_SHELL: [&str; 2] = ["/", "/manifest.webmanifest"];

/// Default number of guide pages in the offline precache list.
pub const DEFAULT_PRECACHE_LIMIT: usize = 50;

/// An immutable set of validated guides.
///
/// A corpus is only ever built whole: reloading content produces a new
/// corpus rather than patching an existing one.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    guides: Vec<Guide>,
}

/// Validation outcome for a single content file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub relative_path: PathBuf,
    pub errors: Vec<String>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Corpus {
    /// Build a corpus from untyped candidates, all or nothing.
    pub fn from_candidates(
        candidates: &[Value],
    ) -> std::result::Result<Self, ValidationErrors> {
        validate_how_to_list(candidates).map(|guides| Self { guides })
    }

    /// Load and validate every content file below `root`.
    ///
    /// Fails with [`Error::InvalidContent`] when any file is unreadable JSON
    /// or an invalid guide; the errors of all files are reported together,
    /// each prefixed with the file's relative path.
    pub fn load(root: &Path) -> Result<Self> {
        let files = walker::discover_files(root)?;
        let parsed = read_candidates(&files);

        let mut guides = Vec::with_capacity(parsed.len());
        let mut errors = Vec::new();
        for (file, candidate) in files.iter().zip(parsed) {
            let label = file.relative_path.display();
            match candidate.map(|value| validate_how_to(&value)) {
                Ok(Ok(guide)) => guides.push(guide),
                Ok(Err(invalid)) => errors.extend(
                    invalid
                        .into_messages()
                        .into_iter()
                        .map(|message| format!("{label}: {message}")),
                ),
                Err(message) => errors.push(format!("{label}: {message}")),
            }
        }

        if !errors.is_empty() {
            warn!(
                root = %root.display(),
                errors = errors.len(),
                "content rejected"
            );
            return Err(Error::InvalidContent(ValidationErrors(errors)));
        }

        debug!(root = %root.display(), guides = guides.len(), "corpus loaded");
        Ok(Self { guides })
    }

    /// Validate every content file below `root` independently.
    ///
    /// Unlike [`Corpus::load`], a valid guide sitting in the folder of
    /// another OS family is reported too.
    pub fn check(root: &Path) -> Result<Vec<FileReport>> {
        let files = walker::discover_files(root)?;
        let parsed = read_candidates(&files);

        Ok(files
            .into_iter()
            .zip(parsed)
            .map(|(file, candidate)| {
                let errors = match candidate {
                    Ok(value) => match validate_how_to(&value) {
                        Ok(guide) => misfiled(&file, &guide).into_iter().collect(),
                        Err(invalid) => invalid.into_messages(),
                    },
                    Err(message) => vec![message],
                };
                FileReport {
                    relative_path: file.relative_path,
                    errors,
                }
            })
            .collect())
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Guide> {
        self.guides.iter().find(|guide| guide.slug == slug)
    }

    /// URLs an offline install should cache up front: the app shell, then
    /// the pages of the first `limit` guides in slug order.
    pub fn precache_urls(&self, limit: usize) -> Vec<String> {
        let mut slugs: Vec<&str> =
            self.guides.iter().map(|guide| guide.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();

        PRECACHE_SHELL
            .iter()
            .map(|url| url.to_string())
            .chain(
                slugs
                    .into_iter()
                    .take(limit)
                    .map(|slug| format!("/howto/{slug}")),
            )
            .collect()
    }
}

/// Flags a valid guide filed under another OS's folder.
fn misfiled(file: &DiscoveredFile, guide: &Guide) -> Option<String> {
    let folder = file.os_folder.as_deref()?;
    (!folder.eq_ignore_ascii_case(guide.os.as_str())).then(|| {
        format!(
            "Ordner '{folder}' passt nicht zum Betriebssystem '{}'.",
            guide.os
        )
    })
}

/// Read and parse files in parallel, keeping input order.
fn read_candidates(
    files: &[DiscoveredFile],
) -> Vec<std::result::Result<Value, String>> {
    files
        .par_iter()
        .map(|file| {
            let content = std::fs::read_to_string(&file.absolute_path)
                .map_err(|e| format!("Datei nicht lesbar: {e}"))?;
            serde_json::from_str(&content)
                .map_err(|e| format!("JSON ist ungültig: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn guide_json(slug: &str, os: &str) -> Value {
        json!({
            "id": slug,
            "slug": slug,
            "os": os,
            "osVersion": { "min": "1" },
            "title": format!("Anleitung {slug}"),
            "summary": "Kurze Zusammenfassung.",
            "keywords": ["hilfe"],
            "estimatedMinutes": 2,
            "steps": [{ "title": "Start", "description": "Los geht's." }]
        })
    }

    fn write_guide(root: &Path, os: &str, slug: &str, value: &Value) {
        let dir = root.join(os);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("{slug}.json")),
            serde_json::to_string_pretty(value).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn load_valid_directory() {
        let tmp = tempfile::tempdir().unwrap();
        write_guide(tmp.path(), "ios", "ios-a", &guide_json("ios-a", "ios"));
        write_guide(
            tmp.path(),
            "android",
            "android-b",
            &guide_json("android-b", "android"),
        );

        let corpus = Corpus::load(tmp.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert!(corpus.find_by_slug("ios-a").is_some());
        assert!(corpus.find_by_slug("missing").is_none());
    }

    #[test]
    fn load_is_all_or_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        write_guide(tmp.path(), "ios", "good", &guide_json("good", "ios"));
        let mut bad = guide_json("bad", "ios");
        bad["summary"] = json!("");
        write_guide(tmp.path(), "ios", "bad", &bad);
        std::fs::write(tmp.path().join("ios").join("broken.json"), "{ nope")
            .unwrap();

        let errors = match Corpus::load(tmp.path()).unwrap_err() {
            Error::InvalidContent(errors) => errors,
            other => panic!("expected invalid content, got {other:?}"),
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.messages()[0].contains("bad.json"));
        assert!(
            errors.messages()[0]
                .ends_with("Feld 'summary' fehlt oder ist leer.")
        );
        assert!(errors.messages()[1].contains("broken.json"));
        assert!(errors.messages()[1].contains("JSON ist ungültig"));
    }

    #[test]
    fn check_reports_each_file() {
        let tmp = tempfile::tempdir().unwrap();
        write_guide(tmp.path(), "ios", "good", &guide_json("good", "ios"));
        write_guide(tmp.path(), "ios", "wrong-os", &guide_json("x", "linux"));

        let reports = Corpus::check(tmp.path()).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].is_valid());
        assert!(!reports[1].is_valid());
        assert_eq!(reports[1].errors.len(), 1);
    }

    #[test]
    fn check_flags_guide_in_wrong_os_folder() {
        let tmp = tempfile::tempdir().unwrap();
        write_guide(tmp.path(), "ios", "ios-a", &guide_json("ios-a", "ios"));
        write_guide(
            tmp.path(),
            "windows",
            "macos-b",
            &guide_json("macos-b", "macos"),
        );
        std::fs::write(
            tmp.path().join("lose.json"),
            serde_json::to_string(&guide_json("lose", "android")).unwrap(),
        )
        .unwrap();

        let reports = Corpus::check(tmp.path()).unwrap();
        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_valid(), "ios/ios-a.json");
        assert!(reports[1].is_valid(), "lose.json has no OS folder");
        assert_eq!(
            reports[2].errors,
            ["Ordner 'windows' passt nicht zum Betriebssystem 'macos'."]
        );

        // Loading still accepts the misfiled guide.
        assert_eq!(Corpus::load(tmp.path()).unwrap().len(), 3);
    }

    #[test]
    fn from_candidates_prefixes_batch_index() {
        let mut bad = guide_json("b", "ios");
        bad["steps"] = json!([]);
        let errors =
            Corpus::from_candidates(&[guide_json("a", "ios"), bad]).unwrap_err();
        assert_eq!(
            errors.messages(),
            ["Eintrag 2: Feld 'steps' muss ein Array mit mindestens einem Eintrag sein."]
        );
    }

    #[test]
    fn precache_lists_shell_then_sorted_slugs() {
        let corpus = Corpus::from_candidates(&[
            guide_json("windows-screenshot", "windows"),
            guide_json("android-screenshot", "android"),
            guide_json("ios-screenshot", "ios"),
        ])
        .unwrap();

        assert_eq!(
            corpus.precache_urls(2),
            vec![
                "/",
                "/manifest.webmanifest",
                "/howto/android-screenshot",
                "/howto/ios-screenshot",
            ]
        );
        assert_eq!(corpus.precache_urls(DEFAULT_PRECACHE_LIMIT).len(), 5);
    }

    #[test]
    fn empty_corpus() {
        let corpus = Corpus::default();
        assert!(corpus.is_empty());
        assert_eq!(corpus.precache_urls(10).len(), 2);
    }
}
