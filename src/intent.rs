//! Intent resolution and synonym expansion for search queries.
//!
//! An intent is a canonical meaning ("screenshot") with the phrases users
//! type for it. Resolution is exact after normalization; typo tolerance
//! lives in the search engine, which compares expanded terms against guide
//! tokens.

use std::{path::Path, sync::LazyLock};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    model::OsFamily,
    text_util::normalize,
};

/// Built-in intents and their synonym phrases, in resolution order.
const BUILTIN_INTENTS: &[(&str, &[&str])] = &[
    (
        "screenshot",
        &[
            "screenshot",
            "bildschirmfoto",
            "screen shot",
            "bildschirm foto",
            "screenhot",
        ],
    ),
    (
        "update",
        &["update", "aktualisieren", "system update", "software update"],
    ),
    (
        "sharing",
        &["teilen", "weitergeben", "airdrop", "veröffentlichen"],
    ),
];

/// Intents that only make sense on some OS families. Intents missing here
/// are available everywhere.
const OS_CAPABILITIES: &[(&str, &[OsFamily])] =
    &[("screenshot", &OsFamily::ALL)];

/// The process-wide default dictionary.
pub static DEFAULT_INTENTS: LazyLock<IntentDictionary> =
    LazyLock::new(IntentDictionary::builtin);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub label: String,
    pub synonyms: Vec<String>,
}

/// Ordered intent → synonyms mapping. Earlier intents win when a phrase is
/// listed under more than one label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IntentDictionary {
    intents: Vec<Intent>,
}

impl IntentDictionary {
    pub fn builtin() -> Self {
        BUILTIN_INTENTS
            .iter()
            .map(|(label, synonyms)| {
                (label.to_string(), synonyms.iter().map(|s| s.to_string()))
            })
            .collect()
    }

    /// Parse a JSON object of the form `{"label": ["phrase", ...]}`,
    /// keeping the order of the file.
    pub fn from_json(source: &str) -> std::result::Result<Self, String> {
        let map: Map<String, Value> =
            serde_json::from_str(source).map_err(|e| e.to_string())?;

        let mut intents = Vec::with_capacity(map.len());
        for (label, value) in map {
            let synonyms: Vec<String> = serde_json::from_value(value)
                .map_err(|e| format!("intent '{label}': {e}"))?;
            intents.push(Intent { label, synonyms });
        }
        Ok(Self { intents })
    }

    /// Load a dictionary file written in the format of [`Self::from_json`].
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source).map_err(|e| {
            Error::Config(format!(
                "invalid intent dictionary {}: {e}",
                path.display()
            ))
        })
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn get(&self, label: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.label == label)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl<L, S> FromIterator<(L, S)> for IntentDictionary
where
    L: Into<String>,
    S: IntoIterator,
    S::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, S)>>(iter: I) -> Self {
        Self {
            intents: iter
                .into_iter()
                .map(|(label, synonyms)| Intent {
                    label: label.into(),
                    synonyms: synonyms.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }
}

/// A query that matched one of the dictionary's intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentResolution {
    pub intent: String,
    /// Normalized, non-empty, de-duplicated synonyms in dictionary order.
    pub synonyms: Vec<String>,
}

/// Resolve `query` to an intent when its normalized form equals one of the
/// intent's normalized synonyms.
pub fn resolve_intent(
    query: &str,
    dictionary: &IntentDictionary,
) -> Option<IntentResolution> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return None;
    }

    dictionary.intents.iter().find_map(|intent| {
        let synonyms = normalized_synonyms(&intent.synonyms);
        synonyms
            .iter()
            .any(|synonym| *synonym == normalized)
            .then(|| IntentResolution {
                intent: intent.label.clone(),
                synonyms,
            })
    })
}

/// The normalized query plus, when it resolves, every synonym of its intent.
pub fn expand_by_intent(query: &str, dictionary: &IntentDictionary) -> Vec<String> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut terms = vec![normalized];
    if let Some(resolution) = resolve_intent(query, dictionary) {
        for synonym in resolution.synonyms {
            if !terms.contains(&synonym) {
                terms.push(synonym);
            }
        }
    }
    terms
}

/// Whether guides for `os` are relevant to `intent`.
pub fn intent_supports_os(intent: &str, os: OsFamily) -> bool {
    OS_CAPABILITIES
        .iter()
        .find(|(label, _)| *label == intent)
        .is_none_or(|(_, families)| families.contains(&os))
}

fn normalized_synonyms(synonyms: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(synonyms.len());
    for synonym in synonyms {
        let normalized = normalize(synonym);
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}
