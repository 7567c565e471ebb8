//! Structural validation of untyped how-to content.
//!
//! Validation never stops at the first problem: every field of a candidate
//! and every nested step and media entry is checked, and all violations are
//! returned together. Messages are German because they are shown to content
//! authors as-is.

use serde_json::{Map, Value};

use crate::model::{Guide, Media, OsFamily, OsVersion, Resource, Step};

/// All violations found in a candidate or a batch of candidates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.join("\n"))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    fn parse(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "image" => Some(MediaKind::Image),
            "audio" => Some(MediaKind::Audio),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "Bild",
            MediaKind::Audio => "Audio",
            MediaKind::Video => "Video",
        }
    }
}

/// Validate a single candidate guide.
pub fn validate_how_to(candidate: &Value) -> Result<Guide, ValidationErrors> {
    let Some(record) = candidate.as_object() else {
        return Err(ValidationErrors(vec!["HowTo muss ein Objekt sein.".into()]));
    };

    let mut errors = Vec::new();

    let id = get_string(record.get("id"));
    let slug = get_string(record.get("slug"));
    let title = get_string(record.get("title"));
    let summary = get_string(record.get("summary"));

    if id.is_none() {
        errors.push("Feld 'id' fehlt oder ist leer.".to_string());
    }
    if slug.is_none() {
        errors.push("Feld 'slug' fehlt oder ist leer.".to_string());
    }

    let os = record
        .get("os")
        .and_then(Value::as_str)
        .and_then(OsFamily::parse);
    if os.is_none() {
        let names: Vec<_> = OsFamily::ALL.iter().map(|os| os.as_str()).collect();
        errors.push(format!(
            "Feld 'os' muss eines von {} sein.",
            names.join(", ")
        ));
    }

    let os_version = validate_os_version(record.get("osVersion"), &mut errors);

    if title.is_none() {
        errors.push("Feld 'title' fehlt oder ist leer.".to_string());
    }
    if summary.is_none() {
        errors.push("Feld 'summary' fehlt oder ist leer.".to_string());
    }

    let keywords = string_list(record.get("keywords")).filter(|k| !k.is_empty());
    if keywords.is_none() {
        errors.push(
            "Feld 'keywords' muss ein Array aus nicht-leeren Zeichenketten sein."
                .to_string(),
        );
    }

    let estimated_minutes = record
        .get("estimatedMinutes")
        .and_then(Value::as_f64)
        .filter(|minutes| *minutes > 0.0);
    if estimated_minutes.is_none() {
        errors.push(
            "Feld 'estimatedMinutes' muss eine positive Zahl sein.".to_string(),
        );
    }

    let mut steps = Vec::new();
    match record.get("steps").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {
            for (index, item) in items.iter().enumerate() {
                match validate_step(item, index) {
                    Ok(step) => steps.push(step),
                    Err(step_errors) => errors.extend(step_errors),
                }
            }
        }
        _ => errors.push(
            "Feld 'steps' muss ein Array mit mindestens einem Eintrag sein."
                .to_string(),
        ),
    }

    let prerequisites = match present(record, "prerequisites") {
        None => None,
        Some(value) => {
            let parsed = string_list(Some(value));
            if parsed.is_none() {
                errors.push(
                    "Feld 'prerequisites' muss aus nicht-leeren Zeichenketten bestehen."
                        .to_string(),
                );
            }
            parsed
        }
    };

    let resources = match present(record, "resources") {
        None => None,
        Some(value) => validate_resources(value, &mut errors),
    };

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    match (id, slug, os, os_version, title, summary, keywords, estimated_minutes)
    {
        (
            Some(id),
            Some(slug),
            Some(os),
            Some(os_version),
            Some(title),
            Some(summary),
            Some(keywords),
            Some(estimated_minutes),
        ) => Ok(Guide {
            id,
            slug,
            os,
            os_version,
            title,
            summary,
            keywords,
            estimated_minutes,
            steps,
            prerequisites,
            resources,
        }),
        // Every missing field above has already recorded an error.
        _ => Err(ValidationErrors(vec![
            "HowTo ist unvollständig.".to_string(),
        ])),
    }
}

/// Validate a batch of candidates, all or nothing.
///
/// When any candidate fails, no guides are returned; the errors of every
/// failing candidate are prefixed with its 1-based position.
pub fn validate_how_to_list(
    candidates: &[Value],
) -> Result<Vec<Guide>, ValidationErrors> {
    let mut guides = Vec::with_capacity(candidates.len());
    let mut errors = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        match validate_how_to(candidate) {
            Ok(guide) => guides.push(guide),
            Err(candidate_errors) => errors.extend(
                candidate_errors
                    .into_messages()
                    .into_iter()
                    .map(|message| format!("Eintrag {}: {message}", index + 1)),
            ),
        }
    }

    if errors.is_empty() {
        Ok(guides)
    } else {
        Err(ValidationErrors(errors))
    }
}

fn validate_os_version(
    value: Option<&Value>,
    errors: &mut Vec<String>,
) -> Option<OsVersion> {
    let Some(record) = value.and_then(Value::as_object) else {
        errors.push("Feld 'osVersion' fehlt oder ist kein Objekt.".to_string());
        return None;
    };

    let min = get_string(record.get("min"));
    if min.is_none() {
        errors.push("Feld 'osVersion.min' fehlt oder ist leer.".to_string());
    }

    let max = match record.get("max") {
        None => None,
        Some(value) => {
            let max = get_string(Some(value));
            if max.is_none() {
                errors.push(
                    "Feld 'osVersion.max' muss eine nicht-leere Zeichenkette sein, falls gesetzt."
                        .to_string(),
                );
            }
            max
        }
    };

    min.map(|min| OsVersion { min, max })
}

fn validate_resources(
    value: &Value,
    errors: &mut Vec<String>,
) -> Option<Vec<Resource>> {
    let Some(items) = value.as_array() else {
        errors.push("Feld 'resources' muss ein Array sein.".to_string());
        return None;
    };

    let mut resources = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(record) = item.as_object() else {
            errors.push(format!("Ressource {}: kein Objekt.", index + 1));
            continue;
        };
        match (get_string(record.get("label")), get_string(record.get("href"))) {
            (Some(label), Some(href)) => resources.push(Resource { label, href }),
            _ => errors.push(format!(
                "Ressource {}: 'label' und 'href' werden benötigt.",
                index + 1
            )),
        }
    }

    (!resources.is_empty()).then_some(resources)
}

fn validate_step(candidate: &Value, index: usize) -> Result<Step, Vec<String>> {
    let position = index + 1;
    let Some(record) = candidate.as_object() else {
        return Err(vec![format!("Schritt {position} ist kein Objekt.")]);
    };

    let mut errors = Vec::new();

    let id = get_string(record.get("id"))
        .unwrap_or_else(|| format!("step-{position}"));
    let order = record
        .get("order")
        .and_then(Value::as_i64)
        .unwrap_or(position as i64);
    let title = get_string(record.get("title"));
    let description = get_string(record.get("description"));

    if title.is_none() {
        errors.push(format!("Schritt {position}: 'title' fehlt oder ist leer."));
    }
    if description.is_none() {
        errors.push(format!(
            "Schritt {position}: 'description' fehlt oder ist leer."
        ));
    }

    let mut media = Vec::new();
    if let Some(value) = record.get("media") {
        match value.as_array() {
            Some(items) => {
                for (media_index, item) in items.iter().enumerate() {
                    match validate_media(item, index, media_index) {
                        Ok(parsed) => media.push(parsed),
                        Err(media_errors) => errors.extend(media_errors),
                    }
                }
            }
            None => errors
                .push(format!("Schritt {position}: 'media' muss ein Array sein.")),
        }
    }

    let tips = match record.get("tips") {
        None => None,
        Some(value) => {
            let tips = string_list(Some(value));
            if tips.is_none() {
                errors.push(format!(
                    "Schritt {position}: 'tips' muss ein Array nicht-leerer Zeichenketten sein."
                ));
            }
            tips
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    match (title, description) {
        (Some(title), Some(description)) => Ok(Step {
            id,
            order,
            title,
            description,
            media: (!media.is_empty()).then_some(media),
            tips,
        }),
        _ => Err(vec![format!("Schritt {position} ist unvollständig.")]),
    }
}

fn validate_media(
    candidate: &Value,
    step_index: usize,
    media_index: usize,
) -> Result<Media, Vec<String>> {
    let step = step_index + 1;
    let position = media_index + 1;
    let Some(record) = candidate.as_object() else {
        return Err(vec![format!(
            "Schritt {step}, Medium {position}: kein Objekt."
        )]);
    };

    let mut errors = Vec::new();

    let kind = record.get("type").and_then(MediaKind::parse);
    let id = get_string(record.get("id"))
        .unwrap_or_else(|| format!("s{step}-media-{position}"));
    let alt = get_string(record.get("alt"));

    if kind.is_none() {
        errors.push(format!(
            "Schritt {step}, Medium {position}: Unbekannter Typ '{}'.",
            describe(record.get("type"))
        ));
    }
    if alt.is_none() {
        errors.push(format!(
            "Schritt {step}, Medium {position}: 'alt' fehlt oder ist leer."
        ));
    }

    let (Some(kind), Some(alt)) = (kind, alt) else {
        return Err(errors);
    };

    let Some(src) = get_string(record.get("src")) else {
        return Err(vec![format!(
            "Schritt {step}, {} {position}: 'src' fehlt oder ist leer.",
            kind.label()
        )]);
    };
    let description = get_string(record.get("description"));

    Ok(match kind {
        MediaKind::Image => Media::Image {
            id,
            src,
            alt,
            description,
            width: get_dimension(record.get("width")),
            height: get_dimension(record.get("height")),
        },
        MediaKind::Audio => Media::Audio {
            id,
            src,
            alt,
            description,
            transcript: get_string(record.get("transcript")),
        },
        MediaKind::Video => Media::Video {
            id,
            src,
            alt,
            description,
            poster: get_string(record.get("poster")),
            captions: get_string(record.get("captions")),
        },
    })
}

/// A trimmed, non-empty string, or `None`.
fn get_string(value: Option<&Value>) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// An array made only of non-blank strings, kept as written.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|item| {
            item.as_str()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
        .collect()
}

fn get_dimension(value: Option<&Value>) -> Option<u32> {
    value?.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// An optional field that is set, treating `null` as unset.
fn present<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|value| !value.is_null())
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
