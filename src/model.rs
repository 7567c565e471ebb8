//! Typed how-to content as produced by the validator.
//!
//! Every value here is constructed by [`crate::validate`] and never mutated
//! afterwards. Field names serialize in camelCase so a validated guide maps
//! back onto the content JSON shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system family a guide is written for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Ios,
    Ipados,
    Android,
    Windows,
    Macos,
}

impl OsFamily {
    pub const ALL: [OsFamily; 5] = [
        OsFamily::Ios,
        OsFamily::Ipados,
        OsFamily::Android,
        OsFamily::Windows,
        OsFamily::Macos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Ios => "ios",
            OsFamily::Ipados => "ipados",
            OsFamily::Android => "android",
            OsFamily::Windows => "windows",
            OsFamily::Macos => "macos",
        }
    }

    /// Parse the lowercase identifier used in content files.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|os| os.as_str() == value)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsVersion {
    pub min: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// A media attachment of a step. `alt` is always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    Image {
        id: String,
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Audio {
        id: String,
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transcript: Option<String>,
    },
    Video {
        id: String,
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        poster: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        captions: Option<String>,
    },
}

impl Media {
    pub fn id(&self) -> &str {
        match self {
            Media::Image { id, .. }
            | Media::Audio { id, .. }
            | Media::Video { id, .. } => id,
        }
    }

    pub fn alt(&self) -> &str {
        match self {
            Media::Image { alt, .. }
            | Media::Audio { alt, .. }
            | Media::Video { alt, .. } => alt,
        }
    }

    pub fn src(&self) -> &str {
        match self {
            Media::Image { src, .. }
            | Media::Audio { src, .. }
            | Media::Video { src, .. } => src,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub order: i64,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<Media>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub label: String,
    pub href: String,
}

/// A validated how-to guide for one OS family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    pub id: String,
    pub slug: String,
    pub os: OsFamily,
    pub os_version: OsVersion,
    pub title: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub estimated_minutes: f64,
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}
