//! Media-related data models.

use serde::{Deserialize, Serialize};

/// Attributes extracted from a file name by a [`MediaNameParser`].
///
/// [`MediaNameParser`]: crate::core::parser::MediaNameParser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaAttributes {
    /// File name the attributes were parsed from.
    pub file_name: String,
    /// Series or movie title.
    pub title: Option<String>,
    /// Episode number (may be fractional, e.g. 5.5 for a recap).
    pub episode: Option<f64>,
    /// Season number.
    pub season: Option<f64>,
    /// Resolution token (e.g., "1080p", "4K").
    pub resolution: Option<String>,
    /// File extension without the dot.
    pub extension: Option<String>,
}

impl MediaAttributes {
    /// Attributes for a name the parser could not make sense of.
    pub fn fallback(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            ..Default::default()
        }
    }
}

/// A leaf file discovered in a directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Raw href as advertised by the listing page.
    pub origin: String,
    /// Fully resolved URL.
    pub url: String,
    /// Percent-decoded path component of `url`.
    pub path: String,
    /// URL path of the directory that listed this file.
    pub directory: String,
    /// Parsed name attributes.
    pub attributes: MediaAttributes,
    /// Subtitles attached once the record is resolved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<FileRecord>,
}

/// A subtitle folder and every file found beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleBundle {
    /// URL path of the directory that lists the subtitle folder.
    pub subtitle_for: String,
    /// Subtitle files in discovery order.
    pub subtitles: Vec<FileRecord>,
}

/// One item produced by the crawler.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlRecord {
    File(FileRecord),
    Subtitles(SubtitleBundle),
}

/// All files sharing one canonical key.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalEntry {
    /// Normalized title plus season/episode suffix.
    pub key: String,
    /// Label shown in the picker.
    pub label: String,
    /// Resolution variants in first-seen order. Never empty.
    pub variants: Vec<FileRecord>,
    /// Subtitles known for the first variant's directory.
    pub attached_subtitles: Vec<FileRecord>,
}
