//! Filename parser module.
//!
//! Extracts from a media file name:
//! - Title
//! - Season and episode numbers
//! - Resolution
//! - File extension
//!
//! The crawler only depends on [`MediaNameParser`]; [`FilenameParser`] is the
//! regex-based implementation used by default.

use crate::models::media::MediaAttributes;
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;

/// Known media, subtitle and companion file extensions.
const KNOWN_EXTENSIONS: &[&str] = &[
    // Video
    "mkv", "mp4", "avi", "mov", "wmv", "m4v", "ts", "m2ts", "flv", "webm", "mpg", "mpeg", "vob",
    "ogv", "ogm", "divx", "3gp", "mts", "rm", "rmvb", "asf", "f4v", // Subtitles
    "srt", "ass", "ssa", "sub", "idx", "vtt", "sup", // Audio
    "mp3", "flac", "m4a", "aac", "ogg", "opus", "wav", "mka", // Other
    "nfo", "txt", "jpg", "jpeg", "png", "zip", "rar", "7z", "iso",
];

static RESOLUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:\d{3,4}[pi]|[48]k|\d{3,4}x\d{3,4})\b")
        .expect("resolution regex should compile")
});

/// Release group and tag blocks: `[SubsPlease]`, `(1080p)`, `{x265}`.
static BRACKETED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}").expect("tag regex should compile")
});

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ ._\-](?:19|20)\d{2}\b").expect("year regex should compile"));

/// Folders that sort a show's files rather than name it: `Season 1`, `S02`, `Specials`.
static SEASON_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:season[ ._\-]*\d{1,3}|s\d{1,3}|specials?|extras?)$")
        .expect("season folder regex should compile")
});

/// Episode markers, most specific first. Each may capture `season` and/or `episode`.
static EPISODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // S01E02, S01.E02, s1e2v2
        r"(?i)\bs(?P<season>\d{1,2})[ ._\-]?e(?P<episode>\d{1,4}(?:\.\d)?)(?:v\d)?\b",
        // 1x02
        r"(?i)\b(?P<season>\d{1,2})x(?P<episode>\d{2,3})\b",
        // Season 1, Season 1 Episode 2
        r"(?i)\bseason[ ._\-]*(?P<season>\d{1,2})(?:[ ._\-]*(?:ep?|episode)[ ._\-]*(?P<episode>\d{1,4}))?\b",
        // S02 on its own
        r"(?i)\bs(?P<season>\d{1,2})\b",
        // E05, Ep 05, Episode 5
        r"(?i)\b(?:ep?|episode)[ ._\-]*(?P<episode>\d{1,4}(?:\.\d)?)\b",
        // Show - 05
        r"\s-\s*(?P<episode>\d{1,4}(?:\.\d)?)(?:v\d)?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("episode regex should compile"))
    .collect()
});

/// Something that turns a file name into media attributes.
pub trait MediaNameParser {
    /// Parse a (percent-decoded) file name.
    fn parse(&self, name: &str) -> Result<MediaAttributes>;
}

/// Regex-based filename parser.
#[derive(Debug, Clone, Default)]
pub struct FilenameParser;

impl FilenameParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl MediaNameParser for FilenameParser {
    fn parse(&self, name: &str) -> Result<MediaAttributes> {
        let name = name.trim();
        if name.is_empty() {
            return Err(crate::Error::ParseError("empty file name".to_string()));
        }

        let (stem, extension) = split_extension(name);
        let resolution = RESOLUTION.find(stem).map(|m| m.as_str().to_string());

        // Tags go before anything else so "[1080p]" or "(2020)" can't end the title early
        let bare = BRACKETED.replace_all(stem, " ");

        let mut cut = bare.len();
        let mut season = None;
        let mut episode = None;

        if let Some(caps) = EPISODE_PATTERNS.iter().find_map(|re| re.captures(&bare)) {
            if let Some(m) = caps.get(0) {
                cut = m.start();
            }
            season = caps.name("season").and_then(|m| m.as_str().parse().ok());
            episode = caps.name("episode").and_then(|m| m.as_str().parse().ok());
        }

        if let Some(m) = RESOLUTION.find(&bare) {
            cut = cut.min(m.start());
        }
        if let Some(m) = YEAR.find(&bare) {
            if m.start() > 0 {
                cut = cut.min(m.start());
            }
        }

        let title = clean_title(&bare[..cut]);

        tracing::trace!(
            "Parsed '{}': title={:?} season={:?} episode={:?} resolution={:?}",
            name,
            title,
            season,
            episode,
            resolution
        );

        Ok(MediaAttributes {
            file_name: name.to_string(),
            title,
            episode,
            season,
            resolution,
            extension,
        })
    }
}

/// Split a known extension off a file name.
fn split_extension(name: &str) -> (&str, Option<String>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && KNOWN_EXTENSIONS.contains(&ext.to_lowercase().as_str()) =>
        {
            (stem, Some(ext.to_string()))
        }
        _ => (name, None),
    }
}

/// Turn the title part of a name into readable text.
fn clean_title(raw: &str) -> Option<String> {
    let mut title = raw.replace('_', " ");
    if !title.trim().contains(' ') {
        title = title.replace('.', " ");
    }

    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    let title = title.trim_matches(|c: char| c == '-' || c == '.' || c == ' ');

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Whether a directory name groups files by season or resolution instead of
/// naming the show (`Season 1`, `S02`, `Specials`, `1080p`, `[720p]`).
pub fn is_grouping_folder(name: &str) -> bool {
    let bare = name.trim_matches(|c: char| c.is_whitespace() || "[](){}".contains(c));

    SEASON_FOLDER.is_match(bare)
        || RESOLUTION
            .find(bare)
            .is_some_and(|m| m.start() == 0 && m.end() == bare.len())
}

/// Parse a file name with the default parser (convenience function).
pub fn parse_media_name(name: &str) -> Result<MediaAttributes> {
    FilenameParser::new().parse(name)
}
