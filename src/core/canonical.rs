//! Canonical naming for episodes.
//!
//! Turns names such as `Show.Name.S01E02` or `Show Name - 1x02` into a display
//! key of the form `Show Name 01x02`, so that the same episode ripped at
//! different resolutions collapses onto one key.

use once_cell::sync::Lazy;
use regex::Regex;

/// Season/episode marker: `S01E02`, `1x02`, `Season 1 Episode 2`, `3-07`, ...
static SEASON_LISTING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:\b|\.+)",
        r"(?:s(?:eason\s+)?)?",
        r"(?P<season>[0-9]+(?:\.[0-9]+)?)\s*",
        r"(?:[xe-]|\s+(?:ep(?:isode)?)?)\s*",
        r"(?P<episode>[0-9]+(?:\.[0-9]+)?)",
        r"(?:\b|\.+)",
    ))
    .expect("season listing regex should compile")
});

/// Canonical form of a media name.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalName {
    /// Title with the season/episode marker removed and dots spaced out.
    pub title: String,
    pub season: Option<f64>,
    pub episode: Option<f64>,
}

impl CanonicalName {
    /// Season/episode suffix: `EE`, `SSx0?` or `SSxEE`.
    pub fn suffix(&self) -> Option<String> {
        let episode = self.episode.map(format_number);

        match (self.season.map(format_number), episode) {
            (Some(season), Some(episode)) => Some(format!("{}x{}", season, episode)),
            (Some(season), None) => Some(format!("{}x0?", season)),
            (None, Some(episode)) => Some(episode),
            (None, None) => None,
        }
    }

    /// The deduplication key (also the base of the display label).
    pub fn key(&self) -> String {
        let suffix = self.suffix().unwrap_or_default();
        trim_dots(&format!("{} {}", self.title, suffix)).to_string()
    }
}

/// Canonicalize a name.
///
/// Explicit `season`/`episode` values win over numbers found in the name, but
/// the marker is stripped from the title either way.
pub fn canonicalize(name: &str, season: Option<f64>, episode: Option<f64>) -> CanonicalName {
    let (stripped, found_season, found_episode) = split_season_listing(name);

    CanonicalName {
        title: trim_dots(&stripped).replace('.', " "),
        season: season.or(found_season),
        episode: episode.or(found_episode),
    }
}

/// Remove the first season/episode marker from a name.
///
/// Returns the remaining name and the numbers the marker carried. A marker at
/// the very start of the name is not considered.
pub fn split_season_listing(name: &str) -> (String, Option<f64>, Option<f64>) {
    let start = name.chars().next().map_or(0, char::len_utf8);

    let Some(caps) = SEASON_LISTING.captures_at(name, start) else {
        return (name.to_string(), None, None);
    };

    let Some(span) = caps.get(0) else {
        return (name.to_string(), None, None);
    };

    let season = caps.name("season").and_then(|m| m.as_str().parse().ok());
    let episode = caps.name("episode").and_then(|m| m.as_str().parse().ok());

    let stripped = format!("{}{}", &name[..span.start()], &name[span.end()..]);
    (stripped.trim().to_string(), season, episode)
}

/// Render a season or episode number with at least two digits.
///
/// Fractional parts are dropped, so a recap numbered 5.5 shows as `05` just
/// like episode 5. This only affects display; the raw number stays in the
/// record's attributes.
pub fn format_number(value: f64) -> String {
    format!("{:02}", value.trunc() as i64)
}

fn trim_dots(s: &str) -> &str {
    s.trim_matches(|c| c == '.' || c == ' ')
}
