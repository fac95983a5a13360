//! Grouping of crawled files into canonical entries.
//!
//! The aggregator keeps two maps for the duration of one crawl: subtitle files
//! by the directory they belong to, and canonical entries by key. Each key is
//! emitted once, on first sight; later files with the same key only join that
//! entry's variants.
//!
//! Subtitle folders may be discovered after the files they belong to, so the
//! `[subtitles]` marker on an emitted label is provisional. [`Aggregator::entries`]
//! and [`Aggregator::resolve`] see everything consumed so far.

use crate::core::canonical::{canonicalize, CanonicalName};
use crate::core::parser::is_grouping_folder;
use crate::models::media::{CanonicalEntry, CrawlRecord, FileRecord, MediaAttributes};
use std::collections::HashMap;

/// First file seen for a key plus the variants that joined it.
#[derive(Debug, Clone)]
struct Group {
    key: String,
    variants: Vec<FileRecord>,
}

/// Deduplicates crawled files by canonical key.
#[derive(Debug, Default)]
pub struct Aggregator {
    show_path: bool,
    subtitles: HashMap<String, Vec<FileRecord>>,
    groups: Vec<Group>,
    index: HashMap<String, usize>,
}

/// Canonical name for a file's attributes.
///
/// The base name is the parsed title when there is one, the file name otherwise.
/// Both are expected to be percent-decoded already.
pub fn canonical_name(attributes: &MediaAttributes) -> CanonicalName {
    let base = attributes.title.as_deref().unwrap_or(&attributes.file_name);
    canonicalize(base, attributes.season, attributes.episode)
}

/// Canonical key for a file.
///
/// A name that is nothing but an episode marker (`S01E01.1080p.mkv`) borrows
/// its title from the nearest enclosing directory that isn't a season or
/// resolution folder.
pub fn canonical_key(record: &FileRecord) -> String {
    let attributes = &record.attributes;
    let marker_only =
        attributes.title.is_none() && (attributes.season.is_some() || attributes.episode.is_some());

    if !marker_only {
        return canonical_name(attributes).key();
    }

    let show = record
        .directory
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !is_grouping_folder(segment))
        .unwrap_or_default();
    canonicalize(show, attributes.season, attributes.episode).key()
}

impl Aggregator {
    /// Create an aggregator. `show_path` appends each file's path to its label.
    pub fn new(show_path: bool) -> Self {
        Self {
            show_path,
            ..Default::default()
        }
    }

    /// Consume one crawl record.
    ///
    /// Returns the label and file for the first file of each canonical key;
    /// everything else returns `None`.
    pub fn consume(&mut self, record: CrawlRecord) -> Option<(String, FileRecord)> {
        match record {
            CrawlRecord::Subtitles(bundle) => {
                tracing::debug!(
                    "{} subtitle file(s) for {}",
                    bundle.subtitles.len(),
                    bundle.subtitle_for
                );
                self.subtitles
                    .entry(bundle.subtitle_for)
                    .or_default()
                    .extend(bundle.subtitles);
                None
            }
            CrawlRecord::File(file) => self.consume_file(file),
        }
    }

    fn consume_file(&mut self, file: FileRecord) -> Option<(String, FileRecord)> {
        let key = canonical_key(&file);

        if let Some(&idx) = self.index.get(&key) {
            if file.attributes.resolution.is_some() {
                tracing::trace!("'{}' is another variant of '{}'", file.path, key);
                self.groups[idx].variants.push(file);
            }
            return None;
        }

        let label = self.label(&key, &file);
        self.index.insert(key.clone(), self.groups.len());
        self.groups.push(Group {
            key,
            variants: vec![file.clone()],
        });

        Some((label, file))
    }

    /// Display label for the first file of a key.
    fn label(&self, key: &str, file: &FileRecord) -> String {
        let mut label = key.to_string();

        if !self.subtitles_for(file).is_empty() {
            label.push_str(" [subtitles]");
        }
        if let Some(ext) = &file.attributes.extension {
            label.push_str(&format!(" [{}]", ext));
        }
        if self.show_path {
            label.push_str(&format!(" @ '{}'", file.path));
        }

        label
    }

    /// Subtitles for a file: the bundle of its directory or its nearest ancestor.
    pub fn subtitles_for(&self, file: &FileRecord) -> &[FileRecord] {
        let mut dir = file.directory.as_str();

        loop {
            if let Some(subs) = self.subtitles.get(dir) {
                return subs;
            }
            let Some(idx) = dir.trim_end_matches('/').rfind('/') else {
                return &[];
            };
            dir = &dir[..=idx];
        }
    }

    /// Number of distinct canonical keys seen.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no file has been consumed yet.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All entries in first-seen order, labelled with everything known so far.
    pub fn entries(&self) -> Vec<CanonicalEntry> {
        self.groups
            .iter()
            .map(|group| {
                let first = &group.variants[0];
                CanonicalEntry {
                    key: group.key.clone(),
                    label: self.label(&group.key, first),
                    variants: group.variants.clone(),
                    attached_subtitles: self.subtitles_for(first).to_vec(),
                }
            })
            .collect()
    }

    /// Resolve a picked file to every variant of its key, subtitles attached.
    pub fn resolve(&self, chosen: &FileRecord) -> Vec<FileRecord> {
        let key = canonical_key(chosen);

        let mut variants = match self.index.get(&key) {
            Some(&idx) => self.groups[idx].variants.clone(),
            None => vec![chosen.clone()],
        };

        let subtitles = self.subtitles_for(chosen);
        if !subtitles.is_empty() {
            for variant in &mut variants {
                variant.subtitles = subtitles.to_vec();
            }
        }

        tracing::debug!(
            "Resolved '{}' to {} variant(s), {} subtitle file(s)",
            key,
            variants.len(),
            subtitles.len()
        );

        variants
    }
}
