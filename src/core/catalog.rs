//! Catalog building and selection.
//!
//! The crawl is drained completely before anything is offered to the picker:
//! a resolution variant or subtitle folder found late still has to land on an
//! entry emitted early.

use crate::core::aggregator::Aggregator;
use crate::core::crawler::{CrawlStats, Crawler, PageSource};
use crate::models::media::{CanonicalEntry, FileRecord};
use crate::{Error, Result};

/// Interactive (or scripted) choice among labels.
pub trait Picker {
    /// Return the index of the chosen label.
    ///
    /// Fails with [`Error::SelectionCancelled`] when the user backs out.
    fn select(&mut self, labels: &[String]) -> Result<usize>;
}

/// A fully crawled and grouped open directory.
#[derive(Debug)]
pub struct Catalog {
    aggregator: Aggregator,
    entries: Vec<CanonicalEntry>,
    stats: CrawlStats,
}

impl Catalog {
    /// Crawl everything and group it.
    ///
    /// `on_entry` is called with each label as soon as its key is first seen.
    pub async fn build<S, F>(mut crawler: Crawler<S>, show_path: bool, mut on_entry: F) -> Result<Self>
    where
        S: PageSource,
        F: FnMut(&str, &CrawlStats),
    {
        let mut aggregator = Aggregator::new(show_path);

        while let Some(record) = crawler.next_record().await? {
            if let Some((label, _)) = aggregator.consume(record) {
                on_entry(&label, crawler.stats());
            }
        }

        let stats = crawler.stats().clone();
        tracing::info!(
            "Listed {} directories: {} files, {} entries, {} subtitle folders",
            stats.directories,
            stats.files,
            aggregator.len(),
            stats.subtitle_bundles
        );

        Ok(Self {
            entries: aggregator.entries(),
            aggregator,
            stats,
        })
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> &[CanonicalEntry] {
        &self.entries
    }

    /// Crawl counters.
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Labels in discovery order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    /// Let the picker choose an entry and resolve it.
    pub fn pick<P: Picker>(&self, picker: &mut P) -> Result<Vec<FileRecord>> {
        if self.entries.is_empty() {
            return Err(Error::other("Nothing to pick from: no files found"));
        }

        let idx = picker.select(&self.labels())?;
        let entry = self
            .entries
            .get(idx)
            .ok_or_else(|| Error::other(format!("Picker returned unknown entry {}", idx)))?;

        Ok(self.resolve(&entry.variants[0]))
    }

    /// Resolve a file to all variants of its key, subtitles attached.
    pub fn resolve(&self, chosen: &FileRecord) -> Vec<FileRecord> {
        self.aggregator.resolve(chosen)
    }
}
