//! Open directory crawler.
//!
//! Walks a tree of HTML index pages depth-first and yields one record at a
//! time: plain files as [`CrawlRecord::File`], subtitle folders as a single
//! [`CrawlRecord::Subtitles`] bundle. Nothing is fetched until the consumer
//! pulls past the records that precede it, and every page is read line by
//! line as it arrives.
//!
//! Failure policy: the root listing failing is always fatal. A failing
//! sub-directory is skipped with a warning unless `fail_fast` is set.

use crate::core::links::{extract_links, Link};
use crate::core::parser::{FilenameParser, MediaNameParser};
use crate::models::config::CrawlConfig;
use crate::models::media::{CrawlRecord, FileRecord, MediaAttributes, SubtitleBundle};
use crate::utils::web;
use crate::{Error, Result};
use futures::stream::{self, Stream};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Where index pages come from.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    type Page: PageLines;

    /// Start loading the page at `url`.
    async fn open(&self, url: &Url) -> Result<Self::Page>;
}

/// A page body read one line at a time.
#[allow(async_fn_in_trait)]
pub trait PageLines {
    /// Next line of the body, or `None` once it is exhausted.
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Counters collected while crawling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Directory listings opened.
    pub directories: usize,
    /// File records produced (including subtitle files).
    pub files: usize,
    /// Subtitle bundles produced.
    pub subtitle_bundles: usize,
    /// URLs of directories that failed to load and were skipped.
    pub failed: Vec<String>,
}

/// One directory listing being read.
struct Frame<P> {
    url: Url,
    page: P,
    links: VecDeque<Link>,
    /// Set when this directory is a subtitle folder; everything below it lands here.
    bundle: Option<SubtitleBundle>,
}

/// Lazy depth-first crawler over an open directory.
pub struct Crawler<S: PageSource> {
    source: S,
    parser: Box<dyn MediaNameParser + Send + Sync>,
    subtitle_dirs: Vec<String>,
    fail_fast: bool,
    root: Option<Url>,
    visited: HashSet<Url>,
    stack: Vec<Frame<S::Page>>,
    stats: CrawlStats,
}

impl<S: PageSource> Crawler<S> {
    /// Create a crawler rooted at `url`.
    ///
    /// A relative `url` is resolved against `parent`, which is then required.
    /// If it resolves to `parent` itself or one of its ancestors the crawler
    /// yields nothing.
    pub fn new(source: S, url: &str, parent: Option<&str>) -> Result<Self> {
        let root = match Url::parse(url) {
            Ok(url) => Some(web::ensure_directory_url(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let parent = parent.ok_or_else(|| {
                    Error::InvalidArgument(format!("relative URL '{}' requires a parent", url))
                })?;
                let parent = web::ensure_directory_url(Url::parse(parent)?);
                let resolved = web::ensure_directory_url(parent.join(url)?);

                if web::is_ancestor_or_self(&resolved, &parent) {
                    tracing::debug!("Skipping {}: points back up to {}", resolved, parent);
                    None
                } else {
                    Some(resolved)
                }
            }
            Err(e) => return Err(e.into()),
        };

        let defaults = CrawlConfig::default();

        Ok(Self {
            source,
            parser: Box::new(FilenameParser::new()),
            subtitle_dirs: defaults.subtitle_dirs,
            fail_fast: defaults.fail_fast,
            root,
            visited: HashSet::new(),
            stack: Vec::new(),
            stats: CrawlStats::default(),
        })
    }

    /// Apply crawl settings.
    pub fn with_config(mut self, config: &CrawlConfig) -> Self {
        self.subtitle_dirs = config.subtitle_dirs.clone();
        self.fail_fast = config.fail_fast;
        self
    }

    /// Use a custom name parser.
    pub fn with_parser(mut self, parser: Box<dyn MediaNameParser + Send + Sync>) -> Self {
        self.parser = parser;
        self
    }

    /// Counters so far.
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Pull the next record, fetching pages only as needed.
    pub async fn next_record(&mut self) -> Result<Option<CrawlRecord>> {
        if let Some(root) = self.root.take() {
            tracing::info!("Crawling {}", root);
            self.visited.insert(root.clone());
            let page = self.source.open(&root).await?;
            self.push_frame(root, page);
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };

            if let Some(link) = frame.links.pop_front() {
                let base = frame.url.clone();
                if let Some(record) = self.visit(&base, link).await? {
                    return Ok(Some(record));
                }
                continue;
            }

            match frame.page.next_line().await {
                Ok(Some(line)) => frame.links.extend(extract_links(&line)),
                Ok(None) => {
                    if let Some(record) = self.pop_frame() {
                        return Ok(Some(record));
                    }
                }
                Err(e) => {
                    if self.stack.len() == 1 || self.fail_fast {
                        return Err(self.abort(e));
                    }
                    self.skip_failed(e);
                    if let Some(record) = self.pop_frame() {
                        return Ok(Some(record));
                    }
                }
            }
        }
    }

    /// Drain the whole crawl into a vector.
    pub async fn collect_all(&mut self) -> Result<Vec<CrawlRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Turn the crawler into a stream of records.
    ///
    /// The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<CrawlRecord>> {
        stream::unfold(Some(self), |state| async move {
            let Some(mut crawler) = state else {
                return None;
            };
            match crawler.next_record().await {
                Ok(Some(record)) => Some((Ok(record), Some(crawler))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Handle one link found in the listing at `base`.
    async fn visit(&mut self, base: &Url, link: Link) -> Result<Option<CrawlRecord>> {
        let mut resolved = match base.join(&link.href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping unresolvable link '{}': {}", link.href, e);
                return Ok(None);
            }
        };
        resolved.set_fragment(None);

        if resolved.origin() != base.origin() {
            tracing::debug!("Skipping off-site link {}", resolved);
            return Ok(None);
        }

        if !link.is_dir {
            let record = self.file_record(&link.href, &resolved);
            self.stats.files += 1;
            return Ok(self.deliver(CrawlRecord::File(record)));
        }

        if web::is_ancestor_or_self(&resolved, base) {
            tracing::trace!("Skipping {}: points back up", resolved);
            return Ok(None);
        }
        if !self.visited.insert(resolved.clone()) {
            tracing::trace!("Skipping {}: already listed", resolved);
            return Ok(None);
        }

        tracing::debug!("Listing {}", resolved);
        match self.source.open(&resolved).await {
            Ok(page) => self.push_frame(resolved, page),
            Err(e) if self.fail_fast => return Err(self.abort(e)),
            Err(e) => self.skip_failed(e),
        }

        Ok(None)
    }

    fn file_record(&self, href: &str, url: &Url) -> FileRecord {
        let file_name = web::last_segment(url);
        let attributes = self.parser.parse(&file_name).unwrap_or_else(|e| {
            tracing::debug!("{}; using the bare file name", e);
            MediaAttributes::fallback(&file_name)
        });

        FileRecord {
            origin: href.to_string(),
            url: url.to_string(),
            path: web::decode(url.path()),
            directory: web::parent_directory(url),
            attributes,
            subtitles: Vec::new(),
        }
    }

    fn push_frame(&mut self, url: Url, page: S::Page) {
        self.stats.directories += 1;

        let bundle = self.is_subtitle_dir(&url).then(|| SubtitleBundle {
            subtitle_for: web::parent_directory(&url),
            subtitles: Vec::new(),
        });

        self.stack.push(Frame {
            url,
            page,
            links: VecDeque::new(),
            bundle,
        });
    }

    /// Close the innermost listing, yielding its bundle if it was a subtitle folder.
    fn pop_frame(&mut self) -> Option<CrawlRecord> {
        let bundle = self.stack.pop()?.bundle?;
        let record = self.deliver(CrawlRecord::Subtitles(bundle));
        if record.is_some() {
            self.stats.subtitle_bundles += 1;
        }
        record
    }

    /// Route a record into the nearest open subtitle bundle, or hand it out.
    fn deliver(&mut self, record: CrawlRecord) -> Option<CrawlRecord> {
        let Some(bundle) = self
            .stack
            .iter_mut()
            .rev()
            .find_map(|frame| frame.bundle.as_mut())
        else {
            return Some(record);
        };

        match record {
            CrawlRecord::File(file) => bundle.subtitles.push(file),
            CrawlRecord::Subtitles(nested) => bundle.subtitles.extend(nested.subtitles),
        }
        None
    }

    fn is_subtitle_dir(&self, url: &Url) -> bool {
        let path = web::decode(url.path());
        self.subtitle_dirs
            .iter()
            .any(|dir| path.ends_with(&format!("/{}", dir)))
    }

    /// Drop every open listing; the crawl is over.
    fn abort(&mut self, error: Error) -> Error {
        tracing::debug!("Abandoning {} open listing(s)", self.stack.len());
        self.stack.clear();
        error
    }

    fn skip_failed(&mut self, error: Error) {
        tracing::warn!("Skipping directory: {}", error);
        let url = match &error {
            Error::FetchError { url, .. } => url.clone(),
            other => other.to_string(),
        };
        self.stats.failed.push(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory listings keyed by absolute URL.
    #[derive(Default)]
    struct StaticSource {
        pages: HashMap<String, String>,
    }

    impl StaticSource {
        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    struct StaticPage {
        lines: VecDeque<String>,
    }

    impl PageSource for StaticSource {
        type Page = StaticPage;

        async fn open(&self, url: &Url) -> Result<StaticPage> {
            let body = self
                .pages
                .get(url.as_str())
                .ok_or_else(|| Error::fetch(url, "HTTP 404 Not Found"))?;
            Ok(StaticPage {
                lines: body.lines().map(str::to_string).collect(),
            })
        }
    }

    impl PageLines for StaticPage {
        async fn next_line(&mut self) -> Result<Option<String>> {
            Ok(self.lines.pop_front())
        }
    }

    fn listing(hrefs: &[&str]) -> String {
        hrefs
            .iter()
            .map(|href| format!("<a href=\"{}\">{}</a>", href, href))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn file_names(records: &[CrawlRecord]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| match r {
                CrawlRecord::File(f) => Some(f.attributes.file_name.clone()),
                CrawlRecord::Subtitles(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_relative_url_requires_parent() {
        let result = Crawler::new(StaticSource::default(), "Show/", None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_relative_url_back_to_parent_yields_nothing() {
        let source = StaticSource::default().page("http://host/a/", &listing(&["x.mkv"]));
        let mut crawler = Crawler::new(source, "../", Some("http://host/a/b/")).unwrap();

        assert!(crawler.next_record().await.unwrap().is_none());
        assert_eq!(crawler.stats().directories, 0);
    }

    #[tokio::test]
    async fn test_depth_first_order() {
        let source = StaticSource::default()
            .page("http://host/", &listing(&["a/", "root.mkv"]))
            .page("http://host/a/", &listing(&["b/", "a1.mkv"]))
            .page("http://host/a/b/", &listing(&["b1.mkv"]));

        let mut crawler = Crawler::new(source, "http://host/", None).unwrap();
        let records = crawler.collect_all().await.unwrap();

        assert_eq!(file_names(&records), vec!["b1.mkv", "a1.mkv", "root.mkv"]);
        assert_eq!(crawler.stats().directories, 3);
        assert_eq!(crawler.stats().files, 3);
    }

    #[tokio::test]
    async fn test_file_record_fields() {
        let source = StaticSource::default()
            .page("http://host/tv/", &listing(&["Show%20Name%20-%2001.mkv"]));

        let mut crawler = Crawler::new(source, "http://host/tv", None).unwrap();
        let Some(CrawlRecord::File(file)) = crawler.next_record().await.unwrap() else {
            panic!("Expected a file record");
        };

        assert_eq!(file.origin, "Show%20Name%20-%2001.mkv");
        assert_eq!(file.url, "http://host/tv/Show%20Name%20-%2001.mkv");
        assert_eq!(file.path, "/tv/Show Name - 01.mkv");
        assert_eq!(file.directory, "/tv/");
        assert_eq!(file.attributes.file_name, "Show Name - 01.mkv");
        assert_eq!(file.attributes.title.as_deref(), Some("Show Name"));
        assert_eq!(file.attributes.episode, Some(1.0));
    }

    #[tokio::test]
    async fn test_lazy_fetching() {
        // The sub-directory is missing: a fetch there is only attempted once
        // the consumer pulls past the first file.
        let source = StaticSource::default().page("http://host/", &listing(&["first.mkv", "later/"]));
        let config = CrawlConfig {
            fail_fast: true,
            ..Default::default()
        };

        let mut crawler = Crawler::new(source, "http://host/", None)
            .unwrap()
            .with_config(&config);

        assert!(crawler.next_record().await.unwrap().is_some());
        assert!(crawler.next_record().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_subdirectory_is_isolated() {
        let source = StaticSource::default()
            .page("http://host/", &listing(&["broken/", "ok/", "root.mkv"]))
            .page("http://host/ok/", &listing(&["ok.mkv"]));

        let mut crawler = Crawler::new(source, "http://host/", None).unwrap();
        let records = crawler.collect_all().await.unwrap();

        assert_eq!(file_names(&records), vec!["ok.mkv", "root.mkv"]);
        assert_eq!(crawler.stats().failed, vec!["http://host/broken/"]);
    }

    #[tokio::test]
    async fn test_failed_root_is_fatal() {
        let mut crawler = Crawler::new(StaticSource::default(), "http://host/", None).unwrap();
        let result = crawler.next_record().await;
        assert!(matches!(result, Err(Error::FetchError { .. })));
    }

    #[tokio::test]
    async fn test_stream_yields_records_in_order() {
        use futures::StreamExt;

        let source = StaticSource::default()
            .page("http://host/", &listing(&["a/", "root.mkv"]))
            .page("http://host/a/", &listing(&["a1.mkv"]));

        let crawler = Crawler::new(source, "http://host/", None).unwrap();
        let records: Vec<CrawlRecord> = crawler
            .into_stream()
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(file_names(&records), vec!["a1.mkv", "root.mkv"]);
    }

    #[tokio::test]
    async fn test_stream_ends_after_error() {
        use futures::StreamExt;

        let crawler = Crawler::new(StaticSource::default(), "http://host/", None).unwrap();
        let results: Vec<_> = crawler.into_stream().collect().await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[tokio::test]
    async fn test_off_site_links_skipped() {
        let source = StaticSource::default().page(
            "http://host/",
            &listing(&["http://nginx.org/", "https://example.com/x.mkv", "local.mkv"]),
        );

        let mut crawler = Crawler::new(source, "http://host/", None).unwrap();
        let records = crawler.collect_all().await.unwrap();
        assert_eq!(file_names(&records), vec!["local.mkv"]);
    }

    #[tokio::test]
    async fn test_custom_subtitle_dirs() {
        let source = StaticSource::default()
            .page("http://host/", &listing(&["Subtitles/", "ep.mkv"]))
            .page("http://host/Subtitles/", &listing(&["en.srt"]));
        let config = CrawlConfig {
            subtitle_dirs: vec!["Subtitles/".to_string()],
            ..Default::default()
        };

        let mut crawler = Crawler::new(source, "http://host/", None)
            .unwrap()
            .with_config(&config);
        let records = crawler.collect_all().await.unwrap();

        assert!(matches!(&records[0], CrawlRecord::Subtitles(b) if b.subtitles.len() == 1));
        assert_eq!(crawler.stats().subtitle_bundles, 1);
    }
}
