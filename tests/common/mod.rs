//! Shared fixtures for integration tests.

#![allow(dead_code)]

use od_catalog::core::crawler::{PageLines, PageSource};
use od_catalog::{Error, Result};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use url::Url;

/// In-memory open directory keyed by absolute URL.
#[derive(Default)]
pub struct StaticSource {
    pages: HashMap<String, String>,
    broken: HashMap<String, String>,
    /// Every URL opened, in order.
    pub opened: RefCell<Vec<String>>,
}

impl StaticSource {
    /// Add a listing page.
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Add a listing that fails after yielding `body`.
    pub fn broken_page(mut self, url: &str, body: &str) -> Self {
        self.broken.insert(url.to_string(), body.to_string());
        self
    }
}

pub struct StaticPage {
    url: String,
    lines: VecDeque<String>,
    fails: bool,
}

impl PageSource for &StaticSource {
    type Page = StaticPage;

    async fn open(&self, url: &Url) -> Result<StaticPage> {
        self.opened.borrow_mut().push(url.to_string());

        if let Some(body) = self.pages.get(url.as_str()) {
            return Ok(StaticPage::new(url, body, false));
        }
        if let Some(body) = self.broken.get(url.as_str()) {
            return Ok(StaticPage::new(url, body, true));
        }
        Err(Error::fetch(url, "HTTP 404 Not Found"))
    }
}

impl StaticPage {
    fn new(url: &Url, body: &str, fails: bool) -> Self {
        Self {
            url: url.to_string(),
            lines: body.lines().map(str::to_string).collect(),
            fails,
        }
    }
}

impl PageLines for StaticPage {
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.fails => Err(Error::fetch(&self.url, "connection reset")),
            None => Ok(None),
        }
    }
}

/// Render an nginx-style autoindex page for the given hrefs.
pub fn listing(title: &str, hrefs: &[&str]) -> String {
    let mut html = format!(
        "<html>\n<head><title>Index of {title}</title></head>\n<body>\n<h1>Index of {title}</h1><hr><pre><a href=\"../\">../</a>\n"
    );
    for href in hrefs {
        html.push_str(&format!(
            "<a href=\"{href}\">{href}</a>                                  01-Jan-2024 00:00       -\n"
        ));
    }
    html.push_str("</pre><hr></body>\n</html>\n");
    html
}
