//! HTTP page source.
//!
//! Index pages are read chunk by chunk and handed out line by line, so huge or
//! slow listings start producing links before the body is complete.

use crate::core::crawler::{PageLines, PageSource};
use crate::models::config::HttpConfig;
use crate::{Error, Result};
use url::Url;

/// Fetches index pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

/// A streamed HTTP response body.
pub struct HttpPage {
    url: String,
    response: reqwest::Response,
    buffer: Vec<u8>,
    /// Bytes of `buffer` already known to hold no newline.
    scanned: usize,
    finished: bool,
}

impl HttpSource {
    /// Create a source with the given HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    type Page = HttpPage;

    async fn open(&self, url: &Url) -> Result<HttpPage> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", status)));
        }

        Ok(HttpPage {
            url: url.to_string(),
            response,
            buffer: Vec::new(),
            scanned: 0,
            finished: false,
        })
    }
}

impl PageLines for HttpPage {
    async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = find_newline(&self.buffer, self.scanned) {
                let line: Vec<u8> = self.buffer.drain(..=pos).collect();
                self.scanned = 0;
                return Ok(Some(decode_line(&line)));
            }
            self.scanned = self.buffer.len();

            if self.finished {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let rest = std::mem::take(&mut self.buffer);
                self.scanned = 0;
                return Ok(Some(decode_line(&rest)));
            }

            match self.response.chunk().await {
                Ok(Some(chunk)) => self.buffer.extend_from_slice(&chunk),
                Ok(None) => self.finished = true,
                Err(e) => return Err(Error::fetch(&self.url, e)),
            }
        }
    }
}

/// Position of the first `\n` at or after `from`.
fn find_newline(buffer: &[u8], from: usize) -> Option<usize> {
    buffer
        .get(from..)?
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| from + pos)
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
