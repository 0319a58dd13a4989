use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::config::Config;
use crate::constants::{BROWSER_USER_AGENT, SKIPPED_LEADING_POSTS};
use crate::forum::post_extractor::extract_post_bodies;

/// What to do after fetching one page of the thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page had posts; keep them and request the next page.
    Continue,
    /// The forum answered with a non-success status; pagination is over.
    EndOfThreadStatus(StatusCode),
    /// The page had no post bodies; pagination is over.
    EndOfThreadEmpty,
}

/// Decide whether pagination continues after a page.
///
/// A non-success status or a page without posts ends the thread. Neither is
/// an error.
#[must_use]
pub fn page_outcome(status: StatusCode, post_count: usize) -> PageOutcome {
    if !status.is_success() {
        PageOutcome::EndOfThreadStatus(status)
    } else if post_count == 0 {
        PageOutcome::EndOfThreadEmpty
    } else {
        PageOutcome::Continue
    }
}

/// Fetches every post of one forum topic, page by page.
#[derive(Debug, Clone)]
pub struct PostFetcher {
    client: reqwest::Client,
    topic_url: String,
}

impl PostFetcher {
    /// Create a fetcher for the configured topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            topic_url: config.topic_url.clone(),
        })
    }

    #[must_use]
    pub fn topic_url(&self) -> &str {
        &self.topic_url
    }

    /// Fetch all posts of the topic, minus the leading announcement posts.
    ///
    /// Pages are requested as `topic_url?page=N` from `N = 1` until
    /// [`page_outcome`] ends the thread.
    ///
    /// # Errors
    ///
    /// Returns an error if a page cannot be requested or its body cannot be
    /// read. A non-success status is not an error.
    pub async fn fetch_all_posts(&self) -> Result<Vec<String>> {
        let mut posts = Vec::new();
        let mut page: u32 = 1;

        loop {
            let (status, page_posts) = self.fetch_page(page).await?;

            match page_outcome(status, page_posts.len()) {
                PageOutcome::Continue => {
                    debug!(page, posts = page_posts.len(), "Fetched forum page");
                    posts.extend(page_posts);
                    page += 1;
                }
                PageOutcome::EndOfThreadStatus(status) => {
                    debug!(page, status = %status, "Forum page not available, stopping");
                    break;
                }
                PageOutcome::EndOfThreadEmpty => {
                    debug!(page, "Forum page has no posts, stopping");
                    break;
                }
            }
        }

        let posts: Vec<String> = posts.into_iter().skip(SKIPPED_LEADING_POSTS).collect();

        info!(
            topic_url = %self.topic_url,
            pages = page - 1,
            posts = posts.len(),
            "Fetched forum thread"
        );

        Ok(posts)
    }

    /// Fetch one page and extract its post bodies.
    ///
    /// The body of a non-success response is not parsed.
    async fn fetch_page(&self, page: u32) -> Result<(StatusCode, Vec<String>)> {
        let response = self
            .client
            .get(&self.topic_url)
            .query(&[("page", page)])
            .send()
            .await
            .with_context(|| format!("Failed to fetch forum page {page}"))?;

        let status = response.status();
        if !status.is_success() {
            return Ok((status, Vec::new()));
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read forum page {page}"))?;

        Ok((status, extract_post_bodies(&html)))
    }
}
