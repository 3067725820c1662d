use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use select::document::Document;
use select::predicate::Name;
use tracing::{info, warn};
use url::Url;

use crate::dom;
use crate::engine::RewriteEngine;
use crate::error::ErrorLog;
use crate::fetcher::ContentFetcher;
use crate::store::SiteStore;

/// One complete fetch-rewrite-persist run for a single root URL.
pub struct MirrorSession {
    target: Url,
    host: String,
    fetcher: ContentFetcher,
    store: SiteStore,
    errors: ErrorLog,
}

impl MirrorSession {
    pub fn new(url: &str, output_root: &Path, timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let target =
            Url::parse(url).with_context(|| format!("Invalid mirror target: {}", url))?;
        let host = target
            .host_str()
            .with_context(|| format!("Mirror target has no host: {}", url))?
            .to_string();
        let fetcher = ContentFetcher::new(timeout_secs, user_agent)?;
        let store = SiteStore::new(output_root, &host);

        Ok(Self {
            target,
            host,
            fetcher,
            store,
            errors: ErrorLog::new(),
        })
    }

    /// Mirrors the target page: fetch, rewrite asset references, persist
    /// the page as `<host>.html` alongside its assets, print accumulated
    /// error lines, and optionally the metadata summary.
    ///
    /// The root fetch is the one effectively fatal failure: nothing is
    /// written and nothing is printed for that target.
    pub async fn run(&mut self, show_metadata: bool) -> Result<()> {
        let body = match self.fetcher.fetch(&self.target).await {
            Ok(body) => body,
            Err(e) => {
                warn!(target = %self.target, error = %e, "root fetch failed, skipping target");
                return Ok(());
            }
        };

        let html = String::from_utf8_lossy(&body);
        let document = dom::parse(&html);

        let engine = RewriteEngine {
            base_url: &self.target,
            fetcher: &self.fetcher,
            store: &self.store,
        };
        engine.run(&document, &mut self.errors).await;

        for line in self.errors.lines() {
            println!("{}", line);
        }

        let rewritten = dom::to_html(&document)?;
        let page_name = format!("{}.html", self.host);
        self.store
            .save(&page_name, rewritten.as_bytes())
            .with_context(|| format!("Failed to save {}", page_name))?;
        info!(target = %self.target, file = %page_name, errors = self.errors.len(), "mirror complete");

        if show_metadata {
            print!("{}", metadata_summary(&self.host, &rewritten));
        }

        Ok(())
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn site_dir(&self) -> &Path {
        self.store.site_dir()
    }
}

/// Four-line summary computed from the final rewritten document.
fn metadata_summary(host: &str, html: &str) -> String {
    let document = Document::from(html);
    let links = document.find(Name("a")).count();
    let images = document.find(Name("img")).count();

    format!(
        "site: {}\nnum_links: {}\nimages: {}\nlast_fetch: {}\n",
        host,
        links,
        images,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
}
