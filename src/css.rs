use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::{ErrorLog, MirrorError};
use crate::fetcher::ContentFetcher;
use crate::resolver;
use crate::store::{self, SiteStore};

/// Matches `url(...)` with optional single or double quotes around the
/// reference.
static URL_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(['"]?(.+?)['"]?\)"#).unwrap());

/// Rewrites `url(...)` references inside a fetched stylesheet, downloading
/// each referenced asset alongside it.
///
/// Recursion depth is exactly one: assets fetched here are saved verbatim,
/// and references inside them are not expanded again. A stylesheet that
/// imports another stylesheet is not followed.
pub struct StylesheetRewriter<'a> {
    pub fetcher: &'a ContentFetcher,
    pub store: &'a SiteStore,
}

impl StylesheetRewriter<'_> {
    /// Returns the rewritten stylesheet text. Nested references resolve
    /// against the stylesheet's own URL, not the page's. Every failed
    /// occurrence is recorded and left unchanged; the rest of the text is
    /// still rewritten.
    pub async fn rewrite(&self, css: &str, css_url: &Url, errors: &mut ErrorLog) -> String {
        let mut out = String::with_capacity(css.len());
        let mut last_end = 0;

        for caps in URL_REFERENCE.captures_iter(css) {
            let matched = caps.get(0).unwrap();
            let reference = caps.get(1).unwrap().as_str();

            out.push_str(&css[last_end..matched.start()]);
            match self.mirror_nested(css_url, reference, errors).await {
                Some(local_name) => {
                    out.push_str("url(");
                    out.push_str(&local_name);
                    out.push(')');
                }
                None => out.push_str(matched.as_str()),
            }
            last_end = matched.end();
        }

        out.push_str(&css[last_end..]);
        out
    }

    /// Fetches and persists one nested reference, returning the local
    /// filename to substitute, or `None` when the occurrence must be left
    /// verbatim (`data:` URIs, skips, and recorded failures).
    async fn mirror_nested(
        &self,
        css_url: &Url,
        reference: &str,
        errors: &mut ErrorLog,
    ) -> Option<String> {
        let resolved = match resolver::resolve(css_url, reference) {
            Ok(Some(url)) => url,
            Ok(None) => return None,
            Err(e) => {
                errors.record(e);
                return None;
            }
        };

        let bytes = match self.fetcher.fetch(&resolved).await {
            Ok(bytes) => bytes,
            Err(e) => {
                errors.record(e);
                return None;
            }
        };

        let Some(filename) = store::filename_for(&resolved) else {
            errors.record(MirrorError::Asset {
                url: resolved.to_string(),
                message: "URL path has no filename".to_string(),
            });
            return None;
        };

        if let Err(e) = self.store.save(&filename, &bytes) {
            errors.record(MirrorError::Asset {
                url: resolved.to_string(),
                message: e.to_string(),
            });
            return None;
        }

        debug!(url = %resolved, %filename, "nested stylesheet asset mirrored");
        Some(filename)
    }
}
