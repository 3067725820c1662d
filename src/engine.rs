use markup5ever_rcdom::{Handle, RcDom};
use tracing::debug;
use url::Url;

use crate::css::StylesheetRewriter;
use crate::dom;
use crate::error::{ErrorLog, MirrorError};
use crate::fetcher::ContentFetcher;
use crate::resolver;
use crate::store::{self, SiteStore};

/// Walks a parsed document and rewrites its asset references to point at
/// locally mirrored copies.
///
/// Three reference classes are processed in a fixed order — `img[src]`,
/// stylesheet `link[href]`, then `script[src]` — each in document order.
/// A failure in any step records an error and skips that node; the pass
/// always runs to completion.
pub struct RewriteEngine<'a> {
    pub base_url: &'a Url,
    pub fetcher: &'a ContentFetcher,
    pub store: &'a SiteStore,
}

impl RewriteEngine<'_> {
    pub async fn run(&self, document: &RcDom, errors: &mut ErrorLog) {
        for node in dom::find_all(&document.document, &is_image) {
            self.process_node(&node, "src", errors).await;
        }
        for node in dom::find_all(&document.document, &is_stylesheet_link) {
            self.process_node(&node, "href", errors).await;
        }
        for node in dom::find_all(&document.document, &is_script_with_source) {
            self.process_node(&node, "src", errors).await;
        }
    }

    /// Resolve, fetch, persist, and repoint one node. The node is left
    /// untouched unless every step succeeds, so a partial failure shows up
    /// as the original (possibly broken) reference in the saved page.
    async fn process_node(&self, node: &Handle, attr_name: &str, errors: &mut ErrorLog) {
        let Some(reference) = dom::get_attr(node, attr_name) else {
            return;
        };

        let resolved = match resolver::resolve(self.base_url, &reference) {
            Ok(Some(url)) => url,
            Ok(None) => return,
            Err(e) => {
                errors.record(e);
                return;
            }
        };

        let bytes = match self.fetcher.fetch(&resolved).await {
            Ok(bytes) => bytes,
            Err(e) => {
                errors.record(e);
                return;
            }
        };

        let Some(filename) = store::filename_for(&resolved) else {
            errors.record(MirrorError::Asset {
                url: resolved.to_string(),
                message: "URL path has no filename".to_string(),
            });
            return;
        };

        if let Err(e) = self.store.save(&filename, &bytes) {
            errors.record(MirrorError::Asset {
                url: resolved.to_string(),
                message: e.to_string(),
            });
            return;
        }

        if filename.ends_with(".css") {
            let rewriter = StylesheetRewriter {
                fetcher: self.fetcher,
                store: self.store,
            };
            let css = String::from_utf8_lossy(&bytes);
            let rewritten = rewriter.rewrite(&css, &resolved, errors).await;
            if let Err(e) = self.store.save(&filename, rewritten.as_bytes()) {
                errors.record(MirrorError::Asset {
                    url: resolved.to_string(),
                    message: e.to_string(),
                });
                return;
            }
        }

        dom::set_attr(node, attr_name, &filename);
        debug!(url = %resolved, %filename, "asset mirrored");
    }
}

fn is_image(node: &Handle) -> bool {
    dom::is_element(node, "img")
}

fn is_stylesheet_link(node: &Handle) -> bool {
    dom::is_element(node, "link")
        && dom::get_attr(node, "rel")
            .map_or(false, |rel| rel.to_ascii_lowercase().contains("stylesheet"))
}

fn is_script_with_source(node: &Handle) -> bool {
    dom::is_element(node, "script") && dom::get_attr(node, "src").is_some()
}
