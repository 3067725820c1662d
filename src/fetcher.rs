use std::time::Duration;

use anyhow::Result;
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use crate::error::MirrorError;

/// Browser identification sent with every request so servers do not reject
/// the fetch as a bot.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues one GET per call and hands back the raw response body.
#[derive(Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .use_rustls_tls()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client })
    }

    /// Fetches `url` and returns the full body, whatever the status code.
    ///
    /// Network-level failures (DNS, connect, TLS, timeout) come back as
    /// [`MirrorError::Network`], anything else as [`MirrorError::Fetch`].
    /// Neither aborts the caller; the error is recorded and the asset skipped.
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>, MirrorError> {
        debug!(%url, "fetching");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        Ok(body.to_vec())
    }
}

fn classify(url: &Url, err: reqwest::Error) -> MirrorError {
    let url = url.to_string();
    let message = err.to_string();
    if err.is_connect() || err.is_timeout() {
        MirrorError::Network { url, message }
    } else {
        MirrorError::Fetch { url, message }
    }
}
