use thiserror::Error;

/// Non-fatal failures encountered while mirroring a page.
///
/// Each variant renders as the single line that ends up in the session's
/// [`ErrorLog`]. Nothing here ever unwinds the rewrite pass; callers record
/// the error and move on to the next asset.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// DNS, connect, TLS, or timeout failure while talking to the server.
    #[error("Network Error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The request went out but the response could not be read.
    #[error("Error fetching {url}: {message}")]
    Fetch { url: String, message: String },

    /// The raw reference string could not be joined against its base URL.
    #[error("Error processing URL {reference}: {message}")]
    Resolve { reference: String, message: String },

    /// Anything else that went wrong while handling one asset, e.g. a
    /// filesystem write failure or a URL with no usable filename.
    #[error("Error processing asset from URL {url}: {message}")]
    Asset { url: String, message: String },
}

/// Session-scoped, append-only record of non-fatal failures.
///
/// Entries are rendered to their final form on append and printed once at
/// the end of asset processing; the log is the sole failure channel for
/// everything below the root fetch.
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<String>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, err: MirrorError) {
        self.entries.push(err.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_line_formats() {
        let network = MirrorError::Network {
            url: "https://test.com/img.png".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            network.to_string(),
            "Network Error fetching https://test.com/img.png: connection refused"
        );

        let fetch = MirrorError::Fetch {
            url: "https://test.com".to_string(),
            message: "body truncated".to_string(),
        };
        assert_eq!(
            fetch.to_string(),
            "Error fetching https://test.com: body truncated"
        );

        let resolve = MirrorError::Resolve {
            reference: "http://[".to_string(),
            message: "invalid IPv6 address".to_string(),
        };
        assert_eq!(
            resolve.to_string(),
            "Error processing URL http://[: invalid IPv6 address"
        );

        let asset = MirrorError::Asset {
            url: "https://test.com/style.css".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            asset.to_string(),
            "Error processing asset from URL https://test.com/style.css: permission denied"
        );
    }

    #[test]
    fn test_error_log_appends_in_order() {
        let mut log = ErrorLog::new();
        assert!(log.is_empty());

        log.record(MirrorError::Network {
            url: "https://a.com".to_string(),
            message: "timed out".to_string(),
        });
        log.record(MirrorError::Asset {
            url: "https://b.com/x.png".to_string(),
            message: "disk full".to_string(),
        });

        assert_eq!(log.len(), 2);
        let lines: Vec<&str> = log.lines().collect();
        assert!(lines[0].starts_with("Network Error fetching https://a.com"));
        assert!(lines[1].starts_with("Error processing asset from URL https://b.com/x.png"));
    }
}
