use clap::Parser;
use std::path::PathBuf;

use crate::fetcher::USER_AGENT;

#[derive(Parser, Debug)]
#[command(
    name = "page-mirror",
    about = "A CLI utility to mirror single web pages by downloading static copies",
    version,
    long_about = "Fetches each page, downloads the images, stylesheets, and scripts it references, rewrites the document to point at the local copies, and saves everything under a directory named after the site's host."
)]
pub struct MirrorCommand {
    /// The URLs of the pages to mirror
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Print a metadata summary for each mirrored page
    #[arg(long)]
    pub metadata: bool,

    /// Directory under which per-site folders are created
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Timeout for requests in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// User agent string to use for requests
    #[arg(long, default_value = USER_AGENT)]
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_args() {
        let args = MirrorCommand::try_parse_from(&["page-mirror", "https://test.com"]).unwrap();

        assert_eq!(args.urls, vec!["https://test.com".to_string()]);
        assert!(!args.metadata);
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.timeout, 30);
        assert_eq!(args.user_agent, USER_AGENT);
    }

    #[test]
    fn test_parse_multiple_urls() {
        let args = MirrorCommand::try_parse_from(&[
            "page-mirror",
            "https://test.com",
            "https://other.org",
        ])
        .unwrap();

        assert_eq!(args.urls.len(), 2);
        assert_eq!(args.urls[1], "https://other.org");
    }

    #[test]
    fn test_metadata_flag_position_does_not_matter() {
        let before = MirrorCommand::try_parse_from(&[
            "page-mirror",
            "--metadata",
            "https://test.com",
            "https://other.org",
        ])
        .unwrap();
        let between = MirrorCommand::try_parse_from(&[
            "page-mirror",
            "https://test.com",
            "--metadata",
            "https://other.org",
        ])
        .unwrap();
        let after = MirrorCommand::try_parse_from(&[
            "page-mirror",
            "https://test.com",
            "https://other.org",
            "--metadata",
        ])
        .unwrap();

        for args in [before, between, after] {
            assert!(args.metadata);
            assert_eq!(args.urls.len(), 2);
        }
    }

    #[test]
    fn test_parse_all_args() {
        let args = MirrorCommand::try_parse_from(&[
            "page-mirror",
            "https://test.com",
            "-o",
            "./mirrors",
            "--timeout",
            "60",
            "--user-agent",
            "TestAgent/1.0",
        ])
        .unwrap();

        assert_eq!(args.output_dir, PathBuf::from("./mirrors"));
        assert_eq!(args.timeout, 60);
        assert_eq!(args.user_agent, "TestAgent/1.0");
    }

    #[test]
    fn test_parse_missing_urls() {
        let result = MirrorCommand::try_parse_from(&["page-mirror", "--metadata"]);
        assert!(result.is_err());
    }
}
