//! Command line argument definitions.

use clap::Parser;

/// Open Directory Catalog - browse an open directory and pick an episode
#[derive(Parser, Debug)]
#[command(name = "od-catalog")]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Root URL of the open directory
    #[arg(value_name = "URL")]
    pub url: String,

    /// Don't show the path alongside each listing
    #[arg(long)]
    pub hush_path: bool,

    /// Print the catalog instead of opening the picker
    #[arg(long)]
    pub list: bool,

    /// Abort when any sub-directory fails to load
    #[arg(long)]
    pub strict: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// User-Agent header to send
    #[arg(long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub version: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_only() {
        let cli = Cli::try_parse_from(["od-catalog", "http://host/media/"]).unwrap();
        assert_eq!(cli.url, "http://host/media/");
        assert!(!cli.hush_path);
        assert!(!cli.list);
        assert!(!cli.strict);
        assert!(cli.timeout.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "od-catalog",
            "--hush-path",
            "--strict",
            "--timeout",
            "5",
            "http://host/",
        ])
        .unwrap();
        assert!(cli.hush_path);
        assert!(cli.strict);
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_url_required() {
        assert!(Cli::try_parse_from(["od-catalog"]).is_err());
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["od-catalog", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
