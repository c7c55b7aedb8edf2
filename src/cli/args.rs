//! Command line argument parsing

use clap::Parser;
use std::time::Duration;

use crate::platform::client::HttpClientConfig;

/// Extracts and replays player signature transformation algorithms
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Page URL to scan for a versioned player script
    pub url: Option<String>,

    /// Signature value to transform
    #[arg(short, long, value_name = "SIG")]
    pub signature: Option<String>,

    /// Stream URL the transformed signature is appended to
    #[arg(long, value_name = "URL")]
    pub stream_url: Option<String>,

    /// Use this algorithm notation instead of extracting one (e.g. 'r s3 w44')
    #[arg(short, long, value_name = "NOTATION")]
    pub algorithm: Option<String>,

    /// Print the player script version instead of the algorithm
    #[arg(long)]
    pub player_version: bool,

    /// HTTP timeout (e.g., 30s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Override User-Agent header
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Proxy URL (http/https/socks)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Build the HTTP client configuration these arguments describe
    pub fn http_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig::default();
        config.timeout = self.timeout_duration();
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = Some(user_agent.clone());
        }
        config.proxy_url = self.proxy.clone();
        config.accept_invalid_certs = self.insecure;
        config
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}


// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            url: None,
            signature: None,
            stream_url: None,
            algorithm: None,
            player_version: false,
            timeout: humantime::Duration::from(Duration::from_secs(30)),
            user_agent: None,
            proxy: None,
            insecure: false,
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}
