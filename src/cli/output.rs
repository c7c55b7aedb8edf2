//! Output formatting for extraction results

use colored::Colorize;
use serde_json::json;

use crate::cli::args::VerbosityLevel;
use crate::platform::player::PlayerReference;

/// Output formatter for sigrip
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    json: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            json: false,
        }
    }

    /// Emit results as JSON objects instead of decorated text
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Whether results are emitted as JSON
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet && !self.json {
            println!("ℹ️  {}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet && !self.json {
            println!("✅ {}", message.green());
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("⚠️  {}", message.yellow());
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message.red());
    }

    /// Print debug message
    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose && !self.json {
            println!("🐛 {}", message.dimmed());
        }
    }

    /// Print a player script reference
    pub fn print_player_reference(&self, reference: &PlayerReference) {
        if self.json {
            let value = json!({
                "player_version": reference.version,
                "player_url": reference.url,
            });
            println!("{}", value);
            return;
        }

        if self.verbosity != VerbosityLevel::Quiet {
            println!("🔗 Player script: {}", reference.url);
        }
        println!("{}", reference.version);
    }

    /// Print an extracted algorithm with its player context.
    ///
    /// The notation itself always goes to stdout undecorated so the output
    /// can be piped.
    pub fn print_algorithm(&self, reference: &PlayerReference, algorithm: &str) {
        if self.json {
            let value = json!({
                "player_version": reference.version,
                "player_url": reference.url,
                "algorithm": algorithm,
            });
            println!("{}", value);
            return;
        }

        if self.verbosity != VerbosityLevel::Quiet {
            println!("🧩 Player version: {}", reference.version);
            println!("🔗 Player script: {}", reference.url);
        }
        println!("{}", algorithm);
    }

    /// Print a transformed signature
    pub fn print_transformed_signature(&self, signature: &str) {
        if self.json {
            println!("{}", json!({ "signature": signature }));
            return;
        }
        println!("{}", signature);
    }

    /// Print a stream URL carrying the transformed signature
    pub fn print_decoded_url(&self, url: &str) {
        if self.json {
            println!("{}", json!({ "url": url }));
            return;
        }
        println!("{}", url);
    }
}
