//! # sigrip - player signature algorithm extractor
//!
//! Extracts the signature transformation algorithm from a site's versioned
//! player script and replays it against signature strings, without executing
//! any JavaScript.
//!
//! ## Features
//!
//! - Locates the versioned player script referenced by page markup
//! - Rewrites the transformer function body into compact notation
//! - Interprets `r` / `sN` / `wN` notation against signature strings
//! - Maps authorization and transport failures to typed errors
//!
//! ## Example
//!
//! ```rust,no_run
//! use sigrip::{decode, AlgorithmExtractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = AlgorithmExtractor::new();
//!     let algorithm = extractor
//!         .request_current_algorithm("http://www.example.com")
//!         .await?
//!         .ok_or("page carries no player reference")?;
//!
//!     let url = decode("http://example.com/stream?id=1", "SIGNATURE", &algorithm)?;
//!     println!("{}", url);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use error::SigripError;
pub use platform::player::{AlgorithmExtractor, PlayerReference};
pub use platform::procedure::{decode, Procedure};

/// Result type alias for sigrip operations
pub type Result<T> = std::result::Result<T, SigripError>;
