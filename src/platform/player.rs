//! Player script discovery and transformation algorithm extraction

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SigripError;
use crate::platform::client::WebClient;
use crate::platform::rewrite::RewriteRule;
use crate::utils::url::{ensure_scheme, unescape_slashes};

/// A versioned player script reference found in page markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReference {
    /// Version token embedded in the script file name
    pub version: String,
    /// Absolute URL of the script
    pub url: String,
}

/// Find the versioned `html5player-<version>.js` reference in page source.
///
/// The surrounding double quotes delimit the script path; the path is
/// unescaped and given a scheme before it is returned. Returns `Ok(None)`
/// when the page carries no player reference at all.
pub fn locate_player_reference(page: &str) -> Result<Option<PlayerReference>, SigripError> {
    let marker = Regex::new(r"html5player-([^\s]+?)\.js")?;

    let captures = match marker.captures(page) {
        Some(captures) => captures,
        None => return Ok(None),
    };

    // Group 0 always spans the full match
    let matched = captures.get(0).unwrap();
    let version = captures
        .get(1)
        .ok_or_else(|| SigripError::Parse("player reference without version token".to_string()))?
        .as_str()
        .to_string();

    // The quotes around the script path delimit it in both directions
    let path_begin = page[..matched.start()]
        .rfind('"')
        .map(|i| i + 1)
        .ok_or_else(|| {
            SigripError::Parse("no opening quote before player script path".to_string())
        })?;
    let path_end = page[matched.end()..]
        .find('"')
        .map(|i| matched.end() + i)
        .ok_or_else(|| {
            SigripError::Parse("no closing quote after player script path".to_string())
        })?;

    let path = unescape_slashes(&page[path_begin..path_end]);
    let url = ensure_scheme(&path);

    debug!("Located player script version {} at {}", version, url);

    Ok(Some(PlayerReference { version, url }))
}

/// Extract the signature transformation procedure from player script source.
///
/// Returns the procedure in compact notation (`"r s3 w44"`), `Ok(None)` when
/// the script has no transformer entry point, and a parse error when the
/// entry point names a function the script does not define.
pub fn extract_procedure(js: &str) -> Result<Option<String>, SigripError> {
    // Find "C" in: var A = B.sig || C(B.s)
    // C is the name of the signature transformer function
    let entry_regex = Regex::new(r"var (.+)=(.+)\.sig\|\|(.+?)\((.+?)\.s\)")?;
    let transformer = match entry_regex.captures(js) {
        Some(captures) => match captures.get(3) {
            Some(name) => name.as_str().to_string(),
            None => return Ok(None),
        },
        None => {
            debug!("No transformer entry point in player script");
            return Ok(None);
        }
    };

    debug!("Found transformer function: {}", transformer);

    // Find the body of function C(D) { ... }
    let body_regex = Regex::new(&format!(
        r"function {}\((.+?)\)\{{(.+?)\}}",
        regex::escape(&transformer)
    ))?;
    let body = match body_regex.captures(js) {
        Some(captures) => match captures.get(2) {
            Some(body) => body.as_str().to_string(),
            None => {
                return Err(SigripError::Parse(format!(
                    "transformer function '{}' has no body",
                    transformer
                )))
            }
        },
        None => {
            return Err(SigripError::Parse(format!(
                "transformer function '{}' not defined in player script",
                transformer
            )))
        }
    };

    debug!("Transformer body length: {}", body.len());

    // The swap helper is inlined when it is called only once. Fold
    // "var b=a[0];a[0]=a[63%a.length];a[63]=b;" into "a=swap(a,63);" so the
    // generic swap rule below picks it up.
    let inline_swap = RewriteRule::new(
        "inline-swap",
        r"var (.+?)=(.+?)\[(.+?)\];(.+?)\[(.+?)\]=(.+?)\[(.+?)%(.+?)\.length\];(.+?)\[(.+?)\]=(.+?);",
        &[6, 6, 7],
        "{}=swap({},{});",
    )?;

    // Statement rules, applied in this order: split and join bracket the
    // transformation and fold to nothing; the rest become notation tokens.
    let rules = [
        inline_swap,
        RewriteRule::new("split", r#"[^;]+=[^;]+\.split\(""\)[^;]*"#, &[], "")?,
        RewriteRule::new("reverse", r"[^;]+=[^;]+\.reverse\(\)[^;]*", &[], "r")?,
        RewriteRule::new("swap", r"[^;]+=[^;]+\([^;]+,(.+?)\)[^;]*", &[1], "w{}")?,
        RewriteRule::new("slice", r"[^;]+=[^;]+\.slice\((.*?)\)[^;]*", &[1], "s{}")?,
        RewriteRule::new("join", r#"[^;]*return [^;]+\.join\(""\)"#, &[], "")?,
    ];

    let mut notation = body;
    for rule in &rules {
        notation = rule.apply(&notation)?;
    }

    let notation = notation.replace(';', " ").trim().to_string();
    debug!("Extracted procedure notation: {}", notation);

    Ok(Some(notation))
}

/// Fetches pages and player scripts and extracts the current transformation
/// algorithm from them.
pub struct AlgorithmExtractor {
    client: WebClient,
}

impl AlgorithmExtractor {
    /// Create an extractor with a default HTTP client
    pub fn new() -> Self {
        Self {
            client: WebClient::default(),
        }
    }

    /// Create an extractor around an already configured HTTP client
    pub fn with_client(client: WebClient) -> Self {
        Self { client }
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &WebClient {
        &self.client
    }

    /// Fetch `page_url` and extract the current algorithm from the player
    /// script it references.
    pub async fn request_current_algorithm(
        &self,
        page_url: &str,
    ) -> Result<Option<String>, SigripError> {
        let page = self.client.get(page_url, &HashMap::new()).await?;
        self.algorithm_from_page(&page).await
    }

    /// Extract the current algorithm from already fetched page source.
    ///
    /// Still performs one network round trip for the player script itself.
    pub async fn algorithm_from_page(&self, page: &str) -> Result<Option<String>, SigripError> {
        let reference = match locate_player_reference(page)? {
            Some(reference) => reference,
            None => return Ok(None),
        };

        let js = self.client.get(&reference.url, &HashMap::new()).await?;
        extract_procedure(&js)
    }

    /// Report the player script version referenced by page source
    pub fn current_version(&self, page: &str) -> Result<Option<String>, SigripError> {
        Ok(locate_player_reference(page)?.map(|reference| reference.version))
    }
}

impl Default for AlgorithmExtractor {
    fn default() -> Self {
        Self::new()
    }
}
