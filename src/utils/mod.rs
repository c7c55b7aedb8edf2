//! Utility functions for sigrip

pub mod format;
pub mod url;

pub use format::*;
// self:: disambiguates from the url crate
pub use self::url::*;
