//! Player script fetching, parsing, and signature transformation

pub mod client;
pub mod player;
pub mod procedure;
pub mod rewrite;

pub use client::*;
pub use player::*;
pub use procedure::*;
pub use rewrite::*;
