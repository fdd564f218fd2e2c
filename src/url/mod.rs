//! URL handling module for Mail-Ripple
//!
//! Seeds are normalized with two literal rules (scheme prefix, trailing
//! slash) and links are resolved by plain string concatenation against the
//! page they were found on. No further canonicalization happens anywhere, so
//! the frontier compares URLs exactly as they were written.

mod normalize;
mod resolve;

pub use normalize::normalize_seed;
pub use resolve::{resolve_link, PageUrl};
