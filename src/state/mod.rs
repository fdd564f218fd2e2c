//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Frontier`: FIFO queue of URLs to fetch plus the set already processed
//! - `DomainSet`: hostnames admitted under the domain cap
//! - `EmailMap`: hostname to email addresses for one crawl
//! - `ResultTable`: seed key to `EmailMap`, shared by every worker of a batch
//!
//! Everything except `ResultTable` is owned by a single crawl task.

mod domain_set;
mod frontier;
mod results;

// Re-export main types
pub use domain_set::DomainSet;
pub use frontier::Frontier;
pub use results::{count_emails, merge_emails, EmailMap, ResultTable};
