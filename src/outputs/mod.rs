//! Persistence of crawl results.

pub mod json;
