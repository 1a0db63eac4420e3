//! The Kunitori pipeline.
//!
//! - `attribution`: count lines per canonical author for each path filter
//! - `kunitori`: allocate areas to ranked authors
//! - `generate`: run both over sampled commits and build the report

pub mod attribution;
pub mod generate;
pub mod kunitori;

#[cfg(test)]
pub(crate) mod test_support;

pub use generate::generate;
