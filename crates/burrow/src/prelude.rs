//! Re-export of commonly used types and traits.

pub use burrow_core::prelude::*;
pub use burrow_reqwest::{HtmlExtractor, HttpFetcher, canonical};

pub use crate::ConsoleReporter;
