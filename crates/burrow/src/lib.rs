#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod console;

pub use console::ConsoleReporter;

#[doc(no_inline)]
pub use burrow_core::{BoxError, Crawler, Error, ErrorKind, Result, SeenSet};
#[doc(no_inline)]
pub use burrow_reqwest::{HtmlExtractor, HttpFetcher, canonical};

#[doc(hidden)]
pub mod prelude;
