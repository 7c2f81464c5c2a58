#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod extractor;
mod fetcher;

pub use extractor::{HtmlExtractor, canonical};
pub use fetcher::HttpFetcher;
