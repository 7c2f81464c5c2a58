#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod body;
mod dedup;
mod error;
pub mod extract;
pub mod fetch;
mod process;
pub mod queue;
pub mod report;
pub mod testing;

#[doc(hidden)]
pub mod prelude;

#[doc(no_inline)]
pub use async_trait::async_trait;

pub use crate::dedup::SeenSet;
pub use crate::error::{BoxError, Error, ErrorKind};
pub use crate::process::Crawler;

/// Specialized [`Result`] type for fallible collaborator calls.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Tracing target for crawler-related events.
#[cfg(feature = "tracing")]
pub(crate) const TRACING_TARGET_CRAWLER: &str = "burrow_core::crawler";

/// Tracing target for worker-related events.
#[cfg(feature = "tracing")]
pub(crate) const TRACING_TARGET_WORKER: &str = "burrow_core::worker";
