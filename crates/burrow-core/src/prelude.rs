//! Re-export of commonly used types and traits.

pub use crate::body::Body;
pub use crate::extract::{Extracted, Extractor};
pub use crate::fetch::{Fetched, Fetcher};
pub use crate::report::Reporter;
pub use crate::{BoxError, Crawler, Error, ErrorKind, Result};
