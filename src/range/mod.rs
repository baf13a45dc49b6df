//! Codepoint range resolution
//!
//! This module turns a user-supplied range specification into the ordered
//! sequence of codepoints a crawl run will visit.
//!
//! # Components
//!
//! - `Codepoint`: The identifier of one page
//! - `RangeSpec`: A parsed specification (explicit list, bounded range, or resume)
//! - `Identifiers`: The lazy sequence a specification resolves to

mod codepoint;
mod spec;

pub use codepoint::{coerce_codepoint, Codepoint};
pub use spec::{Domain, Identifiers, RangeSpec};
