//! Declarative document matching.
//!
//! A query is a `bson::Document` mapping operator names to operator bodies;
//! [`matches`] walks it against a target document and answers yes or no.
//!
//! ```ignore
//! use bson::doc;
//! let q = doc! {"$or": {"$equal": {"foo": "bar"}, "$gt": {"n": 3}}};
//! assert!(docmatch::matches(&q, &doc! {"foo": "baz", "n": 5})?);
//! ```
pub mod errors;
pub mod logger;
pub mod query;
pub mod utils;

pub use crate::errors::{MatchError, QueryError, Side};
pub use crate::query::{Operator, Registry, matches, matches_with};

/// Initializes the matcher's ambient services.
///
/// Logging is configured from `DOCMATCH_*` environment variables and the
/// process-wide operator registry is built eagerly, so hosts can register
/// their own operators right after this returns.
///
/// # Errors
/// Returns an error if logging cannot be configured.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::configure_from_env()?;
    log::info!(target: "docmatch::eval", "operators: {:?}", query::registry::list());
    Ok(())
}
