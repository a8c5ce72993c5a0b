// Telemetry is a submodule of query
pub mod telemetry;

pub mod operators;
pub mod registry;

// Submodules for separation of concerns
mod eval;
mod parse;
mod values;

// Public API re-exports
pub use eval::{ROOT_OPERATOR, evaluate, matches, matches_with};
pub use parse::{json_value_to_document, parse_object_json, parse_query_json};
pub use registry::{CombinatorFn, Evaluate, Fold, Operator, PredicateFn, Registry};
pub use values::{compare_numbers, deep_equal, field_equals};
