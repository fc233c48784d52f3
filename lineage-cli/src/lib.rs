//! Command-line front end for `lineage-validator`.
//!
//! Loads a JSON or YAML serialized document, runs the validation facade (or
//! the streaming reference validator with `--stream`) and prints the result.

pub mod cli;
pub mod load;
pub mod logging;
