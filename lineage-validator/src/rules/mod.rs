//! Record-level rules over the document graph.
//!
//! Each sub-module handles one family of checks:
//! - `date_logic`: chronological impossibilities and implausibilities
//! - `duplicates`: surname-grouped fuzzy duplicate detection
//! - `completeness`: missing optional data and coverage ratios

pub mod completeness;
pub mod date_logic;
pub mod duplicates;
