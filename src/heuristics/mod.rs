//! Static estimators used in place of real execution data.
//!
//! Nothing here measures a pipeline. Durations, languages and savings are
//! inferred from the configuration text alone.

pub mod duration;
pub mod examples;
pub mod language;
pub mod savings;

pub use duration::estimate_duration_minutes;
pub use language::Language;
pub use savings::leading_integer;
