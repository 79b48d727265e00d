pub mod generators;
pub mod pattern_match;
