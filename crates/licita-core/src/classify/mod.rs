pub mod engine;

pub use engine::{classify, classify_with_match, KeywordMatch};
