//! Evidence anchoring: locate model-claimed quotes inside the scraped source
//! text and produce an annotated rendering.
//!
//! Quotes coming back from the analysis model rarely match the scraped text
//! byte-for-byte: lines get re-wrapped, whitespace collapses, smart quotes
//! replace ASCII ones. Anchoring tokenizes each quote on word boundaries and
//! bridges adjacent tokens with a lazy non-word gap, so word order is all
//! that has to survive. Confirmed matches are collected as disjoint spans
//! over the immutable source text and spliced into one annotated rendering.

mod anchorer;
mod error;
mod pattern;

pub use anchorer::{anchor, AnchorOutcome, MatchRecord};
pub use error::{AnchorFailure, Result};
pub use pattern::{build_pattern, tokenize};
