//! Search strategies layered on top of exact lookup.
//!
//! - [`similar`]: inflected-form retries for English words
//! - [`fuzzy`]: edit-distance top-N collection
//! - [`rule`]: anchored, case-insensitive pattern matching
//! - [`data`]: query tokenizing for full-text article search

pub mod data;
pub mod fuzzy;
pub mod rule;
pub mod similar;
