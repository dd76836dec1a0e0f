//! Core StarDict reader module

pub mod codec;
pub mod config;
pub mod dictionary;
pub mod discovery;
pub mod format;
pub mod iter;
pub mod library;
pub mod query;
pub mod search;
pub mod types;
pub mod utils;

pub use config::LibraryConfig;
pub use dictionary::Dictionary;
pub use library::LibrarySet;
pub use types::error::{Result, StardictError};
pub use types::models;
