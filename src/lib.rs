//! # Law Links Detection Service
//!
//! ## Overview
//! This library implements a service that extracts structured legal-citation
//! references (law id, article, point, subpoint) from unstructured
//! Russian-language legal text.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `aliases`: Alias table loading and the case-folded alias index
//! - `grammar`: Citation-phrase vocabulary, tokenizer and value-list grammar
//! - `scanner`: Hand-rolled matcher producing raw citation matches
//! - `resolver`: Law-name resolution (exact, fuzzy overlap, keyword fallback)
//! - `expander`: Expansion of raw matches into flat citation records
//! - `detector`: The per-request scan -> resolve -> expand pipeline
//! - `api`: REST API endpoints
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Arbitrary UTF-8 legal text, an alias file (law id -> aliases)
//! - **Output**: Ordered citation records; unresolved law names keep a null id
//! - **Performance**: Linear-time scanning, deterministic results
//!
//! ## Usage
//! ```rust,no_run
//! use law_links::{aliases::AliasTable, config::Config, detector::LinkDetector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let table = AliasTable::from_file(&config.aliases.path)?;
//!     let detector = LinkDetector::new(&table, &config.detection);
//!     let links = detector.detect("согласно статье 45 Гражданского кодекса");
//!     println!("Found {} links", links.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod aliases;
pub mod config;
pub mod errors;
pub mod grammar;
pub mod scanner;
pub mod resolver;
pub mod expander;
pub mod detector;
pub mod api;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use detector::LinkDetector;
pub use errors::{DetectError, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Canonical integer identifier of a law, looked up via alias
pub type LawId = i64;

/// A single structured citation reference extracted from text.
///
/// `law_id` is null when the law-name phrase could not be resolved against
/// the alias index; the link is still emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawLink {
    /// Canonical law id, if the name phrase resolved
    pub law_id: Option<LawId>,
    /// Article designator, e.g. "45" or "4.6-8"
    pub article: String,
    /// Point (or part) designator, if present
    pub point_article: Option<String>,
    /// Subpoint designator, if present
    pub subpoint_article: Option<String>,
}

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub detector: Arc<detector::LinkDetector>,
    pub started_at: DateTime<Utc>,
}
