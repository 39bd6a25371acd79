//! # Citation Expander Module
//!
//! ## Purpose
//! Turns one raw grammar match, possibly containing a list of articles and a
//! list of subpoints, into one or more flat citation records.
//!
//! ## Input/Output Specification
//! - **Input**: `RawMatch` with a non-empty article value list, resolved law id
//! - **Output**: `LawLink` records, articles outer loop, subpoints inner loop
//! - **Policy**: only the first point value is used per match; further point
//!   values are discarded
//!
//! A single deterministic pass with no state beyond the loop variables.

use crate::grammar::CitationGrammar;
use crate::scanner::RawMatch;
use crate::{LawId, LawLink};

/// Expands raw matches into flat citation records
pub struct CitationExpander<'g> {
    grammar: &'g CitationGrammar,
}

impl<'g> CitationExpander<'g> {
    pub fn new(grammar: &'g CitationGrammar) -> Self {
        Self { grammar }
    }

    /// Expand one raw match. Output order: articles in parse order, then
    /// subpoints in parse order within each article.
    pub fn expand(&self, raw: &RawMatch, law_id: Option<LawId>) -> Vec<LawLink> {
        let articles = self.grammar.parse_values(&raw.articles);
        let points = raw
            .points
            .as_deref()
            .map(|p| self.grammar.parse_values(p))
            .unwrap_or_default();
        let subpoints = raw
            .subpoints
            .as_deref()
            .map(|s| self.grammar.parse_values(s))
            .unwrap_or_default();

        // first point value only, even when several were captured
        let point = points.first().cloned();

        let mut links = Vec::new();
        for article in &articles {
            if subpoints.is_empty() {
                links.push(LawLink {
                    law_id,
                    article: article.clone(),
                    point_article: point.clone(),
                    subpoint_article: None,
                });
            } else {
                for subpoint in &subpoints {
                    links.push(LawLink {
                        law_id,
                        article: article.clone(),
                        point_article: point.clone(),
                        subpoint_article: Some(subpoint.clone()),
                    });
                }
            }
        }

        links
    }
}
