//! # Name Resolver Module
//!
//! ## Purpose
//! Maps a matched law-name phrase to a canonical law id using exact, fuzzy
//! overlap and keyword fallback strategies, in strict priority order.
//!
//! ## Input/Output Specification
//! - **Input**: Trimmed law-name phrase from the scanner
//! - **Output**: Optional law id; an unresolved name is not an error
//! - **Heuristics**: overlap threshold and keyword table come from
//!   configuration, not code
//!
//! Fuzzy scoring iterates aliases in the index insertion order (ascending
//! law id, aliases as listed). Equal scores keep the earliest candidate.

use crate::aliases::{fold, AliasIndex};
use crate::config::{DetectionConfig, KeywordFallback};
use crate::LawId;
use regex::Regex;

/// Resolves law-name phrases against the alias index
pub struct NameResolver {
    index: AliasIndex,
    threshold: f64,
    keyword_fallbacks: Vec<KeywordFallback>,
    whitespace: Regex,
}

impl NameResolver {
    pub fn new(index: AliasIndex, config: &DetectionConfig) -> Self {
        Self {
            index,
            threshold: config.fuzzy_threshold,
            keyword_fallbacks: config.keyword_fallbacks.clone(),
            whitespace: Regex::new(r"\s+").expect("static whitespace pattern"),
        }
    }

    /// Resolve a law-name phrase to a law id.
    ///
    /// Priority order: exact folded lookup, best-overlap score above the
    /// threshold, keyword fallback table, then unresolved.
    pub fn resolve(&self, phrase: &str) -> Option<LawId> {
        let folded = self.normalize(phrase);
        if folded.is_empty() {
            return None;
        }

        if let Some(law_id) = self.index.get(&folded) {
            return Some(law_id);
        }

        if let Some(law_id) = self.best_overlap(&folded) {
            return Some(law_id);
        }

        self.keyword_fallback(&folded)
    }

    /// Number of distinct aliases behind this resolver
    pub fn alias_count(&self) -> usize {
        self.index.len()
    }

    /// Case-fold and collapse internal whitespace
    fn normalize(&self, phrase: &str) -> String {
        let folded = fold(phrase.trim());
        self.whitespace.replace_all(&folded, " ").into_owned()
    }

    /// Containment scoring over every alias: an alias inside the phrase
    /// scores `len(alias) / len(phrase)`, a phrase inside an alias scores
    /// `len(phrase) / len(alias)`. Lengths are char counts. Only a strictly
    /// greater score replaces the current best, so ties keep the earliest
    /// candidate in index order. The winner resolves only above the
    /// configured threshold.
    fn best_overlap(&self, phrase: &str) -> Option<LawId> {
        let phrase_len = phrase.chars().count();
        if phrase_len == 0 {
            return None;
        }

        let mut best: Option<(f64, LawId)> = None;
        for (alias, law_id) in self.index.iter() {
            let alias_len = alias.chars().count();
            if alias_len == 0 {
                continue;
            }
            let score = if phrase.contains(alias) {
                alias_len as f64 / phrase_len as f64
            } else if alias.contains(phrase) {
                phrase_len as f64 / alias_len as f64
            } else {
                continue;
            };
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, law_id));
            }
        }

        match best {
            Some((score, law_id)) if score > self.threshold => Some(law_id),
            _ => None,
        }
    }

    /// First matching entry of the configured substring keyword table
    fn keyword_fallback(&self, phrase: &str) -> Option<LawId> {
        self.keyword_fallbacks
            .iter()
            .find(|entry| phrase.contains(entry.pattern.as_str()))
            .map(|entry| entry.law_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::AliasTable;

    fn resolver_with(json: &str, config: DetectionConfig) -> NameResolver {
        let table = AliasTable::from_json(json).unwrap();
        NameResolver::new(AliasIndex::from_table(&table), &config)
    }

    fn default_resolver() -> NameResolver {
        resolver_with(
            r#"{
                "1": ["Гражданский кодекс", "Гражданский кодекс Российской Федерации", "ГК РФ"],
                "2": ["Налоговый кодекс", "НК РФ"]
            }"#,
            DetectionConfig::default(),
        )
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let resolver = default_resolver();
        assert_eq!(resolver.resolve("ГРАЖДАНСКИЙ КОДЕКС"), Some(1));
        assert_eq!(resolver.resolve("нк рф"), Some(2));
    }

    #[test]
    fn test_exact_match_collapses_whitespace() {
        let resolver = default_resolver();
        assert_eq!(resolver.resolve("  Гражданский   кодекс "), Some(1));
    }

    #[test]
    fn test_overlap_alias_inside_phrase() {
        let resolver = default_resolver();
        // "налоговый кодекс" (16 chars) inside a 26-char phrase: 16/26 > 0.5
        assert_eq!(resolver.resolve("Налоговый кодекс действует"), Some(2));
    }

    #[test]
    fn test_overlap_phrase_inside_alias() {
        let resolver = default_resolver();
        // "гражданский кодекс росси" sits inside the 39-char full alias
        assert_eq!(resolver.resolve("Гражданский кодекс Росси"), Some(1));
    }

    #[test]
    fn test_overlap_below_threshold_falls_through() {
        let resolver = resolver_with(
            r#"{"3": ["УК"]}"#,
            DetectionConfig {
                fuzzy_threshold: 0.5,
                keyword_fallbacks: vec![],
            },
        );
        // "ук" scores 2/24 against this phrase, far below the threshold
        assert_eq!(resolver.resolve("ук в очень длинной фразе"), None);
    }

    #[test]
    fn test_tie_break_keeps_earliest_insertion() {
        // the phrase sits inside both aliases with the same 6/11 score;
        // law 1 is inserted first (ascending id order) and must win
        let resolver = resolver_with(
            r#"{
                "2": ["кодекс прим"],
                "1": ["кодекс указ"]
            }"#,
            DetectionConfig {
                fuzzy_threshold: 0.5,
                keyword_fallbacks: vec![],
            },
        );
        assert_eq!(resolver.resolve("кодекс"), Some(1));
    }

    #[test]
    fn test_keyword_fallback_on_inflected_name() {
        let resolver = default_resolver();
        // genitive form matches no alias substring; the keyword table does
        assert_eq!(resolver.resolve("Гражданского кодекса"), Some(1));
        assert_eq!(resolver.resolve("Налогового кодекса"), Some(2));
    }

    #[test]
    fn test_unresolved_returns_none() {
        let resolver = default_resolver();
        assert_eq!(resolver.resolve("Закона о неизвестном"), None);
        assert_eq!(resolver.resolve(""), None);
    }
}
