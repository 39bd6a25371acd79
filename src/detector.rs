//! # Link Detector Module
//!
//! ## Purpose
//! The per-request detection pipeline: scan the text with the compiled
//! grammar, resolve each law-name phrase, expand matches into flat citation
//! records.
//!
//! ## Input/Output Specification
//! - **Input**: Arbitrary UTF-8 text
//! - **Output**: `LawLink` records in scanner order
//! - **Concurrency**: immutable after construction; share behind `Arc` with
//!   no locking
//!
//! Grammar and alias index are built once at startup and passed in here as
//! immutable context; nothing mutates shared state after that, so concurrent
//! requests run the pipeline without synchronization.

use crate::aliases::{AliasIndex, AliasTable};
use crate::config::DetectionConfig;
use crate::expander::CitationExpander;
use crate::grammar::CitationGrammar;
use crate::resolver::NameResolver;
use crate::scanner::Scanner;
use crate::LawLink;
use unicode_normalization::UnicodeNormalization;

/// Owns the compiled grammar, alias index and resolver for the process
/// lifetime
pub struct LinkDetector {
    grammar: CitationGrammar,
    resolver: NameResolver,
    law_count: usize,
}

impl LinkDetector {
    /// Build the detector from an alias table and detection settings.
    /// This is the one-time initialization barrier: once constructed, the
    /// detector is read-only.
    pub fn new(table: &AliasTable, config: &DetectionConfig) -> Self {
        let grammar = CitationGrammar::compile();
        let index = AliasIndex::from_table(table);
        let resolver = NameResolver::new(index, config);

        Self {
            grammar,
            resolver,
            law_count: table.law_count(),
        }
    }

    /// Extract all citation references from the text, in match order.
    /// Pure and deterministic: identical text yields identical output.
    pub fn detect(&self, text: &str) -> Vec<LawLink> {
        let normalized: String = text.nfc().collect();
        let scanner = Scanner::new(&self.grammar);
        let expander = CitationExpander::new(&self.grammar);

        let mut links = Vec::new();
        for raw in scanner.scan(&normalized) {
            let law_id = self.resolver.resolve(&raw.law_name);
            links.extend(expander.expand(&raw, law_id));
        }

        tracing::debug!("detected {} links", links.len());
        links
    }

    /// Number of laws behind the detector
    pub fn law_count(&self) -> usize {
        self.law_count
    }

    /// Number of distinct folded aliases behind the detector
    pub fn alias_count(&self) -> usize {
        self.resolver.alias_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> LinkDetector {
        let table = AliasTable::from_json(
            r#"{
                "1": ["Гражданский кодекс", "Гражданский кодекс Российской Федерации", "ГК РФ", "ГК"],
                "2": ["Налоговый кодекс", "НК РФ"],
                "4": ["Кодекс об административных правонарушениях", "КоАП РФ", "КоАП"]
            }"#,
        )
        .unwrap();
        LinkDetector::new(&table, &DetectionConfig::default())
    }

    #[test]
    fn test_plain_text_yields_nothing() {
        let detector = detector();
        assert!(detector.detect("Договор заключается в письменной форме.").is_empty());
    }

    #[test]
    fn test_full_expansion_chain() {
        let detector = detector();
        let links = detector.detect("подпункт а, б и в пункта 3 статьи 45 Гражданского кодекса");
        assert_eq!(links.len(), 3);
        for (link, subpoint) in links.iter().zip(["а", "б", "в"]) {
            assert_eq!(link.law_id, Some(1));
            assert_eq!(link.article, "45");
            assert_eq!(link.point_article.as_deref(), Some("3"));
            assert_eq!(link.subpoint_article.as_deref(), Some(subpoint));
        }
    }

    #[test]
    fn test_multi_article_citation() {
        let detector = detector();
        let links = detector.detect("статья 12, 13 Налогового кодекса");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].article, "12");
        assert_eq!(links[1].article, "13");
        assert!(links.iter().all(|l| l.law_id == Some(2)));
    }

    #[test]
    fn test_range_article_token() {
        let detector = detector();
        let links = detector.detect("статья 4.6-8 КоАП РФ");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].article, "4.6-8");
        assert_eq!(links[0].law_id, Some(4));
    }

    #[test]
    fn test_unresolved_name_keeps_null_id() {
        let detector = detector();
        let links = detector.detect("статья 9 Закона о неизвестных вещах");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].law_id, None);
        assert_eq!(links[0].article, "9");
    }

    #[test]
    fn test_article_without_reachable_name_dropped() {
        let detector = detector();
        assert!(detector.detect("статья 9 настоящего документа.").is_empty());
    }

    #[test]
    fn test_detection_is_idempotent() {
        let detector = detector();
        let text = "ст. 5 ГК РФ; статья 12, 13 Налогового кодекса. Подпункт г пункта 2 статьи 7 КоАП.";
        let first = detector.detect(text);
        let second = detector.detect(text);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_matches_concatenated_in_scan_order() {
        let detector = detector();
        let links = detector.detect("статья 5 ГК РФ; статья 6 НК РФ");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].law_id, Some(1));
        assert_eq!(links[1].law_id, Some(2));
    }

    #[test]
    fn test_stats_accessors() {
        let detector = detector();
        assert_eq!(detector.law_count(), 3);
        assert_eq!(detector.alias_count(), 9);
    }
}
