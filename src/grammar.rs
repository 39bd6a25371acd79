//! # Citation Grammar Module
//!
//! ## Purpose
//! The compiled description of a citation phrase: the fixed Russian legal
//! vocabulary, the tokenizer that feeds the scanner, and the value-list
//! grammar shared by the scanner and the expander.
//!
//! ## Input/Output Specification
//! - **Input**: Raw UTF-8 text (tokenizer), token slices (value lists)
//! - **Output**: Position-annotated tokens, parsed value lists
//! - **Shape**: optional subpoint clause, optional point clause, optional
//!   bare conjunction glue, mandatory article clause, law-name phrase
//!
//! The grammar is compiled once per process and never mutated. Matching is
//! case-insensitive throughout; callers fold token text before vocabulary
//! lookups.

use std::collections::HashSet;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Consecutive alphabetic characters (Cyrillic or Latin)
    Word,
    /// Numeric designator, possibly dot-joined and dash-suffixed ("4.6-8")
    Number,
    /// A single punctuation or symbol character; newline is `"\n"`
    Punct,
}

/// A token over the input text with its byte span
#[derive(Debug, Clone, Copy)]
pub struct Token<'t> {
    pub kind: TokenKind,
    pub text: &'t str,
    pub start: usize,
    pub end: usize,
}

impl<'t> Token<'t> {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }

    pub fn is_comma(&self) -> bool {
        self.kind == TokenKind::Punct && self.text == ","
    }

    pub fn is_dot(&self) -> bool {
        self.kind == TokenKind::Punct && self.text == "."
    }

    /// Terminates a law-name phrase: sentence punctuation or a line break
    pub fn is_name_terminator(&self) -> bool {
        self.kind == TokenKind::Punct && matches!(self.text, "." | ";" | "," | "\n")
    }

    /// Case-folded token text
    pub fn folded(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Split text into position-annotated tokens. Whitespace other than line
/// breaks is skipped; a numeric token greedily absorbs dot-joined segments
/// and dash-joined range suffixes, so "4.6-8" stays one literal token.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let n = chars.len();
    let byte_end = |j: usize| if j < n { chars[j].0 } else { text.len() };

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < n {
        let (start, c) = chars[i];
        if c == '\n' {
            tokens.push(Token {
                kind: TokenKind::Punct,
                text: &text[start..start + 1],
                start,
                end: start + 1,
            });
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let mut j = i + 1;
            while j < n && chars[j].1.is_ascii_digit() {
                j += 1;
            }
            // a separator joins segments only when digits follow it
            while j + 1 < n && (chars[j].1 == '.' || chars[j].1 == '-') && chars[j + 1].1.is_ascii_digit() {
                j += 2;
                while j < n && chars[j].1.is_ascii_digit() {
                    j += 1;
                }
            }
            let end = byte_end(j);
            tokens.push(Token {
                kind: TokenKind::Number,
                text: &text[start..end],
                start,
                end,
            });
            i = j;
        } else if c.is_alphabetic() {
            let mut j = i + 1;
            while j < n && chars[j].1.is_alphabetic() {
                j += 1;
            }
            let end = byte_end(j);
            tokens.push(Token {
                kind: TokenKind::Word,
                text: &text[start..end],
                start,
                end,
            });
            i = j;
        } else {
            let end = start + c.len_utf8();
            tokens.push(Token {
                kind: TokenKind::Punct,
                text: &text[start..end],
                start,
                end,
            });
            i += 1;
        }
    }

    tokens
}

/// Immutable compiled citation-phrase vocabulary
#[derive(Debug)]
pub struct CitationGrammar {
    subpoint_keywords: HashSet<&'static str>,
    point_keywords: HashSet<&'static str>,
    article_keywords: HashSet<&'static str>,
    act_abbreviations: HashSet<&'static str>,
    act_stems: &'static [&'static str],
}

/// Subpoint unit keywords: full inflections plus abbreviations
const SUBPOINT_KEYWORDS: &[&str] = &[
    "подпункт",
    "подпункта",
    "подпункте",
    "подпункту",
    "подпунктом",
    "подпункты",
    "подпунктов",
    "подпунктам",
    "подпунктами",
    "подпунктах",
    "пп",
    "подп",
];

/// Point/part unit keywords
const POINT_KEYWORDS: &[&str] = &[
    "пункт",
    "пункта",
    "пункте",
    "пункту",
    "пунктом",
    "пункты",
    "пунктов",
    "пунктам",
    "пунктами",
    "пунктах",
    "часть",
    "части",
    "частью",
    "частей",
    "частям",
    "частями",
    "частях",
    "п",
    "ч",
];

/// Article unit keywords
const ARTICLE_KEYWORDS: &[&str] = &[
    "статья",
    "статьи",
    "статье",
    "статью",
    "статьей",
    "статьёй",
    "статей",
    "статьям",
    "статьями",
    "статьях",
    "ст",
];

/// Legal-act abbreviations recognized as name anchors
const ACT_ABBREVIATIONS: &[&str] = &["фз", "коап", "апк", "гпк", "гк", "ук", "нк", "тк"];

/// Declinable legal-act noun stems; a folded word matching a stem prefix is
/// an anchor ("кодекса", "закону", "положении", ...)
const ACT_STEMS: &[&str] = &["кодекс", "закон", "указ", "положени"];

/// The bare conjunction used as list separator and clause glue
const CONJUNCTION: &str = "и";

impl CitationGrammar {
    /// Compile the grammar from the fixed vocabulary
    pub fn compile() -> Self {
        Self {
            subpoint_keywords: SUBPOINT_KEYWORDS.iter().copied().collect(),
            point_keywords: POINT_KEYWORDS.iter().copied().collect(),
            article_keywords: ARTICLE_KEYWORDS.iter().copied().collect(),
            act_abbreviations: ACT_ABBREVIATIONS.iter().copied().collect(),
            act_stems: ACT_STEMS,
        }
    }

    pub fn is_subpoint_keyword(&self, folded: &str) -> bool {
        self.subpoint_keywords.contains(folded)
    }

    pub fn is_point_keyword(&self, folded: &str) -> bool {
        self.point_keywords.contains(folded)
    }

    pub fn is_article_keyword(&self, folded: &str) -> bool {
        self.article_keywords.contains(folded)
    }

    /// Any clause keyword; scan attempts start only at these tokens
    pub fn is_unit_keyword(&self, folded: &str) -> bool {
        self.is_subpoint_keyword(folded)
            || self.is_point_keyword(folded)
            || self.is_article_keyword(folded)
    }

    pub fn is_conjunction(&self, folded: &str) -> bool {
        folded == CONJUNCTION
    }

    /// A recognized legal-act noun anchoring the law-name phrase
    pub fn is_act_noun(&self, folded: &str) -> bool {
        self.act_abbreviations.contains(folded)
            || self.act_stems.iter().any(|stem| folded.starts_with(stem))
    }

    /// A value token: a numeric designator or a single letter
    pub fn is_value_token(&self, token: &Token<'_>) -> bool {
        match token.kind {
            TokenKind::Number => true,
            TokenKind::Word => token.text.chars().count() == 1,
            TokenKind::Punct => false,
        }
    }

    /// Match a value list starting at `pos`: one or more value tokens
    /// separated by a comma or the conjunction. Returns the indices of the
    /// value tokens and the position after the list, or `None` when no value
    /// token starts at `pos`. A trailing separator with no value after it is
    /// left unconsumed.
    pub fn match_value_list(
        &self,
        tokens: &[Token<'_>],
        pos: usize,
    ) -> Option<(Vec<usize>, usize)> {
        let first = tokens.get(pos)?;
        if !self.is_value_token(first) {
            return None;
        }

        let mut indices = vec![pos];
        let mut i = pos + 1;
        loop {
            let Some(sep) = tokens.get(i) else { break };
            let is_sep = sep.is_comma() || (sep.is_word() && self.is_conjunction(&sep.folded()));
            if !is_sep {
                break;
            }
            let Some(value) = tokens.get(i + 1) else { break };
            if !self.is_value_token(value) {
                break;
            }
            indices.push(i + 1);
            i += 2;
        }

        Some((indices, i))
    }

    /// Parse the values out of a raw value-list capture
    pub fn parse_values(&self, raw: &str) -> Vec<String> {
        let tokens = tokenize(raw);
        match self.match_value_list(&tokens, 0) {
            Some((indices, _)) => indices.iter().map(|&i| tokens[i].text.to_string()).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_positions() {
        let tokens = tokenize("ст. 45 ГК");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["ст", ".", "45", "ГК"]);
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[2].kind, TokenKind::Number);
    }

    #[test]
    fn test_tokenize_decimal_and_range() {
        let tokens = tokenize("статья 4.6-8 и 12.1");
        let numbers: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is_number())
            .map(|t| t.text)
            .collect();
        assert_eq!(numbers, vec!["4.6-8", "12.1"]);
    }

    #[test]
    fn test_tokenize_trailing_dot_not_absorbed() {
        // the dot after "45" ends a sentence, it is not a decimal separator
        let tokens = tokenize("45. Далее");
        assert_eq!(tokens[0].text, "45");
        assert!(tokens[1].is_dot());
    }

    #[test]
    fn test_tokenize_newline_is_punct() {
        let tokens = tokenize("закон\nтекст");
        assert!(tokens[1].is_name_terminator());
    }

    #[test]
    fn test_keyword_recognition() {
        let grammar = CitationGrammar::compile();
        assert!(grammar.is_article_keyword("статье"));
        assert!(grammar.is_article_keyword("ст"));
        assert!(grammar.is_point_keyword("части"));
        assert!(grammar.is_subpoint_keyword("пп"));
        assert!(!grammar.is_article_keyword("статистика"));
    }

    #[test]
    fn test_act_noun_recognition() {
        let grammar = CitationGrammar::compile();
        assert!(grammar.is_act_noun("кодекса"));
        assert!(grammar.is_act_noun("закону"));
        assert!(grammar.is_act_noun("фз"));
        assert!(grammar.is_act_noun("коап"));
        assert!(grammar.is_act_noun("положении"));
        assert!(!grammar.is_act_noun("федерации"));
    }

    #[test]
    fn test_value_list_comma_and_conjunction() {
        let grammar = CitationGrammar::compile();
        assert_eq!(grammar.parse_values("а, б и в"), vec!["а", "б", "в"]);
        assert_eq!(grammar.parse_values("12, 13"), vec!["12", "13"]);
        assert_eq!(grammar.parse_values("4.6-8"), vec!["4.6-8"]);
    }

    #[test]
    fn test_value_list_stops_at_non_value() {
        let grammar = CitationGrammar::compile();
        let tokens = tokenize("12, затем");
        let (indices, next) = grammar.match_value_list(&tokens, 0).unwrap();
        assert_eq!(indices.len(), 1);
        // the comma before a non-value stays unconsumed
        assert!(tokens[next].is_comma());
    }

    #[test]
    fn test_leading_conjunction_is_a_value() {
        // "и" is a legitimate lettered subpoint when it opens the list
        let grammar = CitationGrammar::compile();
        assert_eq!(grammar.parse_values("и"), vec!["и"]);
    }
}
