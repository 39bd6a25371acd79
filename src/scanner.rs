//! # Scanner Module
//!
//! ## Purpose
//! Applies the compiled citation grammar to input text and yields all
//! non-overlapping citation matches with their raw field captures.
//!
//! ## Input/Output Specification
//! - **Input**: Tokenized text plus the compiled grammar
//! - **Output**: `RawMatch` records in leftmost-first order
//! - **Semantics**: leftmost-first, commit to the first successful match,
//!   resume strictly after its end
//!
//! The matcher is a recursive-descent walk over the token stream rather than
//! a backtracking regex engine. Match attempts start only at unit-keyword
//! tokens and the law-name window is capped, so scanning stays linear in the
//! input size even on adversarial text.

use crate::grammar::{tokenize, CitationGrammar, Token};
use std::ops::Range;

/// Upper bound on the law-name token window searched for an act noun
const MAX_NAME_TOKENS: usize = 64;

/// A single scanner hit with its raw field captures. Optional clauses that
/// did not match yield `None`; the article list is always present since a
/// hit without article values is discarded during matching.
#[derive(Debug, Clone)]
pub struct RawMatch {
    /// Byte span of the whole matched phrase
    pub span: Range<usize>,
    /// Raw subpoint value-list text
    pub subpoints: Option<String>,
    /// Raw point value-list text
    pub points: Option<String>,
    /// Raw article value-list text
    pub articles: String,
    /// Law-name phrase, trimmed of whitespace and trailing punctuation
    pub law_name: String,
}

/// Clause positions in the phrase grammar
#[derive(Debug, Clone, Copy)]
enum Clause {
    Subpoint,
    Point,
    Article,
}

/// Applies the grammar to input text
pub struct Scanner<'g> {
    grammar: &'g CitationGrammar,
}

impl<'g> Scanner<'g> {
    pub fn new(grammar: &'g CitationGrammar) -> Self {
        Self { grammar }
    }

    /// Produce the maximal set of non-overlapping matches, leftmost first
    pub fn scan(&self, text: &str) -> Vec<RawMatch> {
        let tokens = tokenize(text);
        let mut matches = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if !(token.is_word() && self.grammar.is_unit_keyword(&token.folded())) {
                i += 1;
                continue;
            }
            match self.match_at(text, &tokens, i) {
                Some((raw, next)) => {
                    matches.push(raw);
                    i = next;
                }
                None => i += 1,
            }
        }

        matches
    }

    /// Attempt a full citation match starting at token `start`
    fn match_at(
        &self,
        text: &str,
        tokens: &[Token<'_>],
        start: usize,
    ) -> Option<(RawMatch, usize)> {
        let mut pos = start;

        let subpoints = self.try_clause(text, tokens, &mut pos, Clause::Subpoint);
        self.try_glue(tokens, &mut pos);
        let points = self.try_clause(text, tokens, &mut pos, Clause::Point);
        self.try_glue(tokens, &mut pos);
        let articles = self.try_clause(text, tokens, &mut pos, Clause::Article)?;
        let (law_name, span_end, next) = self.match_law_name(text, tokens, pos)?;

        let raw = RawMatch {
            span: tokens[start].start..span_end,
            subpoints,
            points,
            articles,
            law_name,
        };
        Some((raw, next))
    }

    /// Match one clause: unit keyword, optional abbreviation dot, value
    /// list. On failure `pos` is left untouched so the caller can continue
    /// with the next clause.
    fn try_clause(
        &self,
        text: &str,
        tokens: &[Token<'_>],
        pos: &mut usize,
        clause: Clause,
    ) -> Option<String> {
        let keyword = tokens.get(*pos)?;
        if !keyword.is_word() {
            return None;
        }
        let folded = keyword.folded();
        let is_keyword = match clause {
            Clause::Subpoint => self.grammar.is_subpoint_keyword(&folded),
            Clause::Point => self.grammar.is_point_keyword(&folded),
            Clause::Article => self.grammar.is_article_keyword(&folded),
        };
        if !is_keyword {
            return None;
        }

        let mut i = *pos + 1;
        if tokens.get(i).is_some_and(|t| t.is_dot()) {
            i += 1;
        }

        let (indices, next) = self.grammar.match_value_list(tokens, i)?;
        let first = tokens[*indices.first()?];
        let last = tokens[*indices.last()?];
        let raw = text[first.start..last.end].to_string();

        *pos = next;
        Some(raw)
    }

    /// Consume a bare conjunction when it glues two clauses together
    fn try_glue(&self, tokens: &[Token<'_>], pos: &mut usize) {
        if let (Some(token), Some(next)) = (tokens.get(*pos), tokens.get(*pos + 1)) {
            if token.is_word()
                && self.grammar.is_conjunction(&token.folded())
                && next.is_word()
                && self.grammar.is_unit_keyword(&next.folded())
            {
                *pos += 1;
            }
        }
    }

    /// Match the law-name phrase following the article clause: everything up
    /// to the next sentence punctuation or line break, provided a recognized
    /// legal-act noun occurs inside that window. A window without an act
    /// noun discards the whole match.
    fn match_law_name(
        &self,
        text: &str,
        tokens: &[Token<'_>],
        pos: usize,
    ) -> Option<(String, usize, usize)> {
        let limit = tokens.len().min(pos + MAX_NAME_TOKENS);
        let mut noun_found = false;
        let mut i = pos;
        while i < limit {
            let token = &tokens[i];
            if token.is_name_terminator() {
                break;
            }
            if token.is_word() && self.grammar.is_act_noun(&token.folded()) {
                noun_found = true;
            }
            i += 1;
        }

        if !noun_found || i == pos {
            return None;
        }

        let span_end = tokens[i - 1].end;
        let raw = &text[tokens[pos].start..span_end];
        let law_name = raw
            .trim()
            .trim_end_matches(['.', ',', ';', ':'])
            .trim_end()
            .to_string();
        if law_name.is_empty() {
            return None;
        }

        Some((law_name, span_end, i))
    }
}
