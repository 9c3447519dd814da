//! Word tokenizer with byte offsets

use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{L}[\p{L}\p{M}'’\-]*|\p{N}+").expect("word pattern is valid")
});

/// A word of the input with its byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    /// Lower-case form used for lexicon and gazetteer lookups
    #[must_use]
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    /// Starts with an upper-case letter and is longer than one character
    #[must_use]
    pub fn is_capitalized(&self) -> bool {
        let mut chars = self.text.chars();
        matches!(chars.next(), Some(c) if c.is_uppercase()) && chars.next().is_some()
    }
}

/// Split text into word and number tokens, dropping punctuation
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    WORD.find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Lower-cased tokens joined by single spaces
#[must_use]
pub fn normalized_key(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(Token::lower)
        .collect::<Vec<_>>()
        .join(" ")
}
