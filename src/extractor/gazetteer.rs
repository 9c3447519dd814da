//! Gazetteer of known place names
//!
//! Names are stored as lower-cased token sequences so that lookups ignore
//! punctuation ("St. Louis" matches "st louis"). Names from the bundled list
//! match in any case. Names added at runtime (airport towns, user files) only
//! match when the text starts them with a capital, since many of them are
//! also ordinary words ("Nice", "Mobile", "Eagle").

use super::lexicon::{STOPWORDS, is_keyword};
use super::tokenizer::{Token, normalized_key, tokenize};
use crate::{LocatorError, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use tracing::debug;

const BUNDLED: &str = include_str!("../../data/gazetteer.txt");

/// How the text must spell a name for it to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchCase {
    Any,
    Capitalized,
}

#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: HashMap<String, MatchCase>,
    max_tokens: usize,
}

impl Gazetteer {
    /// Empty gazetteer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gazetteer seeded with the place list shipped with the crate
    #[must_use]
    pub fn bundled() -> Self {
        let mut gazetteer = Self::new();
        gazetteer.extend(name_lines(BUNDLED));
        gazetteer
    }

    /// Add a place name that matches in any case. Returns `false` when the
    /// name is unusable or already known.
    pub fn insert(&mut self, name: &str) -> bool {
        self.add(name, MatchCase::Any)
    }

    /// Add a place name that only matches when written with a leading capital
    pub fn insert_proper_name(&mut self, name: &str) -> bool {
        self.add(name, MatchCase::Capitalized)
    }

    /// Unusable names are empty, a lone stopword or keyword, or a single word
    /// shorter than three letters. A name known in any case stays that way.
    fn add(&mut self, name: &str, case: MatchCase) -> bool {
        let tokens = tokenize(name);
        if tokens.is_empty() {
            return false;
        }

        if let [single] = tokens.as_slice() {
            let lower = single.lower();
            if lower.chars().count() < 3 || STOPWORDS.contains(lower.as_str()) || is_keyword(&lower)
            {
                return false;
            }
        }

        self.max_tokens = self.max_tokens.max(tokens.len());
        match self.entries.entry(normalized_key(&tokens)) {
            Entry::Vacant(slot) => {
                slot.insert(case);
                true
            }
            Entry::Occupied(mut slot) => {
                if case == MatchCase::Any && *slot.get() == MatchCase::Capitalized {
                    slot.insert(MatchCase::Any);
                }
                false
            }
        }
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.insert(name.as_ref());
        }
    }

    pub fn extend_proper_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.insert_proper_name(name.as_ref());
        }
    }

    /// Add proper names from a file in the bundled list format
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LocatorError::config(format!("cannot read gazetteer {}: {e}", path.display()))
        })?;

        let before = self.entries.len();
        self.extend_proper_names(name_lines(&content));
        let added = self.entries.len() - before;
        debug!("Added {} gazetteer entries from {}", added, path.display());
        Ok(added)
    }

    /// Whether `name`, spelled as given, would be tagged
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let tokens = tokenize(name);
        !tokens.is_empty() && self.matches(&tokens)
    }

    /// Length in tokens of the longest known name starting at `tokens[start]`
    #[must_use]
    pub fn longest_match(&self, tokens: &[Token<'_>], start: usize) -> Option<usize> {
        let available = tokens.len().saturating_sub(start);
        (1..=self.max_tokens.min(available))
            .rev()
            .find(|&len| self.matches(&tokens[start..start + len]))
    }

    fn matches(&self, tokens: &[Token<'_>]) -> bool {
        match self.entries.get(&normalized_key(tokens)) {
            Some(MatchCase::Any) => true,
            Some(MatchCase::Capitalized) => tokens[0].is_capitalized(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Non-blank lines that are not `#` comments
fn name_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_bundled_list_loads() {
        let gazetteer = Gazetteer::bundled();
        assert!(gazetteer.len() > 100);
        assert!(gazetteer.contains("Gurgaon"));
        assert!(gazetteer.contains("NEW   DELHI"));
        assert!(!gazetteer.contains("# countries"));
    }

    #[rstest]
    #[case("", false)]
    #[case("LA", false)]
    #[case("the", false)]
    #[case("Airport", false)]
    #[case("St. Louis", true)]
    #[case("Zürich", true)]
    fn test_insert_rules(#[case] name: &str, #[case] accepted: bool) {
        let mut gazetteer = Gazetteer::new();
        assert_eq!(gazetteer.insert(name), accepted);
    }

    #[test]
    fn test_longest_match_prefers_longer_names() {
        let mut gazetteer = Gazetteer::new();
        gazetteer.extend(["New York", "New York City", "York"]);

        let tokens = tokenize("flying from new york city tomorrow");
        assert_eq!(gazetteer.longest_match(&tokens, 2), Some(3));
        assert_eq!(gazetteer.longest_match(&tokens, 3), Some(1));
        assert_eq!(gazetteer.longest_match(&tokens, 0), None);
    }

    #[test]
    fn test_longest_match_at_end_of_input() {
        let mut gazetteer = Gazetteer::new();
        gazetteer.insert("New York City");
        let tokens = tokenize("to new york");
        assert_eq!(gazetteer.longest_match(&tokens, 1), None);
        assert_eq!(gazetteer.longest_match(&tokens, 5), None);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.txt");
        std::fs::write(&path, "# local names\nSohna\n\nManesar\n").unwrap();

        let mut gazetteer = Gazetteer::new();
        assert_eq!(gazetteer.load_file(&path).unwrap(), 2);
        assert!(gazetteer.contains("Manesar"));
        assert!(!gazetteer.contains("manesar"));
    }

    #[test]
    fn test_proper_names_need_a_capital() {
        let mut gazetteer = Gazetteer::new();
        gazetteer.extend_proper_names(["Nice", "Mobile", "Santa Cruz"]);

        let tokens = tokenize("a nice view of Nice from santa cruz or Santa Cruz");
        assert_eq!(gazetteer.longest_match(&tokens, 1), None);
        assert_eq!(gazetteer.longest_match(&tokens, 4), Some(1));
        assert_eq!(gazetteer.longest_match(&tokens, 6), None);
        assert_eq!(gazetteer.longest_match(&tokens, 9), Some(2));
    }

    #[test]
    fn test_bundled_name_keeps_any_case() {
        let mut gazetteer = Gazetteer::bundled();
        assert!(!gazetteer.insert_proper_name("Gurgaon"));
        assert!(gazetteer.contains("gurgaon"));
    }
}
