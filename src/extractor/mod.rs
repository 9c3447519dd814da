//! Entity Extractor
//!
//! Turns raw input text into an ordered list of location candidates. The
//! capability sits behind [`EntityExtractor`] so the tagging model can be
//! swapped without touching the orchestrator. [`RuleBasedExtractor`] is the
//! shipped model: gazetteer lookups plus capitalisation and keyword rules.

pub mod gazetteer;
pub mod lexicon;
pub mod tokenizer;

pub use gazetteer::Gazetteer;

use crate::Result;
use crate::catalog::AirportCatalog;
use crate::config::ExtractorConfig;
use crate::models::{EntityLabel, LocationCandidate};
use lexicon::{CONNECTORS, FACILITY_KEYWORDS, LOCATIVE_CUES, NATURAL_KEYWORDS, STOPWORDS};
use std::collections::HashSet;
use tokenizer::{Token, tokenize};
use tracing::debug;

/// Extracts location candidates from free text
pub trait EntityExtractor: Send + Sync {
    /// Candidates in order of appearance, deduplicated by normalised text.
    /// An empty result is not an error.
    fn extract(&self, text: &str) -> Vec<LocationCandidate>;
}

/// Gazetteer and rule based named-entity tagger
#[derive(Debug, Clone)]
pub struct RuleBasedExtractor {
    gazetteer: Gazetteer,
    labels: Vec<EntityLabel>,
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new(
            Gazetteer::bundled(),
            vec![EntityLabel::Gpe, EntityLabel::Loc, EntityLabel::Fac],
        )
    }
}

impl RuleBasedExtractor {
    #[must_use]
    pub fn new(gazetteer: Gazetteer, labels: Vec<EntityLabel>) -> Self {
        Self { gazetteer, labels }
    }

    /// Build the extractor from configuration, adding every airport
    /// municipality of the catalog to the bundled gazetteer as a proper name
    pub fn from_config(config: &ExtractorConfig, catalog: &AirportCatalog) -> Result<Self> {
        let mut gazetteer = Gazetteer::bundled();
        gazetteer.extend_proper_names(catalog.municipalities());

        if let Some(path) = &config.gazetteer_path {
            gazetteer.load_file(path)?;
        }

        let labels = config.entity_labels()?;

        debug!(
            "Entity extractor ready with {} gazetteer entries, labels {:?}",
            gazetteer.len(),
            labels
        );

        Ok(Self::new(gazetteer, labels))
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// End (exclusive) of the run of capitalised words starting at `start`.
    /// Connectors are kept only when a capitalised word follows them; a
    /// gazetteer name ends the run so it can be tagged on its own.
    fn capitalized_run_end(&self, tokens: &[Token<'_>], start: usize) -> usize {
        let mut end = start + 1;
        while end < tokens.len() && self.gazetteer.longest_match(tokens, end).is_none() {
            let token = &tokens[end];
            if token.is_capitalized() {
                end += 1;
            } else if CONNECTORS.contains(token.lower().as_str())
                && tokens.get(end + 1).is_some_and(Token::is_capitalized)
            {
                end += 2;
            } else {
                break;
            }
        }
        end
    }

    /// Tag every entity span in `text`, whatever its label
    #[must_use]
    pub fn tag(&self, text: &str) -> Vec<LocationCandidate> {
        let tokens = tokenize(text);
        let mut spans = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if let Some(len) = self.gazetteer.longest_match(&tokens, i) {
                let mut end = i + len;
                let mut label = EntityLabel::Gpe;
                if let Some(next) = tokens.get(end) {
                    if FACILITY_KEYWORDS.contains(next.lower().as_str()) {
                        end += 1;
                        label = EntityLabel::Fac;
                    }
                }
                spans.push(span(text, &tokens[i..end], label));
                i = end;
                continue;
            }

            if starts_name(&tokens[i]) {
                let end = self.capitalized_run_end(&tokens, i);
                let (end, label) = classify_run(&tokens, i, end);
                if !tokens[i..end].iter().all(|t| lexicon::is_keyword(&t.lower())) {
                    spans.push(span(text, &tokens[i..end], label));
                }
                i = end;
                continue;
            }

            i += 1;
        }

        spans
    }
}

impl EntityExtractor for RuleBasedExtractor {
    fn extract(&self, text: &str) -> Vec<LocationCandidate> {
        let mut seen = HashSet::new();
        let candidates: Vec<_> = self
            .tag(text)
            .into_iter()
            .inspect(|c| debug!(" - {} ({})", c.text, c.label))
            .filter(|c| self.labels.contains(&c.label))
            .filter(|c| seen.insert(c.normalized()))
            .collect();

        debug!("Extracted {} location candidates", candidates.len());
        candidates
    }
}

fn span(text: &str, tokens: &[Token<'_>], label: EntityLabel) -> LocationCandidate {
    let start = tokens[0].start;
    let end = tokens[tokens.len() - 1].end;
    LocationCandidate::new(&text[start..end], label, start)
}

fn starts_name(token: &Token<'_>) -> bool {
    token.is_capitalized() && !STOPWORDS.contains(token.lower().as_str())
}

/// Label a capitalised run, possibly absorbing a trailing keyword
fn classify_run(tokens: &[Token<'_>], start: usize, end: usize) -> (usize, EntityLabel) {
    let first = tokens[start].lower();
    let last = tokens[end - 1].lower();
    let next = tokens.get(end).map(Token::lower);

    if let Some(next) = next.as_deref() {
        if FACILITY_KEYWORDS.contains(next) {
            return (end + 1, EntityLabel::Fac);
        }
        if NATURAL_KEYWORDS.contains(next) {
            return (end + 1, EntityLabel::Loc);
        }
    }

    if FACILITY_KEYWORDS.contains(last.as_str()) {
        return (end, EntityLabel::Fac);
    }
    if NATURAL_KEYWORDS.contains(last.as_str())
        || (end - start > 1 && NATURAL_KEYWORDS.contains(first.as_str()))
    {
        return (end, EntityLabel::Loc);
    }

    let cued = start
        .checked_sub(1)
        .is_some_and(|prev| LOCATIVE_CUES.contains(tokens[prev].lower().as_str()));
    if cued {
        (end, EntityLabel::Loc)
    } else {
        (end, EntityLabel::Org)
    }
}
