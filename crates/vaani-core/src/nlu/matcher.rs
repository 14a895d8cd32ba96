//! Fuzzy intent matching of a single command segment.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::nlu::intent::Intent;
use crate::nlu::similarity::token_set_ratio;
use crate::nlu::taxonomy::Taxonomy;

/// Minimum similarity (0–100) to accept a match.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 85.0;

/// Classification of one command segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMatch {
    /// The segment text that was classified.
    pub segment: String,
    /// Winning intent, or `UNKNOWN_COMMAND` below the threshold.
    pub intent: Intent,
    /// Best score found, rounded to two decimals. Kept for unknowns too.
    pub confidence: f64,
    /// Exemplar that produced the best score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_phrase: Option<String>,
}

impl IntentMatch {
    /// Whether the segment resolved to a known intent.
    pub fn is_known(&self) -> bool {
        self.intent != Intent::UnknownCommand
    }
}

/// Scores segments against every intent of a taxonomy.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    taxonomy: Arc<Taxonomy>,
    threshold: f64,
}

impl FuzzyMatcher {
    /// Create a matcher with the default threshold.
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self::with_threshold(taxonomy, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// Create a matcher with a custom threshold, clamped to 0–100.
    pub fn with_threshold(taxonomy: Arc<Taxonomy>, threshold: f64) -> Self {
        Self {
            taxonomy,
            threshold: threshold.clamp(0.0, 100.0),
        }
    }

    /// The confidence floor in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The taxonomy being matched against.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Best score of `segment` against one intent's exemplars.
    pub fn score_intent(&self, segment: &str, intent: Intent) -> Option<f64> {
        self.taxonomy
            .phrases(intent)
            .and_then(|phrases| best_phrase(segment, phrases))
            .map(|(_, score)| score)
    }

    /// Classify one segment.
    ///
    /// Intents are visited in taxonomy order and only a strictly higher score
    /// replaces the current best, so ties go to the earlier intent.
    pub fn match_segment(&self, segment: &str) -> IntentMatch {
        let mut best: Option<(Intent, &str, f64)> = None;

        for entry in self.taxonomy.iter() {
            let Some((phrase, score)) = best_phrase(segment, &entry.phrases) else {
                continue;
            };
            if best.map_or(true, |(_, _, top)| score > top) {
                best = Some((entry.intent, phrase, score));
            }
        }

        let (raw_intent, phrase, score) = match best {
            Some((intent, phrase, score)) => (intent, Some(phrase.to_string()), score),
            None => (Intent::UnknownCommand, None, 0.0),
        };

        let intent = if score >= self.threshold {
            raw_intent
        } else {
            Intent::UnknownCommand
        };

        debug!(
            segment,
            best = %raw_intent,
            resolved = %intent,
            score,
            "Matched segment"
        );

        IntentMatch {
            segment: segment.to_string(),
            intent,
            confidence: round2(score),
            matched_phrase: phrase,
        }
    }
}

/// Highest-scoring phrase; first one wins ties.
fn best_phrase<'a>(segment: &str, phrases: &'a [String]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for phrase in phrases {
        let score = token_set_ratio(segment, phrase);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((phrase.as_str(), score));
        }
    }
    best
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
