//! Multi-intent resolution: normalize → segment → match each segment.

use std::sync::Arc;
use tracing::debug;

use crate::nlu::matcher::{FuzzyMatcher, IntentMatch};
use crate::nlu::normalize::normalize_text;
use crate::nlu::segment::split_commands;
use crate::nlu::taxonomy::Taxonomy;

/// Entry point for the speech pipeline.
///
/// Holds only immutable state, so one resolver can be shared across threads
/// and called concurrently.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    matcher: FuzzyMatcher,
}

impl CommandResolver {
    /// Create a resolver over the given matcher.
    pub fn new(matcher: FuzzyMatcher) -> Self {
        Self { matcher }
    }

    /// Resolver over the built-in taxonomy and default threshold.
    pub fn builtin() -> Self {
        Self::new(FuzzyMatcher::new(Arc::new(Taxonomy::builtin())))
    }

    /// Resolver over a taxonomy with a custom threshold.
    pub fn with_taxonomy(taxonomy: Taxonomy, threshold: f64) -> Self {
        Self::new(FuzzyMatcher::with_threshold(Arc::new(taxonomy), threshold))
    }

    /// The underlying matcher.
    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Resolve a raw transcribed utterance into one match per command segment,
    /// in utterance order. Empty input yields an empty list.
    pub fn resolve(&self, utterance: &str) -> Vec<IntentMatch> {
        let normalized = normalize_text(utterance);
        let segments = split_commands(&normalized);

        debug!(
            utterance,
            normalized = %normalized,
            segments = segments.len(),
            "Resolving utterance"
        );

        segments
            .iter()
            .map(|segment| self.matcher.match_segment(segment))
            .collect()
    }
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::intent::Intent;

    #[test]
    fn test_compound_utterance() {
        let resolver = CommandResolver::builtin();
        let matches = resolver.resolve("Batti on karo, aur panka chalao!");
        let intents: Vec<Intent> = matches.iter().map(|m| m.intent).collect();
        assert_eq!(intents, vec![Intent::LightOn, Intent::FanOn]);
        assert_eq!(matches[0].segment, "batti on karo");
        assert_eq!(matches[1].segment, "panka chalao");
    }

    #[test]
    fn test_partial_success() {
        let resolver = CommandResolver::builtin();
        let matches = resolver.resolve("pankha chalao aur what is the capital of france");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].intent, Intent::FanOn);
        assert_eq!(matches[1].intent, Intent::UnknownCommand);
    }

    #[test]
    fn test_empty_utterance() {
        let resolver = CommandResolver::builtin();
        assert!(resolver.resolve("").is_empty());
        assert!(resolver.resolve(" ?! ").is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let resolver = Arc::new(CommandResolver::builtin());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let resolver = resolver.clone();
                std::thread::spawn(move || resolver.resolve("time batao"))
            })
            .collect();
        for handle in handles {
            let matches = handle.join().unwrap();
            assert_eq!(matches[0].intent, Intent::TimeAsk);
        }
    }
}
