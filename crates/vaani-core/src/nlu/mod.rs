//! Natural-language command resolution.
//!
//! A closed-taxonomy, similarity-based classifier for transcribed
//! Hindi/Hinglish speech:
//! - `normalize`: strip punctuation, keep Devanagari, lowercase
//! - `segment`: split compound commands on conjunctions
//! - `matcher`: token-set fuzzy scoring against exemplar phrases
//! - `resolver`: the composed entry point
//!
//! # Example
//!
//! ```
//! use vaani_core::nlu::{CommandResolver, Intent};
//!
//! let resolver = CommandResolver::builtin();
//! let matches = resolver.resolve("batti on karo aur panka chalao");
//! assert_eq!(matches[0].intent, Intent::LightOn);
//! assert_eq!(matches[1].intent, Intent::FanOn);
//! ```

mod intent;
mod matcher;
mod normalize;
mod resolver;
mod segment;
mod similarity;
mod taxonomy;

pub use intent::Intent;
pub use matcher::{FuzzyMatcher, IntentMatch, DEFAULT_CONFIDENCE_THRESHOLD};
pub use normalize::normalize_text;
pub use resolver::CommandResolver;
pub use segment::{split_commands, CONJUNCTIONS};
pub use similarity::{ratio, token_set_ratio};
pub use taxonomy::{Taxonomy, TaxonomyEntry, TaxonomyFile};
