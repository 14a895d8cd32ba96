//! Intent taxonomy: the fixed registry of intents and their exemplar phrases.
//!
//! A taxonomy is loaded once (built-in or from a file) and never mutated.
//! Entry order is significant: when two intents score the same, the one
//! listed first wins.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::error::{ErrorCode, VaaniError, VaaniResult};
use crate::nlu::intent::Intent;
use crate::nlu::normalize::normalize_text;

/// One intent and its example phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub intent: Intent,
    pub phrases: Vec<String>,
}

/// On-disk taxonomy layout.
///
/// A list rather than a map so that TOML, JSON and YAML all keep entry order.
///
/// ```toml
/// [[intents]]
/// intent = "LIGHT_ON"
/// phrases = ["batti jalao", "light on karo"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyFile {
    pub intents: Vec<TaxonomyEntry>,
}

/// Immutable intent → exemplar registry.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// Build a taxonomy from ordered entries.
    ///
    /// Phrases are normalized the same way utterances are. Fails if the
    /// taxonomy is empty, an intent has no phrases, an intent repeats, or
    /// `UNKNOWN_COMMAND` is listed.
    pub fn from_entries(entries: Vec<TaxonomyEntry>) -> VaaniResult<Self> {
        if entries.is_empty() {
            return Err(VaaniError::taxonomy(
                "taxonomy has no intents",
                ErrorCode::TaxEmpty,
            ));
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for entry in entries {
            if entry.intent == Intent::UnknownCommand {
                return Err(VaaniError::taxonomy(
                    "UNKNOWN_COMMAND is reserved and cannot have phrases",
                    ErrorCode::TaxUnknownIntent,
                ));
            }
            if !seen.insert(entry.intent) {
                return Err(VaaniError::taxonomy(
                    format!("intent {} is listed more than once", entry.intent),
                    ErrorCode::TaxInvalidFormat,
                ));
            }

            let phrases: Vec<String> = entry
                .phrases
                .iter()
                .map(|p| normalize_text(p))
                .filter(|p| !p.is_empty())
                .collect();

            if phrases.is_empty() {
                return Err(VaaniError::taxonomy(
                    format!("intent {} has no example phrases", entry.intent),
                    ErrorCode::TaxEmpty,
                ));
            }

            normalized.push(TaxonomyEntry {
                intent: entry.intent,
                phrases,
            });
        }

        Ok(Self {
            entries: normalized,
        })
    }

    /// Load a taxonomy from a TOML, JSON or YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> VaaniResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str());

        let file: TaxonomyFile = match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| VaaniError::taxonomy(e.to_string(), ErrorCode::TaxInvalidFormat))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| VaaniError::taxonomy(e.to_string(), ErrorCode::TaxInvalidFormat))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| VaaniError::taxonomy(e.to_string(), ErrorCode::TaxInvalidFormat))?,
            _ => {
                return Err(VaaniError::taxonomy(
                    "Unsupported taxonomy file format. Use .toml, .json, or .yaml",
                    ErrorCode::TaxInvalidFormat,
                ))
            }
        };

        let taxonomy = Self::from_entries(file.intents)?;
        debug!(
            path = %path.display(),
            intents = taxonomy.len(),
            phrases = taxonomy.phrase_count(),
            "Loaded taxonomy from file"
        );
        Ok(taxonomy)
    }

    /// The built-in Hindi/Hinglish taxonomy.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(intent, phrases)| TaxonomyEntry {
                intent: *intent,
                phrases: phrases.iter().map(|p| p.to_string()).collect(),
            })
            .collect();

        // The built-in table is covered by tests; a failure here is a code bug.
        Self::from_entries(entries).unwrap_or_else(|e| panic!("built-in taxonomy invalid: {e}"))
    }

    /// Entries in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = &TaxonomyEntry> {
        self.entries.iter()
    }

    /// Phrases for one intent.
    pub fn phrases(&self, intent: Intent) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.intent == intent)
            .map(|e| e.phrases.as_slice())
    }

    /// Number of intents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed taxonomy.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of exemplar phrases.
    pub fn phrase_count(&self) -> usize {
        self.entries.iter().map(|e| e.phrases.len()).sum()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Built-in registry. Devanagari phrases first, romanized Hinglish after.
///
/// Avoid single-word phrases for intents that share a head noun with a later
/// intent ("alarm" would swallow "alarm band karo").
const BUILTIN: &[(Intent, &[&str])] = &[
    (
        Intent::LightOn,
        &[
            "बत्ती जलाओ",
            "लाइट ऑन करो",
            "बत्ती ऑन करो",
            "रोशनी करो",
            "लाइट चालू करो",
            "ट्यूबलाइट जला दो",
            "बैठक की लाइट जलाओ",
            "लिविंग रूम की लाइट ऑन करो",
            "लाइट जला दो",
            "बत्ती चालू करो",
            "बत्ती जला दो",
            "लाइट ऑन कर दो",
            "अंधेरा दूर करो",
            "batti jalao",
            "batti on karo",
            "light on karo",
            "light chalu karo",
            "batti jala do",
            "living room ki light on karo",
            "turn on the light",
        ],
    ),
    (
        Intent::LightOff,
        &[
            "बत्ती बुझाओ",
            "लाइट ऑफ करो",
            "बत्ती बंद करो",
            "अंधेरा करो",
            "लाइट बंद कर दो",
            "सब कुछ बंद करो",
            "सब ऑफ कर दो",
            "बत्ती बंद कर दो",
            "लाइट बंद करो",
            "बत्तियां बुझा दो",
            "लाइट बुझा दो",
            "batti bujhao",
            "batti band karo",
            "batti band kar do",
            "light off karo",
            "light band karo",
            "turn off the light",
        ],
    ),
    (
        Intent::FanOn,
        &[
            "पंखा चलाओ",
            "फैन ऑन कर दो",
            "पंखा चालू करो",
            "पंखा ऑन करो",
            "फैन चालू करो",
            "पंखा चला दो",
            "pankha chalao",
            "panka chalao",
            "pankha on karo",
            "fan on karo",
            "fan chalu karo",
            "pankha chala do",
        ],
    ),
    (
        Intent::FanOff,
        &[
            "पंखा बंद करो",
            "फैन ऑफ करो",
            "पंखा बंद कर दो",
            "फैन बंद करो",
            "पंखा ऑफ कर दो",
            "pankha band karo",
            "pankha band kar do",
            "fan off karo",
            "fan band karo",
        ],
    ),
    (
        Intent::AcOn,
        &[
            "वातानुकूलक चलाओ",
            "एसी ऑन करना",
            "एसी चला दो",
            "एसी चालू करो",
            "एसी ऑन करो",
            "ac on karo",
            "ac chalao",
            "ac chalu karo",
        ],
    ),
    (
        Intent::AcOff,
        &[
            "एसी बंद करो",
            "एसी ऑफ करो",
            "एसी बंद कर दो",
            "ac band karo",
            "ac off karo",
        ],
    ),
    (
        Intent::TimeAsk,
        &[
            "समय क्या है",
            "टाइम बताओ",
            "कितने बजे हैं",
            "टाइम क्या हुआ",
            "घड़ी में क्या टाइम है",
            "टाइम क्या है",
            "अभी क्या समय हो रहा है",
            "अभी टाइम क्या हो रहा है",
            "क्या बजा है",
            "समय क्या हो",
            "समझी",
            "samay kya hai",
            "time batao",
            "kitne baje hain",
            "time kya hua",
            "abhi kya time ho raha hai",
        ],
    ),
    (
        Intent::DateAsk,
        &[
            "आज क्या तारीख है",
            "आज की डेट क्या है",
            "आज कौन सी तारीख है",
            "कल क्या तारीख होगी",
            "कल की डेट क्या है",
            "आज कितनी तारीख है",
            "आज कौन सा दिनांक है",
            "aaj kya tarikh hai",
            "aaj ki date kya hai",
            "aaj kitni tarikh hai",
        ],
    ),
    (
        Intent::DayAsk,
        &[
            "आज कौन सा दिन है",
            "आज कौन सा डे है",
            "आज क्या दिन है",
            "आज कौन वार है",
            "aaj kaun sa din hai",
            "aaj kya din hai",
        ],
    ),
    (
        Intent::WeatherAsk,
        &[
            "मौसम कैसा है",
            "आज का मौसम कैसा है",
            "आज वेदर कैसा है",
            "मौसम का हाल बताओ",
            "बाहर का मौसम",
            "कल का मौसम कैसा रहेगा",
            "क्या आज मौसम साफ है",
            "बाहर मौसम कैसा है",
            "mausam kaisa hai",
            "aaj ka mausam kaisa hai",
            "aaj weather kaisa hai",
        ],
    ),
    (
        Intent::TempAsk,
        &[
            "तापमान बताओ",
            "बाहर तापमान क्या है",
            "बाहर कितना टेंपरेचर है",
            "गर्मी कितनी है",
            "कमरे का तापमान बताओ",
            "रूम टेंपरेचर क्या है",
            "आज कितनी गर्मी है",
            "टेंपरेचर बताओ",
            "tapman batao",
            "temperature batao",
            "room temperature kya hai",
            "garmi kitni hai",
        ],
    ),
    (
        Intent::RainAsk,
        &[
            "आज की बारिश",
            "क्या आज बारिश होगी",
            "रेन के चांसेस हैं क्या",
            "क्या बारिश होने वाली है",
            "बारिश होगी क्या",
            "kya aaj baarish hogi",
            "baarish hogi kya",
        ],
    ),
    (
        Intent::AlarmSet,
        &[
            "अलार्म लगाओ",
            "अलार्म सेट करो",
            "उठा देना",
            "अलार्म लगा दो",
            "मुझे जगा देना",
            "alarm lagao",
            "alarm set karo",
            "alarm laga do",
            "utha dena",
            "mujhe jaga dena",
            "set an alarm",
        ],
    ),
    (
        Intent::ReminderSet,
        &[
            "याद दिलाना",
            "रिमाइंडर सेट करो",
            "मुझे याद दिलाओ",
            "रिमाइंड मी",
            "रिमाइंडर लगाओ",
            "रिमाइंडर",
            "yaad dilana",
            "mujhe yaad dilao",
            "reminder set karo",
            "reminder lagao",
            "remind me",
            "reminder",
        ],
    ),
    (
        Intent::AlarmStop,
        &[
            "अलार्म बंद करो",
            "स्टॉप इट",
            "चुप हो जाओ",
            "बंद करो",
            "अलार्म रोक दो",
            "alarm band karo",
            "alarm rok do",
            "chup ho jao",
            "stop it",
        ],
    ),
    (
        Intent::TranslateAsk,
        &[
            "हिंदी में क्या कहते हैं",
            "का अनुवाद करो",
            "ट्रांसलेट करो",
            "मतलब क्या होता है",
            "मीनिंग क्या है",
            "को हिंदी में क्या बोलते हैं",
            "hindi mein kya kehte hain",
            "translate karo",
            "matlab kya hota hai",
            "meaning kya hai",
        ],
    ),
    (
        Intent::VolumeUp,
        &[
            "आवाज़ बढ़ाओ",
            "वॉल्यूम बढ़ाओ",
            "आवाज़ तेज़ करो",
            "awaaz badhao",
            "volume badhao",
            "volume up karo",
        ],
    ),
    (
        Intent::VolumeDown,
        &[
            "आवाज़ कम करो",
            "वॉल्यूम कम करो",
            "आवाज़ धीमी करो",
            "awaaz kam karo",
            "volume kam karo",
            "volume down karo",
        ],
    ),
];
