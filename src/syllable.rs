//! Tibetan syllable analysis and the affix system.
//!
//! Holds the inventory of merged affixes (particles that attach to the last
//! syllable of a word), the free-standing particle set used by the token
//! finalizer, and [`SylComponents`], which generates all affixed surface
//! forms of a syllable for trie inflection.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

pub use crate::token::TSEK;

/// Information about an affix attached to a syllable.
#[derive(Debug, Clone)]
pub struct AffixData {
    /// Length of the affix in codepoints
    pub len: usize,
    /// Type of affix ("la", "gis", "gi", ...)
    pub affix_type: String,
    /// Whether འ was removed before attaching the affix
    pub aa: bool,
}

/// Merged affixes: surface form to (codepoint length, affix type).
static AFFIXES: Lazy<HashMap<&'static str, (usize, &'static str)>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("ར", (1, "la"));
    m.insert("ས", (1, "gis"));
    m.insert("འི", (2, "gi"));
    m.insert("འམ", (2, "am"));
    m.insert("འང", (2, "ang"));
    m.insert("འོ", (2, "o"));
    m.insert("འིའོ", (4, "gi+o"));
    m.insert("འིའམ", (4, "gi+am"));
    m.insert("འིའང", (4, "gi+ang"));
    m.insert("འོའམ", (4, "o+am"));
    m.insert("འོའང", (4, "o+ang"));
    m
});

/// Particle suffixes that mark a syllable as already affixed.
static AFFIX_PARTICLES: &[&str] = &[
    "འི",   // genitive
    "འོ",   // terminative
    "འམ",   // alternative
    "འང",   // concessive
    "འིའོ", // genitive + terminative
    "འིའམ", // genitive + alternative
    "འིའང", // genitive + concessive
    "འོའམ", // terminative + alternative
    "འོའང", // terminative + concessive
];

/// Syllable-final suffixes that can host particle affixes.
static AFFIXABLE_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let suffixes = [
        // Bare suffix consonants
        "འ", "ག", "ང", "ད", "ན", "བ", "མ", "ལ",
        // Suffixes with preceding vowels
        "ིག", "ིང", "ིད", "ིན", "ིབ", "ིམ", "ིལ", "ིས",
        "ུག", "ུང", "ུད", "ུན", "ུབ", "ུམ", "ུལ", "ུས",
        "ེག", "ེང", "ེད", "ེན", "ེབ", "ེམ", "ེལ", "ེས",
        "ོག", "ོང", "ོད", "ོན", "ོབ", "ོམ", "ོལ", "ོས",
        // Open syllables
        "ི", "ུ", "ེ", "ོ",
        // Standalone consonant suffixes
        "ས", "ར",
    ];
    suffixes.iter().copied().collect()
});

/// Free-standing particle surface forms the finalizer recognizes.
pub static PARTICLES: &[&str] = &[
    "འི", "ས", "འང", "ག", "གི", "གིས", "ཀྱི", "ཀྱིས", "ལ", "ར", "རུ", "ན", "ནས", "འམ", "ཡང", "མ",
];

/// Canonical lemma for each particle surface form.
pub static PART_LEMMAS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("འི", "གྱི");
    m.insert("ས", "གྱིས");
    m.insert("འང", "ཡང");
    m.insert("གི", "གྱི");
    m.insert("གིས", "གྱིས");
    m.insert("ཀྱི", "གྱི");
    m.insert("ཀྱིས", "གྱིས");
    m.insert("ལ", "ལ");
    m.insert("ར", "ར");
    m.insert("རུ", "རུ");
    m.insert("ན", "ན");
    m.insert("ནས", "ནས");
    m.insert("འམ", "འམ");
    m.insert("ཡང", "ཡང");
    m.insert("མ", "མ");
    m
});

/// Dagdra particles (pa/po/ba/bo)
pub static DAGDRA: &[&str] = &["པ་", "པོ་", "བ་", "བོ་"];

/// Check if a surface form is one of the free-standing particles.
pub fn is_particle(text: &str) -> bool {
    let trimmed = text.trim_end_matches(TSEK);
    PARTICLES.contains(&trimmed)
}

/// Check if a word is a dagdra particle (pa/po/ba/bo).
pub fn is_dagdra(text: &str) -> bool {
    let cleaned = if text.ends_with(TSEK) {
        text.to_string()
    } else {
        format!("{}{}", text, TSEK)
    };
    DAGDRA.contains(&cleaned.as_str())
}

/// Generator of affixed syllable forms, driven by the suffix inventory.
#[derive(Debug, Default)]
pub struct SylComponents;

impl SylComponents {
    /// Create a new generator.
    pub fn new() -> Self {
        SylComponents
    }

    /// Check if a syllable can take particle affixes: it must not already
    /// carry one and must end in a suffix that hosts particles.
    pub fn is_affixable(&self, syl: &str) -> bool {
        for affix in AFFIX_PARTICLES {
            if syl.len() > affix.len() && syl.ends_with(affix) {
                return false;
            }
        }
        self.is_thame(syl)
    }

    /// Check if a syllable ends in a particle-hosting suffix.
    pub fn is_thame(&self, syl: &str) -> bool {
        let chars: Vec<char> = syl.chars().collect();
        for suffix_len in (1..=2).rev() {
            if chars.len() > suffix_len {
                let suffix: String = chars[chars.len() - suffix_len..].iter().collect();
                if AFFIXABLE_SUFFIXES.contains(suffix.as_str()) {
                    return true;
                }
            }
        }
        // a final འ is removed before affixation
        syl.ends_with('འ') && chars.len() > 1
    }

    /// All affixed surface forms of a syllable, or `None` if it cannot take
    /// affixes. The affix attaches directly, with no tsek in between.
    pub fn get_all_affixed(&self, syl: &str) -> Option<Vec<(String, AffixData)>> {
        if !self.is_affixable(syl) {
            return None;
        }

        let mut aa = false;
        let base: String = if syl.ends_with('འ') && syl.chars().count() > 1 {
            aa = true;
            let mut chars: Vec<char> = syl.chars().collect();
            chars.pop();
            chars.into_iter().collect()
        } else {
            syl.to_string()
        };

        let mut affixed = Vec::with_capacity(AFFIXES.len());
        for (affix, (len, affix_type)) in AFFIXES.iter() {
            affixed.push((
                format!("{}{}", base, affix),
                AffixData {
                    len: *len,
                    affix_type: affix_type.to_string(),
                    aa,
                },
            ));
        }

        Some(affixed)
    }
}
