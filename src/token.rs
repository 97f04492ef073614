//! Token representation for Tibetan text.
//!
//! A [`Token`] is one segmented unit of the input: a word, a raw syllable,
//! punctuation, a number or a foreign-script run. Word tokens carry the
//! syllable geometry and the dictionary senses attached to the matched entry.

use serde::{Deserialize, Serialize};

use crate::char_categories::CharCategory;
use crate::chunker::ChunkKind;

/// POS marker for syllables that did not match any dictionary entry.
pub const NO_POS: &str = "NO_POS";

/// POS marker for tokens that are not words at all.
pub const NON_WORD: &str = "NON_WORD";

/// POS tag given to split-off grammatical particles.
pub const PART: &str = "PART";

/// The tsek separator.
pub const TSEK: char = '་';

fn is_false(b: &bool) -> bool {
    !*b
}

/// A word sense from the dictionary. Multiple senses on one entry represent
/// homographs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    /// Part-of-speech for this sense
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    /// Lemma for this sense
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    /// Frequency for this sense
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<u32>,
    /// Sense label/gloss
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense: Option<String>,
    /// Whether this sense belongs to an affixed surface form. `None` means
    /// the dictionary did not say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affixed: Option<bool>,
}

impl Sense {
    /// Number of populated attributes, used by sense selection.
    pub fn populated(&self) -> usize {
        self.pos.is_some() as usize
            + self.lemma.is_some() as usize
            + self.freq.is_some() as usize
            + self.sense.is_some() as usize
    }

    fn debug_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref pos) = self.pos {
            parts.push(format!("pos: {}", pos));
        }
        if let Some(freq) = self.freq {
            parts.push(format!("freq: {}", freq));
        }
        if let Some(ref lemma) = self.lemma {
            parts.push(format!("lemma: {}", lemma));
        }
        if let Some(ref sense) = self.sense {
            parts.push(format!("sense: {}", sense));
        }
        if let Some(affixed) = self.affixed {
            parts.push(format!("affixed: {}", affixed));
        }
        parts.join(", ")
    }
}

/// Information about the affix carried by an affixed surface form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixInfo {
    /// Length of the affix in codepoints
    pub len: usize,
    /// Type of affix ("la", "gis", "gi", ...)
    #[serde(rename = "affixType")]
    pub affix_type: String,
    /// Whether འ was removed before attaching the affix
    pub aa: bool,
}

/// A single token produced by tokenization.
///
/// `start` and `len` are codepoint offsets into the (NFC-normalized) input.
/// Syllable geometry (`syls_idx`, `syls_start_end`) is relative to the token
/// start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Verbatim text of the token
    pub text: String,

    /// Starting codepoint offset in the input
    pub start: usize,

    /// Length in codepoints
    #[serde(rename = "length")]
    pub len: usize,

    /// The kind of this token
    #[serde(rename = "chunkType")]
    pub chunk_type: ChunkKind,

    /// Text with separators collapsed and a canonical trailing tsek
    #[serde(rename = "textCleaned", default, skip_serializing_if = "Option::is_none")]
    pub text_cleaned: Option<String>,

    /// Root form with any affix removed
    #[serde(rename = "textUnaffixed", default, skip_serializing_if = "Option::is_none")]
    pub text_unaffixed: Option<String>,

    /// Part-of-speech tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,

    /// Lemma (dictionary form, tsek-terminated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,

    /// Frequency from the dictionary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<u32>,

    /// Category of every covered codepoint (`char_types.len() == len`)
    #[serde(rename = "charTypes", default, skip_serializing_if = "Vec::is_empty")]
    pub char_types: Vec<CharCategory>,

    /// The syllables of this token
    #[serde(rename = "syllables", default, skip_serializing_if = "Vec::is_empty")]
    pub syls: Vec<String>,

    /// Codepoint offsets of each syllable's characters, relative to `start`
    #[serde(rename = "syllableIndices", default, skip_serializing_if = "Vec::is_empty")]
    pub syls_idx: Vec<Vec<usize>>,

    /// `(start, end)` span of each syllable, relative to `start`
    #[serde(rename = "syllableStartEnd", default, skip_serializing_if = "Vec::is_empty")]
    pub syls_start_end: Vec<(usize, usize)>,

    /// Dictionary senses attached to this token
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub senses: Vec<Sense>,

    /// Whether this token is (or contains) Sanskrit
    #[serde(rename = "sanskrit", default, skip_serializing_if = "is_false")]
    pub skrt: bool,

    /// Whether this token is a split-off grammatical particle
    #[serde(default, skip_serializing_if = "is_false")]
    pub affix: bool,

    /// Whether this token hosts a following particle
    #[serde(rename = "affixHost", default, skip_serializing_if = "is_false")]
    pub affix_host: bool,

    /// Affixation metadata from the matched dictionary entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affixation: Option<AffixInfo>,
}

impl Token {
    /// Create a new empty token.
    pub fn new() -> Self {
        Token::default()
    }

    /// Create a token with text and position.
    pub fn with_text(text: String, start: usize, len: usize, chunk_type: ChunkKind) -> Self {
        Token {
            text,
            start,
            len,
            chunk_type,
            ..Default::default()
        }
    }

    /// The cleaned content: syllables joined by tsek, with a trailing tsek
    /// unless this token hosts an affix (the particle follows directly).
    pub fn cleaned_content(&self) -> String {
        if self.syls.is_empty() {
            return String::new();
        }
        let mut cleaned = self.syls.join(&TSEK.to_string());
        if !(self.affix_host && !self.affix) {
            cleaned.push(TSEK);
        }
        cleaned
    }

    /// The unaffixed form without trailing tsek, falling back to the joined
    /// syllables when no affix was split off.
    pub fn unaffixed_content(&self) -> String {
        match self.text_unaffixed {
            Some(ref t) => t.trim_end_matches(TSEK).to_string(),
            None => self.syls.join(&TSEK.to_string()),
        }
    }

    /// Check if this is a word token (Text with syllables).
    pub fn is_word(&self) -> bool {
        self.chunk_type == ChunkKind::Text && !self.syls.is_empty()
    }

    /// Check if this is punctuation.
    pub fn is_punct(&self) -> bool {
        self.chunk_type == ChunkKind::Punct
    }

    /// Serialize to the JSON shape documented on the fields.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from [`Token::to_json`] output. Omitted fields come back
    /// as their defaults, so the round trip is exact.
    pub fn from_json(s: &str) -> serde_json::Result<Token> {
        serde_json::from_str(s)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "text: \"{}\"", self.text)?;
        if let Some(ref tc) = self.text_cleaned {
            writeln!(f, "text_cleaned: \"{}\"", tc)?;
        }
        if let Some(ref tu) = self.text_unaffixed {
            writeln!(f, "text_unaffixed: \"{}\"", tu)?;
        }
        if !self.syls.is_empty() {
            writeln!(f, "syls: {:?}", self.syls)?;
        }
        if let Some(ref pos) = self.pos {
            writeln!(f, "pos: {}", pos)?;
        }
        if let Some(ref lemma) = self.lemma {
            writeln!(f, "lemma: {}", lemma)?;
        }
        if !self.senses.is_empty() {
            let rendered: Vec<String> = self.senses.iter().map(|s| s.debug_string()).collect();
            writeln!(f, "senses: | {} |", rendered.join(" | "))?;
        }
        if !self.char_types.is_empty() {
            writeln!(f, "char_types: {:?}", self.char_types)?;
        }
        writeln!(f, "chunk_type: {}", self.chunk_type.as_str())?;
        if let Some(freq) = self.freq {
            writeln!(f, "freq: {}", freq)?;
        }
        if self.affix_host {
            writeln!(f, "affix_host: true")?;
        }
        if !self.syls_idx.is_empty() {
            writeln!(f, "syls_idx: {:?}", self.syls_idx)?;
        }
        if !self.syls_start_end.is_empty() {
            writeln!(f, "syls_start_end: {:?}", self.syls_start_end)?;
        }
        writeln!(f, "start: {}", self.start)?;
        write!(f, "len: {}", self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::with_text("བཀྲ་ཤིས".to_string(), 0, 7, ChunkKind::Text);
        assert_eq!(token.text, "བཀྲ་ཤིས");
        assert_eq!(token.start, 0);
        assert_eq!(token.len, 7);
        assert_eq!(token.chunk_type, ChunkKind::Text);
    }

    #[test]
    fn test_cleaned_content() {
        let mut token = Token::with_text("བཀྲ་ཤིས".to_string(), 0, 7, ChunkKind::Text);
        token.syls = vec!["བཀྲ".to_string(), "ཤིས".to_string()];
        assert_eq!(token.cleaned_content(), "བཀྲ་ཤིས་");

        token.affix_host = true;
        assert_eq!(token.cleaned_content(), "བཀྲ་ཤིས");
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let token = Token::with_text("།".to_string(), 7, 1, ChunkKind::Punct);
        let json = token.to_json().unwrap();
        assert!(json.contains("\"chunkType\""));
        assert!(json.contains("\"length\":1"));
        assert!(!json.contains("pos"));
        assert!(!json.contains("sanskrit"));
        assert!(!json.contains("syllables"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut token = Token::with_text("བཀྲ་ཤིས".to_string(), 0, 7, ChunkKind::Text);
        token.syls = vec!["བཀྲ".to_string(), "ཤིས".to_string()];
        token.syls_idx = vec![vec![0, 1, 2], vec![4, 5, 6]];
        token.syls_start_end = vec![(0, 3), (4, 7)];
        token.pos = Some("NOUN".to_string());
        token.freq = Some(1000);
        token.skrt = true;
        token.senses.push(Sense {
            pos: Some("NOUN".to_string()),
            freq: Some(1000),
            affixed: Some(false),
            ..Default::default()
        });

        let json = token.to_json().unwrap();
        let back = Token::from_json(&json).unwrap();
        assert_eq!(token, back);
    }

    #[test]
    fn test_sense_populated() {
        let sense = Sense {
            pos: Some("NOUN".to_string()),
            lemma: Some("ལ་".to_string()),
            affixed: Some(true),
            ..Default::default()
        };
        assert_eq!(sense.populated(), 2);
    }

    #[test]
    fn test_display_shape() {
        let mut token = Token::with_text("བཀྲ་ཤིས".to_string(), 0, 7, ChunkKind::Text);
        token.pos = Some("NOUN".to_string());
        token.senses.push(Sense {
            pos: Some("NOUN".to_string()),
            freq: Some(12),
            ..Default::default()
        });
        let repr = format!("{}", token);
        assert!(repr.starts_with("text: \"བཀྲ་ཤིས\""));
        assert!(repr.contains("pos: NOUN"));
        assert!(repr.contains("senses: | pos: NOUN, freq: 12 |"));
        assert!(repr.contains("chunk_type: TEXT"));
        assert!(repr.ends_with("len: 7"));
    }
}
