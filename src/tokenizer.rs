//! The tokenizer: longest-match over the chunk frame with backtracking.
//!
//! The engine consumes the frame produced by
//! [`ChunkFramework::serve_syls_to_trie`] and walks the trie syllable by
//! syllable. Every leaf reached during a walk is recorded; when the walk dead
//! ends, the longest recorded match is committed and the cursor resumes right
//! after it. A walk that never reaches a leaf emits its first syllable as a
//! non-word token and retries from the following entry, so every syllable
//! gets an attempt as a fresh starting point.

use std::sync::Arc;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::char_categories::{BoString, CharClassifier};
use crate::chunker::{ChunkFrame, ChunkFrameEntry, ChunkFramework, ChunkKind};
use crate::modifiers::apply_all_finalizers;
use crate::token::{Sense, Token, NO_POS};
use crate::trie::{NodeData, Trie, TrieNode};

/// Surface sequences marking Sanskrit syllables (long vowels and vocalic r).
const SKRT_SEQUENCES: &[&str] = &["ཱི", "ཱུ", "ྲྀ"];

/// The main dictionary-based tokenizer.
pub struct Tokenizer {
    /// The dictionary trie, shared read-only across calls
    trie: Arc<Trie>,
    /// Classifier carrying the caller's ignore set
    classifier: CharClassifier,
}

impl Tokenizer {
    /// Create a tokenizer owning the given trie.
    pub fn new(trie: Trie) -> Self {
        Tokenizer {
            trie: Arc::new(trie),
            classifier: CharClassifier::new(),
        }
    }

    /// Create a tokenizer over a shared trie.
    pub fn with_arc(trie: Arc<Trie>) -> Self {
        Tokenizer {
            trie,
            classifier: CharClassifier::new(),
        }
    }

    /// Create a tokenizer that treats the given characters as transparent.
    pub fn with_ignore_chars<I: IntoIterator<Item = char>>(trie: Trie, chars: I) -> Self {
        Tokenizer {
            trie: Arc::new(trie),
            classifier: CharClassifier::with_ignore_chars(chars),
        }
    }

    /// The dictionary trie.
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// A shareable handle on the trie.
    pub fn trie_arc(&self) -> Arc<Trie> {
        Arc::clone(&self.trie)
    }

    /// Tokenize with default options (affix splitting on).
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.tokenize_with_full_options(text, true, false, false)
    }

    /// Tokenize with configurable affix splitting.
    pub fn tokenize_with_options(&self, text: &str, split_affixes: bool) -> Vec<Token> {
        self.tokenize_with_full_options(text, split_affixes, false, false)
    }

    /// Tokenize with every option explicit. `spaces_as_punct` serves space
    /// runs as standalone punctuation tokens; `debug` logs the chunk frame
    /// and each emitted token at debug level.
    pub fn tokenize_with_full_options(
        &self,
        text: &str,
        split_affixes: bool,
        spaces_as_punct: bool,
        debug: bool,
    ) -> Vec<Token> {
        let normalized: String = text.nfc().collect();
        let bs = BoString::with_classifier(&normalized, &self.classifier);
        let cf = ChunkFramework::new(bs);
        let frame = cf.serve_syls_to_trie(spaces_as_punct);

        if debug {
            for entry in &frame {
                debug!(
                    kind = entry.meta.kind.as_str(),
                    start = entry.meta.start,
                    len = entry.meta.len,
                    syl = entry.syl_indices.is_some(),
                    "frame entry"
                );
            }
        }

        let mut tokens = self.tokenize_frame(&cf, &frame);
        apply_all_finalizers(&mut tokens, split_affixes);

        if debug {
            for token in &tokens {
                debug!(text = %token.text, pos = token.pos.as_deref().unwrap_or(""), "token");
            }
        }

        tokens
    }

    /// Tokenize without any finalization (no affix splitting, no lemmas, no
    /// sense selection).
    pub fn tokenize_raw(&self, text: &str) -> Vec<Token> {
        let normalized: String = text.nfc().collect();
        let bs = BoString::with_classifier(&normalized, &self.classifier);
        let cf = ChunkFramework::new(bs);
        let frame = cf.serve_syls_to_trie(false);
        self.tokenize_frame(&cf, &frame)
    }

    /// Run the match engine over a prepared frame.
    pub fn tokenize_frame(&self, cf: &ChunkFramework, frame: &ChunkFrame) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut c_idx = 0;

        while c_idx < frame.len() {
            if frame[c_idx].syl_indices.is_none() {
                tokens.push(self.passthrough_token(cf, &frame[c_idx]));
                c_idx += 1;
                continue;
            }

            // Walk the trie from c_idx, recording every leaf reached. The
            // last recorded entry is always the longest.
            let mut walker = c_idx;
            let mut current: Option<&TrieNode> = None;
            let mut matches: Vec<(usize, &NodeData)> = Vec::new();

            while walker < frame.len() {
                let syl = match cf.syl_string(&frame[walker]) {
                    Some(s) => s,
                    None => break,
                };
                match self.trie.walk(&syl, current) {
                    Some(node) => {
                        current = Some(node);
                        if node.is_match() {
                            matches.push((walker, node.data()));
                        }
                        walker += 1;
                    }
                    None => break,
                }
            }

            if let Some(&(end_idx, data)) = matches.last() {
                // Commit the longest match; anything walked past it is
                // retried on the next outer iteration.
                tokens.push(self.word_token(cf, frame, c_idx, end_idx, Some(data)));
                c_idx = end_idx + 1;
            } else {
                // No leaf seen: the first syllable becomes a non-word and
                // the ones after it get a fresh start.
                tokens.push(self.non_word_token(cf, frame, c_idx));
                c_idx += 1;
            }
        }

        tokens
    }

    /// Build a pass-through token for a non-syllable frame entry.
    fn passthrough_token(&self, cf: &ChunkFramework, entry: &ChunkFrameEntry) -> Token {
        let bs = cf.bo_string();
        let meta = entry.meta;
        let mut token = Token::with_text(
            bs.substring(meta.start, meta.len),
            meta.start,
            meta.len,
            meta.kind,
        );
        token.char_types = bs.get_categories(meta.start, meta.len).to_vec();
        token
    }

    /// Build a word token covering the syllable entries `[first, last]`.
    ///
    /// The span runs from the first syllable's first codepoint to the last
    /// syllable's last codepoint; separators between syllables fall inside
    /// the span, those before and after it do not.
    fn word_token(
        &self,
        cf: &ChunkFramework,
        frame: &ChunkFrame,
        first: usize,
        last: usize,
        data: Option<&NodeData>,
    ) -> Token {
        let bs = cf.bo_string();
        let start = frame[first].meta.start;
        let end = frame[last].meta.end();
        let len = end - start;

        let mut token = Token::with_text(bs.substring(start, len), start, len, ChunkKind::Text);
        token.char_types = bs.get_categories(start, len).to_vec();

        for entry in &frame[first..=last] {
            let idxs = entry
                .syl_indices
                .as_ref()
                .expect("word tokens cover only syllable entries");
            token.syls.push(idxs.iter().map(|&i| bs.chars[i]).collect());
            token.syls_idx.push(idxs.iter().map(|&i| i - start).collect());
            token
                .syls_start_end
                .push((entry.meta.start - start, entry.meta.end() - start));
        }

        if let Some(data) = data {
            token.senses = data.senses.clone();
            token.freq = data.form_freq;
            token.affixation = data.affixation.clone();
            token.skrt = data.skrt;
        }
        token.skrt = token.skrt || has_sanskrit(&token);

        token
    }

    /// Build a single-syllable non-word token.
    fn non_word_token(&self, cf: &ChunkFramework, frame: &ChunkFrame, idx: usize) -> Token {
        let mut token = self.word_token(cf, frame, idx, idx, None);
        token.pos = Some(NO_POS.to_string());
        token.senses = vec![Sense {
            pos: Some(NO_POS.to_string()),
            ..Default::default()
        }];
        token
    }
}

fn has_sanskrit(token: &Token) -> bool {
    token.char_types.iter().any(|c| c.is_sanskrit())
        || SKRT_SEQUENCES.iter().any(|s| token.text.contains(s))
}

/// A tokenizer that uses no dictionary: one token per frame entry.
pub struct SimpleTokenizer;

impl SimpleTokenizer {
    /// Tokenize text into raw syllables and pass-through segments.
    pub fn tokenize(text: &str) -> Vec<Token> {
        let normalized: String = text.nfc().collect();
        let bs = BoString::new(&normalized);
        let cf = ChunkFramework::new(bs);
        let frame = cf.serve_syls_to_trie(false);

        frame
            .iter()
            .map(|entry| {
                let bs = cf.bo_string();
                let meta = entry.meta;
                let mut token = Token::with_text(
                    bs.substring(meta.start, meta.len),
                    meta.start,
                    meta.len,
                    meta.kind,
                );
                token.char_types = bs.get_categories(meta.start, meta.len).to_vec();
                if let Some(ref idxs) = entry.syl_indices {
                    token.syls.push(idxs.iter().map(|&i| bs.chars[i]).collect());
                    token.syls_idx.push(idxs.iter().map(|&i| i - meta.start).collect());
                    token.syls_start_end.push((0, meta.len));
                }
                token
            })
            .collect()
    }
}
