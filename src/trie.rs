//! Trie over syllable sequences for dictionary-based tokenization.
//!
//! Words are keyed by their ordered syllables. A node is a word iff its
//! `leaf` flag is set; [`Trie::deactivate`] clears the flag without removing
//! structure, so deactivation is reversible. Node payloads are typed
//! [`NodeData`] records; merging incoming data is routed through
//! [`NodeData::add_meaning`] so repeated loads stay idempotent.
//!
//! ## Auto-inflection
//!
//! [`TrieBuilder`] can generate every affixed surface form of each loaded
//! word (particles like འི, ས, ར attach directly to the last syllable),
//! which is how affixed forms in running text are recognized.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::TokenizerError;
use crate::syllable::{AffixData, SylComponents, TSEK};
use crate::token::{AffixInfo, Sense};

/// Data attached to a word in the trie.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// The senses of this entry (homographs)
    pub senses: Vec<Sense>,
    /// Frequency of the surface form itself
    pub form_freq: Option<u32>,
    /// Affixation metadata when this entry is an affixed surface form
    pub affixation: Option<AffixInfo>,
    /// Whether this entry is a Sanskrit word
    pub skrt: bool,
}

impl NodeData {
    /// Append `new` unless an equal sense is already present. Equality is
    /// over the full `(pos, lemma, freq, sense, affixed)` tuple. Returns
    /// true when the sense was appended.
    pub fn add_meaning(&mut self, new: Sense) -> bool {
        if self.senses.contains(&new) {
            return false;
        }
        self.senses.push(new);
        true
    }

    /// Merge another payload into this one: senses are routed through
    /// [`NodeData::add_meaning`], the remaining fields are copied when the
    /// incoming record carries them.
    pub fn merge(&mut self, other: NodeData) {
        for sense in other.senses {
            self.add_meaning(sense);
        }
        if other.form_freq.is_some() {
            self.form_freq = other.form_freq;
        }
        if other.affixation.is_some() {
            self.affixation = other.affixation;
        }
        self.skrt |= other.skrt;
    }
}

/// A single update routed to an existing word by [`Trie::add_data`].
#[derive(Debug, Clone)]
pub enum NodeUpdate {
    /// Set the surface-form frequency
    FormFreq(u32),
    /// Add one sense
    Meaning(Sense),
    /// Merge a full payload
    Data(NodeData),
}

/// A node in the trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    /// Children, keyed by syllable
    children: HashMap<String, TrieNode>,
    /// Whether the path to this node spells a complete, active word
    leaf: bool,
    /// Payload for the word ending here
    data: NodeData,
}

impl TrieNode {
    /// Create a new empty node.
    pub fn new() -> Self {
        TrieNode::default()
    }

    /// Check if this node has any children.
    pub fn can_walk(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this node ends an active word.
    pub fn is_match(&self) -> bool {
        self.leaf
    }

    /// The payload of this node.
    pub fn data(&self) -> &NodeData {
        &self.data
    }
}

/// A trie of Tibetan words keyed by syllable sequences.
#[derive(Debug, Default, Clone)]
pub struct Trie {
    root: TrieNode,
    word_count: usize,
}

impl Trie {
    /// Create a new empty trie.
    pub fn new() -> Self {
        Trie::default()
    }

    /// Number of active words.
    pub fn len(&self) -> usize {
        self.word_count
    }

    /// Check if the trie holds no active words.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Drop every word and payload.
    pub fn clear(&mut self) {
        self.root = TrieNode::new();
        self.word_count = 0;
    }

    /// Add a word (as a slice of syllables), marking its terminal node
    /// active and merging the payload if one is given.
    pub fn add(&mut self, syls: &[&str], data: Option<NodeData>) {
        if syls.is_empty() {
            return;
        }

        let mut current = &mut self.root;
        for syl in syls {
            current = current
                .children
                .entry(syl.to_string())
                .or_insert_with(TrieNode::new);
        }

        if !current.leaf {
            self.word_count += 1;
        }
        current.leaf = true;

        if let Some(d) = data {
            current.data.merge(d);
        }
    }

    /// Add a word given as a tsek-separated string.
    pub fn add_word(&mut self, word: &str, data: Option<NodeData>) {
        let syls: Vec<&str> = word.split(TSEK).filter(|s| !s.is_empty()).collect();
        self.add(&syls, data);
    }

    /// Walk the trie by one syllable. With no `from` node the step starts at
    /// the root.
    pub fn walk<'a>(&'a self, syl: &str, from: Option<&'a TrieNode>) -> Option<&'a TrieNode> {
        let node = from.unwrap_or(&self.root);
        node.children.get(syl)
    }

    /// Check if a word is present and active, returning its payload.
    pub fn has_word(&self, syls: &[&str]) -> Result<(bool, Option<&NodeData>), TokenizerError> {
        let node = self.find_node(syls)?;
        match node {
            Some(n) if n.leaf => Ok((true, Some(&n.data))),
            _ => Ok((false, None)),
        }
    }

    /// Route an update to an existing active word. Returns `Ok(false)` when
    /// the word is missing or inactive, or when an identical sense was
    /// already present.
    pub fn add_data(&mut self, syls: &[&str], update: NodeUpdate) -> Result<bool, TokenizerError> {
        if syls.is_empty() {
            return Err(TokenizerError::EmptyWord);
        }

        let mut current = &mut self.root;
        for syl in syls {
            match current.children.get_mut(*syl) {
                Some(node) => current = node,
                None => return Ok(false),
            }
        }
        if !current.leaf {
            return Ok(false);
        }

        Ok(match update {
            NodeUpdate::FormFreq(freq) => {
                current.data.form_freq = Some(freq);
                true
            }
            NodeUpdate::Meaning(sense) => current.data.add_meaning(sense),
            NodeUpdate::Data(data) => {
                current.data.merge(data);
                true
            }
        })
    }

    /// Toggle a word's active flag without removing structure. The forward
    /// direction deactivates; `reverse` restores. Returns `Ok(false)` when
    /// there is nothing to toggle.
    pub fn deactivate(&mut self, syls: &[&str], reverse: bool) -> Result<bool, TokenizerError> {
        if syls.is_empty() {
            return Err(TokenizerError::EmptyWord);
        }

        let mut current = &mut self.root;
        for syl in syls {
            match current.children.get_mut(*syl) {
                Some(node) => current = node,
                None => return Ok(false),
            }
        }

        if reverse {
            if !current.leaf {
                current.leaf = true;
                self.word_count += 1;
            }
            Ok(true)
        } else if current.leaf {
            current.leaf = false;
            self.word_count -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// The root node, for external traversal.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    fn find_node(&self, syls: &[&str]) -> Result<Option<&TrieNode>, TokenizerError> {
        if syls.is_empty() {
            return Err(TokenizerError::EmptyWord);
        }
        let mut current = &self.root;
        for syl in syls {
            match current.children.get(*syl) {
                Some(node) => current = node,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

/// Builder loading a [`Trie`] from TSV word lists.
///
/// TSV rows are `form<TAB>pos<TAB>lemma<TAB>sense<TAB>freq`; blank lines and
/// `#` comments are skipped. With inflection enabled, every affixed surface
/// form of each word is generated and added alongside the base form.
pub struct TrieBuilder {
    trie: Trie,
    syl_components: SylComponents,
    inflect: bool,
    inflection_cache: HashMap<String, Vec<(Vec<String>, Option<AffixData>)>>,
}

impl TrieBuilder {
    /// Create a builder with inflection disabled.
    pub fn new() -> Self {
        TrieBuilder {
            trie: Trie::new(),
            syl_components: SylComponents::new(),
            inflect: false,
            inflection_cache: HashMap::new(),
        }
    }

    /// Create a builder with inflection enabled.
    pub fn with_inflection() -> Self {
        let mut builder = Self::new();
        builder.inflect = true;
        builder
    }

    /// Enable or disable auto-inflection.
    pub fn set_inflection(&mut self, enable: bool) -> &mut Self {
        self.inflect = enable;
        self
    }

    /// All inflected forms of a word: the base form first (no affix data),
    /// then one entry per affixed form of the last syllable.
    fn get_inflected(&mut self, word: &str) -> Vec<(Vec<String>, Option<AffixData>)> {
        if let Some(cached) = self.inflection_cache.get(word) {
            return cached.clone();
        }

        let syls: Vec<String> = word
            .split(TSEK)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        if syls.is_empty() {
            return vec![];
        }

        let mut inflected = vec![(syls.clone(), None)];
        if let Some(last_syl) = syls.last() {
            if let Some(affixed) = self.syl_components.get_all_affixed(last_syl) {
                for (affixed_syl, affix_data) in affixed {
                    let mut word_syls = syls[..syls.len() - 1].to_vec();
                    word_syls.push(affixed_syl);
                    inflected.push((word_syls, Some(affix_data)));
                }
            }
        }

        self.inflection_cache.insert(word.to_string(), inflected.clone());
        inflected
    }

    /// Load words from a TSV string.
    pub fn load_tsv(&mut self, tsv_content: &str) {
        for line in tsv_content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();
            let form = parts[0];
            if form.is_empty() {
                continue;
            }
            let pos = parts.get(1).filter(|s| !s.is_empty()).map(|s| s.to_string());
            let lemma = parts.get(2).filter(|s| !s.is_empty()).map(|s| s.to_string());
            let sense_label = parts.get(3).filter(|s| !s.is_empty()).map(|s| s.to_string());
            let freq = parts.get(4).and_then(|s| s.trim().parse::<u32>().ok());

            if self.inflect {
                for (syls, affix_data) in self.get_inflected(form) {
                    let is_affixed = affix_data.is_some();
                    let data = NodeData {
                        senses: vec![Sense {
                            pos: pos.clone(),
                            lemma: lemma.clone(),
                            freq,
                            sense: sense_label.clone(),
                            affixed: Some(is_affixed),
                        }],
                        form_freq: freq,
                        affixation: affix_data.map(|a| AffixInfo {
                            len: a.len,
                            affix_type: a.affix_type,
                            aa: a.aa,
                        }),
                        skrt: false,
                    };
                    let refs: Vec<&str> = syls.iter().map(|s| s.as_str()).collect();
                    self.trie.add(&refs, Some(data));
                }
            } else {
                let data = NodeData {
                    senses: vec![Sense {
                        pos: pos.clone(),
                        lemma: lemma.clone(),
                        freq,
                        sense: sense_label.clone(),
                        affixed: None,
                    }],
                    form_freq: freq,
                    affixation: None,
                    skrt: false,
                };
                self.trie.add_word(form, Some(data));
            }
        }

        debug!(words = self.trie.len(), "loaded tsv word list");
    }

    /// Add a word and, when inflection is on, all its affixed forms.
    pub fn add_inflected_word(&mut self, word: &str, data: Option<NodeData>) {
        if self.inflect {
            for (syls, affix_data) in self.get_inflected(word) {
                let mut word_data = data.clone().unwrap_or_default();
                word_data.affixation = affix_data.map(|a| AffixInfo {
                    len: a.len,
                    affix_type: a.affix_type,
                    aa: a.aa,
                });
                let refs: Vec<&str> = syls.iter().map(|s| s.as_str()).collect();
                self.trie.add(&refs, Some(word_data));
            }
        } else {
            self.trie.add_word(word, data);
        }
    }

    /// Deactivate a word and, when inflection is on, all its affixed forms.
    pub fn deactivate_inflected_word(&mut self, word: &str) -> Result<(), TokenizerError> {
        if self.inflect {
            for (syls, _) in self.get_inflected(word) {
                let refs: Vec<&str> = syls.iter().map(|s| s.as_str()).collect();
                self.trie.deactivate(&refs, false)?;
            }
        } else {
            let syls: Vec<&str> = word.split(TSEK).filter(|s| !s.is_empty()).collect();
            self.trie.deactivate(&syls, false)?;
        }
        Ok(())
    }

    /// Build and return the trie.
    pub fn build(self) -> Trie {
        self.trie
    }

    /// A view of the trie under construction.
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Mutable access to the trie under construction.
    pub fn trie_mut(&mut self) -> &mut Trie {
        &mut self.trie
    }
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}
