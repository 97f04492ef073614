//! # tibtok
//!
//! A fast dictionary-based Tibetan word tokenizer.
//!
//! Text is classified per codepoint, segmented into chunks and syllables,
//! and matched against a syllable-keyed trie using longest match with
//! backtracking. Matched words carry the dictionary senses of their entry;
//! affixed forms are split into host and particle, and every word receives
//! a tsek-terminated lemma.
//!
//! ## Quick Start
//!
//! ```rust
//! use tibtok::{Tokenizer, TrieBuilder};
//!
//! // Build a trie from TSV data (form, pos, lemma, sense, freq)
//! let tsv = "བཀྲ་ཤིས\tNOUN\t\t\t1000\nབདེ་ལེགས\tNOUN\t\t\t500";
//! let mut builder = TrieBuilder::new();
//! builder.load_tsv(tsv);
//! let trie = builder.build();
//!
//! // Create a tokenizer and tokenize text
//! let tokenizer = Tokenizer::new(trie);
//! let tokens = tokenizer.tokenize("བཀྲ་ཤིས་བདེ་ལེགས།");
//!
//! for token in &tokens {
//!     println!("{}: {:?}", token.text, token.pos);
//! }
//! ```
//!
//! ## Simple Tokenization (No Dictionary)
//!
//! If you just need syllable-level tokenization without a dictionary:
//!
//! ```rust
//! use tibtok::SimpleTokenizer;
//!
//! let tokens = SimpleTokenizer::tokenize("བཀྲ་ཤིས་བདེ་ལེགས།");
//! for token in &tokens {
//!     println!("{}", token.text);
//! }
//! ```

pub mod char_categories;
pub mod chunker;
pub mod errors;
pub mod modifiers;
pub mod resources;
pub mod syllable;
pub mod token;
pub mod tokenizer;
pub mod trie;

// Re-export main types for convenience
pub use char_categories::{get_char_category, BoString, CharCategory, CharClassifier};
pub use chunker::{Chunk, ChunkFrame, ChunkFrameEntry, ChunkFramework, ChunkKind};
pub use errors::TokenizerError;
pub use token::{AffixInfo, Sense, Token, NO_POS, NON_WORD, PART};
pub use tokenizer::{SimpleTokenizer, Tokenizer};
pub use trie::{NodeData, NodeUpdate, Trie, TrieBuilder, TrieNode};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
