//! Chunking and syllabification for Tibetan text.
//!
//! The chunk framework turns a classified string into labeled, non-overlapping
//! runs of codepoints, then into the [`ChunkFrame`] consumed by the tokenizer.
//! Chunkings are small label-parametric passes composed with [`ChunkFramework::pipe_chunk`]:
//! Tibetan text is separated from foreign runs first, then punctuation,
//! numbers and symbols are refined out of the Tibetan runs, Latin and CJK out
//! of the rest.

use serde::{Deserialize, Serialize};

use crate::char_categories::{BoString, CharCategory};

/// Label attached to a run of codepoints by one chunking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChunkKind {
    /// Tibetan syllable text
    #[default]
    Text,
    /// Punctuation
    Punct,
    /// Not Tibetan
    NonBo,
    /// Not punctuation
    NonPunct,
    /// Number
    Num,
    /// Not a number
    NonNum,
    /// Symbol
    Sym,
    /// Not a symbol
    NonSym,
    /// Tibetan run, not yet syllabified
    Bo,
    /// Other/unknown
    Other,
    /// Latin text
    Latin,
    /// CJK text
    Cjk,
}

impl ChunkKind {
    /// String representation, total over all variants.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Text => "TEXT",
            ChunkKind::Punct => "PUNCT",
            ChunkKind::NonBo => "NON_BO",
            ChunkKind::NonPunct => "NON_PUNCT",
            ChunkKind::Num => "NUM",
            ChunkKind::NonNum => "NON_NUM",
            ChunkKind::Sym => "SYM",
            ChunkKind::NonSym => "NON_SYM",
            ChunkKind::Bo => "BO",
            ChunkKind::Other => "OTHER",
            ChunkKind::Latin => "LATIN",
            ChunkKind::Cjk => "CJK",
        }
    }
}

/// A labeled run of codepoints. `start` and `len` are codepoint units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// The label of this run
    pub kind: ChunkKind,
    /// Starting codepoint offset in the original string
    pub start: usize,
    /// Length in codepoints
    pub len: usize,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(kind: ChunkKind, start: usize, len: usize) -> Self {
        Chunk { kind, start, len }
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// One entry of the frame served to the tokenizer.
///
/// `syl_indices` is `Some` for Tibetan syllables eligible for trie walking
/// (holding the absolute codepoint offsets of the syllable's characters) and
/// `None` for segments that pass through as standalone tokens.
#[derive(Debug, Clone)]
pub struct ChunkFrameEntry {
    /// Codepoint offsets of the syllable characters, absolute, in order
    pub syl_indices: Option<Vec<usize>>,
    /// The covered run
    pub meta: Chunk,
}

/// Ordered sequence of frame entries covering the tokenizable input.
pub type ChunkFrame = Vec<ChunkFrameEntry>;

/// Syllable separators that are not the tsek category: rnam bcad (ཿ) and the
/// long-vowel sign (ཱ), both used as boundaries in transliterated Sanskrit.
const NAMCHE: char = '\u{0F7F}';
const LONG_VOW: char = '\u{0F71}';

/// Chunker over one analyzed string.
pub struct ChunkFramework {
    bs: BoString,
}

impl ChunkFramework {
    /// Create a chunker for an already-analyzed string.
    pub fn new(bs: BoString) -> Self {
        ChunkFramework { bs }
    }

    /// The analyzed string.
    pub fn bo_string(&self) -> &BoString {
        &self.bs
    }

    /// The original string.
    pub fn string(&self) -> &str {
        &self.bs.string
    }

    /// Scan `[start, end)` and emit maximal runs labeled `yes` where the
    /// predicate holds and `no` where it does not.
    pub fn chunk_using<P>(&self, pred: P, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk>
    where
        P: Fn(usize) -> bool,
    {
        let end = end.min(self.bs.len());
        let mut chunks = Vec::new();
        if start >= end {
            return chunks;
        }

        let mut run_start = start;
        let mut run_matches = pred(start);
        for i in start + 1..end {
            let matches = pred(i);
            if matches != run_matches {
                let kind = if run_matches { yes } else { no };
                chunks.push(Chunk::new(kind, run_start, i - run_start));
                run_start = i;
                run_matches = matches;
            }
        }
        let kind = if run_matches { yes } else { no };
        chunks.push(Chunk::new(kind, run_start, end - run_start));

        chunks
    }

    /// Separate Tibetan-family runs from foreign ones.
    pub fn chunk_bo_text(&self, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
        self.chunk_using(|i| self.bs.categories[i].is_tibetan(), start, end, yes, no)
    }

    /// Separate punctuation runs.
    ///
    /// A tsek or transparent codepoint counts as punctuation only when the
    /// codepoint before it (in the whole string) already belongs to a
    /// non-word run, so trailing separators fold onto preceding punctuation,
    /// numbers or symbols instead of onto the next word. A codepoint at
    /// offset 0 has nothing to attach to and counts as punctuation.
    pub fn chunk_punctuation(&self, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
        self.chunk_using(|i| self.is_punct_at(i), start, end, yes, no)
    }

    fn is_punct_at(&self, i: usize) -> bool {
        match self.bs.categories[i] {
            CharCategory::NormalPunct | CharCategory::SpecialPunct => true,
            CharCategory::Tsek | CharCategory::Transparent => {
                if i == 0 {
                    return true;
                }
                matches!(
                    self.bs.categories[i - 1],
                    CharCategory::Symbol
                        | CharCategory::Numeral
                        | CharCategory::Other
                        | CharCategory::NormalPunct
                        | CharCategory::SpecialPunct
                        | CharCategory::Tsek
                        | CharCategory::Transparent
                )
            }
            _ => false,
        }
    }

    /// Separate numeral runs.
    pub fn chunk_numbers(&self, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
        self.chunk_using(
            |i| {
                matches!(
                    self.bs.categories[i],
                    CharCategory::Numeral | CharCategory::Transparent
                )
            },
            start,
            end,
            yes,
            no,
        )
    }

    /// Separate symbol runs.
    pub fn chunk_symbols(&self, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
        self.chunk_using(
            |i| {
                matches!(
                    self.bs.categories[i],
                    CharCategory::Symbol | CharCategory::Transparent | CharCategory::Nfc
                )
            },
            start,
            end,
            yes,
            no,
        )
    }

    /// Separate Latin runs.
    pub fn chunk_latin(&self, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
        self.chunk_using(
            |i| {
                matches!(
                    self.bs.categories[i],
                    CharCategory::Latin | CharCategory::Transparent
                )
            },
            start,
            end,
            yes,
            no,
        )
    }

    /// Separate CJK runs.
    pub fn chunk_cjk(&self, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
        self.chunk_using(
            |i| {
                matches!(
                    self.bs.categories[i],
                    CharCategory::Cjk | CharCategory::Transparent
                )
            },
            start,
            end,
            yes,
            no,
        )
    }

    /// Separate space runs (used by `spaces_as_punct`).
    pub fn chunk_spaces(&self, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
        self.chunk_using(
            |i| self.bs.categories[i] == CharCategory::Transparent,
            start,
            end,
            yes,
            no,
        )
    }

    /// Replace every `target` entry of `prev` with the chunker's output over
    /// that span; all other entries pass through unchanged.
    pub fn pipe_chunk<F>(&self, prev: Vec<Chunk>, target: ChunkKind, chunker: F) -> Vec<Chunk>
    where
        F: Fn(usize, usize) -> Vec<Chunk>,
    {
        let mut out = Vec::with_capacity(prev.len());
        for chunk in prev {
            if chunk.kind == target {
                out.extend(chunker(chunk.start, chunk.end()));
            } else {
                out.push(chunk);
            }
        }
        out
    }

    /// Split a Tibetan run into syllables.
    ///
    /// Separators are codepoints classified tsek plus the rnam bcad and
    /// long-vowel signs by value; they belong to no syllable. Empty
    /// syllables between adjacent separators are dropped.
    pub fn syllabify(&self, start: usize, end: usize) -> Vec<Vec<usize>> {
        let end = end.min(self.bs.len());
        let mut syls = Vec::new();
        let mut current: Vec<usize> = Vec::new();

        for i in start..end {
            let is_sep = self.bs.categories[i] == CharCategory::Tsek
                || self.bs.chars[i] == NAMCHE
                || self.bs.chars[i] == LONG_VOW;
            if is_sep {
                if !current.is_empty() {
                    syls.push(std::mem::take(&mut current));
                }
            } else {
                current.push(i);
            }
        }
        if !current.is_empty() {
            syls.push(current);
        }

        syls
    }

    /// Assemble the frame served to the tokenizer.
    ///
    /// Tibetan runs are isolated, refined (punctuation, numbers, symbols out
    /// of Tibetan; Latin and CJK out of the rest) and syllabified; every
    /// non-Tibetan run becomes one pass-through entry. With
    /// `spaces_as_punct`, space runs are cut out first and served as
    /// punctuation instead of folding into neighboring runs.
    pub fn serve_syls_to_trie(&self, spaces_as_punct: bool) -> ChunkFrame {
        let n = self.bs.len();
        if n == 0 {
            return Vec::new();
        }

        let mut chunks = if spaces_as_punct {
            let spaced = self.chunk_spaces(0, n, ChunkKind::Punct, ChunkKind::NonPunct);
            self.pipe_chunk(spaced, ChunkKind::NonPunct, |s, e| {
                self.chunk_bo_text(s, e, ChunkKind::Bo, ChunkKind::NonBo)
            })
        } else {
            self.chunk_bo_text(0, n, ChunkKind::Bo, ChunkKind::NonBo)
        };

        // Tibetan punctuation lives inside Bo runs; separator folding applies
        // to foreign runs as well.
        chunks = self.pipe_chunk(chunks, ChunkKind::Bo, |s, e| {
            self.chunk_punctuation(s, e, ChunkKind::Punct, ChunkKind::Bo)
        });
        chunks = self.pipe_chunk(chunks, ChunkKind::NonBo, |s, e| {
            self.chunk_punctuation(s, e, ChunkKind::Punct, ChunkKind::NonBo)
        });
        chunks = self.pipe_chunk(chunks, ChunkKind::Bo, |s, e| {
            self.chunk_numbers(s, e, ChunkKind::Num, ChunkKind::Bo)
        });
        chunks = self.pipe_chunk(chunks, ChunkKind::Bo, |s, e| {
            self.chunk_symbols(s, e, ChunkKind::Sym, ChunkKind::Bo)
        });
        chunks = self.pipe_chunk(chunks, ChunkKind::NonBo, |s, e| {
            self.chunk_latin(s, e, ChunkKind::Latin, ChunkKind::NonBo)
        });
        chunks = self.pipe_chunk(chunks, ChunkKind::NonBo, |s, e| {
            self.chunk_cjk(s, e, ChunkKind::Cjk, ChunkKind::Other)
        });

        let mut frame = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            if chunk.kind == ChunkKind::Bo {
                for syl in self.syllabify(chunk.start, chunk.end()) {
                    let start = syl[0];
                    let len = syl.last().unwrap() + 1 - start;
                    frame.push(ChunkFrameEntry {
                        syl_indices: Some(syl),
                        meta: Chunk::new(ChunkKind::Text, start, len),
                    });
                }
            } else {
                frame.push(ChunkFrameEntry {
                    syl_indices: None,
                    meta: chunk,
                });
            }
        }

        frame
    }

    /// The syllable string of a frame entry, or `None` for pass-through
    /// entries.
    pub fn syl_string(&self, entry: &ChunkFrameEntry) -> Option<String> {
        entry
            .syl_indices
            .as_ref()
            .map(|idxs| idxs.iter().map(|&i| self.bs.chars[i]).collect())
    }
}
