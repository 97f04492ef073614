//! Token finalization: affix splitting, lemma assignment, sense selection.
//!
//! These passes rewrite the token list in place after the match engine has
//! run. Affixed surface forms recognized through the trie are split into a
//! host and a particle; free-standing particle syllables are marked against
//! their host; default lemmas are written into senses; and one sense is
//! chosen per token to populate `pos`/`lemma`/`freq`.

use crate::chunker::ChunkKind;
use crate::syllable::{is_dagdra, is_particle, PART_LEMMAS};
use crate::token::{Sense, Token, NO_POS, NON_WORD, PART, TSEK};

/// Split affixed tokens and mark particle/host pairs.
///
/// A token carrying affixation metadata from the dictionary is split at the
/// affix boundary unless one of its senses explicitly describes the
/// non-affixed reading. A token that is nothing but a particle surface form
/// right after a word is marked as that word's affix without splitting.
/// Unknown affixes leave tokens untouched.
pub fn split_affixed(tokens: &mut Vec<Token>) {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].chunk_type != ChunkKind::Text || tokens[i].syls.is_empty() {
            i += 1;
            continue;
        }

        let splittable = match tokens[i].affixation {
            Some(ref affixation) => {
                let explicitly_unaffixed = tokens[i]
                    .senses
                    .iter()
                    .any(|s| s.affixed == Some(false));
                let last_syl_len = tokens[i]
                    .syls
                    .last()
                    .map(|s| s.chars().count())
                    .unwrap_or(0);
                !explicitly_unaffixed && last_syl_len > affixation.len
            }
            None => false,
        };

        if splittable {
            let affix_len = tokens[i].affixation.as_ref().unwrap().len;
            let (host, particle) = split_token_at_affix(&tokens[i], affix_len);
            tokens[i] = host;
            tokens.insert(i + 1, particle);
            i += 1; // skip the particle just inserted
        } else if is_free_particle(&tokens[i]) && i > 0 && tokens[i - 1].is_word() {
            mark_particle(&mut tokens[i]);
            tokens[i - 1].affix_host = true;
        }

        i += 1;
    }
}

/// A token qualifies as a free-standing particle when its whole text is one
/// of the particle surface forms and the engine found no dictionary entry
/// for it. Only the explicit markers count: a fresh dictionary match still
/// has `pos` unset here (sense selection runs later), and its surface form
/// may coincide with a particle while being an independent word.
fn is_free_particle(token: &Token) -> bool {
    if token.syls.len() != 1 || !is_particle(&token.text) {
        return false;
    }
    matches!(token.pos.as_deref(), Some(NO_POS) | Some(PART))
}

fn mark_particle(token: &mut Token) {
    token.affix = true;
    token.pos = Some(PART.to_string());
    let only_placeholder = token
        .senses
        .iter()
        .all(|s| s.pos.as_deref() == Some(NO_POS));
    if token.senses.is_empty() || only_placeholder {
        token.senses = vec![Sense {
            pos: Some(PART.to_string()),
            affixed: Some(true),
            ..Default::default()
        }];
    }
}

/// Split a token at `affix_len` codepoints from its end.
fn split_token_at_affix(token: &Token, affix_len: usize) -> (Token, Token) {
    let split = token.len - affix_len;

    let host_text: String = token.text.chars().take(split).collect();
    let particle_text: String = token.text.chars().skip(split).collect();

    let mut host = Token::with_text(host_text.clone(), token.start, split, ChunkKind::Text);
    host.syls = token.syls[..token.syls.len() - 1].to_vec();
    let last_syl = token.syls.last().unwrap();
    let kept: String = last_syl
        .chars()
        .take(last_syl.chars().count() - affix_len)
        .collect();
    if !kept.is_empty() {
        host.syls.push(kept);
    }
    host.syls_idx = token
        .syls_idx
        .iter()
        .map(|idxs| idxs.iter().copied().filter(|&i| i < split).collect::<Vec<_>>())
        .filter(|idxs: &Vec<usize>| !idxs.is_empty())
        .collect();
    host.syls_start_end = token
        .syls_start_end
        .iter()
        .filter(|&&(s, _)| s < split)
        .map(|&(s, e)| (s, e.min(split)))
        .collect();
    host.char_types = token.char_types[..split].to_vec();
    host.pos = token.pos.clone();
    host.lemma = token.lemma.clone();
    host.freq = token.freq;
    host.senses = token.senses.clone();
    host.skrt = token.skrt;
    host.affixation = token.affixation.clone();
    host.affix_host = true;
    host.text_unaffixed = Some(host_text);

    let mut particle = Token::with_text(
        particle_text.clone(),
        token.start + split,
        affix_len,
        ChunkKind::Text,
    );
    particle.syls = vec![particle_text];
    particle.syls_idx = vec![(0..affix_len).collect()];
    particle.syls_start_end = vec![(0, affix_len)];
    particle.char_types = token.char_types[split..].to_vec();
    particle.affix = true;
    particle.pos = Some(PART.to_string());
    particle.senses = vec![Sense {
        pos: Some(PART.to_string()),
        affixed: Some(true),
        ..Default::default()
    }];

    (host, particle)
}

/// Write a default lemma into senses that lack one, and the cleaned text
/// onto each word token.
///
/// Pure particles take the canonical particle lemma, affix hosts their root
/// form (plus འ when the affix replaced one), regular words their cleaned
/// text; lemmas are always tsek-terminated. Senses without a POS, or tagged
/// as non-words, are left alone. A token with no senses gets one holding
/// just the lemma.
pub fn assign_default_lemmas(tokens: &mut [Token]) {
    for token in tokens.iter_mut() {
        if token.chunk_type != ChunkKind::Text || token.syls.is_empty() {
            continue;
        }

        token.text_cleaned = Some(token.cleaned_content());

        let unaffixed = token.unaffixed_content();
        if unaffixed.is_empty() {
            continue;
        }

        let lemma = if token.affix {
            let canonical = PART_LEMMAS
                .get(unaffixed.as_str())
                .copied()
                .unwrap_or(unaffixed.as_str());
            format!("{}{}", canonical, TSEK)
        } else if token.affix_host {
            let mut lemma = unaffixed.clone();
            if token.affixation.as_ref().map_or(false, |a| a.aa) {
                lemma.push('འ');
            }
            lemma.push(TSEK);
            lemma
        } else {
            let mut lemma = unaffixed.clone();
            if !lemma.ends_with(TSEK) {
                lemma.push(TSEK);
            }
            lemma
        };

        if token.senses.is_empty() {
            token.senses.push(Sense {
                lemma: Some(lemma),
                ..Default::default()
            });
        } else {
            for sense in token.senses.iter_mut() {
                if sense.lemma.is_some() {
                    continue;
                }
                match sense.pos.as_deref() {
                    None | Some(NON_WORD) | Some(NO_POS) => {}
                    Some(_) => sense.lemma = Some(lemma.clone()),
                }
            }
        }
    }
}

/// Choose one sense per token and copy its populated fields onto the token.
///
/// Senses are bucketed by the `affixed` key: explicitly non-affixed first,
/// then unspecified, then explicitly affixed. Within the winning bucket the
/// sense with the most populated attributes wins, earliest on ties.
pub fn select_senses(tokens: &mut [Token]) {
    for token in tokens.iter_mut() {
        if token.senses.is_empty() {
            continue;
        }

        let chosen = {
            let bucket: Vec<&Sense> = [Some(false), None, Some(true)]
                .iter()
                .map(|key| {
                    token
                        .senses
                        .iter()
                        .filter(|s| s.affixed == *key)
                        .collect::<Vec<_>>()
                })
                .find(|bucket| !bucket.is_empty())
                .unwrap_or_default();

            let mut best = bucket[0];
            for sense in &bucket[1..] {
                if sense.populated() > best.populated() {
                    best = sense;
                }
            }
            best.clone()
        };

        if chosen.pos.is_some() {
            token.pos = chosen.pos;
        }
        if chosen.lemma.is_some() {
            token.lemma = chosen.lemma;
        }
        if chosen.freq.is_some() {
            token.freq = chosen.freq;
        }
    }
}

/// Merge dagdra particles (པ་/པོ་/བ་/བོ་) into the preceding word.
///
/// Not part of the default pipeline; callers that want the merged
/// convention apply it themselves after tokenizing.
pub fn merge_dagdra(tokens: &mut Vec<Token>) {
    if tokens.len() <= 1 {
        return;
    }

    let mut i = 0;
    while i + 1 < tokens.len() {
        let mergeable = tokens[i].is_word()
            && tokens[i + 1].is_word()
            && is_dagdra(&tokens[i + 1].text);

        if mergeable {
            let second = tokens.remove(i + 1);
            let first = &mut tokens[i];

            let gap = second.start - (first.start + first.len);
            let offset = second.start - first.start;
            if gap == 1 {
                first.text.push(TSEK);
                first.char_types.push(crate::char_categories::CharCategory::Tsek);
            }
            first.text.push_str(&second.text);
            first.len = offset + second.len;
            first
                .char_types
                .extend(second.char_types.iter().copied());
            first.syls.extend(second.syls.iter().cloned());
            first.syls_idx.extend(
                second
                    .syls_idx
                    .iter()
                    .map(|idxs| idxs.iter().map(|&x| x + offset).collect::<Vec<_>>()),
            );
            first.syls_start_end.extend(
                second
                    .syls_start_end
                    .iter()
                    .map(|&(s, e)| (s + offset, e + offset)),
            );
            first.text_cleaned = Some(first.cleaned_content());
            first.lemma = first.text_cleaned.clone();
            // re-check the merged token against the next one
        } else {
            i += 1;
        }
    }
}

/// Apply the standard finalization pipeline.
pub fn apply_all_finalizers(tokens: &mut Vec<Token>, split_affixes: bool) {
    if split_affixes {
        split_affixed(tokens);
    }
    assign_default_lemmas(tokens);
    select_senses(tokens);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::AffixInfo;

    fn word(text: &str, start: usize, syls: &[&str]) -> Token {
        let len = text.chars().count();
        let mut token = Token::with_text(text.to_string(), start, len, ChunkKind::Text);
        token.syls = syls.iter().map(|s| s.to_string()).collect();
        let mut pos = 0;
        for syl in syls {
            let n = syl.chars().count();
            token.syls_idx.push((pos..pos + n).collect());
            token.syls_start_end.push((pos, pos + n));
            pos += n + 1; // tsek between syllables
        }
        token.char_types = vec![Default::default(); len];
        token
    }

    #[test]
    fn test_split_affixed_metadata() {
        // an affixed surface form straight from the inflected trie
        let mut token = word("བོདའི", 0, &["བོདའི"]);
        token.affixation = Some(AffixInfo {
            len: 2,
            affix_type: "gi".to_string(),
            aa: false,
        });
        token.pos = Some("PROPN".to_string());
        token.senses = vec![Sense {
            pos: Some("PROPN".to_string()),
            affixed: Some(true),
            ..Default::default()
        }];

        let mut tokens = vec![token];
        split_affixed(&mut tokens);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "བོད");
        assert!(tokens[0].affix_host);
        assert_eq!(tokens[0].text_unaffixed.as_deref(), Some("བོད"));
        assert_eq!(tokens[1].text, "འི");
        assert!(tokens[1].affix);
        assert_eq!(tokens[1].pos.as_deref(), Some(PART));
        assert_eq!(tokens[1].start, 3);
        assert_eq!(tokens[1].len, 2);
    }

    #[test]
    fn test_no_split_when_sense_unaffixed() {
        let mut token = word("དགེས", 0, &["དགེས"]);
        token.affixation = Some(AffixInfo {
            len: 1,
            affix_type: "gis".to_string(),
            aa: false,
        });
        token.senses = vec![Sense {
            pos: Some("VERB".to_string()),
            affixed: Some(false),
            ..Default::default()
        }];

        let mut tokens = vec![token];
        split_affixed(&mut tokens);
        assert_eq!(tokens.len(), 1);
        assert!(!tokens[0].affix_host);
    }

    #[test]
    fn test_free_particle_marking() {
        let mut host = word("བོད", 0, &["བོད"]);
        host.pos = Some("NOUN".to_string());
        let mut particle = word("ཀྱི", 4, &["ཀྱི"]);
        particle.pos = Some(NO_POS.to_string());
        particle.senses = vec![Sense {
            pos: Some(NO_POS.to_string()),
            ..Default::default()
        }];

        let mut tokens = vec![host, particle];
        split_affixed(&mut tokens);

        assert!(tokens[0].affix_host);
        assert!(tokens[1].affix);
        assert_eq!(tokens[1].pos.as_deref(), Some(PART));
    }

    #[test]
    fn test_dictionary_word_in_particle_form_not_marked() {
        // a fresh dictionary match carries its senses but no pos yet;
        // a particle-shaped surface form must not demote it
        let mut host = word("བོད", 0, &["བོད"]);
        host.pos = Some("NOUN".to_string());
        let mut entry = word("ས", 4, &["ས"]);
        entry.senses = vec![Sense {
            pos: Some("NOUN".to_string()),
            ..Default::default()
        }];

        let mut tokens = vec![host, entry];
        split_affixed(&mut tokens);

        assert!(!tokens[0].affix_host);
        assert!(!tokens[1].affix);
        assert!(tokens[1].pos.is_none());
        assert_eq!(tokens[1].senses[0].pos.as_deref(), Some("NOUN"));
    }

    #[test]
    fn test_non_particle_not_marked() {
        let mut first = word("བཀྲ", 0, &["བཀྲ"]);
        first.pos = Some(NO_POS.to_string());
        let mut second = word("ཤིས", 4, &["ཤིས"]);
        second.pos = Some(NO_POS.to_string());

        let mut tokens = vec![first, second];
        split_affixed(&mut tokens);

        assert!(!tokens[0].affix_host);
        assert!(!tokens[1].affix);
    }

    #[test]
    fn test_default_lemma_regular_word() {
        let mut token = word("བཀྲ་ཤིས", 0, &["བཀྲ", "ཤིས"]);
        token.senses = vec![Sense {
            pos: Some("NOUN".to_string()),
            ..Default::default()
        }];

        let mut tokens = vec![token];
        assign_default_lemmas(&mut tokens);

        assert_eq!(tokens[0].senses[0].lemma.as_deref(), Some("བཀྲ་ཤིས་"));
        assert_eq!(tokens[0].text_cleaned.as_deref(), Some("བཀྲ་ཤིས་"));
    }

    #[test]
    fn test_default_lemma_particle() {
        let mut token = word("ཀྱི", 0, &["ཀྱི"]);
        mark_particle(&mut token);

        let mut tokens = vec![token];
        assign_default_lemmas(&mut tokens);

        assert_eq!(tokens[0].senses[0].lemma.as_deref(), Some("གྱི་"));
    }

    #[test]
    fn test_default_lemma_host_with_aa() {
        let mut token = word("མཐ", 0, &["མཐ"]);
        token.affix_host = true;
        token.affixation = Some(AffixInfo {
            len: 2,
            affix_type: "gi".to_string(),
            aa: true,
        });
        token.text_unaffixed = Some("མཐ".to_string());
        token.senses = vec![Sense {
            pos: Some("NOUN".to_string()),
            ..Default::default()
        }];

        let mut tokens = vec![token];
        assign_default_lemmas(&mut tokens);

        assert_eq!(tokens[0].senses[0].lemma.as_deref(), Some("མཐའ་"));
    }

    #[test]
    fn test_lemma_skips_non_word_senses() {
        let mut token = word("ཀཀ", 0, &["ཀཀ"]);
        token.pos = Some(NO_POS.to_string());
        token.senses = vec![Sense {
            pos: Some(NO_POS.to_string()),
            ..Default::default()
        }];

        let mut tokens = vec![token];
        assign_default_lemmas(&mut tokens);

        assert!(tokens[0].senses[0].lemma.is_none());
    }

    #[test]
    fn test_select_senses_buckets() {
        let mut token = word("ལ", 0, &["ལ"]);
        token.senses = vec![
            Sense {
                pos: Some("A".to_string()),
                affixed: Some(true),
                ..Default::default()
            },
            Sense {
                pos: Some("B".to_string()),
                lemma: Some("L".to_string()),
                affixed: Some(false),
                ..Default::default()
            },
            Sense {
                pos: Some("C".to_string()),
                ..Default::default()
            },
        ];

        let mut tokens = vec![token];
        select_senses(&mut tokens);

        // non-affixed bucket wins even though C is unspecified
        assert_eq!(tokens[0].pos.as_deref(), Some("B"));
        assert_eq!(tokens[0].lemma.as_deref(), Some("L"));
    }

    #[test]
    fn test_select_senses_most_populated() {
        let mut token = word("ལ", 0, &["ལ"]);
        token.senses = vec![
            Sense {
                pos: Some("A".to_string()),
                ..Default::default()
            },
            Sense {
                pos: Some("B".to_string()),
                freq: Some(3),
                lemma: Some("ལ་".to_string()),
                ..Default::default()
            },
        ];

        let mut tokens = vec![token];
        select_senses(&mut tokens);
        assert_eq!(tokens[0].pos.as_deref(), Some("B"));
        assert_eq!(tokens[0].freq, Some(3));
    }

    #[test]
    fn test_select_senses_keeps_form_freq() {
        let mut token = word("ལ", 0, &["ལ"]);
        token.freq = Some(77);
        token.senses = vec![Sense {
            pos: Some("NOUN".to_string()),
            ..Default::default()
        }];

        let mut tokens = vec![token];
        select_senses(&mut tokens);
        assert_eq!(tokens[0].freq, Some(77));
    }

    #[test]
    fn test_merge_dagdra() {
        let mut first = word("བཟང", 0, &["བཟང"]);
        first.pos = Some("ADJ".to_string());
        let second = word("པོ", 4, &["པོ"]);

        let mut tokens = vec![first, second];
        merge_dagdra(&mut tokens);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "བཟང་པོ");
        assert_eq!(tokens[0].syls.len(), 2);
        assert_eq!(tokens[0].len, 6);
    }
}
