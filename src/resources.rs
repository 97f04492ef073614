//! Word-list pack discovery and loading.
//!
//! A pack is a directory holding `dictionary/` and optionally `adjustments/`
//! subdirectories of TSV files. This module only deals with the on-disk
//! layout; rule application for adjustments happens elsewhere.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::TokenizerError;
use crate::trie::{Trie, TrieBuilder};

/// Check if a directory looks like a word-list pack.
pub fn pack_exists(pack_path: &Path) -> bool {
    pack_path.is_dir() && pack_path.join("dictionary").is_dir()
}

/// All TSV files under the pack's `dictionary/` directory.
pub fn list_dictionary_files(pack_path: &Path) -> io::Result<Vec<PathBuf>> {
    list_tsv_dir(&pack_path.join("dictionary"))
}

/// All TSV files under the pack's `adjustments/` directory.
pub fn list_adjustment_files(pack_path: &Path) -> io::Result<Vec<PathBuf>> {
    list_tsv_dir(&pack_path.join("adjustments"))
}

fn list_tsv_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if dir.is_dir() {
        collect_tsv_files(dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn collect_tsv_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_tsv_files(&path, files)?;
        } else if path.extension().map_or(false, |ext| ext == "tsv") {
            files.push(path);
        }
    }
    Ok(())
}

/// Build a trie from every dictionary file of a pack.
pub fn load_pack(pack_path: &Path, inflect: bool) -> Result<Trie, TokenizerError> {
    let mut builder = TrieBuilder::new();
    builder.set_inflection(inflect);

    let files = list_dictionary_files(pack_path)?;
    for file in &files {
        let content = fs::read_to_string(file)?;
        builder.load_tsv(&content);
    }
    debug!(
        pack = %pack_path.display(),
        files = files.len(),
        words = builder.trie().len(),
        "loaded word-list pack"
    );

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_pack(root: &Path) {
        fs::create_dir_all(root.join("dictionary/words")).unwrap();
        fs::create_dir_all(root.join("adjustments")).unwrap();
        fs::write(
            root.join("dictionary/words/general.tsv"),
            "བཀྲ་ཤིས\tNOUN\t\t\t1000\nབདེ་ལེགས\tNOUN\t\t\t500\n",
        )
        .unwrap();
        fs::write(root.join("dictionary/notes.txt"), "not a word list").unwrap();
        fs::write(root.join("adjustments/remove.tsv"), "").unwrap();
    }

    #[test]
    fn test_pack_discovery_and_load() {
        let root = std::env::temp_dir().join("tibtok-test-pack");
        let _ = fs::remove_dir_all(&root);
        make_pack(&root);

        assert!(pack_exists(&root));
        assert_eq!(list_dictionary_files(&root).unwrap().len(), 1);
        assert_eq!(list_adjustment_files(&root).unwrap().len(), 1);

        let trie = load_pack(&root, false).unwrap();
        assert_eq!(trie.len(), 2);
        assert!(trie.has_word(&["བཀྲ", "ཤིས"]).unwrap().0);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_pack() {
        let root = std::env::temp_dir().join("tibtok-no-such-pack");
        assert!(!pack_exists(&root));
        assert!(list_dictionary_files(&root).unwrap().is_empty());
    }
}
