//! Print the chunk frame for a piece of text, for debugging segmentation.

use std::env;

use tibtok::{BoString, ChunkFramework};

fn main() {
    let text = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: debug_chunker <TEXT>");
        std::process::exit(1);
    });

    let cf = ChunkFramework::new(BoString::new(&text));
    for entry in cf.serve_syls_to_trie(false) {
        let syl = cf.syl_string(&entry).unwrap_or_default();
        println!(
            "{:<10} start={:<4} len={:<4} {:?} {}",
            entry.meta.kind.as_str(),
            entry.meta.start,
            entry.meta.len,
            cf.bo_string().substring(entry.meta.start, entry.meta.len),
            syl
        );
    }
}
