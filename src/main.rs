//! Command-line interface for tibtok
//!
//! Usage:
//!   tibtok [OPTIONS] [TEXT]
//!   echo "བཀྲ་ཤིས་བདེ་ལེགས།" | tibtok
//!
//! Options:
//!   -d, --dict <FILE>   Path to dictionary TSV file
//!   -P, --pack <DIR>    Path to a word-list pack directory
//!   -s, --simple        Syllable tokenization only (no dictionary)
//!   -j, --json          Output as JSON
//!   -i, --inflect       Auto-generate affixed forms while loading
//!       --keep-affixed  Do not split affixed particles
//!       --spaces-punct  Serve space runs as punctuation tokens
//!   -h, --help          Show help

use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use tracing_subscriber::EnvFilter;

use tibtok::{resources, SimpleTokenizer, Tokenizer, TrieBuilder};

fn print_help() {
    eprintln!(
        r#"tibtok - a fast Tibetan word tokenizer

USAGE:
    tibtok [OPTIONS] [TEXT]
    echo "བཀྲ་ཤིས་བདེ་ལེགས།" | tibtok

OPTIONS:
    -d, --dict <FILE>   Path to dictionary TSV file
    -P, --pack <DIR>    Path to a word-list pack directory
    -s, --simple        Syllable tokenization only (no dictionary)
    -j, --json          Output as JSON
    -i, --inflect       Auto-generate affixed forms while loading
        --keep-affixed  Do not split affixed particles
        --spaces-punct  Serve space runs as punctuation tokens
    -h, --help          Show this help message

EXAMPLES:
    tibtok -d dictionary.tsv "བཀྲ་ཤིས་བདེ་ལེགས།"
    tibtok -P ~/packs/general "བོད་ཀྱི་"
    echo "བཀྲ་ཤིས་བདེ་ལེགས།" | tibtok -s
"#
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut dict_path: Option<String> = None;
    let mut pack_path: Option<String> = None;
    let mut simple_mode = false;
    let mut json_output = false;
    let mut inflect = false;
    let mut split_affixes = true;
    let mut spaces_as_punct = false;
    let mut text: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-s" | "--simple" => simple_mode = true,
            "-j" | "--json" => json_output = true,
            "-i" | "--inflect" => inflect = true,
            "--keep-affixed" => split_affixes = false,
            "--spaces-punct" => spaces_as_punct = true,
            "-d" | "--dict" => {
                i += 1;
                if i < args.len() {
                    dict_path = Some(args[i].clone());
                } else {
                    eprintln!("Error: --dict requires a file path");
                    std::process::exit(1);
                }
            }
            "-P" | "--pack" => {
                i += 1;
                if i < args.len() {
                    pack_path = Some(args[i].clone());
                } else {
                    eprintln!("Error: --pack requires a directory path");
                    std::process::exit(1);
                }
            }
            arg if !arg.starts_with('-') => text = Some(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // Read from stdin if no text provided
    let input_text = if let Some(t) = text {
        t
    } else {
        let stdin = io::stdin();
        let mut lines = Vec::new();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => lines.push(l),
                Err(e) => {
                    eprintln!("Error reading stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
        lines.join("\n")
    };

    if input_text.is_empty() {
        eprintln!("Error: No input text provided");
        print_help();
        std::process::exit(1);
    }

    let tokens = if simple_mode {
        SimpleTokenizer::tokenize(&input_text)
    } else if let Some(path) = pack_path {
        let trie = match resources::load_pack(Path::new(&path), inflect) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading pack '{}': {}", path, e);
                std::process::exit(1);
            }
        };
        let tokenizer = Tokenizer::new(trie);
        tokenizer.tokenize_with_full_options(&input_text, split_affixes, spaces_as_punct, false)
    } else if let Some(path) = dict_path {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading dictionary file '{}': {}", path, e);
                std::process::exit(1);
            }
        };

        let mut builder = TrieBuilder::new();
        builder.set_inflection(inflect);
        builder.load_tsv(&content);
        let tokenizer = Tokenizer::new(builder.build());
        tokenizer.tokenize_with_full_options(&input_text, split_affixes, spaces_as_punct, false)
    } else {
        // No dictionary - syllable tokenization
        SimpleTokenizer::tokenize(&input_text)
    };

    if json_output {
        match serde_json::to_string_pretty(&tokens) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing to JSON: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        for token in &tokens {
            let tag = token
                .pos
                .clone()
                .unwrap_or_else(|| token.chunk_type.as_str().to_string());
            println!("{}\t{}\t{}", token.text, tag, token.syls.join("་"));
        }
    }
}
