use crate::document::OutputDocument;
use crate::errors::ConcatError;
use crate::trie::{Trie, TrieNode};
use std::path::{Path, PathBuf};
use tiktoken_rs::{get_bpe_from_model, CoreBPE};
use tracing::{debug, info};

pub fn load_tokenizer(model: &str) -> Result<CoreBPE, ConcatError> {
    get_bpe_from_model(model).map_err(|e| ConcatError::TokenizerError(e.to_string()))
}

/// Token count of every document entry.
pub fn count_tokens(document: &OutputDocument, tokenizer: &CoreBPE) -> Vec<(PathBuf, usize)> {
    document
        .documents
        .iter()
        .map(|entry| {
            let count = tokenizer.encode_ordinary(&entry.content).len();
            debug!("File {} has {} tokens", entry.source, count);
            (PathBuf::from(&entry.source), count)
        })
        .collect()
}

/// Logs the bundled files as a tree with per-file and per-directory totals.
pub fn print_stats(token_counts: &[(PathBuf, usize)]) {
    let mut trie = Trie::new();
    for (path, count) in token_counts {
        trie.insert(path, *count);
    }

    info!(
        "Bundled {} files ({} tokens)",
        token_counts.len(),
        trie.root().total_tokens()
    );
    print_tree(trie.root(), "");
}

fn print_tree(node: &TrieNode, prefix: &str) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "┗━━" } else { "┣━━" };

        match child.token_count {
            Some(tokens) if child.children.is_empty() => {
                info!(
                    "{}{} {} {} ({} tokens)",
                    prefix,
                    connector,
                    file_icon(Path::new(name)),
                    name,
                    tokens
                );
            }
            _ => {
                info!(
                    "{}{}📂 {} ({} tokens)",
                    prefix,
                    connector,
                    name,
                    child.total_tokens()
                );
                let child_prefix = format!("{}{}    ", prefix, if is_last { " " } else { "┃" });
                print_tree(child, &child_prefix);
            }
        }
    }
}

pub fn file_icon(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("py") | Some("pyi") | Some("pyw") => "🐍",
        Some("yaml") | Some("yml") => "🗂️",
        Some("json") => "🔖",
        Some("toml") | Some("ini") | Some("cfg") | Some("conf") => "⚙️",
        Some("md") | Some("txt") => "📝",
        _ => "📄",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentEntry;

    #[test]
    fn test_unknown_model_is_a_tokenizer_error() {
        assert!(matches!(
            load_tokenizer("not-a-model"),
            Err(ConcatError::TokenizerError(_))
        ));
    }

    #[test]
    fn test_counts_follow_document_order() {
        let document = OutputDocument {
            documents: vec![
                DocumentEntry {
                    index: 1,
                    source: "main.py".to_string(),
                    content: "import helper\n".to_string(),
                },
                DocumentEntry {
                    index: 2,
                    source: "helper.py".to_string(),
                    content: String::new(),
                },
            ],
        };
        let counts = count_tokens(&document, &load_tokenizer("gpt-4").unwrap());
        assert_eq!(counts[0].0, PathBuf::from("main.py"));
        assert!(counts[0].1 > 0);
        assert_eq!(counts[1], (PathBuf::from("helper.py"), 0));
    }

    #[test]
    fn test_file_icons() {
        assert_eq!(file_icon(Path::new("a.py")), "🐍");
        assert_eq!(file_icon(Path::new("conf/a.yaml")), "🗂️");
        assert_eq!(file_icon(Path::new("README")), "📄");
    }
}
