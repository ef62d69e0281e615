use std::collections::BTreeMap;
use std::path::Path;
use tracing::trace;

/// A directory or file in the stats tree.
#[derive(Default)]
pub struct TrieNode {
    pub children: BTreeMap<String, TrieNode>,
    pub token_count: Option<usize>,
}

impl TrieNode {
    /// Tokens of this node plus everything below it.
    pub fn total_tokens(&self) -> usize {
        self.token_count.unwrap_or(0)
            + self
                .children
                .values()
                .map(TrieNode::total_tokens)
                .sum::<usize>()
    }
}

/// Path trie keyed by path components, children kept in name order.
#[derive(Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Trie::default()
    }

    pub fn insert(&mut self, path: &Path, token_count: usize) {
        trace!("Inserting {:?} with {} tokens", path, token_count);
        let mut current_node = &mut self.root;
        for component in path.iter() {
            current_node = current_node
                .children
                .entry(component.to_string_lossy().into_owned())
                .or_default();
        }
        current_node.token_count = Some(token_count);
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }
}
