//! Prefix index over normalized answers
//!
//! Nodes live in a single arena and refer to their children by index. Children
//! are kept in insertion order so prefix queries return words in a stable,
//! reproducible order.

use crate::normalize::normalize;

const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
struct Node {
    children: Vec<(char, usize)>,
    /// Normalized answer ending at this node, if any.
    word: Option<String>,
}

impl Node {
    fn child(&self, c: char) -> Option<usize> {
        self.children
            .iter()
            .find_map(|&(key, idx)| (key == c).then_some(idx))
    }
}

/// Insertion-only trie of normalized answer strings.
#[derive(Debug, Clone)]
pub struct PrefixIndex {
    nodes: Vec<Node>,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Build an index from a list of answers.
    pub fn from_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for answer in answers {
            index.insert(answer.as_ref());
        }
        index
    }

    /// Insert `word` in normalized form. Inserting the same word twice is a no-op.
    pub fn insert(&mut self, word: &str) {
        let normalized = normalize(word);
        let mut node = ROOT;

        for c in normalized.chars() {
            node = match self.nodes[node].child(c) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.push((c, next));
                    next
                }
            };
        }

        self.nodes[node].word = Some(normalized);
    }

    /// True if `word` was inserted (after normalization).
    pub fn contains(&self, word: &str) -> bool {
        self.walk(&normalize(word))
            .is_some_and(|node| self.nodes[node].word.is_some())
    }

    /// Every stored word starting with `prefix`, in depth-first insertion order.
    ///
    /// Returns an empty vector when no stored word has that prefix.
    pub fn contains_prefix(&self, prefix: &str) -> Vec<&str> {
        let Some(start) = self.walk(&normalize(prefix)) else {
            return Vec::new();
        };

        let mut results = Vec::new();
        let mut stack = vec![start];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if let Some(word) = node.word.as_deref() {
                results.push(word);
            }
            // Reversed so the first-inserted child is visited first.
            stack.extend(node.children.iter().rev().map(|&(_, child)| child));
        }

        results
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn walk(&self, normalized: &str) -> Option<usize> {
        normalized
            .chars()
            .try_fold(ROOT, |node, c| self.nodes[node].child(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulls_index() -> PrefixIndex {
        PrefixIndex::from_answers(["Bulls", "Chicago Bulls", "Chicago Cubs"])
    }

    #[test]
    fn test_prefix_collects_in_insertion_order() {
        let index = bulls_index();
        assert_eq!(
            index.contains_prefix("chicago"),
            vec!["chicago bulls", "chicago cubs"]
        );
    }

    #[test]
    fn test_prefix_is_normalized() {
        let index = bulls_index();
        assert_eq!(index.contains_prefix("  BUL "), vec!["bulls"]);
    }

    #[test]
    fn test_missing_prefix_is_empty() {
        let index = bulls_index();
        assert!(index.contains_prefix("chicagox").is_empty());
        assert!(index.contains_prefix("xyz").is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = PrefixIndex::new();
        assert!(index.contains_prefix("a").is_empty());
        assert!(index.contains_prefix("").is_empty());
    }

    #[test]
    fn test_word_is_its_own_prefix() {
        let index = bulls_index();
        assert_eq!(index.contains_prefix("bulls"), vec!["bulls"]);
        assert!(index.contains("BULLS"));
        assert!(!index.contains("bull"));
    }

    #[test]
    fn test_shorter_word_before_longer_on_same_path() {
        let index = PrefixIndex::from_answers(["New York Yankees", "New York"]);
        assert_eq!(
            index.contains_prefix("new"),
            vec!["new york", "new york yankees"]
        );
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut index = bulls_index();
        let nodes = index.node_count();
        let before: Vec<String> = index
            .contains_prefix("c")
            .into_iter()
            .map(String::from)
            .collect();

        index.insert("Chicago Bulls");
        index.insert("  chicago bulls");

        assert_eq!(index.node_count(), nodes);
        assert_eq!(index.contains_prefix("c"), before);
    }

    #[test]
    fn test_empty_word_marks_root() {
        let mut index = PrefixIndex::new();
        index.insert("   ");
        index.insert("cubs");
        assert!(index.contains(""));
        assert_eq!(index.contains_prefix("c"), vec!["cubs"]);
    }
}
