//! Single-edit candidate generation
//!
//! [`SingleEdits`] lazily yields every string one edit away from a guess, in a
//! fixed order: all substitutions, then all insertions, then all deletions.
//! Callers stop pulling as soon as a candidate is accepted.

/// Symbols used for substitutions and insertions.
pub const ALPHABET: [char; 27] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', ' ',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Substitute,
    Insert,
    Delete,
    Done,
}

/// Iterator over one-edit variants of a string.
#[derive(Debug, Clone)]
pub struct SingleEdits {
    chars: Vec<char>,
    phase: Phase,
    pos: usize,
    letter: usize,
}

impl SingleEdits {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            phase: Phase::Substitute,
            pos: 0,
            letter: 0,
        }
    }

    /// Number of candidates a full pass yields for a string of `len` characters.
    ///
    /// Substitutions skip the letter already in place, so characters outside
    /// [`ALPHABET`] contribute one more substitution than in-alphabet ones;
    /// this is the upper bound.
    pub fn upper_bound(len: usize) -> usize {
        len * ALPHABET.len() + (len + 1) * ALPHABET.len() + len
    }

    fn splice(&self, at: usize, skip: usize, insert: Option<char>) -> String {
        let mut out = String::with_capacity(self.chars.len() + 1);
        out.extend(&self.chars[..at]);
        out.extend(insert);
        out.extend(&self.chars[at + skip..]);
        out
    }

    fn advance_letter(&mut self, positions: usize, next: Phase) {
        self.letter += 1;
        if self.letter == ALPHABET.len() {
            self.letter = 0;
            self.pos += 1;
        }
        if self.pos >= positions {
            self.pos = 0;
            self.letter = 0;
            self.phase = next;
        }
    }
}

impl Iterator for SingleEdits {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            match self.phase {
                Phase::Substitute => {
                    if self.chars.is_empty() {
                        self.phase = Phase::Insert;
                        continue;
                    }
                    let (pos, c) = (self.pos, ALPHABET[self.letter]);
                    self.advance_letter(self.chars.len(), Phase::Insert);
                    if c != self.chars[pos] {
                        return Some(self.splice(pos, 1, Some(c)));
                    }
                }
                Phase::Insert => {
                    let (pos, c) = (self.pos, ALPHABET[self.letter]);
                    self.advance_letter(self.chars.len() + 1, Phase::Delete);
                    return Some(self.splice(pos, 0, Some(c)));
                }
                Phase::Delete => {
                    if self.pos >= self.chars.len() {
                        self.phase = Phase::Done;
                        continue;
                    }
                    let pos = self.pos;
                    self.pos += 1;
                    return Some(self.splice(pos, 1, None));
                }
                Phase::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_substitute_insert_delete() {
        let edits: Vec<String> = SingleEdits::new("ab").collect();

        // substitutions: 26 at each of 2 positions
        assert_eq!(edits[0], "bb");
        assert_eq!(edits[1], "cb");
        assert_eq!(edits[25], " b");
        assert_eq!(edits[26], "aa");
        assert_eq!(edits[51], "a ");

        // insertions: 27 at each of 3 positions
        assert_eq!(edits[52], "aab");
        assert_eq!(edits[52 + 27], "aab");
        assert_eq!(edits[52 + 28], "abb");
        assert_eq!(edits[52 + 80], "ab ");

        // deletions
        assert_eq!(&edits[52 + 81..], ["b", "a"]);
        assert_eq!(edits.len(), 52 + 81 + 2);
    }

    #[test]
    fn test_skips_existing_letter_only() {
        let subs: Vec<String> = SingleEdits::new("q").take(26).collect();
        assert!(!subs.contains(&"q".to_string()));
        assert_eq!(subs.len(), 26);
    }

    #[test]
    fn test_foreign_character_gets_full_alphabet() {
        let edits: Vec<String> = SingleEdits::new("1").collect();
        assert_eq!(edits.len(), SingleEdits::upper_bound(1));
        assert_eq!(edits.last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_empty_source_only_inserts() {
        let edits: Vec<String> = SingleEdits::new("").collect();
        assert_eq!(edits.len(), 27);
        assert_eq!(edits[0], "a");
        assert_eq!(edits[26], " ");
    }

    #[test]
    fn test_lazy() {
        let mut edits = SingleEdits::new("bull");
        assert_eq!(edits.next().as_deref(), Some("aull"));
        assert_eq!(edits.next().as_deref(), Some("cull"));
    }
}
