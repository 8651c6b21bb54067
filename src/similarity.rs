//! Ratio-of-matches sequence similarity
//!
//! Reproduces the classic "gestalt" ratio: find the longest common contiguous
//! block, then recurse on the unmatched segments to its left and right. The
//! score is `2 * M / T` where `M` is the total length of all matched blocks and
//! `T` the combined length of both strings.
//!
//! Longest-block ties are broken by the earliest start in `a`, then the
//! earliest start in `b`, which keeps scores identical to the reference
//! sequence matcher for strings without junk heuristics.

/// Similarity ratio in `[0.0, 1.0]`. Two empty strings score `1.0`.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// [`ratio`] over pre-split character slices.
#[must_use]
pub fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters_chars(a, b) as f64 / total as f64
}

/// Total length of the matching blocks between `a` and `b`.
#[must_use]
pub fn matching_characters(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    matching_characters_chars(&a, &b)
}

fn matching_characters_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    let width = bhi - blo;

    // run[x + 1] = length of the common run ending at b[blo + x] on the current row
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for x in 0..width {
            let j = blo + x;
            cur[x + 1] = if a[i] == b[j] {
                let len = prev[x] + 1;
                if len > best_len {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_len = len;
                }
                len
            } else {
                0
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_len)
}
