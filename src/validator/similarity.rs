// file: src/validator/similarity.rs
// description: Ratcliff/Obershelp string similarity (matching-blocks ratio)
// reference: https://docs.python.org/3/library/difflib.html#difflib.SequenceMatcher.ratio

/// `2 * M / T` where `M` counts chars in recursively found longest common blocks
/// and `T` is the combined length. Two empty strings compare as identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }

        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block in `a[alo..ahi]` and `b[blo..bhi]`; earliest in `a`, then in `b`, on ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run lengths ending at (i - 1, j) for the previous row
    let mut previous = vec![0usize; bhi - blo + 1];
    let mut current = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            current[slot] = if a[i] == b[j] { previous[slot - 1] + 1 } else { 0 };

            let run = current[slot];
            if run > best_size {
                best_i = i + 1 - run;
                best_j = j + 1 - run;
                best_size = run;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    (best_i, best_j, best_size)
}
