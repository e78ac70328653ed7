use confscope_core::SimilarityMetric;

/// Similarity of two normalized keys under `metric`, in `[0, 1]`.
pub fn similarity(metric: SimilarityMetric, a: &str, b: &str) -> f64 {
    match metric {
        SimilarityMetric::Ratcliff => sequence_ratio(a, b),
        SimilarityMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
    }
}

/// Matching-blocks ratio `2*M/T`.
///
/// `M` counts characters in the matching blocks found by recursively taking
/// the longest common substring and recursing on both sides of it; `T` is
/// the combined length. The pair is put in a canonical order first, so the
/// result does not depend on argument order.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
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

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`, as
/// `(start_a, start_b, len)`. Among equally long runs the one starting
/// earliest in `a`, then earliest in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    // run[k + 1] = length of the common run ending at a[i], b[blo + k]
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in alo..ahi {
        for k in 0..width {
            curr[k + 1] = if a[i] == b[blo + k] { prev[k] + 1 } else { 0 };
            let len = curr[k + 1];
            if len > best.2 {
                best = (i + 1 - len, blo + k + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(sequence_ratio("machine neural translation", "machine neural translation"), 1.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
    }

    #[test]
    fn classic_ratio_values() {
        // Known values of the matching-blocks ratio.
        assert!(approx(sequence_ratio("abcd", "bcde"), 0.75));
        assert!(approx(sequence_ratio("abcdefg", "abxdefg"), 12.0 / 14.0));
        assert!(approx(
            sequence_ratio("machine neural translation", "machine neural translations"),
            52.0 / 53.0
        ));
    }

    #[test]
    fn ratio_is_symmetric() {
        let pairs = [
            ("learning deep nlp", "deep learning nlp"),
            ("abcabc", "cbacba"),
            ("graph neural networks", "neural graph network"),
            ("tide", "diet"),
        ];
        for (a, b) in pairs {
            assert_eq!(sequence_ratio(a, b), sequence_ratio(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn ratio_grows_with_shared_content() {
        let target = "machine neural translation";
        let far = sequence_ratio(target, "machine vision");
        let near = sequence_ratio(target, "machine neural transliteration");
        assert!(far < near);
        assert!(near < 1.0);
    }

    #[test]
    fn levenshtein_metric_bounds() {
        assert_eq!(similarity(SimilarityMetric::Levenshtein, "same", "same"), 1.0);
        assert_eq!(similarity(SimilarityMetric::Levenshtein, "abc", "xyz"), 0.0);
        assert_eq!(
            similarity(SimilarityMetric::Levenshtein, "kitten", "sitting"),
            similarity(SimilarityMetric::Levenshtein, "sitting", "kitten")
        );
    }
}
