use std::collections::HashMap;

use confscope_core::{MatchKind, SimilarityMetric};

use super::normalize::normalize;
use super::similarity::similarity;

/// Normalized title key → records sharing it.
///
/// Keys are kept in insertion order; fuzzy search walks them in that order,
/// so ties always resolve to the earliest inserted key.
#[derive(Debug, Clone)]
pub struct CandidateIndex<R> {
    keys: Vec<String>,
    buckets: Vec<Vec<R>>,
    positions: HashMap<String, usize>,
    skipped: usize,
}

impl<R> Default for CandidateIndex<R> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            buckets: Vec::new(),
            positions: HashMap::new(),
            skipped: 0,
        }
    }
}

/// Outcome of a lookup. `record` is `None` exactly when `kind` is `None`.
#[derive(Debug, PartialEq)]
pub struct MatchResult<'a, R> {
    pub record: Option<&'a R>,
    pub kind: MatchKind,
    pub score: f64,
}

impl<R> Clone for MatchResult<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for MatchResult<'_, R> {}

impl<'a, R> MatchResult<'a, R> {
    pub fn none() -> Self {
        Self {
            record: None,
            kind: MatchKind::None,
            score: 0.0,
        }
    }

    fn exact(record: &'a R) -> Self {
        Self {
            record: Some(record),
            kind: MatchKind::Exact,
            score: 1.0,
        }
    }

    fn fuzzy(record: &'a R, score: f64) -> Self {
        Self {
            record: Some(record),
            kind: MatchKind::Fuzzy,
            score,
        }
    }

    pub fn is_match(&self) -> bool {
        self.record.is_some()
    }
}

impl<R> CandidateIndex<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every record under the normalized form of its title. Records
    /// whose title normalizes to nothing are left out.
    pub fn build<I, F, T>(records: I, mut title_of: F) -> Self
    where
        I: IntoIterator<Item = R>,
        F: FnMut(&R) -> T,
        T: AsRef<str>,
    {
        let mut index = Self::new();
        for record in records {
            let title = title_of(&record);
            index.insert(title.as_ref(), record);
        }
        index
    }

    /// Returns `false` when the title has no usable key.
    pub fn insert(&mut self, title: &str, record: R) -> bool {
        let key = normalize(title);
        if key.is_empty() {
            self.skipped += 1;
            return false;
        }

        match self.positions.get(&key) {
            Some(&pos) => self.buckets[pos].push(record),
            None => {
                self.positions.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.buckets.push(vec![record]);
            }
        }
        true
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Records left out because their title had no usable key.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn get(&self, key: &str) -> Option<&[R]> {
        self.positions
            .get(key)
            .map(|&pos| self.buckets[pos].as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Keys shared by more than one record. Only the first of each is ever
    /// returned by a lookup.
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[R])> {
        self.keys
            .iter()
            .zip(&self.buckets)
            .filter(|(_, bucket)| bucket.len() > 1)
            .map(|(key, bucket)| (key.as_str(), bucket.as_slice()))
    }

    pub fn find_match(&self, target: &str, threshold: f64) -> MatchResult<'_, R> {
        self.find_match_with(target, threshold, SimilarityMetric::default())
    }

    /// Exact key lookup first, then the best fuzzy candidate whose score is
    /// strictly above `threshold`.
    pub fn find_match_with(
        &self,
        target: &str,
        threshold: f64,
        metric: SimilarityMetric,
    ) -> MatchResult<'_, R> {
        let key = normalize(target);
        if key.is_empty() {
            return MatchResult::none();
        }

        if let Some(record) = self.get(&key).and_then(<[R]>::first) {
            return MatchResult::exact(record);
        }

        let mut best: Option<(usize, f64)> = None;
        for (pos, candidate) in self.keys.iter().enumerate() {
            let score = similarity(metric, &key, candidate);
            if score > threshold && best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }

        match best.and_then(|(pos, score)| self.buckets[pos].first().map(|r| (r, score))) {
            Some((record, score)) => MatchResult::fuzzy(record, score),
            None => MatchResult::none(),
        }
    }
}

/// Index `records` by title; see [`CandidateIndex::build`].
pub fn build_index<R, I, F, T>(records: I, title_of: F) -> CandidateIndex<R>
where
    I: IntoIterator<Item = R>,
    F: FnMut(&R) -> T,
    T: AsRef<str>,
{
    CandidateIndex::build(records, title_of)
}

/// Look up `target` in `index`; see [`CandidateIndex::find_match`].
pub fn find_match<'a, R>(
    target: &str,
    index: &'a CandidateIndex<R>,
    threshold: f64,
) -> MatchResult<'a, R> {
    index.find_match(target, threshold)
}

/// Threshold and metric for one matching pass.
#[derive(Debug, Clone, Copy)]
pub struct TitleMatcher {
    threshold: f64,
    metric: SimilarityMetric,
}

impl TitleMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            metric: SimilarityMetric::default(),
        }
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn find<'a, R>(&self, index: &'a CandidateIndex<R>, title: &str) -> MatchResult<'a, R> {
        index.find_match_with(title, self.threshold, self.metric)
    }
}
