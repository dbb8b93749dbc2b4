use std::collections::HashMap;

use itertools::Itertools;

use crate::error::{ActivityError, Result};

/// Indexed view of a gene -> differential expression score map
///
/// Genes are assigned indices in identifier order, which also breaks ties
/// between equal scores in both sorted views.
#[derive(Debug, Clone)]
pub struct GeneScoreIndex {
    genes: Vec<String>,
    scores: Vec<f64>,
    lookup: HashMap<String, usize>,
    /// Gene indices sorted by score, descending
    descending: Vec<usize>,
    /// Gene indices sorted by score, ascending
    ascending: Vec<usize>,
}
impl GeneScoreIndex {
    pub fn new(scores: &HashMap<String, f64>) -> Result<Self> {
        if scores.is_empty() {
            return Err(ActivityError::EmptyScores);
        }
        if let Some((gene, _)) = scores.iter().find(|(_, score)| !score.is_finite()) {
            return Err(ActivityError::NonFiniteScore { gene: gene.clone() });
        }

        let (genes, scores): (Vec<String>, Vec<f64>) = scores
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(gene, score)| (gene.clone(), *score))
            .unzip();

        let lookup = genes
            .iter()
            .enumerate()
            .map(|(i, gene)| (gene.clone(), i))
            .collect();

        // stable sorts keep identifier order among ties
        let descending = (0..genes.len())
            .sorted_by(|&a, &b| scores[b].total_cmp(&scores[a]))
            .collect::<Vec<_>>();
        let ascending = (0..genes.len())
            .sorted_by(|&a, &b| scores[a].total_cmp(&scores[b]))
            .collect::<Vec<_>>();

        Ok(Self {
            genes,
            scores,
            lookup,
            descending,
            ascending,
        })
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn gene(&self, idx: usize) -> &str {
        &self.genes[idx]
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn score(&self, idx: usize) -> f64 {
        self.scores[idx]
    }

    pub fn index_of(&self, gene: &str) -> Option<usize> {
        self.lookup.get(gene).copied()
    }

    pub fn descending(&self) -> &[usize] {
        &self.descending
    }

    pub fn ascending(&self) -> &[usize] {
        &self.ascending
    }

    /// Resolves gene identifiers to indices, dropping genes without a score
    pub fn resolve<'g, I>(&self, genes: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'g String>,
    {
        genes
            .into_iter()
            .filter_map(|gene| self.index_of(gene))
            .collect()
    }
}

/// Which sorted view a ranked list position was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Descending view, carries the original score
    Positive,
    /// Ascending view, carries the negated score
    Negative,
}

/// Combined signed ranking of every gene
///
/// Each gene appears twice: once as [`Sign::Positive`] with its score and
/// once as [`Sign::Negative`] with its negated score. Positions are in
/// non-increasing order of the carried score.
#[derive(Debug, Clone)]
pub struct RankedSignedList {
    entries: Vec<(usize, Sign)>,
    scores: Vec<f64>,
}
impl RankedSignedList {
    /// Merges the descending view with the negated ascending view
    ///
    /// On equal values the ascending (negative) side is taken first.
    pub fn new(index: &GeneScoreIndex) -> Self {
        let forward = index.descending();
        let reverse = index.ascending();
        let mut entries = Vec::with_capacity(forward.len() + reverse.len());
        let mut scores = Vec::with_capacity(forward.len() + reverse.len());

        let (mut i, mut j) = (0, 0);
        while i < forward.len() || j < reverse.len() {
            let take_forward = if i >= forward.len() {
                false
            } else if j >= reverse.len() {
                true
            } else {
                index.score(forward[i]) > -index.score(reverse[j])
            };

            if take_forward {
                entries.push((forward[i], Sign::Positive));
                scores.push(index.score(forward[i]));
                i += 1;
            } else {
                entries.push((reverse[j], Sign::Negative));
                scores.push(-index.score(reverse[j]));
                j += 1;
            }
        }

        Self { entries, scores }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct genes ranked
    pub fn universe_size(&self) -> usize {
        self.entries.len() / 2
    }

    pub fn entries(&self) -> &[(usize, Sign)] {
        &self.entries
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Sign, f64)> + '_ {
        self.entries
            .iter()
            .zip(self.scores.iter())
            .map(|(&(gene, sign), &score)| (gene, sign, score))
    }
}
