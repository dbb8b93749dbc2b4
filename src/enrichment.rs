use std::collections::HashSet;

use crate::{
    error::{ActivityError, Result},
    ranking::{GeneScoreIndex, RankedSignedList, Sign},
    utils::{count_members, membership_mask},
};

/// A signed regulon query resolved against the gene universe
///
/// Positive members are hits at their [`Sign::Positive`] position, negative
/// members at their [`Sign::Negative`] position.
#[derive(Debug, Clone)]
pub struct RegulonQuery {
    positive: Vec<bool>,
    negative: Vec<bool>,
    n_positive: usize,
    n_negative: usize,
}
impl RegulonQuery {
    /// Builds a query from gene indices of a universe of `universe` genes
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= universe`.
    pub fn from_indices(positive: &[usize], negative: &[usize], universe: usize) -> Self {
        let positive = membership_mask(positive, universe);
        let negative = membership_mask(negative, universe);
        let n_positive = count_members(&positive);
        let n_negative = count_members(&negative);
        Self {
            positive,
            negative,
            n_positive,
            n_negative,
        }
    }

    /// Genes missing from the index are dropped and do not count toward the query size
    pub fn from_genes(
        positive: &HashSet<String>,
        negative: &HashSet<String>,
        index: &GeneScoreIndex,
    ) -> Self {
        Self::from_indices(
            &index.resolve(positive),
            &index.resolve(negative),
            index.len(),
        )
    }

    pub fn n_positive(&self) -> usize {
        self.n_positive
    }

    pub fn n_negative(&self) -> usize {
        self.n_negative
    }

    pub fn size(&self) -> usize {
        self.n_positive + self.n_negative
    }

    fn is_hit(&self, gene: usize, sign: Sign) -> bool {
        match sign {
            Sign::Positive => self.positive[gene],
            Sign::Negative => self.negative[gene],
        }
    }
}

/// Signed running-sum enrichment of a regulon over the ranked list
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentScorer<'a> {
    index: &'a GeneScoreIndex,
    ranked: &'a RankedSignedList,
}
impl<'a> EnrichmentScorer<'a> {
    pub fn new(index: &'a GeneScoreIndex, ranked: &'a RankedSignedList) -> Self {
        Self { index, ranked }
    }

    pub fn universe_size(&self) -> usize {
        self.ranked.universe_size()
    }

    /// Scores a regulon given as gene identifiers
    pub fn score(&self, positive: &HashSet<String>, negative: &HashSet<String>) -> Result<f64> {
        self.score_query(&RegulonQuery::from_genes(positive, negative, self.index))
    }

    /// Scores a resolved regulon
    ///
    /// Walks the ranked list adding `|score| / norm` on hits and subtracting
    /// `1 / (len - query size)` on misses. Returns the sum of the maximum and
    /// minimum excursions, which lies in `[-1, 1]`.
    ///
    /// Hits with a negative key (e.g. an activated target that is strongly
    /// down) are counted by magnitude, so such regulons score higher than a
    /// signed `score / norm` increment would give.
    pub fn score_query(&self, query: &RegulonQuery) -> Result<f64> {
        let ranked_len = self.ranked.len();
        if query.size() >= ranked_len {
            return Err(ActivityError::InvalidQuerySize {
                query_size: query.size(),
                ranked_len,
            });
        }
        let rs_const = (ranked_len - query.size()) as f64;

        let norm_const = self
            .ranked
            .iter()
            .filter(|&(gene, sign, _)| query.is_hit(gene, sign))
            .map(|(_, _, score)| score.abs())
            .sum::<f64>();
        if norm_const == 0.0 {
            return Err(ActivityError::EmptyQueryOverlap);
        }

        let mut running_sum = 0.0_f64;
        let mut max_rs = 0.0_f64;
        let mut min_rs = 0.0_f64;
        for (gene, sign, score) in self.ranked.iter() {
            if query.is_hit(gene, sign) {
                // increments sum to exactly one over the walk
                running_sum += score.abs() / norm_const;
            } else {
                running_sum -= 1.0 / rs_const;
            }
            max_rs = max_rs.max(running_sum);
            min_rs = min_rs.min(running_sum);
        }

        Ok(max_rs + min_rs)
    }
}
