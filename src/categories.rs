use std::collections::HashSet;

use itertools::{Either, Itertools};

use crate::{math::chisquare_pvalue, ranking::GeneScoreIndex};

/// Genes binned by direction of differential expression
///
/// A gene with a positive score is up, everything else (including zero) is down.
#[derive(Debug, Clone)]
pub struct DECategorySets {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

/// Outcome of the categorical regulon test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareResult {
    /// Goodness-of-fit p-value of the activated targets
    pub up_pvalue: f64,
    /// Goodness-of-fit p-value of the repressed targets
    pub down_pvalue: f64,
    /// Product of the two one-sided p-values
    pub combined_pvalue: f64,
}

impl DECategorySets {
    pub fn new(index: &GeneScoreIndex) -> Self {
        let (positive, negative): (HashSet<String>, HashSet<String>) = index
            .genes()
            .iter()
            .enumerate()
            .partition_map(|(i, gene)| {
                if index.score(i) > 0.0 {
                    Either::Left(gene.clone())
                } else {
                    Either::Right(gene.clone())
                }
            });
        Self { positive, negative }
    }

    pub fn positive(&self) -> &HashSet<String> {
        &self.positive
    }

    pub fn negative(&self) -> &HashSet<String> {
        &self.negative
    }

    /// Expected proportions of up and down genes under random regulation
    pub fn frequencies(&self) -> [f64; 2] {
        let n_up = self.positive.len() as f64;
        let total = n_up + self.negative.len() as f64;
        if total == 0.0 {
            return [0.0, 0.0];
        }
        let s1 = n_up / total;
        [s1, 1.0 - s1]
    }

    /// Chi-square approximation to Fisher's exact test on a regulon
    ///
    /// Both sides compare `(in up, in down)` counts against the genome-wide
    /// frequencies; the combined value is the plain product of both p-values.
    pub fn score_chisq(
        &self,
        positive_query: &HashSet<String>,
        negative_query: &HashSet<String>,
    ) -> ChiSquareResult {
        let frequencies = self.frequencies();

        let up_observed = [
            positive_query.intersection(&self.positive).count() as f64,
            positive_query.intersection(&self.negative).count() as f64,
        ];
        let down_observed = [
            negative_query.intersection(&self.positive).count() as f64,
            negative_query.intersection(&self.negative).count() as f64,
        ];

        let up_pvalue = chisquare_pvalue(&up_observed, &frequencies);
        let down_pvalue = chisquare_pvalue(&down_observed, &frequencies);
        ChiSquareResult {
            up_pvalue,
            down_pvalue,
            combined_pvalue: up_pvalue * down_pvalue,
        }
    }
}
