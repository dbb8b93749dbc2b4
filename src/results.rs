use std::collections::BTreeMap;

use bon::Builder;
use derive_new::new;

use crate::{categories::ChiSquareResult, error::ActivityError};

/// Enrichment score and empirical significance of one candidate
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct CandidateScore {
    pub candidate: String,
    pub score: f64,
    pub pvalue: f64,
    /// Activated targets present in the ranked list
    pub n_positive: usize,
    /// Repressed targets present in the ranked list
    pub n_negative: usize,
}

/// A candidate that could not be scored
#[derive(Debug, Clone, PartialEq, new)]
pub struct CandidateFailure {
    pub candidate: String,
    pub error: ActivityError,
}

/// Significant candidates of a batch run, sorted by candidate id
#[derive(Debug, Clone, Default)]
pub struct ActivityResults {
    pub candidates: Vec<String>,
    pub scores: Vec<f64>,
    pub pvalues: Vec<f64>,
    pub n_positive: Vec<usize>,
    pub n_negative: Vec<usize>,
    /// Candidates skipped because scoring failed
    pub failures: Vec<CandidateFailure>,
}
impl ActivityResults {
    pub fn from_vec(mut results: Vec<CandidateScore>, failures: Vec<CandidateFailure>) -> Self {
        let mut table = Self {
            failures,
            ..Default::default()
        };

        results.sort_unstable_by(|a, b| a.candidate.cmp(&b.candidate));
        for result in results {
            table.candidates.push(result.candidate);
            table.scores.push(result.score);
            table.pvalues.push(result.pvalue);
            table.n_positive.push(result.n_positive);
            table.n_negative.push(result.n_negative);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate id -> (score, p-value)
    pub fn to_map(&self) -> BTreeMap<String, (f64, f64)> {
        self.candidates
            .iter()
            .zip(self.scores.iter().zip(self.pvalues.iter()))
            .map(|(candidate, (&score, &pvalue))| (candidate.clone(), (score, pvalue)))
            .collect()
    }

    pub fn pprint(&self) {
        println!("Candidate\tScore\tPValue\tNPositive\tNNegative");
        for i in 0..self.candidates.len() {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                self.candidates[i],
                self.scores[i],
                self.pvalues[i],
                self.n_positive[i],
                self.n_negative[i]
            );
        }
    }
}

/// Categorical test results of every candidate, sorted by candidate id
#[derive(Debug, Clone, Default)]
pub struct FisherResults {
    pub candidates: Vec<String>,
    pub up_pvalues: Vec<f64>,
    pub down_pvalues: Vec<f64>,
    pub combined_pvalues: Vec<f64>,
}
impl FisherResults {
    pub fn from_vec(mut results: Vec<(String, ChiSquareResult)>) -> Self {
        let mut table = Self::default();

        results.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        for (candidate, result) in results {
            table.candidates.push(candidate);
            table.up_pvalues.push(result.up_pvalue);
            table.down_pvalues.push(result.down_pvalue);
            table.combined_pvalues.push(result.combined_pvalue);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate id -> combined p-value
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.candidates
            .iter()
            .cloned()
            .zip(self.combined_pvalues.iter().copied())
            .collect()
    }

    pub fn pprint(&self) {
        println!("Candidate\tUpPValue\tDownPValue\tCombinedPValue");
        for i in 0..self.candidates.len() {
            println!(
                "{}\t{}\t{}\t{}",
                self.candidates[i],
                self.up_pvalues[i],
                self.down_pvalues[i],
                self.combined_pvalues[i]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(candidate: &str, score: f64, pvalue: f64) -> CandidateScore {
        CandidateScore::builder()
            .candidate(candidate.to_string())
            .score(score)
            .pvalue(pvalue)
            .n_positive(3)
            .n_negative(1)
            .build()
    }

    #[test]
    fn test_activity_results_sorted_by_candidate() {
        let results = ActivityResults::from_vec(
            vec![score("TP53", -0.4, 0.01), score("MYC", 0.6, 0.002)],
            vec![CandidateFailure::new(
                "E2F1".to_string(),
                ActivityError::EmptyQueryOverlap,
            )],
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results.candidates, vec!["MYC", "TP53"]);
        assert_eq!(results.scores, vec![0.6, -0.4]);
        assert_eq!(results.failures.len(), 1);

        let map = results.to_map();
        assert_eq!(map["TP53"], (-0.4, 0.01));
        assert_eq!(map["MYC"], (0.6, 0.002));
    }

    #[test]
    fn test_fisher_results_map() {
        let result = ChiSquareResult {
            up_pvalue: 0.5,
            down_pvalue: 0.2,
            combined_pvalue: 0.1,
        };
        let results = FisherResults::from_vec(vec![
            ("STAT3".to_string(), result),
            ("FOXM1".to_string(), result),
        ]);
        assert_eq!(results.candidates, vec!["FOXM1", "STAT3"]);
        assert_eq!(results.to_map()["STAT3"], 0.1);
        assert!(!results.is_empty());
    }
}
