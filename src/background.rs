use derive_new::new;
use rand::{seq::IteratorRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::{
    enrichment::{EnrichmentScorer, RegulonQuery},
    error::{ActivityError, Result},
};

/// Draws size-matched random regulons to build an empirical null distribution
///
/// Each permutation owns a ChaCha stream of the sampler's seed, so a
/// background is reproducible regardless of how rayon schedules the draws.
#[derive(new, Clone, Copy)]
pub struct NullModelSampler<'a> {
    scorer: EnrichmentScorer<'a>,
    seed: u64,
}
impl NullModelSampler<'_> {
    /// Scores `nperms` random regulons with `n_positive` activated and `n_negative`
    /// repressed members.
    ///
    /// The two sides are drawn independently, so a gene may land in both.
    pub fn generate_background(
        &self,
        n_positive: usize,
        n_negative: usize,
        nperms: usize,
    ) -> Result<Vec<f64>> {
        let universe = self.scorer.universe_size();
        for requested in [n_positive, n_negative] {
            if requested > universe {
                return Err(ActivityError::SamplingImpossible {
                    requested,
                    universe,
                });
            }
        }

        (0..nperms)
            .into_par_iter()
            .map(|perm| self.draw(perm, n_positive, n_negative))
            .collect()
    }

    /// Scores one random regulon
    ///
    /// A draw whose sampled genes all score zero carries no evidence either
    /// way and scores 0.0 instead of failing the whole background.
    fn draw(&self, perm: usize, n_positive: usize, n_negative: usize) -> Result<f64> {
        let (sampled_positive, sampled_negative) = self.sample(perm, n_positive, n_negative);
        let query = RegulonQuery::from_indices(
            &sampled_positive,
            &sampled_negative,
            self.scorer.universe_size(),
        );
        match self.scorer.score_query(&query) {
            Err(ActivityError::EmptyQueryOverlap) => Ok(0.0),
            outcome => outcome,
        }
    }

    fn sample(&self, perm: usize, n_positive: usize, n_negative: usize) -> (Vec<usize>, Vec<usize>) {
        let universe = self.scorer.universe_size();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(perm as u64);

        let sampled_positive = (0..universe).choose_multiple(&mut rng, n_positive);
        let sampled_negative = (0..universe).choose_multiple(&mut rng, n_negative);
        (sampled_positive, sampled_negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ranking::{GeneScoreIndex, RankedSignedList},
        utils::score_map,
    };

    fn fixture() -> (GeneScoreIndex, RankedSignedList) {
        let pairs = (0..50)
            .map(|i| (format!("g{i}"), (i as f64 - 24.5) / 3.0))
            .collect::<Vec<_>>();
        let borrowed = pairs
            .iter()
            .map(|(g, s)| (g.as_str(), *s))
            .collect::<Vec<_>>();
        let index = GeneScoreIndex::new(&score_map(&borrowed)).unwrap();
        let ranked = RankedSignedList::new(&index);
        (index, ranked)
    }

    #[test]
    fn test_background_length_and_range() {
        let (index, ranked) = fixture();
        let sampler = NullModelSampler::new(EnrichmentScorer::new(&index, &ranked), 7);
        let background = sampler.generate_background(6, 4, 200).unwrap();
        assert_eq!(background.len(), 200);
        assert!(background.iter().all(|b| b.abs() <= 1.0 + 1e-12));
    }

    #[test]
    fn test_background_reproducible() {
        let (index, ranked) = fixture();
        let scorer = EnrichmentScorer::new(&index, &ranked);
        let first = NullModelSampler::new(scorer, 11)
            .generate_background(5, 5, 100)
            .unwrap();
        let second = NullModelSampler::new(scorer, 11)
            .generate_background(5, 5, 100)
            .unwrap();
        let other = NullModelSampler::new(scorer, 12)
            .generate_background(5, 5, 100)
            .unwrap();
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_permutations_are_not_identical() {
        let (index, ranked) = fixture();
        let sampler = NullModelSampler::new(EnrichmentScorer::new(&index, &ranked), 3);
        let background = sampler.generate_background(5, 5, 50).unwrap();
        assert!(background.iter().any(|b| *b != background[0]));
    }

    #[test]
    fn test_sampling_impossible() {
        let (index, ranked) = fixture();
        let sampler = NullModelSampler::new(EnrichmentScorer::new(&index, &ranked), 0);
        assert_eq!(
            sampler.generate_background(51, 0, 10),
            Err(ActivityError::SamplingImpossible {
                requested: 51,
                universe: 50
            })
        );
    }

    #[test]
    fn test_zero_score_draws_carry_no_evidence() {
        // five signal genes among 195 genes scored exactly zero
        let pairs = (0..200)
            .map(|i| (format!("g{i}"), if i < 5 { 3.0 + i as f64 } else { 0.0 }))
            .collect::<Vec<_>>();
        let borrowed = pairs
            .iter()
            .map(|(g, s)| (g.as_str(), *s))
            .collect::<Vec<_>>();
        let index = GeneScoreIndex::new(&score_map(&borrowed)).unwrap();
        let ranked = RankedSignedList::new(&index);
        let sampler = NullModelSampler::new(EnrichmentScorer::new(&index, &ranked), 9);

        let background = sampler.generate_background(1, 0, 1000).unwrap();
        assert_eq!(background.len(), 1000);
        assert!(background.iter().any(|&b| b == 0.0));
        assert!(background.iter().any(|&b| b > 0.0));
    }

    #[test]
    fn test_sides_drawn_independently() {
        let index = GeneScoreIndex::new(&score_map(&[("a", 1.), ("b", -1.), ("c", 2.), ("d", -3.)]))
            .unwrap();
        let ranked = RankedSignedList::new(&index);
        let sampler = NullModelSampler::new(EnrichmentScorer::new(&index, &ranked), 4);

        let mut overlapping = 0;
        for perm in 0..200 {
            let (positive, negative) = sampler.sample(perm, 2, 2);
            assert_ne!(positive[0], positive[1]);
            assert_ne!(negative[0], negative[1]);
            if positive.iter().any(|g| negative.contains(g)) {
                overlapping += 1;
            }
        }
        // a shared gene is allowed but not forced
        assert!(overlapping > 0);
        assert!(overlapping < 200);
    }

    #[test]
    fn test_zero_permutations() {
        let (index, ranked) = fixture();
        let sampler = NullModelSampler::new(EnrichmentScorer::new(&index, &ranked), 0);
        assert!(sampler.generate_background(3, 3, 0).unwrap().is_empty());
    }
}
