use std::collections::{BTreeMap, HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    background::NullModelSampler,
    categories::{ChiSquareResult, DECategorySets},
    config::{ActivityConfig, FailurePolicy},
    enrichment::{EnrichmentScorer, RegulonQuery},
    error::{ActivityError, Result},
    math::empirical_pvalue,
    network::{select_candidates, Candidate, InteractionClassifier, Network},
    ranking::{GeneScoreIndex, RankedSignedList},
    results::{ActivityResults, CandidateFailure, CandidateScore, FisherResults},
};

/// Master regulator activity scoring
///
/// Holds the candidate regulons, the signed ranking of the differential
/// expression scores, and the up/down gene categories. All of it is built
/// once and only read by the scoring calls.
#[derive(Debug, Clone)]
pub struct ActivityScores {
    index: GeneScoreIndex,
    ranked: RankedSignedList,
    categories: DECategorySets,
    candidates: BTreeMap<String, Candidate>,
    config: ActivityConfig,
}
impl ActivityScores {
    /// Builds the engine from a regulatory network and per-gene scores
    ///
    /// Only transcriptional edges, as decided by `classifier`, contribute to
    /// a regulator's regulon.
    pub fn new<R, C>(
        network: &Network<R>,
        classifier: &C,
        scores: &HashMap<String, f64>,
        config: ActivityConfig,
    ) -> Result<Self>
    where
        C: InteractionClassifier<R> + ?Sized,
    {
        config.validate()?;
        let candidates = select_candidates(network, classifier, config.min_hub);
        Self::build(candidates, scores, config)
    }

    /// Builds the engine from precomputed regulons
    ///
    /// Regulons smaller than `config.min_hub` are dropped.
    pub fn from_candidates<I>(
        candidates: I,
        scores: &HashMap<String, f64>,
        config: ActivityConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Candidate>,
    {
        config.validate()?;
        let candidates = candidates
            .into_iter()
            .filter(|candidate| candidate.regulon_size() >= config.min_hub)
            .map(|candidate| (candidate.id.clone(), candidate))
            .collect();
        Self::build(candidates, scores, config)
    }

    fn build(
        candidates: BTreeMap<String, Candidate>,
        scores: &HashMap<String, f64>,
        config: ActivityConfig,
    ) -> Result<Self> {
        let index = GeneScoreIndex::new(scores)?;
        let ranked = RankedSignedList::new(&index);
        let categories = DECategorySets::new(&index);

        info!(
            "{} candidate regulators (min hub {}) over {} scored genes",
            candidates.len(),
            config.min_hub,
            index.len()
        );
        if candidates.is_empty() {
            warn!("no regulator meets the minimum hub size of {}", config.min_hub);
        }

        Ok(Self {
            index,
            ranked,
            categories,
            candidates,
            config,
        })
    }

    pub fn candidates(&self) -> &BTreeMap<String, Candidate> {
        &self.candidates
    }

    pub fn gene_index(&self) -> &GeneScoreIndex {
        &self.index
    }

    pub fn ranked_list(&self) -> &RankedSignedList {
        &self.ranked
    }

    pub fn categories(&self) -> &DECategorySets {
        &self.categories
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    pub fn scorer(&self) -> EnrichmentScorer<'_> {
        EnrichmentScorer::new(&self.index, &self.ranked)
    }

    /// Running-sum enrichment of an arbitrary signed regulon
    pub fn score_regulon(
        &self,
        positive: &HashSet<String>,
        negative: &HashSet<String>,
    ) -> Result<f64> {
        self.scorer().score(positive, negative)
    }

    /// Null distribution of the enrichment score for a candidate
    pub fn background(&self, candidate: &str, nperms: usize) -> Result<Vec<f64>> {
        let (position, candidate) = self.lookup(candidate)?;
        let query = self.query(candidate);
        self.sampler(position)
            .generate_background(query.n_positive(), query.n_negative(), nperms)
    }

    /// Score and empirical p-value of a single candidate, unfiltered
    pub fn score_candidate(&self, candidate: &str, nperms: usize) -> Result<CandidateScore> {
        let (position, candidate) = self.lookup(candidate)?;
        self.process_candidate(position, candidate, nperms)
    }

    /// Scores every candidate and keeps those with `pvalue < threshold`
    ///
    /// Candidates that fail to score are reported in
    /// [`ActivityResults::failures`], unless the engine is configured with
    /// [`FailurePolicy::FailFast`], in which case the first failure (in
    /// candidate order) is returned.
    pub fn score_candidates(&self, threshold: f64, nperms: usize) -> Result<ActivityResults> {
        if threshold.is_nan() {
            return Err(ActivityError::InvalidArgument(
                "threshold must not be NaN".to_string(),
            ));
        }

        let candidates = self.candidates.values().collect::<Vec<_>>();
        let outcomes = candidates
            .par_iter()
            .enumerate()
            .map(|(position, candidate)| self.process_candidate(position, candidate, nperms))
            .collect::<Vec<_>>();

        let mut significant = Vec::new();
        let mut failures = Vec::new();
        for (candidate, outcome) in candidates.iter().zip(outcomes) {
            match outcome {
                Ok(result) if result.pvalue < threshold => significant.push(result),
                Ok(_) => {}
                Err(error) => {
                    if self.config.failure_policy == FailurePolicy::FailFast {
                        return Err(error);
                    }
                    warn!("skipping candidate {}: {}", candidate.id, error);
                    failures.push(CandidateFailure::new(candidate.id.clone(), error));
                }
            }
        }

        info!(
            "{} of {} candidates significant at p < {} ({} failed)",
            significant.len(),
            candidates.len(),
            threshold,
            failures.len()
        );
        Ok(ActivityResults::from_vec(significant, failures))
    }

    /// Categorical up/down test of an arbitrary signed regulon
    pub fn score_chisq(
        &self,
        positive: &HashSet<String>,
        negative: &HashSet<String>,
    ) -> ChiSquareResult {
        self.categories.score_chisq(positive, negative)
    }

    /// Categorical test of every candidate, without filtering
    pub fn score_candidates_fisher(&self) -> FisherResults {
        let results = self
            .candidates
            .par_iter()
            .map(|(id, candidate)| {
                let result = self.score_chisq(&candidate.positive_targets, &candidate.negative_targets);
                debug!("{}: combined p = {}", id, result.combined_pvalue);
                (id.clone(), result)
            })
            .collect::<Vec<_>>();
        FisherResults::from_vec(results)
    }

    /// Scores a candidate against its own permutation background
    ///
    /// `position` selects the candidate's seed so backgrounds do not depend
    /// on the order candidates are processed in.
    fn process_candidate(
        &self,
        position: usize,
        candidate: &Candidate,
        nperms: usize,
    ) -> Result<CandidateScore> {
        let query = self.query(candidate);
        let score = self.scorer().score_query(&query)?;
        let background = self.sampler(position).generate_background(
            query.n_positive(),
            query.n_negative(),
            nperms,
        )?;
        let pvalue = empirical_pvalue(score, &background);
        debug!("{}: score = {}, p = {}", candidate.id, score, pvalue);

        Ok(CandidateScore::builder()
            .candidate(candidate.id.clone())
            .score(score)
            .pvalue(pvalue)
            .n_positive(query.n_positive())
            .n_negative(query.n_negative())
            .build())
    }

    fn lookup(&self, candidate: &str) -> Result<(usize, &Candidate)> {
        self.candidates
            .values()
            .enumerate()
            .find(|(_, c)| c.id == candidate)
            .ok_or_else(|| {
                ActivityError::InvalidArgument(format!("unknown candidate: {candidate}"))
            })
    }

    fn query(&self, candidate: &Candidate) -> RegulonQuery {
        RegulonQuery::from_genes(
            &candidate.positive_targets,
            &candidate.negative_targets,
            &self.index,
        )
    }

    fn sampler(&self, position: usize) -> NullModelSampler<'_> {
        NullModelSampler::new(
            self.scorer(),
            self.config.seed.wrapping_add(position as u64),
        )
    }
}
