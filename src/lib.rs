//! mrscore: Master Regulator Activity Scoring
//!
//! This library identifies candidate master regulators: transcription factors
//! whose transcriptional regulon shows coordinated differential expression.
//!
//! Every gene's differential expression score is placed twice on a combined
//! signed ranking, once as evidence of up-regulation and once (negated) as
//! evidence of down-regulation. A regulon's activated targets are looked up on
//! the first copy and its repressed targets on the second, and a running-sum
//! statistic measures how strongly they concentrate at the top or bottom of the
//! ranking. Significance comes from size-matched random regulons.
//!
//! The main components of this library are:
//! - `ActivityScores`: candidate selection and batch scoring
//! - `ActivityConfig`: construction parameters
//! - `EnrichmentScorer`: the running-sum statistic over a `RankedSignedList`
//! - `NullModelSampler`: permutation backgrounds
//! - `DECategorySets`: the faster chi-square up/down test
//! - `ActivityResults` / `FisherResults`: result tables

mod activity;
mod background;
mod categories;
mod config;
mod enrichment;
mod error;
mod math;
mod network;
mod ranking;
mod results;
mod utils;

pub use activity::ActivityScores;
pub use background::NullModelSampler;
pub use categories::{ChiSquareResult, DECategorySets};
pub use config::{
    ActivityConfig, FailurePolicy, DEFAULT_MIN_HUB, DEFAULT_NPERMS, DEFAULT_THRESHOLD,
};
pub use enrichment::{EnrichmentScorer, RegulonQuery};
pub use error::{ActivityError, Result};
pub use math::{chisquare_pvalue, empirical_pvalue};
pub use network::{
    select_candidates, Candidate, InteractionClassifier, InteractionType, Network,
    RegulationMode,
};
pub use ranking::{GeneScoreIndex, RankedSignedList, Sign};
pub use results::{ActivityResults, CandidateFailure, CandidateScore, FisherResults};
