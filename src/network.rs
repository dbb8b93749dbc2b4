use std::collections::{BTreeMap, HashMap, HashSet};

use derive_new::new;
use tracing::trace;

/// Regulatory network: source regulator to its `(interaction record, target)` edges
pub type Network<R> = HashMap<String, Vec<(R, String)>>;

/// Sign of a regulatory interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    Activation,
    Repression,
}
impl InteractionType {
    /// Maps the conventional `+1` / `-1` encoding, rejecting anything else
    pub fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            1 => Some(Self::Activation),
            -1 => Some(Self::Repression),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegulationMode {
    Transcriptional,
    Other,
}

/// Maps a raw interaction record to its sign and mode.
///
/// Returning `None` marks the record as unclassifiable; it is then ignored
/// the same way as a non-transcriptional edge. Any `Fn(&R) -> Option<(InteractionType, RegulationMode)>`
/// is a classifier.
pub trait InteractionClassifier<R> {
    fn classify(&self, record: &R) -> Option<(InteractionType, RegulationMode)>;
}
impl<R, F> InteractionClassifier<R> for F
where
    F: Fn(&R) -> Option<(InteractionType, RegulationMode)>,
{
    fn classify(&self, record: &R) -> Option<(InteractionType, RegulationMode)> {
        self(record)
    }
}

/// A master regulator candidate and its transcriptional regulon
#[derive(Debug, Clone, PartialEq, new)]
pub struct Candidate {
    /// Regulator identifier
    pub id: String,
    /// Targets activated by the regulator
    pub positive_targets: HashSet<String>,
    /// Targets repressed by the regulator
    pub negative_targets: HashSet<String>,
}
impl Candidate {
    pub fn regulon_size(&self) -> usize {
        self.positive_targets.len() + self.negative_targets.len()
    }
}

/// Selects the regulators whose transcriptional regulon holds at least `min_hub` targets
///
/// Non-transcriptional and unclassifiable edges are dropped before counting.
pub fn select_candidates<R, C>(
    network: &Network<R>,
    classifier: &C,
    min_hub: usize,
) -> BTreeMap<String, Candidate>
where
    C: InteractionClassifier<R> + ?Sized,
{
    let mut candidates = BTreeMap::new();
    for (source, edges) in network {
        let mut positive_regulon = HashSet::new();
        let mut negative_regulon = HashSet::new();
        for (record, target) in edges {
            match classifier.classify(record) {
                Some((InteractionType::Activation, RegulationMode::Transcriptional)) => {
                    positive_regulon.insert(target.clone());
                }
                Some((InteractionType::Repression, RegulationMode::Transcriptional)) => {
                    negative_regulon.insert(target.clone());
                }
                Some((_, RegulationMode::Other)) => {}
                None => trace!("unclassified interaction {} -> {}", source, target),
            }
        }

        let candidate = Candidate::new(source.clone(), positive_regulon, negative_regulon);
        if candidate.regulon_size() >= min_hub {
            candidates.insert(source.clone(), candidate);
        }
    }
    candidates
}
