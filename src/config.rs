use bon::Builder;

use crate::error::{ActivityError, Result};

pub const DEFAULT_MIN_HUB: usize = 10;
pub const DEFAULT_NPERMS: usize = 1000;
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// How batch scoring reacts to a candidate that cannot be scored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure in the diagnostics and keep going
    #[default]
    Collect,
    /// Abort the batch on the first failure
    FailFast,
}

/// Construction parameters of the activity scoring engine
#[derive(Debug, Clone, Copy, Builder)]
pub struct ActivityConfig {
    /// Minimum number of transcriptional targets for a regulator to be a candidate
    #[builder(default = DEFAULT_MIN_HUB)]
    pub min_hub: usize,

    /// Running-sum exponent.
    ///
    /// Kept for power-weighted variants of the statistic; the current
    /// statistic weights each hit by its raw score.
    #[builder(default = 1.0)]
    pub power: f64,

    /// Base seed of the permutation streams
    #[builder(default = 0)]
    pub seed: u64,

    #[builder(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ActivityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_hub == 0 {
            return Err(ActivityError::InvalidArgument(
                "min_hub must be at least 1".to_string(),
            ));
        }
        if !self.power.is_finite() {
            return Err(ActivityError::InvalidArgument(format!(
                "power must be finite, got {}",
                self.power
            )));
        }
        Ok(())
    }
}
