use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{PageError, Result};
use crate::exercise_engine::timer::Millis;

/// Tunables shared by every instance mounted on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// `Some` makes every shuffle reproducible; `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
    pub match_confirm_ms: Millis,
    pub mismatch_clear_ms: Millis,
    pub completion_summary_ms: Millis,
    pub tick_interval_ms: Millis,
    /// Expected items per bucket for Sort layouts that carry no bucket tags.
    pub sort_fallback_per_bucket: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rng_seed: None,
            match_confirm_ms: 1500,
            mismatch_clear_ms: 1000,
            completion_summary_ms: 500,
            tick_interval_ms: 1000,
            sort_fallback_per_bucket: 2,
        }
    }
}

impl EngineConfig {
    /// Minimal constructor for reproducible runs; everything else defaults.
    pub fn seeded(seed: u64) -> Self {
        EngineConfig { rng_seed: Some(seed), ..Self::default() }
    }

    pub fn from_json(doc: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(doc)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(PageError::Config("tick_interval_ms must be positive".into()));
        }
        Ok(())
    }

    /// RNG for the instance mounted `mount_index`-th on the page.
    ///
    /// Seeded configs mix the index in so sibling instances differ but stay
    /// reproducible.
    pub fn rng_for(&self, mount_index: usize) -> StdRng {
        match self.rng_seed {
            Some(seed) => {
                let mixed = seed ^ (mount_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                StdRng::seed_from_u64(mixed)
            }
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn missing_fields_take_defaults() {
        let c = EngineConfig::from_json(r#"{ "rng_seed": 5 }"#).unwrap();
        assert_eq!(c.rng_seed, Some(5));
        assert_eq!(c.match_confirm_ms, 1500);
        assert_eq!(c.mismatch_clear_ms, 1000);
        assert_eq!(c.completion_summary_ms, 500);
        assert_eq!(c.sort_fallback_per_bucket, 2);
    }

    #[test]
    fn unknown_fields_and_zero_interval_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "colour": "blue" }"#),
            Err(PageError::Json(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "tick_interval_ms": 0 }"#),
            Err(PageError::Config(_))
        ));
    }

    #[test]
    fn seeded_instances_differ_but_repeat() {
        let c = EngineConfig::seeded(11);
        assert_eq!(c.rng_for(0).next_u64(), c.rng_for(0).next_u64());
        assert_ne!(c.rng_for(0).next_u64(), c.rng_for(1).next_u64());
    }
}
