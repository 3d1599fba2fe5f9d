//! Engine configuration.
//!
//! Every tunable of the search lives here. Missing JSON fields fall back
//! to the defaults below.
//!
//! | Field | Default | Meaning |
//! |-------|---------|---------|
//! | `population_size` | 5 | Schedules kept after selection |
//! | `bootstrap_size` | 1000 | Schedules generated per bootstrap round |
//! | `bootstrap_budget` | 9 | Generations below this rebuild an all-invalid population |
//! | `reseed_batch` | 5 | Fresh schedules added before each breeding |
//! | `guided_max_tries` | 100 | Attempts per guided mutation |
//! | `sequential_threshold_minutes` | 15 | Back-to-back gap |
//! | `crossover_tilt` | 0.1 | Exploration floor of breeding odds |
//! | `checkpoint_generation` | 10 | Generation of the keep-running prompt |
//! | `progress_interval` | 50 | Schedules between progress reports |
//! | `seed` | `None` | RNG seed (`None` = OS entropy) |

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::scoring::DEFAULT_SEQUENTIAL_THRESHOLD;

/// Tunables of the genetic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Schedules kept after selection.
    pub population_size: usize,
    /// Schedules generated per bootstrap round.
    pub bootstrap_size: usize,
    /// Generation before which a population with no valid schedule is rebuilt.
    pub bootstrap_budget: usize,
    /// Fresh random schedules added before each breeding.
    pub reseed_batch: usize,
    /// Attempts per guided mutation.
    pub guided_max_tries: usize,
    /// Maximum gap (minutes) between back-to-back sections.
    pub sequential_threshold_minutes: i32,
    /// Exploration floor of the breeding odds.
    pub crossover_tilt: f64,
    /// Generation at which a run with no valid schedule asks to continue.
    pub checkpoint_generation: usize,
    /// Schedules generated between progress reports.
    pub progress_interval: usize,
    /// RNG seed.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            bootstrap_size: 1000,
            bootstrap_budget: 9,
            reseed_batch: 5,
            guided_max_tries: 100,
            sequential_threshold_minutes: DEFAULT_SEQUENTIAL_THRESHOLD,
            crossover_tilt: 0.1,
            checkpoint_generation: 10,
            progress_interval: 50,
            seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, SchedulerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the bootstrap round size.
    pub fn with_bootstrap_size(mut self, size: usize) -> Self {
        self.bootstrap_size = size;
        self
    }

    /// Sets the number of bootstrap rounds.
    pub fn with_bootstrap_budget(mut self, rounds: usize) -> Self {
        self.bootstrap_budget = rounds;
        self
    }

    /// Sets the reseed batch size.
    pub fn with_reseed_batch(mut self, size: usize) -> Self {
        self.reseed_batch = size;
        self
    }

    /// Sets the guided mutation attempt budget.
    pub fn with_guided_max_tries(mut self, tries: usize) -> Self {
        self.guided_max_tries = tries;
        self
    }

    /// Sets the back-to-back threshold.
    pub fn with_sequential_threshold(mut self, minutes: i32) -> Self {
        self.sequential_threshold_minutes = minutes;
        self
    }

    /// Sets the breeding tilt.
    pub fn with_crossover_tilt(mut self, tilt: f64) -> Self {
        self.crossover_tilt = tilt;
        self
    }

    /// Sets the checkpoint generation.
    pub fn with_checkpoint_generation(mut self, generation: usize) -> Self {
        self.checkpoint_generation = generation;
        self
    }

    /// Sets the progress report interval.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
