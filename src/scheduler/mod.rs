//! The timetabling engine and its generational loop.
//!
//! # Submodules
//!
//! - `engine`: [`Scheduler`], the constraint registry, population
//!   generation and breeding
//! - `evolution`: the generation state machine with pause/resume
//! - `config`: [`SchedulerConfig`] tunables
//! - `progress`: the [`ProgressReporter`] capability
//! - `kpi`: [`ScheduleKpi`] quality metrics
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"
//! - McCollum et al. (2010), "Setting the research agenda in automated
//!   timetabling"

mod config;
mod engine;
mod evolution;
mod kpi;
mod progress;

pub use config::SchedulerConfig;
pub use engine::Scheduler;
pub use evolution::{PauseSnapshot, RunOutcome, RunPhase, RunState};
pub use kpi::ScheduleKpi;
pub use progress::{NoopReporter, ProgressReporter};
