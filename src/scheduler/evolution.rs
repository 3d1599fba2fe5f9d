//! Generational loop.
//!
//! # State machine
//!
//! ```text
//!              ┌──────────────┐ empty, or no valid schedule
//!   start ───► │  Generating  │ ◄──── within the bootstrap budget
//!              └──────┬───────┘
//!                     ▼
//!              ┌──────────────┐ keep top N, valid first;
//!              │  Selecting   │ guided mutation on stagnation
//!              └──────┬───────┘
//!                     ▼
//!              ┌──────────────┐ reseed, rescore, breed
//!              │   Breeding   │ ───► next generation
//!              └──────────────┘
//!
//!   terminal: Converged | TimeExpired | Paused
//! ```
//!
//! Each [`Scheduler::step`] runs one generation and returns the next
//! [`RunState`]; [`Scheduler::evolve`] steps until a terminal phase.
//!
//! A run with no valid schedule at the checkpoint generation asks the
//! reporter whether to continue. Declining pauses the run; the returned
//! [`PauseSnapshot`] resumes it later if the constraint set is unchanged.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::engine::Scheduler;
use super::progress::ProgressReporter;
use crate::error::SchedulerError;
use crate::ga::guided_mutate;
use crate::models::{Constraint, Schedule};
use crate::scoring::EvalContext;

/// Phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    /// Bootstrapping random schedules.
    Generating,
    /// Culling to the best schedules.
    Selecting,
    /// Reseeding and crossing over.
    Breeding,
    /// The best schedules reached the maximum fitness.
    Converged,
    /// The time budget ran out.
    TimeExpired,
    /// The reporter declined to continue.
    Paused,
}

impl RunPhase {
    /// Whether the run has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Converged | RunPhase::TimeExpired | RunPhase::Paused)
    }
}

/// Progress of a run, threaded through [`Scheduler::step`].
#[derive(Debug, Clone)]
pub struct RunState {
    /// Current phase.
    pub phase: RunPhase,
    /// Generations completed.
    pub generation: usize,
    /// Valid schedules seen at the last selection.
    pub valid_count: usize,
    /// When the run (or its resumption) started.
    pub started: Instant,
    /// Time budget from `started`.
    pub limit: Duration,
}

impl RunState {
    /// A fresh run with a time budget.
    pub fn new(limit: Duration) -> Self {
        Self {
            phase: RunPhase::Generating,
            generation: 0,
            valid_count: 0,
            started: Instant::now(),
            limit,
        }
    }

    /// Continues a paused run.
    pub fn resume(snapshot: &PauseSnapshot) -> Self {
        Self {
            generation: snapshot.generation,
            ..Self::new(snapshot.remaining)
        }
    }

    /// Time since `started`.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the budget is spent.
    pub fn expired(&self) -> bool {
        self.elapsed() > self.limit
    }
}

/// What a paused run needs to resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseSnapshot {
    /// Unspent time budget.
    pub remaining: Duration,
    /// Generations completed before the pause.
    pub generation: usize,
    /// Names of the constraints registered at the pause.
    pub constraint_names: Vec<String>,
}

impl PauseSnapshot {
    /// Whether `constraints` carries the same names (as a multiset).
    pub fn matches(&self, constraints: &[Constraint]) -> bool {
        name_counts(self.constraint_names.iter().map(String::as_str))
            == name_counts(constraints.iter().map(|c| c.name.as_str()))
    }

    /// Serializes to JSON.
    pub fn to_json(&self) -> Result<String, SchedulerError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses from JSON.
    pub fn from_json(json: &str) -> Result<Self, SchedulerError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn name_counts<'a>(names: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Terminal phase.
    pub phase: RunPhase,
    /// Generations completed.
    pub generations: usize,
    /// Time spent in this invocation.
    pub elapsed: Duration,
    /// Valid schedules in the final population.
    pub valid_count: usize,
    /// Fitness of the best schedule, if any.
    pub best_fitness: Option<f64>,
    /// Resume point when the run was paused.
    pub pause: Option<PauseSnapshot>,
}

impl Scheduler {
    /// Runs generations until convergence, time expiry or a pause.
    ///
    /// With `resume` given and the constraint set unchanged, the run picks
    /// up the population and remaining time of the paused run. Otherwise
    /// the population is discarded and bootstrapping starts over.
    pub fn evolve(
        &mut self,
        time_limit: Duration,
        reporter: &mut dyn ProgressReporter,
        resume: Option<PauseSnapshot>,
    ) -> Result<RunOutcome, SchedulerError> {
        let mut state = match resume {
            Some(snapshot) if snapshot.matches(&self.constraints) => {
                log::info!(
                    "resuming at generation {} with {:?} left",
                    snapshot.generation,
                    snapshot.remaining
                );
                RunState::resume(&snapshot)
            }
            other => {
                if other.is_some() {
                    log::info!("constraints changed since the pause; starting over");
                }
                self.population.clear();
                RunState::new(time_limit)
            }
        };

        while !state.phase.is_terminal() {
            state = self.step(state, reporter)?;
        }

        let outcome = RunOutcome {
            phase: state.phase,
            generations: state.generation,
            elapsed: state.elapsed(),
            valid_count: self.population.iter().filter(|s| s.valid).count(),
            best_fitness: self.best_schedule().map(|s| s.fitness),
            pause: (state.phase == RunPhase::Paused).then(|| PauseSnapshot {
                remaining: state.limit.saturating_sub(state.elapsed()),
                generation: state.generation,
                constraint_names: self.constraints.iter().map(|c| c.name.clone()).collect(),
            }),
        };
        log::info!(
            "run ended {:?} after {} generations ({} valid)",
            outcome.phase,
            outcome.generations,
            outcome.valid_count
        );
        reporter.on_finished(&outcome);
        Ok(outcome)
    }

    /// Runs one generation.
    ///
    /// Drops incomplete schedules and rescores the rest. Bootstraps while
    /// the population is empty, or has no valid member within the
    /// bootstrap budget. Otherwise selects, checks for stagnation and
    /// convergence, then reseeds and breeds.
    pub fn step(
        &mut self,
        mut state: RunState,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<RunState, SchedulerError> {
        if state.phase.is_terminal() {
            return Ok(state);
        }

        self.population.retain(|s| s.complete);
        self.score_population();
        let valid = self.population.iter().filter(|s| s.valid).count();

        if self.population.is_empty() || (valid == 0 && state.generation < self.config.bootstrap_budget) {
            state.phase = RunPhase::Generating;
            reporter.on_phase(state.phase);
            if self.population.len() >= self.config.bootstrap_size {
                self.population.clear();
            }

            let (started, limit) = (state.started, state.limit);
            let count = self.config.bootstrap_size;
            self.generate_population_with(count, |_| reporter.report_progress(started.elapsed(), limit))?;
            state.generation += 1;
            reporter.report_progress(state.elapsed(), state.limit);
            log::info!(
                "generation {}: bootstrapped {} schedules",
                state.generation,
                self.population.len()
            );

            if state.expired() {
                self.score_population();
                state.phase = RunPhase::TimeExpired;
            }
            return Ok(state);
        }

        state.phase = RunPhase::Selecting;
        reporter.on_phase(state.phase);
        state.valid_count = valid;
        self.select();
        reporter.report_progress(state.elapsed(), state.limit);
        if state.expired() {
            state.phase = RunPhase::TimeExpired;
            return Ok(state);
        }

        let keep = self.config.population_size;
        let max_fitness = self.max_fitness();
        if keep > 0 && self.population.len() >= keep {
            let (min, avg) = top_stats(&self.population[..keep]);
            log::debug!(
                "generation {}: {} valid, top min {:.1}, top avg {:.1}, max {:.1}",
                state.generation + 1,
                valid,
                min,
                avg,
                max_fitness
            );
            if (min - avg).abs() < 1e-9 && (min - max_fitness).abs() > 1e-9 {
                self.mutate_stagnant(keep)?;
            }

            let (min, _) = top_stats(&self.population[..keep]);
            if (min - max_fitness).abs() < 1e-9 && valid >= keep {
                state.phase = RunPhase::Converged;
                return Ok(state);
            }
        }

        state.phase = RunPhase::Breeding;
        reporter.on_phase(state.phase);
        self.generate_starting_population(self.config.reseed_batch)?;
        self.score_population();
        if self.population.len() >= 2 {
            self.breed()?;
        }
        state.generation += 1;

        if state.generation == self.config.checkpoint_generation && valid == 0 {
            log::warn!("no valid schedule after {} generations", state.generation);
            if !reporter.confirm_continue() {
                state.phase = RunPhase::Paused;
            }
        }
        Ok(state)
    }

    /// Keeps the best `population_size` schedules, valid ones first, each
    /// group ordered by fitness.
    fn select(&mut self) {
        let (mut valid, mut invalid): (Vec<Schedule>, Vec<Schedule>) =
            self.population.drain(..).partition(|s| s.valid);
        valid.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        invalid.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        valid.extend(invalid);
        valid.truncate(self.config.population_size);
        self.population = valid;
    }

    /// Guided mutation of one random schedule among the top `keep`.
    fn mutate_stagnant(&mut self, keep: usize) -> Result<(), SchedulerError> {
        let choice = self.rng.random_range(0..keep);
        log::debug!("stagnation: guided mutation of schedule {choice}");

        let ctx = EvalContext::new(&self.catalog, &self.calendar)
            .with_sequential_threshold(self.config.sequential_threshold_minutes);
        let mutant = guided_mutate(
            &self.population[choice],
            &self.constraints,
            &ctx,
            self.config.guided_max_tries,
            &mut self.rng,
        )?;
        if let Some(mutant) = mutant {
            self.population[choice] = mutant;
        }
        Ok(())
    }
}

/// Minimum and mean fitness of a non-empty slice.
fn top_stats(top: &[Schedule]) -> (f64, f64) {
    let min = top.iter().map(|s| s.fitness).fold(f64::INFINITY, f64::min);
    let avg = top.iter().map(|s| s.fitness).sum::<f64>() / top.len() as f64;
    (min, avg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstraintKind, Course, Day, Room};
    use crate::scheduler::{NoopReporter, SchedulerConfig};

    struct Decline {
        asked: usize,
        phases: Vec<RunPhase>,
        finished: bool,
    }

    impl ProgressReporter for Decline {
        fn report_progress(&mut self, _elapsed: Duration, _limit: Duration) {}

        fn confirm_continue(&mut self) -> bool {
            self.asked += 1;
            false
        }

        fn on_phase(&mut self, phase: RunPhase) {
            self.phases.push(phase);
        }

        fn on_finished(&mut self, _outcome: &RunOutcome) {
            self.finished = true;
        }
    }

    fn easy() -> Scheduler {
        let courses = vec![
            Course::new("csc", "130", "001").with_instructor("shade"),
            Course::new("csc", "232", "001").with_instructor("volmar"),
            Course::new("csc", "105", "a").with_instructor("hoover").with_credit(1).with_lab(true),
        ];
        let rooms = vec![Room::new("cheek", "308").with_capacity(30), Room::new("temple", "101").with_capacity(30)];
        let mut s = Scheduler::new(
            courses,
            rooms,
            &["09:00-09:50", "10:00-10:50"],
            &["09:30-10:45", "11:00-12:15"],
            1,
            SchedulerConfig::default().with_seed(42).with_bootstrap_size(20),
        )
        .unwrap();
        s.add_universal_constraints().unwrap();
        s
    }

    /// Complete schedules that can never be valid: a three-credit course
    /// is required to meet on Monday only.
    fn hopeless() -> Scheduler {
        let courses = vec![Course::new("csc", "130", "001"), Course::new("csc", "232", "001")];
        let mut s = Scheduler::new(
            courses,
            vec![Room::new("cheek", "308")],
            &["09:00-09:50"],
            &["09:30-10:45"],
            0,
            SchedulerConfig::default().with_seed(7).with_bootstrap_size(5),
        )
        .unwrap();
        s.add_universal_constraints().unwrap();
        s.add_constraint(Constraint::mandatory(
            "monday_only",
            0,
            ConstraintKind::CourseDays {
                course: 0,
                days: vec![Day::M],
            },
        ))
        .unwrap();
        s
    }

    #[test]
    fn test_phase_terminal() {
        assert!(RunPhase::Converged.is_terminal());
        assert!(RunPhase::Paused.is_terminal());
        assert!(!RunPhase::Breeding.is_terminal());
    }

    #[test]
    fn test_evolve_converges_without_weights() {
        let mut s = easy();
        let outcome = s.evolve(Duration::from_secs(60), &mut NoopReporter, None).unwrap();
        assert_eq!(outcome.phase, RunPhase::Converged);
        assert!(outcome.valid_count >= 5);
        assert_eq!(outcome.best_fitness, Some(0.0));
        assert!(outcome.pause.is_none());
        assert!(s.population().iter().take(5).all(|w| w.valid));
    }

    #[test]
    fn test_evolve_converges_with_soft_constraint() {
        let mut s = easy();
        s.add_constraint(Constraint::new("labs", 30, ConstraintKind::LabOnTr { courses: vec![2] }))
            .unwrap();
        let outcome = s.evolve(Duration::from_secs(60), &mut NoopReporter, None).unwrap();
        assert_eq!(outcome.phase, RunPhase::Converged);
        assert_eq!(outcome.best_fitness, Some(30.0));
    }

    #[test]
    fn test_step_bootstraps_first() {
        let mut s = easy();
        let state = s.step(RunState::new(Duration::from_secs(60)), &mut NoopReporter).unwrap();
        assert_eq!(state.phase, RunPhase::Generating);
        assert_eq!(state.generation, 1);
        assert_eq!(s.population().len(), 20);
    }

    #[test]
    fn test_select_prefers_valid() {
        let mut s = easy();
        s.generate_starting_population(12).unwrap();
        s.score_population();
        s.population[0].valid = false;
        s.population[0].fitness = 99.0;
        s.select();

        assert_eq!(s.population().len(), 5);
        let valid = s.population().iter().filter(|w| w.valid).count();
        assert!(s.population()[..valid].iter().all(|w| w.valid));
        assert!(s.population()[valid..].iter().all(|w| !w.valid));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut s = hopeless();
        let mut reporter = Decline {
            asked: 0,
            phases: Vec::new(),
            finished: false,
        };
        let outcome = s.evolve(Duration::from_secs(600), &mut reporter, None).unwrap();
        assert_eq!(outcome.phase, RunPhase::Paused);
        assert_eq!(reporter.asked, 1);
        assert!(reporter.finished);
        assert!(reporter.phases.contains(&RunPhase::Generating));

        let snapshot = outcome.pause.unwrap();
        assert_eq!(snapshot.generation, 10);
        assert!(snapshot.matches(s.constraints()));
        let json = snapshot.to_json().unwrap();
        let restored = PauseSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);

        // Same constraints: keeps the population and generation count
        let spent = PauseSnapshot {
            remaining: Duration::ZERO,
            ..restored
        };
        let outcome = s.evolve(Duration::from_secs(600), &mut reporter, Some(spent)).unwrap();
        assert_eq!(outcome.phase, RunPhase::TimeExpired);
        assert_eq!(outcome.generations, 10);
        assert_eq!(reporter.asked, 1);
    }

    #[test]
    fn test_resume_discarded_when_constraints_change() {
        let mut s = hopeless();
        let snapshot = PauseSnapshot {
            remaining: Duration::from_secs(600),
            generation: 10,
            constraint_names: vec!["something_else".into()],
        };
        assert!(!snapshot.matches(s.constraints()));

        let mut reporter = Decline {
            asked: 0,
            phases: Vec::new(),
            finished: false,
        };
        let outcome = s.evolve(Duration::from_secs(600), &mut reporter, Some(snapshot)).unwrap();
        // Started over, so the checkpoint is reached again
        assert_eq!(outcome.phase, RunPhase::Paused);
        assert_eq!(outcome.generations, 10);
        assert_eq!(reporter.asked, 1);
    }

    #[test]
    fn test_snapshot_multiset_match() {
        let snap = PauseSnapshot {
            remaining: Duration::from_secs(1),
            generation: 0,
            constraint_names: vec!["a".into(), "b".into(), "a".into()],
        };
        let c = |n: &str| Constraint::new(n, 1, ConstraintKind::NoRoomOverlap);
        assert!(snap.matches(&[c("b"), c("a"), c("a")]));
        assert!(!snap.matches(&[c("a"), c("b")]));
    }
}
