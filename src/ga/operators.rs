//! Genetic operators on timetables.
//!
//! - [`crossover`]: exchanges the occupants of every cell at a random set of
//!   start times between copies of two parents, then repairs each child.
//! - [`assess_inconsistencies`] / [`resolve_inconsistencies`]: find and
//!   re-place courses a crossover left missing or over-placed.
//! - [`guided_mutate`]: re-places the failing courses of one failing soft
//!   constraint, keeping only improvements.
//! - [`crossover_probability`]: pairing odds used when breeding.
//!
//! Operators never modify their inputs in place: children and mutants are
//! fresh schedules, and a rejected mutation attempt is rolled back with a
//! snapshot.

use rand::Rng;
use rand::prelude::IndexedRandom;

use super::placement::randomly_fill_schedule;
use crate::error::SchedulerError;
use crate::models::{Catalog, ClockTime, Constraint, CourseId, Schedule, SlotId};
use crate::scoring::{assess, calc_fitness, EvalContext};

/// Courses whose placement count disagrees with their credit hours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inconsistencies {
    /// Courses on no cell.
    pub lacking: Vec<CourseId>,
    /// Courses on more cells than their credit hours.
    pub surplus: Vec<CourseId>,
    /// Courses on some, but too few, cells.
    pub partial: Vec<CourseId>,
}

impl Inconsistencies {
    /// Whether every course is placed exactly.
    pub fn is_consistent(&self) -> bool {
        self.lacking.is_empty() && self.surplus.is_empty() && self.partial.is_empty()
    }

    /// Whether any course is over- or under-placed (but not missing).
    pub fn has_misplaced(&self) -> bool {
        !self.surplus.is_empty() || !self.partial.is_empty()
    }
}

/// Classifies every course by its placement count.
pub fn assess_inconsistencies(schedule: &Schedule, catalog: &Catalog) -> Inconsistencies {
    let counts = schedule.placement_counts(catalog.courses().len());
    let mut found = Inconsistencies::default();
    for (id, course) in catalog.courses().iter().enumerate() {
        let expected = course.cell_count();
        match counts[id] {
            0 => found.lacking.push(id),
            n if n > expected => found.surplus.push(id),
            n if n < expected => found.partial.push(id),
            _ => {}
        }
    }
    found
}

/// Frees surplus and partial courses, then re-places them together with
/// the lacking courses into every open cell.
pub fn resolve_inconsistencies<R: Rng>(
    schedule: &mut Schedule,
    catalog: &Catalog,
    found: &Inconsistencies,
    rng: &mut R,
) -> Result<(), SchedulerError> {
    let mut to_place = found.lacking.clone();
    for &course in found.surplus.iter().chain(&found.partial) {
        schedule.unschedule_course(course);
        to_place.push(course);
    }
    if to_place.is_empty() {
        return Ok(());
    }

    let open: Vec<SlotId> = schedule
        .find_empty_time_slots()
        .iter()
        .map(|t| t.id)
        .collect();
    randomly_fill_schedule(schedule, catalog, &to_place, &open, rng)
}

fn repair<R: Rng>(child: &mut Schedule, catalog: &Catalog, rng: &mut R) -> Result<(), SchedulerError> {
    let found = assess_inconsistencies(child, catalog);
    resolve_inconsistencies(child, catalog, &found, rng)?;

    let after = assess_inconsistencies(child, catalog);
    if !after.lacking.is_empty() {
        child.mark_incomplete();
    }
    if after.has_misplaced() {
        child.valid = false;
    }
    Ok(())
}

/// Crosses two parents over `slot_divide` random start times.
///
/// Every cell (any room, any day) starting at one of the chosen times swaps
/// occupants between copies of the parents. Whole rows move together, so a
/// course is either kept or exchanged in full. Each child is then
/// repaired; a child that still misplaces a course is marked invalid, one
/// that still misses a course is marked incomplete.
pub fn crossover<R: Rng>(
    p1: &Schedule,
    p2: &Schedule,
    catalog: &Catalog,
    slot_divide: usize,
    rng: &mut R,
) -> Result<(Schedule, Schedule), SchedulerError> {
    let starts = catalog.start_times();
    let cut: Vec<ClockTime> = starts.choose_multiple(rng, slot_divide).copied().collect();

    let mut c1 = p1.deep_copy();
    let mut c2 = p2.deep_copy();
    for id in c1.grid().with_starts(&cut) {
        c1.swap_cell(&mut c2, id);
    }

    repair(&mut c1, catalog, rng)?;
    repair(&mut c2, catalog, rng)?;
    Ok((c1, c2))
}

/// Odds (0.0..=1.0) that two schedules are crossed over.
///
/// The validity term is the mean of the two validity flags, floored at
/// 0.1. When weighted constraints exist it is scaled by the pair's mean
/// fitness, normalized to `max_fitness` and tilted up by `tilt`.
pub fn crossover_probability(a: &Schedule, b: &Schedule, max_fitness: f64, tilt: f64) -> f64 {
    let mut valid_term = (f64::from(u8::from(a.valid)) + f64::from(u8::from(b.valid))) * 0.5;
    if valid_term == 0.0 {
        valid_term = 0.1;
    }
    if max_fitness == 0.0 {
        return valid_term;
    }
    let mean = (a.fitness + b.fitness) / 2.0;
    valid_term * (mean + tilt * (max_fitness - mean)) / max_fitness
}

/// Repairs one failing soft constraint of a copy of `original`.
///
/// Picks a random weighted constraint below full weight and one of its
/// failing courses, then makes up to `max_tries` attempts to re-place that
/// course. An attempt is kept when the copy stays valid and the target's
/// failing-course count drops; the next failing course is then targeted.
/// Other attempts are rolled back.
///
/// Returns the mutant when at least one attempt was kept and its fitness is
/// no lower than the starting fitness.
pub fn guided_mutate<R: Rng>(
    original: &Schedule,
    constraints: &[Constraint],
    ctx: &EvalContext<'_>,
    max_tries: usize,
    rng: &mut R,
) -> Result<Option<Schedule>, SchedulerError> {
    let mut copy = original.deep_copy();
    calc_fitness(constraints, ctx, &mut copy);
    let baseline = copy.fitness;

    let failing: Vec<(&Constraint, Vec<CourseId>)> = constraints
        .iter()
        .filter(|c| !c.is_informational())
        .filter_map(|c| {
            let outcome = assess(c, ctx, &copy);
            (outcome.score < 1.0).then_some((c, outcome.failed))
        })
        .collect();

    let Some((target, failed)) = failing.choose(rng) else {
        log::debug!("guided mutation: no failing constraints");
        return Ok(None);
    };
    let Some(&first) = failed.choose(rng) else {
        log::debug!("guided mutation: '{}' names no failing course", target.name);
        return Ok(None);
    };

    log::debug!("guided mutation targets '{}'", target.name);
    let mut course = first;
    let mut remaining = failed.len();
    let mut improved = false;

    for _ in 0..max_tries {
        let snapshot = copy.snapshot();
        copy.unschedule_course(course);
        let open: Vec<SlotId> = copy.find_empty_time_slots().iter().map(|t| t.id).collect();
        randomly_fill_schedule(&mut copy, ctx.catalog, &[course], &open, rng)?;
        calc_fitness(constraints, ctx, &mut copy);

        let now = assess(target, ctx, &copy);
        if copy.valid && now.failed.len() < remaining {
            improved = true;
            remaining = now.failed.len();
            match now.failed.choose(rng) {
                Some(&next) => course = next,
                None => break,
            }
        } else {
            copy.restore(snapshot);
        }
    }

    copy.update_sections(ctx.catalog);
    if improved && copy.valid && copy.fitness >= baseline {
        log::debug!("guided mutation kept: {:.1} -> {:.1}", baseline, copy.fitness);
        Ok(Some(copy))
    } else {
        Ok(None)
    }
}
