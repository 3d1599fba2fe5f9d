//! Genetic search operators for timetables.
//!
//! A schedule is its own encoding: the occupancy vector over the shared
//! slot grid. Operators work directly on it.
//!
//! # Submodules
//!
//! - [`placement`]: randomized packing of courses into open cells
//! - [`operators`]: crossover with repair, guided mutation, breeding odds
//!
//! # Reference
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"
//! - Abramson & Abela (1992), "A parallel genetic algorithm for solving the
//!   school timetabling problem"

pub mod operators;
pub mod placement;

pub use operators::{
    Inconsistencies, assess_inconsistencies, crossover, crossover_probability, guided_mutate,
    resolve_inconsistencies,
};
pub use placement::{
    CandidatePool, CreditPattern, place_course, placement_is_legal, randomly_fill_schedule,
    stamp_prescheduled,
};
