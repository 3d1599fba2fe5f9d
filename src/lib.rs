//! Course timetabling engine.
//!
//! Assigns course sections to room × day × time cells of a five-day week
//! under weighted hard and soft constraints, using a genetic search:
//! randomized constraint-aware placement, multi-objective fitness,
//! crossover with repair, and guided mutation of failing courses.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `Room`, `Instructor`, `Day`,
//!   `TimeRange`, `SlotGrid`, `Schedule`, `Constraint`, `RoomCalendar`
//! - **`scoring`**: Constraint evaluators and the fitness pass
//! - **`ga`**: Placement, crossover and repair, guided mutation
//! - **`scheduler`**: The `Scheduler` engine and its generational loop
//! - **`validation`**: Input integrity checks (empty lists, malformed
//!   times, duplicates, credit hours, fixed placements)
//! - **`export`**: Persisted placement records
//! - **`error`**: The engine error type
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use u_timetable::models::{Constraint, ConstraintKind, Course, Room};
//! use u_timetable::scheduler::{NoopReporter, RunPhase, Scheduler, SchedulerConfig};
//!
//! let courses = vec![
//!     Course::new("csc", "130", "001").with_instructor("shade"),
//!     Course::new("csc", "105", "a").with_instructor("shade").with_credit(1).with_lab(true),
//! ];
//! let rooms = vec![Room::new("cheek", "308").with_capacity(30)];
//! let mut scheduler = Scheduler::new(
//!     courses,
//!     rooms,
//!     &["09:00-09:50", "10:00-10:50"],
//!     &["09:30-10:45", "11:00-12:15"],
//!     1,
//!     SchedulerConfig::default().with_seed(42).with_bootstrap_size(20),
//! )
//! .unwrap();
//! scheduler.add_universal_constraints().unwrap();
//! scheduler
//!     .add_constraint(Constraint::new("lab_tr", 10, ConstraintKind::LabOnTr { courses: vec![1] }))
//!     .unwrap();
//!
//! let outcome = scheduler
//!     .evolve(Duration::from_secs(30), &mut NoopReporter, None)
//!     .unwrap();
//! assert_eq!(outcome.phase, RunPhase::Converged);
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"
//! - Schaerf (1999), "A survey of automated timetabling"

pub mod error;
pub mod export;
pub mod ga;
pub mod models;
pub mod scheduler;
pub mod scoring;
pub mod validation;
