//! Engine error type.
//!
//! Only contract violations surface as errors. Search dead-ends (an
//! unplaceable course, a failing constraint, an invalid child) are recorded
//! on the [`Schedule`](crate::models::Schedule) flags instead.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by the timetabling engine.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Construction inputs failed validation.
    #[error("invalid scheduler input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A constraint could not be registered.
    #[error("constraint '{name}' rejected: {reason}")]
    InvalidConstraint { name: String, reason: String },

    /// Breeding needs at least two schedules.
    #[error("breeding needs at least two schedules, population has {0}")]
    InsufficientPopulation(usize),

    /// A course was routed to the placement routine of another credit count.
    #[error("course '{course}' has {actual} credit hours but was routed to the {expected}-hour placement")]
    CreditMismatch {
        course: String,
        expected: u8,
        actual: u8,
    },

    /// A clock time, range, or day string could not be parsed.
    #[error("malformed time: {0}")]
    MalformedTime(String),

    /// A room name did not match any room in the catalog.
    #[error("unknown room '{0}'")]
    UnknownRoom(String),

    /// A course label did not match any course in the catalog.
    #[error("unknown course '{0}'")]
    UnknownCourse(String),

    /// An instructor name did not match any instructor in the catalog.
    #[error("unknown instructor '{0}'")]
    UnknownInstructor(String),

    /// A stored placement does not fit the slot grid.
    #[error("course '{course}' cannot be placed: {reason}")]
    InvalidPlacement { course: String, reason: String },

    /// A pause snapshot or export could not be (de)serialized.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
