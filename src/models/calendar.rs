//! Room availability calendars.
//!
//! Each room may carry a list of signed statements over day codes and
//! clock ranges:
//! - `+` (**available**): the room may only be used inside these windows.
//! - `-` (**blackout**): the room may not be used inside these windows.
//!
//! # Precedence
//! Blackouts override availability. A slot is usable iff:
//! - It does NOT fall inside any blackout that covers its day, AND
//! - The room has no `+` statements, or the slot falls inside at least one
//!   `+` window that covers its day.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Day, TimeRange};
use crate::error::SchedulerError;

/// Sign of an availability statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    /// `+`: only-available window.
    Available,
    /// `-`: blackout window.
    Blackout,
}

impl Availability {
    /// Statement sign character.
    pub fn sign(self) -> char {
        match self {
            Availability::Available => '+',
            Availability::Blackout => '-',
        }
    }

    /// Token used in constraint names (`Avail` / `NotAvail`).
    pub fn token(self) -> &'static str {
        match self {
            Availability::Available => "Avail",
            Availability::Blackout => "NotAvail",
        }
    }
}

/// One signed interval statement for a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityStatement {
    /// Allow or blackout.
    pub availability: Availability,
    /// Days the statement applies to.
    pub days: Vec<Day>,
    /// Clock window.
    pub window: TimeRange,
}

impl AvailabilityStatement {
    /// Whether the statement applies on `day` and fully contains `time`.
    pub fn covers(&self, day: Day, time: &TimeRange) -> bool {
        self.days.contains(&day) && self.window.contains(time)
    }
}

/// Availability statements indexed by room full name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomCalendar {
    statements: BTreeMap<String, Vec<AvailabilityStatement>>,
}

impl RoomCalendar {
    /// Creates an empty calendar (every room always available).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a statement for a room.
    ///
    /// `days` is a day-code string such as `"mwf"`; `start` and `end` are
    /// `HH:MM` clock times.
    pub fn add(
        &mut self,
        room: &str,
        availability: Availability,
        days: &str,
        start: &str,
        end: &str,
    ) -> Result<AvailabilityStatement, SchedulerError> {
        let statement = AvailabilityStatement {
            availability,
            days: Day::parse_days(days)?,
            window: TimeRange::new(start.parse()?, end.parse()?)?,
        };
        self.statements
            .entry(room.to_string())
            .or_default()
            .push(statement.clone());
        Ok(statement)
    }

    /// Removes the first statement of `room` equal to `statement`.
    ///
    /// Drops the room entry once its last statement is gone. Returns whether
    /// a statement was removed.
    pub fn remove(&mut self, room: &str, statement: &AvailabilityStatement) -> bool {
        let Some(list) = self.statements.get_mut(room) else {
            return false;
        };
        let removed = match list.iter().position(|s| s == statement) {
            Some(idx) => {
                list.remove(idx);
                true
            }
            None => false,
        };
        if list.is_empty() {
            self.statements.remove(room);
        }
        removed
    }

    /// Statements registered for a room.
    pub fn statements_for(&self, room: &str) -> &[AvailabilityStatement] {
        self.statements.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any room has statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Whether a slot in `room` on `day` at `time` is usable.
    pub fn is_usable(&self, room: &str, day: Day, time: &TimeRange) -> bool {
        let statements = self.statements_for(room);
        if statements.is_empty() {
            return true;
        }

        // Blackouts override
        if statements
            .iter()
            .any(|s| s.availability == Availability::Blackout && s.covers(day, time))
        {
            return false;
        }

        let mut allows = statements
            .iter()
            .filter(|s| s.availability == Availability::Available)
            .peekable();
        if allows.peek().is_none() {
            return true;
        }
        allows.any(|s| s.covers(day, time))
    }
}
