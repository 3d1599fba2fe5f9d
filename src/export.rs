//! Persisted placement format.
//!
//! A finished timetable is stored as records of a course label, room,
//! meeting days and time. A course whose cells differ in time (a
//! four-credit course meets longer on its T/R day) is written as one record
//! per distinct time. The same records load a timetable
//! back through [`Scheduler::schedule_from_records`](crate::scheduler::Scheduler::schedule_from_records),
//! which is how fixtures and saved timetables enter the engine.
//!
//! ```json
//! {
//!   "fitness": 60.0,
//!   "valid": true,
//!   "placements": [
//!     { "course": "csc 130 001", "room": "cheek308", "days": ["M", "W", "F"], "time": { ... } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::models::{Catalog, Day, Schedule, TimeRange};

/// One placed course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord {
    /// Course label (`subject code section`).
    pub course: String,
    /// Room full name.
    pub room: String,
    /// Meeting days, in week order.
    pub days: Vec<Day>,
    /// Meeting time.
    pub time: TimeRange,
}

/// A timetable in its persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleExport {
    /// Fitness at export time.
    pub fitness: f64,
    /// Validity at export time.
    pub valid: bool,
    /// Placed courses, in catalog order.
    pub placements: Vec<PlacementRecord>,
}

impl ScheduleExport {
    /// Captures the placements of a schedule.
    ///
    /// Emits one record per course, room and time, with the days in week
    /// order. Uses the schedule's sections, so the schedule should have been
    /// scored (or had its sections rebuilt) since its last change.
    pub fn from_schedule(schedule: &Schedule, catalog: &Catalog) -> Self {
        let grid = schedule.grid();
        let mut placements: Vec<PlacementRecord> = Vec::new();
        for section in schedule.sections() {
            let label = catalog.course(section.course).label();
            let first = placements.len();
            for &id in &section.slots {
                let cell = grid.get(id);
                let room = catalog.room(cell.room).full_name();
                let existing = placements[first..]
                    .iter_mut()
                    .find(|r| r.room == room && r.time == cell.time);
                match existing {
                    Some(record) => record.days.push(cell.day),
                    None => placements.push(PlacementRecord {
                        course: label.clone(),
                        room,
                        days: vec![cell.day],
                        time: cell.time,
                    }),
                }
            }
            for record in &mut placements[first..] {
                record.days.sort();
            }
        }
        Self {
            fitness: schedule.fitness,
            valid: schedule.valid,
            placements,
        }
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SchedulerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses an export from JSON.
    pub fn from_json(json: &str) -> Result<Self, SchedulerError> {
        Ok(serde_json::from_str(json)?)
    }
}
