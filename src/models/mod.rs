//! Timetabling domain models.
//!
//! Provides the core data types for representing a weekly course
//! timetable and its candidate solutions.
//!
//! # Domain Mappings
//!
//! | u-timetable | Campus |
//! |-------------|--------|
//! | Course | Class section |
//! | Room | Classroom / lab |
//! | TimeSlot | Room × day × period |
//! | Schedule | One full week |
//! | Constraint | Scheduling rule or preference |

mod calendar;
mod catalog;
mod constraint;
mod course;
mod grid;
mod instructor;
mod room;
mod schedule;
mod time;

pub use calendar::{Availability, AvailabilityStatement, RoomCalendar};
pub use catalog::{Catalog, CourseId, InstructorId, RoomId};
pub use constraint::{Constraint, ConstraintKind};
pub use course::{Course, FixedTime};
pub use grid::{SlotGrid, SlotId, SlotSpec};
pub use instructor::{Instructor, InstructorPreferences};
pub use room::Room;
pub use schedule::{ConstraintScore, Schedule, ScheduleSnapshot, Section, TimeSlot};
pub use time::{ClockTime, Day, TimeRange};
