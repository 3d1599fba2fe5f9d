//! Timetabling constraints.
//!
//! A constraint is a named, weighted rule scored against a schedule. The
//! rule itself is a [`ConstraintKind`] variant carrying its own typed
//! parameters; scoring lives in [`crate::scoring`].
//!
//! # Weights
//! - `weight == 0`: informational. Never contributes to fitness, but a
//!   mandatory failure still invalidates the schedule.
//! - `weight > 0`: the achieved score (0.0..=1.0) times the weight is added
//!   to fitness.
//!
//! # Mandatory vs. soft
//! A mandatory constraint scores 0 on any failing item and flips the
//! schedule's `valid` flag. A soft constraint scores partial credit.

use serde::{Deserialize, Serialize};

use super::{AvailabilityStatement, ClockTime, CourseId, Day, InstructorId, RoomId, TimeRange};

/// The rule a constraint enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Each listed course ends strictly before `time`.
    CoursesBefore { courses: Vec<CourseId>, time: ClockTime },

    /// Each listed course starts at or after `time`.
    CoursesAfter { courses: Vec<CourseId>, time: ClockTime },

    /// Each section of the instructor ends by `time`.
    InstructorBefore {
        instructor: InstructorId,
        time: ClockTime,
    },

    /// Each section of the instructor starts at or after `time`.
    InstructorAfter {
        instructor: InstructorId,
        time: ClockTime,
    },

    /// No two occupied cells of one room overlap on the same day.
    NoRoomOverlap,

    /// No instructor teaches two overlapping sections on a shared day.
    InstructorConflict,

    /// Every section fits its room's capacity.
    RoomCapacity,

    /// Every computer-needing section sits in a computer room.
    ComputerRequirement,

    /// The course meets only on the listed days.
    CourseDays { course: CourseId, days: Vec<Day> },

    /// The course never meets on the listed days.
    CourseForbiddenDays { course: CourseId, days: Vec<Day> },

    /// The instructor teaches only on the listed days.
    InstructorDays {
        instructor: InstructorId,
        days: Vec<Day>,
    },

    /// Every listed lab meets on T/R only.
    LabOnTr { courses: Vec<CourseId> },

    /// The course is placed in one of the listed rooms.
    CourseRooms { course: CourseId, rooms: Vec<RoomId> },

    /// The instructor's sections sit in rooms matching the computer
    /// preference (sections that need computers are exempt).
    InstructorComputers {
        instructor: InstructorId,
        prefers_computers: bool,
    },

    /// The instructor teaches at most `max` sections on any day.
    InstructorMaxPerDay {
        instructor: InstructorId,
        max: usize,
    },

    /// The instructor's sections stay out of a break window.
    InstructorBreak {
        instructor: InstructorId,
        window: TimeRange,
    },

    /// The listed courses stay out of a window on the listed days.
    AvoidWindow {
        courses: Vec<CourseId>,
        window: TimeRange,
        days: Vec<Day>,
    },

    /// The listed courses never meet at the time of any blocking course on
    /// a day they share.
    AvoidCourseOverlap {
        courses: Vec<CourseId>,
        blocking: Vec<CourseId>,
    },

    /// No instructor has back-to-back sections in different buildings on a
    /// shared day.
    SequentialBuildings,

    /// No instructor has three mutually back-to-back sections on a shared
    /// day.
    NoThreeSequential,

    /// Every occupied cell respects its room's availability calendar.
    RoomAvailability,

    /// Cells of `room` on the statement's days sit inside an allow window,
    /// or outside a blackout window. Scores one statement, independent of
    /// the rest of the calendar.
    RoomWindow {
        room: RoomId,
        statement: AvailabilityStatement,
    },

    /// Sections of the same base course do not share both start time and a
    /// day.
    SectionsAtDifferentTimes,
}

impl ConstraintKind {
    /// Courses the rule refers to directly.
    pub fn course_refs(&self) -> Vec<CourseId> {
        match self {
            Self::CoursesBefore { courses, .. }
            | Self::CoursesAfter { courses, .. }
            | Self::LabOnTr { courses }
            | Self::AvoidWindow { courses, .. } => courses.clone(),
            Self::AvoidCourseOverlap { courses, blocking } => {
                courses.iter().chain(blocking).copied().collect()
            }
            Self::CourseDays { course, .. }
            | Self::CourseForbiddenDays { course, .. }
            | Self::CourseRooms { course, .. } => vec![*course],
            _ => Vec::new(),
        }
    }

    /// Instructor the rule refers to directly.
    pub fn instructor_ref(&self) -> Option<InstructorId> {
        match self {
            Self::InstructorBefore { instructor, .. }
            | Self::InstructorAfter { instructor, .. }
            | Self::InstructorDays { instructor, .. }
            | Self::InstructorComputers { instructor, .. }
            | Self::InstructorMaxPerDay { instructor, .. }
            | Self::InstructorBreak { instructor, .. } => Some(*instructor),
            _ => None,
        }
    }

    /// Rooms the rule refers to directly.
    pub fn room_refs(&self) -> &[RoomId] {
        match self {
            Self::CourseRooms { rooms, .. } => rooms,
            Self::RoomWindow { room, .. } => std::slice::from_ref(room),
            _ => &[],
        }
    }
}

/// A named, weighted rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique name within a scheduler.
    pub name: String,
    /// Fitness weight (0 = informational).
    pub weight: u32,
    /// The rule.
    pub kind: ConstraintKind,
    /// Failure invalidates the schedule.
    pub mandatory: bool,
    /// Added by the system rather than by the user.
    pub universal: bool,
}

impl Constraint {
    /// Creates a soft, user-added constraint.
    pub fn new(name: impl Into<String>, weight: u32, kind: ConstraintKind) -> Self {
        Self {
            name: name.into(),
            weight,
            kind,
            mandatory: false,
            universal: false,
        }
    }

    /// Creates a mandatory constraint.
    pub fn mandatory(name: impl Into<String>, weight: u32, kind: ConstraintKind) -> Self {
        Self::new(name, weight, kind).with_mandatory(true)
    }

    /// Sets whether failure invalidates the schedule.
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Marks the constraint as system-added.
    pub fn with_universal(mut self, universal: bool) -> Self {
        self.universal = universal;
        self
    }

    /// Whether the constraint only counts toward `num_valid`.
    #[inline]
    pub fn is_informational(&self) -> bool {
        self.weight == 0
    }

    /// Weighted value of a raw score (raw score when weight is 0).
    #[inline]
    pub fn weighted(&self, raw: f64) -> f64 {
        if self.weight == 0 {
            raw
        } else {
            raw * f64::from(self.weight)
        }
    }
}
