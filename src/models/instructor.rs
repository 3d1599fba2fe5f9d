//! Instructor model.
//!
//! Instructors are derived from the course list (one per distinct
//! instructor name) and carry the preferences that preference constraints
//! are generated from.

use serde::{Deserialize, Serialize};

use super::{ClockTime, CourseId, Day};

/// Teaching preferences of one instructor.
///
/// Every field is optional; an unset preference generates no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorPreferences {
    /// Sections should start at or after this time.
    pub not_before: Option<ClockTime>,
    /// Sections should end by this time.
    pub not_after: Option<ClockTime>,
    /// Days the instructor is willing to teach.
    pub days: Option<Vec<Day>>,
    /// Whether the instructor prefers computer rooms.
    pub prefers_computers: Option<bool>,
    /// Maximum sections per day.
    pub max_per_day: Option<usize>,
}

/// An instructor and the courses they teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    /// Instructor name (matches `Course::instructor`).
    pub name: String,
    /// Courses taught, as catalog ids.
    pub courses: Vec<CourseId>,
    /// Scheduling preferences.
    pub preferences: InstructorPreferences,
}

impl Instructor {
    /// Creates an instructor with no courses and no preferences.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            courses: Vec::new(),
            preferences: InstructorPreferences::default(),
        }
    }

    /// Sets the preferences.
    pub fn with_preferences(mut self, preferences: InstructorPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Whether the instructor teaches the given course.
    pub fn teaches(&self, course: CourseId) -> bool {
        self.courses.contains(&course)
    }
}
