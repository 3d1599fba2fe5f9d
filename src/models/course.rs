//! Course (section) model.
//!
//! A course is one section of a subject offering. It is placed on as many
//! grid cells as it has credit hours, following the day pattern that the
//! credit count dictates:
//!
//! | Credits | Day pattern |
//! |---------|-------------|
//! | 1 | any single day (labs on T or R) |
//! | 3 | M/W/F or T/R |
//! | 4 | M/W/F plus one of T/R |
//! | 5 | all five days |

use serde::{Deserialize, Serialize};

use super::{Day, TimeRange};

/// A fixed placement that bypasses the randomized search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTime {
    /// Room full name (building + number, no spaces).
    pub room: String,
    /// Days the course meets.
    pub days: Vec<Day>,
    /// Meeting time.
    pub time: TimeRange,
}

/// A course section to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Subject code, e.g. `csc`.
    pub subject: String,
    /// Course number, e.g. `130`.
    pub code: String,
    /// Section label, e.g. `001` or `a`.
    pub section: String,
    /// Human-readable title.
    pub title: String,
    /// Credit hours (1, 3, 4 or 5).
    pub credit: u8,
    /// Enrollment capacity.
    pub capacity: u32,
    /// Whether the room must have computers.
    pub needs_computers: bool,
    /// Lab sections meet on T/R.
    pub is_lab: bool,
    /// Pre-assigned placement, if any.
    pub prescheduled: Option<FixedTime>,
    /// Instructor name.
    pub instructor: String,
}

impl Course {
    /// Creates a course with 3 credit hours and no requirements.
    ///
    /// Identity strings are lowercased.
    pub fn new(subject: &str, code: &str, section: &str) -> Self {
        Self {
            subject: subject.to_lowercase(),
            code: code.to_lowercase(),
            section: section.to_lowercase(),
            title: String::new(),
            credit: 3,
            capacity: 0,
            needs_computers: false,
            is_lab: false,
            prescheduled: None,
            instructor: String::new(),
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the credit hours.
    pub fn with_credit(mut self, credit: u8) -> Self {
        self.credit = credit;
        self
    }

    /// Sets the enrollment capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Requires a computer-equipped room.
    pub fn with_computers(mut self, needs: bool) -> Self {
        self.needs_computers = needs;
        self
    }

    /// Marks the course as a lab.
    pub fn with_lab(mut self, is_lab: bool) -> Self {
        self.is_lab = is_lab;
        self
    }

    /// Sets the instructor name.
    pub fn with_instructor(mut self, name: impl Into<String>) -> Self {
        self.instructor = name.into();
        self
    }

    /// Pins the course to a fixed room, days and time.
    pub fn with_prescheduled(mut self, fixed: FixedTime) -> Self {
        self.prescheduled = Some(fixed);
        self
    }

    /// Whether the course has a fixed placement.
    #[inline]
    pub fn is_prescheduled(&self) -> bool {
        self.prescheduled.is_some()
    }

    /// Number of cells the course occupies when fully placed: one per
    /// credit hour. Fixed placements are held to the same count by input
    /// validation.
    pub fn cell_count(&self) -> usize {
        usize::from(self.credit)
    }

    /// Subject and number without section, e.g. `csc130`.
    pub fn base_name(&self) -> String {
        format!("{}{}", self.subject, self.code)
    }

    /// Display label, e.g. `csc 130 001`.
    pub fn label(&self) -> String {
        format!("{} {} {}", self.subject, self.code, self.section)
    }

    /// Whether `days` is a legal meeting pattern for this course.
    pub fn matches_day_pattern(&self, days: &[Day]) -> bool {
        let mut sorted = days.to_vec();
        sorted.sort();
        match self.credit {
            1 => sorted.len() == 1,
            3 => sorted == Day::MWF || sorted == Day::TR,
            4 => sorted == [Day::M, Day::T, Day::W, Day::F] || sorted == [Day::M, Day::W, Day::R, Day::F],
            5 => sorted == Day::ALL,
            _ => false,
        }
    }
}
