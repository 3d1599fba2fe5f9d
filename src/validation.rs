//! Input validation for timetabling problems.
//!
//! Checks structural integrity of courses, rooms, and time grids before a
//! scheduler is built. Detects:
//! - Empty course, room, or time-range lists
//! - Malformed `HH:MM-HH:MM` ranges
//! - Duplicate course labels and room names, and time ranges sharing a
//!   start time within one grid
//! - Credit hours without a placement pattern (anything but 1, 3, 4, 5)
//! - Out-of-range crossover divide
//! - Fixed placements naming unknown rooms, times off the grid, or days
//!   that do not fit the course's credit hours
//!
//! All problems are collected, not just the first.

use std::collections::HashSet;

use crate::models::{Course, Day, Room, TimeRange};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required list is empty.
    EmptyInput,
    /// A time range string could not be parsed.
    MalformedTimeRange,
    /// Two entities share the same identity.
    DuplicateId,
    /// A course has credit hours with no placement pattern.
    InvalidCreditHours,
    /// `slot_divide` is not below the size of both time grids.
    InvalidSlotDivide,
    /// A fixed placement names a room that doesn't exist.
    UnknownRoomReference,
    /// A fixed placement has no days, days that do not fit its credit
    /// hours, or a time not on its days' grid.
    InvalidPrescheduledTime,
}

impl ValidationError {
    /// Creates an error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn parse_grid(label: &str, ranges: &[&str], errors: &mut Vec<ValidationError>) -> Vec<TimeRange> {
    if ranges.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            format!("No {label} time ranges"),
        ));
    }

    let mut parsed = Vec::with_capacity(ranges.len());
    for raw in ranges {
        match raw.parse::<TimeRange>() {
            Ok(range) if parsed.iter().any(|r: &TimeRange| r.start == range.start) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate {label} start time: {range}"),
                ))
            }
            Ok(range) => parsed.push(range),
            Err(e) => errors.push(ValidationError::new(
                ValidationErrorKind::MalformedTimeRange,
                format!("Bad {label} time range '{raw}': {e}"),
            )),
        }
    }
    parsed
}

/// Validates the inputs of a scheduler.
///
/// Checks:
/// 1. Courses, rooms, and both time grids are non-empty
/// 2. Every time range parses, with unique start times per grid
/// 3. No duplicate course labels or room names
/// 4. Every credit count is 1, 3, 4 or 5
/// 5. `slot_divide < min(|mwf|, |tr|)`
/// 6. Fixed placements name known rooms, a day pattern legal for the
///    course's credit hours, and times on their days' grid
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    courses: &[Course],
    rooms: &[Room],
    mwf: &[&str],
    tr: &[&str],
    slot_divide: usize,
) -> ValidationResult {
    let mut errors = Vec::new();

    if courses.is_empty() {
        errors.push(ValidationError::new(ValidationErrorKind::EmptyInput, "No courses"));
    }
    if rooms.is_empty() {
        errors.push(ValidationError::new(ValidationErrorKind::EmptyInput, "No rooms"));
    }

    let mwf_ranges = parse_grid("MWF", mwf, &mut errors);
    let tr_ranges = parse_grid("TR", tr, &mut errors);

    if !mwf.is_empty() && !tr.is_empty() && slot_divide >= mwf.len().min(tr.len()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidSlotDivide,
            format!(
                "slot_divide {slot_divide} must be below {}",
                mwf.len().min(tr.len())
            ),
        ));
    }

    let mut room_names = HashSet::new();
    for room in rooms {
        if !room_names.insert(room.full_name()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room: {}", room.full_name()),
            ));
        }
    }

    let mut labels = HashSet::new();
    for course in courses {
        let label = course.label();
        if !labels.insert(label.clone()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course: {label}"),
            ));
        }

        if !matches!(course.credit, 1 | 3 | 4 | 5) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCreditHours,
                format!("Course '{label}' has {} credit hours", course.credit),
            ));
        }

        let Some(fixed) = &course.prescheduled else {
            continue;
        };
        if !room_names.contains(&fixed.room) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownRoomReference,
                format!("Course '{label}' is fixed to unknown room '{}'", fixed.room),
            ));
        }
        if fixed.days.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPrescheduledTime,
                format!("Course '{label}' has a fixed time with no days"),
            ));
        } else if !course.matches_day_pattern(&fixed.days) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPrescheduledTime,
                format!(
                    "Course '{label}' has {} credit hours but is fixed on '{}'",
                    course.credit,
                    Day::codes(&fixed.days)
                ),
            ));
        }
        for day in &fixed.days {
            let grid = if day.is_tr() { &tr_ranges } else { &mwf_ranges };
            if !grid.iter().any(|r| r.start == fixed.time.start) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPrescheduledTime,
                    format!(
                        "Course '{label}' is fixed at {} on {}, which is not on the {} grid",
                        fixed.time,
                        day,
                        if day.is_tr() { "TR" } else { "MWF" }
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parses a list of already validated ranges.
pub(crate) fn parse_ranges(ranges: &[&str]) -> Vec<TimeRange> {
    ranges.iter().filter_map(|r| r.parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FixedTime;

    fn courses() -> Vec<Course> {
        vec![
            Course::new("csc", "130", "001"),
            Course::new("csc", "232", "001").with_credit(4),
        ]
    }

    fn rooms() -> Vec<Room> {
        vec![Room::new("cheek", "308"), Room::new("temple", "101")]
    }

    const MWF: [&str; 3] = ["09:00-09:50", "10:00-10:50", "11:00-11:50"];
    const TR: [&str; 2] = ["09:30-10:45", "11:00-12:15"];

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&courses(), &rooms(), &MWF, &TR, 1).is_ok());
    }

    #[test]
    fn test_empty_inputs() {
        let k = kinds(validate_input(&[], &[], &[], &[], 0));
        assert_eq!(k.iter().filter(|k| **k == ValidationErrorKind::EmptyInput).count(), 4);
    }

    #[test]
    fn test_malformed_and_duplicate_ranges() {
        let k = kinds(validate_input(
            &courses(),
            &rooms(),
            &["09:00-09:50", "9am", "09:00-09:50"],
            &TR,
            0,
        ));
        assert_eq!(
            k,
            vec![ValidationErrorKind::MalformedTimeRange, ValidationErrorKind::DuplicateId]
        );
    }

    #[test]
    fn test_same_start_in_one_grid() {
        let k = kinds(validate_input(
            &courses(),
            &rooms(),
            &MWF,
            &["11:00-11:50", "11:00-12:15"],
            0,
        ));
        assert_eq!(k, vec![ValidationErrorKind::DuplicateId]);

        // the same start on both grids is one row, not a duplicate
        assert!(validate_input(&courses(), &rooms(), &MWF, &["11:00-12:15", "09:30-10:45"], 1).is_ok());
    }

    #[test]
    fn test_prescheduled_days_follow_credit() {
        let fixed = |days: &str| FixedTime {
            room: "cheek308".into(),
            days: Day::parse_days(days).unwrap(),
            time: "11:00-11:50".parse().unwrap(),
        };

        let monday_only = Course::new("csc", "130", "001").with_prescheduled(fixed("m"));
        let k = kinds(validate_input(&[monday_only], &rooms(), &MWF, &TR, 0));
        assert_eq!(k, vec![ValidationErrorKind::InvalidPrescheduledTime]);

        let four = Course::new("csc", "232", "001")
            .with_credit(4)
            .with_prescheduled(fixed("mwrf"));
        let one = Course::new("csc", "105", "001")
            .with_credit(1)
            .with_prescheduled(fixed("w"));
        assert!(validate_input(&[four, one], &rooms(), &MWF, &TR, 0).is_ok());
    }

    #[test]
    fn test_slot_divide_bound() {
        assert!(validate_input(&courses(), &rooms(), &MWF, &TR, 1).is_ok());
        let k = kinds(validate_input(&courses(), &rooms(), &MWF, &TR, 2));
        assert_eq!(k, vec![ValidationErrorKind::InvalidSlotDivide]);
    }

    #[test]
    fn test_duplicate_course_and_credit() {
        let mut list = courses();
        list.push(Course::new("CSC", "130", "001"));
        list.push(Course::new("csc", "999", "001").with_credit(2));
        let k = kinds(validate_input(&list, &rooms(), &MWF, &TR, 0));
        assert_eq!(
            k,
            vec![ValidationErrorKind::DuplicateId, ValidationErrorKind::InvalidCreditHours]
        );
    }

    #[test]
    fn test_prescheduled_references() {
        let mut list = courses();
        list.push(Course::new("csc", "400", "001").with_prescheduled(FixedTime {
            room: "nowhere1".into(),
            days: Day::TR.to_vec(),
            time: "10:00-11:15".parse().unwrap(),
        }));
        let k = kinds(validate_input(&list, &rooms(), &MWF, &TR, 0));
        assert_eq!(
            k,
            vec![
                ValidationErrorKind::UnknownRoomReference,
                ValidationErrorKind::InvalidPrescheduledTime,
                ValidationErrorKind::InvalidPrescheduledTime,
            ]
        );

        let ok = Course::new("csc", "401", "001").with_prescheduled(FixedTime {
            room: "cheek308".into(),
            days: Day::MWF.to_vec(),
            time: "10:00-10:50".parse().unwrap(),
        });
        assert!(validate_input(&[ok], &rooms(), &MWF, &TR, 0).is_ok());
    }
}
