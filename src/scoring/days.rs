//! Day-of-week rules.

use super::{sections_by_instructor, Evaluation};
use crate::models::{CourseId, Day, InstructorId, Schedule};

/// One item per cell of `course`: its day is in `days` (`allowed`) or not
/// in `days` (`!allowed`).
pub(super) fn course_days(schedule: &Schedule, course: CourseId, days: &[Day], allowed: bool) -> Evaluation {
    let mut eval = Evaluation::new();
    for slot in schedule.find_course(course) {
        eval.check(days.contains(&slot.day) == allowed, course);
    }
    eval
}

/// One item per section day of the instructor: the day is allowed.
pub(super) fn instructor_days(schedule: &Schedule, instructor: InstructorId, days: &[Day]) -> Evaluation {
    let mut eval = Evaluation::new();
    let grouped = sections_by_instructor(schedule);
    for section in grouped.get(&instructor).into_iter().flatten() {
        for day in &section.days {
            eval.check(days.contains(day), section.course);
        }
    }
    eval
}

/// One item per cell of each lab (one failing item if unplaced): the cell
/// is on T/R.
pub(super) fn lab_on_tr(schedule: &Schedule, courses: &[CourseId]) -> Evaluation {
    let mut eval = Evaluation::new();
    for &course in courses {
        let slots = schedule.find_course(course);
        if slots.is_empty() {
            eval.check(false, course);
        }
        for slot in slots {
            eval.check(slot.day.is_tr(), course);
        }
    }
    eval
}

/// One item per teaching day of the instructor: at most `max` sections.
pub(super) fn instructor_max_per_day(schedule: &Schedule, instructor: InstructorId, max: usize) -> Evaluation {
    let mut eval = Evaluation::new();
    let grouped = sections_by_instructor(schedule);
    let Some(sections) = grouped.get(&instructor) else {
        return eval;
    };

    for day in Day::ALL {
        let on_day: Vec<CourseId> = sections
            .iter()
            .filter(|s| s.days.contains(&day))
            .map(|s| s.course)
            .collect();
        if on_day.is_empty() {
            continue;
        }
        let holds = on_day.len() <= max;
        eval.push(holds);
        if !holds {
            for course in on_day {
                eval.blame(course);
            }
        }
    }
    eval
}
