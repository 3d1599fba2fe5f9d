//! Clock bounds on courses and instructors.
//!
//! Each placed course is judged by its first cell. A listed course that is
//! not placed at all fails its item.

use super::{EvalContext, Evaluation};
use crate::models::{ClockTime, CourseId, InstructorId, Schedule, TimeRange, TimeSlot};

fn check_courses<F>(schedule: &Schedule, courses: &[CourseId], rule: F) -> Evaluation
where
    F: Fn(&TimeSlot) -> bool,
{
    let mut eval = Evaluation::new();
    for &course in courses {
        let holds = schedule.first_slot_of(course).is_some_and(|slot| rule(&slot));
        eval.check(holds, course);
    }
    eval
}

/// Courses end strictly before `time`.
pub(super) fn courses_before(schedule: &Schedule, courses: &[CourseId], time: ClockTime) -> Evaluation {
    check_courses(schedule, courses, |slot| slot.time.end < time)
}

/// Courses start at or after `time`.
pub(super) fn courses_after(schedule: &Schedule, courses: &[CourseId], time: ClockTime) -> Evaluation {
    check_courses(schedule, courses, |slot| slot.time.start >= time)
}

/// The instructor's courses end by `time`.
pub(super) fn instructor_before(
    ctx: &EvalContext<'_>,
    schedule: &Schedule,
    instructor: InstructorId,
    time: ClockTime,
) -> Evaluation {
    let courses = &ctx.catalog.instructor(instructor).courses;
    check_courses(schedule, courses, |slot| slot.time.end <= time)
}

/// The instructor's courses start at or after `time`.
pub(super) fn instructor_after(
    ctx: &EvalContext<'_>,
    schedule: &Schedule,
    instructor: InstructorId,
    time: ClockTime,
) -> Evaluation {
    let courses = &ctx.catalog.instructor(instructor).courses;
    check_courses(schedule, courses, |slot| slot.time.start >= time)
}

/// The instructor's courses stay clear of a break window.
pub(super) fn instructor_break(
    ctx: &EvalContext<'_>,
    schedule: &Schedule,
    instructor: InstructorId,
    window: &TimeRange,
) -> Evaluation {
    let courses = &ctx.catalog.instructor(instructor).courses;
    check_courses(schedule, courses, |slot| slot.time.avoids(window))
}
