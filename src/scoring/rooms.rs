//! Room choice and availability.

use super::{sections_by_instructor, EvalContext, Evaluation};
use crate::models::{Availability, AvailabilityStatement, CourseId, InstructorId, RoomId, Schedule};

/// One item per cell of `course`: it sits in one of `rooms`.
pub(super) fn course_rooms(schedule: &Schedule, course: CourseId, rooms: &[RoomId]) -> Evaluation {
    let mut eval = Evaluation::new();
    for slot in schedule.find_course(course) {
        eval.check(rooms.contains(&slot.room), course);
    }
    eval
}

/// One item per instructor section that does not need computers: the
/// room's computer flag matches the preference.
pub(super) fn instructor_computers(
    ctx: &EvalContext<'_>,
    schedule: &Schedule,
    instructor: InstructorId,
    prefers_computers: bool,
) -> Evaluation {
    let mut eval = Evaluation::new();
    let grouped = sections_by_instructor(schedule);
    for section in grouped.get(&instructor).into_iter().flatten() {
        if ctx.catalog.course(section.course).needs_computers {
            continue;
        }
        let has = ctx.catalog.room(section.room).has_computers;
        eval.check(has == prefers_computers, section.course);
    }
    eval
}

/// One item per occupied cell: the room calendar allows it.
pub(super) fn room_availability(ctx: &EvalContext<'_>, schedule: &Schedule) -> Evaluation {
    let mut eval = Evaluation::new();
    for slot in schedule.occupied() {
        let Some(course) = slot.course else { continue };
        let room = ctx.catalog.room(slot.room).full_name();
        eval.check(ctx.calendar.is_usable(&room, slot.day, &slot.time), course);
    }
    eval
}

/// One item per occupied cell of `room` on the statement's days: inside the
/// window for an allow statement, not inside it for a blackout.
pub(super) fn room_window(
    schedule: &Schedule,
    room: RoomId,
    statement: &AvailabilityStatement,
) -> Evaluation {
    let mut eval = Evaluation::new();
    for slot in schedule.occupied() {
        let Some(course) = slot.course else { continue };
        if slot.room != room || !statement.days.contains(&slot.day) {
            continue;
        }
        let inside = statement.covers(slot.day, &slot.time);
        let ok = match statement.availability {
            Availability::Available => inside,
            Availability::Blackout => !inside,
        };
        eval.check(ok, course);
    }
    eval
}
