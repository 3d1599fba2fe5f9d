//! Double-booking and room fitness checks.

use std::collections::BTreeMap;

use super::{sections_by_instructor, EvalContext, Evaluation};
use crate::models::{Day, RoomId, Schedule, TimeSlot};

/// One item per occupied cell: no overlapping cell in the same room on the
/// same day.
pub(super) fn no_room_overlap(schedule: &Schedule) -> Evaluation {
    let mut by_room_day: BTreeMap<(RoomId, Day), Vec<TimeSlot>> = BTreeMap::new();
    for slot in schedule.occupied() {
        by_room_day.entry((slot.room, slot.day)).or_default().push(slot);
    }

    let mut eval = Evaluation::new();
    for cells in by_room_day.values() {
        for slot in cells {
            let Some(course) = slot.course else { continue };
            let clash = cells
                .iter()
                .find(|other| other.id != slot.id && other.time.overlaps(&slot.time));
            match clash {
                Some(other) => {
                    eval.check(false, course);
                    if let Some(c) = other.course {
                        eval.blame(c);
                    }
                }
                None => eval.push(true),
            }
        }
    }
    eval
}

/// One item per section: its instructor has no other overlapping section
/// on a shared day.
pub(super) fn instructor_conflict(schedule: &Schedule) -> Evaluation {
    let mut eval = Evaluation::new();
    for sections in sections_by_instructor(schedule).values() {
        for section in sections {
            let clash = sections.iter().any(|other| {
                other.course != section.course
                    && section
                        .shared_meetings(other)
                        .any(|(mine, theirs)| mine.overlaps(&theirs))
            });
            eval.check(!clash, section.course);
        }
    }
    eval
}

/// One item per section: the room seats the course.
pub(super) fn room_capacity(ctx: &EvalContext<'_>, schedule: &Schedule) -> Evaluation {
    let mut eval = Evaluation::new();
    for section in schedule.sections() {
        let needed = ctx.catalog.course(section.course).capacity;
        let seats = ctx.catalog.room(section.room).capacity;
        eval.check(needed <= seats, section.course);
    }
    eval
}

/// One item per computer-needing section: the room has computers.
pub(super) fn computer_requirement(ctx: &EvalContext<'_>, schedule: &Schedule) -> Evaluation {
    let mut eval = Evaluation::new();
    for section in schedule.sections() {
        if ctx.catalog.course(section.course).needs_computers {
            eval.check(ctx.catalog.room(section.room).has_computers, section.course);
        }
    }
    eval
}
