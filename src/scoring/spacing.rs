//! Windows to keep clear and spacing between an instructor's sections.
//!
//! # Sequential sections
//! Two sections are back-to-back when the later start minus the earlier end
//! is at most the context's sequential threshold. An instructor may not
//! walk between buildings between back-to-back sections, nor teach three
//! back-to-back sections on a common day.

use super::{sections_by_instructor, EvalContext, Evaluation};
use crate::models::{CourseId, Day, Schedule, Section, TimeRange};

/// One item per cell on `days` of each listed course: the cell avoids
/// `window`.
pub(super) fn avoid_window(
    schedule: &Schedule,
    courses: &[CourseId],
    window: &TimeRange,
    days: &[Day],
) -> Evaluation {
    let mut eval = Evaluation::new();
    for &course in courses {
        for slot in schedule.find_course(course) {
            if days.contains(&slot.day) {
                eval.check(slot.time.avoids(window), course);
            }
        }
    }
    eval
}

/// One item per (course cell, blocking course) on a shared day: the cell is
/// strictly clear of the blocker's time. Touching times count as overlap.
pub(super) fn avoid_course_overlap(
    schedule: &Schedule,
    courses: &[CourseId],
    blocking: &[CourseId],
) -> Evaluation {
    let mut eval = Evaluation::new();
    for &course in courses {
        let cells = schedule.find_course(course);
        for &blocker in blocking.iter().filter(|&&b| b != course) {
            let blocker_cells = schedule.find_course(blocker);
            for cell in &cells {
                let Some(window) = blocker_cells.iter().find(|b| b.day == cell.day) else {
                    continue;
                };
                let clear = cell.time.end < window.time.start || cell.time.start > window.time.end;
                eval.check(clear, course);
            }
        }
    }
    eval
}

fn building<'a>(ctx: &'a EvalContext<'_>, section: &Section) -> &'a str {
    &ctx.catalog.room(section.room).building
}

/// Whether two sections are back-to-back on some day both meet.
fn sequential(ctx: &EvalContext<'_>, a: &Section, b: &Section) -> bool {
    a.shared_meetings(b)
        .any(|(x, y)| x.is_sequential(&y, ctx.sequential_threshold))
}

fn sequential_on(ctx: &EvalContext<'_>, day: Day, a: &Section, b: &Section) -> bool {
    match (a.time_on(day), b.time_on(day)) {
        (Some(x), Some(y)) => x.is_sequential(&y, ctx.sequential_threshold),
        _ => false,
    }
}

/// One item per instructor section: no back-to-back partner on a shared
/// day sits in another building.
pub(super) fn sequential_buildings(ctx: &EvalContext<'_>, schedule: &Schedule) -> Evaluation {
    let mut eval = Evaluation::new();
    for sections in sections_by_instructor(schedule).values() {
        for section in sections {
            let walks = sections.iter().any(|other| {
                other.course != section.course
                    && sequential(ctx, section, other)
                    && building(ctx, other) != building(ctx, section)
            });
            eval.check(!walks, section.course);
        }
    }
    eval
}

/// One item per instructor section: it is not part of a triple that
/// shares a day and has at least two back-to-back pairs.
pub(super) fn no_three_sequential(ctx: &EvalContext<'_>, schedule: &Schedule) -> Evaluation {
    let mut eval = Evaluation::new();
    for sections in sections_by_instructor(schedule).values() {
        let mut flagged = vec![false; sections.len()];
        for i in 0..sections.len() {
            for j in (i + 1)..sections.len() {
                for k in (j + 1)..sections.len() {
                    let (a, b, c) = (sections[i], sections[j], sections[k]);
                    let chained = a
                        .days
                        .iter()
                        .filter(|d| b.days.contains(d) && c.days.contains(d))
                        .any(|&day| {
                            let pairs = [
                                sequential_on(ctx, day, a, b),
                                sequential_on(ctx, day, a, c),
                                sequential_on(ctx, day, b, c),
                            ];
                            pairs.iter().filter(|&&p| p).count() >= 2
                        });
                    if chained {
                        flagged[i] = true;
                        flagged[j] = true;
                        flagged[k] = true;
                    }
                }
            }
        }
        for (section, bad) in sections.iter().zip(flagged) {
            eval.check(!bad, section.course);
        }
    }
    eval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;
    use crate::scoring::fixtures::*;

    #[test]
    fn test_avoid_window_only_listed_days() {
        let cat = catalog(vec![Course::new("csc", "130", "001")]);
        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &Day::MWF, "11:30");

        let lunch: TimeRange = "12:00-13:00".parse().unwrap();
        let eval = avoid_window(&s, &[0], &lunch, &[Day::M, Day::T]);
        assert_eq!(eval.holds, vec![false]);

        let eval = avoid_window(&s, &[0], &lunch, &[Day::T, Day::R]);
        assert!(eval.holds.is_empty());
    }

    #[test]
    fn test_avoid_course_overlap_shared_days() {
        let cat = catalog(vec![
            Course::new("csc", "130", "001"),
            Course::new("csc", "232", "001"),
            Course::new("csc", "333", "001"),
            Course::new("csc", "444", "001"),
        ]);
        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &Day::MWF, "09:00");
        place(&mut s, 1, 1, &[Day::M], "10:00");
        place(&mut s, 2, 1, &Day::MWF, "11:30");
        place(&mut s, 3, 0, &Day::MWF, "11:00");

        // only Monday is shared with the blocker
        let eval = avoid_course_overlap(&s, &[0], &[1]);
        assert_eq!(eval.holds, vec![true]);

        let eval = avoid_course_overlap(&s, &[2], &[3]);
        assert_eq!(eval.holds, vec![false, false, false]);
        assert_eq!(eval.failed, vec![2]);

        // a course never blocks itself
        assert!(avoid_course_overlap(&s, &[3], &[3]).holds.is_empty());
    }

    #[test]
    fn test_sequential_buildings() {
        let cat = catalog(vec![
            Course::new("csc", "130", "001").with_instructor("shade"),
            Course::new("csc", "232", "001").with_instructor("shade"),
            Course::new("csc", "333", "001").with_instructor("shade"),
        ]);
        let cal = no_calendar();
        let ctx = EvalContext::new(&cat, &cal);

        // 09:00 in cheek, 10:00 in temple: 10 minute walk between buildings
        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &Day::MWF, "09:00");
        place(&mut s, 1, 2, &Day::MWF, "10:00");
        s.update_sections(&cat);
        let eval = sequential_buildings(&ctx, &s);
        assert_eq!(eval.holds, vec![false, false]);

        // same building is fine
        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &Day::MWF, "09:00");
        place(&mut s, 1, 1, &Day::MWF, "10:00");
        place(&mut s, 2, 2, &Day::MWF, "13:00");
        s.update_sections(&cat);
        assert!(sequential_buildings(&ctx, &s).all_hold());
    }

    #[test]
    fn test_sequential_uses_each_day_time() {
        let cat = catalog(vec![
            Course::new("csc", "232", "001").with_instructor("shade").with_credit(4),
            Course::new("csc", "130", "001").with_instructor("shade"),
        ]);
        let cal = no_calendar();
        let ctx = EvalContext::new(&cat, &cal);

        // Thursday runs 08:00-09:15, leaving 15 minutes before 09:30 in temple
        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &[Day::M, Day::W, Day::R, Day::F], "08:00");
        place(&mut s, 1, 2, &Day::TR, "09:30");
        s.update_sections(&cat);
        let eval = sequential_buildings(&ctx, &s);
        assert_eq!(eval.holds, vec![false, false]);

        // on Tuesday instead, the sections share no day
        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &[Day::M, Day::T, Day::W, Day::F], "08:00");
        place(&mut s, 1, 2, &[Day::R], "09:30");
        s.update_sections(&cat);
        assert!(sequential_buildings(&ctx, &s).all_hold());
    }

    #[test]
    fn test_no_three_sequential() {
        let cat = catalog(vec![
            Course::new("csc", "130", "001").with_instructor("shade"),
            Course::new("csc", "232", "001").with_instructor("shade"),
            Course::new("csc", "333", "001").with_instructor("shade"),
            Course::new("csc", "444", "001").with_instructor("shade"),
        ]);
        let cal = no_calendar();
        let ctx = EvalContext::new(&cat, &cal);

        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &Day::MWF, "08:00");
        place(&mut s, 1, 0, &Day::MWF, "09:00");
        place(&mut s, 2, 0, &Day::MWF, "10:00");
        place(&mut s, 3, 0, &Day::TR, "13:00");
        s.update_sections(&cat);

        let eval = no_three_sequential(&ctx, &s);
        assert_eq!(eval.holds, vec![false, false, false, true]);
        assert_eq!(eval.failed, vec![0, 1, 2]);

        // a wider gap breaks the chain
        let mut s = schedule(&cat);
        place(&mut s, 0, 0, &Day::MWF, "08:00");
        place(&mut s, 1, 0, &Day::MWF, "10:00");
        place(&mut s, 2, 0, &Day::MWF, "13:00");
        s.update_sections(&cat);
        assert!(no_three_sequential(&ctx, &s).all_hold());
    }
}
