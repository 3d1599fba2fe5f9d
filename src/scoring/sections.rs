//! Sections of the same base course.

use super::{EvalContext, Evaluation};
use crate::models::Schedule;

/// One item per placed section: no other section of the same base course
/// starts at the same time on a shared day.
pub(super) fn sections_at_different_times(ctx: &EvalContext<'_>, schedule: &Schedule) -> Evaluation {
    let sections = schedule.sections();
    let bases: Vec<String> = sections
        .iter()
        .map(|s| ctx.catalog.course(s.course).base_name())
        .collect();

    let mut eval = Evaluation::new();
    for (i, section) in sections.iter().enumerate() {
        let clash = sections.iter().enumerate().any(|(j, other)| {
            i != j
                && bases[i] == bases[j]
                && other.time.start == section.time.start
                && other.shares_day(section)
        });
        eval.check(!clash, section.course);
    }
    eval
}
