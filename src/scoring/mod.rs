//! Constraint scoring.
//!
//! Every [`ConstraintKind`] has an evaluator that inspects a schedule and
//! reports, item by item, whether the rule holds. The shared policy in
//! [`evaluate`] turns those items into a score:
//!
//! - **Mandatory**: 1.0 if every item holds, otherwise 0.0 and the
//!   schedule's `valid` flag is cleared.
//! - **Soft**: [`partial_credit`] of the items (one-decimal fraction).
//!
//! Evaluators also collect the courses behind failing items so guided
//! mutation can target them. [`calc_fitness`] runs a whole constraint list
//! and fills in the schedule's fitness, `num_valid` and breakdown.
//!
//! # Submodules
//!
//! - `time_bounds`: before/after clock bounds for courses and instructors
//! - `conflicts`: room overlap, instructor double-booking, capacity, computers
//! - `days`: allowed/forbidden days, labs on T/R, per-day limits
//! - `rooms`: room lists, computer preferences, availability calendars
//! - `spacing`: break windows, overlap avoidance, building adjacency
//! - `sections`: distinct sections of one base course

mod conflicts;
mod days;
mod rooms;
mod sections;
mod spacing;
mod time_bounds;

use std::collections::BTreeMap;

use crate::models::{
    Catalog, Constraint, ConstraintKind, ConstraintScore, CourseId, InstructorId, RoomCalendar,
    Schedule, Section,
};

/// Default back-to-back threshold in minutes.
pub const DEFAULT_SEQUENTIAL_THRESHOLD: i32 = 15;

/// Read-only context a constraint is scored in.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Course, room and instructor tables.
    pub catalog: &'a Catalog,
    /// Room availability statements.
    pub calendar: &'a RoomCalendar,
    /// Maximum gap (minutes) for two sections to count as back-to-back.
    pub sequential_threshold: i32,
}

impl<'a> EvalContext<'a> {
    /// Creates a context with the default sequential threshold.
    pub fn new(catalog: &'a Catalog, calendar: &'a RoomCalendar) -> Self {
        Self {
            catalog,
            calendar,
            sequential_threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
        }
    }

    /// Sets the sequential threshold.
    pub fn with_sequential_threshold(mut self, minutes: i32) -> Self {
        self.sequential_threshold = minutes;
        self
    }
}

/// Result of scoring one constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintOutcome {
    /// Score before weighting, in `0.0..=1.0`.
    pub score: f64,
    /// Courses behind failing items, without duplicates.
    pub failed: Vec<CourseId>,
}

/// Item-level findings of an evaluator.
#[derive(Debug, Clone, Default)]
pub(crate) struct Evaluation {
    holds: Vec<bool>,
    failed: Vec<CourseId>,
}

impl Evaluation {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records an item; a failing item blames `course`.
    pub(crate) fn check(&mut self, holds: bool, course: CourseId) {
        self.holds.push(holds);
        if !holds {
            self.blame(course);
        }
    }

    /// Adds `course` to the failed list once.
    pub(crate) fn blame(&mut self, course: CourseId) {
        if !self.failed.contains(&course) {
            self.failed.push(course);
        }
    }

    /// Records an item without blaming a course.
    pub(crate) fn push(&mut self, holds: bool) {
        self.holds.push(holds);
    }

    fn all_hold(&self) -> bool {
        self.holds.iter().all(|&h| h)
    }
}

/// Fraction of items that hold, rounded to one decimal.
///
/// An empty item list scores 0.
pub fn partial_credit(holds: &[bool]) -> f64 {
    if holds.is_empty() {
        return 0.0;
    }
    let passed = holds.iter().filter(|&&h| h).count() as f64;
    round_to_tenth(passed / holds.len() as f64)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scores `constraint` on `schedule` without touching the schedule.
///
/// Reads the schedule's sections, so call
/// [`Schedule::update_sections`] after changing placements.
pub fn assess(constraint: &Constraint, ctx: &EvalContext<'_>, schedule: &Schedule) -> ConstraintOutcome {
    let eval = dispatch(&constraint.kind, ctx, schedule);
    let score = if constraint.mandatory {
        if eval.all_hold() {
            1.0
        } else {
            0.0
        }
    } else {
        partial_credit(&eval.holds)
    };
    ConstraintOutcome {
        score,
        failed: eval.failed,
    }
}

/// Scores `constraint` on `schedule`, clearing `schedule.valid` when a
/// mandatory constraint fails.
pub fn evaluate(
    constraint: &Constraint,
    ctx: &EvalContext<'_>,
    schedule: &mut Schedule,
) -> ConstraintOutcome {
    let outcome = assess(constraint, ctx, schedule);
    if constraint.mandatory && outcome.score < 1.0 {
        schedule.valid = false;
    }
    outcome
}

/// Full fitness pass over `constraints` in order.
///
/// Rebuilds sections, then resets `valid` to whether every course sits on
/// exactly its cell count (and the schedule is complete). Each constraint's
/// weighted score is recorded in `breakdown`; weighted constraints sum into
/// `fitness`, informational ones into `num_valid`. Evaluation stops after
/// the first constraint that leaves the schedule invalid.
pub fn calc_fitness(constraints: &[Constraint], ctx: &EvalContext<'_>, schedule: &mut Schedule) {
    schedule.update_sections(ctx.catalog);

    let counts = schedule.placement_counts(ctx.catalog.courses().len());
    let exact = ctx
        .catalog
        .courses()
        .iter()
        .zip(&counts)
        .all(|(course, &count)| count == course.cell_count());

    schedule.valid = schedule.complete && exact;
    schedule.fitness = 0.0;
    schedule.num_valid = 0.0;
    schedule.breakdown.clear();

    if !schedule.valid {
        return;
    }

    for constraint in constraints {
        let outcome = evaluate(constraint, ctx, schedule);
        let weighted = constraint.weighted(outcome.score);
        schedule.breakdown.insert(
            constraint.name.clone(),
            ConstraintScore {
                score: weighted,
                weight: constraint.weight,
            },
        );
        if constraint.is_informational() {
            schedule.num_valid += outcome.score;
        } else {
            schedule.fitness += weighted;
        }
        if !schedule.valid {
            log::trace!("fitness pass stopped at '{}'", constraint.name);
            break;
        }
    }
}

fn dispatch(kind: &ConstraintKind, ctx: &EvalContext<'_>, schedule: &Schedule) -> Evaluation {
    use ConstraintKind::*;
    match kind {
        CoursesBefore { courses, time } => time_bounds::courses_before(schedule, courses, *time),
        CoursesAfter { courses, time } => time_bounds::courses_after(schedule, courses, *time),
        InstructorBefore { instructor, time } => {
            time_bounds::instructor_before(ctx, schedule, *instructor, *time)
        }
        InstructorAfter { instructor, time } => {
            time_bounds::instructor_after(ctx, schedule, *instructor, *time)
        }
        InstructorBreak { instructor, window } => {
            time_bounds::instructor_break(ctx, schedule, *instructor, window)
        }
        NoRoomOverlap => conflicts::no_room_overlap(schedule),
        InstructorConflict => conflicts::instructor_conflict(schedule),
        RoomCapacity => conflicts::room_capacity(ctx, schedule),
        ComputerRequirement => conflicts::computer_requirement(ctx, schedule),
        CourseDays { course, days } => days::course_days(schedule, *course, days, true),
        CourseForbiddenDays { course, days } => days::course_days(schedule, *course, days, false),
        InstructorDays { instructor, days } => days::instructor_days(schedule, *instructor, days),
        LabOnTr { courses } => days::lab_on_tr(schedule, courses),
        InstructorMaxPerDay { instructor, max } => {
            days::instructor_max_per_day(schedule, *instructor, *max)
        }
        CourseRooms { course, rooms } => rooms::course_rooms(schedule, *course, rooms),
        InstructorComputers {
            instructor,
            prefers_computers,
        } => rooms::instructor_computers(ctx, schedule, *instructor, *prefers_computers),
        RoomAvailability => rooms::room_availability(ctx, schedule),
        RoomWindow { room, statement } => rooms::room_window(schedule, *room, statement),
        AvoidWindow {
            courses,
            window,
            days,
        } => spacing::avoid_window(schedule, courses, window, days),
        AvoidCourseOverlap { courses, blocking } => {
            spacing::avoid_course_overlap(schedule, courses, blocking)
        }
        SequentialBuildings => spacing::sequential_buildings(ctx, schedule),
        NoThreeSequential => spacing::no_three_sequential(ctx, schedule),
        SectionsAtDifferentTimes => sections::sections_at_different_times(ctx, schedule),
    }
}

/// Sections grouped by instructor (sections without one are skipped).
pub(crate) fn sections_by_instructor(schedule: &Schedule) -> BTreeMap<InstructorId, Vec<&Section>> {
    let mut grouped: BTreeMap<InstructorId, Vec<&Section>> = BTreeMap::new();
    for section in schedule.sections() {
        if let Some(instructor) = section.instructor {
            grouped.entry(instructor).or_default().push(section);
        }
    }
    grouped
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small hand-placed timetables shared by the evaluator tests.

    use crate::models::{Catalog, Course, CourseId, Day, Room, RoomCalendar, RoomId, Schedule};

    /// Catalog with three rooms in two buildings and overlapping MWF times.
    pub fn catalog(courses: Vec<Course>) -> Catalog {
        Catalog::new(
            courses,
            vec![
                Room::new("cheek", "308").with_capacity(30).with_computers(true),
                Room::new("cheek", "101").with_capacity(80),
                Room::new("temple", "200").with_capacity(40),
            ],
            ["08:00-08:50", "09:00-09:50", "10:00-10:50", "11:00-12:00", "11:30-12:30", "13:00-13:50"]
                .iter()
                .map(|s| s.parse().unwrap())
                .collect(),
            ["08:00-09:15", "09:30-10:45", "11:00-12:15", "13:00-14:15"]
                .iter()
                .map(|s| s.parse().unwrap())
                .collect(),
        )
    }

    /// Places `course` in `room` on `days` at `start`.
    pub fn place(s: &mut Schedule, course: CourseId, room: RoomId, days: &[Day], start: &str) {
        for &day in days {
            let id = s
                .grid()
                .locate(day, room, start.parse().unwrap())
                .expect("fixture cell exists");
            s.set_course(id, Some(course));
        }
    }

    pub fn schedule(cat: &Catalog) -> Schedule {
        Schedule::new(cat.grid().clone())
    }

    pub fn no_calendar() -> RoomCalendar {
        RoomCalendar::new()
    }
}
