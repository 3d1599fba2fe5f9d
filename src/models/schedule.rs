//! Schedule (one candidate week) model.
//!
//! A schedule is a full-week assignment of courses to grid cells. It is
//! the individual of the genetic search: created empty, filled by
//! randomized placement or crossover, scored repeatedly, and kept or
//! culled by selection.
//!
//! # Storage
//! The cell layout lives in a shared [`SlotGrid`]; a schedule only owns
//! the occupancy vector (one `Option<CourseId>` per cell) and its derived
//! scores. Cloning is therefore a cheap deep copy, and
//! [`Schedule::snapshot`] / [`Schedule::restore`] give rollback without
//! cloning the grid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Catalog, CourseId, Day, InstructorId, RoomId, SlotGrid, SlotId, TimeRange};

/// One cell of a schedule together with its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// Arena index.
    pub id: SlotId,
    /// Teaching day.
    pub day: Day,
    /// Room index.
    pub room: RoomId,
    /// Meeting time.
    pub time: TimeRange,
    /// Course placed here, if any.
    pub course: Option<CourseId>,
}

impl TimeSlot {
    /// Whether no course occupies the cell.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.course.is_none()
    }
}

/// Score a constraint achieved on a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintScore {
    /// Weighted score (raw score when weight is 0).
    pub score: f64,
    /// Constraint weight.
    pub weight: u32,
}

impl ConstraintScore {
    /// Whether the constraint reached its full weight.
    pub fn is_full(&self) -> bool {
        let full = if self.weight == 0 { 1.0 } else { f64::from(self.weight) };
        (self.score - full).abs() < 1e-9
    }
}

/// Derived join of a placed course with its instructor, room and days.
///
/// Cross-cutting constraints (instructor conflicts, building adjacency,
/// per-day limits) read sections instead of walking the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Placed course.
    pub course: CourseId,
    /// Instructor teaching it.
    pub instructor: Option<InstructorId>,
    /// Room of its first cell.
    pub room: RoomId,
    /// Days it meets, in week order.
    pub days: Vec<Day>,
    /// Time of its first cell.
    pub time: TimeRange,
    /// Day and time of every cell, in week order. A four-credit section
    /// meets longer on its T/R day than on M/W/F.
    pub meetings: Vec<(Day, TimeRange)>,
    /// Cells it occupies.
    pub slots: Vec<SlotId>,
}

impl Section {
    /// Whether two sections meet on at least one common day.
    pub fn shares_day(&self, other: &Section) -> bool {
        self.days.iter().any(|d| other.days.contains(d))
    }

    /// Meeting time on `day`, if the section meets then.
    pub fn time_on(&self, day: Day) -> Option<TimeRange> {
        self.meetings
            .iter()
            .find(|(d, _)| *d == day)
            .map(|&(_, time)| time)
    }

    /// Pairs of meeting times (this section's, then `other`'s) on each day
    /// both sections meet.
    pub fn shared_meetings<'a>(
        &'a self,
        other: &'a Section,
    ) -> impl Iterator<Item = (TimeRange, TimeRange)> + 'a {
        self.meetings.iter().flat_map(move |&(day, mine)| {
            other
                .meetings
                .iter()
                .filter(move |(d, _)| *d == day)
                .map(move |&(_, theirs)| (mine, theirs))
        })
    }
}

/// Saved occupancy and scores for rollback.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    occupancy: Vec<Option<CourseId>>,
    valid: bool,
    complete: bool,
    fitness: f64,
    num_valid: f64,
    breakdown: BTreeMap<String, ConstraintScore>,
}

/// A candidate full-week timetable.
#[derive(Debug, Clone)]
pub struct Schedule {
    grid: Arc<SlotGrid>,
    occupancy: Vec<Option<CourseId>>,
    /// Hard constraints hold (as of the last fitness pass).
    pub valid: bool,
    /// Every course was placed.
    pub complete: bool,
    /// Weighted sum of constraint scores.
    pub fitness: f64,
    /// Sum of scores of informational (weight 0) constraints.
    pub num_valid: f64,
    /// Constraint name → achieved score.
    pub breakdown: BTreeMap<String, ConstraintScore>,
    sections: Vec<Section>,
}

impl Schedule {
    /// Creates an empty schedule over a grid.
    pub fn new(grid: Arc<SlotGrid>) -> Self {
        let cells = grid.len();
        Self {
            grid,
            occupancy: vec![None; cells],
            valid: true,
            complete: true,
            fitness: 0.0,
            num_valid: 0.0,
            breakdown: BTreeMap::new(),
            sections: Vec::new(),
        }
    }

    /// The shared grid.
    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Cell view by id.
    pub fn slot(&self, id: SlotId) -> TimeSlot {
        let spec = self.grid.get(id);
        TimeSlot {
            id,
            day: spec.day,
            room: spec.room,
            time: spec.time,
            course: self.occupancy[id],
        }
    }

    /// Course in a cell.
    #[inline]
    pub fn course_at(&self, id: SlotId) -> Option<CourseId> {
        self.occupancy[id]
    }

    /// Whether a cell is free.
    #[inline]
    pub fn is_open(&self, id: SlotId) -> bool {
        self.occupancy[id].is_none()
    }

    /// Puts `course` in a cell, returning the previous occupant.
    pub fn set_course(&mut self, id: SlotId, course: Option<CourseId>) -> Option<CourseId> {
        std::mem::replace(&mut self.occupancy[id], course)
    }

    /// Exchanges the occupants of the same cell between two schedules.
    pub fn swap_cell(&mut self, other: &mut Schedule, id: SlotId) {
        std::mem::swap(&mut self.occupancy[id], &mut other.occupancy[id]);
    }

    /// All cells in arena order.
    pub fn list_time_slots(&self) -> Vec<TimeSlot> {
        (0..self.occupancy.len()).map(|id| self.slot(id)).collect()
    }

    /// Cells holding a course.
    pub fn occupied(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        (0..self.occupancy.len())
            .filter(|&id| self.occupancy[id].is_some())
            .map(|id| self.slot(id))
    }

    /// Free cells.
    pub fn find_empty_time_slots(&self) -> Vec<TimeSlot> {
        (0..self.occupancy.len())
            .filter(|&id| self.occupancy[id].is_none())
            .map(|id| self.slot(id))
            .collect()
    }

    /// Cells holding `course`, in day order.
    pub fn find_course(&self, course: CourseId) -> Vec<TimeSlot> {
        (0..self.occupancy.len())
            .filter(|&id| self.occupancy[id] == Some(course))
            .map(|id| self.slot(id))
            .collect()
    }

    /// First cell (earliest day) holding `course`.
    pub fn first_slot_of(&self, course: CourseId) -> Option<TimeSlot> {
        self.occupancy
            .iter()
            .position(|c| *c == Some(course))
            .map(|id| self.slot(id))
    }

    /// Cells of the same room and time as `id` across all days.
    pub fn find_matching_time_slot_row(&self, id: SlotId) -> Vec<TimeSlot> {
        self.grid.row(id).iter().map(|&cell| self.slot(cell)).collect()
    }

    /// Frees every cell of `course`; returns how many were freed.
    pub fn unschedule_course(&mut self, course: CourseId) -> usize {
        let mut freed = 0;
        for cell in self.occupancy.iter_mut() {
            if *cell == Some(course) {
                *cell = None;
                freed += 1;
            }
        }
        freed
    }

    /// Number of cells holding each course (`counts[course]`).
    pub fn placement_counts(&self, course_count: usize) -> Vec<usize> {
        let mut counts = vec![0; course_count];
        for course in self.occupancy.iter().flatten() {
            if let Some(n) = counts.get_mut(*course) {
                *n += 1;
            }
        }
        counts
    }

    /// Flags a placement dead-end: invalid and incomplete.
    pub fn mark_incomplete(&mut self) {
        self.valid = false;
        self.complete = false;
    }

    /// Fully independent copy.
    pub fn deep_copy(&self) -> Schedule {
        self.clone()
    }

    /// Captures occupancy and scores for a later [`restore`](Self::restore).
    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            occupancy: self.occupancy.clone(),
            valid: self.valid,
            complete: self.complete,
            fitness: self.fitness,
            num_valid: self.num_valid,
            breakdown: self.breakdown.clone(),
        }
    }

    /// Rolls back to a snapshot taken from this schedule.
    ///
    /// Sections are not part of the snapshot; call
    /// [`update_sections`](Self::update_sections) before scoring again.
    pub fn restore(&mut self, snapshot: ScheduleSnapshot) {
        self.occupancy = snapshot.occupancy;
        self.valid = snapshot.valid;
        self.complete = snapshot.complete;
        self.fitness = snapshot.fitness;
        self.num_valid = snapshot.num_valid;
        self.breakdown = snapshot.breakdown;
    }

    /// Rebuilds the section join from the current occupancy.
    pub fn update_sections(&mut self, catalog: &Catalog) {
        let mut by_course: BTreeMap<CourseId, Vec<SlotId>> = BTreeMap::new();
        for (id, cell) in self.occupancy.iter().enumerate() {
            if let Some(course) = cell {
                by_course.entry(*course).or_default().push(id);
            }
        }

        self.sections = by_course
            .into_iter()
            .map(|(course, slots)| {
                let first = self.grid.get(slots[0]);
                let meetings: Vec<(Day, TimeRange)> = slots
                    .iter()
                    .map(|&id| {
                        let cell = self.grid.get(id);
                        (cell.day, cell.time)
                    })
                    .collect();
                let mut days: Vec<Day> = meetings.iter().map(|&(day, _)| day).collect();
                days.sort();
                days.dedup();
                Section {
                    course,
                    instructor: catalog.instructor_of(course),
                    room: first.room,
                    days,
                    time: first.time,
                    meetings,
                    slots,
                }
            })
            .collect();
    }

    /// Sections from the last [`update_sections`](Self::update_sections).
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section of a course, if placed.
    pub fn section_for(&self, course: CourseId) -> Option<&Section> {
        self.sections.iter().find(|s| s.course == course)
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|c| c.is_some()).count()
    }
}
