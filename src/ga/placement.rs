//! Randomized course placement.
//!
//! Packs courses into open cells of a schedule so that each course lands on
//! exactly `credit` cells of one room and one start time with a legal day
//! pattern:
//!
//! | Credit | Days |
//! |--------|------|
//! | 1 | one day (T/R for labs, M/W/F otherwise) |
//! | 3 | M/W/F or T/R |
//! | 4 | M/W/F plus one of T/R |
//! | 5 | all five days |
//!
//! # Algorithm
//!
//! For each course, candidates are the open cells whose room can host it.
//! A random anchor is drawn from the candidate pool and its row (same room
//! and start time across days) is inspected. M/W/F and T/R cells of a row
//! may end at different times; a four-credit course takes the T/R cell's
//! own range on its fifth day. If the row's open cells admit
//! the course's pattern, the cells are committed; otherwise the whole row
//! is evicted from the pool and a new anchor is drawn. An exhausted pool
//! marks the schedule incomplete and stops placement for that schedule.
//!
//! Courses are processed by credit, largest first, so wide patterns claim
//! rows before single cells fragment them.

use rand::Rng;
use rand::prelude::IndexedRandom;

use crate::error::SchedulerError;
use crate::models::{Catalog, Course, CourseId, Day, Schedule, SlotId};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Open cells still eligible for one course.
///
/// Keeps each cell's position so removal is O(1) (swap-remove).
#[derive(Debug, Clone)]
pub struct CandidatePool {
    items: Vec<SlotId>,
    positions: Vec<Option<usize>>,
}

impl CandidatePool {
    /// Creates a pool over a grid of `grid_len` cells.
    pub fn new(grid_len: usize, candidates: impl IntoIterator<Item = SlotId>) -> Self {
        let mut pool = Self {
            items: Vec::new(),
            positions: vec![None; grid_len],
        };
        for id in candidates {
            pool.insert(id);
        }
        pool
    }

    fn insert(&mut self, id: SlotId) {
        if self.positions[id].is_none() {
            self.positions[id] = Some(self.items.len());
            self.items.push(id);
        }
    }

    /// Number of cells in the pool.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the pool is exhausted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a cell is in the pool.
    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        self.positions.get(id).is_some_and(Option::is_some)
    }

    /// Removes a cell; returns whether it was present.
    pub fn remove(&mut self, id: SlotId) -> bool {
        let Some(pos) = self.positions.get_mut(id).and_then(Option::take) else {
            return false;
        };
        self.items.swap_remove(pos);
        if let Some(&moved) = self.items.get(pos) {
            self.positions[moved] = Some(pos);
        }
        true
    }

    /// Draws a random cell without removing it.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<SlotId> {
        self.items.choose(rng).copied()
    }
}

/// Day pattern a course must occupy, derived from its credit hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditPattern {
    /// One cell on one day.
    Single,
    /// M/W/F or T/R.
    Three,
    /// M/W/F plus T or R.
    Four,
    /// All five days.
    Five,
}

impl CreditPattern {
    /// Pattern for a credit count (1, 3, 4, 5).
    pub fn for_credit(credit: u8) -> Option<Self> {
        match credit {
            1 => Some(Self::Single),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            _ => None,
        }
    }

    /// Credit hours the pattern covers.
    pub fn credit(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }
}

/// Fills `courses` into the open cells among `open`.
///
/// Prescheduled courses are stamped at their fixed cells first. A course
/// that cannot be placed marks the schedule incomplete and stops the fill;
/// that is a search outcome, not an error.
///
/// # Errors
/// Returns an error only for a credit count with no placement pattern.
pub fn randomly_fill_schedule<R: Rng>(
    schedule: &mut Schedule,
    catalog: &Catalog,
    courses: &[CourseId],
    open: &[SlotId],
    rng: &mut R,
) -> Result<(), SchedulerError> {
    let (fixed, mut regular): (Vec<CourseId>, Vec<CourseId>) = courses
        .iter()
        .copied()
        .partition(|&c| catalog.course(c).is_prescheduled());

    for course in fixed {
        if !stamp_prescheduled(schedule, catalog, course) {
            return Ok(());
        }
    }

    regular.sort_by(|a, b| catalog.course(*b).credit.cmp(&catalog.course(*a).credit));

    for course_id in regular {
        let course = catalog.course(course_id);
        let pattern = CreditPattern::for_credit(course.credit).ok_or_else(|| {
            SchedulerError::InvalidInput(vec![ValidationError::new(
                ValidationErrorKind::InvalidCreditHours,
                format!("course '{}' has unsupported credit hours {}", course.label(), course.credit),
            )])
        })?;

        let grid = schedule.grid();
        let candidates: Vec<SlotId> = open
            .iter()
            .copied()
            .filter(|&id| {
                schedule.is_open(id)
                    && catalog
                        .room(grid.get(id).room)
                        .can_host(course.capacity, course.needs_computers)
            })
            .collect();
        if candidates.is_empty() {
            log::debug!("no eligible cells for {}", course.label());
            schedule.mark_incomplete();
            return Ok(());
        }

        let mut pool = CandidatePool::new(grid.len(), candidates);
        if !place_course(schedule, catalog, course_id, pattern, &mut pool, rng)? {
            log::debug!("candidate pool exhausted for {}", course.label());
            schedule.mark_incomplete();
            return Ok(());
        }
    }

    Ok(())
}

/// Places one course with `pattern`, drawing anchors from `pool`.
///
/// Returns `Ok(false)` when the pool is exhausted.
///
/// # Errors
/// [`SchedulerError::CreditMismatch`] when the course's credit hours do not
/// match the pattern.
pub fn place_course<R: Rng>(
    schedule: &mut Schedule,
    catalog: &Catalog,
    course_id: CourseId,
    pattern: CreditPattern,
    pool: &mut CandidatePool,
    rng: &mut R,
) -> Result<bool, SchedulerError> {
    let course = catalog.course(course_id);
    if course.credit != pattern.credit() {
        return Err(SchedulerError::CreditMismatch {
            course: course.label(),
            expected: pattern.credit(),
            actual: course.credit,
        });
    }

    let mut attempts = 0usize;
    while let Some(anchor) = pool.choose(rng) {
        attempts += 1;
        let row: Vec<SlotId> = schedule
            .grid()
            .row(anchor)
            .iter()
            .copied()
            .filter(|&id| schedule.is_open(id) && pool.contains(id))
            .collect();

        match select_cells(schedule, course, pattern, anchor, &row, rng) {
            Some(cells) => {
                for id in cells {
                    schedule.set_course(id, Some(course_id));
                    pool.remove(id);
                }
                log::trace!("placed {} after {} draws", course.label(), attempts);
                return Ok(true);
            }
            None => {
                for &id in &row {
                    pool.remove(id);
                }
                pool.remove(anchor);
            }
        }
    }
    Ok(false)
}

/// Picks the cells of `row` (open cells of one room and start time) that satisfy
/// `pattern`, or `None` if the row cannot host the course.
fn select_cells<R: Rng>(
    schedule: &Schedule,
    course: &Course,
    pattern: CreditPattern,
    anchor: SlotId,
    row: &[SlotId],
    rng: &mut R,
) -> Option<Vec<SlotId>> {
    let grid = schedule.grid();
    let on = |days: &[Day]| -> Vec<SlotId> {
        row.iter()
            .copied()
            .filter(|&id| days.contains(&grid.get(id).day))
            .collect()
    };
    let mwf = on(&Day::MWF);
    let tr = on(&Day::TR);
    let full_mwf = mwf.len() == Day::MWF.len();
    let full_tr = tr.len() == Day::TR.len();

    match pattern {
        CreditPattern::Five => (full_mwf && full_tr).then(|| row.to_vec()),
        CreditPattern::Four => {
            if !full_mwf {
                return None;
            }
            let extra = tr.choose(rng)?;
            let mut cells = mwf;
            cells.push(*extra);
            Some(cells)
        }
        CreditPattern::Three => {
            let anchor_tr = grid.get(anchor).is_tr();
            match (anchor_tr, full_mwf, full_tr) {
                (false, true, _) | (true, true, false) => Some(mwf),
                (true, _, true) | (false, false, true) => Some(tr),
                _ => None,
            }
        }
        CreditPattern::Single => {
            let cells = if course.is_lab { tr } else { mwf };
            cells.choose(rng).map(|&id| vec![id])
        }
    }
}

/// Stamps a prescheduled course at its fixed cells.
///
/// Returns `false` (and marks the schedule incomplete) if the room is
/// unknown or any fixed cell is missing or taken. Nothing is overwritten.
pub fn stamp_prescheduled(schedule: &mut Schedule, catalog: &Catalog, course_id: CourseId) -> bool {
    let course = catalog.course(course_id);
    let Some(fixed) = &course.prescheduled else {
        return false;
    };

    let cells: Option<Vec<SlotId>> = catalog.room_by_name(&fixed.room).and_then(|room| {
        fixed
            .days
            .iter()
            .map(|&day| {
                schedule
                    .grid()
                    .locate(day, room, fixed.time.start)
                    .filter(|&id| schedule.is_open(id))
            })
            .collect()
    });

    match cells {
        Some(cells) if !cells.is_empty() => {
            for id in cells {
                schedule.set_course(id, Some(course_id));
            }
            true
        }
        _ => {
            log::debug!("fixed time for {} is unavailable", course.label());
            schedule.mark_incomplete();
            false
        }
    }
}

/// Whether every placed course sits on `credit` cells of one room and start
/// time with a legal day pattern.
pub fn placement_is_legal(schedule: &Schedule, catalog: &Catalog) -> bool {
    let counts = schedule.placement_counts(catalog.courses().len());
    catalog.courses().iter().enumerate().all(|(id, course)| {
        if counts[id] == 0 {
            return true;
        }
        let cells = schedule.find_course(id);
        let Some(first) = cells.first() else {
            return false;
        };
        let same_row = cells
            .iter()
            .all(|c| c.room == first.room && c.time.start == first.time.start);
        let days: Vec<Day> = cells.iter().map(|c| c.day).collect();
        let pattern_ok = match &course.prescheduled {
            Some(fixed) => {
                let mut fixed_days = fixed.days.clone();
                fixed_days.sort();
                days == fixed_days
            }
            None => course.matches_day_pattern(&days),
        };
        counts[id] == cells.len() && same_row && pattern_ok
    })
}
