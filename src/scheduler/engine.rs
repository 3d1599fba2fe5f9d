//! The scheduler: catalog, constraint registry and population.
//!
//! # Algorithm
//!
//! 1. Validate inputs and build the catalog and slot grid.
//! 2. Register constraints (user, universal, instructor preferences, room
//!    availability).
//! 3. Generate random schedules by constraint-aware placement.
//! 4. Score them, then breed: every pair crosses over with odds that grow
//!    with validity and fitness; children are appended.
//!
//! The generational loop that drives steps 3 and 4 lives in
//! [`evolution`](super::evolution).
//!
//! # Reference
//! Burke, Elliman & Weare (1994), "A genetic algorithm based university
//! timetabling system"

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::export::PlacementRecord;
use crate::ga::{crossover, crossover_probability, randomly_fill_schedule};
use crate::models::{
    Availability, AvailabilityStatement, Catalog, Constraint, ConstraintKind, Course, CourseId,
    Day, InstructorPreferences, Room, RoomCalendar, Schedule, SlotId, TimeRange,
};
use crate::scoring::{calc_fitness, EvalContext};
use crate::validation::{parse_ranges, validate_input};

/// Course timetabling engine.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Course, Room};
/// use u_timetable::scheduler::{Scheduler, SchedulerConfig};
///
/// let courses = vec![
///     Course::new("csc", "130", "001").with_instructor("shade"),
///     Course::new("csc", "232", "001").with_instructor("volmar"),
/// ];
/// let rooms = vec![Room::new("cheek", "308").with_capacity(30)];
/// let mut scheduler = Scheduler::new(
///     courses,
///     rooms,
///     &["09:00-09:50", "10:00-10:50"],
///     &["09:30-10:45", "11:00-12:15"],
///     1,
///     SchedulerConfig::default().with_seed(42),
/// )
/// .unwrap();
/// scheduler.add_universal_constraints().unwrap();
/// scheduler.generate_starting_population(10).unwrap();
/// assert_eq!(scheduler.population().len(), 10);
/// ```
#[derive(Debug)]
pub struct Scheduler {
    pub(super) catalog: Catalog,
    pub(super) calendar: RoomCalendar,
    pub(super) constraints: Vec<Constraint>,
    pub(super) slot_divide: usize,
    pub(super) config: SchedulerConfig,
    pub(super) population: Vec<Schedule>,
    pub(super) rng: SmallRng,
}

impl Scheduler {
    /// Validates the inputs and builds a scheduler.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidInput`] with every problem found.
    pub fn new(
        courses: Vec<Course>,
        rooms: Vec<Room>,
        mwf: &[&str],
        tr: &[&str],
        slot_divide: usize,
        config: SchedulerConfig,
    ) -> Result<Self, SchedulerError> {
        validate_input(&courses, &rooms, mwf, tr, slot_divide).map_err(SchedulerError::InvalidInput)?;

        let catalog = Catalog::new(courses, rooms, parse_ranges(mwf), parse_ranges(tr));
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        log::info!(
            "scheduler ready: {} courses, {} rooms, {} cells",
            catalog.courses().len(),
            catalog.rooms().len(),
            catalog.grid().len()
        );

        Ok(Self {
            catalog,
            calendar: RoomCalendar::new(),
            constraints: Vec::new(),
            slot_divide,
            config,
            population: Vec::new(),
            rng,
        })
    }

    // ======================== Constraints ========================

    /// Registers a constraint.
    ///
    /// Returns `Ok(false)` when a constraint of the same name already
    /// exists (the registry is left unchanged).
    ///
    /// # Errors
    /// [`SchedulerError::InvalidConstraint`] for an empty name or a rule
    /// that refers to a course, instructor or room that does not exist.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<bool, SchedulerError> {
        if constraint.name.trim().is_empty() {
            return Err(invalid_constraint(&constraint.name, "name is empty"));
        }
        if self.constraints.iter().any(|c| c.name == constraint.name) {
            log::debug!("constraint '{}' already registered", constraint.name);
            return Ok(false);
        }
        self.check_references(&constraint)?;

        log::debug!(
            "registered '{}' (weight {}, mandatory {})",
            constraint.name,
            constraint.weight,
            constraint.mandatory
        );
        self.constraints.push(constraint);
        Ok(true)
    }

    fn check_references(&self, constraint: &Constraint) -> Result<(), SchedulerError> {
        let kind = &constraint.kind;
        if let Some(id) = kind
            .course_refs()
            .into_iter()
            .find(|&id| id >= self.catalog.courses().len())
        {
            return Err(invalid_constraint(&constraint.name, format!("no course with id {id}")));
        }
        if let Some(id) = kind
            .instructor_ref()
            .filter(|&id| id >= self.catalog.instructors().len())
        {
            return Err(invalid_constraint(&constraint.name, format!("no instructor with id {id}")));
        }
        if let Some(id) = kind
            .room_refs()
            .iter()
            .find(|&&id| id >= self.catalog.rooms().len())
        {
            return Err(invalid_constraint(&constraint.name, format!("no room with id {id}")));
        }
        Ok(())
    }

    /// Removes every constraint.
    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    /// Removes the named constraints.
    ///
    /// Names of the form `<room>_Avail_<start>_<end>_<days>` or
    /// `<room>_NotAvail_<start>_<end>_<days>` also drop the matching room
    /// availability statement. Returns how many constraints were removed.
    pub fn delete_list_constraints(&mut self, names: &[&str]) -> usize {
        let mut removed = 0;
        for name in names {
            if let Some((room, statement)) = parse_availability_name(name) {
                self.calendar.remove(&room, &statement);
            }
            if let Some(pos) = self.constraints.iter().position(|c| c.name == *name) {
                self.constraints.remove(pos);
                removed += 1;
            }
        }
        removed
    }

    /// Registers the hard structural rules as mandatory, informational,
    /// universal constraints.
    pub fn add_universal_constraints(&mut self) -> Result<(), SchedulerError> {
        let rules = [
            ("no_room_overlap", ConstraintKind::NoRoomOverlap),
            ("instructor_conflict", ConstraintKind::InstructorConflict),
            ("room_capacity", ConstraintKind::RoomCapacity),
            ("computer_requirement", ConstraintKind::ComputerRequirement),
            ("sections_at_different_times", ConstraintKind::SectionsAtDifferentTimes),
            ("room_availability", ConstraintKind::RoomAvailability),
        ];
        for (name, kind) in rules {
            self.add_constraint(Constraint::mandatory(name, 0, kind).with_universal(true))?;
        }
        Ok(())
    }

    /// Replaces an instructor's preferences.
    pub fn set_instructor_preferences(
        &mut self,
        name: &str,
        preferences: InstructorPreferences,
    ) -> Result<(), SchedulerError> {
        let id = self
            .catalog
            .instructor_by_name(name)
            .ok_or_else(|| SchedulerError::UnknownInstructor(name.to_string()))?;
        self.catalog.instructor_mut(id).preferences = preferences;
        Ok(())
    }

    /// Derives soft constraints from every instructor's preferences.
    ///
    /// Returns how many new constraints were registered.
    pub fn add_instructor_preference_constraints(&mut self, weight: u32) -> Result<usize, SchedulerError> {
        let mut derived = Vec::new();
        for (id, instructor) in self.catalog.instructors().iter().enumerate() {
            let name = &instructor.name;
            let prefs = &instructor.preferences;
            if let Some(time) = prefs.not_before {
                derived.push(Constraint::new(
                    format!("{name}_time_pref_after_{time}"),
                    weight,
                    ConstraintKind::InstructorAfter { instructor: id, time },
                ));
            }
            if let Some(time) = prefs.not_after {
                derived.push(Constraint::new(
                    format!("{name}_time_pref_before_{time}"),
                    weight,
                    ConstraintKind::InstructorBefore { instructor: id, time },
                ));
            }
            if let Some(days) = &prefs.days {
                derived.push(Constraint::new(
                    format!("{name}_days_{}", Day::codes(days)),
                    weight,
                    ConstraintKind::InstructorDays {
                        instructor: id,
                        days: days.clone(),
                    },
                ));
            }
            if let Some(prefers_computers) = prefs.prefers_computers {
                derived.push(Constraint::new(
                    format!("{name}_prefers_computers_{prefers_computers}"),
                    weight,
                    ConstraintKind::InstructorComputers {
                        instructor: id,
                        prefers_computers,
                    },
                ));
            }
            if let Some(max) = prefs.max_per_day {
                derived.push(Constraint::new(
                    format!("{name}_max_courses_{max}"),
                    weight,
                    ConstraintKind::InstructorMaxPerDay { instructor: id, max },
                ));
            }
        }

        let mut added = 0;
        for constraint in derived {
            if self.add_constraint(constraint)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Appends an availability statement to a room's calendar.
    ///
    /// `days` is a day-code string (`"mwf"`), `start`/`end` are `HH:MM`.
    pub fn add_room_avail(
        &mut self,
        room: &str,
        is_available: bool,
        days: &str,
        start: &str,
        end: &str,
    ) -> Result<AvailabilityStatement, SchedulerError> {
        if self.catalog.room_by_name(room).is_none() {
            return Err(SchedulerError::UnknownRoom(room.to_string()));
        }
        let availability = if is_available {
            Availability::Available
        } else {
            Availability::Blackout
        };
        let statement = self.calendar.add(room, availability, days, start, end)?;
        log::debug!(
            "room {room}: {} {} on {}",
            availability.sign(),
            statement.window,
            Day::codes(&statement.days)
        );
        Ok(statement)
    }

    /// Adds an availability statement together with a named soft
    /// constraint scoring it.
    ///
    /// The constraint scores only this statement, so its weight rewards the
    /// cells that honor it. The statement also joins the calendar read by the
    /// universal `room_availability` rule, which invalidates any violation
    /// when universal constraints are registered.
    ///
    /// The constraint is named `<room>_Avail_<start>_<end>_<days>` (or
    /// `_NotAvail_`), so [`delete_list_constraints`](Self::delete_list_constraints)
    /// removes both. Returns the name.
    pub fn add_room_avail_constraint(
        &mut self,
        room: &str,
        is_available: bool,
        days: &str,
        start: &str,
        end: &str,
        weight: u32,
    ) -> Result<String, SchedulerError> {
        let statement = self.add_room_avail(room, is_available, days, start, end)?;
        let name = availability_name(room, &statement);
        let room_id = self
            .catalog
            .room_by_name(room)
            .ok_or_else(|| SchedulerError::UnknownRoom(room.to_string()))?;
        let kind = ConstraintKind::RoomWindow {
            room: room_id,
            statement: statement.clone(),
        };
        if !self.add_constraint(Constraint::new(name.clone(), weight, kind))? {
            self.calendar.remove(room, &statement);
        }
        Ok(name)
    }

    /// All registered constraints, in evaluation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints added by the user.
    pub fn user_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| !c.universal)
    }

    /// Constraints added by the system.
    pub fn universal_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| c.universal)
    }

    // ======================== Scoring ========================

    /// Highest attainable fitness: the sum of all weights.
    pub fn max_fitness(&self) -> f64 {
        self.constraints.iter().map(|c| f64::from(c.weight)).sum()
    }

    /// Scoring context for this scheduler's catalog and calendar.
    pub fn context(&self) -> EvalContext<'_> {
        EvalContext::new(&self.catalog, &self.calendar)
            .with_sequential_threshold(self.config.sequential_threshold_minutes)
    }

    /// Full fitness pass on one schedule.
    pub fn calc_fitness(&self, schedule: &mut Schedule) {
        calc_fitness(&self.constraints, &self.context(), schedule);
    }

    /// Rescores every schedule in the population.
    pub fn score_population(&mut self) {
        let ctx = EvalContext::new(&self.catalog, &self.calendar)
            .with_sequential_threshold(self.config.sequential_threshold_minutes);
        for schedule in &mut self.population {
            calc_fitness(&self.constraints, &ctx, schedule);
        }
    }

    // ======================== Population ========================

    /// An empty schedule over this scheduler's grid.
    pub fn new_schedule(&self) -> Schedule {
        Schedule::new(self.catalog.grid().clone())
    }

    /// Appends `count` randomly filled schedules to the population.
    pub fn generate_starting_population(&mut self, count: usize) -> Result<(), SchedulerError> {
        self.generate_population_with(count, |_| {})
    }

    /// Like [`generate_starting_population`](Self::generate_starting_population),
    /// calling `on_progress` every `progress_interval` schedules.
    pub(super) fn generate_population_with(
        &mut self,
        count: usize,
        mut on_progress: impl FnMut(usize),
    ) -> Result<(), SchedulerError> {
        let courses: Vec<CourseId> = (0..self.catalog.courses().len()).collect();
        let cells: Vec<SlotId> = (0..self.catalog.grid().len()).collect();
        let interval = self.config.progress_interval.max(1);

        let mut complete = 0;
        for made in 1..=count {
            let mut schedule = Schedule::new(self.catalog.grid().clone());
            randomly_fill_schedule(&mut schedule, &self.catalog, &courses, &cells, &mut self.rng)?;
            if schedule.complete {
                complete += 1;
            }
            self.population.push(schedule);
            if made % interval == 0 {
                on_progress(made);
            }
        }

        if complete == 0 && count > 0 {
            log::warn!("none of {count} generated schedules placed every course");
        } else {
            log::debug!("generated {count} schedules ({complete} complete)");
        }
        Ok(())
    }

    /// Crosses over every pair of schedules with fitness-driven odds and
    /// appends the children.
    ///
    /// Returns the number of children added.
    ///
    /// # Errors
    /// [`SchedulerError::InsufficientPopulation`] with fewer than two
    /// schedules.
    pub fn breed(&mut self) -> Result<usize, SchedulerError> {
        let size = self.population.len();
        if size < 2 {
            return Err(SchedulerError::InsufficientPopulation(size));
        }

        let max_fitness = self.max_fitness();
        let tilt = self.config.crossover_tilt;
        let mut children = Vec::new();
        for i in 0..size - 1 {
            for j in (i + 1)..size {
                let (a, b) = (&self.population[i], &self.population[j]);
                let odds = crossover_probability(a, b, max_fitness, tilt);
                let roll: i64 = self.rng.random_range(0..=100);
                if (odds * 100.0) as i64 > roll {
                    let (c1, c2) = crossover(a, b, &self.catalog, self.slot_divide, &mut self.rng)?;
                    children.push(c1);
                    children.push(c2);
                }
            }
        }

        let added = children.len();
        self.population.extend(children);
        log::debug!("breeding {size} schedules produced {added} children");
        Ok(added)
    }

    /// Builds a schedule from stored placements and scores it.
    ///
    /// The schedule is complete when every course has at least one record.
    ///
    /// # Errors
    /// Unknown courses or rooms, and records whose cells are missing from
    /// the grid or already taken.
    pub fn schedule_from_records(&self, records: &[PlacementRecord]) -> Result<Schedule, SchedulerError> {
        let grid = self.catalog.grid();
        let mut schedule = self.new_schedule();

        for record in records {
            let course = self
                .catalog
                .course_by_label(&record.course)
                .ok_or_else(|| SchedulerError::UnknownCourse(record.course.clone()))?;
            let room = self
                .catalog
                .room_by_name(&record.room)
                .ok_or_else(|| SchedulerError::UnknownRoom(record.room.clone()))?;
            if record.days.is_empty() {
                return Err(invalid_placement(record, "no meeting days".into()));
            }

            for &day in &record.days {
                let id = grid
                    .locate(day, room, record.time.start)
                    .filter(|&id| grid.get(id).time == record.time)
                    .ok_or_else(|| {
                        invalid_placement(
                            record,
                            format!("no {} cell at {} on {day}", record.room, record.time),
                        )
                    })?;
                if let Some(other) = schedule.set_course(id, Some(course)) {
                    return Err(invalid_placement(
                        record,
                        format!("cell already holds '{}'", self.catalog.course(other).label()),
                    ));
                }
            }
        }

        let counts = schedule.placement_counts(self.catalog.courses().len());
        schedule.complete = counts.iter().all(|&n| n > 0);
        self.calc_fitness(&mut schedule);
        Ok(schedule)
    }

    // ======================== Accessors ========================

    /// Current population.
    pub fn population(&self) -> &[Schedule] {
        &self.population
    }

    /// Best schedule: valid before invalid, then highest fitness.
    pub fn best_schedule(&self) -> Option<&Schedule> {
        self.population
            .iter()
            .max_by(|a, b| a.valid.cmp(&b.valid).then(a.fitness.total_cmp(&b.fitness)))
    }

    /// Course, room and instructor tables.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Room availability statements.
    pub fn calendar(&self) -> &RoomCalendar {
        &self.calendar
    }

    /// Engine configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Number of start times exchanged per crossover.
    pub fn slot_divide(&self) -> usize {
        self.slot_divide
    }
}

fn invalid_constraint(name: &str, reason: impl Into<String>) -> SchedulerError {
    SchedulerError::InvalidConstraint {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn invalid_placement(record: &PlacementRecord, reason: String) -> SchedulerError {
    SchedulerError::InvalidPlacement {
        course: record.course.clone(),
        reason,
    }
}

/// `<room>_<Avail|NotAvail>_<start>_<end>_<days>`
fn availability_name(room: &str, statement: &AvailabilityStatement) -> String {
    format!(
        "{room}_{}_{}_{}_{}",
        statement.availability.token(),
        statement.window.start,
        statement.window.end,
        Day::codes(&statement.days)
    )
}

fn parse_availability_name(name: &str) -> Option<(String, AvailabilityStatement)> {
    let tokens: Vec<&str> = name.split('_').collect();
    let [room, token, start, end, days] = tokens.as_slice() else {
        return None;
    };
    let availability = match *token {
        "Avail" => Availability::Available,
        "NotAvail" => Availability::Blackout,
        _ => return None,
    };
    let statement = AvailabilityStatement {
        availability,
        days: Day::parse_days(days).ok()?,
        window: TimeRange::new(start.parse().ok()?, end.parse().ok()?).ok()?,
    };
    Some((room.to_string(), statement))
}
