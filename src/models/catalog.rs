//! Static course, room and instructor tables.
//!
//! The catalog is the read-only context every schedule of one scheduler
//! refers to. Schedules store ids; the catalog resolves them.

use std::collections::HashMap;
use std::sync::Arc;

use super::{ClockTime, Course, Instructor, Room, SlotGrid, TimeRange};

/// Index of a course in the catalog.
pub type CourseId = usize;
/// Index of a room in the catalog.
pub type RoomId = usize;
/// Index of an instructor in the catalog.
pub type InstructorId = usize;

/// Courses, rooms, instructors and the shared slot grid.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    rooms: Vec<Room>,
    instructors: Vec<Instructor>,
    course_instructor: Vec<Option<InstructorId>>,
    room_names: HashMap<String, RoomId>,
    mwf_times: Vec<TimeRange>,
    tr_times: Vec<TimeRange>,
    grid: Arc<SlotGrid>,
}

impl Catalog {
    /// Builds the catalog and its grid.
    ///
    /// Instructors are derived from distinct course instructor names, in
    /// order of first appearance. Inputs are expected to be validated.
    pub fn new(
        courses: Vec<Course>,
        rooms: Vec<Room>,
        mwf_times: Vec<TimeRange>,
        tr_times: Vec<TimeRange>,
    ) -> Self {
        let mut instructors: Vec<Instructor> = Vec::new();
        let mut by_name: HashMap<String, InstructorId> = HashMap::new();
        let mut course_instructor = Vec::with_capacity(courses.len());

        for (course_id, course) in courses.iter().enumerate() {
            if course.instructor.is_empty() {
                course_instructor.push(None);
                continue;
            }
            let id = *by_name.entry(course.instructor.clone()).or_insert_with(|| {
                instructors.push(Instructor::new(course.instructor.clone()));
                instructors.len() - 1
            });
            instructors[id].courses.push(course_id);
            course_instructor.push(Some(id));
        }

        let room_names = rooms
            .iter()
            .enumerate()
            .map(|(id, r)| (r.full_name(), id))
            .collect();
        let grid = Arc::new(SlotGrid::build(rooms.len(), &mwf_times, &tr_times));

        Self {
            courses,
            rooms,
            instructors,
            course_instructor,
            room_names,
            mwf_times,
            tr_times,
            grid,
        }
    }

    /// All courses, indexed by `CourseId`.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All rooms, indexed by `RoomId`.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All instructors, indexed by `InstructorId`.
    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    /// Course by id.
    #[inline]
    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id]
    }

    /// Room by id.
    #[inline]
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id]
    }

    /// Instructor by id.
    #[inline]
    pub fn instructor(&self, id: InstructorId) -> &Instructor {
        &self.instructors[id]
    }

    /// Mutable instructor by id (for preference updates).
    pub fn instructor_mut(&mut self, id: InstructorId) -> &mut Instructor {
        &mut self.instructors[id]
    }

    /// Instructor teaching a course, if any.
    #[inline]
    pub fn instructor_of(&self, course: CourseId) -> Option<InstructorId> {
        self.course_instructor[course]
    }

    /// Looks up a room by full name (building + number, no spaces).
    pub fn room_by_name(&self, full_name: &str) -> Option<RoomId> {
        self.room_names.get(full_name).copied()
    }

    /// Looks up an instructor by name.
    pub fn instructor_by_name(&self, name: &str) -> Option<InstructorId> {
        self.instructors.iter().position(|i| i.name == name)
    }

    /// Looks up a course by its `subject code section` label.
    pub fn course_by_label(&self, label: &str) -> Option<CourseId> {
        let label = label.to_lowercase();
        self.courses.iter().position(|c| c.label() == label)
    }

    /// M/W/F time ranges.
    pub fn mwf_times(&self) -> &[TimeRange] {
        &self.mwf_times
    }

    /// T/R time ranges.
    pub fn tr_times(&self) -> &[TimeRange] {
        &self.tr_times
    }

    /// Distinct start times of both patterns, earliest first. Each one
    /// starts a row.
    pub fn start_times(&self) -> Vec<ClockTime> {
        let mut starts: Vec<ClockTime> = self
            .mwf_times
            .iter()
            .chain(&self.tr_times)
            .map(|t| t.start)
            .collect();
        starts.sort();
        starts.dedup();
        starts
    }

    /// The shared slot grid.
    pub fn grid(&self) -> &Arc<SlotGrid> {
        &self.grid
    }
}
