//! Room model.
//!
//! Rooms are the bookable places of the timetable. Every room exists on
//! every teaching day; the grid crosses rooms with days and time ranges.

use serde::{Deserialize, Serialize};

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Building name, e.g. `cheek`.
    pub building: String,
    /// Room number within the building, e.g. `308`.
    pub number: String,
    /// Seats available.
    pub capacity: u32,
    /// Whether the room is computer-equipped.
    pub has_computers: bool,
}

impl Room {
    /// Creates a room with no seats and no computers.
    ///
    /// Identity strings are lowercased.
    pub fn new(building: &str, number: &str) -> Self {
        Self {
            building: building.to_lowercase(),
            number: number.to_lowercase(),
            capacity: 0,
            has_computers: false,
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Marks the room as computer-equipped.
    pub fn with_computers(mut self, has_computers: bool) -> Self {
        self.has_computers = has_computers;
        self
    }

    /// Building and number joined without spaces, e.g. `cheek308`.
    ///
    /// This is the key used by room-availability statements.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.building, self.number).replace(' ', "")
    }

    /// Whether a course of the given size and computer need fits here.
    #[inline]
    pub fn can_host(&self, capacity: u32, needs_computers: bool) -> bool {
        self.capacity >= capacity && (!needs_computers || self.has_computers)
    }
}
