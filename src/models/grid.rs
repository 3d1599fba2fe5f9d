//! Bookable time-slot grid.
//!
//! The grid is a flat arena of every room × day × time cell of the week.
//! It is built once per scheduler and shared (read-only) by every
//! candidate schedule; schedules only store which course sits in which
//! cell.
//!
//! # Layout
//! M/W/F cells use the M/W/F time ranges, T/R cells the T/R ranges.
//! A *row* is the set of cells sharing one room and one start time across
//! days, so a 50-minute M/W/F cell and a 75-minute T/R cell starting at the
//! same time belong to the same row. Whole-week placement feasibility is
//! decided per row. Start times are unique within each time list, which
//! makes `(day, room, start)` a cell identity.

use std::collections::HashMap;

use super::{ClockTime, Day, RoomId, TimeRange};

/// Index of a cell in the grid arena.
pub type SlotId = usize;

/// Identity of one bookable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotSpec {
    /// Arena index.
    pub id: SlotId,
    /// Teaching day.
    pub day: Day,
    /// Room index in the catalog.
    pub room: RoomId,
    /// Meeting time.
    pub time: TimeRange,
}

impl SlotSpec {
    /// Whether the cell belongs to the T/R pattern.
    #[inline]
    pub fn is_tr(&self) -> bool {
        self.day.is_tr()
    }
}

/// Arena of all cells plus row and lookup indices.
#[derive(Debug, Clone, Default)]
pub struct SlotGrid {
    slots: Vec<SlotSpec>,
    row_of: Vec<usize>,
    rows: Vec<Vec<SlotId>>,
    index: HashMap<(Day, RoomId, ClockTime), SlotId>,
}

impl SlotGrid {
    /// Builds the grid for `room_count` rooms.
    pub fn build(room_count: usize, mwf: &[TimeRange], tr: &[TimeRange]) -> Self {
        let mut slots = Vec::new();
        let mut index = HashMap::new();
        let mut row_keys: HashMap<(RoomId, ClockTime), usize> = HashMap::new();
        let mut rows: Vec<Vec<SlotId>> = Vec::new();
        let mut row_of = Vec::new();

        for day in Day::ALL {
            let ranges = if day.is_tr() { tr } else { mwf };
            for room in 0..room_count {
                for &time in ranges {
                    let id = slots.len();
                    slots.push(SlotSpec { id, day, room, time });
                    index.insert((day, room, time.start), id);

                    let row = *row_keys.entry((room, time.start)).or_insert_with(|| {
                        rows.push(Vec::new());
                        rows.len() - 1
                    });
                    rows[row].push(id);
                    row_of.push(row);
                }
            }
        }

        Self {
            slots,
            row_of,
            rows,
            index,
        }
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Cell identity by id.
    #[inline]
    pub fn get(&self, id: SlotId) -> &SlotSpec {
        &self.slots[id]
    }

    /// All cells in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotSpec> {
        self.slots.iter()
    }

    /// Cells sharing room and start time with `id`, in day order.
    pub fn row(&self, id: SlotId) -> &[SlotId] {
        &self.rows[self.row_of[id]]
    }

    /// Finds the cell for a day, room, and start time.
    pub fn locate(&self, day: Day, room: RoomId, start: ClockTime) -> Option<SlotId> {
        self.index.get(&(day, room, start)).copied()
    }

    /// All cells (any room, any day) starting at one of `starts`.
    pub fn with_starts(&self, starts: &[ClockTime]) -> Vec<SlotId> {
        self.slots
            .iter()
            .filter(|s| starts.contains(&s.time.start))
            .map(|s| s.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(list: &[&str]) -> Vec<TimeRange> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_grid_size() {
        let mwf = ranges(&["08:00-08:50", "09:00-09:50"]);
        let tr = ranges(&["08:00-09:15"]);
        let grid = SlotGrid::build(2, &mwf, &tr);
        // 3 MWF days * 2 rooms * 2 ranges + 2 TR days * 2 rooms * 1 range
        assert_eq!(grid.len(), 16);
        assert!(grid.iter().filter(|s| s.is_tr()).count() == 4);
    }

    #[test]
    fn test_rows_group_days() {
        let mwf = ranges(&["09:00-09:50"]);
        let tr = ranges(&["09:00-09:50", "10:00-11:15"]);
        let grid = SlotGrid::build(1, &mwf, &tr);

        let monday = grid.locate(Day::M, 0, "09:00".parse().unwrap()).unwrap();
        let row: Vec<Day> = grid.row(monday).iter().map(|&id| grid.get(id).day).collect();
        assert_eq!(row, Day::ALL.to_vec());

        let tuesday_late = grid.locate(Day::T, 0, "10:00".parse().unwrap()).unwrap();
        assert_eq!(grid.row(tuesday_late).len(), 2);
    }

    #[test]
    fn test_rows_join_ranges_by_start() {
        let mwf = ranges(&["08:00-08:50", "11:00-11:50"]);
        let tr = ranges(&["08:00-09:15", "11:00-12:15"]);
        let grid = SlotGrid::build(2, &mwf, &tr);

        let monday = grid.locate(Day::M, 1, "11:00".parse().unwrap()).unwrap();
        let row = grid.row(monday);
        assert_eq!(row.len(), 5);
        assert!(row.iter().all(|&id| grid.get(id).room == 1));

        let thursday = grid.locate(Day::R, 1, "11:00".parse().unwrap()).unwrap();
        assert_eq!(grid.get(thursday).time.to_string(), "11:00-12:15");
        assert!(row.contains(&thursday));
        assert_eq!(grid.row(thursday), row);
    }

    #[test]
    fn test_with_starts() {
        let mwf = ranges(&["08:00-08:50", "09:00-09:50"]);
        let tr = ranges(&["08:00-09:15"]);
        let grid = SlotGrid::build(3, &mwf, &tr);
        let cut = grid.with_starts(&["09:00".parse().unwrap()]);
        assert_eq!(cut.len(), 9);
        assert!(cut.iter().all(|&id| !grid.get(id).is_tr()));

        // a start shared by both patterns takes the whole row
        let cut = grid.with_starts(&["08:00".parse().unwrap()]);
        assert_eq!(cut.len(), 15);
    }
}
