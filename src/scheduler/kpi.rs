//! Timetable quality metrics (KPIs).
//!
//! Computes summary indicators from a scored schedule and its catalog.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placement rate | Placed courses / all courses |
//! | Room utilization | Occupied cells / cells of the room |
//! | Fitness ratio | Fitness / maximum attainable fitness |
//! | Constraints met | Breakdown entries at full weight |
//!
//! # Reference
//! McCollum et al. (2010), "Setting the research agenda in automated
//! timetabling: the second international timetabling competition"

use std::collections::HashMap;

use crate::models::{Catalog, Schedule};

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Courses on at least one cell.
    pub placed_courses: usize,
    /// Courses in the catalog.
    pub total_courses: usize,
    /// Fraction of courses placed (0.0..1.0).
    pub placement_rate: f64,
    /// Average room utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-room utilization, keyed by room full name.
    pub utilization_by_room: HashMap<String, f64>,
    /// Fitness over maximum fitness (1.0 when nothing is weighted).
    pub fitness_ratio: f64,
    /// Breakdown entries that reached full weight.
    pub constraints_met: usize,
    /// Breakdown entries recorded by the last fitness pass.
    pub constraints_scored: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a scored schedule.
    ///
    /// # Arguments
    /// * `schedule` - Schedule after a fitness pass.
    /// * `catalog` - Its course and room tables.
    /// * `max_fitness` - Sum of constraint weights.
    pub fn calculate(schedule: &Schedule, catalog: &Catalog, max_fitness: f64) -> Self {
        let counts = schedule.placement_counts(catalog.courses().len());
        let placed_courses = counts.iter().filter(|&&n| n > 0).count();
        let total_courses = catalog.courses().len();

        let mut cells = vec![0usize; catalog.rooms().len()];
        let mut used = vec![0usize; catalog.rooms().len()];
        for slot in schedule.list_time_slots() {
            cells[slot.room] += 1;
            if !slot.is_open() {
                used[slot.room] += 1;
            }
        }
        let utilization_by_room: HashMap<String, f64> = catalog
            .rooms()
            .iter()
            .enumerate()
            .map(|(id, room)| {
                let rate = if cells[id] == 0 {
                    0.0
                } else {
                    used[id] as f64 / cells[id] as f64
                };
                (room.full_name(), rate)
            })
            .collect();
        let avg_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        let placement_rate = if total_courses == 0 {
            1.0
        } else {
            placed_courses as f64 / total_courses as f64
        };

        let fitness_ratio = if max_fitness == 0.0 {
            1.0
        } else {
            schedule.fitness / max_fitness
        };

        Self {
            placed_courses,
            total_courses,
            placement_rate,
            avg_utilization,
            utilization_by_room,
            fitness_ratio,
            constraints_met: schedule.breakdown.values().filter(|s| s.is_full()).count(),
            constraints_scored: schedule.breakdown.len(),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_placement_rate: f64, min_fitness_ratio: f64) -> bool {
        self.placement_rate >= min_placement_rate && self.fitness_ratio >= min_fitness_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstraintScore, Course, Day, Room};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Course::new("csc", "130", "001"), Course::new("csc", "232", "001")],
            vec![Room::new("cheek", "308"), Room::new("temple", "101")],
            vec!["09:00-09:50".parse().unwrap()],
            vec!["09:30-10:45".parse().unwrap()],
        )
    }

    #[test]
    fn test_kpi_basic() {
        let cat = catalog();
        let mut s = Schedule::new(cat.grid().clone());
        for day in Day::MWF {
            let id = s.grid().locate(day, 0, "09:00".parse().unwrap()).unwrap();
            s.set_course(id, Some(0));
        }
        s.fitness = 15.0;
        s.breakdown.insert("a".into(), ConstraintScore { score: 10.0, weight: 10 });
        s.breakdown.insert("b".into(), ConstraintScore { score: 5.0, weight: 10 });

        let kpi = ScheduleKpi::calculate(&s, &cat, 20.0);
        assert_eq!(kpi.placed_courses, 1);
        assert_eq!(kpi.total_courses, 2);
        assert!((kpi.placement_rate - 0.5).abs() < 1e-9);
        assert!((kpi.utilization_by_room["cheek308"] - 0.6).abs() < 1e-9);
        assert_eq!(kpi.utilization_by_room["temple101"], 0.0);
        assert!((kpi.avg_utilization - 0.3).abs() < 1e-9);
        assert!((kpi.fitness_ratio - 0.75).abs() < 1e-9);
        assert_eq!(kpi.constraints_met, 1);
        assert_eq!(kpi.constraints_scored, 2);
    }

    #[test]
    fn test_kpi_thresholds() {
        let cat = catalog();
        let s = Schedule::new(cat.grid().clone());
        let kpi = ScheduleKpi::calculate(&s, &cat, 0.0);
        assert_eq!(kpi.fitness_ratio, 1.0);
        assert!(kpi.meets_thresholds(0.0, 1.0));
        assert!(!kpi.meets_thresholds(0.5, 0.0));
    }
}
