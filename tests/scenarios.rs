//! End-to-end timetabling scenarios.
//!
//! Builds schedulers through the public API, loads fixed timetables from
//! placement records, and checks scoring, the genetic operators, and the
//! generational loop as a whole.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use u_timetable::error::SchedulerError;
use u_timetable::export::{PlacementRecord, ScheduleExport};
use u_timetable::ga::{assess_inconsistencies, crossover, placement_is_legal};
use u_timetable::models::{Constraint, ConstraintKind, Course, Day, Room};
use u_timetable::scheduler::{NoopReporter, RunPhase, ScheduleKpi, Scheduler, SchedulerConfig};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn record(course: &str, room: &str, days: &str, time: &str) -> PlacementRecord {
    PlacementRecord {
        course: course.into(),
        room: room.into(),
        days: Day::parse_days(days).unwrap(),
        time: time.parse().unwrap(),
    }
}

fn rooms() -> Vec<Room> {
    vec![
        Room::new("cheek", "308").with_capacity(30).with_computers(true),
        Room::new("cheek", "101").with_capacity(60),
        Room::new("temple", "200").with_capacity(40),
    ]
}

const MWF: [&str; 6] = [
    "08:00-08:50",
    "09:00-09:50",
    "10:00-10:50",
    "11:00-12:00",
    "11:30-12:30",
    "13:00-13:50",
];
const TR: [&str; 4] = ["08:00-09:15", "09:30-10:45", "11:00-12:15", "13:00-14:15"];

fn scheduler(courses: Vec<Course>) -> Scheduler {
    Scheduler::new(
        courses,
        rooms(),
        &MWF,
        &TR,
        2,
        SchedulerConfig::default().with_seed(42).with_bootstrap_size(40),
    )
    .unwrap()
}

// ======================== Hard rules ========================

#[test]
fn test_room_conflict_invalidates() {
    init_logger();
    let mut s = scheduler(vec![
        Course::new("csc", "130", "001"),
        Course::new("csc", "232", "001"),
    ]);
    s.add_universal_constraints().unwrap();

    let clash = s
        .schedule_from_records(&[
            record("csc 130 001", "cheek308", "mwf", "11:00-12:00"),
            record("csc 232 001", "cheek308", "m", "11:30-12:30"),
            record("csc 232 001", "cheek308", "wf", "08:00-08:50"),
        ])
        .unwrap();
    assert!(clash.complete);
    assert!(!clash.valid);
    assert_eq!(clash.breakdown["no_room_overlap"].score, 0.0);

    let apart = s
        .schedule_from_records(&[
            record("csc 130 001", "cheek308", "mwf", "11:00-12:00"),
            record("csc 232 001", "cheek101", "mwf", "11:30-12:30"),
        ])
        .unwrap();
    assert!(apart.valid);
}

#[test]
fn test_instructor_max_per_day() {
    init_logger();
    let courses = vec![
        Course::new("csc", "130", "001").with_instructor("saquer"),
        Course::new("csc", "232", "001").with_instructor("saquer"),
        Course::new("csc", "333", "001").with_instructor("saquer"),
    ];
    let records = [
        record("csc 130 001", "cheek308", "mwf", "08:00-08:50"),
        record("csc 232 001", "cheek308", "mwf", "09:00-09:50"),
        record("csc 333 001", "cheek308", "mwf", "10:00-10:50"),
    ];

    let mut strict = scheduler(courses.clone());
    let saquer = strict.catalog().instructor_by_name("saquer").unwrap();
    strict
        .add_constraint(Constraint::mandatory(
            "saquer_max_courses_2",
            30,
            ConstraintKind::InstructorMaxPerDay { instructor: saquer, max: 2 },
        ))
        .unwrap();
    let week = strict.schedule_from_records(&records).unwrap();
    assert_eq!(week.fitness, 0.0);
    assert!(!week.valid);

    let mut relaxed = scheduler(courses);
    relaxed
        .add_constraint(Constraint::mandatory(
            "saquer_max_courses_3",
            30,
            ConstraintKind::InstructorMaxPerDay { instructor: saquer, max: 3 },
        ))
        .unwrap();
    let week = relaxed.schedule_from_records(&records).unwrap();
    assert_eq!(week.fitness, 30.0);
    assert!(week.valid);
}

#[test]
fn test_sequential_buildings() {
    init_logger();
    let courses = vec![
        Course::new("csc", "130", "001").with_instructor("shade"),
        Course::new("csc", "232", "001").with_instructor("shade"),
    ];
    let mut s = scheduler(courses);
    s.add_constraint(Constraint::new("sequential_time_different_building", 100, ConstraintKind::SequentialBuildings))
        .unwrap();

    // 09:00-09:50 then 10:00-10:50 is a 10 minute walk between buildings
    let walk = s
        .schedule_from_records(&[
            record("csc 130 001", "cheek308", "mwf", "09:00-09:50"),
            record("csc 232 001", "temple200", "mwf", "10:00-10:50"),
        ])
        .unwrap();
    assert!(walk.valid);
    assert_eq!(walk.fitness, 0.0);

    let same_building = s
        .schedule_from_records(&[
            record("csc 130 001", "cheek308", "mwf", "09:00-09:50"),
            record("csc 232 001", "cheek101", "mwf", "10:00-10:50"),
        ])
        .unwrap();
    assert_eq!(same_building.fitness, 100.0);
}

// ======================== Scoring policy ========================

#[test]
fn test_mandatory_vs_soft() {
    init_logger();
    let courses = vec![
        Course::new("csc", "105", "a").with_credit(1).with_lab(true),
        Course::new("csc", "105", "b").with_credit(1).with_lab(true),
    ];
    let records = [
        record("csc 105 a", "cheek308", "m", "08:00-08:50"),
        record("csc 105 b", "cheek308", "t", "08:00-09:15"),
    ];
    let kind = ConstraintKind::LabOnTr { courses: vec![0, 1] };

    let mut hard = scheduler(courses.clone());
    hard.add_constraint(Constraint::mandatory("labs_tr", 40, kind.clone()))
        .unwrap();
    let week = hard.schedule_from_records(&records).unwrap();
    assert!(!week.valid);
    assert_eq!(week.fitness, 0.0);

    let mut soft = scheduler(courses);
    soft.add_constraint(Constraint::new("labs_tr", 40, kind)).unwrap();
    let week = soft.schedule_from_records(&records).unwrap();
    assert!(week.valid);
    assert_eq!(week.fitness, 20.0);
}

#[test]
fn test_fitness_is_deterministic() {
    init_logger();
    let mut s = scheduler(vec![
        Course::new("csc", "130", "001").with_instructor("shade"),
        Course::new("csc", "232", "001").with_instructor("shade"),
        Course::new("csc", "105", "a").with_instructor("volmar").with_credit(1).with_lab(true),
    ]);
    s.add_universal_constraints().unwrap();
    s.add_constraint(Constraint::new("seq", 50, ConstraintKind::SequentialBuildings))
        .unwrap();
    s.generate_starting_population(5).unwrap();

    let mut week = s.population()[0].clone();
    s.calc_fitness(&mut week);
    let first = (week.valid, week.fitness, week.breakdown.clone());
    for _ in 0..5 {
        s.calc_fitness(&mut week);
        assert_eq!((week.valid, week.fitness, week.breakdown.clone()), first);
    }
}

// ======================== Genetic operators ========================

fn mixed_courses() -> Vec<Course> {
    vec![
        Course::new("csc", "130", "001").with_instructor("shade").with_capacity(25),
        Course::new("csc", "130", "002").with_instructor("shade").with_capacity(25),
        Course::new("csc", "232", "001").with_instructor("volmar").with_credit(4),
        Course::new("csc", "105", "a").with_instructor("volmar").with_credit(1).with_lab(true),
        Course::new("csc", "340", "001").with_instructor("hoover").with_computers(true),
        Course::new("mat", "150", "001").with_instructor("hoover").with_credit(5),
    ]
}

#[test]
fn test_credit_invariant_of_complete_schedules() {
    init_logger();
    let mut s = scheduler(mixed_courses());
    s.generate_starting_population(30).unwrap();

    let complete: Vec<_> = s.population().iter().filter(|w| w.complete).collect();
    assert!(!complete.is_empty());
    for week in complete {
        assert!(placement_is_legal(week, s.catalog()));
        let counts = week.placement_counts(s.catalog().courses().len());
        for (course, count) in s.catalog().courses().iter().zip(counts) {
            assert_eq!(count, usize::from(course.credit));
        }
    }
}

#[test]
fn test_crossover_conservation() {
    init_logger();
    let mut s = scheduler(mixed_courses());
    s.add_universal_constraints().unwrap();
    s.generate_starting_population(60).unwrap();
    s.score_population();

    let parents: Vec<_> = s
        .population()
        .iter()
        .filter(|w| w.valid && w.complete)
        .take(2)
        .cloned()
        .collect();
    assert_eq!(parents.len(), 2);

    let mut rng = SmallRng::seed_from_u64(42);
    for _ in 0..20 {
        let (c1, c2) = crossover(&parents[0], &parents[1], s.catalog(), s.slot_divide(), &mut rng).unwrap();
        for child in [c1, c2] {
            let found = assess_inconsistencies(&child, s.catalog());
            if child.complete && child.valid {
                assert!(found.is_consistent());
                assert!(placement_is_legal(&child, s.catalog()));
            } else {
                assert!(!child.valid);
            }
        }
    }
}

#[test]
fn test_four_credit_fills_separate_grids() {
    init_logger();
    let mut s = Scheduler::new(
        vec![Course::new("csc", "232", "001").with_credit(4)],
        rooms(),
        &["08:00-08:50", "09:00-09:50", "11:00-11:50"],
        &["08:00-09:15", "09:30-10:45", "11:00-12:15"],
        1,
        SchedulerConfig::default().with_seed(42),
    )
    .unwrap();
    s.generate_starting_population(200).unwrap();

    assert_eq!(s.population().len(), 200);
    for week in s.population() {
        assert!(week.complete);
        assert!(placement_is_legal(week, s.catalog()));
        let cells = week.find_course(0);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells.iter().filter(|t| t.day.is_tr()).count(), 1);
    }
}

#[test]
fn test_four_credit_export_reloads() {
    init_logger();
    let mut s = Scheduler::new(
        vec![Course::new("csc", "232", "001").with_credit(4)],
        rooms(),
        &["08:00-08:50", "11:00-11:50"],
        &["08:00-09:15", "11:00-12:15"],
        1,
        SchedulerConfig::default().with_seed(42),
    )
    .unwrap();
    s.add_universal_constraints().unwrap();

    let week = s
        .schedule_from_records(&[
            record("csc 232 001", "temple200", "mwf", "11:00-11:50"),
            record("csc 232 001", "temple200", "r", "11:00-12:15"),
        ])
        .unwrap();
    assert!(week.valid);
    assert!(placement_is_legal(&week, s.catalog()));

    let export = ScheduleExport::from_schedule(&week, s.catalog());
    assert_eq!(export.placements.len(), 2);
    let reloaded = s
        .schedule_from_records(&ScheduleExport::from_json(&export.to_json().unwrap()).unwrap().placements)
        .unwrap();
    assert!(reloaded.valid);
    assert_eq!(reloaded.find_course(0), week.find_course(0));
}

#[test]
fn test_breed_requires_two() {
    let mut s = scheduler(mixed_courses());
    assert!(matches!(s.breed(), Err(SchedulerError::InsufficientPopulation(0))));
}

// ======================== Evolution ========================

#[test]
fn test_evolve_end_to_end() {
    init_logger();
    let mut s = scheduler(mixed_courses());
    s.add_universal_constraints().unwrap();
    s.add_constraint(Constraint::new("labs_tr", 20, ConstraintKind::LabOnTr { courses: vec![3] }))
        .unwrap();

    let outcome = s.evolve(Duration::from_secs(60), &mut NoopReporter, None).unwrap();
    assert_eq!(outcome.phase, RunPhase::Converged);
    assert_eq!(outcome.best_fitness, Some(20.0));

    let best = s.best_schedule().unwrap();
    assert!(best.valid);
    let kpi = ScheduleKpi::calculate(best, s.catalog(), s.max_fitness());
    assert_eq!(kpi.placed_courses, 6);
    assert_eq!(kpi.placement_rate, 1.0);
    assert_eq!(kpi.fitness_ratio, 1.0);
    assert!(kpi.meets_thresholds(1.0, 1.0));

    // Export and reload reproduces the same timetable
    let export = ScheduleExport::from_schedule(best, s.catalog());
    let json = export.to_json().unwrap();
    let reloaded = s
        .schedule_from_records(&ScheduleExport::from_json(&json).unwrap().placements)
        .unwrap();
    assert!(reloaded.valid);
    assert_eq!(reloaded.fitness, best.fitness);
    assert_eq!(reloaded.occupied_count(), best.occupied_count());
}
