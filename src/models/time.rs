//! Week days and clock times.
//!
//! The timetable covers a five-day teaching week. Days are grouped into
//! two patterns that share time grids: M/W/F and T/R.
//!
//! # Time Model
//! Clock times are minutes after midnight on a 24-hour clock. Ranges are
//! half-open in spirit but compared with the inclusive rules of each
//! constraint (see `scoring`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchedulerError;

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    /// Monday (`m`).
    M,
    /// Tuesday (`t`).
    T,
    /// Wednesday (`w`).
    W,
    /// Thursday (`r`).
    R,
    /// Friday (`f`).
    F,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; 5] = [Day::M, Day::T, Day::W, Day::R, Day::F];

    /// Days of the M/W/F pattern.
    pub const MWF: [Day; 3] = [Day::M, Day::W, Day::F];

    /// Days of the T/R pattern.
    pub const TR: [Day; 2] = [Day::T, Day::R];

    /// Single-letter lowercase code.
    pub fn code(self) -> char {
        match self {
            Day::M => 'm',
            Day::T => 't',
            Day::W => 'w',
            Day::R => 'r',
            Day::F => 'f',
        }
    }

    /// Parses a single-letter code (case-insensitive).
    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'm' => Some(Day::M),
            't' => Some(Day::T),
            'w' => Some(Day::W),
            'r' => Some(Day::R),
            'f' => Some(Day::F),
            _ => None,
        }
    }

    /// Whether the day belongs to the T/R pattern.
    #[inline]
    pub fn is_tr(self) -> bool {
        matches!(self, Day::T | Day::R)
    }

    /// Parses a day string such as `"mwf"` or `"TR"`.
    ///
    /// Duplicates are dropped and the result is in week order.
    pub fn parse_days(s: &str) -> Result<Vec<Day>, SchedulerError> {
        let mut days = Vec::with_capacity(s.len());
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let day = Day::from_code(c)
                .ok_or_else(|| SchedulerError::MalformedTime(format!("unknown day code '{c}'")))?;
            if !days.contains(&day) {
                days.push(day);
            }
        }
        days.sort();
        Ok(days)
    }

    /// Renders days back to their compact code string.
    pub fn codes(days: &[Day]) -> String {
        days.iter().map(|d| d.code()).collect()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A time of day in minutes after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a clock time from hours and minutes.
    ///
    /// Returns `None` outside `00:00..=24:00`.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute > 0) {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    /// Creates a clock time from minutes after midnight.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= 24 * 60).then_some(Self(minutes))
    }

    /// Minutes after midnight.
    #[inline]
    pub fn minutes(self) -> i32 {
        i32::from(self.0)
    }

    /// Hour component.
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component.
    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for ClockTime {
    type Err = SchedulerError;

    /// Parses `HH:MM` (24-hour clock).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SchedulerError::MalformedTime(format!("expected HH:MM, got '{s}'"));
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        let hour: u16 = h.parse().map_err(|_| malformed())?;
        let minute: u16 = m.parse().map_err(|_| malformed())?;
        ClockTime::new(hour, minute).ok_or_else(malformed)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A clock interval `[start, end]` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the interval.
    pub start: ClockTime,
    /// End of the interval.
    pub end: ClockTime,
}

impl TimeRange {
    /// Creates a range; `start` must precede `end`.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, SchedulerError> {
        if start >= end {
            return Err(SchedulerError::MalformedTime(format!(
                "range start {start} is not before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i32 {
        self.end.minutes() - self.start.minutes()
    }

    /// Whether two ranges overlap.
    ///
    /// Ranges that merely touch do not overlap; ranges with the same start
    /// always do.
    pub fn overlaps(&self, other: &Self) -> bool {
        let (first, second) = if self.start < other.start {
            (self, other)
        } else {
            (other, self)
        };
        second.start < first.end || first.start == second.start
    }

    /// Whether `other` lies entirely inside this range (bounds inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether this range sits entirely outside `window` (touching allowed).
    pub fn avoids(&self, window: &Self) -> bool {
        self.end <= window.start || self.start >= window.end
    }

    /// Whether two ranges are back-to-back within `threshold` minutes.
    ///
    /// Compares the later start against the earlier end, so overlapping
    /// ranges are always sequential.
    pub fn is_sequential(&self, other: &Self, threshold: i32) -> bool {
        let later_start = self.start.max(other.start).minutes();
        let earlier_end = self.end.min(other.end).minutes();
        later_start - earlier_end <= threshold
    }
}

impl FromStr for TimeRange {
    type Err = SchedulerError;

    /// Parses `HH:MM-HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            SchedulerError::MalformedTime(format!("expected HH:MM-HH:MM, got '{s}'"))
        })?;
        TimeRange::new(start.parse()?, end.parse()?)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> TimeRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_day_codes() {
        assert_eq!(Day::parse_days("fwm").unwrap(), vec![Day::M, Day::W, Day::F]);
        assert_eq!(Day::parse_days("TR").unwrap(), vec![Day::T, Day::R]);
        assert_eq!(Day::codes(&Day::ALL), "mtwrf");
        assert!(Day::parse_days("mx").is_err());
        assert!(Day::R.is_tr());
        assert!(!Day::F.is_tr());
    }

    #[test]
    fn test_clock_parse() {
        let t: ClockTime = "09:05".parse().unwrap();
        assert_eq!(t.minutes(), 545);
        assert_eq!(t.to_string(), "09:05");
        assert!("9".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("25:00".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_range_parse() {
        let r = range("11:00-12:15");
        assert_eq!(r.duration_minutes(), 75);
        assert_eq!(r.to_string(), "11:00-12:15");
        assert!("12:00-11:00".parse::<TimeRange>().is_err());
        assert!("12:00".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_overlap() {
        assert!(range("11:00-12:00").overlaps(&range("11:30-12:30")));
        assert!(range("11:30-12:30").overlaps(&range("11:00-12:00")));
        assert!(!range("11:00-12:00").overlaps(&range("12:00-13:00")));
        assert!(range("11:00-11:50").overlaps(&range("11:00-12:15")));
    }

    #[test]
    fn test_sequential() {
        let a = range("09:00-09:50");
        assert!(a.is_sequential(&range("10:00-10:50"), 15));
        assert!(!a.is_sequential(&range("10:30-11:20"), 15));
        assert!(a.is_sequential(&range("10:30-11:20"), 40));
        assert!(a.is_sequential(&range("09:30-10:20"), 15));
    }

    #[test]
    fn test_contains_and_avoids() {
        let window = range("08:00-12:00");
        assert!(window.contains(&range("08:00-09:00")));
        assert!(!window.contains(&range("11:30-12:30")));
        let lunch = range("12:00-13:00");
        assert!(range("11:00-12:00").avoids(&lunch));
        assert!(!range("12:30-13:30").avoids(&lunch));
    }
}
