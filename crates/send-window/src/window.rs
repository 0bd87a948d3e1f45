//! Value types for send windows: weekday sets, time-of-day intervals, and
//! concrete `[start, end]` timestamp pairs.
//!
//! Everything here is local wall-clock time. Weekday indices follow the
//! notification domain's convention of Sunday = 0 through Saturday = 6.

use chrono::{Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::WindowError;

/// Domain index of a weekday (Sunday = 0).
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Add a (possibly negative) number of minutes, returning `None` on overflow.
pub(crate) fn add_minutes(at: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(minutes).and_then(|delta| at.checked_add_signed(delta))
}

// ── WeekdaySet ──────────────────────────────────────────────────────────────

/// A set of weekdays, stored as a 7-bit mask indexed Sunday = 0.
///
/// Serialized as an array of indices, e.g. `[1, 2, 3, 4, 5]` for Monday to
/// Friday. An empty set is valid and matches no day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    pub const ALL: WeekdaySet = WeekdaySet(0b0111_1111);

    /// Build a set from domain indices (0-6, Sunday = 0).
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidWeekday`] for any index above 6.
    pub fn from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Result<Self, WindowError> {
        let mut bits = 0u8;
        for index in indices {
            if index > 6 {
                return Err(WindowError::InvalidWeekday(index));
            }
            bits |= 1 << index;
        }
        Ok(Self(bits))
    }

    /// Return a copy of this set with `day` added.
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | 1 << weekday_index(day))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.contains_index(weekday_index(day))
    }

    pub fn contains_index(&self, index: u8) -> bool {
        index <= 6 && self.0 & (1 << index) != 0
    }

    pub fn union(self, other: WeekdaySet) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Domain indices in ascending order (Sunday first).
    pub fn indices(self) -> impl Iterator<Item = u8> {
        (0..7u8).filter(move |index| self.contains_index(*index))
    }

    /// The first day strictly after `day` that is in this set, with how many
    /// days ahead it lies (1-7). Wraps Saturday → Sunday. `None` for an empty set.
    pub fn next_after(&self, day: Weekday) -> Option<(Weekday, i64)> {
        let mut candidate = day;
        for ahead in 1..=7 {
            candidate = candidate.succ();
            if self.contains(candidate) {
                return Some((candidate, ahead));
            }
        }
        None
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = WindowError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(indices)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices().collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        days.into_iter().fold(Self::EMPTY, WeekdaySet::with)
    }
}

// ── TimeWindow ──────────────────────────────────────────────────────────────

/// How a time-of-day interval relates to the calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowShape {
    /// `start < end`, e.g. 08:00-17:00.
    SameDay,
    /// `start == end`: the whole day is allowed.
    AllDay,
    /// `start > end`, wrapping past midnight, e.g. 22:00-06:00.
    Overnight,
}

/// A time-of-day interval. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn shape(&self) -> WindowShape {
        match self.start.cmp(&self.end) {
            std::cmp::Ordering::Less => WindowShape::SameDay,
            std::cmp::Ordering::Equal => WindowShape::AllDay,
            std::cmp::Ordering::Greater => WindowShape::Overnight,
        }
    }

    /// Whether `point` falls inside the interval.
    ///
    /// Overnight intervals match `point >= start || point <= end`; all-day
    /// intervals match everything.
    pub fn contains(&self, point: NaiveTime) -> bool {
        match self.shape() {
            WindowShape::SameDay => self.start <= point && point <= self.end,
            WindowShape::AllDay => true,
            WindowShape::Overnight => point >= self.start || point <= self.end,
        }
    }
}

// ── SendWindow ──────────────────────────────────────────────────────────────

/// A resolved `[start, end]` pair of wall-clock timestamps during which a
/// notification may be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SendWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SendWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Pull the end back to `cutoff` if it lies later. The start is untouched.
    pub fn clamp_end(self, cutoff: NaiveDateTime) -> Self {
        Self {
            start: self.start,
            end: self.end.min(cutoff),
        }
    }
}
