//! Domain types: skills, employees, tasks, slots, assignments, and the
//! planning period.
//!
//! All of these are loaded once per run by the caller and treated as
//! read-only by the engine.

use super::rules::{AvailabilityRules, PreferenceRules};
use crate::error::{RosterError, RosterResult};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Employee identifier.
pub type EmployeeId = u64;

/// An opaque named capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill(String);

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Skill {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of skills. Ordered so that logs and comparisons are stable.
pub type SkillSet = BTreeSet<Skill>;

fn skill_set<S: Into<Skill>>(skills: impl IntoIterator<Item = S>) -> SkillSet {
    skills.into_iter().map(Into::into).collect()
}

// ============================================================================
// Employee
// ============================================================================

/// A person who can be assigned to slots.
///
/// The constraint fields mirror the per-employee soft limits; each group has
/// its own penalty weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub skills: SkillSet,
    pub availability: AvailabilityRules,
    pub preferences: PreferenceRules,

    /// Longest allowed run of consecutive working days (`None` = unlimited).
    pub max_consecutive_days: Option<u32>,
    /// Shortest desired run of consecutive working days (0 = no minimum).
    pub min_consecutive_days: u32,
    /// Weight for both consecutive-day limits.
    pub consecutive_day_weight: f64,

    /// Most weekends the employee should work in the period (`None` = unlimited).
    pub max_weekends: Option<u32>,
    /// Weight per excess weekend.
    pub weekend_weight: f64,

    /// Minimum total worked minutes in the period.
    pub min_total_minutes: u32,
    /// Maximum total worked minutes in the period (`None` = unlimited).
    pub max_total_minutes: Option<u32>,
    /// Weight for total-hours bounds and unpreferred shifts.
    pub total_hours_weight: f64,
}

impl Employee {
    /// Creates an employee with no skills, no availability, and the default
    /// limits (max 5 consecutive days, min 1, max 2 weekends, weights 5/10/2).
    pub fn new(id: EmployeeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            skills: SkillSet::new(),
            availability: AvailabilityRules::default(),
            preferences: PreferenceRules::default(),
            max_consecutive_days: Some(5),
            min_consecutive_days: 1,
            consecutive_day_weight: 5.0,
            max_weekends: Some(2),
            weekend_weight: 10.0,
            min_total_minutes: 0,
            max_total_minutes: None,
            total_hours_weight: 2.0,
        }
    }

    pub fn with_skills<S: Into<Skill>>(mut self, skills: impl IntoIterator<Item = S>) -> Self {
        self.skills.extend(skill_set(skills));
        self
    }

    /// Parses and sets the availability rule string.
    pub fn with_availability(mut self, rules: &str) -> Self {
        self.availability = AvailabilityRules::parse(rules);
        self
    }

    /// Parses and sets the preference rule string.
    pub fn with_preferences(mut self, rules: &str) -> Self {
        self.preferences = PreferenceRules::parse(rules);
        self
    }

    pub fn with_consecutive_days(mut self, min: u32, max: Option<u32>) -> Self {
        self.min_consecutive_days = min;
        self.max_consecutive_days = max;
        self
    }

    pub fn with_max_weekends(mut self, max: Option<u32>) -> Self {
        self.max_weekends = max;
        self
    }

    pub fn with_total_minutes(mut self, min: u32, max: Option<u32>) -> Self {
        self.min_total_minutes = min;
        self.max_total_minutes = max;
        self
    }

    /// Convenience for [`with_total_minutes`](Self::with_total_minutes) in hours.
    pub fn with_total_hours(self, min: u32, max: Option<u32>) -> Self {
        self.with_total_minutes(min.saturating_mul(60), max.map(|h| h.saturating_mul(60)))
    }

    pub fn with_weights(mut self, consecutive_day: f64, weekend: f64, total_hours: f64) -> Self {
        self.consecutive_day_weight = consecutive_day;
        self.weekend_weight = weekend;
        self.total_hours_weight = total_hours;
        self
    }

    /// Whether this employee holds every skill in `required`.
    pub fn has_skills(&self, required: &SkillSet) -> bool {
        self.skills.is_superset(required)
    }

    /// Checks that every penalty weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("consecutive_day_weight", self.consecutive_day_weight),
            ("weekend_weight", self.weekend_weight),
            ("total_hours_weight", self.total_hours_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("employee {}: {name} must be finite and non-negative", self.id));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Task
// ============================================================================

/// A kind of work with coverage requirements. Identified by name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub name: String,
    /// Employees needed at minimum per slot.
    pub minimum_coverage: u32,
    /// Employees needed ideally per slot (never below `minimum_coverage`).
    pub optimal_coverage: u32,
    /// Scales under/over-staffing penalties for this task.
    pub penalty_weight: f64,
    pub required_skills: SkillSet,
}

impl Task {
    /// Creates a task needing one employee, with penalty weight 10.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            minimum_coverage: 1,
            optimal_coverage: 1,
            penalty_weight: 10.0,
            required_skills: SkillSet::new(),
        }
    }

    /// Sets coverage; `optimal` is raised to `minimum` when lower.
    pub fn with_coverage(mut self, minimum: u32, optimal: u32) -> Self {
        self.minimum_coverage = minimum;
        self.optimal_coverage = optimal.max(minimum);
        self
    }

    pub fn with_penalty_weight(mut self, weight: f64) -> Self {
        self.penalty_weight = weight;
        self
    }

    /// Checks that the penalty weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if !self.penalty_weight.is_finite() || self.penalty_weight < 0.0 {
            return Err(format!(
                "task '{}': penalty_weight must be finite and non-negative",
                self.name
            ));
        }
        Ok(())
    }

    pub fn with_required_skills<S: Into<Skill>>(mut self, skills: impl IntoIterator<Item = S>) -> Self {
        self.required_skills.extend(skill_set(skills));
        self
    }
}

// ============================================================================
// Slots and assignments
// ============================================================================

/// One unit of staffing demand: a date/time window bound to a task by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequiredSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub task: String,
}

impl RequiredSlot {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime, task: impl Into<String>) -> Self {
        Self {
            date,
            start,
            end,
            task: task.into(),
        }
    }

    /// Worked minutes. A slot ending before its start runs past midnight;
    /// equal times are zero-length.
    pub fn duration_minutes(&self) -> i64 {
        let minutes = (self.end - self.start).num_minutes();
        if minutes < 0 {
            minutes + 24 * 60
        } else {
            minutes
        }
    }
}

impl fmt::Display for RequiredSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} [{}]",
            self.date,
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.task
        )
    }
}

/// Pairing of one slot with an employee, or with nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftAssignment {
    pub slot: Arc<RequiredSlot>,
    pub employee: Option<EmployeeId>,
}

impl ShiftAssignment {
    pub fn new(slot: Arc<RequiredSlot>, employee: Option<EmployeeId>) -> Self {
        Self { slot, employee }
    }

    pub fn unassigned(slot: Arc<RequiredSlot>) -> Self {
        Self::new(slot, None)
    }
}

/// A filled slot ready for the caller to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedShift {
    pub employee_id: EmployeeId,
    pub task: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

// ============================================================================
// Planning period
// ============================================================================

/// Inclusive date range of a planning run.
///
/// Deserialization goes through [`PlanningPeriod::new`], so a reversed range
/// is rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PeriodBounds"))]
pub struct PlanningPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked wire form of [`PlanningPeriod`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PeriodBounds {
    start: NaiveDate,
    end: NaiveDate,
}

#[cfg(feature = "serde")]
impl TryFrom<PeriodBounds> for PlanningPeriod {
    type Error = RosterError;

    fn try_from(bounds: PeriodBounds) -> RosterResult<Self> {
        Self::new(bounds.start, bounds.end)
    }
}

impl PlanningPeriod {
    /// Fails with [`RosterError::InvalidPeriod`] when `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> RosterResult<Self> {
        if end < start {
            return Err(RosterError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// The smallest period covering every slot date, or `None` for no slots.
    pub fn spanning<'a>(slots: impl IntoIterator<Item = &'a RequiredSlot>) -> Option<Self> {
        let mut dates = slots.into_iter().map(|s| s.date);
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date of the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Saturdays and Sundays within the period.
    pub fn weekend_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days().filter(|d| is_weekend(*d))
    }
}

/// Whether `date` falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
