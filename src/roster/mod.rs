//! Employee shift rostering on top of the [`crate::ga`] framework.
//!
//! # Flow
//!
//! 1. Build [`RequiredSlot`]s, by hand or with [`build_required_slots`].
//! 2. Hand employees, tasks, slots, and [`RosterParams`] to
//!    [`RosterEngine::new`].
//! 3. [`RosterEngine::run`] returns a [`RosterOutcome`] holding the best
//!    [`ScheduleChromosome`], its penalty, and per-generation statistics.
//!
//! # Submodules
//!
//! - [`rules`]: availability and preference rule grammar

mod catalog;
mod chromosome;
mod engine;
mod fitness;
mod models;
mod params;
mod problem;
pub mod rules;

pub use catalog::{build_required_slots, default_daily_definitions, ShiftDefinition};
pub use chromosome::ScheduleChromosome;
pub use engine::{RosterEngine, RosterOutcome};
pub use fitness::{FitnessCalculator, PenaltyBreakdown};
pub use models::{
    is_weekend, Employee, EmployeeId, PlannedShift, PlanningPeriod, RequiredSlot, ShiftAssignment,
    Skill, SkillSet, Task,
};
pub use params::{PenaltyWeights, RosterParams};
pub use problem::RosterProblem;
pub use rules::{AvailabilityRules, PreferenceRules, PreferenceScore};
