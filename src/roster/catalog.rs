//! Slot catalog: expands recurring shift definitions over a planning period.

use super::models::{PlanningPeriod, RequiredSlot, Task};
use chrono::NaiveTime;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A shift repeated on every day of the period.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftDefinition {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Name of the task the shift staffs.
    pub task: String,
}

impl ShiftDefinition {
    pub fn new(start: NaiveTime, end: NaiveTime, task: impl Into<String>) -> Self {
        Self {
            start,
            end,
            task: task.into(),
        }
    }
}

/// The stock day: morning, afternoon, and evening shifts of four hours.
pub fn default_daily_definitions() -> Vec<ShiftDefinition> {
    [
        (9, 13, "Morning Task"),
        (13, 17, "Afternoon Task"),
        (17, 21, "Evening Task"),
    ]
    .into_iter()
    .filter_map(|(start, end, task)| {
        Some(ShiftDefinition::new(
            NaiveTime::from_hms_opt(start, 0, 0)?,
            NaiveTime::from_hms_opt(end, 0, 0)?,
            task,
        ))
    })
    .collect()
}

/// Builds the required slots for every day of `period`.
///
/// Each definition contributes `max(optimal, minimum, 1)` identical slots per
/// day, one per person the task wants. Definitions naming an unknown task
/// are skipped with a warning. Output is ordered by day, then definition.
pub fn build_required_slots(
    period: &PlanningPeriod,
    definitions: &[ShiftDefinition],
    tasks: &HashMap<String, Task>,
) -> Vec<RequiredSlot> {
    let usable: Vec<(&ShiftDefinition, u32)> = definitions
        .iter()
        .filter_map(|def| match tasks.get(&def.task) {
            Some(task) => {
                let copies = task.optimal_coverage.max(task.minimum_coverage).max(1);
                Some((def, copies))
            }
            None => {
                warn!(task = %def.task, "shift definition names an unknown task; skipping");
                None
            }
        })
        .collect();

    let mut slots = Vec::new();
    for date in period.days() {
        for (def, copies) in &usable {
            for _ in 0..*copies {
                slots.push(RequiredSlot::new(date, def.start, def.end, def.task.clone()));
            }
        }
    }

    debug!(
        start = %period.start(),
        end = %period.end(),
        definitions = usable.len(),
        slots = slots.len(),
        "slot catalog built"
    );
    slots
}
