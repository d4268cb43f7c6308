//! Candidate schedule representation.

use super::models::{EmployeeId, RequiredSlot, ShiftAssignment};
use crate::ga::Individual;
use std::fmt;

/// One candidate roster: exactly one assignment per required slot.
///
/// Position `i` refers to the same [`RequiredSlot`] in every chromosome of a
/// run, which is what makes crossover meaningful. The chromosome owns its
/// assignment vector; slots are shared read-only through `Arc`.
///
/// `Clone` keeps the cached fitness (the runner relies on this for elites and
/// untouched offspring). [`copy`](Self::copy) is the explicit "fresh
/// candidate" copy and clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleChromosome {
    assignments: Vec<ShiftAssignment>,
    fitness: Option<f64>,
}

impl ScheduleChromosome {
    /// Takes ownership of `assignments`; the chromosome starts unevaluated.
    pub fn new(assignments: Vec<ShiftAssignment>) -> Self {
        Self {
            assignments,
            fitness: None,
        }
    }

    /// Builds a chromosome from a borrowed slice, copying every assignment.
    pub fn from_slice(assignments: &[ShiftAssignment]) -> Self {
        Self::new(assignments.to_vec())
    }

    pub fn assignments(&self) -> &[ShiftAssignment] {
        &self.assignments
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShiftAssignment> {
        self.assignments.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ShiftAssignment> {
        self.assignments.get(index)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Replaces the employee at `index`, keeping its slot, and clears the
    /// cached fitness.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_assignment(&mut self, index: usize, employee: Option<EmployeeId>) {
        let len = self.assignments.len();
        let assignment = self
            .assignments
            .get_mut(index)
            .unwrap_or_else(|| panic!("assignment index {index} out of range for length {len}"));
        assignment.employee = employee;
        self.fitness = None;
    }

    /// An independent chromosome with the same assignments and no fitness.
    pub fn copy(&self) -> Self {
        Self::from_slice(&self.assignments)
    }

    /// Cached fitness, `None` when not yet evaluated.
    pub fn cached_fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Number of positions holding an employee.
    pub fn assigned_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.employee.is_some()).count()
    }

    /// The slots in position order.
    pub fn slots(&self) -> impl Iterator<Item = &RequiredSlot> {
        self.assignments.iter().map(|a| a.slot.as_ref())
    }
}

impl Individual for ScheduleChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }
}

impl fmt::Display for ScheduleChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fitness {
            Some(v) => writeln!(f, "schedule (fitness {v:.2})")?,
            None => writeln!(f, "schedule (unevaluated)")?,
        }
        for a in &self.assignments {
            match a.employee {
                Some(id) => writeln!(f, "  {} -> {}", a.slot, id)?,
                None => writeln!(f, "  {} -> unassigned", a.slot)?,
            }
        }
        Ok(())
    }
}
