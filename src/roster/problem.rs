//! Rostering as a [`GaProblem`].

use super::chromosome::ScheduleChromosome;
use super::fitness::FitnessCalculator;
use super::models::{EmployeeId, RequiredSlot, ShiftAssignment};
use crate::ga::operators::{
    mutation_sites, random_cut_point, random_other_index, single_point_crossover,
};
use crate::ga::GaProblem;
use rand::Rng;
use std::sync::Arc;

/// Binds the slot order and the fitness calculator of one run to the GA
/// operators.
///
/// Every chromosome it creates lists the slots in the same order, so the
/// positional crossover and mutation below keep slot alignment.
#[derive(Debug, Clone)]
pub struct RosterProblem {
    slots: Vec<Arc<RequiredSlot>>,
    calculator: FitnessCalculator,
    initial_assign_rate: f64,
}

impl RosterProblem {
    pub fn new(calculator: FitnessCalculator, slots: Vec<RequiredSlot>, initial_assign_rate: f64) -> Self {
        Self {
            slots: slots.into_iter().map(Arc::new).collect(),
            calculator,
            initial_assign_rate: initial_assign_rate.clamp(0.0, 1.0),
        }
    }

    pub fn calculator(&self) -> &FitnessCalculator {
        &self.calculator
    }

    pub fn slots(&self) -> &[Arc<RequiredSlot>] {
        &self.slots
    }

    /// A chromosome with every slot unassigned.
    pub fn empty_chromosome(&self) -> ScheduleChromosome {
        ScheduleChromosome::new(self.slots.iter().cloned().map(ShiftAssignment::unassigned).collect())
    }

    /// A chromosome taking `employees[i]` for slot `i`.
    ///
    /// # Panics
    /// Panics if `employees` and the slot list differ in length.
    pub fn chromosome_from(&self, employees: &[Option<EmployeeId>]) -> ScheduleChromosome {
        assert_eq!(
            employees.len(),
            self.slots.len(),
            "one entry per slot expected"
        );
        ScheduleChromosome::new(
            self.slots
                .iter()
                .zip(employees)
                .map(|(slot, emp)| ShiftAssignment::new(Arc::clone(slot), *emp))
                .collect(),
        )
    }

    fn random_employee<R: Rng>(&self, rng: &mut R) -> Option<EmployeeId> {
        let employees = self.calculator.employees();
        if employees.is_empty() {
            return None;
        }
        Some(employees[rng.random_range(0..employees.len())].id)
    }
}

impl GaProblem for RosterProblem {
    type Individual = ScheduleChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> ScheduleChromosome {
        ScheduleChromosome::new(
            self.slots
                .iter()
                .map(|slot| {
                    let employee = if rng.random_bool(self.initial_assign_rate) {
                        self.random_employee(rng)
                    } else {
                        None
                    };
                    ShiftAssignment::new(Arc::clone(slot), employee)
                })
                .collect(),
        )
    }

    fn evaluate(&self, chromosome: &ScheduleChromosome) -> f64 {
        self.calculator.evaluate(chromosome)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &ScheduleChromosome,
        parent2: &ScheduleChromosome,
        rng: &mut R,
    ) -> ScheduleChromosome {
        if parent1.is_empty() {
            return parent1.copy();
        }
        let cut = random_cut_point(parent1.len(), rng);
        ScheduleChromosome::new(single_point_crossover(
            parent1.assignments(),
            parent2.assignments(),
            cut,
        ))
    }

    /// Each selected gene becomes unassigned or, with equal odds, moves to a
    /// different employee.
    fn mutate<R: Rng>(&self, chromosome: &mut ScheduleChromosome, gene_rate: f64, rng: &mut R) {
        let employees = self.calculator.employees();
        for i in mutation_sites(chromosome.len(), gene_rate, rng) {
            let replacement = if employees.is_empty() || rng.random_bool(0.5) {
                None
            } else {
                let current = chromosome
                    .get(i)
                    .and_then(|a| a.employee)
                    .and_then(|id| self.calculator.employee_index(id));
                let pick = random_other_index(employees.len(), current, rng);
                Some(employees[pick].id)
            };
            chromosome.set_assignment(i, replacement);
        }
    }
}
