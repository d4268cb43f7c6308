//! Run entry point: validates inputs, drives the GA, and packages the result.

use super::chromosome::ScheduleChromosome;
use super::fitness::{FitnessCalculator, PenaltyBreakdown};
use super::models::{Employee, EmployeeId, PlannedShift, PlanningPeriod, RequiredSlot, Task};
use super::params::RosterParams;
use super::problem::RosterProblem;
use crate::error::{RosterError, RosterResult};
use crate::ga::{GaResult, GaRunner, GenerationStats};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One rostering run over a fixed set of employees, tasks, and slots.
///
/// # Usage
///
/// ```ignore
/// let engine = RosterEngine::new(employees, tasks, slots, None, RosterParams::default())?;
/// let outcome = engine.run()?;
/// for shift in outcome.planned_shifts() {
///     store(shift);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RosterEngine {
    problem: RosterProblem,
    params: RosterParams,
    period: PlanningPeriod,
}

impl RosterEngine {
    /// Prepares a run.
    ///
    /// `period` defaults to the span of the slot dates. Fails with
    /// [`RosterError::NoEmployees`] or [`RosterError::NoRequiredSlots`] when
    /// there is nothing to search, or with
    /// [`RosterError::InvalidParameters`] for unusable run parameters or a
    /// negative or non-finite task or employee weight.
    pub fn new(
        employees: Vec<Employee>,
        tasks: HashMap<String, Task>,
        slots: Vec<RequiredSlot>,
        period: Option<PlanningPeriod>,
        params: RosterParams,
    ) -> RosterResult<Self> {
        if employees.is_empty() {
            return Err(RosterError::NoEmployees);
        }
        let Some(span) = PlanningPeriod::spanning(&slots) else {
            return Err(RosterError::NoRequiredSlots);
        };
        params.validate()?;
        for emp in &employees {
            emp.validate().map_err(RosterError::InvalidParameters)?;
        }
        for task in tasks.values() {
            task.validate().map_err(RosterError::InvalidParameters)?;
        }

        let period = period.unwrap_or(span);
        debug!(
            employees = employees.len(),
            tasks = tasks.len(),
            slots = slots.len(),
            start = %period.start(),
            end = %period.end(),
            "roster engine prepared"
        );

        let calculator =
            FitnessCalculator::new(employees, tasks, &slots, &period, params.penalties.clone());
        let problem = RosterProblem::new(calculator, slots, params.initial_assign_rate);
        Ok(Self {
            problem,
            params,
            period,
        })
    }

    pub fn problem(&self) -> &RosterProblem {
        &self.problem
    }

    pub fn params(&self) -> &RosterParams {
        &self.params
    }

    pub fn period(&self) -> PlanningPeriod {
        self.period
    }

    /// Runs with the RNG seeded from `params.ga.seed` (or entropy).
    pub fn run(&self) -> RosterResult<RosterOutcome> {
        self.run_with_cancel(None)
    }

    /// Like [`run`](Self::run), stopping at the next generation boundary once
    /// `cancel` is set. A cancelled run still returns its best schedule.
    pub fn run_with_cancel(&self, cancel: Option<Arc<AtomicBool>>) -> RosterResult<RosterOutcome> {
        self.log_start();
        let result = GaRunner::run_with_cancel(&self.problem, &self.params.ga, cancel)?;
        Ok(self.finish(result))
    }

    /// Runs drawing all randomness from `rng`.
    pub fn run_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> RosterResult<RosterOutcome> {
        self.log_start();
        let result = GaRunner::run_with_rng(&self.problem, &self.params.ga, rng, cancel)?;
        Ok(self.finish(result))
    }

    /// Penalty breakdown of any chromosome over this engine's data.
    pub fn breakdown(&self, chromosome: &ScheduleChromosome) -> PenaltyBreakdown {
        self.problem.calculator().breakdown(chromosome)
    }

    fn log_start(&self) {
        let ga = &self.params.ga;
        info!(
            slots = self.problem.slots().len(),
            employees = self.problem.calculator().employees().len(),
            population = ga.population_size,
            generations = ga.max_generations,
            "starting roster search"
        );
    }

    fn finish(&self, result: GaResult<ScheduleChromosome>) -> RosterOutcome {
        let breakdown = self.breakdown(&result.best);
        info!(
            fitness = result.best_fitness,
            generations = result.generations,
            cancelled = result.cancelled,
            "roster search finished"
        );
        if result.best_fitness > 0.0 {
            warn!(
                fitness = result.best_fitness,
                hard = breakdown.hard(),
                "best schedule still violates constraints"
            );
        }

        let known_employees = self
            .problem
            .calculator()
            .employees()
            .iter()
            .map(|e| e.id)
            .collect();
        RosterOutcome {
            fitness: result.best_fitness,
            best: result.best,
            generations: result.generations,
            reached_target: result.reached_target,
            cancelled: result.cancelled,
            history: result.history,
            breakdown,
            known_employees,
        }
    }
}

/// Best schedule of a run plus its diagnostics.
#[derive(Debug, Clone)]
pub struct RosterOutcome {
    pub best: ScheduleChromosome,
    pub fitness: f64,
    pub generations: usize,
    pub reached_target: bool,
    pub cancelled: bool,
    pub history: Vec<GenerationStats>,
    pub breakdown: PenaltyBreakdown,
    known_employees: HashSet<EmployeeId>,
}

impl RosterOutcome {
    /// Whether no hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.breakdown.is_feasible()
    }

    /// Filled positions as persistable shifts, in slot order.
    ///
    /// Unassigned positions are dropped; so are positions naming an unknown
    /// employee, which are logged.
    pub fn planned_shifts(&self) -> Vec<PlannedShift> {
        self.best
            .iter()
            .filter_map(|a| {
                let id = a.employee?;
                if !self.known_employees.contains(&id) {
                    error!(employee_id = id, slot = %a.slot, "dropping assignment to unknown employee");
                    return None;
                }
                Some(PlannedShift {
                    employee_id: id,
                    task: a.slot.task.clone(),
                    date: a.slot.date,
                    start: a.slot.start,
                    end: a.slot.end,
                })
            })
            .collect()
    }

    /// Slots left without an employee.
    pub fn unmet_slots(&self) -> Vec<&RequiredSlot> {
        self.best
            .iter()
            .filter(|a| a.employee.is_none())
            .map(|a| a.slot.as_ref())
            .collect()
    }

    /// Human-readable notes on what the schedule leaves unresolved.
    pub fn explanations(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.best.assigned_count() == 0 {
            notes.push("no shifts could be assigned".to_string());
        }
        let unmet = self.unmet_slots().len();
        if unmet > 0 {
            notes.push(format!("{unmet} slot(s) left unassigned"));
        }
        if self.fitness > 0.0 {
            notes.push(format!(
                "schedule found with penalty {:.2}; some constraints may be violated",
                self.fitness
            ));
            for (category, penalty) in self.breakdown.violations() {
                notes.push(format!("{category}: {penalty:.2}"));
            }
        }
        if self.cancelled {
            notes.push(format!("search stopped early after {} generation(s)", self.generations));
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::GaConfig;
    use chrono::{NaiveDate, NaiveTime};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn slot(h: u32) -> RequiredSlot {
        RequiredSlot::new(
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(h + 4, 0, 0).unwrap(),
            "Desk",
        )
    }

    fn tasks() -> HashMap<String, Task> {
        HashMap::from([("Desk".to_string(), Task::new("Desk"))])
    }

    fn worker(id: EmployeeId) -> Employee {
        Employee::new(id, format!("E{id}"))
            .with_availability("Any_0000_2359")
            .with_preferences("preferredday:Mon")
    }

    fn small_params() -> RosterParams {
        RosterParams::default().with_ga(
            GaConfig::default()
                .with_population_size(10)
                .with_max_generations(20)
                .with_parallel(false),
        )
    }

    #[test]
    fn test_rejects_empty_employees() {
        let err = RosterEngine::new(vec![], tasks(), vec![slot(9)], None, small_params()).unwrap_err();
        assert_eq!(err, RosterError::NoEmployees);
        assert!(err.is_cannot_search());
    }

    #[test]
    fn test_rejects_empty_slots() {
        let err = RosterEngine::new(vec![worker(1)], tasks(), vec![], None, small_params()).unwrap_err();
        assert_eq!(err, RosterError::NoRequiredSlots);
        assert!(err.is_cannot_search());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = small_params().with_ga(GaConfig::default().with_population_size(1));
        let err = RosterEngine::new(vec![worker(1)], tasks(), vec![slot(9)], None, params).unwrap_err();
        assert!(matches!(err, RosterError::InvalidParameters(_)));
        assert!(err.is_cannot_search());
    }

    #[test]
    fn test_rejects_negative_or_nan_task_weight() {
        for weight in [-10.0, f64::NAN, f64::INFINITY] {
            let tasks = HashMap::from([(
                "Desk".to_string(),
                Task::new("Desk").with_penalty_weight(weight),
            )]);
            let err = RosterEngine::new(vec![worker(1)], tasks, vec![slot(9)], None, small_params())
                .unwrap_err();
            assert!(
                matches!(err, RosterError::InvalidParameters(ref msg) if msg.contains("penalty_weight")),
                "{weight}: {err}"
            );
            assert!(err.is_cannot_search());
        }
    }

    #[test]
    fn test_rejects_negative_or_nan_employee_weights() {
        let cases = [
            worker(1).with_weights(-1.0, 10.0, 2.0),
            worker(1).with_weights(5.0, f64::NAN, 2.0),
            worker(1).with_weights(5.0, 10.0, -0.5),
        ];
        for emp in cases {
            let err = RosterEngine::new(vec![worker(2), emp], tasks(), vec![slot(9)], None, small_params())
                .unwrap_err();
            assert!(
                matches!(err, RosterError::InvalidParameters(ref msg) if msg.starts_with("employee 1")),
                "{err}"
            );
        }
    }

    #[test]
    fn test_period_defaults_to_slot_span() {
        let engine = RosterEngine::new(vec![worker(1)], tasks(), vec![slot(9)], None, small_params()).unwrap();
        assert_eq!(engine.period().start(), engine.period().end());
    }

    #[test]
    fn test_run_solves_trivial_instance() {
        let engine = RosterEngine::new(
            vec![worker(1), worker(2)],
            tasks(),
            vec![slot(9), slot(13)],
            None,
            small_params(),
        )
        .unwrap();
        let outcome = engine.run_with_rng(&mut StdRng::seed_from_u64(7), None).unwrap();

        assert_eq!(outcome.fitness, 0.0);
        assert!(outcome.reached_target);
        assert!(outcome.is_feasible());
        assert!(outcome.unmet_slots().is_empty());
        assert!(outcome.explanations().is_empty());

        let shifts = outcome.planned_shifts();
        assert_eq!(shifts.len(), 2);
        assert_ne!(shifts[0].employee_id, shifts[1].employee_id);
    }

    #[test]
    fn test_outcome_conversion_skips_unassigned_and_unknown() {
        let engine = RosterEngine::new(
            vec![worker(1)],
            tasks(),
            vec![slot(9), slot(13), slot(17)],
            None,
            small_params(),
        )
        .unwrap();
        let best = engine.problem().chromosome_from(&[Some(1), None, Some(42)]);
        let breakdown = engine.breakdown(&best);
        let outcome = RosterOutcome {
            fitness: breakdown.total(),
            best,
            generations: 0,
            reached_target: false,
            cancelled: false,
            history: Vec::new(),
            breakdown,
            known_employees: HashSet::from([1]),
        };

        let shifts = outcome.planned_shifts();
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].employee_id, 1);
        assert_eq!(shifts[0].task, "Desk");
        assert_eq!(outcome.unmet_slots().len(), 1);
        assert!(!outcome.is_feasible());

        let notes = outcome.explanations();
        assert!(notes.iter().any(|n| n.contains("1 slot(s) left unassigned")));
        assert!(notes.iter().any(|n| n.starts_with("data faults")));
    }
}
