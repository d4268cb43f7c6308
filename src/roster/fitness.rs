//! Penalty model scoring a candidate schedule.
//!
//! A score of 0 means every hard and soft constraint holds. Evaluation is a
//! pure function of the chromosome and the data captured at construction,
//! so the runner can call it concurrently on distinct chromosomes.
//!
//! # Passes
//!
//! 1. **Coverage**: equal required slots form one demand unit; each unit
//!    is charged for staff below the task minimum and above the task
//!    optimum, whether or not the chromosome holds a position for it.
//! 2. **Per employee**: each employee's assignments, sorted by date and
//!    start, are walked once for double bookings, skills, availability,
//!    forbidden successions, consecutive-day runs, weekends, preferences,
//!    and total worked minutes.

use super::chromosome::ScheduleChromosome;
use super::models::{Employee, EmployeeId, PlanningPeriod, RequiredSlot, ShiftAssignment, Task};
use super::params::PenaltyWeights;
use super::rules::PreferenceScore;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{error, trace};

/// Penalty of one chromosome split by category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyBreakdown {
    pub understaffing: f64,
    pub overstaffing: f64,
    pub double_booking: f64,
    pub skill_mismatch: f64,
    pub unavailability: f64,
    pub forbidden_succession: f64,
    pub preference: f64,
    pub consecutive_days: f64,
    pub total_hours: f64,
    pub weekends: f64,
    /// Unknown employee ids and slots naming a missing task.
    pub data_faults: f64,
}

impl PenaltyBreakdown {
    pub fn total(&self) -> f64 {
        self.coverage() + self.hard() + self.soft()
    }

    /// Understaffing plus overstaffing.
    pub fn coverage(&self) -> f64 {
        self.understaffing + self.overstaffing
    }

    /// Double bookings, skill mismatches, unavailability and data faults.
    pub fn hard(&self) -> f64 {
        self.double_booking + self.skill_mismatch + self.unavailability + self.data_faults
    }

    pub fn soft(&self) -> f64 {
        self.forbidden_succession
            + self.preference
            + self.consecutive_days
            + self.total_hours
            + self.weekends
    }

    /// Whether no hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.hard() == 0.0
    }

    /// Non-zero categories as `(name, penalty)` pairs, in declaration order.
    pub fn violations(&self) -> Vec<(&'static str, f64)> {
        [
            ("understaffing", self.understaffing),
            ("overstaffing", self.overstaffing),
            ("double booking", self.double_booking),
            ("skill mismatch", self.skill_mismatch),
            ("unavailability", self.unavailability),
            ("forbidden succession", self.forbidden_succession),
            ("preference", self.preference),
            ("consecutive days", self.consecutive_days),
            ("total hours", self.total_hours),
            ("weekends", self.weekends),
            ("data faults", self.data_faults),
        ]
        .into_iter()
        .filter(|(_, v)| *v > 0.0)
        .collect()
    }
}

/// Scores chromosomes against one run's employees, tasks, and period.
#[derive(Debug, Clone)]
pub struct FitnessCalculator {
    employees: Vec<Employee>,
    employee_index: HashMap<EmployeeId, usize>,
    tasks: HashMap<String, Task>,
    /// Distinct required slots in order of first appearance.
    demand_units: Vec<RequiredSlot>,
    unit_index: HashMap<RequiredSlot, usize>,
    weekend_dates: HashSet<NaiveDate>,
    weights: PenaltyWeights,
}

impl FitnessCalculator {
    /// Captures the static problem data, groups `slots` into demand units,
    /// and precomputes the weekend lookup for `period`.
    ///
    /// Coverage is always charged against these units, so a chromosome that
    /// leaves slots out is understaffed for them. On duplicate employee ids
    /// the first entry wins.
    pub fn new<'a>(
        employees: Vec<Employee>,
        tasks: HashMap<String, Task>,
        slots: impl IntoIterator<Item = &'a RequiredSlot>,
        period: &PlanningPeriod,
        weights: PenaltyWeights,
    ) -> Self {
        let mut employee_index = HashMap::with_capacity(employees.len());
        for (i, emp) in employees.iter().enumerate() {
            employee_index.entry(emp.id).or_insert(i);
        }

        let mut demand_units = Vec::new();
        let mut unit_index = HashMap::new();
        for slot in slots {
            if !unit_index.contains_key(slot) {
                unit_index.insert(slot.clone(), demand_units.len());
                demand_units.push(slot.clone());
            }
        }

        Self {
            employees,
            employee_index,
            tasks,
            demand_units,
            unit_index,
            weekend_dates: period.weekend_dates().collect(),
            weights,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn tasks(&self) -> &HashMap<String, Task> {
        &self.tasks
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    /// Distinct required slots, each counted once for coverage.
    pub fn demand_units(&self) -> &[RequiredSlot] {
        &self.demand_units
    }

    /// Position of `id` in [`employees`](Self::employees).
    pub fn employee_index(&self, id: EmployeeId) -> Option<usize> {
        self.employee_index.get(&id).copied()
    }

    pub fn is_known(&self, id: EmployeeId) -> bool {
        self.employee_index.contains_key(&id)
    }

    /// Total penalty; lower is better, 0 is perfect.
    pub fn evaluate(&self, chromosome: &ScheduleChromosome) -> f64 {
        self.breakdown(chromosome).total()
    }

    /// The coverage pass alone.
    pub fn coverage_penalty(&self, chromosome: &ScheduleChromosome) -> f64 {
        let mut out = PenaltyBreakdown::default();
        self.coverage_pass(chromosome, &mut out);
        out.coverage()
    }

    /// Penalty split by category.
    pub fn breakdown(&self, chromosome: &ScheduleChromosome) -> PenaltyBreakdown {
        let mut out = PenaltyBreakdown::default();
        self.coverage_pass(chromosome, &mut out);
        self.employee_pass(chromosome, &mut out);
        out
    }

    fn coverage_pass(&self, chromosome: &ScheduleChromosome, out: &mut PenaltyBreakdown) {
        let w = &self.weights;
        let mut staffed_per_unit = vec![0u32; self.demand_units.len()];
        for a in chromosome.iter() {
            let Some(&unit) = self.unit_index.get(a.slot.as_ref()) else {
                error!(slot = %a.slot, "assignment references a slot outside the demand list");
                out.data_faults += w.hard_constraint * w.data_fault_multiplier;
                continue;
            };
            if a.employee.is_some_and(|id| self.is_known(id)) {
                staffed_per_unit[unit] += 1;
            }
        }

        for (slot, staffed) in self.demand_units.iter().zip(staffed_per_unit) {
            let Some(task) = self.tasks.get(&slot.task) else {
                error!(slot = %slot, "slot references a missing task");
                out.data_faults += w.hard_constraint * w.data_fault_multiplier;
                continue;
            };
            if staffed < task.minimum_coverage {
                let deficit = f64::from(task.minimum_coverage - staffed);
                out.understaffing += deficit * task.penalty_weight * w.understaffing_base;
                trace!(slot = %slot, staffed, min = task.minimum_coverage, "understaffed");
            }
            if staffed > task.optimal_coverage {
                let excess = f64::from(staffed - task.optimal_coverage);
                out.overstaffing += excess * task.penalty_weight * w.overstaffing_base;
                trace!(slot = %slot, staffed, optimal = task.optimal_coverage, "overstaffed");
            }
        }
    }

    fn employee_pass(&self, chromosome: &ScheduleChromosome, out: &mut PenaltyBreakdown) {
        let w = &self.weights;
        let mut by_employee: Vec<Vec<&ShiftAssignment>> = vec![Vec::new(); self.employees.len()];
        for a in chromosome.iter() {
            let Some(id) = a.employee else { continue };
            match self.employee_index(id) {
                Some(i) => by_employee[i].push(a),
                None => {
                    error!(employee_id = id, slot = %a.slot, "assignment references an unknown employee");
                    out.data_faults += w.hard_constraint * w.data_fault_multiplier;
                }
            }
        }

        for (emp, mut shifts) in self.employees.iter().zip(by_employee) {
            if shifts.is_empty() {
                continue;
            }
            shifts.sort_by_key(|a| (a.slot.date, a.slot.start));
            self.score_employee(emp, &shifts, out);
        }
    }

    fn score_employee(&self, emp: &Employee, shifts: &[&ShiftAssignment], out: &mut PenaltyBreakdown) {
        let w = &self.weights;
        let mut prev: Option<&RequiredSlot> = None;
        let mut run_days = 0u32;
        let mut total_minutes = 0i64;
        let mut weekends = 0u32;
        let mut last_weekend_day: Option<NaiveDate> = None;

        for a in shifts {
            let slot = a.slot.as_ref();

            if prev.is_some_and(|p| p.date == slot.date) {
                out.double_booking += w.hard_constraint;
                trace!(employee = emp.id, date = %slot.date, "double booked");
            }

            if let Some(task) = self.tasks.get(&slot.task) {
                if !emp.has_skills(&task.required_skills) {
                    out.skill_mismatch += w.hard_constraint;
                    trace!(employee = emp.id, task = %task.name, "missing required skill");
                }
            }

            if !emp.availability.permits(slot.date, slot.start, slot.end) {
                out.unavailability += w.hard_constraint;
                trace!(employee = emp.id, slot = %slot, "not available");
            }

            if let Some(p) = prev {
                let next_day = p.date.succ_opt() == Some(slot.date);
                if next_day && p.end > w.late_shift_end && slot.start < w.early_shift_start {
                    out.forbidden_succession += w.forbidden_succession;
                    trace!(employee = emp.id, from = %p, to = %slot, "forbidden succession");
                }
            }

            total_minutes += slot.duration_minutes();

            match prev.map(|p| p.date) {
                Some(last) if last == slot.date => {}
                Some(last) if last.succ_opt() == Some(slot.date) => run_days += 1,
                Some(_) => {
                    out.consecutive_days += self.short_run_penalty(emp, run_days);
                    run_days = 1;
                }
                None => run_days = 1,
            }
            if let Some(max) = emp.max_consecutive_days {
                if run_days > max {
                    out.consecutive_days += f64::from(run_days - max) * emp.consecutive_day_weight;
                    trace!(employee = emp.id, run_days, max, "too many consecutive days");
                }
            }

            if self.weekend_dates.contains(&slot.date) {
                let continues = last_weekend_day
                    .is_some_and(|d| d == slot.date || d.succ_opt() == Some(slot.date));
                if !continues {
                    weekends += 1;
                }
                last_weekend_day = Some(slot.date);
            }

            match emp.preferences.score(slot.date, slot.start, slot.end) {
                PreferenceScore::Preferred => {}
                PreferenceScore::Neutral => out.preference += w.neutral_preference,
                PreferenceScore::Unpreferred => {
                    out.preference += emp.total_hours_weight * w.unpreferred_multiplier;
                    trace!(employee = emp.id, slot = %slot, "unpreferred shift");
                }
            }

            prev = Some(slot);
        }

        out.consecutive_days += self.short_run_penalty(emp, run_days);

        let min = i64::from(emp.min_total_minutes);
        if total_minutes < min {
            out.total_hours += (min - total_minutes) as f64 * emp.total_hours_weight * w.minutes_multiplier;
        }
        if let Some(max) = emp.max_total_minutes.map(i64::from) {
            if total_minutes > max {
                out.total_hours += (total_minutes - max) as f64 * emp.total_hours_weight * w.minutes_multiplier;
            }
        }

        if let Some(max) = emp.max_weekends {
            if weekends > max {
                out.weekends += f64::from(weekends - max) * emp.weekend_weight;
                trace!(employee = emp.id, weekends, max, "too many weekends");
            }
        }
    }

    /// Penalty for a finished run of `run_days` consecutive working days.
    fn short_run_penalty(&self, emp: &Employee, run_days: u32) -> f64 {
        let min = emp.min_consecutive_days;
        if run_days == 0 || run_days >= min {
            return 0.0;
        }
        trace!(employee = emp.id, run_days, min, "run shorter than minimum");
        f64::from(min - run_days) * emp.consecutive_day_weight * self.weights.min_consecutive_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use proptest::prelude::*;
    use std::sync::Arc;

    // 2024-01-08 is a Monday.
    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn slot(day: u32, start: u32, end: u32, task: &str) -> Arc<RequiredSlot> {
        Arc::new(RequiredSlot::new(d(day), t(start), t(end), task))
    }

    const EVERY_DAY: &str = "preferredday:Mon;preferredday:Tue;preferredday:Wed;\
        preferredday:Thu;preferredday:Fri;preferredday:Sat;preferredday:Sun";

    /// Available any time, likes every day, no limits beyond the defaults.
    fn easy(id: EmployeeId) -> Employee {
        Employee::new(id, format!("E{id}"))
            .with_skills(["desk"])
            .with_availability("Any_0000_2359")
            .with_preferences(EVERY_DAY)
    }

    /// Calculator over `demand`, with the period spanning its dates.
    fn calculator(employees: Vec<Employee>, tasks: Vec<Task>, demand: &[Arc<RequiredSlot>]) -> FitnessCalculator {
        calculator_with(employees, tasks, demand, PenaltyWeights::default())
    }

    fn calculator_with(
        employees: Vec<Employee>,
        tasks: Vec<Task>,
        demand: &[Arc<RequiredSlot>],
        weights: PenaltyWeights,
    ) -> FitnessCalculator {
        let tasks = tasks.into_iter().map(|t| (t.name.clone(), t)).collect();
        let period = PlanningPeriod::spanning(demand.iter().map(Arc::as_ref)).unwrap();
        FitnessCalculator::new(employees, tasks, demand.iter().map(Arc::as_ref), &period, weights)
    }

    fn chrom(assignments: Vec<(Arc<RequiredSlot>, Option<EmployeeId>)>) -> ScheduleChromosome {
        ScheduleChromosome::new(
            assignments
                .into_iter()
                .map(|(s, e)| ShiftAssignment::new(s, e))
                .collect(),
        )
    }

    fn desk() -> Task {
        Task::new("Desk").with_required_skills(["desk"])
    }

    // ---- coverage -------------------------------------------------------

    fn coverage_setup() -> (FitnessCalculator, Arc<RequiredSlot>) {
        let task = desk().with_coverage(2, 2).with_penalty_weight(3.0);
        let s = slot(8, 9, 13, "Desk");
        let calc = calculator((1..=3).map(easy).collect(), vec![task], &[s.clone(), s.clone()]);
        (calc, s)
    }

    #[test]
    fn test_coverage_understaffed_exact() {
        let (calc, s) = coverage_setup();
        let c = chrom(vec![(s.clone(), None), (s, None)]);
        let w = PenaltyWeights::default();
        assert_eq!(calc.coverage_penalty(&c), 2.0 * 3.0 * w.understaffing_base);
    }

    #[test]
    fn test_coverage_exactly_met() {
        let (calc, s) = coverage_setup();
        let c = chrom(vec![(s.clone(), Some(1)), (s, Some(2))]);
        assert_eq!(calc.coverage_penalty(&c), 0.0);
    }

    #[test]
    fn test_coverage_overstaffed_exact() {
        let (calc, s) = coverage_setup();
        let c = chrom(vec![(s.clone(), Some(1)), (s.clone(), Some(2)), (s, Some(3))]);
        let w = PenaltyWeights::default();
        assert_eq!(calc.coverage_penalty(&c), 1.0 * 3.0 * w.overstaffing_base);
    }

    #[test]
    fn test_duplicate_slots_form_one_unit() {
        let (calc, _) = coverage_setup();
        assert_eq!(calc.demand_units().len(), 1);
    }

    #[test]
    fn test_distinct_slots_are_separate_units() {
        let (monday, tuesday) = (slot(8, 9, 13, "Desk"), slot(9, 9, 13, "Desk"));
        let calc = calculator(vec![easy(1)], vec![desk()], &[monday.clone(), tuesday.clone()]);
        let c = chrom(vec![(monday, Some(1)), (tuesday, None)]);
        let w = PenaltyWeights::default();
        assert_eq!(calc.coverage_penalty(&c), 10.0 * w.understaffing_base);
    }

    #[test]
    fn test_empty_chromosome_is_understaffed() {
        let (calc, _) = coverage_setup();
        let empty = ScheduleChromosome::new(Vec::new());
        let w = PenaltyWeights::default();
        assert_eq!(calc.coverage_penalty(&empty), 2.0 * 3.0 * w.understaffing_base);
        assert!(calc.evaluate(&empty) > 0.0);
    }

    #[test]
    fn test_truncated_chromosome_is_understaffed_for_missing_slots() {
        let (monday, tuesday) = (slot(8, 9, 13, "Desk"), slot(9, 9, 13, "Desk"));
        let calc = calculator(vec![easy(1), easy(2)], vec![desk()], &[monday.clone(), tuesday]);
        let c = chrom(vec![(monday, Some(1))]);
        let b = calc.breakdown(&c);
        assert_eq!(b.understaffing, 10.0 * 50.0);
        assert_eq!(b.data_faults, 0.0);
    }

    #[test]
    fn test_slot_outside_demand_is_data_fault() {
        let known = slot(8, 9, 13, "Desk");
        let calc = calculator(vec![easy(1)], vec![desk()], &[known.clone()]);
        let c = chrom(vec![(known, Some(1)), (slot(8, 17, 21, "Desk"), None)]);
        let b = calc.breakdown(&c);
        assert_eq!(b.data_faults, 10_000.0);
        assert_eq!(b.coverage(), 0.0);
    }

    // ---- perfect schedule ------------------------------------------------

    #[test]
    fn test_satisfied_schedule_scores_zero() {
        let demand = [slot(8, 9, 13, "Desk"), slot(8, 13, 17, "Desk")];
        let calc = calculator(vec![easy(1), easy(2)], vec![desk()], &demand);
        let c = chrom(vec![(demand[0].clone(), Some(1)), (demand[1].clone(), Some(2))]);
        assert_eq!(calc.breakdown(&c), PenaltyBreakdown::default());
        assert_eq!(calc.evaluate(&c), 0.0);
    }

    // ---- hard constraints ------------------------------------------------

    #[test]
    fn test_double_booking() {
        let demand = [slot(8, 9, 13, "Desk"), slot(8, 13, 17, "Desk")];
        let calc = calculator(vec![easy(1)], vec![desk()], &demand);
        let c = chrom(vec![(demand[0].clone(), Some(1)), (demand[1].clone(), Some(1))]);
        let b = calc.breakdown(&c);
        assert_eq!(b.double_booking, 1000.0);
        assert!(!b.is_feasible());
    }

    #[test]
    fn test_skill_mismatch() {
        let novice = Employee { skills: Default::default(), ..easy(1) };
        let s = slot(8, 9, 13, "Desk");
        let calc = calculator(vec![novice], vec![desk()], &[s.clone()]);
        let c = chrom(vec![(s, Some(1))]);
        assert_eq!(calc.breakdown(&c).skill_mismatch, 1000.0);
    }

    #[test]
    fn test_unavailability() {
        let emp = easy(1).with_availability("Mon_0700_1200");
        let demand = [slot(8, 8, 12, "Desk"), slot(8, 9, 13, "Desk")];
        let calc = calculator(vec![emp], vec![desk()], &demand);
        let inside = chrom(vec![(demand[0].clone(), Some(1))]);
        let outside = chrom(vec![(demand[1].clone(), Some(1))]);
        assert_eq!(calc.breakdown(&inside).unavailability, 0.0);
        assert_eq!(calc.breakdown(&outside).unavailability, 1000.0);
    }

    #[test]
    fn test_blank_availability_means_unavailable() {
        let emp = easy(1).with_availability("");
        let s = slot(8, 9, 13, "Desk");
        let calc = calculator(vec![emp], vec![desk()], &[s.clone()]);
        let c = chrom(vec![(s, Some(1))]);
        assert_eq!(calc.breakdown(&c).unavailability, 1000.0);
    }

    #[test]
    fn test_unknown_employee_is_data_fault() {
        let s = slot(8, 9, 13, "Desk");
        let calc = calculator(vec![easy(1)], vec![desk()], &[s.clone()]);
        let c = chrom(vec![(s, Some(99))]);
        let b = calc.breakdown(&c);
        assert_eq!(b.data_faults, 10_000.0);
        // The unknown id does not count as coverage either.
        assert_eq!(b.understaffing, 10.0 * 50.0);
        assert!(b.total().is_finite());
    }

    #[test]
    fn test_missing_task_is_data_fault_once_per_unit() {
        let ghost = slot(8, 9, 13, "Ghost");
        let calc = calculator(vec![easy(1)], vec![desk()], &[ghost.clone(), ghost.clone()]);
        let c = chrom(vec![(ghost.clone(), Some(1)), (ghost, None)]);
        let b = calc.breakdown(&c);
        assert_eq!(b.data_faults, 10_000.0);
        assert_eq!(b.skill_mismatch, 0.0);
        assert!(b.total().is_finite());
    }

    // ---- soft constraints ------------------------------------------------

    #[test]
    fn test_forbidden_succession() {
        let late = slot(8, 16, 22, "Desk");
        let early = slot(9, 6, 12, "Desk");
        let calc = calculator(vec![easy(1)], vec![desk()], &[late.clone(), early.clone()]);
        let c = chrom(vec![(late.clone(), Some(1)), (early, Some(1))]);
        assert_eq!(calc.breakdown(&c).forbidden_succession, 200.0);

        let after_gap = slot(10, 6, 12, "Desk");
        let gap = calculator(vec![easy(1)], vec![desk()], &[late.clone(), after_gap.clone()]);
        let c = chrom(vec![(late, Some(1)), (after_gap, Some(1))]);
        assert_eq!(gap.breakdown(&c).forbidden_succession, 0.0);
    }

    #[test]
    fn test_preference_scores() {
        let neutral = easy(1).with_preferences("");
        let dislikes = easy(2).with_preferences("preferredday:Mon;unpreferred:Mon_morning");
        let s = slot(8, 9, 13, "Desk");
        let calc = calculator(vec![neutral, dislikes], vec![desk()], &[s.clone()]);

        let c = chrom(vec![(s.clone(), Some(1))]);
        assert_eq!(calc.breakdown(&c).preference, 1.0);

        let c = chrom(vec![(s, Some(2))]);
        assert_eq!(calc.breakdown(&c).preference, 2.0 * 10.0);
    }

    #[test]
    fn test_max_consecutive_days() {
        let emp = easy(1).with_consecutive_days(1, Some(2));
        let demand: Vec<_> = (8..=11).map(|day| slot(day, 9, 13, "Desk")).collect();
        let calc = calculator(vec![emp], vec![desk()], &demand);
        let c = chrom(demand.iter().map(|s| (s.clone(), Some(1))).collect());
        // Day 3 exceeds by 1, day 4 by 2.
        assert_eq!(calc.breakdown(&c).consecutive_days, (1.0 + 2.0) * 5.0);
    }

    #[test]
    fn test_min_consecutive_days_charged_per_run() {
        let emp = easy(1).with_consecutive_days(2, None);
        let demand: Vec<_> = (8..=11).map(|day| slot(day, 9, 13, "Desk")).collect();
        let calc = calculator(vec![emp], vec![desk()], &demand);
        let on = |days: [usize; 3]| chrom(days.iter().map(|&i| (demand[i].clone(), Some(1))).collect());

        // Runs: [8], [10, 11]: only the first is short.
        assert_eq!(calc.breakdown(&on([0, 2, 3])).consecutive_days, 1.0 * 5.0 * 2.0);
        // Runs: [8, 9], [11]: the final run is short.
        assert_eq!(calc.breakdown(&on([0, 1, 3])).consecutive_days, 1.0 * 5.0 * 2.0);
    }

    #[test]
    fn test_total_minutes_bounds() {
        let emp = easy(1).with_total_minutes(300, Some(360));
        let demand = [slot(8, 9, 13, "Desk"), slot(9, 9, 13, "Desk")];
        let calc = calculator(vec![emp], vec![desk()], &demand);

        let short = chrom(vec![(demand[0].clone(), Some(1))]);
        assert!((calc.breakdown(&short).total_hours - 60.0 * 2.0 * 0.1).abs() < 1e-9);

        let long = chrom(demand.iter().map(|s| (s.clone(), Some(1))).collect());
        assert!((calc.breakdown(&long).total_hours - 120.0 * 2.0 * 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_weekend_blocks() {
        // Sat 13 + Sun 14 is one block, Sat 20 another.
        let emp = easy(1).with_max_weekends(Some(1)).with_consecutive_days(0, None);
        let demand = [slot(13, 9, 13, "Desk"), slot(14, 9, 13, "Desk"), slot(20, 9, 13, "Desk")];
        let calc = calculator(vec![emp], vec![desk()], &demand);

        let c = chrom(demand.iter().map(|s| (s.clone(), Some(1))).collect());
        assert_eq!(calc.breakdown(&c).weekends, 10.0);

        let c = chrom(demand[..2].iter().map(|s| (s.clone(), Some(1))).collect());
        assert_eq!(calc.breakdown(&c).weekends, 0.0);
    }

    #[test]
    fn test_idle_employee_is_not_penalized() {
        let lazy = easy(2).with_total_minutes(600, None);
        let s = slot(8, 9, 13, "Desk");
        let calc = calculator(vec![easy(1), lazy], vec![desk()], &[s.clone()]);
        let c = chrom(vec![(s, Some(1))]);
        assert_eq!(calc.evaluate(&c), 0.0);
    }

    // ---- priority ordering -----------------------------------------------

    #[test]
    fn test_one_hard_violation_outweighs_soft_violations() {
        let fussy = easy(1)
            .with_preferences("unpreferredday:Mon;unpreferredday:Tue")
            .with_consecutive_days(3, Some(1))
            .with_total_minutes(2000, Some(100));
        let novice = Employee { skills: Default::default(), ..easy(2) };
        let demand = [slot(8, 9, 13, "Desk"), slot(9, 9, 13, "Desk")];
        let calc = calculator(vec![fussy, novice, easy(3)], vec![desk()], &demand);

        // Every soft rule of the fussy employee is broken, coverage is met.
        let soft = chrom(vec![(demand[0].clone(), Some(1)), (demand[1].clone(), Some(1))]);
        // A single skill mismatch, otherwise clean.
        let hard = chrom(vec![(demand[0].clone(), Some(2)), (demand[1].clone(), Some(3))]);

        assert!(calc.breakdown(&soft).is_feasible());
        assert_eq!(calc.breakdown(&hard).violations(), vec![("skill mismatch", 1000.0)]);
        assert!(calc.evaluate(&hard) > calc.evaluate(&soft));
    }

    proptest! {
        #[test]
        fn prop_evaluation_is_deterministic(genes in prop::collection::vec(prop::option::of(0u64..4), 6)) {
            let demand = [slot(8, 9, 13, "Desk"), slot(8, 17, 21, "Desk"), slot(9, 6, 12, "Desk")];
            let calc = calculator(
                vec![easy(1), easy(2).with_consecutive_days(2, Some(1)), easy(3).with_preferences("")],
                vec![desk().with_coverage(1, 2)],
                &demand,
            );
            let c = chrom(
                genes
                    .iter()
                    .enumerate()
                    .map(|(i, g)| (demand[i % demand.len()].clone(), *g))
                    .collect(),
            );
            let first = calc.evaluate(&c);
            prop_assert_eq!(first, calc.evaluate(&c));
            prop_assert_eq!(first, calc.evaluate(&c.copy()));
        }

        #[test]
        fn prop_fitness_is_finite_and_non_negative(
            genes in prop::collection::vec(prop::option::of(0u64..5), 0..10),
            task_weight in 0.0f64..100.0,
            minimum in 0u32..3,
            extra in 0u32..2,
            consecutive_weight in 0.0f64..50.0,
            weekend_weight in 0.0f64..50.0,
            hours_weight in 0.0f64..50.0,
            hard in 0.0f64..5000.0,
            understaffing in 0.0f64..200.0,
        ) {
            let demand = [
                slot(8, 9, 13, "Desk"),
                slot(8, 17, 21, "Desk"),
                slot(9, 6, 12, "Desk"),
                slot(13, 9, 13, "Desk"),
            ];
            let employees = vec![
                easy(1)
                    .with_weights(consecutive_weight, weekend_weight, hours_weight)
                    .with_consecutive_days(2, Some(1))
                    .with_total_minutes(600, Some(200)),
                easy(2)
                    .with_weights(consecutive_weight, weekend_weight, hours_weight)
                    .with_preferences("unpreferredday:Mon;unpreferredday:Sat")
                    .with_max_weekends(Some(0)),
                Employee { skills: Default::default(), ..easy(3).with_preferences("") },
            ];
            let task = desk()
                .with_coverage(minimum, minimum + extra)
                .with_penalty_weight(task_weight);
            let weights = PenaltyWeights::default()
                .with_hard_constraint(hard)
                .with_staffing_bases(understaffing, 5.0);
            let calc = calculator_with(employees, vec![task], &demand, weights);

            let c = chrom(
                genes
                    .iter()
                    .enumerate()
                    .map(|(i, g)| (demand[i % demand.len()].clone(), *g))
                    .collect(),
            );
            let fitness = calc.evaluate(&c);
            prop_assert!(fitness.is_finite() && fitness >= 0.0, "fitness {}", fitness);
        }
    }
}
