//! Run parameters: GA settings plus penalty weights.
//!
//! The relative magnitudes of the weights encode the priority ordering
//! hard ≫ understaffing > overstaffing > soft preferences. Exact values are
//! a tuning surface, not a derived formula.

use crate::error::{RosterError, RosterResult};
use crate::ga::GaConfig;
use chrono::NaiveTime;
use std::collections::HashMap;
use std::str::FromStr;

/// Penalty weights and time thresholds used by the fitness calculator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyWeights {
    /// Fixed cost of a double booking, skill mismatch, or unavailability.
    pub hard_constraint: f64,
    /// Per missing employee below minimum coverage, times the task weight.
    pub understaffing_base: f64,
    /// Per extra employee above optimal coverage, times the task weight.
    pub overstaffing_base: f64,
    /// Late shift followed by an early shift the next day.
    pub forbidden_succession: f64,
    /// A shift ending strictly after this is "late".
    pub late_shift_end: NaiveTime,
    /// A shift starting strictly before this is "early".
    pub early_shift_start: NaiveTime,
    /// Multiple of `hard_constraint` charged for data faults (unknown task
    /// or employee).
    pub data_fault_multiplier: f64,
    /// Extra factor on the min-consecutive-days deficit.
    pub min_consecutive_multiplier: f64,
    /// Factor per minute outside the total-minutes bounds.
    pub minutes_multiplier: f64,
    /// Factor on the employee's hours weight for an unpreferred shift.
    pub unpreferred_multiplier: f64,
    /// Flat cost of a shift matching no preference rule.
    pub neutral_preference: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            hard_constraint: 1000.0,
            understaffing_base: 50.0,
            overstaffing_base: 5.0,
            forbidden_succession: 200.0,
            late_shift_end: NaiveTime::from_hms_opt(19, 59, 0).unwrap_or(NaiveTime::MIN),
            early_shift_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            data_fault_multiplier: 10.0,
            min_consecutive_multiplier: 2.0,
            minutes_multiplier: 0.1,
            unpreferred_multiplier: 10.0,
            neutral_preference: 1.0,
        }
    }
}

impl PenaltyWeights {
    pub fn with_hard_constraint(mut self, penalty: f64) -> Self {
        self.hard_constraint = penalty;
        self
    }

    pub fn with_staffing_bases(mut self, under: f64, over: f64) -> Self {
        self.understaffing_base = under;
        self.overstaffing_base = over;
        self
    }

    pub fn with_forbidden_succession(mut self, penalty: f64) -> Self {
        self.forbidden_succession = penalty;
        self
    }

    pub fn with_succession_thresholds(mut self, late_end: NaiveTime, early_start: NaiveTime) -> Self {
        self.late_shift_end = late_end;
        self.early_shift_start = early_start;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("hard_constraint", self.hard_constraint),
            ("understaffing_base", self.understaffing_base),
            ("overstaffing_base", self.overstaffing_base),
            ("forbidden_succession", self.forbidden_succession),
            ("data_fault_multiplier", self.data_fault_multiplier),
            ("min_consecutive_multiplier", self.min_consecutive_multiplier),
            ("minutes_multiplier", self.minutes_multiplier),
            ("unpreferred_multiplier", self.unpreferred_multiplier),
            ("neutral_preference", self.neutral_preference),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be finite and non-negative"));
            }
        }
        Ok(())
    }
}

/// Everything tunable about one run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterParams {
    pub ga: GaConfig,
    pub penalties: PenaltyWeights,
    /// Probability that a random initial chromosome fills a slot at all.
    pub initial_assign_rate: f64,
}

impl Default for RosterParams {
    fn default() -> Self {
        Self {
            ga: GaConfig::default(),
            penalties: PenaltyWeights::default(),
            initial_assign_rate: 0.8,
        }
    }
}

// Settings keys; the staffing keys carry a legacy x10 scale.
const GA_POPULATION_SIZE: &str = "ga.population.size";
const GA_MAX_GENERATIONS: &str = "ga.max.generations";
const GA_MUTATION_RATE: &str = "ga.mutation.rate";
const GA_CROSSOVER_RATE: &str = "ga.crossover.rate";
const GA_TOURNAMENT_SIZE: &str = "ga.tournament.size";
const PENALTY_HARD_CONSTRAINT: &str = "penalty.hard.constraint";
const PENALTY_UNDER_STAFFING: &str = "penalty.under.staffing";
const PENALTY_OVER_STAFFING: &str = "penalty.over.staffing";
const PENALTY_FORBIDDEN_SUCCESSION: &str = "penalty.forbidden.succession";
const THRESHOLD_LATE_SHIFT_END: &str = "threshold.late.shift.end";
const THRESHOLD_EARLY_SHIFT_START: &str = "threshold.early.shift.start";

const STAFFING_SETTING_SCALE: f64 = 10.0;

impl RosterParams {
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_penalties(mut self, penalties: PenaltyWeights) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn with_initial_assign_rate(mut self, rate: f64) -> Self {
        self.initial_assign_rate = rate;
        self
    }

    /// Builds parameters from a flat key/value settings map.
    ///
    /// Missing keys keep their defaults. Present but unparsable values fail
    /// with [`RosterError::InvalidSetting`]. Thresholds use `HH:MM`.
    pub fn from_settings(settings: &HashMap<String, String>) -> RosterResult<Self> {
        let mut params = Self::default();
        let ga = &mut params.ga;
        let p = &mut params.penalties;

        if let Some(v) = setting::<usize>(settings, GA_POPULATION_SIZE)? {
            ga.population_size = v;
        }
        if let Some(v) = setting::<usize>(settings, GA_MAX_GENERATIONS)? {
            ga.max_generations = v;
        }
        if let Some(v) = setting::<f64>(settings, GA_MUTATION_RATE)? {
            ga.mutation_rate = v;
        }
        if let Some(v) = setting::<f64>(settings, GA_CROSSOVER_RATE)? {
            ga.crossover_rate = v;
        }
        if let Some(v) = setting::<usize>(settings, GA_TOURNAMENT_SIZE)? {
            ga.tournament_size = v;
        }
        if let Some(v) = setting::<f64>(settings, PENALTY_HARD_CONSTRAINT)? {
            p.hard_constraint = v;
        }
        if let Some(v) = setting::<f64>(settings, PENALTY_UNDER_STAFFING)? {
            p.understaffing_base = v / STAFFING_SETTING_SCALE;
        }
        if let Some(v) = setting::<f64>(settings, PENALTY_OVER_STAFFING)? {
            p.overstaffing_base = v / STAFFING_SETTING_SCALE;
        }
        if let Some(v) = setting::<f64>(settings, PENALTY_FORBIDDEN_SUCCESSION)? {
            p.forbidden_succession = v;
        }
        if let Some(v) = time_setting(settings, THRESHOLD_LATE_SHIFT_END)? {
            p.late_shift_end = v;
        }
        if let Some(v) = time_setting(settings, THRESHOLD_EARLY_SHIFT_START)? {
            p.early_shift_start = v;
        }

        params.validate()?;
        Ok(params)
    }

    /// Checks the GA config, the weights, and the initial assignment rate.
    pub fn validate(&self) -> RosterResult<()> {
        self.ga.validate().map_err(RosterError::InvalidParameters)?;
        self.penalties.validate().map_err(RosterError::InvalidParameters)?;
        if !(0.0..=1.0).contains(&self.initial_assign_rate) {
            return Err(RosterError::InvalidParameters(
                "initial_assign_rate must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

fn setting<T: FromStr>(settings: &HashMap<String, String>, key: &str) -> RosterResult<Option<T>> {
    settings
        .get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| RosterError::InvalidSetting {
                key: key.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}

fn time_setting(settings: &HashMap<String, String>, key: &str) -> RosterResult<Option<NaiveTime>> {
    settings
        .get(key)
        .map(|raw| {
            NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| RosterError::InvalidSetting {
                key: key.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}
