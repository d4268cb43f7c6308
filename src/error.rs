use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("cannot search: no employees supplied")]
    NoEmployees,

    #[error("cannot search: no required slots supplied")]
    NoRequiredSlots,

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid setting '{key}': '{value}'")]
    InvalidSetting { key: String, value: String },

    #[error("invalid planning period: {end} is before {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

impl RosterError {
    /// Whether the error means no search was attempted because the input
    /// or the run parameters were unusable.
    pub fn is_cannot_search(&self) -> bool {
        matches!(
            self,
            RosterError::NoEmployees
                | RosterError::NoRequiredSlots
                | RosterError::InvalidParameters(_)
                | RosterError::InvalidSetting { .. }
                | RosterError::InvalidPeriod { .. }
        )
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
