//! Employee shift rostering engine.
//!
//! Assigns employees to required shift slots over a planning period by
//! genetic search. A candidate roster is a chromosome holding one
//! employee-or-unassigned decision per slot; a penalty model scores it
//! against coverage, skills, availability, and soft preferences, and the
//! GA drives the population toward zero penalty.
//!
//! - **`ga`**: Generic evolutionary engine: tournament selection,
//!   elitism, single-point crossover, per-gene mutation, rayon-parallel
//!   evaluation, cancellation.
//! - **`roster`**: The rostering domain: employees, tasks, slots, the
//!   availability/preference rule grammar, the slot catalog, the
//!   chromosome, the fitness calculator, and the [`roster::RosterEngine`]
//!   entry point.
//!
//! # Architecture
//!
//! The core performs no I/O. Callers load employees, tasks, and slots up
//! front and hand fully materialized structures to
//! [`roster::RosterEngine::new`]; tunable weights arrive as immutable
//! parameter structs. Logging goes through `tracing`; installing a
//! subscriber is left to the caller.

pub mod error;
pub mod ga;
pub mod roster;

pub use error::{RosterError, RosterResult};
