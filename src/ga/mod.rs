//! Genetic Algorithm framework.
//!
//! A generic GA engine built on trait-based abstractions. The rostering
//! problem plugs in by implementing [`GaProblem`], which specifies how to
//! create, evaluate, recombine, and mutate individuals.
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with a cached fitness
//! - [`GaProblem`]: Initialization, evaluation, and the variation operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population, tournament, rates, termination)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final optimization result with per-generation statistics
//!
//! # Submodules
//!
//! - [`operators`]: Single-point crossover and per-gene mutation helpers
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, GenerationStats};
pub use selection::{fitter, tournament};
pub use types::{Fitness, GaProblem, Individual};
