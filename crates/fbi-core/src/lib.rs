//! fbi core -- steady-state throughput analysis for factory blueprints.
//!
//! Given a decoded [`blueprint::Blueprint`] and a game-data
//! [`catalog::Catalog`], the [`analyzer::Analyzer`] works out how fast each
//! production machine runs, what the layout consumes and produces in
//! aggregate, and which goods cross the layout boundary.
//!
//! # Pipeline
//!
//! Every call to [`analyzer::Analyzer::analyze`] runs these phases over an
//! immutable entity snapshot:
//!
//! 1. **Classify** -- partition entities into machines, beacons, inserters,
//!    storage, pipes, and rails ([`classify`]).
//! 2. **Resolve** -- pick each machine's recipe, declared or inferred from
//!    inserter filters ([`resolve`]).
//! 3. **Effects** -- fold module and beacon bonuses into effective speed and
//!    productivity ([`effects`]).
//! 4. **Rates** -- per-machine maximum input and output rates ([`rates`]).
//! 5. **Solve** -- iterate utilizations until supply meets demand
//!    ([`solver`]).
//! 6. **Flows** -- net per-item flows, then decide which ones leave or
//!    enter the layout, using pipe topology for fluids and inserter tracing
//!    for solids ([`flows`], [`pipes`]).
//! 7. **Report** -- utilization groups and soft problems ([`report`]).
//!
//! The analysis itself never fails. Unknown entities are skipped, and
//! anything the analyzer cannot make sense of is returned as a
//! [`report::Problem`] alongside the rest of the result.
//!
//! # Key Types
//!
//! - [`analyzer::AnalysisResult`] -- Frozen result of one run.
//! - [`analyzer::AnalyzedMachine`] -- Per-machine derived state.
//! - [`catalog::Catalog`] -- Immutable game-data registry built through
//!   [`catalog::CatalogBuilder`].
//! - [`config::AnalysisConfig`] -- Tuning constants (iteration cap,
//!   tolerances, search radii).

pub mod analyzer;
pub mod blueprint;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod effects;
pub mod flows;
pub mod geometry;
pub mod id;
pub mod pipes;
pub mod rates;
pub mod report;
pub mod resolve;
pub mod solver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analyzer::{AnalysisResult, AnalyzedMachine, Analyzer};
pub use config::AnalysisConfig;
