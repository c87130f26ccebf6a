//! In-crate test suites for the full turn pipeline.
//!
//! - `determinism.rs`: same seed and inputs replay identically
//! - `integration.rs`: end-to-end scenarios through [`TanksGame`](crate::simulation::TanksGame)
//! - `helpers.rs`: setup utilities and test collaborators

mod helpers;

pub use helpers::*;
