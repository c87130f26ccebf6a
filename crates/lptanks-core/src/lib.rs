//! # LP Tanks Core
//!
//! Deterministic turn-based tank arena engine.
//!
//! Tanks driven by external control programs fight on a toroidal field with
//! differential-drive movement, a rate-limited turret and a rechargeable
//! cannon. This crate owns the per-turn physics and resolution; program
//! execution, sensor geometry and rendering are collaborators behind the
//! traits in [`runtime`].
//!
//! ## Architecture
//!
//! - **Entities**: [`entity::Tank`] and its state components
//! - **Contract**: [`world_view`] projects state out, [`output`] validates
//!   actions coming back
//! - **Resolvers**: combat, movement and commit phases in [`resolver`]
//! - **Scheduler**: [`simulation::TanksGame`] runs the turn loop
//!
//! ## Usage
//!
//! ```
//! use lptanks_core::bots::{Berzerker, Tweedledum};
//! use lptanks_core::config::ArenaConfig;
//! use lptanks_core::runtime::{CollectErrors, NoSensors, ProgramRuntime};
//! use lptanks_core::simulation::TanksGame;
//!
//! let mut game = TanksGame::new(ArenaConfig::default(), 2024)?;
//! let mut runtime = ProgramRuntime::new();
//! let mut errors = CollectErrors::new();
//!
//! game.enlist(Box::new(Berzerker::new(1)), &mut runtime, &mut errors)?;
//! game.enlist(Box::new(Tweedledum::new()), &mut runtime, &mut errors)?;
//! game.init_board(&mut NoSensors)?;
//!
//! while game.is_running() {
//!     game.play_turn(&mut runtime, &mut NoSensors, &mut errors);
//! }
//! let outcome = game.outcome();
//! assert!(outcome.turns_played <= 400);
//! # Ok::<(), lptanks_core::error::GameError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod bots;
pub mod config;
pub mod entity;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod output;
pub mod placement;
pub mod resolver;
pub mod runtime;
pub mod simulation;
pub mod world_view;

pub use config::ArenaConfig;
pub use entity::{Tank, TankId};
pub use error::GameError;
pub use simulation::{MatchOutcome, MatchState, TanksGame};

#[cfg(test)]
mod tests;
