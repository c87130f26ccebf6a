//! Collaborator interfaces consumed by the game.
//!
//! The engine never runs agent code, computes sensor geometry, or decides
//! what to do with bad input. It talks to three collaborators instead:
//!
//! - [`ControlRuntime`]: asked once per living tank per turn for an action map
//! - [`SensorSubsystem`]: asked once per turn to refresh sensor readings
//! - [`ErrorChannel`]: told about every rejected input value
//!
//! # Control programs
//!
//! Hosts that run agents in-process implement [`ControlProgram`] and register
//! one program per tank with a [`ProgramRuntime`], which dispatches by
//! [`TankId`]. Closures work as a [`ControlRuntime`] too, which keeps tests
//! short.
//!
//! # Example
//!
//! ```
//! use lptanks_core::output::StateMap;
//! use lptanks_core::runtime::{ControlProgram, ProgramRuntime};
//! use lptanks_core::entity::TankId;
//! use serde_json::json;
//!
//! struct Forward;
//!
//! impl ControlProgram for Forward {
//!     fn name(&self) -> &str {
//!         "forward"
//!     }
//!
//!     fn run(&mut self, _state: &StateMap) -> StateMap {
//!         let mut action = StateMap::new();
//!         action.insert("set_speed_left".into(), json!(100));
//!         action.insert("set_speed_right".into(), json!(100));
//!         action
//!     }
//! }
//!
//! let mut runtime = ProgramRuntime::new();
//! runtime.register(TankId::new(1), Box::new(Forward));
//! assert_eq!(runtime.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::warn;

use crate::config::ArenaConfig;
use crate::entity::{Tank, TankId};
use crate::error::ValidationError;
use crate::output::StateMap;

// =============================================================================
// Control runtime
// =============================================================================

/// Supplies one action map per living tank per turn.
///
/// Calls are synchronous and made in roster order.
pub trait ControlRuntime {
    /// Returns the action map for `tank`, given its projected state.
    fn get_action(&mut self, tank: &Tank, state: &StateMap) -> StateMap;
}

impl<F> ControlRuntime for F
where
    F: FnMut(&Tank, &StateMap) -> StateMap,
{
    fn get_action(&mut self, tank: &Tank, state: &StateMap) -> StateMap {
        self(tank, state)
    }
}

/// An agent program driving a single tank.
pub trait ControlProgram {
    /// Display name given to the tank.
    fn name(&self) -> &str;

    /// Registration options: sensors and color, as JSON.
    ///
    /// `null` requests a tank without sensors and a random color.
    fn options(&self) -> Value {
        Value::Null
    }

    /// Computes this turn's action map from the projected state.
    fn run(&mut self, state: &StateMap) -> StateMap;
}

/// A [`ControlRuntime`] that dispatches to registered [`ControlProgram`]s.
///
/// Tanks without a program idle: they receive an empty action map, which
/// leaves every persistent intent unchanged.
#[derive(Default)]
pub struct ProgramRuntime {
    programs: BTreeMap<TankId, Box<dyn ControlProgram>>,
}

impl fmt::Debug for ProgramRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramRuntime")
            .field(
                "programs",
                &self
                    .programs
                    .iter()
                    .map(|(id, program)| (*id, program.name().to_string()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ProgramRuntime {
    /// Creates an empty runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the program that drives `tank`, replacing any previous one.
    pub fn register(&mut self, tank: TankId, program: Box<dyn ControlProgram>) {
        self.programs.insert(tank, program);
    }

    /// Returns the number of registered programs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Returns true if no program is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl ControlRuntime for ProgramRuntime {
    fn get_action(&mut self, tank: &Tank, state: &StateMap) -> StateMap {
        self.programs
            .get_mut(&tank.id())
            .map(|program| program.run(state))
            .unwrap_or_default()
    }
}

// =============================================================================
// Sensor subsystem
// =============================================================================

/// Refreshes every sensor's `triggered` reading from current positions.
///
/// The engine treats sensor geometry as opaque and only publishes what this
/// collaborator leaves behind.
pub trait SensorSubsystem {
    /// Updates sensor readings for the whole roster.
    fn refresh_sensors(&mut self, tanks: &mut [Tank], config: &ArenaConfig);
}

/// A sensor subsystem that never changes any reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSensors;

impl SensorSubsystem for NoSensors {
    fn refresh_sensors(&mut self, _tanks: &mut [Tank], _config: &ArenaConfig) {}
}

// =============================================================================
// Error channel
// =============================================================================

/// Receives rejected control-program input. Reporting is never fatal.
pub trait ErrorChannel {
    /// Reports one rejected value for `tank`.
    fn report_error(&mut self, tank: TankId, error: &ValidationError);
}

/// An error channel that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrors;

impl ErrorChannel for LogErrors {
    fn report_error(&mut self, tank: TankId, error: &ValidationError) {
        warn!(tank = %tank, error = %error, "rejected control program input");
    }
}

/// An error channel that logs and keeps every report, in order.
#[derive(Debug, Clone, Default)]
pub struct CollectErrors {
    errors: Vec<(TankId, ValidationError)>,
}

impl CollectErrors {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far.
    #[must_use]
    pub fn errors(&self) -> &[(TankId, ValidationError)] {
        &self.errors
    }

    /// Takes the collected reports, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<(TankId, ValidationError)> {
        std::mem::take(&mut self.errors)
    }
}

impl ErrorChannel for CollectErrors {
    fn report_error(&mut self, tank: TankId, error: &ValidationError) {
        LogErrors.report_error(tank, error);
        self.errors.push((tank, error.clone()));
    }
}
