//! Error types for the arena engine.
//!
//! Only configuration and placement failures are returned to the caller.
//! [`ValidationError`]s describe malformed control-program input; they are
//! reported through an [`ErrorChannel`](crate::runtime::ErrorChannel) and
//! never abort a turn.

use thiserror::Error;

use crate::entity::TankId;

/// Invalid [`ArenaConfig`](crate::config::ArenaConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Malformed input from a control program or tank options.
///
/// The offending field keeps its previous value and the match continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A track speed outside `[-100, 100]`.
    #[error("{key} not in valid range [-100, 100]: {value}")]
    SpeedOutOfRange {
        /// The action key that carried the value.
        key: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A numeric action key carried something that is not a number.
    #[error("{key} must be a number")]
    NotANumber {
        /// The action key that carried the value.
        key: &'static str,
    },
    /// More sensors were requested than the arena allows.
    #[error("up to {max} sensors allowed, {given} given")]
    TooManySensors {
        /// Configured maximum.
        max: usize,
        /// Number requested.
        given: usize,
    },
    /// A sensor descriptor lacks a required property.
    #[error("sensor {index} missing {property} prop")]
    MissingSensorProperty {
        /// Position of the sensor in the request.
        index: usize,
        /// Name of the missing property.
        property: &'static str,
    },
    /// A sensor property has the wrong type.
    #[error("sensor {index} has invalid {property} prop")]
    InvalidSensorProperty {
        /// Position of the sensor in the request.
        index: usize,
        /// Name of the offending property.
        property: &'static str,
    },
}

/// Initial placement could not satisfy the spacing constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Rejection sampling ran out of attempts for one tank.
    #[error("could not place tank {tank} after {attempts} attempts; spacing is infeasible for this field")]
    Exhausted {
        /// The tank that could not be placed.
        tank: TankId,
        /// Attempts made before giving up.
        attempts: u32,
    },
}

/// Errors surfaced by [`TanksGame`](crate::simulation::TanksGame) construction
/// and setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Initial placement failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// Tank options could not be parsed at all.
    #[error("invalid tank options: {0}")]
    Options(String),
}
