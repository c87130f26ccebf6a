//! Tank entities.
//!
//! This module provides the agent type of the arena:
//! - [`TankId`]: Opaque identifier used for kill attribution
//! - [`CauseOfDeath`]: How a tank was destroyed
//! - [`Tank`]: Physical state, control intent, sensors and outcome
//!
//! # Example
//!
//! ```
//! use lptanks_core::config::ArenaConfig;
//! use lptanks_core::entity::{Tank, TankId};
//!
//! let config = ArenaConfig::default();
//! let tank = Tank::new(TankId::new(7), "#ff0000".into(), Vec::new(), &config);
//!
//! assert!(tank.is_alive());
//! assert!(tank.can_fire());
//! assert_eq!(tank.radius(), 7.5);
//! ```

pub mod components;
pub mod options;

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::{ArenaConfig, ObjectKind};
use crate::output::StateMap;

pub use components::{DebugVars, DriveState, SensorDescriptor, TeleportState, TurretState};
pub use options::TankOptions;

/// Opaque tank identifier.
///
/// Ids are large random numbers. They attribute kills and nothing else; the
/// roster order, not the id, decides iteration order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TankId(u64);

impl TankId {
    /// Creates a `TankId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TankId({:#x})", self.0)
    }
}

impl fmt::Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for TankId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// How a tank was destroyed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CauseOfDeath {
    /// Hulls overlapped.
    Collision,
    /// Hit by another tank's cannon.
    Shot,
}

impl fmt::Display for CauseOfDeath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collision => write!(f, "collision"),
            Self::Shot => write!(f, "shot"),
        }
    }
}

/// A controllable combat unit.
///
/// Physical and intent state are public so hosts and tests can set up
/// scenarios directly. Death attribution is private: once a killer is
/// recorded it is never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    id: TankId,
    radius: f64,
    kind: ObjectKind,
    /// Display name.
    pub name: String,
    /// Display color, `#rrggbb`.
    pub color: String,
    /// Centre of the hull, wrapped into the field.
    pub position: DVec2,
    /// Position staged for the movement-commit phase.
    pub next_position: DVec2,
    /// Hull heading, radians in `[0, TAU)`.
    pub angle: f64,
    /// Track speeds.
    pub drive: DriveState,
    /// Turret and cannon.
    pub turret: TurretState,
    /// Teleporter.
    pub teleport: TeleportState,
    /// Remaining shots; negative means unlimited.
    pub ammo: i32,
    /// Sensor slots in the order the program declared them.
    pub sensors: Vec<SensorDescriptor>,
    /// Opaque value the program shows on its LED.
    pub led: i64,
    killer: Option<TankId>,
    cause_of_death: Option<CauseOfDeath>,
    memory: StateMap,
    debug_log: Vec<DebugVars>,
}

impl Tank {
    /// Creates a tank at the origin with zeroed motion state.
    #[must_use]
    pub fn new(
        id: TankId,
        color: String,
        sensors: Vec<SensorDescriptor>,
        config: &ArenaConfig,
    ) -> Self {
        Self {
            id,
            radius: config.tank_radius,
            kind: ObjectKind::TANK,
            name: "Unnamed".to_string(),
            color,
            position: DVec2::ZERO,
            next_position: DVec2::ZERO,
            angle: 0.0,
            drive: DriveState::default(),
            turret: TurretState::default(),
            teleport: TeleportState::default(),
            ammo: config.ammo,
            sensors,
            led: 0,
            killer: None,
            cause_of_death: None,
            memory: StateMap::new(),
            debug_log: Vec::new(),
        }
    }

    /// Returns the tank's id.
    #[must_use]
    pub const fn id(&self) -> TankId {
        self.id
    }

    /// Returns the hull radius.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the object kind used for spacing and sensor readings.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Returns the id of the tank that destroyed this one.
    #[must_use]
    pub const fn killer(&self) -> Option<TankId> {
        self.killer
    }

    /// Returns how this tank was destroyed.
    #[must_use]
    pub const fn cause_of_death(&self) -> Option<CauseOfDeath> {
        self.cause_of_death
    }

    /// Returns true until a killer has been recorded.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.killer.is_none()
    }

    /// Records a kill. A tank that already has a killer keeps it.
    ///
    /// Returns true if the kill was recorded.
    pub fn mark_killed(&mut self, killer: TankId, cause: CauseOfDeath) -> bool {
        if self.killer.is_some() {
            return false;
        }
        self.killer = Some(killer);
        self.cause_of_death = Some(cause);
        true
    }

    /// Whether the cannon may fire: ammo left (or unlimited) and recharged.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.ammo != 0 && self.turret.recharge == 0
    }

    /// Whether the teleporter is recharged.
    #[must_use]
    pub fn teleport_ready(&self) -> bool {
        self.teleport.recharge == 0
    }

    /// Values the control program asked to keep between turns.
    #[must_use]
    pub fn memory(&self) -> &StateMap {
        &self.memory
    }

    /// Mutable access to the program memory.
    pub fn memory_mut(&mut self) -> &mut StateMap {
        &mut self.memory
    }

    /// Appends a snapshot of the current speeds and sensor bits to the debug log.
    pub fn grab_debug_vars(&mut self) {
        let vars = DebugVars {
            speed_left: self.drive.current[0],
            speed_right: self.drive.current[1],
            speed_desired_left: self.drive.desired[0],
            speed_desired_right: self.drive.desired[1],
            sensors: self.sensors.iter().map(|s| s.triggered.bits()).collect(),
        };
        self.debug_log.push(vars);
    }

    /// The per-turn debug snapshots, oldest first.
    #[must_use]
    pub fn debug_log(&self) -> &[DebugVars] {
        &self.debug_log
    }
}
