//! Read-only per-turn snapshot for renderers.
//!
//! A [`Frame`] is derived from the roster once per turn and never feeds back
//! into the simulation. Living tanks render as [`TankFrame::Tank`], dead
//! ones as a [`TankFrame::Crater`] where they died.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;
use crate::entity::{SensorDescriptor, Tank};

/// Number of fire-flash brightness steps.
pub const FIRE_FLASH_STEPS: i64 = 5;

/// Everything a renderer needs for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Turns played when the frame was taken.
    pub turn: u32,
    /// One entry per roster slot, in roster order.
    pub tanks: Vec<TankFrame>,
}

/// Render state of one roster slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TankFrame {
    /// A living tank.
    Tank {
        /// Hull centre.
        position: DVec2,
        /// Hull heading, radians.
        angle: f64,
        /// Turret heading relative to the hull, radians.
        turret: f64,
        /// Muzzle flash brightness, 0 when the cannon is ready.
        fire_opacity: i64,
        /// Program-controlled LED value.
        led: i64,
        /// Display color.
        color: String,
        /// Sensor arcs to draw.
        sensors: Vec<SensorDescriptor>,
    },
    /// The wreck of a destroyed tank.
    Crater {
        /// Where the tank died.
        position: DVec2,
        /// Hull heading at death.
        angle: f64,
        /// Display color of the tank.
        color: String,
    },
}

impl TankFrame {
    /// Builds the render state of one tank.
    #[must_use]
    pub fn from_tank(tank: &Tank, config: &ArenaConfig) -> Self {
        if !tank.is_alive() {
            return Self::Crater {
                position: tank.position,
                angle: tank.angle,
                color: tank.color.clone(),
            };
        }
        let since_shot =
            i64::from(config.cannon_recharge) - i64::from(tank.turret.recharge);
        Self::Tank {
            position: tank.position,
            angle: tank.angle,
            turret: tank.turret.current,
            fire_opacity: FIRE_FLASH_STEPS - since_shot.min(FIRE_FLASH_STEPS),
            led: tank.led,
            color: tank.color.clone(),
            sensors: tank.sensors.clone(),
        }
    }

    /// Returns true for a crater.
    #[must_use]
    pub fn is_crater(&self) -> bool {
        matches!(self, Self::Crater { .. })
    }
}

impl Frame {
    /// Snapshots the roster.
    #[must_use]
    pub fn capture(turn: u32, tanks: &[Tank], config: &ArenaConfig) -> Self {
        Self {
            turn,
            tanks: tanks
                .iter()
                .map(|tank| TankFrame::from_tank(tank, config))
                .collect(),
        }
    }
}
