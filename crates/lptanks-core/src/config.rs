//! Match configuration.
//!
//! [`ArenaConfig`] is built once per match and handed to the game by value.
//! Nothing in the engine reads global state; every tunable constant lives
//! here. The defaults reproduce the reference game balance.
//!
//! # Example
//!
//! ```
//! use lptanks_core::config::ArenaConfig;
//!
//! let config: ArenaConfig = serde_json::from_str(r#"{ "width": 640.0, "turns": 100 }"#).unwrap();
//! assert_eq!(config.width, 640.0);
//! assert_eq!(config.tank_radius, 7.5); // filled from defaults
//! assert!(config.validate().is_ok());
//! ```

use std::f64::consts::TAU;

use bitflags::bitflags;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

bitflags! {
    /// Kinds of objects on the board.
    ///
    /// Also used as the value of a sensor reading: a sensor's `triggered`
    /// field is the union of the kinds it currently sees.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectKind: u8 {
        /// A tank.
        const TANK = 1;
        /// A pillar obstacle.
        const PILLAR = 2;
        /// A lava pool.
        const LAVA = 4;
        /// A mud patch.
        const MUD = 8;
    }
}

/// Symmetric minimum spacing between object kinds, used by initial placement.
///
/// Lookups index the table by the kind's bit value when both kinds match and
/// by the sum of the two bit values otherwise, so `get(a, b) == get(b, a)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingTable {
    entries: [f64; 16],
}

impl SpacingTable {
    /// Creates a table where every pair has the same spacing.
    #[must_use]
    pub fn uniform(spacing: f64) -> Self {
        Self {
            entries: [spacing; 16],
        }
    }

    /// Returns the spacing between two single-kind objects.
    #[must_use]
    pub fn get(&self, a: ObjectKind, b: ObjectKind) -> f64 {
        self.entries[Self::slot(a, b)]
    }

    /// Sets the spacing for a pair of kinds (both orders).
    pub fn set(&mut self, a: ObjectKind, b: ObjectKind, spacing: f64) {
        self.entries[Self::slot(a, b)] = spacing;
    }

    fn slot(a: ObjectKind, b: ObjectKind) -> usize {
        let index = if a == b {
            usize::from(a.bits())
        } else {
            usize::from(a.bits()) + usize::from(b.bits())
        };
        index & 0x0f
    }
}

impl Default for SpacingTable {
    fn default() -> Self {
        let mut table = Self::uniform(0.0);
        table.set(ObjectKind::TANK, ObjectKind::TANK, 50.0);
        table.set(ObjectKind::PILLAR, ObjectKind::PILLAR, 50.0);
        table.set(ObjectKind::TANK, ObjectKind::PILLAR, 10.0);
        table.set(ObjectKind::LAVA, ObjectKind::LAVA, 50.0);
        table.set(ObjectKind::TANK, ObjectKind::LAVA, 20.0);
        table.set(ObjectKind::PILLAR, ObjectKind::LAVA, 50.0);
        table.set(ObjectKind::MUD, ObjectKind::MUD, 50.0);
        table.set(ObjectKind::MUD, ObjectKind::TANK, 20.0);
        table.set(ObjectKind::PILLAR, ObjectKind::MUD, 50.0);
        table.set(ObjectKind::MUD, ObjectKind::LAVA, 50.0);
        table
    }
}

/// Immutable per-match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Field width in world units.
    pub width: f64,
    /// Field height in world units.
    pub height: f64,
    /// Turn budget for the match.
    pub turns: u32,
    /// Radius of every tank.
    pub tank_radius: f64,
    /// Maximum number of sensors per tank.
    pub max_sensors: usize,
    /// Maximum range a sensor may be configured with.
    pub max_sensor_range: f64,
    /// Cannon range, measured from the firer's centre to the target's edge.
    pub cannon_range: f64,
    /// Turns the cannon needs to recharge after a shot.
    pub cannon_recharge: u32,
    /// Whether the `teleport` action is available.
    pub teleport_enabled: bool,
    /// Turns the teleporter needs to recharge after use.
    pub teleport_recharge: u32,
    /// Maximum change of a track speed per turn, in percent of top speed.
    pub max_accel: i32,
    /// Maximum turret rotation per turn, radians.
    pub max_turret_rotation: f64,
    /// Distance covered per turn at 100% speed.
    pub top_speed: f64,
    /// Friction penalty applied when the tracks run at different speeds.
    pub friction: f64,
    /// Starting ammunition; negative means unlimited.
    pub ammo: i32,
    /// Minimum spacing table for initial placement.
    pub spacing: SpacingTable,
    /// Upper bound on rejection-sampling draws per tank during placement.
    pub max_placement_attempts: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        let max_sensor_range = 100.0;
        Self {
            width: 400.0,
            height: 400.0,
            turns: 400,
            tank_radius: 7.5,
            max_sensors: 10,
            max_sensor_range,
            cannon_range: max_sensor_range / 2.0,
            cannon_recharge: 2,
            teleport_enabled: false,
            teleport_recharge: 60,
            max_accel: 35,
            max_turret_rotation: TAU / 8.0,
            top_speed: 7.0,
            friction: 0.75,
            ammo: -1,
            spacing: SpacingTable::default(),
            max_placement_attempts: 100_000,
        }
    }
}

impl ArenaConfig {
    /// Field dimensions as a vector.
    #[must_use]
    pub fn dims(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Squared distance within which a cannon shot is resolved.
    #[must_use]
    pub fn cannon_reach_sq(&self) -> f64 {
        let reach = self.cannon_range + self.tank_radius;
        reach * reach
    }

    /// Squared distance within which a tank can be seen by any sensor.
    #[must_use]
    pub fn sensor_reach_sq(&self) -> f64 {
        let reach = self.max_sensor_range + self.tank_radius;
        reach * reach
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid("field dimensions must be positive"));
        }
        if self.tank_radius <= 0.0 {
            return Err(ConfigError::Invalid("tank_radius must be positive"));
        }
        if self.top_speed <= 0.0 {
            return Err(ConfigError::Invalid("top_speed must be positive"));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid("friction must be in [0, 1)"));
        }
        if self.max_accel <= 0 {
            return Err(ConfigError::Invalid("max_accel must be positive"));
        }
        if self.max_turret_rotation < 0.0 {
            return Err(ConfigError::Invalid(
                "max_turret_rotation must be non-negative",
            ));
        }
        if self.max_sensor_range < 0.0 || self.cannon_range < 0.0 {
            return Err(ConfigError::Invalid(
                "sensor and cannon ranges must be non-negative",
            ));
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_placement_attempts must be non-zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod spacing_tests {
        use super::*;

        #[test]
        fn default_table_matches_reference_values() {
            let table = SpacingTable::default();
            assert_eq!(table.get(ObjectKind::TANK, ObjectKind::TANK), 50.0);
            assert_eq!(table.get(ObjectKind::TANK, ObjectKind::PILLAR), 10.0);
            assert_eq!(table.get(ObjectKind::TANK, ObjectKind::LAVA), 20.0);
            assert_eq!(table.get(ObjectKind::TANK, ObjectKind::MUD), 20.0);
            assert_eq!(table.get(ObjectKind::MUD, ObjectKind::LAVA), 50.0);
        }

        #[test]
        fn lookup_is_symmetric() {
            let table = SpacingTable::default();
            let kinds = [
                ObjectKind::TANK,
                ObjectKind::PILLAR,
                ObjectKind::LAVA,
                ObjectKind::MUD,
            ];
            for a in kinds {
                for b in kinds {
                    assert_eq!(table.get(a, b), table.get(b, a));
                }
            }
        }

        #[test]
        fn set_overrides_both_orders() {
            let mut table = SpacingTable::uniform(0.0);
            table.set(ObjectKind::PILLAR, ObjectKind::TANK, 3.0);
            assert_eq!(table.get(ObjectKind::TANK, ObjectKind::PILLAR), 3.0);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(ArenaConfig::default().validate().is_ok());
        }

        #[test]
        fn derived_reaches() {
            let config = ArenaConfig::default();
            assert_eq!(config.cannon_reach_sq(), 57.5 * 57.5);
            assert_eq!(config.sensor_reach_sq(), 107.5 * 107.5);
        }

        #[test]
        fn rejects_zero_width() {
            let config = ArenaConfig {
                width: 0.0,
                ..ArenaConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::Invalid("field dimensions must be positive"))
            );
        }

        #[test]
        fn rejects_full_friction() {
            let config = ArenaConfig {
                friction: 1.0,
                ..ArenaConfig::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn rejects_zero_attempts() {
            let config = ArenaConfig {
                max_placement_attempts: 0,
                ..ArenaConfig::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn json_round_trip() {
            let config = ArenaConfig {
                teleport_enabled: true,
                ..ArenaConfig::default()
            };
            let json = serde_json::to_string(&config).unwrap();
            let back: ArenaConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(back, config);
        }

        #[test]
        fn partial_json_fills_defaults() {
            let config: ArenaConfig = serde_json::from_str(r#"{"cannon_recharge": 20}"#).unwrap();
            assert_eq!(config.cannon_recharge, 20);
            assert_eq!(config.turns, 400);
            assert_eq!(config.spacing, SpacingTable::default());
        }
    }
}
