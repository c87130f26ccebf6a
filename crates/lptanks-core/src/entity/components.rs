//! State components that make up a [`Tank`](super::Tank).
//!
//! Components are plain data with public fields. The invariants they carry
//! (normalized angles, bounded speeds) are maintained by the resolvers that
//! mutate them, not by the structs themselves.

use serde::{Deserialize, Serialize};

use crate::config::ObjectKind;
use crate::geometry::deg_to_rad;

/// Differential-drive track speeds, in percent of top speed.
///
/// Index 0 is the left track, index 1 the right track. Both values stay in
/// `[-100, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveState {
    /// Speeds currently applied to the tracks.
    pub current: [i32; 2],
    /// Speeds the control program asked for.
    pub desired: [i32; 2],
}

impl DriveState {
    /// Returns true if both tracks currently run at the same speed.
    #[must_use]
    pub fn is_straight(&self) -> bool {
        self.current[0] == self.current[1]
    }
}

/// Turret heading and cannon bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TurretState {
    /// Current turret heading relative to the hull, radians in `[0, TAU)`.
    pub current: f64,
    /// Heading the control program asked for, radians.
    pub desired: f64,
    /// Whether the cannon fires this turn.
    pub firing: bool,
    /// Turns left before the cannon may fire again.
    pub recharge: u32,
}

/// Teleporter bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportState {
    /// Whether the tank teleports this turn.
    pub teleporting: bool,
    /// Turns left before the teleporter may be used again.
    pub recharge: u32,
}

/// A sensor arc mounted on the hull or the turret.
///
/// `angle` and `width` are stored in radians. A sensor with zero range is a
/// placeholder slot and always reads zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    /// Reach of the sensor.
    pub range: f64,
    /// Centre of the arc relative to the hull (or turret), radians.
    pub angle: f64,
    /// Full width of the arc, radians.
    pub width: f64,
    /// Whether the arc rotates with the turret.
    pub turret: bool,
    /// Kinds of objects currently inside the arc.
    pub triggered: ObjectKind,
}

impl SensorDescriptor {
    /// Builds a sensor from angles given in degrees.
    ///
    /// # Example
    ///
    /// ```
    /// use lptanks_core::entity::SensorDescriptor;
    ///
    /// let sensor = SensorDescriptor::from_degrees(50.0, 0.0, 90.0, false);
    /// assert!((sensor.width - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    /// assert_eq!(sensor.reading(), 0);
    /// ```
    #[must_use]
    pub fn from_degrees(range: f64, angle: f64, width: f64, turret: bool) -> Self {
        Self {
            range,
            angle: deg_to_rad(angle),
            width: deg_to_rad(width),
            turret,
            triggered: ObjectKind::empty(),
        }
    }

    /// Returns true if this slot holds a real sensor.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.range != 0.0
    }

    /// The value published to the control program.
    #[must_use]
    pub fn reading(&self) -> u8 {
        if self.is_present() {
            self.triggered.bits()
        } else {
            0
        }
    }
}

/// Per-turn debug snapshot of a tank, taken before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugVars {
    /// Current left track speed.
    pub speed_left: i32,
    /// Current right track speed.
    pub speed_right: i32,
    /// Requested left track speed.
    pub speed_desired_left: i32,
    /// Requested right track speed.
    pub speed_desired_right: i32,
    /// Raw `triggered` bits of every sensor, in slot order.
    pub sensors: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_straight_when_tracks_match() {
        let drive = DriveState {
            current: [40, 40],
            desired: [0, 100],
        };
        assert!(drive.is_straight());
    }

    #[test]
    fn empty_sensor_reads_zero_even_when_triggered() {
        let mut sensor = SensorDescriptor::from_degrees(0.0, 0.0, 10.0, false);
        sensor.triggered = ObjectKind::TANK;
        assert!(!sensor.is_present());
        assert_eq!(sensor.reading(), 0);
    }

    #[test]
    fn present_sensor_reads_triggered_bits() {
        let mut sensor = SensorDescriptor::from_degrees(50.0, 0.0, 10.0, true);
        sensor.triggered = ObjectKind::TANK | ObjectKind::PILLAR;
        assert_eq!(sensor.reading(), 3);
    }

    #[test]
    fn components_are_serializable() {
        let turret = TurretState {
            current: 1.0,
            desired: 2.0,
            firing: true,
            recharge: 1,
        };
        let json = serde_json::to_string(&turret).unwrap();
        let back: TurretState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turret);
    }
}
