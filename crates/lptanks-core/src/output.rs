//! Inbound actions from control programs.
//!
//! A control program answers each turn with a free-form [`StateMap`]. This
//! module turns that map into a typed [`Action`] at the boundary, collecting
//! a [`ValidationError`] for every key it rejects, and applies the action to
//! a tank.
//!
//! # Accepted keys
//!
//! | key               | meaning                                         |
//! |-------------------|-------------------------------------------------|
//! | `fire`            | fire this turn if the cannon is ready           |
//! | `set_speed_left`  | desired left track speed, integer in [-100,100] |
//! | `set_speed_right` | desired right track speed, integer in [-100,100]|
//! | `set_turret`      | absolute desired turret heading, degrees        |
//! | `led`             | opaque integer passthrough                      |
//! | `teleport`        | teleport this turn (when enabled and ready)     |
//!
//! Any other key that is not reserved by the projection is kept as program
//! memory and echoed back next turn.
//!
//! # Example
//!
//! ```
//! use lptanks_core::output::{Action, StateMap};
//! use serde_json::json;
//!
//! let mut map = StateMap::new();
//! map.insert("set_speed_left".into(), json!(101));
//! map.insert("set_speed_right".into(), json!(-100));
//!
//! let parsed = Action::from_state_map(&map);
//! assert_eq!(parsed.action.set_speed_left, None);
//! assert_eq!(parsed.action.set_speed_right, Some(-100));
//! assert_eq!(parsed.errors.len(), 1);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ArenaConfig;
use crate::entity::Tank;
use crate::error::ValidationError;
use crate::geometry::{deg_to_rad, normalize_angle};

/// Free-form key/value map exchanged with control programs.
pub type StateMap = BTreeMap<String, Value>;

/// Write-only keys. They are never echoed back in a projection.
pub const ACTION_KEYS: [&str; 6] = [
    "fire",
    "set_speed_left",
    "set_speed_right",
    "set_turret",
    "led",
    "teleport",
];

/// Track speed bounds, percent of top speed.
pub const SPEED_RANGE: std::ops::RangeInclusive<i64> = -100..=100;

/// Typed intent for one turn.
///
/// `None` fields leave the tank's persistent state unchanged. `fire` and
/// `teleport` are per-turn intents and default to false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Fire the cannon this turn.
    pub fire: bool,
    /// New desired left track speed.
    pub set_speed_left: Option<i32>,
    /// New desired right track speed.
    pub set_speed_right: Option<i32>,
    /// New desired turret heading, degrees.
    pub set_turret: Option<f64>,
    /// New LED value.
    pub led: Option<i64>,
    /// Teleport this turn.
    pub teleport: bool,
    /// Keys the program wants to keep until next turn.
    pub memory: StateMap,
}

/// Result of parsing a [`StateMap`]: the accepted action and every rejection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAction {
    /// Action built from the keys that validated.
    pub action: Action,
    /// One entry per rejected key.
    pub errors: Vec<ValidationError>,
}

impl Action {
    /// Parses a control program's answer.
    ///
    /// `null` values count as absent. Keys reserved by the projection
    /// (`sensor_N`, `fire_ready`, `teleport_ready`, `turret_angle`) are
    /// ignored.
    #[must_use]
    pub fn from_state_map(map: &StateMap) -> ParsedAction {
        let mut errors = Vec::new();
        let get = |key: &str| map.get(key).filter(|v| !v.is_null());

        let fire = get("fire").is_some_and(is_truthy_one);
        let teleport = get("teleport").is_some_and(is_truthy_one);

        let mut speed = |key: &'static str| -> Option<i32> {
            let value = get(key)?;
            let Some(speed) = as_integer(value) else {
                errors.push(ValidationError::NotANumber { key });
                return None;
            };
            if SPEED_RANGE.contains(&speed) {
                i32::try_from(speed).ok()
            } else {
                errors.push(ValidationError::SpeedOutOfRange { key, value: speed });
                None
            }
        };
        let set_speed_left = speed("set_speed_left");
        let set_speed_right = speed("set_speed_right");

        let set_turret = get("set_turret").and_then(|value| {
            let degrees = as_float(value);
            if degrees.is_none() {
                errors.push(ValidationError::NotANumber { key: "set_turret" });
            }
            degrees
        });

        let led = get("led").and_then(|value| {
            let led = as_integer(value);
            if led.is_none() {
                errors.push(ValidationError::NotANumber { key: "led" });
            }
            led
        });

        let memory = map
            .iter()
            .filter(|(key, _)| !ACTION_KEYS.contains(&key.as_str()) && !is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        ParsedAction {
            action: Self {
                fire,
                set_speed_left,
                set_speed_right,
                set_turret,
                led,
                teleport,
                memory,
            },
            errors,
        }
    }

    /// Applies this action to a tank's intent state.
    ///
    /// Firing only happens when the cannon is ready and spends one round of
    /// finite ammo. Teleporting requires the teleporter to be enabled and
    /// recharged.
    pub fn apply_to(&self, tank: &mut Tank, config: &ArenaConfig) {
        if self.fire && tank.can_fire() {
            if tank.ammo > 0 {
                tank.ammo -= 1;
            }
            tank.turret.firing = true;
        } else {
            tank.turret.firing = false;
        }

        if let Some(speed) = self.set_speed_left {
            tank.drive.desired[0] = speed;
        }
        if let Some(speed) = self.set_speed_right {
            tank.drive.desired[1] = speed;
        }
        if let Some(degrees) = self.set_turret {
            // huge finite degrees overflow to inf radians unless folded first
            tank.turret.desired = normalize_angle(deg_to_rad(degrees.rem_euclid(360.0)));
        }
        if let Some(led) = self.led {
            tank.led = led;
        }

        tank.teleport.teleporting =
            config.teleport_enabled && self.teleport && tank.teleport_ready();

        if !self.memory.is_empty() {
            let memory = tank.memory_mut();
            for (key, value) in &self.memory {
                memory.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Keys the projection writes itself.
pub(crate) fn is_reserved_key(key: &str) -> bool {
    matches!(key, "fire_ready" | "teleport_ready" | "turret_angle")
        || key
            .strip_prefix("sensor_")
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn is_truthy_one(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    let float = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    float.filter(|f| f.is_finite())
}
