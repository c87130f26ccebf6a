//! A turret-sweeping tank with one gun sensor and one proximity sensor.

use serde_json::{json, Value};

use crate::geometry::rad_to_deg;
use crate::output::StateMap;
use crate::runtime::ControlProgram;

/// Turret rotation requested every turn, degrees.
const SWEEP_DEGREES: f64 = 12.0;

/// Cruises at fixed track speeds while sweeping the turret.
///
/// Sensor 0 looks down the barrel; when it sees something the tank fires.
/// Sensor 1 watches a wide arc ahead of the hull; when it trips the tank
/// turns in place.
#[derive(Debug, Clone)]
pub struct Tweedledum {
    name: &'static str,
    cruise: [i32; 2],
}

impl Tweedledum {
    /// The classic variant, cruising at `(60, 50)`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cruise("Tweedledum", [60, 50])
    }

    /// A variant with its own name and cruise speeds.
    #[must_use]
    pub fn with_cruise(name: &'static str, cruise: [i32; 2]) -> Self {
        Self { name, cruise }
    }
}

impl Default for Tweedledum {
    fn default() -> Self {
        Self::new()
    }
}

fn sees(state: &StateMap, sensor: usize) -> bool {
    state
        .get(&format!("sensor_{sensor}"))
        .and_then(Value::as_u64)
        .is_some_and(|reading| reading != 0)
}

impl ControlProgram for Tweedledum {
    fn name(&self) -> &str {
        self.name
    }

    fn options(&self) -> Value {
        json!({
            "sensors": [
                { "range": 50, "angle": 0, "width": 7, "turret": 1 },
                { "range": 50, "angle": 0, "width": 90, "turret": 0 }
            ]
        })
    }

    fn run(&mut self, state: &StateMap) -> StateMap {
        let turret = state
            .get("turret_angle")
            .and_then(Value::as_f64)
            .map_or(0.0, rad_to_deg);

        let mut action = StateMap::new();
        action.insert("set_turret".into(), json!(turret + SWEEP_DEGREES));

        let [mut left, mut right] = self.cruise;
        if sees(state, 1) {
            (left, right) = (-50, 50);
        }
        action.insert("set_speed_left".into(), json!(left));
        action.insert("set_speed_right".into(), json!(right));

        if sees(state, 0) {
            action.insert("fire".into(), json!(1));
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::entity::TankOptions;
    use std::f64::consts::FRAC_PI_2;

    fn state(turret: f64, sensor_0: u8, sensor_1: u8) -> StateMap {
        let mut state = StateMap::new();
        state.insert("turret_angle".into(), json!(turret));
        state.insert("sensor_0".into(), json!(sensor_0));
        state.insert("sensor_1".into(), json!(sensor_1));
        state
    }

    #[test]
    fn sweeps_turret_twelve_degrees() {
        let action = Tweedledum::new().run(&state(FRAC_PI_2, 0, 0));
        let degrees = action["set_turret"].as_f64().unwrap();
        assert!((degrees - 102.0).abs() < 1e-9);
        assert!(!action.contains_key("fire"));
        assert_eq!(action["set_speed_left"], json!(60));
    }

    #[test]
    fn fires_when_gun_sensor_trips() {
        let action = Tweedledum::new().run(&state(0.0, 1, 0));
        assert_eq!(action["fire"], json!(1));
    }

    #[test]
    fn spins_when_proximity_sensor_trips() {
        let action = Tweedledum::new().run(&state(0.0, 0, 1));
        assert_eq!(action["set_speed_left"], json!(-50));
        assert_eq!(action["set_speed_right"], json!(50));
    }

    #[test]
    fn options_are_valid() {
        let (options, errors) =
            TankOptions::from_value(&Tweedledum::new().options(), &ArenaConfig::default()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(options.sensors.len(), 2);
        assert!(options.sensors[0].turret);
        assert!(!options.sensors[1].turret);
    }
}
