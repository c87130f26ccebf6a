//! Test helper functions for setting up matches and tanks.
//!
//! This module provides factory functions and small collaborators (a
//! scripted runtime and a proximity sensor subsystem) that make writing
//! turn-level tests more ergonomic and consistent.

use std::collections::BTreeMap;

use glam::DVec2;
use serde_json::{json, Value};

use crate::config::{ArenaConfig, ObjectKind};
use crate::entity::{Tank, TankId};
use crate::geometry::toroidal_vector;
use crate::output::StateMap;
use crate::runtime::{CollectErrors, ControlRuntime, SensorSubsystem};
use crate::simulation::TanksGame;

/// Seed used by every helper that builds a match.
pub const TEST_SEED: u64 = 42;

// =============================================================================
// Match Setup
// =============================================================================

/// Creates a match with default rules and the given turn budget.
pub fn test_game(turns: u32) -> TanksGame {
    test_game_with(ArenaConfig {
        turns,
        ..ArenaConfig::default()
    })
}

/// Creates a match from a custom configuration.
pub fn test_game_with(config: ArenaConfig) -> TanksGame {
    TanksGame::new(config, TEST_SEED).expect("test config must be valid")
}

/// Registers a tank without options and puts it at `position` facing `angle`.
pub fn spawn_tank_at(game: &mut TanksGame, position: DVec2, angle: f64) -> TankId {
    spawn_tank_with(game, &Value::Null, position, angle)
}

/// Registers a tank from `options` and puts it at `position` facing `angle`.
pub fn spawn_tank_with(
    game: &mut TanksGame,
    options: &Value,
    position: DVec2,
    angle: f64,
) -> TankId {
    let id = game
        .create_tank(options, &mut CollectErrors::new())
        .expect("test options must be well formed");
    let tank = game.tank_mut(id).expect("tank was just registered");
    tank.position = position;
    tank.next_position = position;
    tank.angle = angle;
    id
}

/// Options for a tank with a single forward-looking hull sensor.
pub fn forward_sensor_options(range: f64) -> Value {
    json!({ "sensors": [{ "range": range, "angle": 0, "width": 90, "turret": false }] })
}

/// Builds an action map from JSON object literal pairs.
pub fn action(value: &Value) -> StateMap {
    value
        .as_object()
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

// =============================================================================
// Collaborators
// =============================================================================

/// Control runtime answering with a fixed action per tank.
///
/// Tanks without a script answer with an empty map. Every state map the
/// runtime is shown is recorded in `seen`.
#[derive(Debug, Default)]
pub struct Scripted {
    /// Fixed answers keyed by tank.
    pub answers: BTreeMap<TankId, StateMap>,
    /// Every projected state, in the order the tanks were asked.
    pub seen: Vec<(TankId, StateMap)>,
}

impl Scripted {
    /// Creates a runtime with no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer of `tank` for every following turn.
    pub fn script(&mut self, tank: TankId, answer: StateMap) -> &mut Self {
        self.answers.insert(tank, answer);
        self
    }
}

impl ControlRuntime for Scripted {
    fn get_action(&mut self, tank: &Tank, state: &StateMap) -> StateMap {
        self.seen.push((tank.id(), state.clone()));
        self.answers.get(&tank.id()).cloned().unwrap_or_default()
    }
}

/// Sensor subsystem that triggers every present sensor of a tank while any
/// other living tank is within that sensor's range.
///
/// Arc geometry is ignored; the real subsystem lives outside this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProximitySensors;

impl SensorSubsystem for ProximitySensors {
    fn refresh_sensors(&mut self, tanks: &mut [Tank], config: &ArenaConfig) {
        let alive: Vec<(TankId, DVec2)> = tanks
            .iter()
            .filter(|t| t.is_alive())
            .map(|t| (t.id(), t.position))
            .collect();
        for tank in tanks.iter_mut() {
            let origin = tank.position;
            let id = tank.id();
            for sensor in &mut tank.sensors {
                let seen = alive.iter().any(|&(other, position)| {
                    other != id
                        && toroidal_vector(origin, position, config.dims()).length()
                            <= sensor.range + config.tank_radius
                });
                sensor.triggered = if seen {
                    ObjectKind::TANK
                } else {
                    ObjectKind::empty()
                };
            }
        }
    }
}

// =============================================================================
// Inspection
// =============================================================================

/// Serializes the whole roster so two matches can be compared bit for bit.
pub fn roster_digest(game: &TanksGame) -> String {
    serde_json::to_string(game.tanks()).expect("roster serializes")
}

/// Installs a test-friendly tracing subscriber. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_tank_at_sets_pose() {
        let mut game = test_game(10);
        let id = spawn_tank_at(&mut game, DVec2::new(10.0, 20.0), 1.0);
        let tank = game.tank(id).unwrap();
        assert_eq!(tank.position, DVec2::new(10.0, 20.0));
        assert_eq!(tank.next_position, tank.position);
        assert!((tank.angle - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn proximity_sensors_see_wrapped_neighbours() {
        let mut game = test_game(10);
        let a = spawn_tank_with(
            &mut game,
            &forward_sensor_options(50.0),
            DVec2::new(5.0, 200.0),
            0.0,
        );
        spawn_tank_at(&mut game, DVec2::new(390.0, 200.0), 0.0);

        let config = game.config().clone();
        ProximitySensors.refresh_sensors(game.arena_mut().tanks_mut(), &config);
        assert_eq!(game.tank(a).unwrap().sensors[0].reading(), 1);
    }

    #[test]
    fn scripted_runtime_records_what_it_saw() {
        let mut game = test_game(10);
        let a = spawn_tank_at(&mut game, DVec2::new(100.0, 100.0), 0.0);
        let mut runtime = Scripted::new();
        runtime.script(a, action(&json!({ "set_speed_left": 10 })));

        let tank = game.tank(a).unwrap().clone();
        let answer = runtime.get_action(&tank, &StateMap::new());
        assert_eq!(answer["set_speed_left"], json!(10));
        assert_eq!(runtime.seen.len(), 1);
    }
}
