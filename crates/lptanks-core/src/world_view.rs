//! `TankView` is the read-only state a control program sees each turn.
//!
//! The view is rebuilt from scratch every turn. It carries the program's own
//! memory plus values the engine derives:
//!
//! - `sensor_N`: the reading of sensor slot `N` (0 for empty slots)
//! - `fire_ready`: 1 iff the tank has ammo (or unlimited ammo) and the cannon
//!   is recharged
//! - `teleport_ready`: only when teleport is enabled, 1 iff recharged
//! - `turret_angle`: current turret heading, radians
//!
//! Action keys are write-only and never appear in a view.
//!
//! # Example
//!
//! ```
//! use lptanks_core::config::ArenaConfig;
//! use lptanks_core::entity::{SensorDescriptor, Tank, TankId};
//! use lptanks_core::world_view::TankView;
//!
//! let config = ArenaConfig::default();
//! let tank = Tank::new(
//!     TankId::new(1),
//!     "#000000".into(),
//!     vec![SensorDescriptor::from_degrees(50.0, 0.0, 7.0, true)],
//!     &config,
//! );
//!
//! let state = TankView::project(&tank, &config).to_state_map();
//! assert_eq!(state["sensor_0"], 0);
//! assert_eq!(state["fire_ready"], 1);
//! assert!(!state.contains_key("teleport_ready"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ArenaConfig;
use crate::entity::Tank;
use crate::output::{StateMap, ACTION_KEYS};

/// Projection of one tank for its control program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankView {
    /// Published reading per sensor slot.
    pub sensors: Vec<u8>,
    /// Whether a `fire` action would be honoured.
    pub fire_ready: bool,
    /// Whether a `teleport` action would be honoured; `None` when disabled.
    pub teleport_ready: Option<bool>,
    /// Current turret heading, radians.
    pub turret_angle: f64,
    /// Values the program stored on previous turns.
    pub memory: StateMap,
}

impl TankView {
    /// Builds the projection of `tank`.
    #[must_use]
    pub fn project(tank: &Tank, config: &ArenaConfig) -> Self {
        Self {
            sensors: tank.sensors.iter().map(|s| s.reading()).collect(),
            fire_ready: tank.can_fire(),
            teleport_ready: config.teleport_enabled.then(|| tank.teleport_ready()),
            turret_angle: tank.turret.current,
            memory: tank.memory().clone(),
        }
    }

    /// Flattens the view into the map handed to a control program.
    ///
    /// Memory comes first; derived keys overwrite it, and action keys are
    /// stripped.
    #[must_use]
    pub fn to_state_map(&self) -> StateMap {
        let mut state = self.memory.clone();
        for (index, reading) in self.sensors.iter().enumerate() {
            state.insert(format!("sensor_{index}"), Value::from(*reading));
        }
        for key in ACTION_KEYS {
            state.remove(key);
        }
        state.insert("fire_ready".into(), Value::from(u8::from(self.fire_ready)));
        if let Some(ready) = self.teleport_ready {
            state.insert("teleport_ready".into(), Value::from(u8::from(ready)));
        }
        state.insert("turret_angle".into(), Value::from(self.turret_angle));
        state
    }
}
