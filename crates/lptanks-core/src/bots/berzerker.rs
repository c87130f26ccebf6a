//! A tank that loops at random and fires at random.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use crate::output::StateMap;
use crate::runtime::ControlProgram;

/// Each turn: pick one of two looping speed pairs, re-aim the turret one
/// turn in four, and fire one turn in thirty.
#[derive(Debug, Clone)]
pub struct Berzerker {
    rng: ChaCha8Rng,
}

impl Berzerker {
    /// Creates a berzerker whose choices replay for a given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ControlProgram for Berzerker {
    fn name(&self) -> &str {
        "Berzerker"
    }

    fn run(&mut self, _state: &StateMap) -> StateMap {
        let mut action = StateMap::new();

        let (left, right) = if self.rng.gen_range(0..2) == 0 {
            (50, 100)
        } else {
            (100, 50)
        };
        action.insert("set_speed_left".into(), json!(left));
        action.insert("set_speed_right".into(), json!(right));

        if self.rng.gen_range(0..4) == 0 {
            action.insert("set_turret".into(), json!(self.rng.gen_range(0..360)));
        }
        if self.rng.gen_range(0..30) == 0 {
            action.insert("fire".into(), json!(1));
        }
        action
    }
}
