//! Recharge bookkeeping and movement commit.
//!
//! Runs after combat and movement. For each living tank, in order:
//! - Nonzero cannon and teleport timers tick down by one
//! - A tank that fired clears its intent and restarts the cannon timer
//! - A tank that teleported clears its intent and restarts the teleport timer
//! - The staged position becomes the position

use crate::config::ArenaConfig;
use crate::entity::Tank;

use super::{Phase, Resolver};

/// Resolver for timers and the movement commit.
#[derive(Debug, Clone, Default)]
pub struct RechargeResolver;

impl RechargeResolver {
    /// Creates a new recharge resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Updates one tank's timers and commits its staged position.
    pub fn commit(tank: &mut Tank, config: &ArenaConfig) {
        tank.turret.recharge = tank.turret.recharge.saturating_sub(1);
        tank.teleport.recharge = tank.teleport.recharge.saturating_sub(1);

        if tank.turret.firing {
            tank.turret.firing = false;
            tank.turret.recharge = config.cannon_recharge;
        }
        if tank.teleport.teleporting {
            tank.teleport.teleporting = false;
            tank.teleport.recharge = config.teleport_recharge;
        }

        tank.position = tank.next_position;
    }
}

impl Resolver for RechargeResolver {
    fn phase(&self) -> Phase {
        Phase::Commit
    }

    fn resolve(&self, tanks: &mut [Tank], config: &ArenaConfig) {
        for tank in tanks.iter_mut().filter(|t| t.is_alive()) {
            Self::commit(tank, config);
        }
    }
}
