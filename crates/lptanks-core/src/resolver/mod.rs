//! Resolvers run the per-turn resolution phases over the roster.
//!
//! A turn is resolved in three phases, always in this order:
//!
//! 1. [`Phase::Combat`]: pairwise collision and fire resolution on
//!    pre-movement positions
//! 2. [`Phase::Movement`]: turret rotation, track easing, staged position
//! 3. [`Phase::Commit`]: recharge bookkeeping and movement commit
//!
//! Splitting combat from commit means a shot or crash always reflects where
//! the tanks stood when their programs made this turn's decisions.
//!
//! # Invariants
//!
//! - Resolvers MUST iterate the roster in order; roster order is the tie-break
//! - Resolvers MUST skip tanks that already have a killer
//! - Resolvers MUST NOT consume randomness
//!
//! # Available Resolvers
//!
//! - [`CombatResolver`]: collisions and cannon hits
//! - [`PhysicsResolver`]: differential-drive kinematics and turret rate limit
//! - [`RechargeResolver`]: recharge timers and movement commit

mod combat;
mod physics;
mod recharge;

pub use combat::{CombatResolver, Kill};
pub use physics::PhysicsResolver;
pub use recharge::RechargeResolver;

use crate::config::ArenaConfig;
use crate::entity::Tank;

/// Resolution phase a resolver belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Collision and fire on pre-movement positions.
    Combat,
    /// Turret and drive updates, next position staged.
    Movement,
    /// Timers updated and staged positions committed.
    Commit,
}

/// A resolver mutates the roster for one phase of a turn.
///
/// # Example
///
/// ```
/// use lptanks_core::config::ArenaConfig;
/// use lptanks_core::entity::Tank;
/// use lptanks_core::resolver::{Phase, Resolver};
///
/// struct Idle;
///
/// impl Resolver for Idle {
///     fn phase(&self) -> Phase {
///         Phase::Commit
///     }
///
///     fn resolve(&self, _tanks: &mut [Tank], _config: &ArenaConfig) {}
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the phase this resolver runs in.
    fn phase(&self) -> Phase;

    /// Resolves this phase for every living tank, in roster order.
    fn resolve(&self, tanks: &mut [Tank], config: &ArenaConfig);
}

/// The resolvers of one turn, ordered by phase.
#[must_use]
pub fn default_resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(CombatResolver::new()),
        Box::new(PhysicsResolver::new()),
        Box::new(RechargeResolver::new()),
    ]
}
