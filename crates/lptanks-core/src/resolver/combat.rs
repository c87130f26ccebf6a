//! Combat resolver for collisions and cannon fire.
//!
//! The `CombatResolver` visits every unordered pair of living tanks once per
//! turn, in roster order (`i < j`). For each pair:
//!
//! 1. Overlapping hulls kill both tanks with cause `collision`, each credited
//!    to the other. A collision pre-empts fire for that pair.
//! 2. Otherwise, if the pair is within cannon reach, fire is checked from
//!    `i` toward `j`, then from `j` toward `i` with the negated vector.
//!
//! A tank that already has a killer takes no further part in the turn: it
//! cannot be killed again and cannot fire back.
//!
//! # Hit test
//!
//! The separation vector is rotated into the shooter's turret frame. The
//! shot hits when the target centre lies ahead of the turret and within one
//! hull radius of the firing line: a rectangular beam, not a cone.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ArenaConfig;
use crate::entity::{CauseOfDeath, Tank, TankId};
use crate::geometry::{rotate_point, toroidal_vector};

use super::{Phase, Resolver};

/// One recorded kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kill {
    /// The destroyed tank.
    pub victim: TankId,
    /// The tank credited with the kill.
    pub killer: TankId,
    /// How the victim died.
    pub cause: CauseOfDeath,
}

/// Resolver for pairwise collision and fire.
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use lptanks_core::config::ArenaConfig;
/// use lptanks_core::entity::{CauseOfDeath, Tank, TankId};
/// use lptanks_core::resolver::CombatResolver;
///
/// let config = ArenaConfig::default();
/// let mut a = Tank::new(TankId::new(1), "#ffffff".into(), Vec::new(), &config);
/// let mut b = Tank::new(TankId::new(2), "#ffffff".into(), Vec::new(), &config);
/// a.position = DVec2::new(100.0, 100.0);
/// b.position = DVec2::new(105.0, 100.0);
///
/// let mut roster = vec![a, b];
/// let kills = CombatResolver::new().resolve_pairs(&mut roster, &config);
/// assert_eq!(kills.len(), 2);
/// assert_eq!(roster[0].cause_of_death(), Some(CauseOfDeath::Collision));
/// assert_eq!(roster[1].killer(), Some(TankId::new(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Runs the pairwise pass and returns the kills in the order they
    /// happened.
    pub fn resolve_pairs(&self, tanks: &mut [Tank], config: &ArenaConfig) -> Vec<Kill> {
        let dims = config.dims();
        let mut kills = Vec::new();

        for i in 0..tanks.len() {
            for j in (i + 1)..tanks.len() {
                let (head, tail) = tanks.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if !a.is_alive() {
                    break;
                }
                if !b.is_alive() {
                    continue;
                }

                let vector = toroidal_vector(a.position, b.position, dims);
                let dist_sq = vector.length_squared();
                kills.extend(fire_and_collision(a, b, dist_sq, vector, config));
                kills.extend(fire_and_collision(b, a, dist_sq, -vector, config));
            }
        }

        for kill in &kills {
            debug!(
                victim = %kill.victim,
                killer = %kill.killer,
                cause = %kill.cause,
                "tank destroyed"
            );
        }
        kills
    }
}

impl Resolver for CombatResolver {
    fn phase(&self) -> Phase {
        Phase::Combat
    }

    fn resolve(&self, tanks: &mut [Tank], config: &ArenaConfig) {
        self.resolve_pairs(tanks, config);
    }
}

/// Resolves one direction of a pair: collision, then `shooter` firing at
/// `target`. `vector` points from the shooter to the target.
fn fire_and_collision(
    shooter: &mut Tank,
    target: &mut Tank,
    dist_sq: f64,
    vector: DVec2,
    config: &ArenaConfig,
) -> Vec<Kill> {
    if !shooter.is_alive() || !target.is_alive() {
        return Vec::new();
    }

    let contact = shooter.radius() + target.radius();
    if dist_sq < contact * contact {
        shooter.mark_killed(target.id(), CauseOfDeath::Collision);
        target.mark_killed(shooter.id(), CauseOfDeath::Collision);
        return vec![
            Kill {
                victim: shooter.id(),
                killer: target.id(),
                cause: CauseOfDeath::Collision,
            },
            Kill {
                victim: target.id(),
                killer: shooter.id(),
                cause: CauseOfDeath::Collision,
            },
        ];
    }

    if dist_sq > config.cannon_reach_sq() || !shooter.turret.firing {
        return Vec::new();
    }

    let theta = shooter.angle + shooter.turret.current;
    let local = rotate_point(-theta, vector);
    if local.x > 0.0 && local.y.abs() < shooter.radius() {
        target.mark_killed(shooter.id(), CauseOfDeath::Shot);
        return vec![Kill {
            victim: target.id(),
            killer: shooter.id(),
            cause: CauseOfDeath::Shot,
        }];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn tank_at(id: u64, x: f64, y: f64) -> Tank {
        let mut t = Tank::new(
            TankId::new(id),
            "#000000".into(),
            Vec::new(),
            &ArenaConfig::default(),
        );
        t.position = DVec2::new(x, y);
        t
    }

    fn resolve(roster: &mut [Tank]) -> Vec<Kill> {
        CombatResolver::new().resolve_pairs(roster, &ArenaConfig::default())
    }

    mod collision_tests {
        use super::*;

        #[test]
        fn coincident_tanks_both_die() {
            let mut roster = vec![tank_at(1, 50.0, 50.0), tank_at(2, 50.0, 50.0)];
            resolve(&mut roster);
            assert_eq!(roster[0].killer(), Some(TankId::new(2)));
            assert_eq!(roster[1].killer(), Some(TankId::new(1)));
            assert_eq!(roster[0].cause_of_death(), Some(CauseOfDeath::Collision));
            assert_eq!(roster[1].cause_of_death(), Some(CauseOfDeath::Collision));
        }

        #[test]
        fn touching_exactly_is_not_a_collision() {
            let mut roster = vec![tank_at(1, 50.0, 50.0), tank_at(2, 65.0, 50.0)];
            assert!(resolve(&mut roster).is_empty());
            assert!(roster.iter().all(Tank::is_alive));
        }

        #[test]
        fn collision_wins_over_fire() {
            let mut roster = vec![tank_at(1, 50.0, 50.0), tank_at(2, 55.0, 50.0)];
            roster[0].turret.firing = true;
            resolve(&mut roster);
            assert_eq!(roster[1].cause_of_death(), Some(CauseOfDeath::Collision));
        }

        #[test]
        fn collision_across_the_wrap() {
            let mut roster = vec![tank_at(1, 1.0, 200.0), tank_at(2, 396.0, 200.0)];
            resolve(&mut roster);
            assert!(!roster[0].is_alive());
            assert!(!roster[1].is_alive());
        }

        #[test]
        fn third_tank_cannot_be_credited_twice() {
            let mut roster = vec![
                tank_at(1, 50.0, 50.0),
                tank_at(2, 50.0, 50.0),
                tank_at(3, 50.0, 50.0),
            ];
            resolve(&mut roster);
            assert_eq!(roster[0].killer(), Some(TankId::new(2)));
            assert_eq!(roster[1].killer(), Some(TankId::new(1)));
            assert!(roster[2].is_alive());
        }
    }

    mod fire_tests {
        use super::*;

        #[test]
        fn shot_at_exact_range_boundary_hits() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 157.5, 100.0)];
            roster[0].turret.firing = true;
            let kills = resolve(&mut roster);
            assert_eq!(
                kills,
                vec![Kill {
                    victim: TankId::new(2),
                    killer: TankId::new(1),
                    cause: CauseOfDeath::Shot
                }]
            );
            assert!(roster[0].is_alive());
        }

        #[test]
        fn shot_beyond_range_misses() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 157.6, 100.0)];
            roster[0].turret.firing = true;
            assert!(resolve(&mut roster).is_empty());
        }

        #[test]
        fn not_firing_never_kills() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 120.0, 100.0)];
            assert!(resolve(&mut roster).is_empty());
        }

        #[test]
        fn turret_and_hull_headings_combine() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 100.0, 130.0)];
            roster[0].angle = FRAC_PI_2 / 2.0;
            roster[0].turret.current = FRAC_PI_2 / 2.0;
            roster[0].turret.firing = true;
            resolve(&mut roster);
            assert_eq!(roster[1].cause_of_death(), Some(CauseOfDeath::Shot));
        }

        #[test]
        fn target_behind_the_turret_is_safe() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 130.0, 100.0)];
            roster[0].angle = PI;
            roster[0].turret.firing = true;
            assert!(resolve(&mut roster).is_empty());
        }

        #[test]
        fn beam_width_is_the_shooter_radius() {
            let mut grazed = vec![tank_at(1, 100.0, 100.0), tank_at(2, 130.0, 107.4)];
            grazed[0].turret.firing = true;
            assert_eq!(resolve(&mut grazed).len(), 1);

            let mut missed = vec![tank_at(1, 100.0, 100.0), tank_at(2, 130.0, 107.6)];
            missed[0].turret.firing = true;
            assert!(resolve(&mut missed).is_empty());
        }

        #[test]
        fn later_tank_fires_with_negated_vector() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 130.0, 100.0)];
            roster[1].angle = PI;
            roster[1].turret.firing = true;
            resolve(&mut roster);
            assert_eq!(roster[0].killer(), Some(TankId::new(2)));
            assert!(roster[1].is_alive());
        }

        #[test]
        fn first_shooter_in_roster_order_wins_a_duel() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 130.0, 100.0)];
            roster[0].turret.firing = true;
            roster[1].angle = PI;
            roster[1].turret.firing = true;
            resolve(&mut roster);
            assert!(roster[0].is_alive());
            assert_eq!(roster[1].killer(), Some(TankId::new(1)));
        }

        #[test]
        fn dead_tanks_are_skipped() {
            let mut roster = vec![tank_at(1, 100.0, 100.0), tank_at(2, 130.0, 100.0)];
            roster[0].turret.firing = true;
            roster[1].mark_killed(TankId::new(9), CauseOfDeath::Shot);
            assert!(resolve(&mut roster).is_empty());
            assert_eq!(roster[1].killer(), Some(TankId::new(9)));
        }
    }

    #[test]
    fn phase_is_combat() {
        assert_eq!(CombatResolver::new().phase(), Phase::Combat);
    }
}
