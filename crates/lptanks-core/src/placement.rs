//! Initial board setup by rejection sampling.
//!
//! Tanks are placed in roster order. For each tank the packer draws integer
//! positions uniformly over the field until one keeps the required distance
//! from every circle placed so far:
//!
//! ```text
//! dist(p, c) > r_new + r_c + spacing(kind_new, kind_c)
//! ```
//!
//! On success the tank gets the position and a uniform random heading. The
//! random stream is consumed as `x, y` per attempt plus one heading per
//! placed tank, so a seed fully determines the board.
//!
//! Spacing is checked with plain (non-wrapping) distance.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ArenaConfig, ObjectKind};
use crate::entity::{Tank, TankId};
use crate::error::PlacementError;

/// A circle already on the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Centre.
    pub center: DVec2,
    /// Radius.
    pub radius: f64,
    /// What occupies the circle, for the spacing lookup.
    pub kind: ObjectKind,
}

/// Rejection-sampling circle packer.
///
/// # Example
///
/// ```
/// use lptanks_core::config::{ArenaConfig, ObjectKind};
/// use lptanks_core::placement::CirclePacker;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let config = ArenaConfig::default();
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let mut packer = CirclePacker::new();
///
/// let a = packer.place(7.5, ObjectKind::TANK, &config, &mut rng).unwrap();
/// let b = packer.place(7.5, ObjectKind::TANK, &config, &mut rng).unwrap();
/// assert!(a.distance(b) > 65.0);
/// assert_eq!(packer.circles().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CirclePacker {
    circles: Vec<Circle>,
}

impl CirclePacker {
    /// Creates an empty packer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Circles placed so far, in placement order.
    #[must_use]
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Returns true if a circle at `center` would keep its spacing from
    /// every placed circle.
    #[must_use]
    pub fn fits(&self, center: DVec2, radius: f64, kind: ObjectKind, config: &ArenaConfig) -> bool {
        self.circles.iter().all(|circle| {
            let min = circle.radius + radius + config.spacing.get(kind, circle.kind);
            center.distance_squared(circle.center) > min * min
        })
    }

    /// Draws positions until one fits, records the circle and returns its
    /// centre.
    ///
    /// Returns `None` once `config.max_placement_attempts` draws have failed.
    pub fn place<R: Rng + ?Sized>(
        &mut self,
        radius: f64,
        kind: ObjectKind,
        config: &ArenaConfig,
        rng: &mut R,
    ) -> Option<DVec2> {
        for _ in 0..config.max_placement_attempts {
            let center = random_position(rng, config);
            if self.fits(center, radius, kind, config) {
                self.circles.push(Circle {
                    center,
                    radius,
                    kind,
                });
                return Some(center);
            }
        }
        None
    }
}

/// Draws a uniform integer position on the field: `x` first, then `y`.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, config: &ArenaConfig) -> DVec2 {
    let x = (rng.gen::<f64>() * config.width).floor();
    let y = (rng.gen::<f64>() * config.height).floor();
    DVec2::new(x, y)
}

/// Places every tank of the roster and gives each a random heading.
///
/// # Errors
///
/// Returns [`PlacementError::Exhausted`] for the first tank that could not
/// be placed. Tanks before it keep their new positions.
pub fn place_tanks<R: Rng + ?Sized>(
    tanks: &mut [Tank],
    config: &ArenaConfig,
    rng: &mut R,
) -> Result<(), PlacementError> {
    let mut packer = CirclePacker::new();
    for tank in tanks.iter_mut() {
        let center = packer
            .place(tank.radius(), tank.kind(), config, rng)
            .ok_or_else(|| exhausted(tank.id(), config))?;
        tank.position = center;
        tank.next_position = center;
        tank.angle = rng.gen::<f64>() * TAU;
    }
    Ok(())
}

fn exhausted(tank: TankId, config: &ArenaConfig) -> PlacementError {
    PlacementError::Exhausted {
        tank,
        attempts: config.max_placement_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpacingTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster(count: u64, config: &ArenaConfig) -> Vec<Tank> {
        (1..=count)
            .map(|id| Tank::new(TankId::new(id), "#000000".into(), Vec::new(), config))
            .collect()
    }

    #[test]
    fn placed_tanks_respect_spacing() {
        let config = ArenaConfig::default();
        let mut tanks = roster(8, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        place_tanks(&mut tanks, &config, &mut rng).unwrap();

        for (i, a) in tanks.iter().enumerate() {
            for b in &tanks[i + 1..] {
                assert!(a.position.distance(b.position) > 65.0);
            }
        }
    }

    #[test]
    fn positions_are_integral_and_on_field() {
        let config = ArenaConfig::default();
        let mut tanks = roster(6, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        place_tanks(&mut tanks, &config, &mut rng).unwrap();

        for t in &tanks {
            assert_eq!(t.position.x.fract(), 0.0);
            assert_eq!(t.position.y.fract(), 0.0);
            assert!(t.position.x >= 0.0 && t.position.x < 400.0);
            assert!((0.0..TAU).contains(&t.angle));
            assert_eq!(t.next_position, t.position);
        }
    }

    #[test]
    fn same_seed_same_board() {
        let config = ArenaConfig::default();
        let mut first = roster(5, &config);
        let mut second = roster(5, &config);
        place_tanks(&mut first, &config, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        place_tanks(&mut second, &config, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn infeasible_spacing_is_reported() {
        let config = ArenaConfig {
            width: 20.0,
            height: 20.0,
            max_placement_attempts: 500,
            ..ArenaConfig::default()
        };
        let mut tanks = roster(2, &config);
        let err = place_tanks(&mut tanks, &config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Exhausted {
                tank: TankId::new(2),
                attempts: 500
            }
        );
    }

    #[test]
    fn zero_spacing_still_separates_hulls() {
        let config = ArenaConfig {
            spacing: SpacingTable::uniform(0.0),
            ..ArenaConfig::default()
        };
        let packer = {
            let mut packer = CirclePacker::new();
            packer.circles.push(Circle {
                center: DVec2::new(100.0, 100.0),
                radius: 7.5,
                kind: ObjectKind::TANK,
            });
            packer
        };
        assert!(!packer.fits(DVec2::new(115.0, 100.0), 7.5, ObjectKind::TANK, &config));
        assert!(packer.fits(DVec2::new(116.0, 100.0), 7.5, ObjectKind::TANK, &config));
    }

    #[test]
    fn spacing_lookup_uses_both_kinds() {
        let config = ArenaConfig::default();
        let mut packer = CirclePacker::new();
        packer.circles.push(Circle {
            center: DVec2::new(100.0, 100.0),
            radius: 10.0,
            kind: ObjectKind::PILLAR,
        });
        // tank-pillar spacing is 10: minimum distance 27.5
        assert!(!packer.fits(DVec2::new(127.0, 100.0), 7.5, ObjectKind::TANK, &config));
        assert!(packer.fits(DVec2::new(128.0, 100.0), 7.5, ObjectKind::TANK, &config));
    }
}
