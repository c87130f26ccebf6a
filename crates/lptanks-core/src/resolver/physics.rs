//! Physics resolver for the turret and the differential drive.
//!
//! The `PhysicsResolver` handles, per living tank:
//! - Turret rotation toward the desired heading, rate limited
//! - Track speed easing toward the desired speeds, acceleration limited
//! - Staging the next position from the current track speeds
//!
//! # Movement model
//!
//! Equal track speeds drive straight: the tank covers
//! `speed * top_speed / 100` along its heading. Unequal speeds drive an arc.
//! Both tracks lose a friction penalty proportional to `|left - right| / 200`;
//! the faster track (by magnitude) is the outer one, and the tank sweeps the
//! angle `outer / radius` around a turning circle whose radius is derived
//! from the two track velocities and the hull width.
//!
//! The straight branch must stay separate: with equal speeds the turning
//! radius divides by zero.

use glam::DVec2;

use crate::config::ArenaConfig;
use crate::entity::{DriveState, Tank};
use crate::geometry::{normalize_angle, shortest_rotation, wrap_position};

use super::{Phase, Resolver};

/// Resolver for turret and drive kinematics.
///
/// The computed position is staged in `next_position`; it becomes the
/// tank's position in the commit phase.
///
/// # Example
///
/// ```
/// use lptanks_core::config::ArenaConfig;
/// use lptanks_core::entity::{Tank, TankId};
/// use lptanks_core::resolver::PhysicsResolver;
///
/// let config = ArenaConfig::default();
/// let mut tank = Tank::new(TankId::new(1), "#ffffff".into(), Vec::new(), &config);
/// tank.drive.current = [100, 100];
/// tank.drive.desired = [100, 100];
///
/// PhysicsResolver::stage_movement(&mut tank, &config);
/// assert!((tank.next_position.x - 7.0).abs() < 1e-12);
/// assert_eq!(tank.position.x, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhysicsResolver;

impl PhysicsResolver {
    /// Creates a new physics resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Rotates the turret toward its desired heading along the shortest path,
    /// by at most `max_turret_rotation`.
    pub fn update_turret(tank: &mut Tank, config: &ArenaConfig) {
        let max = config.max_turret_rotation;
        let delta = shortest_rotation(tank.turret.current, tank.turret.desired).clamp(-max, max);
        tank.turret.current = normalize_angle(tank.turret.current + delta);
    }

    /// Moves each track speed toward its desired value by at most `max_accel`.
    pub fn ease_speeds(drive: &mut DriveState, max_accel: i32) {
        for (current, desired) in drive.current.iter_mut().zip(drive.desired) {
            *current = if *current < desired {
                current.saturating_add(max_accel).min(desired)
            } else {
                current.saturating_sub(max_accel).max(desired)
            };
        }
    }

    /// Eases the track speeds, updates the heading and stages the next
    /// position.
    pub fn stage_movement(tank: &mut Tank, config: &ArenaConfig) {
        Self::ease_speeds(&mut tank.drive, config.max_accel);

        let scale = config.top_speed / 100.0;
        let [left, right] = tank.drive.current;

        let (turn, movement, direction) = if tank.drive.is_straight() {
            (0.0, f64::from(left) * scale, 1.0)
        } else {
            let friction = config.friction * (f64::from((left - right).abs()) / 200.0);
            let v_left = f64::from(left) * (1.0 - friction) * scale;
            let v_right = f64::from(right) * (1.0 - friction) * scale;

            let (outer, inner, direction) = if v_left.abs() > v_right.abs() {
                (v_left, v_right, 1.0)
            } else {
                (v_right, v_left, -1.0)
            };

            // radius of the circle traced by the outer track
            let radius = outer * (tank.radius() * 2.0) / (outer - inner);
            let theta = outer / radius * direction;
            (theta, radius * theta.tan(), direction)
        };

        tank.angle = normalize_angle(tank.angle + turn);
        let displacement = DVec2::new(tank.angle.cos(), tank.angle.sin()) * movement * direction;
        tank.next_position = wrap_position(tank.position + displacement, config.dims());
    }
}

impl Resolver for PhysicsResolver {
    fn phase(&self) -> Phase {
        Phase::Movement
    }

    fn resolve(&self, tanks: &mut [Tank], config: &ArenaConfig) {
        for tank in tanks.iter_mut().filter(|t| t.is_alive()) {
            Self::update_turret(tank, config);
            Self::stage_movement(tank, config);
        }
    }
}
