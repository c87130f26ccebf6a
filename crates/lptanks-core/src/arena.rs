//! Arena module: the tank roster and the match's random streams.
//!
//! The Arena is the container for every tank in a match. It provides:
//! - Roster storage in registration order (the order never changes)
//! - Id and default-color assignment
//! - The seeded random streams consumed by the game
//!
//! # Random streams
//!
//! Two ChaCha streams are derived from one seed:
//!
//! - the gameplay stream (stream 0) feeds placement and teleport draws;
//! - the identity stream (stream 1) feeds tank ids and default colors.
//!
//! Keeping identity draws on their own stream means registering tanks with or
//! without explicit colors never shifts the gameplay draws, so a seed replays
//! the same board and the same teleports.
//!
//! # Example
//!
//! ```
//! use lptanks_core::arena::Arena;
//! use lptanks_core::config::ArenaConfig;
//!
//! let config = ArenaConfig::default();
//! let mut arena = Arena::new(42);
//!
//! let id = arena.spawn(Vec::new(), None, &config);
//! assert_eq!(arena.len(), 1);
//! assert_eq!(arena.get(id).map(|t| t.id()), Some(id));
//! assert!(arena.get(id).unwrap().color.starts_with('#'));
//! ```

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ArenaConfig;
use crate::entity::{SensorDescriptor, Tank, TankId};
use crate::placement;

/// Smallest default color component mix, keeps tanks visible on black.
const COLOR_FLOOR: u32 = 0x44_44_44;
/// Span of default colors above [`COLOR_FLOOR`].
const COLOR_SPAN: u32 = 0xBB_BB_BB;

/// Container for the roster and random streams of one match.
#[derive(Debug, Clone)]
pub struct Arena {
    tanks: Vec<Tank>,
    rng: ChaCha8Rng,
    identity_rng: ChaCha8Rng,
    seed: u64,
}

impl Arena {
    /// Creates an empty arena whose random streams derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let mut identity_rng = ChaCha8Rng::seed_from_u64(seed);
        identity_rng.set_stream(1);
        Self {
            tanks: Vec::new(),
            rng,
            identity_rng,
            seed,
        }
    }

    /// Returns the seed the arena was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Appends a tank to the roster and returns its new id.
    ///
    /// The id is unique within the arena. Without a `color` the tank gets a
    /// random one.
    pub fn spawn(
        &mut self,
        sensors: Vec<SensorDescriptor>,
        color: Option<String>,
        config: &ArenaConfig,
    ) -> TankId {
        let id = self.fresh_id();
        let color = color.unwrap_or_else(|| self.random_color());
        self.tanks.push(Tank::new(id, color, sensors, config));
        id
    }

    fn fresh_id(&mut self) -> TankId {
        loop {
            let id = TankId::new(self.identity_rng.gen());
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn random_color(&mut self) -> String {
        let offset = (self.identity_rng.gen::<f64>() * f64::from(COLOR_SPAN)).floor() as u32;
        format!("#{:06x}", COLOR_FLOOR + offset)
    }

    /// Returns the tank with the given id.
    #[must_use]
    pub fn get(&self, id: TankId) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.id() == id)
    }

    /// Returns the tank with the given id, mutably.
    pub fn get_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.iter_mut().find(|t| t.id() == id)
    }

    /// The roster in registration order.
    #[must_use]
    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// The roster in registration order, mutably.
    pub fn tanks_mut(&mut self) -> &mut [Tank] {
        &mut self.tanks
    }

    /// The roster and the gameplay stream, borrowed together.
    pub fn split_mut(&mut self) -> (&mut [Tank], &mut ChaCha8Rng) {
        (&mut self.tanks, &mut self.rng)
    }

    /// Draws a uniform integer position on the field from the gameplay
    /// stream.
    pub fn random_position(&mut self, config: &ArenaConfig) -> DVec2 {
        placement::random_position(&mut self.rng, config)
    }

    /// Number of tanks in the roster, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    /// Returns true if no tank has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    /// Number of tanks without a killer.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.tanks.iter().filter(|t| t.is_alive()).count()
    }

    /// Living tanks in roster order.
    pub fn alive(&self) -> impl Iterator<Item = &Tank> + '_ {
        self.tanks.iter().filter(|t| t.is_alive())
    }
}
