//! The match scheduler.
//!
//! [`TanksGame`] owns the configuration, the [`Arena`] and the resolvers,
//! and drives the turn loop:
//!
//! 1. **ACTIONS**: every living tank's program sees its projected state and
//!    answers with an action map, which is validated and applied
//! 2. **SNAPSHOT**: debug variables are recorded for every tank
//! 3. **TELEPORT**: living tanks with a pending teleport jump to a random
//!    position
//! 4. **RESOLUTION**: combat, movement and commit resolvers run in order
//! 5. **SENSE**: the sensor subsystem refreshes readings
//! 6. **ADVANCE**: the turn budget shrinks and the match state is re-evaluated
//!
//! Steps 2 to 6 are [`TanksGame::do_turn`]; [`TanksGame::play_turn`] adds
//! step 1 in front.
//!
//! # Determinism
//!
//! Given the same seed, configuration, registrations and program answers, a
//! match replays identically: the roster is iterated in registration order
//! and the gameplay random stream is consumed only by placement and
//! teleports, in roster order.
//!
//! # Example
//!
//! ```
//! use lptanks_core::bots::{Sitter, Tweedledum};
//! use lptanks_core::config::ArenaConfig;
//! use lptanks_core::runtime::{LogErrors, NoSensors, ProgramRuntime};
//! use lptanks_core::simulation::{MatchState, TanksGame};
//!
//! let config = ArenaConfig { turns: 5, ..ArenaConfig::default() };
//! let mut game = TanksGame::new(config, 42).unwrap();
//! let mut runtime = ProgramRuntime::new();
//! let mut errors = LogErrors;
//!
//! game.enlist(Box::new(Tweedledum::new()), &mut runtime, &mut errors).unwrap();
//! game.enlist(Box::new(Sitter), &mut runtime, &mut errors).unwrap();
//! game.init_board(&mut NoSensors).unwrap();
//!
//! while game.is_running() {
//!     game.play_turn(&mut runtime, &mut NoSensors, &mut errors);
//! }
//! assert_eq!(game.state(), MatchState::Ended);
//! assert_eq!(game.turns_left(), 0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::entity::{DebugVars, Tank, TankId, TankOptions};
use crate::error::GameError;
use crate::frame::Frame;
use crate::output::{Action, StateMap};
use crate::placement::{self, place_tanks};
use crate::resolver::{default_resolvers, Kill, Resolver};
use crate::runtime::{ControlProgram, ControlRuntime, ErrorChannel, ProgramRuntime, SensorSubsystem};
use crate::world_view::TankView;

// =============================================================================
// Match state
// =============================================================================

/// Lifecycle of a match. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    /// Turns are still being played.
    Running,
    /// Fewer than two tanks are alive or the turn budget is spent.
    Ended,
}

/// Summary of a match, derived from the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Turns played so far.
    pub turns_played: u32,
    /// Living tanks in roster order.
    pub survivors: Vec<TankId>,
    /// One entry per dead tank, in roster order.
    pub kills: Vec<Kill>,
}

// =============================================================================
// TanksGame
// =============================================================================

/// The turn scheduler of one match.
pub struct TanksGame {
    config: ArenaConfig,
    arena: Arena,
    resolvers: Vec<Box<dyn Resolver>>,
    turns_left: u32,
    state: MatchState,
}

impl fmt::Debug for TanksGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TanksGame")
            .field("config", &self.config)
            .field("arena", &self.arena)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("turns_left", &self.turns_left)
            .field("state", &self.state)
            .finish()
    }
}

impl TanksGame {
    /// Creates a match with an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if `config` fails validation.
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            turns_left: config.turns,
            config,
            arena: Arena::new(seed),
            resolvers: default_resolvers(),
            state: MatchState::Running,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The match configuration.
    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The roster container.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The roster container, mutably. Useful to stage scenarios.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The roster in registration order.
    #[must_use]
    pub fn tanks(&self) -> &[Tank] {
        self.arena.tanks()
    }

    /// Returns the tank with the given id.
    #[must_use]
    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.arena.get(id)
    }

    /// Returns the tank with the given id, mutably.
    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.arena.get_mut(id)
    }

    /// Turns left in the budget.
    #[must_use]
    pub const fn turns_left(&self) -> u32 {
        self.turns_left
    }

    /// Turns played so far.
    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.config.turns.saturating_sub(self.turns_left)
    }

    /// The current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Returns true while at least two tanks are alive and turns remain.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == MatchState::Running && self.can_continue()
    }

    fn can_continue(&self) -> bool {
        self.arena.alive_count() >= 2 && self.turns_left > 0
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Registers a tank from JSON options and returns its id.
    ///
    /// Rejected sensor entries are reported to `errors` and skipped; the
    /// tank is created regardless.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Options`] if `options` is not an object or null.
    pub fn create_tank<E>(&mut self, options: &Value, errors: &mut E) -> Result<TankId, GameError>
    where
        E: ErrorChannel + ?Sized,
    {
        let (options, rejected) = TankOptions::from_value(options, &self.config)?;
        let sensors = options.sensors.len();
        let id = self.arena.spawn(options.sensors, options.color, &self.config);
        for error in &rejected {
            errors.report_error(id, error);
        }
        debug!(tank = %id, sensors, "tank registered");
        Ok(id)
    }

    /// Registers a tank for `program` and hands the program to `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Options`] if the program's options are malformed.
    pub fn enlist<E>(
        &mut self,
        program: Box<dyn ControlProgram>,
        runtime: &mut ProgramRuntime,
        errors: &mut E,
    ) -> Result<TankId, GameError>
    where
        E: ErrorChannel + ?Sized,
    {
        let id = self.create_tank(&program.options(), errors)?;
        if let Some(tank) = self.arena.get_mut(id) {
            tank.name = program.name().to_string();
        }
        runtime.register(id, program);
        Ok(id)
    }

    /// Places every tank on the board and takes the first sensor reading.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Placement`] if a tank cannot be placed within the
    /// configured attempt limit.
    pub fn init_board<S>(&mut self, sensors: &mut S) -> Result<(), GameError>
    where
        S: SensorSubsystem + ?Sized,
    {
        let (tanks, rng) = self.arena.split_mut();
        if let Err(err) = place_tanks(tanks, &self.config, rng) {
            warn!(error = %err, "board setup failed");
            return Err(err.into());
        }
        sensors.refresh_sensors(self.arena.tanks_mut(), &self.config);
        debug!(tanks = self.arena.len(), "board initialised");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Control-program contract
    // -------------------------------------------------------------------------

    /// Builds the state map the program of `id` sees this turn.
    #[must_use]
    pub fn project(&self, id: TankId) -> Option<StateMap> {
        self.arena
            .get(id)
            .map(|tank| TankView::project(tank, &self.config).to_state_map())
    }

    /// Validates an action map and applies it to tank `id`.
    ///
    /// Every rejected value is reported to `errors` and leaves the
    /// corresponding state unchanged. Returns false if no tank has that id.
    pub fn apply_action<E>(&mut self, id: TankId, answer: &StateMap, errors: &mut E) -> bool
    where
        E: ErrorChannel + ?Sized,
    {
        let Some(tank) = self.arena.get_mut(id) else {
            return false;
        };
        let parsed = Action::from_state_map(answer);
        for error in &parsed.errors {
            errors.report_error(id, error);
        }
        parsed.action.apply_to(tank, &self.config);
        true
    }

    // -------------------------------------------------------------------------
    // Turn loop
    // -------------------------------------------------------------------------

    /// Collects and applies every living tank's action, then runs the turn.
    pub fn play_turn<R, S, E>(&mut self, runtime: &mut R, sensors: &mut S, errors: &mut E)
    where
        R: ControlRuntime + ?Sized,
        S: SensorSubsystem + ?Sized,
        E: ErrorChannel + ?Sized,
    {
        if self.state == MatchState::Ended {
            return;
        }
        for index in 0..self.arena.len() {
            let tank = &self.arena.tanks()[index];
            if !tank.is_alive() {
                continue;
            }
            let state = TankView::project(tank, &self.config).to_state_map();
            let answer = runtime.get_action(tank, &state);
            let id = tank.id();
            self.apply_action(id, &answer, errors);
        }
        self.do_turn(sensors);
    }

    /// Resolves one turn from the intents already applied.
    ///
    /// Does nothing once the match has ended.
    pub fn do_turn<S>(&mut self, sensors: &mut S)
    where
        S: SensorSubsystem + ?Sized,
    {
        if self.state == MatchState::Ended {
            return;
        }
        trace!(turn = self.turns_played(), turns_left = self.turns_left, "turn start");

        for tank in self.arena.tanks_mut() {
            tank.grab_debug_vars();
        }

        self.resolve_teleports();

        for resolver in &self.resolvers {
            resolver.resolve(self.arena.tanks_mut(), &self.config);
        }

        sensors.refresh_sensors(self.arena.tanks_mut(), &self.config);

        self.turns_left = self.turns_left.saturating_sub(1);
        if !self.can_continue() {
            self.state = MatchState::Ended;
            info!(
                turn = self.turns_played(),
                alive = self.arena.alive_count(),
                "match ended"
            );
        }
    }

    fn resolve_teleports(&mut self) {
        let (tanks, rng) = self.arena.split_mut();
        for tank in tanks
            .iter_mut()
            .filter(|t| t.is_alive() && t.teleport.teleporting)
        {
            tank.position = placement::random_position(rng, &self.config);
            debug!(
                tank = %tank.id(),
                x = tank.position.x,
                y = tank.position.y,
                "teleported"
            );
        }
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Summarizes the match so far.
    #[must_use]
    pub fn outcome(&self) -> MatchOutcome {
        let tanks = self.arena.tanks();
        MatchOutcome {
            turns_played: self.turns_played(),
            survivors: tanks.iter().filter(|t| t.is_alive()).map(Tank::id).collect(),
            kills: tanks
                .iter()
                .filter_map(|t| {
                    Some(Kill {
                        victim: t.id(),
                        killer: t.killer()?,
                        cause: t.cause_of_death()?,
                    })
                })
                .collect(),
        }
    }

    /// Snapshot of the board for renderers.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame::capture(self.turns_played(), self.arena.tanks(), &self.config)
    }

    /// Debug log of the first registered tank.
    #[must_use]
    pub fn debug_vars(&self) -> &[DebugVars] {
        self.arena
            .tanks()
            .first()
            .map(Tank::debug_log)
            .unwrap_or_default()
    }
}
