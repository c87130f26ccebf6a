//! Built-in control programs.
//!
//! These are small reference opponents, useful as sparring partners and as
//! fixtures in tests:
//!
//! - [`Berzerker`]: drives in random loops and fires at random
//! - [`Tweedledum`]: sweeps its turret and fires at whatever its turret
//!   sensor sees
//! - [`Sitter`]: does nothing at all
//!
//! # Example
//!
//! ```
//! use lptanks_core::bots;
//!
//! let program = bots::by_name("tweedledum", 1).unwrap();
//! assert_eq!(program.name(), "Tweedledum");
//! assert!(bots::by_name("nobody", 1).is_none());
//! ```

mod berzerker;
mod tweedledum;

pub use berzerker::Berzerker;
pub use tweedledum::Tweedledum;

use crate::output::StateMap;
use crate::runtime::ControlProgram;

/// A program that never acts. Its tank stays where it was placed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sitter;

impl ControlProgram for Sitter {
    fn name(&self) -> &str {
        "Sitter"
    }

    fn run(&mut self, _state: &StateMap) -> StateMap {
        StateMap::new()
    }
}

/// Names accepted by [`by_name`].
pub const BOT_NAMES: [&str; 6] = [
    "berzerker",
    "tweedledum",
    "tweedledummer",
    "tweedledummerer",
    "tweedledummerest",
    "sitter",
];

/// Builds a built-in program by case-insensitive name.
///
/// `seed` only matters for programs that make random choices.
#[must_use]
pub fn by_name(name: &str, seed: u64) -> Option<Box<dyn ControlProgram>> {
    let program: Box<dyn ControlProgram> = match name.to_ascii_lowercase().as_str() {
        "berzerker" => Box::new(Berzerker::new(seed)),
        "tweedledum" => Box::new(Tweedledum::new()),
        "tweedledummer" => Box::new(Tweedledum::with_cruise("Tweedledummer", [-80, -70])),
        "tweedledummerer" => Box::new(Tweedledum::with_cruise("Tweedledummerer", [20, 30])),
        "tweedledummerest" => Box::new(Tweedledum::with_cruise("Tweedledummerest", [40, 35])),
        "sitter" => Box::new(Sitter),
        _ => return None,
    };
    Some(program)
}
