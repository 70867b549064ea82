//! `strat_core`: tire strategy engine.
//!
//! No IO. Every entry point is a pure function of the track parameters, the
//! lap count, and the tire inventory.

mod assemble;
pub mod curve;
pub mod enumerate;
mod profile;
mod solver;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use assemble::{assemble, evaluate, rank_by_time, strategy_label};
pub use enumerate::enumerate;
pub use profile::{derive_worn_profile, worn_entry, ProfileCache};
pub use solver::solve;
pub use types::*;
