// Battle Schema - Shared type definitions
// This crate holds the data contracts that species, move and item catalogs
// must satisfy. The engine consumes these as opaque values and never owns the
// catalogs themselves.

pub use battle_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod pokemon_types;
pub mod species_data;
