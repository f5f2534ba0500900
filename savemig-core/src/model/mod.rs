//! Typed values stored in save-record slots.
//!
//! Values whose layout changed between releases are tagged enums with a
//! `Legacy` and a `Current` variant, so a conversion decides what to do by
//! matching on the shape rather than probing for fields.

pub mod bag;
pub mod metadata;
pub mod options;
pub mod pokedex;
pub mod pokemon;
pub mod storage;
pub mod trainer;

pub use bag::Bag;
pub use metadata::{GlobalMetadata, ItemStack, ItemStorage};
pub use options::{LegacyOptions, Options, OptionsSlot};
pub use pokedex::{DexContext, Pokedex, RegionMode};
pub use pokemon::{LegacyPokemon, Pokemon, PokemonSlot};
pub use storage::{PokemonBox, PokemonStorage};
pub use trainer::{LegacyTrainer, PlayerSlot, PlayerTrainer};
