//! PC Pokémon storage — the `storage_system` slot.

use serde::{Deserialize, Serialize};

use crate::model::pokemon::PokemonSlot;

/// One storage box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonBox {
    /// Box name.
    pub name: String,
    /// Wallpaper index.
    #[serde(default)]
    pub background: u32,
    /// Box positions; empty positions are `None`.
    #[serde(default)]
    pub pokemon: Vec<Option<PokemonSlot>>,
}

/// All storage boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStorage {
    /// The boxes, in order.
    #[serde(default)]
    pub boxes: Vec<PokemonBox>,
    /// Index of the box shown when the PC opens.
    #[serde(default)]
    pub current_box: usize,
}

impl PokemonStorage {
    /// Number of stored Pokémon across all boxes.
    #[must_use]
    pub fn pokemon_count(&self) -> usize {
        self.boxes.iter().map(|b| b.pokemon.iter().flatten().count()).sum()
    }
}
