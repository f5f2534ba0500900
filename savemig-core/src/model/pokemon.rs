//! Stored Pokémon, in legacy and current shape.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::game_data::{DataRef, GameData};

/// A current-shape Pokémon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Canonical base species id.
    pub species: String,
    /// Form number.
    pub form: u8,
    /// Level.
    pub level: u8,
    /// Nickname, if any.
    pub name: Option<String>,
    /// Canonical id of the held item, if any.
    pub item: Option<String>,
    /// Current HP.
    pub hp: u16,
    /// Whether it is shiny.
    pub shiny: bool,
    /// Whether it is a Shadow Pokémon.
    pub shadow: bool,
    /// Original trainer's id.
    pub owner_id: u32,
}

/// A release-18 Pokémon: numeric references, optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPokemon {
    /// Species reference.
    pub species: DataRef,
    /// Form number.
    #[serde(default)]
    pub form: Option<u8>,
    /// Level.
    #[serde(default)]
    pub level: Option<u8>,
    /// Nickname.
    #[serde(default)]
    pub name: Option<String>,
    /// Held item reference (`0` = none).
    #[serde(default)]
    pub item: Option<DataRef>,
    /// Current HP.
    #[serde(default)]
    pub hp: Option<u16>,
    /// Shiny flag.
    #[serde(default)]
    pub shiny: Option<bool>,
    /// Shadow flag.
    #[serde(default)]
    pub shadow: Option<bool>,
    /// Original trainer's id.
    #[serde(default)]
    pub trainer_id: Option<u32>,
}

/// A stored Pokémon in either shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PokemonSlot {
    /// Not yet converted.
    Legacy(LegacyPokemon),
    /// Current shape.
    Current(Pokemon),
}

impl PokemonSlot {
    /// Whether this Pokémon is already in the current shape.
    #[must_use]
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current(_))
    }

    /// Convert to the current shape.
    ///
    /// The species is looked up strictly. A held item that no longer exists
    /// is dropped.
    ///
    /// # Errors
    /// Returns [`crate::SaveError::UnresolvableReference`] if the species
    /// does not exist.
    pub fn convert(self, data: &GameData) -> Result<Pokemon> {
        let legacy = match self {
            Self::Current(pokemon) => return Ok(pokemon),
            Self::Legacy(legacy) => legacy,
        };
        let species = data.species(&legacy.species)?;
        let item = match legacy.item {
            Some(ref item) if !item.is_empty_sentinel() => {
                let resolved = data.try_item(item).map(|i| i.id.clone());
                if resolved.is_none() {
                    warn!(item = %item, species = %species.species, "Dropping unknown held item");
                }
                resolved
            }
            _ => None,
        };
        Ok(Pokemon {
            species: species.species.clone(),
            form: legacy.form.unwrap_or(species.form),
            level: legacy.level.unwrap_or(1),
            name: legacy.name,
            item,
            hp: legacy.hp.unwrap_or(0),
            shiny: legacy.shiny.unwrap_or(false),
            shadow: legacy.shadow.unwrap_or(false),
            owner_id: legacy.trainer_id.unwrap_or(0),
        })
    }

    /// Convert in place, keeping the slot wrapper.
    ///
    /// # Errors
    /// See [`PokemonSlot::convert`].
    pub fn upgrade(&mut self, data: &GameData) -> Result<()> {
        if let Self::Legacy(_) = self {
            let converted = self.clone().convert(data)?;
            *self = Self::Current(converted);
        }
        Ok(())
    }
}

/// Convert every occupied position of a list, leaving empty positions empty.
///
/// # Errors
/// Fails on the first Pokémon whose species cannot be resolved.
pub fn upgrade_all(slots: &mut [Option<PokemonSlot>], data: &GameData) -> Result<()> {
    for pokemon in slots.iter_mut().flatten() {
        pokemon.upgrade(data)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::{ItemData, SpeciesData};
    use crate::SaveError;

    fn data() -> GameData {
        GameData::new(
            vec![ItemData {
                id: "ORANBERRY".into(),
                id_number: 389,
            }],
            vec![SpeciesData {
                id: "PIKACHU".into(),
                species: "PIKACHU".into(),
                form: 0,
                id_number: 25,
            }],
            Vec::new(),
            Vec::new(),
        )
    }

    fn legacy(species: u32, item: Option<u32>) -> PokemonSlot {
        PokemonSlot::Legacy(LegacyPokemon {
            species: DataRef::Number(species),
            form: None,
            level: Some(12),
            name: None,
            item: item.map(DataRef::Number),
            hp: Some(30),
            shiny: None,
            shadow: None,
            trainer_id: Some(4242),
        })
    }

    #[test]
    fn converts_species_and_item() {
        let pokemon = legacy(25, Some(389)).convert(&data()).expect("convert");
        assert_eq!(pokemon.species, "PIKACHU");
        assert_eq!(pokemon.item.as_deref(), Some("ORANBERRY"));
        assert_eq!(pokemon.level, 12);
        assert_eq!(pokemon.owner_id, 4242);
        assert!(!pokemon.shiny);
    }

    #[test]
    fn unknown_item_is_dropped() {
        let pokemon = legacy(25, Some(999)).convert(&data()).expect("convert");
        assert!(pokemon.item.is_none());
        let pokemon = legacy(25, Some(0)).convert(&data()).expect("convert");
        assert!(pokemon.item.is_none());
    }

    #[test]
    fn unknown_species_is_fatal() {
        let err = legacy(9999, None).convert(&data()).expect_err("unknown species");
        assert!(matches!(err, SaveError::UnresolvableReference { kind: "species", .. }));
    }

    #[test]
    fn upgrade_all_skips_empty_positions() {
        let mut party = vec![Some(legacy(25, None)), None];
        upgrade_all(&mut party, &data()).expect("upgrade");
        assert!(party[0].as_ref().is_some_and(PokemonSlot::is_current));
        assert!(party[1].is_none());
    }
}
