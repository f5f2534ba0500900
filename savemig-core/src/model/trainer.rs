//! The player trainer — the `player` slot.
//!
//! Release 18 kept Pokédex progress as parallel arrays indexed by species
//! number directly on the trainer, next to a boolean saying whether the
//! player owns a Pokédex at all. Release 19 moved progress into a
//! [`Pokedex`] and the possession flag into global metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::game_data::DataRef;
use crate::model::pokedex::{DexContext, Pokedex};
use crate::model::pokemon::{Pokemon, PokemonSlot};

/// Release-18 trainer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTrainer {
    /// Trainer type reference.
    pub trainer_type: DataRef,
    /// Trainer name.
    pub name: String,
    /// Trainer id.
    pub id: u32,
    /// Character sprite id.
    #[serde(default)]
    pub meta_id: Option<u32>,
    /// Outfit number.
    #[serde(default)]
    pub outfit: Option<u8>,
    /// Language index.
    #[serde(default)]
    pub language: Option<u8>,
    /// Party.
    #[serde(default)]
    pub party: Vec<PokemonSlot>,
    /// Badges earned, by badge number.
    #[serde(default)]
    pub badges: Vec<bool>,
    /// Money.
    #[serde(default)]
    pub money: u32,
    /// Seen flags by species number.
    #[serde(default)]
    pub seen: Vec<bool>,
    /// Owned flags by species number.
    #[serde(default)]
    pub owned: Vec<bool>,
    /// Seen forms by species number: `[male/genderless, female]`.
    #[serde(default)]
    pub form_seen: Vec<Option<[Vec<bool>; 2]>>,
    /// Last seen `(gender, form)` by species number.
    #[serde(default)]
    pub form_last_seen: Vec<Option<(u8, u8)>>,
    /// Shadow-caught flags by species number.
    #[serde(default)]
    pub shadow_caught: Option<Vec<bool>>,
    /// Whether the player has a Pokédex.
    #[serde(default)]
    pub pokedex: Option<bool>,
    /// Whether the player has a Pokégear.
    #[serde(default)]
    pub pokegear: bool,
    /// Whether Mystery Gift is unlocked.
    #[serde(default)]
    pub mystery_gift_access: Option<bool>,
    /// Pending Mystery Gifts.
    #[serde(default)]
    pub mystery_gift: Option<Vec<Value>>,
}

/// Current-shape player trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrainer {
    /// Canonical trainer type id.
    pub trainer_type: String,
    /// Trainer name.
    pub name: String,
    /// Trainer id.
    pub id: u32,
    /// Character sprite id.
    pub character_id: u32,
    /// Outfit number.
    pub outfit: u8,
    /// Language index.
    pub language: u8,
    /// Party.
    pub party: Vec<Pokemon>,
    /// Badges earned, by badge number.
    pub badges: Vec<bool>,
    /// Money.
    pub money: u32,
    /// Pokédex progress.
    pub pokedex: Pokedex,
    /// Whether the player has a Pokégear.
    pub pokegear: bool,
    /// Whether Mystery Gift is unlocked.
    pub mystery_gift_unlocked: bool,
    /// Pending Mystery Gifts.
    pub mystery_gifts: Vec<Value>,
}

impl LegacyTrainer {
    /// Convert into a current-shape trainer.
    ///
    /// # Errors
    /// Fails if the trainer type or any party member's species cannot be
    /// resolved.
    pub fn into_player(self, ctx: &DexContext<'_>) -> Result<PlayerTrainer> {
        let trainer_type = ctx.data.trainer_type(&self.trainer_type)?.id.clone();

        let mut pokedex = Pokedex::new(ctx.data.regional_dex_count());
        self.transfer_pokedex(&mut pokedex, ctx);

        let party = self
            .party
            .into_iter()
            .map(|p| p.convert(ctx.data))
            .collect::<Result<Vec<_>>>()?;

        Ok(PlayerTrainer {
            trainer_type,
            name: self.name,
            id: self.id,
            character_id: self.meta_id.unwrap_or(0),
            outfit: self.outfit.unwrap_or(0),
            language: self.language.unwrap_or(0),
            party,
            badges: self.badges,
            money: self.money,
            pokedex,
            pokegear: self.pokegear,
            mystery_gift_unlocked: self.mystery_gift_access.unwrap_or(false),
            mystery_gifts: self.mystery_gift.unwrap_or_default(),
        })
    }

    /// Copy the per-species-number arrays into `pokedex`. Numbers that no
    /// longer name a species are skipped.
    pub fn transfer_pokedex(&self, pokedex: &mut Pokedex, ctx: &DexContext<'_>) {
        for number in flagged(&self.seen) {
            pokedex.set_seen(&DataRef::Number(number), ctx);
        }
        for number in flagged(&self.owned) {
            pokedex.set_owned(&DataRef::Number(number), ctx);
        }

        let mut skipped = 0usize;
        let resolve = |index: usize| {
            u32::try_from(index)
                .ok()
                .and_then(|n| ctx.data.try_species(&DataRef::Number(n)))
                .map(|s| s.species.clone())
        };

        for (index, forms) in self.form_seen.iter().enumerate() {
            let Some(forms) = forms else { continue };
            match resolve(index) {
                Some(species) => pokedex.record_seen_forms(species, forms.clone()),
                None => skipped += 1,
            }
        }
        for (index, last) in self.form_last_seen.iter().enumerate() {
            let Some((gender, form)) = *last else { continue };
            match resolve(index) {
                Some(species) => pokedex.record_last_seen_form(species, gender, form),
                None => skipped += 1,
            }
        }
        if let Some(shadow) = &self.shadow_caught {
            for number in flagged(shadow) {
                match resolve(number as usize) {
                    Some(species) => pokedex.set_owned_shadow(species),
                    None => skipped += 1,
                }
            }
        }

        if skipped > 0 {
            debug!(trainer = %self.name, skipped, "Skipped Pokédex entries with unknown species");
        }
    }
}

/// Indices of `true` entries, as species numbers.
fn flagged(flags: &[bool]) -> impl Iterator<Item = u32> + '_ {
    flags
        .iter()
        .enumerate()
        .filter(|&(_, &set)| set)
        .filter_map(|(i, _)| u32::try_from(i).ok())
}

/// The `player` slot in either shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PlayerSlot {
    /// Not yet converted.
    Legacy(LegacyTrainer),
    /// Current shape.
    Current(PlayerTrainer),
}

impl PlayerSlot {
    /// Whether the trainer is already in the current shape.
    #[must_use]
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current(_))
    }

    /// Remove and return the legacy Pokédex possession flag.
    pub fn take_pokedex_flag(&mut self) -> Option<bool> {
        match self {
            Self::Legacy(legacy) => legacy.pokedex.take(),
            Self::Current(_) => None,
        }
    }

    /// The Pokédex, once the trainer is in the current shape.
    pub fn pokedex_mut(&mut self) -> Option<&mut Pokedex> {
        match self {
            Self::Legacy(_) => None,
            Self::Current(player) => Some(&mut player.pokedex),
        }
    }
}
