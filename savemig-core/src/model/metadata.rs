//! Global metadata — the `global_metadata` slot.
//!
//! A grab bag of world state that is not tied to a map: PC item storage,
//! mail, the battle partner, the Day Care, roaming Pokémon, the Hall of
//! Fame, Triple Triad cards and a few counters.

use serde::{Deserialize, Serialize};

use crate::game_data::DataRef;
use crate::model::pokemon::PokemonSlot;

/// A stack of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item reference.
    pub item: DataRef,
    /// How many.
    pub quantity: u32,
}

impl ItemStack {
    /// A stack of `quantity` of `item`.
    #[must_use]
    pub fn new(item: impl Into<DataRef>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

/// Items deposited in the PC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStorage {
    /// Stored stacks; empty positions are `None`.
    #[serde(default)]
    pub items: Vec<Option<ItemStack>>,
}

/// A piece of mail held in the mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    /// The mail item.
    pub item: DataRef,
    /// Message text.
    pub message: String,
    /// Who wrote it.
    pub sender: String,
    /// Pokémon pictured on the mail.
    #[serde(default)]
    pub pokemon: Vec<Option<PokemonSlot>>,
}

/// The trainer accompanying the player in double battles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    /// Trainer type reference.
    pub trainer_type: DataRef,
    /// Trainer name.
    pub name: String,
    /// Trainer id.
    pub id: u32,
    /// Party; empty positions are `None`.
    #[serde(default)]
    pub party: Vec<Option<PokemonSlot>>,
}

/// One Day Care position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaycareSlot {
    /// The deposited Pokémon, if any.
    #[serde(default)]
    pub pokemon: Option<PokemonSlot>,
    /// Steps taken since deposit.
    #[serde(default)]
    pub steps: u32,
}

/// A stack of Triple Triad cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriadCard {
    /// Species on the card; `0` marks an empty stack.
    pub species: DataRef,
    /// How many.
    pub quantity: u32,
}

/// The player's Triple Triad card collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriadStorage {
    /// Card stacks; empty positions are `None`.
    #[serde(default)]
    pub items: Vec<Option<TriadCard>>,
}

/// Global metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalMetadata {
    /// Bridge-walking counter.
    pub bridge: Option<u32>,
    /// Which encounter table version is active.
    pub encounter_version: Option<u32>,
    /// PC item storage.
    pub pc_item_storage: Option<ItemStorage>,
    /// Mailbox; empty positions are `None`.
    pub mailbox: Option<Vec<Option<Mail>>>,
    /// Battle partner.
    pub partner: Option<Partner>,
    /// Day Care positions.
    pub daycare: Option<Vec<Option<DaycareSlot>>>,
    /// Roaming Pokémon.
    pub roam_pokemon: Option<Vec<Option<PokemonSlot>>>,
    /// Hall of Fame teams.
    pub hall_of_fame: Option<Vec<Option<Vec<Option<PokemonSlot>>>>>,
    /// Triple Triad cards.
    pub triads: Option<TriadStorage>,
    /// Whether the player can open the Pokédex.
    pub pokedex_access: bool,
    /// Release-18 unlocked-dex flags, moved into the Pokédex in release 19.
    pub pokedex_unlocked: Option<Vec<bool>>,
    /// Release-18 viable-dex list, dropped in release 19.
    pub pokedex_viable: Option<Vec<i32>>,
}
