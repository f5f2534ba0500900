//! The save record: named slots plus two version stamps.
//!
//! Slots the engine itself understands are typed fields. Anything else a
//! game stores (switches, variables, map state, custom data) lives in
//! [`SaveRecord::extra`] as plain JSON so conversions written by game
//! authors can still reach it by name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SaveError};
use crate::model::{Bag, GlobalMetadata, OptionsSlot, PlayerSlot, PokemonStorage};
use crate::version::{EngineVersions, Version};

/// Names of the typed slots.
pub mod slots {
    /// The player trainer.
    pub const PLAYER: &str = "player";
    /// Global metadata.
    pub const GLOBAL_METADATA: &str = "global_metadata";
    /// Player options.
    pub const POKEMON_SYSTEM: &str = "pokemon_system";
    /// The bag.
    pub const BAG: &str = "bag";
    /// PC Pokémon storage.
    pub const STORAGE_SYSTEM: &str = "storage_system";
    /// Engine release stamp.
    pub const ESSENTIALS_VERSION: &str = "essentials_version";
    /// Game release stamp.
    pub const GAME_VERSION: &str = "game_version";

    /// Every name reserved by a typed field.
    pub const RESERVED: [&str; 7] = [
        PLAYER,
        GLOBAL_METADATA,
        POKEMON_SYSTEM,
        BAG,
        STORAGE_SYSTEM,
        ESSENTIALS_VERSION,
        GAME_VERSION,
    ];
}

/// In-memory save data for one game session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Engine release that last wrote this save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essentials_version: Option<Version>,
    /// Game release that last wrote this save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_version: Option<Version>,
    /// The player trainer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSlot>,
    /// Global metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_metadata: Option<GlobalMetadata>,
    /// Player options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_system: Option<OptionsSlot>,
    /// The bag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag: Option<Bag>,
    /// PC Pokémon storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_system: Option<PokemonStorage>,
    /// Every other slot, by name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SaveRecord {
    /// An empty record with no slots and no stamps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a slot with this name is present.
    #[must_use]
    pub fn has_slot(&self, name: &str) -> bool {
        match name {
            slots::PLAYER => self.player.is_some(),
            slots::GLOBAL_METADATA => self.global_metadata.is_some(),
            slots::POKEMON_SYSTEM => self.pokemon_system.is_some(),
            slots::BAG => self.bag.is_some(),
            slots::STORAGE_SYSTEM => self.storage_system.is_some(),
            slots::ESSENTIALS_VERSION => self.essentials_version.is_some(),
            slots::GAME_VERSION => self.game_version.is_some(),
            other => self.extra.contains_key(other),
        }
    }

    /// Names of every present slot, typed slots first.
    #[must_use]
    pub fn slot_names(&self) -> Vec<&str> {
        slots::RESERVED
            .iter()
            .copied()
            .filter(|name| self.has_slot(name))
            .chain(self.extra.keys().map(String::as_str))
            .collect()
    }

    /// Borrow a typed slot.
    #[must_use]
    pub fn get<S: SaveSlot>(&self) -> Option<&S> {
        S::slot(self).as_ref()
    }

    /// Mutably borrow a typed slot.
    pub fn get_mut<S: SaveSlot>(&mut self) -> Option<&mut S> {
        S::slot_mut(self).as_mut()
    }

    /// Store a typed slot, returning the previous value.
    pub fn set<S: SaveSlot>(&mut self, value: S) -> Option<S> {
        S::slot_mut(self).replace(value)
    }

    /// Remove a typed slot.
    pub fn take<S: SaveSlot>(&mut self) -> Option<S> {
        S::slot_mut(self).take()
    }

    /// Borrow an untyped slot.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Mutably borrow an untyped slot.
    pub fn raw_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.extra.get_mut(name)
    }

    /// Store an untyped slot, returning the previous value.
    ///
    /// # Errors
    /// Returns [`SaveError::MalformedSlot`] if `name` belongs to a typed slot.
    pub fn insert_raw(&mut self, name: impl Into<String>, value: Value) -> Result<Option<Value>> {
        let name = name.into();
        if slots::RESERVED.contains(&name.as_str()) {
            return Err(SaveError::MalformedSlot {
                slot: name,
                reason: "typed slots cannot be stored as raw values".to_string(),
            });
        }
        Ok(self.extra.insert(name, value))
    }

    /// The engine stamp, or the configured assumption for unstamped saves.
    #[must_use]
    pub fn essentials_stamp(&self, versions: &EngineVersions) -> Version {
        self.essentials_version
            .clone()
            .unwrap_or_else(|| versions.unstamped_essentials.clone())
    }

    /// The game stamp, or the configured assumption for unstamped saves.
    #[must_use]
    pub fn game_stamp(&self, versions: &EngineVersions) -> Version {
        self.game_version
            .clone()
            .unwrap_or_else(|| versions.unstamped_game.clone())
    }

    /// Parse a record from JSON.
    ///
    /// # Errors
    /// Returns [`SaveError::Serialization`] if the JSON does not describe a
    /// save record.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SaveError::Serialization(e.to_string()))
    }

    /// Render the record as JSON.
    ///
    /// # Errors
    /// Returns [`SaveError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| SaveError::Serialization(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SaveSlot
// ---------------------------------------------------------------------------

/// A value type stored in one typed slot of a [`SaveRecord`].
///
/// Single-slot conversions are registered against a `SaveSlot` type; the
/// runner uses it to find, hand out and write back the slot value.
pub trait SaveSlot: Clone + Send + Sync + 'static {
    /// Slot name.
    const NAME: &'static str;

    /// Borrow this slot.
    fn slot(record: &SaveRecord) -> &Option<Self>;

    /// Mutably borrow this slot.
    fn slot_mut(record: &mut SaveRecord) -> &mut Option<Self>;
}

macro_rules! save_slot {
    ($ty:ty, $field:ident, $name:expr) => {
        impl SaveSlot for $ty {
            const NAME: &'static str = $name;

            fn slot(record: &SaveRecord) -> &Option<Self> {
                &record.$field
            }

            fn slot_mut(record: &mut SaveRecord) -> &mut Option<Self> {
                &mut record.$field
            }
        }
    };
}

save_slot!(PlayerSlot, player, slots::PLAYER);
save_slot!(GlobalMetadata, global_metadata, slots::GLOBAL_METADATA);
save_slot!(OptionsSlot, pokemon_system, slots::POKEMON_SYSTEM);
save_slot!(Bag, bag, slots::BAG);
save_slot!(PokemonStorage, storage_system, slots::STORAGE_SYSTEM);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_and_raw_slots_share_one_namespace() {
        let mut record = SaveRecord::new();
        record.set(Bag::default());
        record
            .insert_raw("switches", json!([false, true]))
            .expect("insert raw");

        assert!(record.has_slot("bag"));
        assert!(record.has_slot("switches"));
        assert!(!record.has_slot("player"));
        assert_eq!(record.slot_names(), vec!["bag", "switches"]);
    }

    #[test]
    fn raw_insert_rejects_typed_names() {
        let mut record = SaveRecord::new();
        let err = record.insert_raw("player", json!({})).expect_err("reserved");
        assert!(matches!(err, SaveError::MalformedSlot { .. }));
    }

    #[test]
    fn unstamped_saves_use_assumed_versions() {
        let versions = EngineVersions::default();
        let mut record = SaveRecord::new();
        assert_eq!(record.essentials_stamp(&versions), versions.unstamped_essentials);
        assert_eq!(record.game_stamp(&versions), versions.unstamped_game);

        record.essentials_version = Some(Version::from(19u32));
        assert_eq!(record.essentials_stamp(&versions), Version::from(19u32));
    }

    #[test]
    fn json_keeps_unknown_slots() {
        let json = r#"{
            "essentials_version": 18,
            "bag": {"pockets": [[{"item": 1, "quantity": 5}]]},
            "variables": [0, 7]
        }"#;
        let record = SaveRecord::from_json(json).expect("parse");
        assert_eq!(record.essentials_version, Some(Version::from(18u32)));
        assert_eq!(record.get::<Bag>().map(Bag::stack_count), Some(1));
        assert_eq!(record.raw("variables"), Some(&json!([0, 7])));

        let again = SaveRecord::from_json(&record.to_json().expect("encode")).expect("reparse");
        assert_eq!(again, record);
    }
}
