//! Conversions shipped with the engine for saves written before release 19.
//!
//! Release 19 replaced numeric item, species and trainer type ids with
//! symbolic ones, moved Pokédex progress from the trainer into its own
//! object, and filled in fields that older saves lack. Each change is one
//! conversion, registered in this order and all gated at engine version 19:
//!
//! | name                          | target            |
//! |-------------------------------|-------------------|
//! | `v19_define_versions`         | record            |
//! | `v19_convert_PokemonSystem`   | record            |
//! | `v19_move_pokedex_flag`       | record            |
//! | `v19_convert_player`          | record            |
//! | `v19_move_pokedex_dex_data`   | record            |
//! | `v19_convert_global_metadata` | `global_metadata` |
//! | `v19_convert_bag`             | `bag`             |
//! | `v19_convert_storage`         | `storage_system`  |
//!
//! Legacy references that no longer exist are dropped where the engine
//! treats them as optional (stored items, registered items) and are fatal
//! where it does not (species, trainer types, mail items).

use std::sync::Arc;

use tracing::warn;

use crate::config::SaveMigConfig;
use crate::conversion::Conversion;
use crate::error::{Result, SaveError};
use crate::game_data::{DataRef, GameData};
use crate::model::bag::DEFAULT_REGISTERED_INDEX;
use crate::model::metadata::ItemStack;
use crate::model::pokemon::upgrade_all;
use crate::model::{
    Bag, DexContext, GlobalMetadata, Options, OptionsSlot, PlayerSlot, PokemonStorage, RegionMode,
};
use crate::record::{slots, SaveRecord};
use crate::registry::ConversionRegistry;
use crate::version::{EngineVersions, Version};

/// Engine release the built-in conversions upgrade to.
pub const RELEASE_19: u64 = 19;

/// Names of the built-in conversions, in registration order.
pub const BUILTIN_CONVERSIONS: [&str; 8] = [
    "v19_define_versions",
    "v19_convert_PokemonSystem",
    "v19_move_pokedex_flag",
    "v19_convert_player",
    "v19_move_pokedex_dex_data",
    "v19_convert_global_metadata",
    "v19_convert_bag",
    "v19_convert_storage",
];

/// Everything the built-in conversions read besides the save itself.
#[derive(Debug, Clone)]
pub struct BuiltinSettings {
    /// Game data legacy references are resolved against.
    pub data: Arc<GameData>,
    /// Versions written into saves that have no stamps.
    pub versions: EngineVersions,
    /// Pokédex viewing policy for converted Pokédexes.
    pub region_mode: RegionMode,
    /// Options for fields a legacy options value lacks.
    pub default_options: Options,
}

impl BuiltinSettings {
    /// Stock settings around `data`.
    #[must_use]
    pub fn new(data: Arc<GameData>) -> Self {
        Self {
            data,
            versions: EngineVersions::default(),
            region_mode: RegionMode::default(),
            default_options: Options::default(),
        }
    }

    /// Settings taken from a loaded configuration.
    #[must_use]
    pub fn from_config(data: Arc<GameData>, config: &SaveMigConfig) -> Self {
        Self {
            data,
            versions: config.engine_versions(),
            region_mode: config.dex_settings(),
            default_options: config.default_options(),
        }
    }
}

/// Register every built-in conversion.
///
/// # Errors
/// Returns [`SaveError::DuplicateConversion`] if any built-in name is
/// already taken.
pub fn register_builtin(registry: &mut ConversionRegistry, settings: &BuiltinSettings) -> Result<()> {
    registry.register(define_versions(settings.versions.clone())?)?;
    registry.register(convert_pokemon_system(settings.default_options.clone())?)?;
    registry.register(move_pokedex_flag()?)?;
    registry.register(convert_player(Arc::clone(&settings.data), settings.region_mode)?)?;
    registry.register(move_pokedex_dex_data(Arc::clone(&settings.data), settings.region_mode)?)?;
    registry.register(convert_global_metadata(Arc::clone(&settings.data))?)?;
    registry.register(convert_bag(Arc::clone(&settings.data))?)?;
    registry.register(convert_storage(Arc::clone(&settings.data))?)?;
    Ok(())
}

/// A registry holding only the built-in conversions.
///
/// # Errors
/// See [`register_builtin`].
pub fn builtin_registry(settings: &BuiltinSettings) -> Result<ConversionRegistry> {
    let mut registry = ConversionRegistry::new();
    register_builtin(&mut registry, settings)?;
    Ok(registry)
}

fn release_19() -> Version {
    Version::from(RELEASE_19)
}

fn missing(slot: &str) -> SaveError {
    SaveError::MissingSlot {
        slot: slot.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Whole-record conversions
// ---------------------------------------------------------------------------

fn define_versions(versions: EngineVersions) -> Result<Conversion> {
    Conversion::builder("v19_define_versions")
        .essentials_version(release_19())
        .title("Adding game version and Essentials version to save data")
        .to_all(move |mut record: SaveRecord| {
            record
                .essentials_version
                .get_or_insert_with(|| versions.essentials.clone());
            record.game_version.get_or_insert_with(|| versions.game.clone());
            Ok(record)
        })
}

fn convert_pokemon_system(defaults: Options) -> Result<Conversion> {
    Conversion::builder("v19_convert_PokemonSystem")
        .essentials_version(release_19())
        .title("Updating PokemonSystem class")
        .to_all(move |mut record: SaveRecord| {
            let options = record
                .pokemon_system
                .take()
                .ok_or_else(|| missing(slots::POKEMON_SYSTEM))?;
            record.pokemon_system = Some(OptionsSlot::Current(options.into_current(&defaults)));
            Ok(record)
        })
}

fn move_pokedex_flag() -> Result<Conversion> {
    Conversion::builder("v19_move_pokedex_flag")
        .essentials_version(release_19())
        .title("Moving Pokédex flag")
        .to_all(|mut record: SaveRecord| {
            let player = record.player.as_mut().ok_or_else(|| missing(slots::PLAYER))?;
            // A trainer already in the current shape has no flag to move.
            if player.is_current() {
                return Ok(record);
            }
            let flag = player.take_pokedex_flag();
            let global = record
                .global_metadata
                .as_mut()
                .ok_or_else(|| missing(slots::GLOBAL_METADATA))?;
            global.pokedex_access = flag.unwrap_or(false);
            Ok(record)
        })
}

fn convert_player(data: Arc<GameData>, mode: RegionMode) -> Result<Conversion> {
    Conversion::builder("v19_convert_player")
        .essentials_version(release_19())
        .title("Converting player trainer class")
        .to_all(move |mut record: SaveRecord| {
            let player = record.player.take().ok_or_else(|| missing(slots::PLAYER))?;
            let converted = match player {
                PlayerSlot::Current(player) => player,
                PlayerSlot::Legacy(legacy) => {
                    let ctx = DexContext { data: &data, mode };
                    legacy.into_player(&ctx)?
                }
            };
            record.player = Some(PlayerSlot::Current(converted));
            Ok(record)
        })
}

fn move_pokedex_dex_data(data: Arc<GameData>, mode: RegionMode) -> Result<Conversion> {
    Conversion::builder("v19_move_pokedex_dex_data")
        .essentials_version(release_19())
        .title("Moving unlocked dexes from global metadata to PlayerTrainer::Pokedex")
        .to_all(move |mut record: SaveRecord| {
            let global = record
                .global_metadata
                .as_mut()
                .ok_or_else(|| missing(slots::GLOBAL_METADATA))?;
            let unlocked = global.pokedex_unlocked.take();
            global.pokedex_viable = None;

            if let Some(unlocked) = unlocked {
                let pokedex = record
                    .player
                    .as_mut()
                    .and_then(PlayerSlot::pokedex_mut)
                    .ok_or_else(|| SaveError::MalformedSlot {
                        slot: slots::PLAYER.to_string(),
                        reason: "player has no Pokédex to receive unlocked dexes".to_string(),
                    })?;
                let ctx = DexContext { data: &data, mode };
                pokedex.set_unlocked_dexes(unlocked, &ctx);
            }
            Ok(record)
        })
}

// ---------------------------------------------------------------------------
// Single-slot conversions
// ---------------------------------------------------------------------------

fn convert_global_metadata(data: Arc<GameData>) -> Result<Conversion> {
    Conversion::builder("v19_convert_global_metadata")
        .essentials_version(release_19())
        .title("Adding encounter version variable to global metadata")
        .to_value(move |mut global: GlobalMetadata| {
            global.bridge.get_or_insert(0);
            global.encounter_version.get_or_insert(0);

            if let Some(storage) = global.pc_item_storage.as_mut() {
                let dropped = remap_and_compact_items(&mut storage.items, &data);
                if dropped > 0 {
                    warn!(dropped, "Dropped unknown items from PC item storage");
                }
            }
            if let Some(mailbox) = global.mailbox.as_mut() {
                for mail in mailbox.iter_mut().flatten() {
                    mail.item = DataRef::Id(data.item(&mail.item)?.id.clone());
                    upgrade_all(&mut mail.pokemon, &data)?;
                }
            }
            if let Some(partner) = global.partner.as_mut() {
                partner.trainer_type = DataRef::Id(data.trainer_type(&partner.trainer_type)?.id.clone());
                upgrade_all(&mut partner.party, &data)?;
            }
            if let Some(daycare) = global.daycare.as_mut() {
                for pokemon in daycare.iter_mut().flatten().filter_map(|slot| slot.pokemon.as_mut()) {
                    pokemon.upgrade(&data)?;
                }
            }
            if let Some(roamers) = global.roam_pokemon.as_mut() {
                upgrade_all(roamers, &data)?;
            }
            if let Some(hall_of_fame) = global.hall_of_fame.as_mut() {
                for team in hall_of_fame.iter_mut().flatten() {
                    upgrade_all(team, &data)?;
                }
            }
            if let Some(triads) = global.triads.as_mut() {
                for card in triads.items.iter_mut().flatten() {
                    if !card.species.is_empty_sentinel() {
                        card.species = DataRef::Id(data.species(&card.species)?.id.clone());
                    }
                }
            }
            Ok(global)
        })
}

fn convert_bag(data: Arc<GameData>) -> Result<Conversion> {
    Conversion::builder("v19_convert_bag")
        .essentials_version(release_19())
        .title("Converting item IDs in Bag")
        .to_value(move |mut bag: Bag| {
            let mut dropped = 0;
            for pocket in &mut bag.pockets {
                dropped += remap_and_compact_items(pocket, &data);
            }

            // Each registered entry is rewritten in place; the `0` placeholder
            // and unknown items become empty and are compacted away.
            let registered = std::mem::take(&mut bag.registered_items);
            let before = registered.iter().flatten().count();
            bag.registered_items = registered
                .into_iter()
                .flatten()
                .filter(|item| !item.is_empty_sentinel())
                .filter_map(|item| data.try_item(&item).map(|i| Some(DataRef::Id(i.id.clone()))))
                .collect();
            dropped += before - bag.registered_items.len();

            bag.registered_index.get_or_insert(DEFAULT_REGISTERED_INDEX);

            if dropped > 0 {
                warn!(dropped, "Dropped unknown items from the bag");
            }
            Ok(bag)
        })
}

fn convert_storage(data: Arc<GameData>) -> Result<Conversion> {
    Conversion::builder("v19_convert_storage")
        .essentials_version(release_19())
        .title("Converting classes of Pokémon in storage")
        .to_value(move |mut storage: PokemonStorage| {
            for pokemon_box in &mut storage.boxes {
                upgrade_all(&mut pokemon_box.pokemon, &data)?;
            }
            Ok(storage)
        })
}

/// Rewrite stacks to canonical item ids, dropping unknown items. Stacks
/// holding the `0` placeholder are kept as they are.
fn remap_and_compact_items(stacks: &mut Vec<Option<ItemStack>>, data: &GameData) -> usize {
    crate::transforms::remap_and_compact(stacks, |stack| {
        if stack.item.is_empty_sentinel() {
            return Some(stack);
        }
        data.try_item(&stack.item).map(|item| ItemStack {
            item: DataRef::Id(item.id.clone()),
            quantity: stack.quantity,
        })
    })
}
