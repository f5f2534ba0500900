//! Static game data the conversions resolve legacy references against.
//!
//! Old saves refer to items, species and trainer types by number; current
//! saves use symbolic ids (`"POTION"`, `"BULBASAUR"`). A [`GameData`] indexes
//! each table both ways so a conversion can rewrite a legacy reference to its
//! canonical id, or find that the entry no longer exists.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaveError};

// ---------------------------------------------------------------------------
// DataRef
// ---------------------------------------------------------------------------

/// A reference to a game-data entry as stored in a save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataRef {
    /// Legacy numeric id. `0` means "no entry".
    Number(u32),
    /// Canonical symbolic id.
    Id(String),
}

impl DataRef {
    /// Whether this is the legacy `0` placeholder for an empty entry.
    #[must_use]
    pub fn is_empty_sentinel(&self) -> bool {
        matches!(self, Self::Number(0))
    }

    /// The symbolic id, if this reference is already canonical.
    #[must_use]
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for DataRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "#{n}"),
            Self::Id(id) => write!(f, ":{id}"),
        }
    }
}

impl From<u32> for DataRef {
    fn from(n: u32) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for DataRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// An item definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    /// Canonical id.
    pub id: String,
    /// Legacy numeric id.
    pub id_number: u32,
}

/// A species (or alternate form) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    /// Canonical id of this entry (`"VENUSAUR"`, `"VENUSAUR_1"`).
    pub id: String,
    /// Canonical id of the base species this entry is a form of.
    pub species: String,
    /// Form number; 0 for the base form.
    #[serde(default)]
    pub form: u8,
    /// Legacy numeric id.
    pub id_number: u32,
}

/// A trainer type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerTypeData {
    /// Canonical id.
    pub id: String,
    /// Legacy numeric id.
    pub id_number: u32,
}

/// Access to the two keys every table is indexed by.
trait Keyed {
    fn key(&self) -> &str;
    fn number(&self) -> u32;
}

impl Keyed for ItemData {
    fn key(&self) -> &str {
        &self.id
    }
    fn number(&self) -> u32 {
        self.id_number
    }
}

impl Keyed for SpeciesData {
    fn key(&self) -> &str {
        &self.id
    }
    fn number(&self) -> u32 {
        self.id_number
    }
}

impl Keyed for TrainerTypeData {
    fn key(&self) -> &str {
        &self.id
    }
    fn number(&self) -> u32 {
        self.id_number
    }
}

/// One data table indexed by canonical id and legacy number.
#[derive(Debug, Clone)]
struct Table<T> {
    entries: Vec<T>,
    by_id: HashMap<String, usize>,
    by_number: HashMap<u32, usize>,
}

impl<T: Keyed> Table<T> {
    fn new(entries: Vec<T>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_number = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            by_id.insert(entry.key().to_string(), i);
            by_number.insert(entry.number(), i);
        }
        Self {
            entries,
            by_id,
            by_number,
        }
    }

    fn get(&self, reference: &DataRef) -> Option<&T> {
        let index = match reference {
            DataRef::Number(n) => self.by_number.get(n),
            DataRef::Id(id) => self.by_id.get(id),
        }?;
        self.entries.get(*index)
    }
}

// ---------------------------------------------------------------------------
// GameData
// ---------------------------------------------------------------------------

/// On-disk layout of a game-data file.
#[derive(Debug, Default, Deserialize)]
struct GameDataFile {
    #[serde(default)]
    items: Vec<ItemData>,
    #[serde(default)]
    species: Vec<SpeciesData>,
    #[serde(default)]
    trainer_types: Vec<TrainerTypeData>,
    #[serde(default)]
    regional_dexes: Vec<Vec<String>>,
}

/// Indexed static game data.
///
/// Built once at startup and shared read-only by every conversion that
/// needs it.
#[derive(Debug, Clone)]
pub struct GameData {
    items: Table<ItemData>,
    species: Table<SpeciesData>,
    trainer_types: Table<TrainerTypeData>,
    regional_dexes: Vec<Vec<String>>,
}

impl Default for GameData {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

impl GameData {
    /// Index the given tables. `regional_dexes[i]` lists the species ids of
    /// regional dex `i`, in dex order.
    #[must_use]
    pub fn new(
        items: Vec<ItemData>,
        species: Vec<SpeciesData>,
        trainer_types: Vec<TrainerTypeData>,
        regional_dexes: Vec<Vec<String>>,
    ) -> Self {
        Self {
            items: Table::new(items),
            species: Table::new(species),
            trainer_types: Table::new(trainer_types),
            regional_dexes,
        }
    }

    /// Load game data from a TOML document with `items`, `species`,
    /// `trainer_types` and `regional_dexes` arrays.
    ///
    /// # Errors
    /// Returns [`SaveError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let file: GameDataFile =
            toml::from_str(toml_str).map_err(|e| SaveError::Config(e.to_string()))?;
        Ok(Self::new(
            file.items,
            file.species,
            file.trainer_types,
            file.regional_dexes,
        ))
    }

    /// Look up an item, returning `None` when it does not exist.
    #[must_use]
    pub fn try_item(&self, reference: &DataRef) -> Option<&ItemData> {
        self.items.get(reference)
    }

    /// Look up a species or form, returning `None` when it does not exist.
    #[must_use]
    pub fn try_species(&self, reference: &DataRef) -> Option<&SpeciesData> {
        self.species.get(reference)
    }

    /// Look up a trainer type, returning `None` when it does not exist.
    #[must_use]
    pub fn try_trainer_type(&self, reference: &DataRef) -> Option<&TrainerTypeData> {
        self.trainer_types.get(reference)
    }

    /// Look up an item.
    ///
    /// # Errors
    /// Returns [`SaveError::UnresolvableReference`] when it does not exist.
    pub fn item(&self, reference: &DataRef) -> Result<&ItemData> {
        self.try_item(reference)
            .ok_or_else(|| unresolvable("item", reference))
    }

    /// Look up a species or form.
    ///
    /// # Errors
    /// Returns [`SaveError::UnresolvableReference`] when it does not exist.
    pub fn species(&self, reference: &DataRef) -> Result<&SpeciesData> {
        self.try_species(reference)
            .ok_or_else(|| unresolvable("species", reference))
    }

    /// Look up a trainer type.
    ///
    /// # Errors
    /// Returns [`SaveError::UnresolvableReference`] when it does not exist.
    pub fn trainer_type(&self, reference: &DataRef) -> Result<&TrainerTypeData> {
        self.try_trainer_type(reference)
            .ok_or_else(|| unresolvable("trainer type", reference))
    }

    /// All species entries, forms included, in definition order.
    pub fn all_species(&self) -> impl Iterator<Item = &SpeciesData> {
        self.species.entries.iter()
    }

    /// Number of regional dexes (the national dex is not counted).
    #[must_use]
    pub fn regional_dex_count(&self) -> usize {
        self.regional_dexes.len()
    }

    /// Species ids of regional dex `region`; empty if there is no such dex.
    #[must_use]
    pub fn regional_dex(&self, region: usize) -> &[String] {
        self.regional_dexes
            .get(region)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn unresolvable(kind: &'static str, reference: &DataRef) -> SaveError {
    SaveError::UnresolvableReference {
        kind,
        reference: reference.to_string(),
    }
}
