//! The player's Pokédex.
//!
//! Tracks seen, owned and Shadow-owned species, which forms and genders
//! have been seen, and which dex lists are unlocked. Dex `i` is regional dex
//! `i`; the last unlocked-dex position is the national dex. Region `-1`
//! always means national.
//!
//! Every entry is keyed by canonical base species id, so species references
//! are resolved through [`GameData`] first. References that do not resolve
//! are ignored by setters and read as unseen by queries.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::game_data::{DataRef, GameData};

/// National dex pseudo-region.
pub const NATIONAL: i32 = -1;

/// How the list of viewable dexes is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionMode {
    /// Every unlocked dex with a seen species is viewable.
    #[default]
    AllUnlocked,
    /// Only the dex of the region the player is in is viewable.
    CurrentRegion(i32),
}

/// Everything a Pokédex needs from the outside world to refresh itself.
#[derive(Debug, Clone, Copy)]
pub struct DexContext<'a> {
    /// Species and regional dex lists.
    pub data: &'a GameData,
    /// Viewable-dex policy.
    pub mode: RegionMode,
}

/// The player's Pokédex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokedex {
    seen: BTreeSet<String>,
    owned: BTreeSet<String>,
    /// species → [male/genderless forms, female forms]
    seen_forms: BTreeMap<String, [Vec<bool>; 2]>,
    /// species → (gender, form)
    last_seen_forms: BTreeMap<String, (u8, u8)>,
    owned_shadow: BTreeSet<String>,
    unlocked_dexes: Vec<bool>,
    viable_dexes: Vec<i32>,
}

impl Pokedex {
    /// An empty Pokédex with only dex 0 unlocked. The unlocked list has one
    /// position per regional dex plus the national dex.
    #[must_use]
    pub fn new(regional_dex_count: usize) -> Self {
        Self {
            seen: BTreeSet::new(),
            owned: BTreeSet::new(),
            seen_forms: BTreeMap::new(),
            last_seen_forms: BTreeMap::new(),
            owned_shadow: BTreeSet::new(),
            unlocked_dexes: (0..=regional_dex_count).map(|i| i == 0).collect(),
            viable_dexes: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Seen / owned
    // ------------------------------------------------------------------

    /// Mark a species as seen.
    pub fn set_seen(&mut self, species: &DataRef, ctx: &DexContext<'_>) {
        let Some(id) = base_species(species, ctx.data) else {
            return;
        };
        self.seen.insert(id);
        self.refresh_viable_dexes(ctx);
    }

    /// Whether a species has been seen.
    #[must_use]
    pub fn is_seen(&self, species: &DataRef, data: &GameData) -> bool {
        base_species(species, data).is_some_and(|id| self.seen.contains(&id))
    }

    /// Mark a species as owned.
    pub fn set_owned(&mut self, species: &DataRef, ctx: &DexContext<'_>) {
        let Some(id) = base_species(species, ctx.data) else {
            return;
        };
        self.owned.insert(id);
        self.refresh_viable_dexes(ctx);
    }

    /// Whether a species has been owned.
    #[must_use]
    pub fn is_owned(&self, species: &DataRef, data: &GameData) -> bool {
        base_species(species, data).is_some_and(|id| self.owned.contains(&id))
    }

    /// Whether anything in `region` (or anything at all, for [`NATIONAL`])
    /// has been seen.
    #[must_use]
    pub fn seen_any(&self, region: i32, data: &GameData) -> bool {
        count_in_region(&self.seen, region, data) > 0
    }

    /// Number of seen species in `region`.
    #[must_use]
    pub fn seen_count(&self, region: i32, data: &GameData) -> usize {
        count_in_region(&self.seen, region, data)
    }

    /// Number of owned species in `region`.
    #[must_use]
    pub fn owned_count(&self, region: i32, data: &GameData) -> usize {
        count_in_region(&self.owned, region, data)
    }

    // ------------------------------------------------------------------
    // Forms and Shadow Pokémon
    // ------------------------------------------------------------------

    /// Replace the seen-forms record of a species.
    pub fn record_seen_forms(&mut self, species_id: impl Into<String>, forms: [Vec<bool>; 2]) {
        self.seen_forms.insert(species_id.into(), forms);
    }

    /// Seen-forms record of a species, if any.
    #[must_use]
    pub fn seen_forms(&self, species_id: &str) -> Option<&[Vec<bool>; 2]> {
        self.seen_forms.get(species_id)
    }

    /// Number of distinct forms of a species seen in either gender.
    #[must_use]
    pub fn seen_forms_count(&self, species: &DataRef, data: &GameData) -> usize {
        let Some(id) = base_species(species, data) else {
            return 0;
        };
        let Some([male, female]) = self.seen_forms.get(&id) else {
            return 0;
        };
        (0..male.len().max(female.len()))
            .filter(|&i| male.get(i).copied().unwrap_or(false) || female.get(i).copied().unwrap_or(false))
            .count()
    }

    /// Record the gender and form a species was last seen as.
    pub fn record_last_seen_form(&mut self, species_id: impl Into<String>, gender: u8, form: u8) {
        self.last_seen_forms.insert(species_id.into(), (gender, form));
    }

    /// Gender and form a species was last seen as.
    #[must_use]
    pub fn last_seen_form(&self, species_id: &str) -> Option<(u8, u8)> {
        self.last_seen_forms.get(species_id).copied()
    }

    /// Record that a Shadow form of a species has been owned.
    pub fn set_owned_shadow(&mut self, species_id: impl Into<String>) {
        self.owned_shadow.insert(species_id.into());
    }

    /// Whether a Shadow form of a species has been owned.
    #[must_use]
    pub fn is_owned_shadow(&self, species_id: &str) -> bool {
        self.owned_shadow.contains(species_id)
    }

    // ------------------------------------------------------------------
    // Dex lists
    // ------------------------------------------------------------------

    /// Whether dex `dex` is unlocked.
    #[must_use]
    pub fn is_unlocked(&self, dex: usize) -> bool {
        self.unlocked_dexes.get(dex).copied().unwrap_or(false)
    }

    /// Unlock a dex. Negative or out-of-range ids unlock the national dex.
    pub fn unlock_dex(&mut self, dex: i32, ctx: &DexContext<'_>) {
        self.set_dex_lock(dex, true, ctx);
    }

    /// Lock a dex. Negative or out-of-range ids lock the national dex.
    pub fn lock_dex(&mut self, dex: i32, ctx: &DexContext<'_>) {
        self.set_dex_lock(dex, false, ctx);
    }

    fn set_dex_lock(&mut self, dex: i32, unlocked: bool, ctx: &DexContext<'_>) {
        let Some(national) = self.unlocked_dexes.len().checked_sub(1) else {
            return;
        };
        let index = usize::try_from(dex)
            .ok()
            .filter(|&i| i <= national)
            .unwrap_or(national);
        self.unlocked_dexes[index] = unlocked;
        self.refresh_viable_dexes(ctx);
    }

    /// Replace the whole unlocked-dex list, then refresh viable dexes.
    pub fn set_unlocked_dexes(&mut self, unlocked: Vec<bool>, ctx: &DexContext<'_>) {
        self.unlocked_dexes = unlocked;
        self.refresh_viable_dexes(ctx);
    }

    /// The unlocked flag of every dex position.
    #[must_use]
    pub fn unlocked_dexes(&self) -> &[bool] {
        &self.unlocked_dexes
    }

    /// Number of unlocked dexes.
    #[must_use]
    pub fn unlocked_dex_count(&self) -> usize {
        self.unlocked_dexes.iter().filter(|&&u| u).count()
    }

    /// Dexes that can currently be viewed.
    #[must_use]
    pub fn viable_dexes(&self) -> &[i32] {
        &self.viable_dexes
    }

    /// Number of dexes that can currently be viewed.
    #[must_use]
    pub fn viable_dex_count(&self) -> usize {
        self.viable_dexes.len()
    }

    /// Recompute which dexes can be viewed: unlocked and with at least one
    /// seen species. Decides whether the Pokédex shows in the pause menu.
    pub fn refresh_viable_dexes(&mut self, ctx: &DexContext<'_>) {
        self.viable_dexes.clear();
        let dex_count = self.unlocked_dex_count();

        if let RegionMode::CurrentRegion(current) = ctx.mode {
            let last = i32::try_from(dex_count).unwrap_or(i32::MAX) - 1;
            let region = if current >= last { NATIONAL } else { current };
            if self.seen_any(region, ctx.data) {
                self.viable_dexes.push(region);
            }
            return;
        }

        if dex_count == 1 {
            if self.is_unlocked(0) && self.seen_any(NATIONAL, ctx.data) {
                self.viable_dexes.push(0);
            }
            return;
        }

        for i in 0..dex_count {
            let region = if i == dex_count - 1 {
                NATIONAL
            } else {
                i32::try_from(i).unwrap_or(NATIONAL)
            };
            if self.is_unlocked(i) && self.seen_any(region, ctx.data) {
                self.viable_dexes.push(i32::try_from(i).unwrap_or(NATIONAL));
            }
        }
    }

    /// Forget everything seen and owned. Unlocked dexes are kept.
    pub fn clear(&mut self, ctx: &DexContext<'_>) {
        self.seen.clear();
        self.owned.clear();
        self.seen_forms.clear();
        self.last_seen_forms.clear();
        self.owned_shadow.clear();
        self.refresh_viable_dexes(ctx);
    }
}

/// Canonical base species id of a reference, if it resolves.
fn base_species(species: &DataRef, data: &GameData) -> Option<String> {
    data.try_species(species).map(|s| s.species.clone())
}

fn count_in_region(set: &BTreeSet<String>, region: i32, data: &GameData) -> usize {
    match usize::try_from(region) {
        Ok(region) => data
            .regional_dex(region)
            .iter()
            .filter(|id| set.contains(*id))
            .count(),
        Err(_) => data
            .all_species()
            .filter(|s| s.form == 0 && set.contains(&s.species))
            .count(),
    }
}
