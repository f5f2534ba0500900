//! Configuration for save conversion.
//!
//! Maps directly to `savemig.toml`. Every section and field is optional.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaveError};
use crate::model::{Options, RegionMode};
use crate::version::{EngineVersions, Version};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveMigConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Running versions and unstamped assumptions.
    #[serde(default)]
    pub versions: VersionsConfig,
    /// Pokédex viewing policy.
    #[serde(default)]
    pub pokedex: PokedexConfig,
    /// Defaults for the options upcast.
    #[serde(default)]
    pub options: OptionsConfig,
}

impl SaveMigConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `SaveError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| SaveError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The versions a conversion run targets.
    #[must_use]
    pub fn engine_versions(&self) -> EngineVersions {
        EngineVersions {
            essentials: self.versions.essentials.clone(),
            game: self.versions.game.clone(),
            unstamped_essentials: self.versions.unstamped_essentials.clone(),
            unstamped_game: self.versions.unstamped_game.clone(),
        }
    }

    /// How the Pokédex decides which dexes are viewable.
    #[must_use]
    pub fn dex_settings(&self) -> RegionMode {
        if self.pokedex.use_current_region_dex {
            RegionMode::CurrentRegion(self.pokedex.current_region)
        } else {
            RegionMode::AllUnlocked
        }
    }

    /// Options used for fields a legacy save does not have.
    #[must_use]
    pub fn default_options(&self) -> Options {
        Options::with_screen_scale(self.options.screen_scale)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Running versions and what unstamped saves are assumed to be.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsConfig {
    /// Release of the running engine.
    #[serde(default = "default_essentials")]
    pub essentials: Version,
    /// Release of the running game.
    #[serde(default = "default_game")]
    pub game: Version,
    /// Engine release assumed for saves with no engine stamp.
    #[serde(default = "default_unstamped_essentials")]
    pub unstamped_essentials: Version,
    /// Game release assumed for saves with no game stamp.
    #[serde(default = "default_unstamped_game")]
    pub unstamped_game: Version,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            essentials: default_essentials(),
            game: default_game(),
            unstamped_essentials: default_unstamped_essentials(),
            unstamped_game: default_unstamped_game(),
        }
    }
}

/// Pokédex viewing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokedexConfig {
    /// Only show the dex of the region the player is in.
    #[serde(default)]
    pub use_current_region_dex: bool,
    /// Region the player is in; `-1` is national.
    #[serde(default = "default_region")]
    pub current_region: i32,
}

impl Default for PokedexConfig {
    fn default() -> Self {
        Self {
            use_current_region_dex: false,
            current_region: default_region(),
        }
    }
}

/// Defaults for the options upcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Game screen scale; decides the default screen size option.
    #[serde(default = "default_1_0")]
    pub screen_scale: f32,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            screen_scale: default_1_0(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_essentials() -> Version { Version::from_segments([19, 1]) }
fn default_game() -> Version { Version::from_segments([1, 0, 0]) }
fn default_unstamped_essentials() -> Version { Version::from_segments([18, 1]) }
fn default_unstamped_game() -> Version { Version::from_segments([0, 0, 0]) }
fn default_region() -> i32 { -1 }
fn default_1_0() -> f32 { 1.0 }
