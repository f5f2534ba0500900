//! Player options — the `pokemon_system` slot.
//!
//! Release 18 saves store an options object whose fields may be missing;
//! release 19 replaced it with a fully populated [`Options`].

use serde::{Deserialize, Serialize};

/// Current-shape player options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Text speed (0 = slow, 1 = normal, 2 = fast).
    pub text_speed: u8,
    /// Battle animations (0 = on, 1 = off).
    pub battle_scene: u8,
    /// Battle style (0 = switch, 1 = set).
    pub battle_style: u8,
    /// Window frame index.
    pub frame: u8,
    /// Speech frame index.
    pub text_skin: u8,
    /// Font index.
    pub font: u8,
    /// Screen size index.
    pub screen_size: u8,
    /// Language index.
    pub language: u8,
    /// Default movement (0 = walk, 1 = run).
    pub run_style: u8,
    /// Background music volume, 0–100.
    pub bgm_volume: u8,
    /// Sound effect volume, 0–100.
    pub se_volume: u8,
    /// Text entry mode (0 = cursor, 1 = keyboard).
    pub text_input: u8,
}

impl Options {
    /// Stock options for a game rendered at `screen_scale`.
    #[must_use]
    pub fn with_screen_scale(screen_scale: f32) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let screen_size = ((f64::from(screen_scale) * 2.0).floor() - 1.0).clamp(0.0, 255.0) as u8;
        Self {
            text_speed: 1,
            battle_scene: 0,
            battle_style: 0,
            frame: 0,
            text_skin: 0,
            font: 0,
            screen_size,
            language: 0,
            run_style: 0,
            bgm_volume: 100,
            se_volume: 100,
            text_input: 0,
        }
    }

    /// Structural upcast: carry every field the legacy value has, take the
    /// rest from `defaults`.
    #[must_use]
    pub fn upcast(legacy: &LegacyOptions, defaults: &Self) -> Self {
        Self {
            text_speed: legacy.text_speed.unwrap_or(defaults.text_speed),
            battle_scene: legacy.battle_scene.unwrap_or(defaults.battle_scene),
            battle_style: legacy.battle_style.unwrap_or(defaults.battle_style),
            frame: legacy.frame.unwrap_or(defaults.frame),
            text_skin: legacy.text_skin.unwrap_or(defaults.text_skin),
            font: legacy.font.unwrap_or(defaults.font),
            screen_size: legacy.screen_size.unwrap_or(defaults.screen_size),
            language: legacy.language.unwrap_or(defaults.language),
            run_style: legacy.run_style.unwrap_or(defaults.run_style),
            bgm_volume: legacy.bgm_volume.unwrap_or(defaults.bgm_volume),
            se_volume: legacy.se_volume.unwrap_or(defaults.se_volume),
            text_input: legacy.text_input.unwrap_or(defaults.text_input),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::with_screen_scale(1.0)
    }
}

/// Release-18 options: any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyOptions {
    /// Text speed.
    pub text_speed: Option<u8>,
    /// Battle animations.
    pub battle_scene: Option<u8>,
    /// Battle style.
    pub battle_style: Option<u8>,
    /// Window frame index.
    pub frame: Option<u8>,
    /// Speech frame index.
    pub text_skin: Option<u8>,
    /// Font index.
    pub font: Option<u8>,
    /// Screen size index.
    pub screen_size: Option<u8>,
    /// Language index.
    pub language: Option<u8>,
    /// Default movement.
    pub run_style: Option<u8>,
    /// Background music volume.
    pub bgm_volume: Option<u8>,
    /// Sound effect volume.
    pub se_volume: Option<u8>,
    /// Text entry mode.
    pub text_input: Option<u8>,
}

/// The `pokemon_system` slot in either shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OptionsSlot {
    /// Not yet converted.
    Legacy(LegacyOptions),
    /// Current shape.
    Current(Options),
}

impl OptionsSlot {
    /// Convert to the current shape. Current values are returned unchanged.
    #[must_use]
    pub fn into_current(self, defaults: &Options) -> Options {
        match self {
            Self::Legacy(legacy) => Options::upcast(&legacy, defaults),
            Self::Current(options) => options,
        }
    }
}
