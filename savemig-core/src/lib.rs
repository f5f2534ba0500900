//! # savemig Core Library
//!
//! Versioned save-data conversion for an RPG engine: every save written by
//! an older release still loads in the current one.
//!
//! A loaded save is a [`SaveRecord`] carrying two version stamps, one for
//! the engine and one for the game. Engine and game authors register
//! named [`Conversion`]s, each gated on a minimum version, in a
//! [`ConversionRegistry`]. When a save loads, [`ConversionRegistry::run`]
//! applies every conversion the save is too old for, in version order,
//! and restamps the save.
//!
//! - **Whole-record** conversions see the full record.
//! - **Single-slot** conversions see one slot and return its replacement.
//! - **Built-ins** ([`builtin`]) upgrade release-18 saves to release 19.
//!
//! The library never touches disk: reading and writing saves is the
//! host's job. All record types are plain serde data.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builtin;
pub mod config;
pub mod conversion;
pub mod error;
pub mod game_data;
pub mod model;
pub mod record;
pub mod registry;
pub mod telemetry;
pub mod transforms;
pub mod version;

pub use builtin::{builtin_registry, register_builtin, BuiltinSettings};
pub use config::SaveMigConfig;
pub use conversion::{Conversion, ConversionBuilder, Target, Trigger};
pub use error::{Result, SaveError};
pub use game_data::{DataRef, GameData};
pub use record::{SaveRecord, SaveSlot};
pub use registry::{ConversionRegistry, MigrationReport};
pub use version::{EngineVersions, Version};
