//! The conversion registry and runner.
//!
//! Conversions are registered once at startup. [`ConversionRegistry::run`]
//! then brings any loaded save up to the running engine and game versions:
//!
//! 1. The save's stamps are read once, up front. A missing stamp assumes the
//!    configured unstamped version.
//! 2. Every conversion whose threshold is above the relevant stamp runs, in
//!    execution order (engine conversions first, then game conversions, each
//!    by ascending threshold, ties in registration order).
//! 3. Both stamps are set to the running versions.
//!
//! A failing conversion aborts the run. Conversions that already ran stay
//! applied; the caller decides whether to discard the record.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::conversion::{Conversion, Trigger};
use crate::error::{Result, SaveError};
use crate::record::SaveRecord;
use crate::version::{EngineVersions, Version};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Conversions that ran, in execution order.
    pub applied: Vec<String>,
    /// Conversions that were not needed, in execution order.
    pub skipped: Vec<String>,
    /// Engine stamp before the run (after unstamped defaulting).
    pub from_essentials: Version,
    /// Game stamp before the run (after unstamped defaulting).
    pub from_game: Version,
    /// Engine stamp after the run.
    pub to_essentials: Version,
    /// Game stamp after the run.
    pub to_game: Version,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Wall-clock duration of the run in microseconds.
    pub elapsed_us: u64,
}

impl MigrationReport {
    /// Whether any conversion ran.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// A conversion the next run would apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConversion<'a> {
    /// Conversion name.
    pub name: &'a str,
    /// Conversion title.
    pub title: &'a str,
}

/// Ordered collection of named conversions.
#[derive(Debug, Default)]
pub struct ConversionRegistry {
    conversions: Vec<Conversion>,
}

impl ConversionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a conversion.
    ///
    /// # Errors
    /// Returns [`SaveError::DuplicateConversion`] if a conversion with the
    /// same name is already registered.
    pub fn register(&mut self, conversion: Conversion) -> Result<()> {
        if self.get(conversion.name()).is_some() {
            return Err(SaveError::DuplicateConversion(conversion.name().to_string()));
        }
        debug!(
            conversion = conversion.name(),
            trigger = %conversion.trigger(),
            "Registered conversion"
        );
        self.conversions.push(conversion);
        Ok(())
    }

    /// Number of registered conversions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    /// Whether no conversions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }

    /// Look up a conversion by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Conversion> {
        self.conversions.iter().find(|c| c.name() == name)
    }

    /// Conversions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.conversions.iter()
    }

    /// Conversions in execution order.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Conversion> {
        let mut ordered: Vec<&Conversion> = self.conversions.iter().collect();
        // Stable sort keeps registration order among equal triggers.
        ordered.sort_by(|a, b| a.trigger().cmp(b.trigger()));
        ordered
    }

    /// The conversions a run would apply to `record`, in execution order.
    ///
    /// # Errors
    /// Returns [`SaveError::Config`] if a conversion's threshold is above
    /// the running version it is compared against.
    pub fn pending(&self, record: &SaveRecord, versions: &EngineVersions) -> Result<Vec<PendingConversion<'_>>> {
        self.check_thresholds(versions)?;
        let essentials = record.essentials_stamp(versions);
        let game = record.game_stamp(versions);
        Ok(self
            .ordered()
            .into_iter()
            .filter(|c| c.trigger().is_due(&essentials, &game))
            .map(|c| PendingConversion {
                name: c.name(),
                title: c.title(),
            })
            .collect())
    }

    /// Every threshold must be reachable: a conversion gated above the
    /// running version would run, be stamped below its own threshold, and
    /// run again on the next load.
    fn check_thresholds(&self, versions: &EngineVersions) -> Result<()> {
        for conversion in &self.conversions {
            let running = match conversion.trigger() {
                Trigger::Essentials(_) => &versions.essentials,
                Trigger::Game(_) => &versions.game,
            };
            if conversion.trigger().version() > running {
                warn!(
                    conversion = conversion.name(),
                    trigger = %conversion.trigger(),
                    running = %running,
                    "Conversion threshold is above the running version"
                );
                return Err(SaveError::Config(format!(
                    "conversion `{}` requires {} {} but the running version is {running}",
                    conversion.name(),
                    conversion.trigger().stamp(),
                    conversion.trigger().version(),
                )));
            }
        }
        Ok(())
    }

    /// Bring `record` up to `versions`.
    ///
    /// # Errors
    /// - [`SaveError::Config`] if a conversion's threshold is above the
    ///   running version; the record is left untouched.
    /// - [`SaveError::NewerSave`] if either stamp is newer than the running
    ///   version; the record is left untouched.
    /// - [`SaveError::Conversion`] wrapping the first failing transform.
    ///   Conversions before it stay applied and the stamps are not updated.
    pub fn run(&self, record: &mut SaveRecord, versions: &EngineVersions) -> Result<MigrationReport> {
        let start = Instant::now();
        self.check_thresholds(versions)?;
        let from_essentials = record.essentials_stamp(versions);
        let from_game = record.game_stamp(versions);

        refuse_newer(&from_essentials, &versions.essentials)?;
        refuse_newer(&from_game, &versions.game)?;

        let mut applied = Vec::new();
        let mut skipped = Vec::new();

        for conversion in self.ordered() {
            if !conversion.trigger().is_due(&from_essentials, &from_game) {
                debug!(conversion = conversion.name(), "Skipping conversion");
                skipped.push(conversion.name().to_string());
                continue;
            }

            info!(conversion = conversion.name(), title = conversion.title(), "Running conversion");
            conversion.apply(record).map_err(|source| {
                warn!(conversion = conversion.name(), error = %source, "Conversion failed");
                SaveError::Conversion {
                    step: conversion.name().to_string(),
                    source: Box::new(source),
                }
            })?;
            applied.push(conversion.name().to_string());
        }

        record.essentials_version = Some(versions.essentials.clone());
        record.game_version = Some(versions.game.clone());

        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        info!(
            applied = applied.len(),
            skipped = skipped.len(),
            from = %from_essentials,
            to = %versions.essentials,
            elapsed_us,
            "Save conversion complete"
        );

        Ok(MigrationReport {
            applied,
            skipped,
            from_essentials,
            from_game,
            to_essentials: versions.essentials.clone(),
            to_game: versions.game.clone(),
            completed_at: Utc::now(),
            elapsed_us,
        })
    }
}

fn refuse_newer(found: &Version, supported: &Version) -> Result<()> {
    if found > supported {
        warn!(found = %found, supported = %supported, "Refusing save from a newer version");
        return Err(SaveError::NewerSave {
            found: found.clone(),
            supported: supported.clone(),
        });
    }
    Ok(())
}
