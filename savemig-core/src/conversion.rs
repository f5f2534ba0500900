//! A single registered conversion and the builder that declares it.
//!
//! ```
//! use savemig_core::conversion::Conversion;
//! use savemig_core::model::Bag;
//! use savemig_core::Version;
//!
//! let conversion = Conversion::builder("clear_registered_items")
//!     .game_version(Version::from_segments([1, 2]))
//!     .title("Clearing registered items")
//!     .to_value(|mut bag: Bag| {
//!         bag.registered_items.clear();
//!         Ok(bag)
//!     })
//!     .expect("valid conversion");
//! assert_eq!(conversion.name(), "clear_registered_items");
//! ```

use std::fmt;

use serde_json::Value;

use crate::error::{Result, SaveError};
use crate::record::{slots, SaveRecord, SaveSlot};
use crate::version::Version;

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Which stamp a conversion's threshold is compared against, and the
/// threshold itself.
///
/// The derived ordering is the execution order: every engine conversion
/// before any game conversion, each kind by ascending threshold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Trigger {
    /// Runs for saves whose engine stamp is below the version.
    Essentials(Version),
    /// Runs for saves whose game stamp is below the version.
    Game(Version),
}

impl Trigger {
    /// The threshold version.
    #[must_use]
    pub fn version(&self) -> &Version {
        match self {
            Self::Essentials(v) | Self::Game(v) => v,
        }
    }

    /// Name of the stamp this trigger reads.
    #[must_use]
    pub fn stamp(&self) -> &'static str {
        match self {
            Self::Essentials(_) => slots::ESSENTIALS_VERSION,
            Self::Game(_) => slots::GAME_VERSION,
        }
    }

    /// Whether a save at the given stamps needs this conversion.
    #[must_use]
    pub fn is_due(&self, essentials: &Version, game: &Version) -> bool {
        match self {
            Self::Essentials(threshold) => essentials < threshold,
            Self::Game(threshold) => game < threshold,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} < {}", self.stamp(), self.version())
    }
}

/// What a conversion's transform receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The whole save record.
    Record,
    /// The value of one named slot.
    Slot(String),
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

type ApplyFn = dyn Fn(&mut SaveRecord) -> Result<()> + Send + Sync;

/// A named, version-gated transform over save data.
pub struct Conversion {
    name: String,
    trigger: Trigger,
    title: String,
    target: Target,
    apply: Box<ApplyFn>,
}

impl Conversion {
    /// Start declaring a conversion called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ConversionBuilder {
        ConversionBuilder {
            name: name.into(),
            trigger: None,
            title: None,
        }
    }

    /// Unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version gate.
    #[must_use]
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Human-readable title, shown while the conversion runs.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// What the transform operates on.
    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run the transform against `record`.
    ///
    /// The transform works on a copy of its target; `record` is only
    /// updated when the transform succeeds.
    ///
    /// # Errors
    /// Returns whatever the transform returns, or
    /// [`SaveError::MissingSlot`] if the targeted slot is absent.
    pub fn apply(&self, record: &mut SaveRecord) -> Result<()> {
        (self.apply)(record)
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("title", &self.title)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Declares a [`Conversion`]. Set a trigger, optionally a title, then finish
/// with one of the `to_*` methods.
#[derive(Debug)]
#[must_use]
pub struct ConversionBuilder {
    name: String,
    trigger: Option<Trigger>,
    title: Option<String>,
}

impl ConversionBuilder {
    /// Run for saves whose engine stamp is below `version`.
    pub fn essentials_version(mut self, version: impl Into<Version>) -> Self {
        self.trigger = Some(Trigger::Essentials(version.into()));
        self
    }

    /// Run for saves whose game stamp is below `version`.
    pub fn game_version(mut self, version: impl Into<Version>) -> Self {
        self.trigger = Some(Trigger::Game(version.into()));
        self
    }

    /// Title shown while running. Defaults to `"Running conversion <name>"`.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Finish with a transform over the whole record.
    ///
    /// # Errors
    /// Returns [`SaveError::Config`] if the name is empty or no trigger was
    /// set.
    pub fn to_all<F>(self, transform: F) -> Result<Conversion>
    where
        F: Fn(SaveRecord) -> Result<SaveRecord> + Send + Sync + 'static,
    {
        self.finish(Target::Record, move |record: &mut SaveRecord| {
            *record = transform(record.clone())?;
            Ok(())
        })
    }

    /// Finish with a transform over one typed slot, selected by its type.
    /// The returned value replaces the slot.
    ///
    /// # Errors
    /// Returns [`SaveError::Config`] if the name is empty or no trigger was
    /// set.
    pub fn to_value<S, F>(self, transform: F) -> Result<Conversion>
    where
        S: SaveSlot,
        F: Fn(S) -> Result<S> + Send + Sync + 'static,
    {
        self.finish(Target::Slot(S::NAME.to_string()), move |record: &mut SaveRecord| {
            let value = S::slot(record).clone().ok_or_else(|| SaveError::MissingSlot {
                slot: S::NAME.to_string(),
            })?;
            *S::slot_mut(record) = Some(transform(value)?);
            Ok(())
        })
    }

    /// Finish with a transform over one untyped slot, selected by name.
    ///
    /// # Errors
    /// Returns [`SaveError::Config`] if the name is empty, no trigger was
    /// set, or `slot` names a typed slot.
    pub fn to_raw_value<F>(self, slot: impl Into<String>, transform: F) -> Result<Conversion>
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        let slot = slot.into();
        if slots::RESERVED.contains(&slot.as_str()) {
            return Err(SaveError::Config(format!(
                "conversion `{}` targets typed slot `{slot}` as a raw value",
                self.name
            )));
        }
        let key = slot.clone();
        self.finish(Target::Slot(slot), move |record: &mut SaveRecord| {
            let value = record
                .raw(&key)
                .cloned()
                .ok_or_else(|| SaveError::MissingSlot { slot: key.clone() })?;
            let next = transform(value)?;
            record.extra.insert(key.clone(), next);
            Ok(())
        })
    }

    fn finish<F>(self, target: Target, apply: F) -> Result<Conversion>
    where
        F: Fn(&mut SaveRecord) -> Result<()> + Send + Sync + 'static,
    {
        if self.name.trim().is_empty() {
            return Err(SaveError::Config("conversion name must not be empty".into()));
        }
        let Some(trigger) = self.trigger else {
            return Err(SaveError::Config(format!(
                "conversion `{}` has no essentials or game version",
                self.name
            )));
        };
        let title = self
            .title
            .unwrap_or_else(|| format!("Running conversion {}", self.name));
        Ok(Conversion {
            name: self.name,
            trigger,
            title,
            target,
            apply: Box::new(apply),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bag;
    use serde_json::json;

    fn v(major: u32) -> Version {
        Version::from(major)
    }

    #[test]
    fn engine_triggers_sort_before_game_triggers() {
        let mut triggers = vec![
            Trigger::Game(v(1)),
            Trigger::Essentials(v(20)),
            Trigger::Essentials(v(19)),
        ];
        triggers.sort();
        assert_eq!(
            triggers,
            vec![
                Trigger::Essentials(v(19)),
                Trigger::Essentials(v(20)),
                Trigger::Game(v(1)),
            ]
        );
    }

    #[test]
    fn trigger_reads_its_own_stamp() {
        let engine = Trigger::Essentials(v(19));
        let game = Trigger::Game(v(2));
        assert!(engine.is_due(&v(18), &v(5)));
        assert!(!engine.is_due(&v(19), &v(0)));
        assert!(game.is_due(&v(99), &v(1)));
        assert!(!game.is_due(&v(0), &v(2)));
    }

    #[test]
    fn builder_requires_trigger_and_name() {
        let err = Conversion::builder("no_trigger")
            .to_all(Ok)
            .expect_err("missing trigger");
        assert!(matches!(err, SaveError::Config(_)));

        let err = Conversion::builder("  ")
            .essentials_version(v(19))
            .to_all(Ok)
            .expect_err("empty name");
        assert!(matches!(err, SaveError::Config(_)));
    }

    #[test]
    fn default_title_names_the_conversion() {
        let conversion = Conversion::builder("fix_things")
            .essentials_version(v(19))
            .to_all(Ok)
            .expect("build");
        assert_eq!(conversion.title(), "Running conversion fix_things");
        assert_eq!(conversion.target(), &Target::Record);
    }

    #[test]
    fn slot_transform_writes_back() {
        let conversion = Conversion::builder("register_index")
            .essentials_version(v(19))
            .to_value(|mut bag: Bag| {
                bag.registered_index = Some([1, 2, 3]);
                Ok(bag)
            })
            .expect("build");
        assert_eq!(conversion.target(), &Target::Slot("bag".into()));

        let mut record = SaveRecord::new();
        record.set(Bag::default());
        conversion.apply(&mut record).expect("apply");
        assert_eq!(
            record.get::<Bag>().and_then(|b| b.registered_index),
            Some([1, 2, 3])
        );
    }

    #[test]
    fn slot_transform_reports_missing_slot() {
        let conversion = Conversion::builder("needs_bag")
            .essentials_version(v(19))
            .to_value(|bag: Bag| Ok(bag))
            .expect("build");
        let err = conversion
            .apply(&mut SaveRecord::new())
            .expect_err("no bag");
        assert!(matches!(err, SaveError::MissingSlot { ref slot } if slot == "bag"));
    }

    #[test]
    fn failed_transform_leaves_record_untouched() {
        let conversion = Conversion::builder("half_done")
            .game_version(v(2))
            .to_all(|mut record| {
                record.game_version = Some(v(99));
                Err(SaveError::Transform("boom".into()))
            })
            .expect("build");
        let mut record = SaveRecord::new();
        conversion.apply(&mut record).expect_err("fails");
        assert_eq!(record, SaveRecord::new());
    }

    #[test]
    fn raw_slot_transform() {
        let conversion = Conversion::builder("bump_counter")
            .game_version(v(2))
            .to_raw_value("counter", |value| {
                let n = value.as_u64().unwrap_or(0);
                Ok(json!(n + 1))
            })
            .expect("build");
        let mut record = SaveRecord::new();
        record.insert_raw("counter", json!(41)).expect("insert");
        conversion.apply(&mut record).expect("apply");
        assert_eq!(record.raw("counter"), Some(&json!(42)));

        let err = Conversion::builder("bad")
            .game_version(v(2))
            .to_raw_value("bag", Ok)
            .expect_err("typed slot");
        assert!(matches!(err, SaveError::Config(_)));
    }
}
