//! Tabulation settings and the end-to-end pipeline: filter keys, reduce
//! chords, build the harmonica map, annotate.

use serde::{Deserialize, Serialize};

use crate::chords::{reduce_chords, ChordReduction};
use crate::error::Result;
use crate::harp_map::HarmonicaMap;
use crate::keys::{clamp_key_index, default_key_options, KeyConstraints, KeyOption};
use crate::model::Score;
use crate::tablature::{label_notes, Tablature};
use crate::tunings::HarmonicaType;

/// User-facing configuration of a tabulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabSettings {
    pub harmonica_type: HarmonicaType,
    pub tuning: String,
    /// Index into the key list left after filtering (clamped)
    pub key_index: usize,
    #[serde(flatten)]
    pub constraints: KeyConstraints,
    pub reduce_chords: bool,
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            harmonica_type: HarmonicaType::Diatonic,
            tuning: "Standard Richter".to_string(),
            key_index: 0,
            constraints: KeyConstraints::default(),
            reduce_chords: true,
        }
    }
}

impl TabSettings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Result of a tabulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TabOutcome {
    /// The constraints ruled out every key. Not an error: the user should
    /// relax a constraint.
    NoPlayableKey,
    Tabbed(TabReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabReport {
    pub key: KeyOption,
    pub key_index: usize,
    /// Keys that satisfied the constraints, in ascending order
    pub key_options: Vec<KeyOption>,
    pub tablature: Tablature,
    /// Present when chords were reduced
    pub reduction: Option<ChordReduction>,
}

/// Annotated score plus outcome, as handed to the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabDocument {
    pub score: Score,
    pub outcome: TabOutcome,
}

impl TabDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Keys offered for the current settings and score.
/// Only diatonic harmonicas are filtered.
pub fn available_keys(score: &Score, settings: &TabSettings) -> Vec<KeyOption> {
    let keys = default_key_options(settings.harmonica_type);
    match settings.harmonica_type {
        HarmonicaType::Diatonic => settings.constraints.apply(score, &settings.tuning, &keys),
        HarmonicaType::Chromatic => keys,
    }
}

/// Set the title from a file name and credit the chosen key as composer.
/// Dashes and underscores in the file name read as spaces.
pub fn apply_metadata(score: &mut Score, file_stem: Option<&str>, key_name: &str) {
    if let Some(stem) = file_stem {
        score.title = Some(stem.replace(['-', '_'], " "));
    }
    score.composer = Some(format!("Key of {key_name}"));
}

/// Run the whole pipeline on `score`, mutating it in place.
pub fn tabulate(score: &mut Score, settings: &TabSettings, file_stem: Option<&str>) -> TabOutcome {
    let key_options = available_keys(score, settings);
    let Some(key_index) = clamp_key_index(settings.key_index, key_options.len()) else {
        log::info!(
            "No {} '{}' key satisfies {:?}",
            settings.harmonica_type,
            settings.tuning,
            settings.constraints.disallowed()
        );
        return TabOutcome::NoPlayableKey;
    };
    let key = key_options[key_index].clone();

    apply_metadata(score, file_stem, &key.name);

    let reduction = settings.reduce_chords.then(|| {
        let counts = reduce_chords(score);
        log::info!("{}", counts.summary());
        counts
    });

    let map = HarmonicaMap::build(key.root, settings.harmonica_type, &settings.tuning);
    let tablature = label_notes(score, &map, settings.reduce_chords);
    log::info!(
        "Tabbed {} fragments for {} '{}' in {}",
        tablature.fragments.len(),
        settings.harmonica_type,
        settings.tuning,
        key.name
    );

    TabOutcome::Tabbed(TabReport {
        key,
        key_index,
        key_options,
        tablature,
        reduction,
    })
}
