//! Harmonica key options and the key compatibility filter.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::harp_map::HarmonicaMap;
use crate::model::{Pitch, Score};
use crate::tunings::{HarmonicaType, TabMarker};

/// A harmonica key the user can pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyOption {
    /// Display name (e.g., "Low F#")
    pub name: String,
    /// Pitch spec of hole 1 blow (e.g., "F#3")
    pub root_spec: String,
    /// Parsed root pitch
    pub root: Pitch,
}

impl KeyOption {
    pub fn new(name: &str, root_spec: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            root_spec: root_spec.to_string(),
            root: root_spec.parse()?,
        })
    }
}

const DIATONIC_KEYS: [(&str, &str); 26] = [
    ("Low G", "G2"), ("Low Ab", "Ab2"), ("Low A", "A2"), ("Low Bb", "Bb2"),
    ("Low B", "B2"), ("Low C", "C3"), ("Low C#", "C#3"), ("Low D", "D3"),
    ("Low Eb", "Eb3"), ("Low E", "E3"), ("Low F", "F3"), ("Low F#", "F#3"),
    ("G", "G3"), ("Ab", "Ab3"), ("A", "A3"), ("Bb", "Bb3"),
    ("B", "B3"), ("C", "C4"), ("Db", "Db4"), ("D", "D4"),
    ("Eb", "Eb4"), ("E", "E4"), ("F", "F4"), ("F#", "F#4"),
    ("High G", "G4"), ("High C", "C5"),
];

const CHROMATIC_KEYS: [(&str, &str); 1] = [("C", "C4")];

/// Candidate keys for a harmonica type, lowest first.
pub fn default_key_options(harmonica_type: HarmonicaType) -> Vec<KeyOption> {
    let table: &[(&str, &str)] = match harmonica_type {
        HarmonicaType::Diatonic => &DIATONIC_KEYS,
        HarmonicaType::Chromatic => &CHROMATIC_KEYS,
    };
    table
        .iter()
        .filter_map(|(name, spec)| KeyOption::new(name, spec).ok())
        .collect()
}

/// Keep the keys whose diatonic tabs for `score` never contain `marker`.
///
/// Only single notes are checked; chords are left to the reducer. Order
/// is preserved and the result may be empty.
pub fn filter_keys(
    score: &Score,
    tuning: &str,
    key_options: &[KeyOption],
    marker: char,
) -> Vec<KeyOption> {
    key_options
        .iter()
        .filter(|key| {
            let map = HarmonicaMap::build(key.root, HarmonicaType::Diatonic, tuning);
            let offending = score
                .notes()
                .map(|note| map.tab_or(note.pitch, "?"))
                .find(|tab| tab.contains(marker));
            if let Some(tab) = offending {
                log::debug!("Key {} dropped: needs '{tab}'", key.name);
            }
            offending.is_none()
        })
        .cloned()
        .collect()
}

/// Which techniques the player is willing to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConstraints {
    pub allow_bends: bool,
    pub allow_overblows: bool,
    pub allow_missing_notes: bool,
}

impl Default for KeyConstraints {
    fn default() -> Self {
        Self {
            allow_bends: true,
            allow_overblows: true,
            allow_missing_notes: true,
        }
    }
}

impl KeyConstraints {
    /// Marker classes to filter out, in filtering order.
    pub fn disallowed(&self) -> Vec<TabMarker> {
        [
            (self.allow_bends, TabMarker::Bend),
            (self.allow_overblows, TabMarker::Overblow),
            (self.allow_missing_notes, TabMarker::Missing),
        ]
        .into_iter()
        .filter(|(allowed, _)| !allowed)
        .map(|(_, marker)| marker)
        .collect()
    }

    /// Narrow `key_options` once per disallowed marker class.
    pub fn apply(&self, score: &Score, tuning: &str, key_options: &[KeyOption]) -> Vec<KeyOption> {
        let mut keys = key_options.to_vec();
        for marker in self.disallowed() {
            keys = filter_keys(score, tuning, &keys, marker.as_char());
        }
        keys
    }
}

/// Clamp a previously selected key index into a (possibly narrowed) list.
/// `None` means no key is left to select.
pub fn clamp_key_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(index.min(len - 1))
    }
}
