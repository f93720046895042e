//! Pitch → tab lookup for one (type, tuning, key) configuration.

use serde::Serialize;

use crate::model::Pitch;
use crate::tunings::{self, HarmonicaType};

/// Immutable pitch-to-tab mapping.
///
/// Pitch `root + i` maps to `symbols[i]`; anything outside that range, or
/// any non-integral offset, is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicaMap {
    root: Pitch,
    symbols: &'static [&'static str],
}

impl HarmonicaMap {
    /// Build the map by walking the tuning table upward from `root`,
    /// one semitone per entry.
    pub fn build(root: Pitch, harmonica_type: HarmonicaType, tuning: &str) -> Self {
        let symbols = tunings::tuning_table(harmonica_type, tuning);
        log::debug!(
            "Built {harmonica_type} '{tuning}' map from {root}: {} pitches",
            symbols.len()
        );
        Self { root, symbols }
    }

    pub fn root(&self) -> Pitch {
        self.root
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Tab symbol for a pitch, if the harmonica has one.
    pub fn get(&self, pitch: Pitch) -> Option<&'static str> {
        let offset = pitch.value() - self.root.value();
        if offset < 0.0 || offset.fract() != 0.0 {
            return None;
        }
        self.symbols.get(offset as usize).copied()
    }

    /// Tab symbol for a pitch, or `fallback` when absent.
    pub fn tab_or<'a>(&self, pitch: Pitch, fallback: &'a str) -> &'a str {
        self.get(pitch).unwrap_or(fallback)
    }

    /// All (pitch, symbol) bindings in ascending pitch order.
    pub fn bindings(&self) -> impl Iterator<Item = (Pitch, &'static str)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(move |(i, sym)| (self.root.transpose(i as f64), *sym))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_is_deterministic() {
        for ty in [HarmonicaType::Diatonic, HarmonicaType::Chromatic] {
            for name in tunings::tuning_names(ty) {
                let a = HarmonicaMap::build(Pitch(55.0), ty, name);
                let b = HarmonicaMap::build(Pitch(55.0), ty, name);
                assert_eq!(a, b);
                assert_eq!(
                    a.bindings().collect::<Vec<_>>(),
                    b.bindings().collect::<Vec<_>>()
                );
            }
        }
    }

    #[test]
    fn maps_from_root_upward() {
        let map = HarmonicaMap::build(Pitch(60.0), HarmonicaType::Diatonic, "Standard Richter");
        assert_eq!(map.get(Pitch(60.0)), Some("1"));
        assert_eq!(map.get(Pitch(62.0)), Some("-1"));
        assert_eq!(map.get(Pitch(72.0)), Some("4"));
        assert_eq!(map.get(Pitch(97.0)), Some("-10o"));
    }

    #[test]
    fn out_of_range_and_fractional_pitches_are_absent() {
        let map = HarmonicaMap::build(Pitch(60.0), HarmonicaType::Diatonic, "Standard Richter");
        assert_eq!(map.get(Pitch(59.0)), None);
        assert_eq!(map.get(Pitch(60.0 + map.len() as f64)), None);
        assert_eq!(map.get(Pitch(60.5)), None);
        assert_eq!(map.tab_or(Pitch(40.0), " ?"), " ?");
    }

    #[test]
    fn unknown_tuning_gives_empty_map() {
        let map = HarmonicaMap::build(Pitch(60.0), HarmonicaType::Chromatic, "Paddy Richter");
        assert!(map.is_empty());
        assert_eq!(map.get(Pitch(60.0)), None);
    }

    #[test]
    fn key_shifts_every_binding() {
        let c = HarmonicaMap::build(Pitch(60.0), HarmonicaType::Diatonic, "Country");
        let g = HarmonicaMap::build(Pitch(55.0), HarmonicaType::Diatonic, "Country");
        for (pitch, sym) in c.bindings() {
            assert_eq!(g.get(pitch.transpose(-5.0)), Some(sym));
        }
    }
}
