//! Tuning table registry.
//!
//! Each table lists one tab symbol per semitone, starting at hole 1 blow of
//! a harmonica in the given key. Tables are static data; lookups never
//! allocate and never fail (an unknown pair yields an empty table).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Leading marker of a draw note.
pub const DRAW_MARKER: char = '-';
/// Trailing marker of a bent note, repeated per semitone.
pub const BEND_MARKER: char = '\'';
/// Trailing marker of an overblow or overdraw.
pub const OVERBLOW_MARKER: char = 'o';
/// Marks a pitch the harmonica cannot produce.
pub const MISSING_MARKER: char = '?';
/// Trailing marker of a chromatic slide-in note.
pub const SLIDE_MARKER: char = '<';

/// Family of harmonica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmonicaType {
    #[serde(alias = "diatonic", alias = "DIATONIC")]
    Diatonic,
    #[serde(alias = "chromatic", alias = "CHROMATIC")]
    Chromatic,
}

/// Classes of tab symbol a player may want to avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabMarker {
    Bend,
    Overblow,
    Missing,
}

impl TabMarker {
    pub fn as_char(self) -> char {
        match self {
            TabMarker::Bend => BEND_MARKER,
            TabMarker::Overblow => OVERBLOW_MARKER,
            TabMarker::Missing => MISSING_MARKER,
        }
    }
}

impl HarmonicaType {
    pub fn as_str(self) -> &'static str {
        match self {
            HarmonicaType::Diatonic => "Diatonic",
            HarmonicaType::Chromatic => "Chromatic",
        }
    }
}

impl fmt::Display for HarmonicaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HarmonicaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diatonic" => Ok(HarmonicaType::Diatonic),
            "chromatic" => Ok(HarmonicaType::Chromatic),
            other => Err(format!("Unknown harmonica type '{other}'")),
        }
    }
}

/// Tuning names offered for a harmonica type, in display order.
pub fn tuning_names(harmonica_type: HarmonicaType) -> &'static [&'static str] {
    match harmonica_type {
        HarmonicaType::Diatonic => &[
            "Standard Richter",
            "Paddy Richter",
            "Melody Maker",
            "Country",
            "Natural Minor",
            "Wilde Rock",
        ],
        HarmonicaType::Chromatic => &["Solo"],
    }
}

/// Look up the tab table for a (type, tuning) pair.
///
/// Unknown pairs return an empty table, so every pitch later maps to the
/// unavailable marker.
pub fn tuning_table(harmonica_type: HarmonicaType, tuning: &str) -> &'static [&'static str] {
    let table: &'static [&'static str] = match (harmonica_type, tuning) {
        (HarmonicaType::Diatonic, "Standard Richter") => &STANDARD_RICHTER,
        (HarmonicaType::Diatonic, "Paddy Richter") => &PADDY_RICHTER,
        (HarmonicaType::Diatonic, "Melody Maker") => &MELODY_MAKER,
        (HarmonicaType::Diatonic, "Country") => &COUNTRY,
        (HarmonicaType::Diatonic, "Natural Minor") => &NATURAL_MINOR,
        (HarmonicaType::Diatonic, "Wilde Rock") => &WILDE_ROCK,
        (HarmonicaType::Chromatic, "Solo") => &CHROMATIC_SOLO,
        _ => {
            log::warn!("No tuning table for {harmonica_type} '{tuning}'");
            &[]
        }
    };
    table
}

// ─── Diatonic (10 holes, hole 1 blow = key root) ─────────────────────

const STANDARD_RICHTER: [&str; 38] = [
    "1", "-1'", "-1", "1o", "2", "-2''", "-2'", "-2", "-3'''", "-3''", "-3'", "-3", // 1st octave
    "4", "-4'", "-4", "4o", "5", "-5", "5o", "6", "-6'", "-6", "6o", "-7", // 2nd octave
    "7", "-7o", "-8", "8'", "8", "-9", "9'", "9", "-9o", "-10", "10''", "10'", // 3rd octave
    "10", "-10o",
];

// Hole 3 blow raised to the sixth.
const PADDY_RICHTER: [&str; 38] = [
    "1", "-1'", "-1", "1o", "2", "-2''", "-2'", "-2", "2o", "3", "-3'", "-3",
    "4", "-4'", "-4", "4o", "5", "-5", "5o", "6", "-6'", "-6", "6o", "-7",
    "7", "-7o", "-8", "8'", "8", "-9", "9'", "9", "-9o", "-10", "10''", "10'",
    "10", "-10o",
];

// Paddy Richter plus draw 5 and draw 9 raised a semitone.
const MELODY_MAKER: [&str; 38] = [
    "1", "-1'", "-1", "1o", "2", "-2''", "-2'", "-2", "2o", "3", "-3'", "-3",
    "4", "-4'", "-4", "4o", "5", "-5'", "-5", "6", "-6'", "-6", "6o", "-7",
    "7", "-7o", "-8", "8'", "8", "-8o", "-9", "9", "-9o", "-10", "10''", "10'",
    "10", "-10o",
];

// Draw 5 raised a semitone.
const COUNTRY: [&str; 38] = [
    "1", "-1'", "-1", "1o", "2", "-2''", "-2'", "-2", "-3'''", "-3''", "-3'", "-3",
    "4", "-4'", "-4", "4o", "5", "-5'", "-5", "6", "-6'", "-6", "6o", "-7",
    "7", "-7o", "-8", "8'", "8", "-9", "9'", "9", "-9o", "-10", "10''", "10'",
    "10", "-10o",
];

// Blow 2/5/8 and draw 3/6/7/10 lowered to the minor scale.
const NATURAL_MINOR: [&str; 38] = [
    "1", "-1'", "-1", "2", "-2'''", "-2''", "-2'", "-2", "-3''", "-3'", "-3", "3o",
    "4", "-4'", "-4", "5", "-5'", "-5", "5o", "6", "-6", "6o", "-7", "7'",
    "7", "-7o", "-8", "8", "-8o", "-9", "9'", "9", "-10", "10'''", "10''", "10'",
    "10", "-10o",
];

// Upper octave draws sit above the blows, leaving B5 unplayable.
const WILDE_ROCK: [&str; 39] = [
    "1", "-1'", "-1", "1o", "2", "-2''", "-2'", "-2", "-3'''", "-3''", "-3'", "-3",
    "4", "-4'", "-4", "4o", "5", "-5'", "-5", "6", "-6'", "-6", "6o", "?",
    "7", "-7'", "-7", "7o", "8", "-8''", "-8'", "-8", "-9'''", "-9''", "-9'", "-9",
    "10", "-10'", "-10",
];

// ─── Chromatic (12 holes, slide marked with '<') ─────────────────────

const CHROMATIC_SOLO: [&str; 38] = [
    "1", "1<", "-1", "-1<", "2", "-2", "-2<", "3", "3<", "-3", "-3<", "-4",
    "5", "5<", "-5", "-5<", "6", "-6", "-6<", "7", "7<", "-7", "-7<", "-8",
    "9", "9<", "-9", "-9<", "10", "-10", "-10<", "11", "11<", "-11", "-11<", "-12",
    "12", "12<",
];
