//! Data model for a single part of a parsed score.
//!
//! These structures carry only what tablature needs: pitched notes and
//! chords in performance order, plus the lyric lines that tab symbols are
//! attached to for the rendering side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HarpTabError;

/// One part (the "piece") of a musical score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Title of the piece
    pub title: Option<String>,
    /// Composer line (tabulation rewrites it to the chosen key)
    pub composer: Option<String>,
    /// Name of the selected part (e.g., "Flute")
    pub part_name: Option<String>,
    /// Number of parts in the source file
    pub part_count: usize,
    /// Ordered list of measures
    pub measures: Vec<Measure>,
}

/// A single measure (bar) of music.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Measure number
    pub number: i32,
    /// Playable elements in performance order
    pub elements: Vec<Element>,
}

/// A playable element: a single note or a chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Note(Note),
    Chord(Chord),
}

/// A single pitched note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    /// Duration in divisions
    pub duration: i32,
    /// Note type: "whole", "half", "quarter", "eighth", "16th", "32nd"
    pub note_type: Option<String>,
    /// Lyric lines (tab symbols are appended here)
    pub lyrics: Vec<Lyric>,
}

/// Several pitches sounding together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Chord members, at least one, in source order
    pub pitches: Vec<Pitch>,
    /// Duration in divisions
    pub duration: i32,
    pub note_type: Option<String>,
    /// Lyric lines; line N carries the tab of the Nth highest pitch
    pub lyrics: Vec<Lyric>,
    /// Set once the chord reducer has collapsed this chord
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reduced: bool,
}

/// A lyric line attached to a note or chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lyric {
    /// Line number (1-based)
    pub number: u32,
    pub text: String,
}

/// Absolute pitch as a semitone index on the MIDI scale (C4 = 60).
///
/// Real-valued so quarter-tone alterations survive parsing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pitch(pub f64);

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl Score {
    /// Create a new empty score.
    pub fn new() -> Self {
        Self {
            title: None,
            composer: None,
            part_name: None,
            part_count: 0,
            measures: Vec::new(),
        }
    }

    /// Iterate over every element in performance order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.measures.iter().flat_map(|m| m.elements.iter())
    }

    /// Mutable variant of [`Score::elements`].
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.measures.iter_mut().flat_map(|m| m.elements.iter_mut())
    }

    /// Iterate over the single notes only (chords skipped).
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.elements().filter_map(|e| match e {
            Element::Note(n) => Some(n),
            Element::Chord(_) => None,
        })
    }

    /// Number of chords in the score.
    pub fn chord_count(&self) -> usize {
        self.elements()
            .filter(|e| matches!(e, Element::Chord(_)))
            .count()
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Measure {
    pub fn new(number: i32) -> Self {
        Self {
            number,
            elements: Vec::new(),
        }
    }
}

impl Element {
    pub fn is_chord(&self) -> bool {
        matches!(self, Element::Chord(_))
    }

    pub fn lyrics(&self) -> &[Lyric] {
        match self {
            Element::Note(n) => &n.lyrics,
            Element::Chord(c) => &c.lyrics,
        }
    }
}

impl Note {
    pub fn new(pitch: Pitch) -> Self {
        Self {
            pitch,
            duration: 0,
            note_type: None,
            lyrics: Vec::new(),
        }
    }

    /// Append a lyric on the next free line.
    pub fn add_lyric(&mut self, text: impl Into<String>) {
        let number = self.lyrics.iter().map(|l| l.number).max().unwrap_or(0) + 1;
        self.lyrics.push(Lyric {
            number,
            text: text.into(),
        });
    }
}

impl Chord {
    pub fn new(pitches: Vec<Pitch>) -> Self {
        Self {
            pitches,
            duration: 0,
            note_type: None,
            lyrics: Vec::new(),
            reduced: false,
        }
    }

    /// Set the lyric on a given line, replacing whatever that line held.
    pub fn set_lyric(&mut self, number: u32, text: impl Into<String>) {
        let text = text.into();
        match self.lyrics.iter_mut().find(|l| l.number == number) {
            Some(lyric) => lyric.text = text,
            None => {
                self.lyrics.push(Lyric { number, text });
                self.lyrics.sort_by_key(|l| l.number);
            }
        }
    }

    /// Pitches from highest to lowest; equal pitches keep source order.
    pub fn pitches_descending(&self) -> Vec<Pitch> {
        let mut sorted = self.pitches.clone();
        sorted.sort_by(|a, b| b.0.total_cmp(&a.0));
        sorted
    }
}

impl Pitch {
    /// Pitch from a MusicXML-style spelling.
    /// Unknown steps fall back to C like the rest of the parser does.
    pub fn from_spelling(step: &str, octave: i32, alter: Option<f64>) -> Self {
        let step_semitone: i32 = match step {
            "C" => 0,
            "D" => 2,
            "E" => 4,
            "F" => 5,
            "G" => 7,
            "A" => 9,
            "B" => 11,
            _ => 0,
        };
        // f64 throughout: octave values come straight from input files
        Pitch((f64::from(octave) + 1.0) * 12.0 + f64::from(step_semitone) + alter.unwrap_or(0.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The pitch `semitones` above this one.
    pub fn transpose(self, semitones: f64) -> Self {
        Pitch(self.0 + semitones)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() != 0.0 {
            return write!(f, "{}", self.0);
        }
        let midi = self.0 as i64;
        let name = SHARP_NAMES[midi.rem_euclid(12) as usize];
        write!(f, "{}{}", name, midi.div_euclid(12) - 1)
    }
}

/// Parses pitch specs such as "C4", "C#3", "Ab2", "E-4", "F##5".
/// Both `b` and `-` spell a flat; the octave defaults to 4.
impl FromStr for Pitch {
    type Err = HarpTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HarpTabError::InvalidPitch(s.to_string());
        let spec = s.trim();
        let mut chars = spec.chars();
        let step = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| ('A'..='G').contains(c))
            .ok_or_else(invalid)?;

        let rest = chars.as_str();
        let digits_at = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (accidentals, octave) = rest.split_at(digits_at);

        let mut alter = 0.0;
        for c in accidentals.chars() {
            match c {
                '#' => alter += 1.0,
                'b' | '-' => alter -= 1.0,
                _ => return Err(invalid()),
            }
        }

        let octave = if octave.is_empty() {
            4
        } else {
            octave.parse::<i32>().map_err(|_| invalid())?
        };

        Ok(Pitch::from_spelling(
            &step.to_string(),
            octave,
            Some(alter),
        ))
    }
}
