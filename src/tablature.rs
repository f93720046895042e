//! Tab annotation: attach a tab symbol to every pitch of a score and
//! collect the plain-text tablature.

use serde::Serialize;

use crate::harp_map::HarmonicaMap;
use crate::model::{Element, Score};
use crate::tunings::DRAW_MARKER;

/// Written for a pitch the harmonica cannot play. The leading space keeps
/// it apart from neighbouring tabs in running text.
pub const UNAVAILABLE_TAB: &str = " ?";

/// Plain-text tablature of a score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tablature {
    /// Running tab text, chords wrapped as ` (...)`
    pub text: String,
    /// One entry per note and per chord pitch, as written into `text`
    pub fragments: Vec<String>,
}

impl Tablature {
    fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.fragments.push(fragment.to_string());
    }

    /// Whether any pitch fell outside the harmonica.
    pub fn has_unavailable(&self) -> bool {
        self.fragments.iter().any(|f| f.trim() == "?")
    }
}

/// Label every note and chord pitch with its tab symbol.
///
/// Notes get the tab appended as a new lyric line. Chord pitches are walked
/// from highest to lowest, each on its own line starting at 1. When chords
/// were not reduced beforehand the chord's tabs are bracketed in the text,
/// and the top tab drops its leading draw marker.
///
/// This mutates `score`; do not run it concurrently with [`crate::reduce_chords`]
/// on the same score.
pub fn label_notes(score: &mut Score, map: &HarmonicaMap, reduce_chords: bool) -> Tablature {
    let mut tab = Tablature::default();

    for element in score.elements_mut() {
        match element {
            Element::Note(note) => {
                let symbol = map.tab_or(note.pitch, UNAVAILABLE_TAB);
                note.add_lyric(symbol);
                tab.push(symbol);
            }
            Element::Chord(chord) => {
                let bracketed = !reduce_chords;
                if bracketed {
                    tab.text.push_str(" (");
                }
                for (i, pitch) in chord.pitches_descending().into_iter().enumerate() {
                    let symbol = map.tab_or(pitch, UNAVAILABLE_TAB);
                    chord.set_lyric(i as u32 + 1, symbol);
                    if bracketed && i == 0 {
                        tab.push(strip_leading_marker(symbol));
                    } else {
                        tab.push(symbol);
                    }
                }
                if bracketed {
                    tab.text.push(')');
                }
            }
        }
    }

    tab
}

fn strip_leading_marker(symbol: &str) -> &str {
    symbol
        .strip_prefix(DRAW_MARKER)
        .or_else(|| symbol.strip_prefix(' '))
        .unwrap_or(symbol)
}
