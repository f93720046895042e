//! Chord reduction: keep only the top voice of every chord.

use serde::Serialize;

use crate::model::{Element, Score};

/// Bookkeeping from one reduction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChordReduction {
    pub chords_removed: usize,
    pub notes_removed: usize,
}

impl ChordReduction {
    /// Status line for the host application.
    pub fn summary(&self) -> String {
        format!(
            "A total of {} notes were removed from {} chords",
            self.notes_removed, self.chords_removed
        )
    }
}

/// Collapse every chord in place to its highest pitch.
///
/// Ties go to the first maximum in source order. A reduced chord stays a
/// [`Element::Chord`] and is skipped by later passes, so running this twice
/// reports nothing the second time.
pub fn reduce_chords(score: &mut Score) -> ChordReduction {
    let mut counts = ChordReduction::default();

    for element in score.elements_mut() {
        let Element::Chord(chord) = element else {
            continue;
        };
        if chord.reduced {
            continue;
        }

        let mut highest: Option<usize> = None;
        for (i, pitch) in chord.pitches.iter().enumerate() {
            if highest.map_or(true, |h| pitch.value() > chord.pitches[h].value()) {
                highest = Some(i);
            }
        }

        if let Some(h) = highest {
            counts.notes_removed += chord.pitches.len() - 1;
            let top = chord.pitches[h];
            chord.pitches = vec![top];
        }
        chord.reduced = true;
        counts.chords_removed += 1;
    }

    log::debug!("{}", counts.summary());
    counts
}
