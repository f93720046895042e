//! MusicXML reader — turns one part of a `score-partwise` document into
//! the Score data model.
//!
//! Only what tablature needs is read: titles, the part list, and pitched
//! notes. Notes flagged `<chord/>` join the element before them.

use roxmltree::{Document, Node};

use crate::error::{HarpTabError, Result};
use crate::model::*;

/// Parse a MusicXML string, keeping the given part (1-based).
pub fn parse_musicxml(xml: &str, part_number: usize) -> Result<Score> {
    // MusicXML files include a DOCTYPE declaration, so we must allow DTDs
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| HarpTabError::Xml(e.to_string()))?;
    let root = doc.root_element();

    if root.tag_name().name() != "score-partwise" {
        return Err(HarpTabError::UnsupportedRoot(
            root.tag_name().name().to_string(),
        ));
    }

    let mut score = Score::new();
    let mut part_ids: Vec<(String, String)> = Vec::new();
    let mut parts: Vec<Node> = Vec::new();

    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "work" => parse_work(&child, &mut score),
            "movement-title" => {
                if score.title.is_none() {
                    score.title = text_of(&child);
                }
            }
            "identification" => parse_identification(&child, &mut score),
            "credit" => parse_credit(&child, &mut score),
            "part-list" => part_ids = parse_part_list(&child),
            "part" => parts.push(child),
            _ => {}
        }
    }

    score.part_count = parts.len();
    let part = part_number
        .checked_sub(1)
        .and_then(|i| parts.get(i))
        .ok_or(HarpTabError::PartOutOfRange {
            requested: part_number,
            available: parts.len(),
        })?;

    let part_id = part.attribute("id").unwrap_or("");
    score.part_name = part_ids
        .iter()
        .find(|(id, _)| id == part_id)
        .map(|(_, name)| name.clone())
        .filter(|name| !name.is_empty());

    for child in part.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "measure" {
            score.measures.push(parse_measure(&child));
        }
    }

    log::debug!(
        "Parsed part {part_number}/{} with {} measures",
        score.part_count,
        score.measures.len()
    );
    Ok(score)
}

// ─── Work / Identification / Credits ─────────────────────────────────

fn parse_work(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "work-title" {
            // <credit type="title"> takes priority.
            if score.title.is_none() {
                score.title = text_of(&child);
            }
        }
    }
}

fn parse_identification(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "creator"
            && child.attribute("type") == Some("composer")
            && score.composer.is_none()
        {
            score.composer = text_of(&child);
        }
    }
}

fn parse_credit(node: &Node, score: &mut Score) {
    let mut credit_type = String::new();
    let mut credit_text = String::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "credit-type" => {
                credit_type = child.text().unwrap_or("").trim().to_string();
            }
            "credit-words" => {
                let text = child.text().unwrap_or("").trim();
                if !text.is_empty() {
                    if !credit_text.is_empty() {
                        credit_text.push('\n');
                    }
                    credit_text.push_str(text);
                }
            }
            _ => {}
        }
    }

    if credit_text.is_empty() {
        return;
    }
    match credit_type.as_str() {
        "title" => score.title = Some(credit_text),
        "composer" => score.composer = Some(credit_text),
        _ => {}
    }
}

// ─── Part List ───────────────────────────────────────────────────────

fn parse_part_list(node: &Node) -> Vec<(String, String)> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "score-part")
        .map(|sp| {
            let id = sp.attribute("id").unwrap_or("").to_string();
            let name = sp
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "part-name")
                .and_then(|n| text_of(&n))
                .unwrap_or_default();
            (id, name)
        })
        .collect()
}

// ─── Measure ─────────────────────────────────────────────────────────

fn parse_measure(node: &Node) -> Measure {
    let number = node
        .attribute("number")
        .and_then(|n| n.parse::<i32>().ok())
        .unwrap_or(0);
    let mut measure = Measure::new(number);

    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() != "note" {
            continue;
        }
        let Some(parsed) = parse_note(&child) else {
            continue;
        };
        if parsed.chord {
            if let Some(last) = measure.elements.last_mut() {
                join_chord(last, parsed.note);
                continue;
            }
        }
        measure.elements.push(Element::Note(parsed.note));
    }

    measure
}

/// Fold a `<chord/>` note into the element it sounds with.
fn join_chord(element: &mut Element, note: Note) {
    match element {
        Element::Chord(chord) => {
            chord.pitches.push(note.pitch);
        }
        Element::Note(first) => {
            let mut chord = Chord::new(vec![first.pitch, note.pitch]);
            chord.duration = first.duration;
            chord.note_type = first.note_type.take();
            chord.lyrics = std::mem::take(&mut first.lyrics);
            *element = Element::Chord(chord);
        }
    }
}

// ─── Note ────────────────────────────────────────────────────────────

struct ParsedNote {
    note: Note,
    chord: bool,
}

/// Returns `None` for rests and unpitched notes.
fn parse_note(node: &Node) -> Option<ParsedNote> {
    let mut pitch = None;
    let mut chord = false;
    let mut note = Note::new(Pitch(0.0));

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "pitch" => pitch = Some(parse_pitch(&child)),
            "rest" | "unpitched" => return None,
            "chord" => chord = true,
            "duration" => note.duration = parse_i32(&child).unwrap_or(0),
            "type" => note.note_type = text_of(&child),
            "lyric" => {
                let number = child
                    .attribute("number")
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(1);
                let text = child
                    .children()
                    .find(|n| n.is_element() && n.tag_name().name() == "text")
                    .and_then(|n| text_of(&n));
                if let Some(text) = text.filter(|t| !t.is_empty()) {
                    note.lyrics.push(Lyric { number, text });
                }
            }
            _ => {}
        }
    }

    note.pitch = pitch?;
    Some(ParsedNote { note, chord })
}

fn parse_pitch(node: &Node) -> Pitch {
    let mut step = "C".to_string();
    let mut octave = 4;
    let mut alter = None;
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "step" => {
                step = child.text().unwrap_or("C").trim().to_string();
            }
            "octave" => octave = parse_i32(&child).unwrap_or(4),
            "alter" => alter = parse_f64(&child),
            _ => {}
        }
    }
    Pitch::from_spelling(&step, octave, alter)
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn text_of(node: &Node) -> Option<String> {
    node.text().map(|t| t.trim().to_string())
}

fn parse_i32(node: &Node) -> Option<i32> {
    node.text()?.trim().parse().ok()
}

fn parse_f64(node: &Node) -> Option<f64> {
    node.text()?.trim().parse().ok()
}
