//! Integration tests — parse inline MusicXML and run the full tabulation
//! pipeline over it.

use std::io::Write;

use harptab::{
    label_notes, parse_bytes, reduce_chords, tabulate_bytes, ChordReduction, Element,
    HarmonicaMap, HarmonicaType, HarpTabError, KeyConstraints, Pitch, TabOutcome, TabSettings,
};
use pretty_assertions::assert_eq;

const ODE_TO_JOY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1">
  <work><work-title>Ode to Joy</work-title></work>
  <part-list><score-part id="P1"><part-name>Melody</part-name></score-part></part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>E</step><octave>5</octave></pitch><duration>1</duration></note>
      <note><pitch><step>E</step><octave>5</octave></pitch><duration>1</duration></note>
      <note><pitch><step>F</step><octave>5</octave></pitch><duration>1</duration></note>
      <note><pitch><step>G</step><octave>5</octave></pitch><duration>1</duration></note>
    </measure>
    <measure number="2">
      <note><pitch><step>G</step><octave>5</octave></pitch><duration>1</duration></note>
      <note><pitch><step>F</step><octave>5</octave></pitch><duration>1</duration></note>
      <note><pitch><step>E</step><octave>5</octave></pitch><duration>1</duration></note>
      <note><pitch><step>D</step><octave>5</octave></pitch><duration>1</duration></note>
    </measure>
    <measure number="3">
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>2</duration></note>
      <note><chord/><pitch><step>E</step><octave>5</octave></pitch><duration>2</duration></note>
      <note><chord/><pitch><step>G</step><octave>4</octave></pitch><duration>2</duration></note>
      <note><rest/><duration>2</duration></note>
    </measure>
  </part>
</score-partwise>"#;

// Blues lick in G: needs the bent draw 3 on a C harp
const BLUES_LICK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="4.0">
  <part-list><score-part id="P1"><part-name>Harp</part-name></score-part></part-list>
  <part id="P1">
    <measure number="1">
      <note><pitch><step>G</step><octave>4</octave></pitch><duration>1</duration></note>
      <note><pitch><step>B</step><alter>-1</alter><octave>4</octave></pitch><duration>1</duration></note>
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>1</duration></note>
      <note><pitch><step>D</step><octave>5</octave></pitch><duration>1</duration></note>
    </measure>
  </part>
</score-partwise>"#;

fn settings(key_index: usize) -> TabSettings {
    TabSettings {
        key_index,
        ..Default::default()
    }
}

fn tabbed(outcome: TabOutcome) -> harptab::TabReport {
    match outcome {
        TabOutcome::Tabbed(report) => report,
        TabOutcome::NoPlayableKey => panic!("expected a playable key"),
    }
}

// ─── Full pipeline ──────────────────────────────────────────────────

#[test]
fn ode_to_joy_on_c_harp() {
    let doc = tabulate_bytes(ODE_TO_JOY.as_bytes(), Some("musicxml"), 1, &settings(17)).unwrap();
    let report = tabbed(doc.outcome);

    assert_eq!(report.key.name, "C");
    assert_eq!(report.tablature.text, "55-566-55-45");
    assert_eq!(
        report.reduction,
        Some(ChordReduction { chords_removed: 1, notes_removed: 2 })
    );
    assert_eq!(doc.score.composer.as_deref(), Some("Key of C"));
    assert_eq!(doc.score.title.as_deref(), Some("Ode to Joy"));
}

#[test]
fn ode_to_joy_keeps_chord_when_not_reducing() {
    let settings = TabSettings {
        key_index: 17,
        reduce_chords: false,
        ..Default::default()
    };
    let doc = tabulate_bytes(ODE_TO_JOY.as_bytes(), Some("musicxml"), 1, &settings).unwrap();
    let report = tabbed(doc.outcome);

    assert_eq!(report.tablature.text, "55-566-55-4 (54-2)");
    assert_eq!(report.tablature.fragments.len(), 8 + 3);

    let chord = doc
        .score
        .elements()
        .find(|e| e.is_chord())
        .expect("chord survives");
    let lines: Vec<_> = chord.lyrics().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(lines, vec!["5", "4", "-2"]);
}

#[test]
fn fragments_match_notes_plus_chord_pitches() {
    let mut score = parse_bytes(ODE_TO_JOY.as_bytes(), None, 1).unwrap();
    let notes = score.notes().count();
    let chord_pitches: usize = score
        .elements()
        .filter_map(|e| match e {
            Element::Chord(c) => Some(c.pitches.len()),
            Element::Note(_) => None,
        })
        .sum();

    let map = HarmonicaMap::build(Pitch(55.0), HarmonicaType::Diatonic, "Paddy Richter");
    let tab = label_notes(&mut score, &map, false);
    assert_eq!(tab.fragments.len(), notes + chord_pitches);
}

#[test]
fn reduction_is_idempotent_on_parsed_scores() {
    let mut score = parse_bytes(ODE_TO_JOY.as_bytes(), Some("xml"), 1).unwrap();
    assert_eq!(score.chord_count(), 1);

    let first = reduce_chords(&mut score);
    let after_first = score.clone();
    let second = reduce_chords(&mut score);

    assert_eq!(first, ChordReduction { chords_removed: 1, notes_removed: 2 });
    assert_eq!(second, ChordReduction::default());
    assert_eq!(score, after_first);
    assert_eq!(score.chord_count(), 1);
}

// ─── Key filtering ──────────────────────────────────────────────────

#[test]
fn no_bends_skips_the_c_harp_for_the_blues_lick() {
    let all = TabSettings::default();
    let no_bends = TabSettings {
        constraints: KeyConstraints { allow_bends: false, ..Default::default() },
        ..Default::default()
    };

    let score = parse_bytes(BLUES_LICK.as_bytes(), None, 1).unwrap();
    let every_key = harptab::available_keys(&score, &all);
    let bendless = harptab::available_keys(&score, &no_bends);

    assert_eq!(every_key.len(), 26);
    assert!(bendless.len() < every_key.len());
    assert!(every_key.iter().any(|k| k.name == "C"));
    assert!(!bendless.iter().any(|k| k.name == "C"));

    // survivors keep their relative order
    let positions: Vec<_> = bendless
        .iter()
        .map(|k| every_key.iter().position(|e| e == k).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn strict_constraints_can_rule_out_every_key() {
    // Bb1 is below every harmonica in the list
    let xml = BLUES_LICK.replace("<octave>4</octave></pitch><duration>1</duration></note>\n      <note><pitch><step>C</step>",
                                 "<octave>1</octave></pitch><duration>1</duration></note>\n      <note><pitch><step>C</step>");
    let settings = TabSettings {
        constraints: KeyConstraints { allow_missing_notes: false, ..Default::default() },
        ..Default::default()
    };
    let doc = tabulate_bytes(xml.as_bytes(), Some("musicxml"), 1, &settings).unwrap();
    assert_eq!(doc.outcome, TabOutcome::NoPlayableKey);

    let json = doc.to_json().unwrap();
    assert!(json.contains("\"status\": \"no_playable_key\""));
}

#[test]
fn selected_index_is_clamped_after_filtering() {
    let settings = TabSettings {
        key_index: 25,
        constraints: KeyConstraints {
            allow_bends: false,
            allow_overblows: false,
            allow_missing_notes: false,
        },
        ..Default::default()
    };
    let doc = tabulate_bytes(BLUES_LICK.as_bytes(), None, 1, &settings).unwrap();
    let report = tabbed(doc.outcome);
    assert_eq!(report.key_index, report.key_options.len() - 1);
    assert!(!report.tablature.text.contains(['\'', 'o', '?']));
}

// ─── Chromatic ──────────────────────────────────────────────────────

#[test]
fn chromatic_solo_covers_the_blues_lick() {
    let settings = TabSettings {
        harmonica_type: HarmonicaType::Chromatic,
        tuning: "Solo".to_string(),
        ..Default::default()
    };
    let doc = tabulate_bytes(BLUES_LICK.as_bytes(), None, 1, &settings).unwrap();
    let report = tabbed(doc.outcome);
    assert_eq!(report.key.name, "C");
    assert_eq!(report.tablature.text, "3-3<5-5");
}

#[test]
fn unknown_tuning_tabs_everything_as_missing() {
    let settings = TabSettings {
        harmonica_type: HarmonicaType::Chromatic,
        tuning: "Standard Richter".to_string(),
        ..Default::default()
    };
    let doc = tabulate_bytes(BLUES_LICK.as_bytes(), None, 1, &settings).unwrap();
    assert_eq!(tabbed(doc.outcome).tablature.text, " ? ? ? ?");
}

// ─── Sources ────────────────────────────────────────────────────────

#[test]
fn compressed_mxl_matches_plain_musicxml() {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("META-INF/container.xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<container><rootfiles><rootfile full-path="ode.xml"/></rootfiles></container>"#,
        )
        .unwrap();
        zip.start_file("ode.xml", options).unwrap();
        zip.write_all(ODE_TO_JOY.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    let bytes = buf.into_inner();

    let from_mxl = parse_bytes(&bytes, Some("mxl"), 1).unwrap();
    let from_xml = parse_bytes(ODE_TO_JOY.as_bytes(), Some("musicxml"), 1).unwrap();
    assert_eq!(from_mxl, from_xml);

    // auto-detected as a ZIP archive
    assert_eq!(parse_bytes(&bytes, None, 1).unwrap(), from_xml);
}

#[test]
fn bad_sources_are_errors() {
    assert!(matches!(
        parse_bytes(b"not a zip", Some("mxl"), 1),
        Err(HarpTabError::Archive(_))
    ));
    assert!(matches!(
        parse_bytes(b"<score-partwise>", Some("musicxml"), 1),
        Err(HarpTabError::Xml(_))
    ));
    assert!(matches!(
        parse_bytes(ODE_TO_JOY.as_bytes(), None, 2),
        Err(HarpTabError::PartOutOfRange { requested: 2, available: 1 })
    ));
}

#[test]
fn document_json_carries_tabs_as_lyrics() {
    let doc = tabulate_bytes(BLUES_LICK.as_bytes(), None, 1, &settings(17)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

    assert_eq!(value["outcome"]["status"], "tabbed");
    assert_eq!(value["outcome"]["key"]["name"], "C");
    let first = &value["score"]["measures"][0]["elements"][0];
    assert_eq!(first["kind"], "note");
    assert_eq!(first["pitch"], 67.0);
    assert_eq!(first["lyrics"][0]["text"], "-2");
}
