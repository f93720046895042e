//! harptab — harmonica tablature for parsed scores.
//!
//! Maps every pitch of a score to a hole and technique (blow, draw, bend,
//! overblow) for a chosen harmonica type, tuning and key, narrows the key
//! list to what the player can handle, and writes the tabs back onto the
//! score as lyric lines plus a plain-text tablature.
//!
//! # Example
//! ```no_run
//! use harptab::{tabulate_file, TabOutcome, TabSettings};
//!
//! let doc = tabulate_file("path/to/tune.musicxml", 1, &TabSettings::default()).unwrap();
//! match doc.outcome {
//!     TabOutcome::Tabbed(report) => println!("{}: {}", report.key.name, report.tablature.text),
//!     TabOutcome::NoPlayableKey => println!("Relax a constraint"),
//! }
//! ```

pub mod chords;
pub mod error;
pub mod harp_map;
pub mod keys;
pub mod model;
pub mod mxl;
pub mod parser;
pub mod session;
pub mod tablature;
pub mod tunings;

#[cfg(target_os = "android")]
pub mod android;

use std::path::Path;

pub use chords::{reduce_chords, ChordReduction};
pub use error::{HarpTabError, Result};
pub use harp_map::HarmonicaMap;
pub use keys::{clamp_key_index, default_key_options, filter_keys, KeyConstraints, KeyOption};
pub use model::*;
pub use mxl::parse_mxl;
pub use parser::parse_musicxml;
pub use session::{apply_metadata, available_keys, tabulate, TabDocument, TabOutcome, TabReport, TabSettings};
pub use tablature::{label_notes, Tablature, UNAVAILABLE_TAB};
pub use tunings::{tuning_names, tuning_table, HarmonicaType, TabMarker};

/// Parse one part (1-based) of a MusicXML file from a file path.
/// Automatically detects format based on file extension:
/// - `.musicxml` or `.xml` → uncompressed MusicXML
/// - `.mxl` → compressed MXL (ZIP archive)
pub fn parse_file<P: AsRef<Path>>(path: P, part_number: usize) -> Result<Score> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| HarpTabError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_bytes(&data, path.extension().and_then(|e| e.to_str()), part_number)
}

/// Parse MusicXML from raw bytes with an optional format hint.
/// If `extension` is None, tries to auto-detect the format.
pub fn parse_bytes(data: &[u8], extension: Option<&str>, part_number: usize) -> Result<Score> {
    match extension {
        Some("mxl") => parse_mxl(data, part_number),
        Some("musicxml") | Some("xml") => {
            let xml = std::str::from_utf8(data)?;
            parse_musicxml(xml, part_number)
        }
        _ => {
            // Auto-detect: try as XML first, then as MXL
            if let Ok(xml) = std::str::from_utf8(data) {
                if xml.trim_start().starts_with('<') {
                    return parse_musicxml(xml, part_number);
                }
            }
            parse_mxl(data, part_number)
        }
    }
}

/// Parse a file and tabulate the chosen part. The file name becomes the title.
pub fn tabulate_file<P: AsRef<Path>>(
    path: P,
    part_number: usize,
    settings: &TabSettings,
) -> Result<TabDocument> {
    let path = path.as_ref();
    let mut score = parse_file(path, part_number)?;
    let stem = path.file_stem().and_then(|s| s.to_str());
    let outcome = tabulate(&mut score, settings, stem);
    Ok(TabDocument { score, outcome })
}

/// Parse bytes and tabulate the chosen part.
pub fn tabulate_bytes(
    data: &[u8],
    extension: Option<&str>,
    part_number: usize,
    settings: &TabSettings,
) -> Result<TabDocument> {
    let mut score = parse_bytes(data, extension, part_number)?;
    let outcome = tabulate(&mut score, settings, None);
    Ok(TabDocument { score, outcome })
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Settings from a nullable C string; null or empty means defaults.
unsafe fn settings_from_ptr(settings_json: *const c_char) -> Option<TabSettings> {
    if settings_json.is_null() {
        return Some(TabSettings::default());
    }
    let json = unsafe { CStr::from_ptr(settings_json) }.to_str().ok()?;
    if json.trim().is_empty() {
        return Some(TabSettings::default());
    }
    TabSettings::from_json(json).ok()
}

fn document_to_c_string(doc: Result<TabDocument>) -> *mut c_char {
    match doc.and_then(|d| d.to_json()) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("Tabulation failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Tabulate a MusicXML file and return the document as JSON.
/// The caller must free the returned string with `harptab_free_string`.
///
/// # Safety
/// `path` must be a valid null-terminated UTF-8 C string. `settings_json`
/// may be null.
#[no_mangle]
pub unsafe extern "C" fn harptab_tabulate_file(
    path: *const c_char,
    part_number: u32,
    settings_json: *const c_char,
) -> *mut c_char {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let path_str = match unsafe { CStr::from_ptr(path) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };
    let Some(settings) = (unsafe { settings_from_ptr(settings_json) }) else {
        return std::ptr::null_mut();
    };

    document_to_c_string(tabulate_file(path_str, part_number as usize, &settings))
}

/// Tabulate MusicXML bytes and return the document as JSON.
/// The caller must free the returned string with `harptab_free_string`.
///
/// # Safety
/// `data` must point to `len` valid bytes. `extension` and `settings_json`
/// may be null.
#[no_mangle]
pub unsafe extern "C" fn harptab_tabulate_bytes(
    data: *const u8,
    len: usize,
    extension: *const c_char,
    part_number: u32,
    settings_json: *const c_char,
) -> *mut c_char {
    if data.is_null() || len == 0 {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    let ext = if extension.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(extension) }.to_str().ok()
    };
    let Some(settings) = (unsafe { settings_from_ptr(settings_json) }) else {
        return std::ptr::null_mut();
    };

    document_to_c_string(tabulate_bytes(bytes, ext, part_number as usize, &settings))
}

/// Free a string previously returned by harptab functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a harptab function, or null.
#[no_mangle]
pub unsafe extern "C" fn harptab_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
