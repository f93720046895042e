//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge. Each returns
//! the tabulation document as JSON, or null on failure.

use jni::objects::{JByteArray, JClass, JString};
use jni::sys::{jint, jstring};
use jni::JNIEnv;

use crate::{tabulate_bytes, tabulate_file, TabSettings};

fn settings_from_java(env: &mut JNIEnv, settings_json: &JString) -> Option<TabSettings> {
    if settings_json.is_null() {
        return Some(TabSettings::default());
    }
    let json: String = env.get_string(settings_json).ok()?.into();
    if json.trim().is_empty() {
        return Some(TabSettings::default());
    }
    TabSettings::from_json(&json).ok()
}

fn to_java_string(env: &mut JNIEnv, json: Option<String>) -> jstring {
    match json.map(|s| env.new_string(s)) {
        Some(Ok(js)) => js.into_raw(),
        _ => std::ptr::null_mut(),
    }
}

/// Tabulate a MusicXML file at the given path.
///
/// Called from Kotlin as:
///   external fun tabulateFile(path: String, part: Int, settingsJson: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_harptab_app_HarpTab_tabulateFile(
    mut env: JNIEnv,
    _class: JClass,
    path: JString,
    part: jint,
    settings_json: JString,
) -> jstring {
    let path_str: String = match env.get_string(&path) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };
    let Some(settings) = settings_from_java(&mut env, &settings_json) else {
        return std::ptr::null_mut();
    };

    let json = tabulate_file(&path_str, part.max(0) as usize, &settings)
        .and_then(|doc| doc.to_json())
        .ok();
    to_java_string(&mut env, json)
}

/// Tabulate MusicXML bytes.
///
/// Called from Kotlin as:
///   external fun tabulateBytes(data: ByteArray, extension: String?, part: Int, settingsJson: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_harptab_app_HarpTab_tabulateBytes(
    mut env: JNIEnv,
    _class: JClass,
    data: JByteArray,
    extension: JString,
    part: jint,
    settings_json: JString,
) -> jstring {
    let bytes = match env.convert_byte_array(&data) {
        Ok(b) => b,
        Err(_) => return std::ptr::null_mut(),
    };

    let ext: Option<String> = if extension.is_null() {
        None
    } else {
        env.get_string(&extension).ok().map(|s| s.into())
    };
    let Some(settings) = settings_from_java(&mut env, &settings_json) else {
        return std::ptr::null_mut();
    };

    let json = tabulate_bytes(&bytes, ext.as_deref(), part.max(0) as usize, &settings)
        .and_then(|doc| doc.to_json())
        .ok();
    to_java_string(&mut env, json)
}
