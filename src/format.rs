//! Display formatting and audio file classification.
//!
//! Times are truncated, never rounded: 59.9 seconds is still `0:59`.
//! Negative and non-finite times are shown as zero.

use std::path::Path;

/// MIME types the service accepts for upload.
pub const AUDIO_MIME_TYPES: [&str; 11] = [
    "audio/mp3",
    "audio/mpeg",
    "audio/wav",
    "audio/wave",
    "audio/flac",
    "audio/aac",
    "audio/ogg",
    "audio/m4a",
    "audio/x-ms-wma",
    "audio/opus",
    "audio/aiff",
];

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

fn clamp_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Format seconds as `M:SS`. Minutes are not capped at 59.
pub fn format_time(seconds: f64) -> String {
    let seconds = clamp_seconds(seconds);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}

/// Format seconds as `H:MM:SS`, or `M:SS` when under an hour.
pub fn format_duration(seconds: f64) -> String {
    let seconds = clamp_seconds(seconds);
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a byte count in the largest fitting unit up to GB.
///
/// The value is rounded to two decimals with trailing zeros dropped,
/// so 1536 bytes is `1.5 KB` and 1024 bytes is `1 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit < SIZE_UNITS.len() - 1 && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Whether `mime` is one of the accepted audio MIME types (exact match).
pub fn is_valid_audio_file(mime: &str) -> bool {
    AUDIO_MIME_TYPES.contains(&mime)
}

/// Accepted MIME type for a file, judged by its extension.
pub fn audio_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "m4a" => "audio/m4a",
        "wma" => "audio/x-ms-wma",
        "opus" => "audio/opus",
        "aiff" | "aif" => "audio/aiff",
        _ => return None,
    };
    Some(mime)
}
