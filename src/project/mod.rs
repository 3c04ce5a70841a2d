//! Multitrack project model
//!
//! The bundle exchanged with the audio service: project header, tracks with
//! their clips, and timeline markers. Field names follow the service's
//! camelCase JSON schema; fields this crate does not model are carried
//! through untouched.

pub mod duration;
pub mod mixdown;
pub mod template;
pub mod timestamp;
pub mod validate;

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SoundEditError};

pub use duration::calculate_project_duration;
pub use mixdown::{build_mix_request, PreviewWindow};
pub use template::{create_empty_project, DEFAULT_PROJECT_TITLE};
pub use timestamp::Timestamp;
pub use validate::{validate_bundle, ValidationReport};

/// Kind of content a track carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    /// Character dialogue and narration
    Dialogue,
    /// Ambient and environment effects
    Environment,
    /// Background music
    Background,
}

impl TrackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dialogue => "dialogue",
            Self::Environment => "environment",
            Self::Background => "background",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dialogue" => Some(Self::Dialogue),
            "environment" => Some(Self::Environment),
            "background" => Some(Self::Background),
            _ => None,
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Project header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Service-assigned id; empty until the project is created remotely.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,

    /// Timeline length in seconds. Only updated by an explicit recompute.
    #[serde(default)]
    pub total_duration: f64,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_channels")]
    pub channels: u8,

    #[serde(default = "default_bit_depth")]
    pub bit_depth: u16,

    #[serde(default = "default_export_format")]
    pub export_format: String,

    /// Set by the service on creation, with or without an offset.
    #[serde(default)]
    pub created_at: Option<Timestamp>,

    #[serde(default = "default_version")]
    pub version: String,
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u8 {
    2
}

fn default_bit_depth() -> u16 {
    16
}

fn default_export_format() -> String {
    "wav".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_volume() -> f32 {
    1.0
}

fn default_marker_type() -> String {
    "marker".to_string()
}

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Speaker attached to a dialogue clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    /// Voice model identifier
    pub voice: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A timed audio segment placed on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Path of the audio file on the service side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Offset on the timeline in seconds.
    pub start_time: f64,

    /// Length in seconds.
    pub duration: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<f64>,

    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub looped: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Character>,

    /// Source text for dialogue clips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,

    /// Fields this crate does not model, preserved on round-trip.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Clip {
    /// A bare clip with only timing set.
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            id: None,
            name: None,
            file_path: None,
            start_time,
            duration,
            volume: None,
            fade_in: None,
            fade_out: None,
            playback_rate: None,
            looped: None,
            character: None,
            text: None,
            metadata: None,
            unknown_fields: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_fades(mut self, fade_in: f64, fade_out: f64) -> Self {
        self.fade_in = Some(fade_in);
        self.fade_out = Some(fade_out);
        self
    }

    /// End offset of the clip on the timeline.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Clip gain, 1.0 when unset.
    pub fn effective_volume(&self) -> f32 {
        self.volume.unwrap_or(1.0)
    }
}

/// A lane of clips with mix parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub track_type: TrackType,

    /// Track gain in `[0, 1]`.
    #[serde(default = "default_volume")]
    pub volume: f32,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub solo: bool,

    pub color: String,

    /// Display position, 1-based.
    pub order: i32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub clips: Vec<Clip>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// A named point on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Position in seconds.
    pub time: f64,

    #[serde(rename = "type", default = "default_marker_type")]
    pub marker_type: String,

    #[serde(default)]
    pub color: String,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Project header, tracks and markers as exchanged with the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBundle {
    pub project: ProjectInfo,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tracks: Vec<Track>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub markers: Vec<Marker>,
}

impl ProjectBundle {
    /// Find a track by id.
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Find a track by id for editing.
    pub fn track_mut(&mut self, id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// First track of the given type.
    pub fn track_of_type(&self, track_type: TrackType) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_type == track_type)
    }

    /// Number of clips across all tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    /// Tracks sorted by their display order.
    pub fn tracks_in_display_order(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.tracks.iter().collect();
        tracks.sort_by_key(|t| t.order);
        tracks
    }

    /// Parse a bundle from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a bundle from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SoundEditError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the bundle to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
