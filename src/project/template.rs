//! Empty project template
//!
//! New projects start with the three standard lanes: dialogue, environment
//! effects and background music, in that display order.

use std::collections::HashMap;

use super::{ProjectBundle, ProjectInfo, Track, TrackType};

/// Title used when the caller does not supply one.
pub const DEFAULT_PROJECT_TITLE: &str = "New Project";

/// Author stamped on projects created by this client.
pub const DEFAULT_AUTHOR: &str = "AI-Sound";

impl TrackType {
    /// Fixed id of the preset track of this type.
    pub fn preset_id(&self) -> &'static str {
        match self {
            Self::Dialogue => "track_dialogue",
            Self::Environment => "track_environment",
            Self::Background => "track_background",
        }
    }

    /// Display name of the preset track of this type.
    pub fn preset_name(&self) -> &'static str {
        match self {
            Self::Dialogue => "Dialogue",
            Self::Environment => "Environment",
            Self::Background => "Background Music",
        }
    }

    /// Default gain of the preset track of this type.
    pub fn preset_volume(&self) -> f32 {
        match self {
            Self::Dialogue => 1.0,
            Self::Environment => 0.8,
            Self::Background => 0.5,
        }
    }

    /// Lane colour of the preset track of this type.
    pub fn preset_color(&self) -> &'static str {
        match self {
            Self::Dialogue => "#3498db",
            Self::Environment => "#27ae60",
            Self::Background => "#e74c3c",
        }
    }

    /// Display position of the preset track of this type.
    pub fn preset_order(&self) -> i32 {
        match self {
            Self::Dialogue => 1,
            Self::Environment => 2,
            Self::Background => 3,
        }
    }
}

impl Track {
    /// The standard empty track for a lane type.
    pub fn preset(track_type: TrackType) -> Self {
        Self {
            id: track_type.preset_id().to_string(),
            name: track_type.preset_name().to_string(),
            track_type,
            volume: track_type.preset_volume(),
            muted: false,
            solo: false,
            color: track_type.preset_color().to_string(),
            order: track_type.preset_order(),
            clips: Vec::new(),
            unknown_fields: HashMap::new(),
        }
    }
}

impl ProjectInfo {
    /// Header with the default audio settings and no service id yet.
    pub fn new(title: &str) -> Self {
        Self {
            id: String::new(),
            title: title.to_string(),
            description: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            total_duration: 0.0,
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
            export_format: "wav".to_string(),
            created_at: None,
            version: "1.0".to_string(),
        }
    }
}

impl ProjectBundle {
    /// An empty project with the three preset tracks.
    pub fn empty(title: Option<&str>) -> Self {
        Self {
            project: ProjectInfo::new(title.unwrap_or(DEFAULT_PROJECT_TITLE)),
            tracks: [
                TrackType::Dialogue,
                TrackType::Environment,
                TrackType::Background,
            ]
            .into_iter()
            .map(Track::preset)
            .collect(),
            markers: Vec::new(),
        }
    }
}

/// Build an empty project, titled `title` or [`DEFAULT_PROJECT_TITLE`].
pub fn create_empty_project(title: Option<&str>) -> ProjectBundle {
    ProjectBundle::empty(title)
}
