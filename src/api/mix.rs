//! Mixing endpoints of the audio editor service.

use serde::{Deserialize, Serialize};

use super::{path_segment, StatusMessage, AUDIO_EDITOR_BASE};
use crate::error::Result;
use crate::gateway::{ApiRequest, HttpGateway};

/// One source placed on the mix timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub file_path: String,

    /// Seconds from the start of the mix.
    #[serde(default)]
    pub start_time: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,

    #[serde(default = "unit_volume")]
    pub volume: f32,

    #[serde(default)]
    pub fade_in: f64,

    #[serde(default)]
    pub fade_out: f64,
}

fn unit_volume() -> f32 {
    1.0
}

/// Body of a mix request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMixRequest {
    pub tracks: Vec<TrackConfig>,

    #[serde(default = "default_output_format")]
    pub output_format: String,
}

fn default_output_format() -> String {
    "wav".to_string()
}

impl AudioMixRequest {
    /// Latest end point of any track, in seconds.
    pub fn length(&self) -> f64 {
        self.tracks
            .iter()
            .map(|t| t.end_time.unwrap_or(t.start_time))
            .fold(0.0, f64::max)
    }
}

/// Task handle returned by the mixer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMixResponse {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub output_url: Option<String>,
}

impl AudioMixResponse {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Client for the mixing part of `/api/v1/audio-editor`.
pub struct MixApi<'a, G: ?Sized> {
    gateway: &'a G,
}

impl<'a, G: HttpGateway + ?Sized> MixApi<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Submit a mix and return the task handle.
    pub fn mix_audio(&self, request: &AudioMixRequest) -> Result<AudioMixResponse> {
        tracing::debug!(
            tracks = request.tracks.len(),
            format = %request.output_format,
            "submitting mix"
        );
        let request =
            ApiRequest::post(format!("{}/mix", AUDIO_EDITOR_BASE)).json(request)?;
        self.gateway.execute(&request)?.json("Mix audio")
    }

    /// Poll a mix task.
    pub fn task_status(&self, task_id: &str) -> Result<AudioMixResponse> {
        self.gateway
            .execute(&ApiRequest::get(format!(
                "{}/task/{}",
                AUDIO_EDITOR_BASE,
                path_segment(task_id)?
            )))?
            .json("Get task status")
    }

    /// Remove a rendered preview file from the service.
    pub fn delete_preview_file(&self, filename: &str) -> Result<StatusMessage> {
        self.gateway
            .execute(&ApiRequest::delete(format!(
                "{}/preview/{}",
                AUDIO_EDITOR_BASE,
                path_segment(filename)?
            )))?
            .json("Delete preview file")
    }
}
