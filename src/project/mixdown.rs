//! Mixdown planning
//!
//! Turns a project bundle into the flat track list the service's mixer
//! consumes. Muted tracks are dropped, clip gain is scaled by track gain,
//! and clips without a source file are skipped. A preview window restricts
//! the plan to the clips overlapping it, with start times made relative to
//! the window.

use super::ProjectBundle;
use crate::api::mix::{AudioMixRequest, TrackConfig};

/// Preview length used when the caller does not pick one.
pub const DEFAULT_PREVIEW_SECONDS: f64 = 10.0;

/// Part of the timeline to render for a preview.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreviewWindow {
    /// Window start in seconds.
    pub start: f64,
    /// Window length; `None` means up to ten seconds of what remains.
    pub duration: Option<f64>,
}

impl PreviewWindow {
    pub fn new(start: f64) -> Self {
        Self {
            start,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Concrete `(start, duration)` for a project of length `total`.
    pub fn resolve(&self, total: f64) -> (f64, f64) {
        let start = self.start.max(0.0);
        let duration = self
            .duration
            .unwrap_or_else(|| DEFAULT_PREVIEW_SECONDS.min(total - start));
        (start, duration.max(0.0))
    }
}

/// Plan a mix of the whole project, or of `window` when given.
///
/// Full mixes use the project's export format; previews are always WAV.
pub fn build_mix_request(bundle: &ProjectBundle, window: Option<PreviewWindow>) -> AudioMixRequest {
    let range = window.map(|w| w.resolve(bundle.project.total_duration));
    let mut tracks = Vec::new();

    for track in bundle.tracks.iter().filter(|t| !t.muted) {
        for clip in &track.clips {
            let Some(file_path) = clip.file_path.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };

            let start_time = match range {
                Some((start, duration)) => {
                    if clip.end_time() <= start || clip.start_time >= start + duration {
                        continue;
                    }
                    (clip.start_time - start).max(0.0)
                }
                None => clip.start_time,
            };

            tracks.push(TrackConfig {
                file_path: file_path.to_string(),
                start_time,
                end_time: Some(start_time + clip.duration),
                volume: clip.effective_volume() * track.volume,
                fade_in: clip.fade_in.unwrap_or(0.0),
                fade_out: clip.fade_out.unwrap_or(0.0),
            });
        }
    }

    let output_format = match range {
        Some(_) => "wav".to_string(),
        None => bundle.project.export_format.clone(),
    };

    AudioMixRequest {
        tracks,
        output_format,
    }
}

impl ProjectBundle {
    /// Plan a mix of this project. See [`build_mix_request`].
    pub fn mix_request(&self, window: Option<PreviewWindow>) -> AudioMixRequest {
        build_mix_request(self, window)
    }
}
