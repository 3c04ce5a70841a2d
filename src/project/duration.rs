//! Project duration
//!
//! The length of a project is the latest clip end on any track. It is
//! recomputed on request, never kept in sync with clip edits.

use super::{Clip, ProjectBundle};

/// Non-finite and negative values count as zero.
fn sanitized(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// End offset of a clip with malformed timing treated as zero.
fn clip_end(clip: &Clip) -> f64 {
    sanitized(clip.start_time) + sanitized(clip.duration)
}

/// Latest clip end across all tracks, or `0.0` for a project without clips.
pub fn calculate_project_duration(bundle: &ProjectBundle) -> f64 {
    bundle
        .tracks
        .iter()
        .flat_map(|track| track.clips.iter())
        .map(clip_end)
        .fold(0.0, f64::max)
}

impl ProjectBundle {
    /// Compute the timeline length without touching `totalDuration`.
    pub fn calculate_duration(&self) -> f64 {
        calculate_project_duration(self)
    }

    /// Recompute `totalDuration` from the clips and return the new value.
    pub fn refresh_total_duration(&mut self) -> f64 {
        let total = calculate_project_duration(self);
        self.project.total_duration = total;
        total
    }
}
