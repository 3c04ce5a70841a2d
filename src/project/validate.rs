//! Project integrity checks
//!
//! Same rules and report shape as the service's validate endpoint, run on a
//! local bundle. The report is advisory: nothing in the client refuses to
//! send a bundle that fails it.

use serde::{Deserialize, Serialize};

use super::ProjectBundle;

/// Outcome of validating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,

    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl ValidationReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Check a bundle for the problems the service reports.
///
/// Errors: empty title, non-positive `totalDuration`, clips starting before
/// zero, clips with non-positive duration. Warnings: no tracks at all.
pub fn validate_bundle(bundle: &ProjectBundle) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if bundle.project.title.trim().is_empty() {
        errors.push("Project title must not be empty".to_string());
    }

    // NaN fails the comparison, so check it explicitly
    let total = bundle.project.total_duration;
    if total.is_nan() || total <= 0.0 {
        errors.push("Project total duration must be greater than 0".to_string());
    }

    if bundle.tracks.is_empty() {
        warnings.push("Project has no tracks".to_string());
    }

    for track in &bundle.tracks {
        for (index, clip) in track.clips.iter().enumerate() {
            let label = clip
                .id
                .clone()
                .unwrap_or_else(|| format!("{}[{}]", track.id, index));

            if clip.start_time < 0.0 {
                errors.push(format!("Clip {} starts before 0", label));
            }
            if clip.duration.is_nan() || clip.duration <= 0.0 {
                errors.push(format!("Clip {} must have a duration greater than 0", label));
            }
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        project_id: (!bundle.project.id.is_empty()).then(|| bundle.project.id.clone()),
    }
}

impl ProjectBundle {
    pub fn validate(&self) -> ValidationReport {
        validate_bundle(self)
    }
}
