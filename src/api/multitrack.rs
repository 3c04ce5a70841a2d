//! Multitrack project endpoints
//!
//! Remote storage of project bundles, conversion from script data, export
//! tasks and preview renders.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::mix::MixApi;
use super::{path_segment, ApiEnvelope, StatusMessage, MULTITRACK_BASE};
use crate::error::Result;
use crate::gateway::{ApiRequest, HttpGateway};
use crate::project::{null_as_default, PreviewWindow, ProjectBundle, ProjectInfo, Timestamp, ValidationReport};
use crate::save::{DownloadOutcome, FileSaver};

/// Reply carrying a whole project.
pub type MultitrackProjectResponse = ApiEnvelope<ProjectBundle>;

#[derive(Debug, Serialize)]
struct ProjectRequest<'a> {
    project: &'a ProjectBundle,
}

/// Script data to turn into a standard project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub dialogue_data: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_music: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_info: Option<serde_json::Value>,
}

/// Acknowledgement of a started export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStarted {
    #[serde(default)]
    pub success: bool,
    pub export_task_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// State of an export task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportState {
    Processing,
    Completed,
    Failed,
    NotFound,
    Error,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::NotFound => "not_found",
            Self::Error => "error",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Progress report for an export task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStatus {
    pub export_task_id: String,
    pub status: ExportState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl ExportStatus {
    /// True once polling can stop.
    pub fn is_finished(&self) -> bool {
        !matches!(self.status, ExportState::Processing | ExportState::Unknown)
    }

    pub fn is_completed(&self) -> bool {
        self.status == ExportState::Completed
    }
}

/// A rendered preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewData {
    /// File id for [`MultitrackApi::preview_audio_url`].
    pub preview_file: String,
    pub start_time: f64,
    pub duration: f64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    44100
}

pub type PreviewResponse = ApiEnvelope<PreviewData>;

/// Client for `/api/v1/multitrack`.
pub struct MultitrackApi<'a, G: ?Sized> {
    gateway: &'a G,
}

impl<'a, G: HttpGateway + ?Sized> MultitrackApi<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", MULTITRACK_BASE, suffix)
    }

    /// `<base>/<action>/<id>`, refusing ids that would alter the path.
    fn item_path(action: &str, id: &str) -> Result<String> {
        Ok(format!("{}/{}/{}", MULTITRACK_BASE, action, path_segment(id)?))
    }

    /// Store a new project. The reply carries the service-assigned id.
    pub fn create(&self, bundle: &ProjectBundle) -> Result<MultitrackProjectResponse> {
        let request =
            ApiRequest::post(Self::path("/create")).json(&ProjectRequest { project: bundle })?;
        self.gateway.execute(&request)?.json("Create project")
    }

    pub fn load(&self, project_id: &str) -> Result<MultitrackProjectResponse> {
        self.gateway
            .execute(&ApiRequest::get(Self::item_path("load", project_id)?))?
            .json("Load project")
    }

    /// Overwrite a stored project.
    pub fn save(&self, project_id: &str, bundle: &ProjectBundle) -> Result<MultitrackProjectResponse> {
        let request = ApiRequest::put(Self::item_path("save", project_id)?)
            .json(&ProjectRequest { project: bundle })?;
        self.gateway.execute(&request)?.json("Save project")
    }

    /// Headers of every stored project.
    pub fn list(&self) -> Result<Vec<ProjectInfo>> {
        self.gateway
            .execute(&ApiRequest::get(Self::path("/list")))?
            .json("List projects")
    }

    pub fn delete(&self, project_id: &str) -> Result<StatusMessage> {
        self.gateway
            .execute(&ApiRequest::delete(Self::item_path("delete", project_id)?))?
            .json("Delete project")
    }

    /// Build a standard project from dialogue and environment script data.
    pub fn convert_to_standard_format(
        &self,
        conversion: &ConversionRequest,
    ) -> Result<MultitrackProjectResponse> {
        let request = ApiRequest::post(Self::path("/convert")).json(conversion)?;
        self.gateway.execute(&request)?.json("Convert project")
    }

    /// Run the service's integrity checks on a stored project.
    pub fn validate(&self, project_id: &str) -> Result<ValidationReport> {
        self.gateway
            .execute(&ApiRequest::get(Self::item_path("validate", project_id)?))?
            .json("Validate project")
    }

    /// Start rendering a project in the background.
    pub fn export(&self, project_id: &str) -> Result<ExportStarted> {
        let started: ExportStarted = self
            .gateway
            .execute(&ApiRequest::post(Self::item_path("export", project_id)?))?
            .json("Export project")?;
        tracing::info!(project_id, task = %started.export_task_id, "export started");
        Ok(started)
    }

    pub fn export_status(&self, export_task_id: &str) -> Result<ExportStatus> {
        self.gateway
            .execute(&ApiRequest::get(Self::item_path("export/status", export_task_id)?))?
            .json("Get export status")
    }

    /// Download a finished export as `multitrack_export_<task>.wav`.
    pub fn download_export(
        &self,
        export_task_id: &str,
        saver: &dyn FileSaver,
    ) -> Result<DownloadOutcome> {
        let bytes = self
            .gateway
            .execute(&ApiRequest::get(Self::item_path("export/download", export_task_id)?))?
            .bytes("Download export")?;

        let path = saver.save(&format!("multitrack_export_{}.wav", export_task_id), &bytes)?;
        Ok(DownloadOutcome::saved(path, bytes.len()))
    }

    /// Render part of a stored project for listening.
    pub fn generate_preview(&self, project_id: &str, window: PreviewWindow) -> Result<PreviewResponse> {
        let mut request = ApiRequest::post(Self::item_path("preview", project_id)?)
            .query("start_time", window.start);
        if let Some(duration) = window.duration {
            request = request.query("duration", duration);
        }
        self.gateway.execute(&request)?.json("Generate preview")
    }

    /// Absolute URL a player can stream a rendered preview from.
    pub fn preview_audio_url(&self, file_id: &str) -> Result<String> {
        Ok(self
            .gateway
            .url_for(&Self::item_path("preview/download", file_id)?))
    }

    /// Remove a rendered preview file. Served by the audio editor endpoints.
    pub fn delete_preview_file(&self, filename: &str) -> Result<StatusMessage> {
        MixApi::new(self.gateway).delete_preview_file(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Method, MockGateway};
    use crate::project::create_empty_project;

    #[test]
    fn test_export_state_parsing() {
        let status: ExportStatus = serde_json::from_str(
            r#"{"export_task_id": "e1", "status": "not_found", "message": "missing"}"#,
        )
        .unwrap();
        assert_eq!(status.status, ExportState::NotFound);
        assert!(status.is_finished());
        assert!(!status.is_completed());

        let status: ExportStatus = serde_json::from_str(
            r#"{"export_task_id": "e1", "status": "queued", "updated_at": "2024-05-01T10:30:00.123456"}"#,
        )
        .unwrap();
        assert_eq!(status.status, ExportState::Unknown);
        assert!(!status.is_finished());
        assert!(status.updated_at.is_some());
    }

    #[test]
    fn test_status_with_null_message_and_offset_time() {
        let status: ExportStatus = serde_json::from_str(
            r#"{"export_task_id": "e2", "status": "completed", "message": null,
                "updated_at": "2024-05-01T10:30:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(status.message, "");
        assert_eq!(
            status.updated_at.unwrap().as_str(),
            "2024-05-01T10:30:00+00:00"
        );
    }

    #[test]
    fn test_ids_that_alter_the_path_are_refused() {
        let gateway = MockGateway::new();
        let api = MultitrackApi::new(&gateway);

        assert_eq!(api.load("a/b").unwrap_err().error_code(), "INVALID_ID");
        assert_eq!(api.export_status("t?x=1").unwrap_err().error_code(), "INVALID_ID");
        assert!(api.preview_audio_url("f#1").is_err());
        assert!(gateway.requests().is_empty());
    }

    #[test]
    fn test_create_wraps_bundle() {
        let gateway = MockGateway::new();
        let mut stored = create_empty_project(Some("Remote"));
        stored.project.id = "p-1".to_string();
        gateway.push_json(
            200,
            serde_json::json!({"success": true, "data": serde_json::to_value(&stored).unwrap()}),
        );

        let reply = MultitrackApi::new(&gateway)
            .create(&create_empty_project(Some("Remote")))
            .unwrap();
        assert_eq!(reply.data.unwrap().project.id, "p-1");

        let sent = gateway.last_request().unwrap();
        assert_eq!(sent.path, "/api/v1/multitrack/create");
        if let crate::gateway::RequestBody::Json(body) = sent.body {
            assert_eq!(body["project"]["project"]["title"], "Remote");
            assert_eq!(body["project"]["tracks"].as_array().unwrap().len(), 3);
        } else {
            panic!("expected JSON body");
        }
    }

    #[test]
    fn test_preview_query_parameters() {
        let gateway = MockGateway::new();
        gateway.push_json(
            200,
            serde_json::json!({"success": true, "data": {
                "preview_file": "abc", "start_time": 5.0, "duration": 10.0
            }}),
        );

        let api = MultitrackApi::new(&gateway);
        let preview = api
            .generate_preview("p-1", PreviewWindow::new(5.0))
            .unwrap()
            .data
            .unwrap();
        assert_eq!(preview.sample_rate, 44100);

        let sent = gateway.last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.query_value("start_time"), Some("5"));
        assert_eq!(sent.query_value("duration"), None);

        assert_eq!(
            api.preview_audio_url(&preview.preview_file).unwrap(),
            "http://localhost:8000/api/v1/multitrack/preview/download/abc"
        );
    }
}
