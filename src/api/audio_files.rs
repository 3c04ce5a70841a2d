//! Audio file endpoints: upload, listing, inspection, conversion,
//! trimming, deletion and download.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{path_segment, ApiEnvelope, StatusMessage, AUDIO_FILES_BASE};
use crate::error::{Result, SoundEditError};
use crate::format::{audio_mime_for_path, is_valid_audio_file};
use crate::gateway::{ApiRequest, FilePart, HttpGateway};
use crate::save::{DownloadOutcome, FileSaver};

/// Category assigned to uploads when none is given.
pub const DEFAULT_CATEGORY: &str = "dialogue";
pub const DEFAULT_WAVEFORM_WIDTH: u32 = 800;
pub const DEFAULT_WAVEFORM_HEIGHT: u32 = 100;

/// An audio file ready to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    pub fn from_bytes(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, typing it by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SoundEditError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mime = audio_mime_for_path(path).ok_or_else(|| SoundEditError::UnsupportedAudioType {
            path: path.to_path_buf(),
            mime: "unknown".to_string(),
        })?;

        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self::from_bytes(file_name, mime, fs::read(path)?))
    }

    /// Refuse anything outside the audio MIME allow-list.
    fn check_type(&self) -> Result<()> {
        if is_valid_audio_file(&self.mime) {
            Ok(())
        } else {
            Err(SoundEditError::UnsupportedAudioType {
                path: PathBuf::from(&self.file_name),
                mime: self.mime.clone(),
            })
        }
    }

    fn to_part(&self, field: &str) -> FilePart {
        FilePart {
            field: field.to_string(),
            file_name: self.file_name.clone(),
            mime: self.mime.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

/// Where an upload is filed on the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub category: String,
    pub project_id: Option<String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            project_id: None,
        }
    }
}

impl UploadOptions {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        request = request.query("category", &self.category);
        if let Some(project_id) = &self.project_id {
            request = request.query("project_id", project_id);
        }
        request
    }
}

/// Target format for a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub output_format: String,
    pub sample_rate: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_format: "wav".to_string(),
            sample_rate: 44100,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrimRequest {
    start_time: f64,
    duration: f64,
}

/// Peak data for drawing a file's waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformData {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub waveform: serde_json::Value,
}

/// Where a converted file ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedFile {
    pub file_id: String,
    pub output_path: String,
    pub format: String,
    pub sample_rate: u32,
}

/// Result of trimming a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimmedFile {
    pub trim_id: String,
    pub output_path: String,
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub file_info: serde_json::Value,
}

/// Audio service capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ffmpeg_available: bool,
    #[serde(default)]
    pub upload_dir: String,
    #[serde(default)]
    pub max_file_size: u64,
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
}

/// Client for `/api/v1/audio-files`.
pub struct AudioFilesApi<'a, G: ?Sized> {
    gateway: &'a G,
}

impl<'a, G: HttpGateway + ?Sized> AudioFilesApi<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", AUDIO_FILES_BASE, suffix)
    }

    /// `<base>/<action>/<id>`, refusing ids that would alter the path.
    fn item_path(action: &str, id: &str) -> Result<String> {
        Ok(format!("{}/{}/{}", AUDIO_FILES_BASE, action, path_segment(id)?))
    }

    /// Upload one audio file.
    pub fn upload(
        &self,
        file: &AudioUpload,
        options: &UploadOptions,
    ) -> Result<ApiEnvelope<serde_json::Value>> {
        file.check_type()?;

        let request = options
            .apply(ApiRequest::post(Self::path("/upload")))
            .multipart(vec![file.to_part("file")]);
        self.gateway.execute(&request)?.json("Upload")
    }

    /// Upload several audio files in one request.
    pub fn upload_multiple(
        &self,
        files: &[AudioUpload],
        options: &UploadOptions,
    ) -> Result<ApiEnvelope<Vec<serde_json::Value>>> {
        for file in files {
            file.check_type()?;
        }

        let parts = files.iter().map(|f| f.to_part("files")).collect();
        let request = options
            .apply(ApiRequest::post(Self::path("/upload/multiple")))
            .multipart(parts);
        self.gateway.execute(&request)?.json("Batch upload")
    }

    /// List uploaded files.
    pub fn list(&self) -> Result<ApiEnvelope<serde_json::Value>> {
        self.gateway
            .execute(&ApiRequest::get(Self::path("/list")))?
            .json("List files")
    }

    /// Detailed information about one file.
    pub fn info(&self, file_id: &str) -> Result<ApiEnvelope<serde_json::Value>> {
        self.gateway
            .execute(&ApiRequest::get(Self::item_path("info", file_id)?))?
            .json("Get file info")
    }

    /// Waveform at the default 800x100 size.
    pub fn waveform(&self, file_id: &str) -> Result<ApiEnvelope<WaveformData>> {
        self.waveform_sized(file_id, DEFAULT_WAVEFORM_WIDTH, DEFAULT_WAVEFORM_HEIGHT)
    }

    pub fn waveform_sized(
        &self,
        file_id: &str,
        width: u32,
        height: u32,
    ) -> Result<ApiEnvelope<WaveformData>> {
        let request = ApiRequest::get(Self::item_path("waveform", file_id)?)
            .query("width", width)
            .query("height", height);
        self.gateway.execute(&request)?.json("Get waveform")
    }

    /// Convert a file to another format and sample rate.
    pub fn convert(
        &self,
        file_id: &str,
        options: &ConvertOptions,
    ) -> Result<ApiEnvelope<ConvertedFile>> {
        let request = ApiRequest::post(Self::item_path("convert", file_id)?).json(options)?;
        self.gateway.execute(&request)?.json("Convert file")
    }

    pub fn delete(&self, file_id: &str) -> Result<StatusMessage> {
        self.gateway
            .execute(&ApiRequest::delete(Self::item_path("delete", file_id)?))?
            .json("Delete file")
    }

    /// Download a file and save it as `audio_<file_id>`.
    pub fn download(&self, file_id: &str, saver: &dyn FileSaver) -> Result<DownloadOutcome> {
        let bytes = self
            .gateway
            .execute(&ApiRequest::get(Self::item_path("download", file_id)?))?
            .bytes("Download file")?;

        let path = saver.save(&format!("audio_{}", file_id), &bytes)?;
        Ok(DownloadOutcome::saved(path, bytes.len()))
    }

    /// Cut `duration` seconds starting at `start_time` into a new file.
    pub fn trim(
        &self,
        file_id: &str,
        start_time: f64,
        duration: f64,
    ) -> Result<ApiEnvelope<TrimmedFile>> {
        let request = ApiRequest::post(Self::item_path("trim", file_id)?)
            .json(&TrimRequest {
                start_time,
                duration,
            })?;
        self.gateway.execute(&request)?.json("Trim file")
    }

    pub fn health(&self) -> Result<ApiEnvelope<HealthStatus>> {
        self.gateway
            .execute(&ApiRequest::get(Self::path("/health")))?
            .json("Health check")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Method, MockGateway, RequestBody};

    fn wav(name: &str) -> AudioUpload {
        AudioUpload::from_bytes(name, "audio/wav", b"RIFF".to_vec())
    }

    #[test]
    fn test_upload_sends_multipart_and_category() {
        let gateway = MockGateway::new();
        gateway.push_json(200, serde_json::json!({"success": true, "data": {"file_id": "f1"}}));

        let api = AudioFilesApi::new(&gateway);
        let reply = api
            .upload(&wav("line1.wav"), &UploadOptions::default().project("p9"))
            .unwrap();
        assert!(reply.success);

        let request = gateway.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/api/v1/audio-files/upload");
        assert_eq!(request.query_value("category"), Some("dialogue"));
        assert_eq!(request.query_value("project_id"), Some("p9"));
        match request.body {
            RequestBody::Multipart(parts) => {
                assert_eq!(parts.len(), 1);
                assert_eq!(parts[0].field, "file");
                assert_eq!(parts[0].file_name, "line1.wav");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn test_upload_rejects_non_audio_before_sending() {
        let gateway = MockGateway::new();
        let api = AudioFilesApi::new(&gateway);

        let video = AudioUpload::from_bytes("clip.mp4", "video/mp4", Vec::new());
        let err = api.upload(&video, &UploadOptions::default()).unwrap_err();

        assert_eq!(err.error_code(), "UNSUPPORTED_AUDIO_TYPE");
        assert!(gateway.requests().is_empty());
    }

    #[test]
    fn test_upload_multiple_uses_files_field() {
        let gateway = MockGateway::new();
        gateway.push_json(200, serde_json::json!({"success": true, "data": [{}, {}]}));

        let api = AudioFilesApi::new(&gateway);
        let reply = api
            .upload_multiple(
                &[wav("a.wav"), wav("b.wav")],
                &UploadOptions::default().category("environment"),
            )
            .unwrap();
        assert_eq!(reply.data.unwrap().len(), 2);

        let request = gateway.last_request().unwrap();
        assert_eq!(request.path, "/api/v1/audio-files/upload/multiple");
        assert_eq!(request.query_value("category"), Some("environment"));
        assert_eq!(request.query_value("project_id"), None);
        if let RequestBody::Multipart(parts) = request.body {
            assert!(parts.iter().all(|p| p.field == "files"));
        }
    }

    #[test]
    fn test_waveform_default_size() {
        let gateway = MockGateway::new();
        gateway.push_json(
            200,
            serde_json::json!({
                "success": true,
                "data": {"file_id": "f1", "width": 800, "height": 100, "waveform": [0.2, 0.5]}
            }),
        );

        let data = AudioFilesApi::new(&gateway).waveform("f1").unwrap().data.unwrap();
        assert_eq!(data.width, 800);

        let request = gateway.last_request().unwrap();
        assert_eq!(request.path, "/api/v1/audio-files/waveform/f1");
        assert_eq!(request.query_value("width"), Some("800"));
        assert_eq!(request.query_value("height"), Some("100"));
    }

    #[test]
    fn test_convert_and_trim_send_json() {
        let gateway = MockGateway::new();
        gateway
            .push_json(
                200,
                serde_json::json!({"success": true, "data": {
                    "file_id": "f1", "output_path": "/out/f1.mp3", "format": "mp3", "sample_rate": 48000
                }}),
            )
            .push_json(
                200,
                serde_json::json!({"success": true, "data": {
                    "trim_id": "t1", "output_path": "/out/t1.wav", "start_time": 1.5, "duration": 2.0
                }}),
            );

        let api = AudioFilesApi::new(&gateway);
        let options = ConvertOptions {
            output_format: "mp3".to_string(),
            sample_rate: 48000,
        };
        api.convert("f1", &options).unwrap();
        let trimmed = api.trim("f1", 1.5, 2.0).unwrap().data.unwrap();
        assert_eq!(trimmed.trim_id, "t1");

        let requests = gateway.requests();
        assert_eq!(
            requests[0].body,
            RequestBody::Json(serde_json::json!({"output_format": "mp3", "sample_rate": 48000}))
        );
        assert_eq!(requests[1].path, "/api/v1/audio-files/trim/f1");
        assert_eq!(
            requests[1].body,
            RequestBody::Json(serde_json::json!({"start_time": 1.5, "duration": 2.0}))
        );
    }

    #[test]
    fn test_delete_failure_reports_status() {
        let gateway = MockGateway::new();
        gateway.push_json(404, serde_json::json!({"detail": "file not found"}));

        let err = AudioFilesApi::new(&gateway).delete("missing").unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().starts_with("Delete file failed"));
        assert_eq!(gateway.last_request().unwrap().method, Method::Delete);
    }

    #[test]
    fn test_file_id_with_separator_is_refused() {
        let gateway = MockGateway::new();
        let api = AudioFilesApi::new(&gateway);

        assert_eq!(api.info("a/b").unwrap_err().error_code(), "INVALID_ID");
        assert_eq!(api.delete("..").unwrap_err().error_code(), "INVALID_ID");
        assert!(gateway.requests().is_empty());
    }
}
