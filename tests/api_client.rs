//! API Client Tests
//!
//! Drive the service clients through `MockGateway` and check both the
//! requests they build and how they read replies.

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

use soundedit::api::{AudioUpload, ConversionRequest, ExportState, UploadOptions};
use soundedit::gateway::{ApiResponse, Method, MockGateway, RequestBody};
use soundedit::project::{PreviewWindow, ValidationReport};
use soundedit::save::DirectorySaver;
use soundedit::{create_empty_project, Clip, SoundEditClient, SoundEditError};

fn client() -> SoundEditClient<MockGateway> {
    SoundEditClient::new(MockGateway::new())
}

// === Audio files ===

#[test]
fn test_upload_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Narration.MP3");
    std::fs::write(&path, b"ID3").unwrap();

    let client = client();
    client
        .gateway()
        .push_json(200, json!({"success": true, "data": {"file_id": "f-1"}}));

    let upload = AudioUpload::from_path(&path).unwrap();
    assert_eq!(upload.mime, "audio/mpeg");

    let reply = client
        .audio_files()
        .upload(&upload, &UploadOptions::default())
        .unwrap();
    assert_eq!(reply.data.unwrap()["file_id"], "f-1");

    let sent = client.gateway().last_request().unwrap();
    match sent.body {
        RequestBody::Multipart(parts) => assert_eq!(parts[0].bytes, b"ID3"),
        other => panic!("expected multipart body, got {:?}", other),
    }
}

#[test]
fn test_upload_unknown_extension_is_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"hello").unwrap();

    let err = AudioUpload::from_path(&path).unwrap_err();
    assert!(matches!(err, SoundEditError::UnsupportedAudioType { .. }));
    assert!(!err.recovery_suggestions().is_empty());
}

#[test]
fn test_upload_missing_file() {
    let err = AudioUpload::from_path(std::path::Path::new("/no/such/take.wav")).unwrap_err();
    assert_eq!(err.error_code(), "FILE_NOT_FOUND");
}

#[test]
fn test_download_saves_audio_file() {
    let dir = tempdir().unwrap();
    let client = client();
    client.gateway().push_bytes(200, b"RIFF0000WAVE".to_vec());

    let outcome = client
        .audio_files()
        .download("f-9", &DirectorySaver::new(dir.path()))
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.bytes, 12);
    assert_eq!(outcome.path, dir.path().join("audio_f-9"));
    assert_eq!(std::fs::read(&outcome.path).unwrap(), b"RIFF0000WAVE");
    assert_eq!(
        client.gateway().last_request().unwrap().path,
        "/api/v1/audio-files/download/f-9"
    );
}

#[test]
fn test_download_failure_writes_nothing() {
    let dir = tempdir().unwrap();
    let client = client();
    client.gateway().push_json(404, json!({"detail": "missing"}));

    let err = client
        .audio_files()
        .download("gone", &DirectorySaver::new(dir.path()))
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_health() {
    let client = client();
    client.gateway().push_json(
        200,
        json!({"success": true, "data": {
            "ffmpeg_available": true,
            "upload_dir": "uploads",
            "max_file_size": 104857600,
            "allowed_extensions": [".mp3", ".wav"]
        }}),
    );

    let health = client.audio_files().health().unwrap().data.unwrap();
    assert!(health.ffmpeg_available);
    assert_eq!(health.allowed_extensions.len(), 2);
}

#[test]
fn test_list_and_info_paths() {
    let client = client();
    client
        .gateway()
        .push_json(200, json!({"success": true, "data": {"files": []}}))
        .push_json(200, json!({"success": true, "data": {"duration": 3.2}}));

    let api = client.audio_files();
    api.list().unwrap();
    api.info("f-1").unwrap();

    let paths: Vec<String> = client.gateway().requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, ["/api/v1/audio-files/list", "/api/v1/audio-files/info/f-1"]);
}

// === Multitrack ===

#[test]
fn test_project_lifecycle() {
    let client = client();
    let mut stored = create_empty_project(Some("Lifecycle"));
    stored.project.id = "project_7".to_string();
    let stored_json = serde_json::to_value(&stored).unwrap();

    client
        .gateway()
        .push_json(200, json!({"success": true, "data": stored_json.clone(), "message": "created"}))
        .push_json(200, json!({"success": true, "data": stored_json.clone()}))
        .push_json(200, json!({"success": true, "data": stored_json}))
        .push_json(200, json!([stored_json_header()]))
        .push_json(200, json!({"success": true, "message": "deleted"}));

    let api = client.multitrack();
    let created = api.create(&create_empty_project(Some("Lifecycle"))).unwrap();
    assert_eq!(created.message.as_deref(), Some("created"));

    let mut loaded = api.load("project_7").unwrap().data.unwrap();
    assert_eq!(loaded, stored);

    loaded.tracks[0].clips.push(Clip::new(0.0, 2.0).with_file("/audio/a.wav"));
    api.save("project_7", &loaded).unwrap();

    let listed = api.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Lifecycle");

    assert!(api.delete("project_7").unwrap().success);

    let methods: Vec<(Method, String)> = client
        .gateway()
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();
    assert_eq!(
        methods,
        vec![
            (Method::Post, "/api/v1/multitrack/create".to_string()),
            (Method::Get, "/api/v1/multitrack/load/project_7".to_string()),
            (Method::Put, "/api/v1/multitrack/save/project_7".to_string()),
            (Method::Get, "/api/v1/multitrack/list".to_string()),
            (Method::Delete, "/api/v1/multitrack/delete/project_7".to_string()),
        ]
    );
}

fn stored_json_header() -> serde_json::Value {
    json!({"id": "project_7", "title": "Lifecycle", "totalDuration": 2.0})
}

#[test]
fn test_load_missing_project() {
    let client = client();
    client
        .gateway()
        .push_json(404, json!({"detail": "project not found"}));

    let err = client.multitrack().load("nope").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Load project failed: 404 Not Found: project not found"
    );
    assert!(err.is_recoverable());
}

#[test]
fn test_server_error_without_detail() {
    let client = client();
    client
        .gateway()
        .push_response(ApiResponse::new(500, b"oops".to_vec()));

    let err = client.multitrack().list().unwrap_err();
    assert_eq!(err.to_string(), "List projects failed: 500 Internal Server Error");
}

#[test]
fn test_convert_request_body() {
    let client = client();
    let converted = create_empty_project(Some("Converted"));
    client.gateway().push_json(
        200,
        json!({"success": true, "data": serde_json::to_value(&converted).unwrap()}),
    );

    let request = ConversionRequest {
        dialogue_data: json!({"characters": [], "dialogues": []}),
        project_info: Some(json!({"title": "Converted"})),
        ..Default::default()
    };
    let reply = client.multitrack().convert_to_standard_format(&request).unwrap();
    assert_eq!(reply.data.unwrap().project.title, "Converted");

    let sent = client.gateway().last_request().unwrap();
    assert_eq!(
        sent.body,
        RequestBody::Json(json!({
            "dialogueData": {"characters": [], "dialogues": []},
            "projectInfo": {"title": "Converted"}
        }))
    );
}

#[test]
fn test_remote_validation_report() {
    let client = client();
    client.gateway().push_json(
        200,
        json!({"valid": false, "errors": ["Project total duration must be greater than 0"], "warnings": []}),
    );

    let report = client.multitrack().validate("project_7").unwrap();
    assert_eq!(
        report,
        ValidationReport {
            valid: false,
            errors: vec!["Project total duration must be greater than 0".to_string()],
            warnings: vec![],
            project_id: None,
        }
    );
}

#[test]
fn test_export_flow() {
    let dir = tempdir().unwrap();
    let client = client();
    client
        .gateway()
        .push_json(200, json!({"success": true, "export_task_id": "exp-1", "message": "started"}))
        .push_json(200, json!({"export_task_id": "exp-1", "status": "processing", "message": "rendering"}))
        .push_json(
            200,
            json!({"export_task_id": "exp-1", "status": "completed", "message": "done",
                   "output_path": "exports/exp-1.wav", "updated_at": "2024-05-01T10:30:00"}),
        )
        .push_bytes(200, vec![0u8; 64]);

    let api = client.multitrack();
    let started = api.export("project_7").unwrap();
    assert_eq!(started.export_task_id, "exp-1");

    let first = api.export_status("exp-1").unwrap();
    assert_eq!(first.status, ExportState::Processing);
    assert!(!first.is_finished());

    let second = api.export_status("exp-1").unwrap();
    assert!(second.is_finished());
    assert!(second.is_completed());

    let outcome = api
        .download_export("exp-1", &DirectorySaver::new(dir.path()))
        .unwrap();
    assert_eq!(outcome.path, dir.path().join("multitrack_export_exp-1.wav"));
    assert_eq!(outcome.bytes, 64);
}

#[test]
fn test_preview_with_duration() {
    let client = SoundEditClient::new(MockGateway::new().with_base_url("http://studio:8000/"));
    client.gateway().push_json(
        200,
        json!({"success": true, "message": "ok", "data": {
            "preview_file": "pv-1", "start_time": 2.5, "duration": 4.0, "sample_rate": 48000
        }}),
    );

    let api = client.multitrack();
    let preview = api
        .generate_preview("project_7", PreviewWindow::new(2.5).with_duration(4.0))
        .unwrap()
        .data
        .unwrap();
    assert_eq!(preview.sample_rate, 48000);

    let sent = client.gateway().last_request().unwrap();
    assert_eq!(sent.path, "/api/v1/multitrack/preview/project_7");
    assert_eq!(sent.query_value("start_time"), Some("2.5"));
    assert_eq!(sent.query_value("duration"), Some("4"));

    assert_eq!(
        api.preview_audio_url("pv-1").unwrap(),
        "http://studio:8000/api/v1/multitrack/preview/download/pv-1"
    );
}

#[test]
fn test_delete_preview_file_uses_editor_endpoint() {
    let client = client();
    client
        .gateway()
        .push_json(200, json!({"success": true, "message": "deleted"}));

    client.multitrack().delete_preview_file("preview_pv-1.wav").unwrap();
    let sent = client.gateway().last_request().unwrap();
    assert_eq!(sent.method, Method::Delete);
    assert_eq!(sent.path, "/api/v1/audio-editor/preview/preview_pv-1.wav");
}

// === Mix ===

#[test]
fn test_mix_plan_submitted_to_mixer() {
    let client = client();
    client
        .gateway()
        .push_json(200, json!({"task_id": "mix-1", "status": "processing", "message": "queued"}));

    let mut bundle = create_empty_project(None);
    bundle.tracks[1].clips.push(Clip::new(1.0, 8.0).with_file("/audio/rain.wav"));
    bundle.refresh_total_duration();

    let response = client.mix().mix_audio(&bundle.mix_request(None)).unwrap();
    assert_eq!(response.task_id, "mix-1");

    let sent = client.gateway().last_request().unwrap();
    if let RequestBody::Json(body) = sent.body {
        assert_eq!(body["tracks"][0]["file_path"], "/audio/rain.wav");
        assert_eq!(body["tracks"][0]["start_time"], 1.0);
        assert_eq!(body["tracks"][0]["end_time"], 9.0);
    } else {
        panic!("expected JSON body");
    }
}

#[test]
fn test_transport_error_passes_through() {
    let client = client();
    let err = client.mix().task_status("mix-1").unwrap_err();
    assert_eq!(err.error_code(), "CONNECTION_ERROR");
}
