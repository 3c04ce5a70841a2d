//! CLI Command Implementations
//!
//! Each command prints its result for the user and returns it for callers.
//! Remote commands take any [`SoundEditClient`], so they run the same over a
//! live gateway or a mock.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::{
    AudioMixRequest, AudioUpload, ExportState, ExportStatus, SoundEditClient, UploadOptions,
};
use crate::error::{Result, SoundEditError};
use crate::format::{format_duration, format_file_size, format_time};
use crate::gateway::HttpGateway;
use crate::id::IdGenerator;
use crate::project::{create_empty_project, PreviewWindow, ProjectBundle, ProjectInfo, ValidationReport};
use crate::save::{DirectorySaver, DownloadOutcome};

/// Write a fresh project bundle to `path`.
pub fn new_project(path: &Path, title: Option<&str>) -> Result<ProjectBundle> {
    info!("Creating project bundle at: {}", path.display());

    let bundle = create_empty_project(title);
    bundle.save(path)?;

    println!("Project created: {}", path.display());
    println!("Title: {}", bundle.project.title);
    for track in bundle.tracks_in_display_order() {
        println!("  {} ({})", track.name, track.id);
    }

    Ok(bundle)
}

/// Total duration of a bundle; with `refresh`, stored back into the file.
pub fn duration(path: &Path, refresh: bool) -> Result<f64> {
    let mut bundle = ProjectBundle::load(path)?;
    let total = bundle.calculate_duration();

    println!("{} ({:.3}s, {} clips)", format_duration(total), total, bundle.clip_count());

    if refresh {
        bundle.refresh_total_duration();
        bundle.save(path)?;
        println!("Updated totalDuration in {}", path.display());
    }

    Ok(total)
}

/// Validate a bundle and print the findings.
pub fn validate(path: &Path) -> Result<ValidationReport> {
    let report = ProjectBundle::load(path)?.validate();
    print_report(&report);
    Ok(report)
}

fn print_report(report: &ValidationReport) {
    if report.valid {
        println!("Project is valid");
    } else {
        println!("Project has {} error(s):", report.errors.len());
    }
    for error in &report.errors {
        println!("  error: {}", error);
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
}

/// Plan the mix for a bundle, optionally for a preview window.
pub fn mix_plan(
    path: &Path,
    start: Option<f64>,
    duration: Option<f64>,
    output: Option<&Path>,
) -> Result<AudioMixRequest> {
    let bundle = ProjectBundle::load(path)?;
    let window = start.map(|s| {
        let window = PreviewWindow::new(s);
        match duration {
            Some(d) => window.with_duration(d),
            None => window,
        }
    });

    let request = bundle.mix_request(window);
    let json = serde_json::to_string_pretty(&request)?;

    match output {
        Some(out) => {
            std::fs::write(out, &json)?;
            println!(
                "Mix plan with {} track(s) written to {}",
                request.tracks.len(),
                out.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(request)
}

pub fn print_time(seconds: f64) -> String {
    let formatted = format_time(seconds);
    println!("{} ({})", formatted, format_duration(seconds));
    formatted
}

pub fn print_size(bytes: u64) -> String {
    let formatted = format_file_size(bytes);
    println!("{}", formatted);
    formatted
}

pub fn gen_ids(prefix: &str, count: usize) -> Vec<String> {
    let mut generator = IdGenerator::new();
    let ids: Vec<String> = (0..count).map(|_| generator.generate(prefix)).collect();
    for id in &ids {
        println!("{}", id);
    }
    ids
}

/// Check the audio service and report its capabilities.
pub fn health<G: HttpGateway>(client: &SoundEditClient<G>) -> Result<bool> {
    let reply = client.audio_files().health()?;
    let status = reply.data;

    println!(
        "Audio service at {}: {}",
        client.gateway().url_for(""),
        if reply.success { "ok" } else { "degraded" }
    );
    if let Some(status) = &status {
        println!("  ffmpeg available: {}", status.ffmpeg_available);
        println!("  max upload size: {}", format_file_size(status.max_file_size));
        if !status.allowed_extensions.is_empty() {
            println!("  formats: {}", status.allowed_extensions.join(", "));
        }
    }

    Ok(reply.success)
}

pub fn list_files<G: HttpGateway>(client: &SoundEditClient<G>) -> Result<serde_json::Value> {
    let reply = client.audio_files().list()?;
    let data = reply.data.unwrap_or(serde_json::Value::Null);
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(data)
}

/// Upload files; one file uses the single-upload endpoint, more use batch.
pub fn upload<G: HttpGateway>(
    client: &SoundEditClient<G>,
    files: &[PathBuf],
    category: &str,
    project_id: Option<&str>,
) -> Result<usize> {
    let uploads = files
        .iter()
        .map(|p| AudioUpload::from_path(p))
        .collect::<Result<Vec<_>>>()?;

    let mut options = UploadOptions::default().category(category);
    if let Some(project_id) = project_id {
        options = options.project(project_id);
    }

    let api = client.audio_files();
    let uploaded = match uploads.as_slice() {
        [single] => {
            api.upload(single, &options)?;
            1
        }
        many => api
            .upload_multiple(many, &options)?
            .data
            .map_or(many.len(), |d| d.len()),
    };

    info!(uploaded, category, "upload finished");
    println!("Uploaded {} file(s) as {}", uploaded, category);
    Ok(uploaded)
}

pub fn list_projects<G: HttpGateway>(client: &SoundEditClient<G>) -> Result<Vec<ProjectInfo>> {
    let projects = client.multitrack().list()?;

    if projects.is_empty() {
        println!("No projects stored.");
        return Ok(projects);
    }

    println!("{:<38} {:<30} {:>9}", "ID", "TITLE", "LENGTH");
    println!("{:-<79}", "");
    for project in &projects {
        println!(
            "{:<38} {:<30} {:>9}",
            project.id,
            project.title,
            format_duration(project.total_duration)
        );
    }

    Ok(projects)
}

/// Send a bundle to the service.
///
/// A bundle without an id is created and the assigned id is written back
/// into the file; otherwise the stored copy is overwritten.
pub fn push<G: HttpGateway>(client: &SoundEditClient<G>, path: &Path) -> Result<String> {
    let mut bundle = ProjectBundle::load(path)?;

    let report = bundle.validate();
    if !report.valid {
        warn!(errors = report.errors.len(), "pushing a project that fails validation");
    }

    let api = client.multitrack();
    if bundle.project.id.is_empty() {
        let stored = api
            .create(&bundle)?
            .data
            .map(|stored| stored.project)
            .filter(|project| !project.id.is_empty())
            .ok_or_else(|| SoundEditError::InvalidResponse {
                operation: "Create project".to_string(),
                reason: "no project id in reply".to_string(),
            })?;

        let id = stored.id.clone();
        bundle.project.id = stored.id;
        if stored.created_at.is_some() {
            bundle.project.created_at = stored.created_at;
        }
        bundle.save(path)?;
        println!("Created project {}", id);
        Ok(id)
    } else {
        api.save(&bundle.project.id, &bundle)?;
        println!("Saved project {}", bundle.project.id);
        Ok(bundle.project.id)
    }
}

/// Fetch a stored project into a local bundle file.
pub fn pull<G: HttpGateway>(
    client: &SoundEditClient<G>,
    project_id: &str,
    path: &Path,
) -> Result<ProjectBundle> {
    let bundle = client
        .multitrack()
        .load(project_id)?
        .data
        .ok_or_else(|| SoundEditError::InvalidResponse {
            operation: "Load project".to_string(),
            reason: "no project data in reply".to_string(),
        })?;

    bundle.save(path)?;
    println!("Project {} written to {}", project_id, path.display());
    Ok(bundle)
}

/// Polls answered `not_found` before a waited-on export counts as missing.
///
/// The service only writes a task's status once the background render has
/// begun, so a fresh task reads as `not_found` for a short while.
pub const NOT_STARTED_POLLS: u32 = 5;

/// Start an export; with `wait`, poll until it finishes.
pub fn export<G: HttpGateway>(
    client: &SoundEditClient<G>,
    project_id: &str,
    wait: bool,
    poll_ms: u64,
) -> Result<ExportStatus> {
    let api = client.multitrack();
    let started = api.export(project_id)?;
    println!("Export task: {}", started.export_task_id);

    let mut status = api.export_status(&started.export_task_id)?;
    let mut unseen_polls = 0;
    while wait {
        let not_started =
            status.status == ExportState::NotFound && unseen_polls < NOT_STARTED_POLLS;
        if status.is_finished() && !not_started {
            break;
        }
        if status.status == ExportState::NotFound {
            unseen_polls += 1;
            debug!(task = %started.export_task_id, unseen_polls, "export not started yet");
        }

        thread::sleep(Duration::from_millis(poll_ms));
        status = api.export_status(&started.export_task_id)?;
    }

    print_status(&status);
    Ok(status)
}

pub fn export_status<G: HttpGateway>(
    client: &SoundEditClient<G>,
    task_id: &str,
) -> Result<ExportStatus> {
    let status = client.multitrack().export_status(task_id)?;
    print_status(&status);
    Ok(status)
}

fn print_status(status: &ExportStatus) {
    println!("{}: {}", status.export_task_id, status.status);
    if !status.message.is_empty() {
        println!("  {}", status.message);
    }
    if let Some(output) = &status.output_path {
        println!("  output: {}", output);
    }
}

pub fn download_export<G: HttpGateway>(
    client: &SoundEditClient<G>,
    task_id: &str,
    dir: &Path,
) -> Result<DownloadOutcome> {
    let saver = DirectorySaver::new(dir);
    let outcome = client.multitrack().download_export(task_id, &saver)?;
    println!(
        "{}: {} ({})",
        outcome.message,
        outcome.path.display(),
        format_file_size(outcome.bytes as u64)
    );
    Ok(outcome)
}

/// Render a preview and print where to stream it from.
pub fn preview<G: HttpGateway>(
    client: &SoundEditClient<G>,
    project_id: &str,
    start: f64,
    duration: Option<f64>,
) -> Result<String> {
    let mut window = PreviewWindow::new(start);
    if let Some(d) = duration {
        window = window.with_duration(d);
    }

    let api = client.multitrack();
    let data = api
        .generate_preview(project_id, window)?
        .data
        .ok_or_else(|| SoundEditError::InvalidResponse {
            operation: "Generate preview".to_string(),
            reason: "no preview data in reply".to_string(),
        })?;

    let url = api.preview_audio_url(&data.preview_file)?;
    println!(
        "Preview {} to {} at {} Hz",
        format_time(data.start_time),
        format_time(data.start_time + data.duration),
        data.sample_rate
    );
    println!("{}", url);
    Ok(url)
}
