//! CLI Module
//!
//! Command-line interface for building project bundles locally and moving
//! them to and from the audio service.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ClientConfig;

/// Sound Edit - multitrack audio project client
#[derive(Parser, Debug)]
#[command(name = "soundedit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Audio service base URL (overrides SOUNDEDIT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds (overrides SOUNDEDIT_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an empty three-track project bundle
    #[command(name = "new-project")]
    NewProject {
        /// Bundle file to create
        path: PathBuf,

        /// Project title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Compute a bundle's total duration
    #[command(name = "duration")]
    Duration {
        path: PathBuf,

        /// Store the result as the bundle's totalDuration
        #[arg(long)]
        refresh: bool,
    },

    /// Check a bundle for problems
    #[command(name = "validate")]
    Validate { path: PathBuf },

    /// Print the mix request a bundle would produce
    #[command(name = "mix-plan")]
    MixPlan {
        path: PathBuf,

        /// Preview window start in seconds
        #[arg(long)]
        start: Option<f64>,

        /// Preview window length in seconds
        #[arg(long, requires = "start")]
        duration: Option<f64>,

        /// Write the plan to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Format seconds as a timeline position
    #[command(name = "format-time")]
    FormatTime { seconds: f64 },

    /// Format a byte count
    #[command(name = "format-size")]
    FormatSize { bytes: u64 },

    /// Generate item ids
    #[command(name = "gen-id")]
    GenId {
        #[arg(default_value = crate::id::DEFAULT_ID_PREFIX)]
        prefix: String,

        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Check the audio service is reachable
    #[command(name = "health")]
    Health,

    /// List uploaded audio files
    #[command(name = "list-files")]
    ListFiles,

    /// Upload audio files
    #[command(name = "upload")]
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long, default_value = crate::api::audio_files::DEFAULT_CATEGORY)]
        category: String,

        #[arg(short, long)]
        project: Option<String>,
    },

    /// List projects stored on the service
    #[command(name = "list-projects")]
    ListProjects,

    /// Create or update a bundle on the service
    #[command(name = "push")]
    Push { path: PathBuf },

    /// Fetch a project from the service into a bundle file
    #[command(name = "pull")]
    Pull { project_id: String, path: PathBuf },

    /// Start rendering a stored project
    #[command(name = "export")]
    Export {
        project_id: String,

        /// Poll until the export finishes
        #[arg(long)]
        wait: bool,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 2000)]
        poll_ms: u64,
    },

    /// Show an export task's status
    #[command(name = "export-status")]
    ExportStatus { task_id: String },

    /// Download a finished export
    #[command(name = "download-export")]
    DownloadExport {
        task_id: String,

        /// Directory to save into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Render a preview of a stored project
    #[command(name = "preview")]
    Preview {
        project_id: String,

        #[arg(long, default_value_t = 0.0)]
        start: f64,

        #[arg(long)]
        duration: Option<f64>,
    },
}
