//! Sound Edit CLI
//!
//! Command-line client for multitrack project bundles and the audio service.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use soundedit::cli::commands;
use soundedit::cli::{Cli, Commands};
use soundedit::SoundEditClient;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Sound Edit v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(ref cmd) => handle_command(&cli, cmd),
        None => {
            println!("Sound Edit v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn connect(cli: &Cli) -> anyhow::Result<SoundEditClient<soundedit::gateway::ReqwestGateway>> {
    let config = cli.client_config();
    let url = config.base_url.clone();
    SoundEditClient::connect(config).with_context(|| format!("cannot set up client for {}", url))
}

fn handle_command(cli: &Cli, cmd: &Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::NewProject { path, title } => {
            commands::new_project(path, title.as_deref())?;
        }
        Commands::Duration { path, refresh } => {
            commands::duration(path, *refresh)?;
        }
        Commands::Validate { path } => {
            let report = commands::validate(path)?;
            if !report.valid {
                anyhow::bail!("{} failed validation", path.display());
            }
        }
        Commands::MixPlan {
            path,
            start,
            duration,
            output,
        } => {
            commands::mix_plan(path, *start, *duration, output.as_deref())?;
        }
        Commands::FormatTime { seconds } => {
            commands::print_time(*seconds);
        }
        Commands::FormatSize { bytes } => {
            commands::print_size(*bytes);
        }
        Commands::GenId { prefix, count } => {
            commands::gen_ids(prefix, *count);
        }
        Commands::Health => {
            commands::health(&connect(cli)?)?;
        }
        Commands::ListFiles => {
            commands::list_files(&connect(cli)?)?;
        }
        Commands::Upload {
            files,
            category,
            project,
        } => {
            commands::upload(&connect(cli)?, files, category, project.as_deref())?;
        }
        Commands::ListProjects => {
            commands::list_projects(&connect(cli)?)?;
        }
        Commands::Push { path } => {
            commands::push(&connect(cli)?, path)
                .with_context(|| format!("pushing {}", path.display()))?;
        }
        Commands::Pull { project_id, path } => {
            commands::pull(&connect(cli)?, project_id, path)?;
        }
        Commands::Export {
            project_id,
            wait,
            poll_ms,
        } => {
            commands::export(&connect(cli)?, project_id, *wait, *poll_ms)?;
        }
        Commands::ExportStatus { task_id } => {
            commands::export_status(&connect(cli)?, task_id)?;
        }
        Commands::DownloadExport { task_id, dir } => {
            commands::download_export(&connect(cli)?, task_id, dir)?;
        }
        Commands::Preview {
            project_id,
            start,
            duration,
        } => {
            commands::preview(&connect(cli)?, project_id, *start, *duration)?;
        }
    }
    Ok(())
}
