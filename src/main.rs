// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use repo_navigator::mcp::server::{repository_summaries, resolve_address};
use repo_navigator::mcp::NavigatorMcp;
use repo_navigator::utils::logging::{format_empty, format_rejected, format_resolved, format_section};
use repo_navigator::{Config, ModuleDetector, Workspace};
use rmcp::ServiceExt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "repo_navigator")]
#[command(version)]
#[command(about = "Multi-repository path resolution and module detection for tool-driven agents", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP (Model Context Protocol) server on stdio
    Serve,

    /// List registered repositories
    Repos,

    /// List detected modules
    Modules {
        #[arg(short, long)]
        repo: Option<String>,
    },

    /// Validate and resolve a repository-qualified path such as /my-repo/src/main.rs
    Resolve { address: String },

    /// Run module detection on a directory without registering it
    Detect { dir: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    repo_navigator::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Serve => cmd_serve(config).await?,
        Commands::Repos => cmd_repos(&config).await?,
        Commands::Modules { repo } => cmd_modules(&config, repo.as_deref()).await?,
        Commands::Resolve { address } => cmd_resolve(&config, &address).await?,
        Commands::Detect { dir } => cmd_detect(&config, &dir)?,
    }

    Ok(())
}

async fn load_workspace(config: &Config) -> Result<Workspace> {
    let start_time = Instant::now();
    let workspace = Workspace::initialize(config)
        .await
        .context("Failed to initialize repositories")?;

    info!(
        "Workspace ready in {:.2}s ({} repositories, {} modules)",
        start_time.elapsed().as_secs_f64(),
        workspace.repositories().len(),
        workspace.modules().len()
    );
    Ok(workspace)
}

async fn cmd_serve(config: Config) -> Result<()> {
    let workspace = load_workspace(&config).await?;
    if workspace.repositories().is_empty() {
        warn!("No repositories registered; tools will report every path as unknown");
    }

    let mcp_server = NavigatorMcp::new(workspace, config.server.clone());

    info!("MCP server ready. Available tools:");
    for tool in mcp_server.get_tool_router().list_all() {
        info!("  - {}", tool.name);
    }

    let service = mcp_server
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP server")?;
    service.waiting().await?;

    info!("MCP server stopped");
    Ok(())
}

async fn cmd_repos(config: &Config) -> Result<()> {
    let workspace = load_workspace(config).await?;
    let summaries = repository_summaries(&workspace);

    if summaries.is_empty() {
        println!("{}", format_empty("repositories"));
        return Ok(());
    }

    println!("{}", format_section("Repositories", summaries.len()));
    for repo in summaries {
        let marker = if repo.is_default { " (default)" } else { "" };
        println!(
            "  /{}{}  {}  [{} modules]  {}",
            repo.id,
            marker,
            repo.display_name,
            repo.module_count,
            repo.root_path.display()
        );
    }
    Ok(())
}

async fn cmd_modules(config: &Config, repo: Option<&str>) -> Result<()> {
    let workspace = load_workspace(config).await?;

    let modules = match repo {
        Some(repo_id) => {
            let repo = workspace.repositories().require(repo_id)?;
            workspace.modules().get_by_repo(&repo.id)
        }
        None => workspace.modules().all().cloned().collect(),
    };

    if modules.is_empty() {
        println!("{}", format_empty("modules"));
        return Ok(());
    }

    println!("{}", format_section("Modules", modules.len()));
    for module in modules {
        println!(
            "  /{}/{:<24} {:<12} {:<12} {}",
            module.repo_id, module.path, module.module_type, module.language, module.name
        );
    }
    Ok(())
}

async fn cmd_resolve(config: &Config, address: &str) -> Result<()> {
    let workspace = load_workspace(config).await?;

    match resolve_address(&workspace, address) {
        Ok(resolved) => {
            println!(
                "{}",
                format_resolved(address, &resolved.absolute_path.display().to_string())
            );
            if let Some(module) = resolved.module {
                println!("  module: {}", module);
            }
            Ok(())
        }
        Err(message) => {
            println!("{}", format_rejected(&message));
            Err(anyhow::anyhow!("Could not resolve {}", address))
        }
    }
}

fn cmd_detect(config: &Config, dir: &Path) -> Result<()> {
    let detector = ModuleDetector::new(config.detection.clone());
    let modules = detector
        .detect(dir)
        .with_context(|| format!("Module detection failed for {}", dir.display()))?;

    println!(
        "{}",
        format_section(&format!("Modules in {}", dir.display()), modules.len())
    );
    for module in modules {
        println!(
            "  {:<24} {:<12} {:<12} {}",
            module.id, module.module_type, module.language, module.name
        );
    }
    Ok(())
}
