//! Orchestrator CLI
//!
//! Usage:
//!   orchestrator agents list
//!   orchestrator agents status automation
//!   orchestrator run automation --task "Organize files"
//!   orchestrator chain steps.toml
//!   orchestrator workflow run nightly
//!   orchestrator serve --port 8000

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orchestrator::{ChainStep, Kwargs, Orchestrator, OrchestratorConfig};

#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Multi-agent task orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to orchestrator.toml (searched for if omitted)
    #[arg(long, short, env = "MAESTRO_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Agent inspection
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Dispatch one task to one agent
    Run {
        /// Registered agent name
        agent: String,

        /// Task description
        #[arg(long, short)]
        task: String,

        /// Keyword parameters as a JSON object
        #[arg(long)]
        kwargs: Option<String>,
    },
    /// Run a chain of steps from a JSON or TOML file
    Chain {
        /// File with a `steps` array
        file: PathBuf,
    },
    /// Run independent steps from a JSON or TOML file
    Parallel {
        /// File with a `steps` array
        file: PathBuf,
    },
    /// Workflow management and execution
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
    /// Serve the REST API
    #[cfg(feature = "web")]
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides config)
        #[arg(long, short)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum AgentCommands {
    /// List registered agents
    List,
    /// Show an agent's status
    Status {
        /// Agent name
        agent: String,
    },
}

#[derive(Subcommand)]
enum WorkflowCommands {
    /// List configured workflows
    List,
    /// Show a workflow definition
    Show {
        /// Workflow name
        workflow: String,
    },
    /// Run a workflow
    Run {
        /// Workflow name
        workflow: String,

        /// Accepted for compatibility; stored steps run as recorded
        #[arg(long)]
        kwargs: Option<String>,
    },
}

/// Step list file format for `chain` and `parallel`
#[derive(Debug, Deserialize)]
struct StepsFile {
    steps: Vec<ChainStep>,
}

/// Initialize tracing with the given verbosity level
///
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
///
/// Logs go to stderr so stdout stays clean JSON. Set `LOG_FORMAT=json` for
/// structured output.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Allow RUST_LOG to override if set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn render_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

fn parse_kwargs(raw: Option<&str>) -> Result<Kwargs> {
    match raw {
        Some(raw) => serde_json::from_str(raw).context("--kwargs must be a JSON object"),
        None => Ok(Kwargs::new()),
    }
}

fn load_steps(path: &Path) -> Result<Vec<ChainStep>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let file: StepsFile = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    };

    Ok(file.steps)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI first to get verbosity before initializing tracing
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let file_config = OrchestratorConfig::load(cli.config.as_deref())?;
    let orchestrator = Orchestrator::from_config(&file_config)?;

    match cli.command {
        Commands::Agents { command } => run_agents_command(command, &orchestrator),
        Commands::Run {
            agent,
            task,
            kwargs,
        } => {
            let kwargs = parse_kwargs(kwargs.as_deref())?;
            let result = orchestrator.dispatch(&agent, &task, kwargs).await;
            print_json(&result)
        }
        Commands::Chain { file } => {
            let steps = load_steps(&file)?;
            print_json(&orchestrator.execute_chain(&steps).await)
        }
        Commands::Parallel { file } => {
            let steps = load_steps(&file)?;
            print_json(&orchestrator.execute_parallel(&steps).await)
        }
        Commands::Workflow { command } => run_workflow_command(command, &orchestrator).await,
        #[cfg(feature = "web")]
        Commands::Serve { host, port } => {
            let config = orchestrator::web::WebConfig {
                host: host.unwrap_or(file_config.server.host),
                port: port.unwrap_or(file_config.server.port),
            };
            orchestrator::web::serve(std::sync::Arc::new(orchestrator), config).await
        }
    }
}

fn run_agents_command(command: AgentCommands, orchestrator: &Orchestrator) -> Result<()> {
    match command {
        AgentCommands::List => {
            let agents = orchestrator.list_agents();
            if agents.is_empty() {
                eprintln!("No agents registered. Declare [[agents]] in orchestrator.toml.");
            }
            print_json(&agents)
        }
        AgentCommands::Status { agent } => match orchestrator.agent_status(&agent) {
            Ok(status) => print_json(&status),
            Err(e) => {
                eprintln!("{}", e);
                eprintln!("Use 'orchestrator agents list' to see available agents.");
                std::process::exit(1);
            }
        },
    }
}

async fn run_workflow_command(command: WorkflowCommands, orchestrator: &Orchestrator) -> Result<()> {
    match command {
        WorkflowCommands::List => print_json(&orchestrator.list_workflows()),
        WorkflowCommands::Show { workflow } => match orchestrator.get_workflow(&workflow) {
            Some(wf) => print_json(&wf),
            None => {
                eprintln!("Workflow '{}' not found.", workflow);
                eprintln!("Use 'orchestrator workflow list' to see available workflows.");
                std::process::exit(1);
            }
        },
        WorkflowCommands::Run { workflow, kwargs } => {
            let kwargs = parse_kwargs(kwargs.as_deref())?;
            print_json(&orchestrator.run_workflow(&workflow, kwargs).await)
        }
    }
}
