//! `workflow-validator` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`    — expose webhook-triggered workflows over HTTP.
//! - `run`      — run a workflow once with manual input.
//! - `validate` — validate a JSON file of field descriptors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{ExecutorConfig, Workflow, WorkflowExecutor};
use nodes::validation::{validate, FieldDescriptor};

#[derive(Parser)]
#[command(
    name = "workflow-validator",
    about = "Webhook-triggered workflows with field validation",
    version
)]
struct Cli {
    /// Retries for nodes that fail with a retryable error.
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3, global = true)]
    max_retries: u32,

    /// Base back-off between retries, in milliseconds.
    #[arg(long, env = "RETRY_BASE_DELAY_MS", default_value_t = 100, global = true)]
    retry_base_delay_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server for webhook-triggered workflows.
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
        bind: String,
        /// Workflow definition files (JSON).
        #[arg(long = "workflow", env = "WORKFLOW_FILES", value_delimiter = ',', required = true)]
        workflows: Vec<PathBuf>,
    },
    /// Run a workflow once and print its output.
    Run {
        /// Workflow definition file (JSON).
        #[arg(long)]
        workflow: PathBuf,
        /// JSON file used as the initial input; defaults to one empty item.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Validate a JSON array of field descriptors.
    Validate {
        /// Path to the descriptor file.
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Annotate)]
        mode: Mode,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Print the validation result.
    Annotate,
    /// Fail with the combined error message on invalid input.
    Gate,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ExecutorConfig {
        max_retries: cli.max_retries,
        retry_base_delay: Duration::from_millis(cli.retry_base_delay_ms),
    };

    match cli.command {
        Command::Serve { bind, workflows } => {
            let executors = workflows
                .iter()
                .map(|path| load_executor(path, config.clone()))
                .collect::<Result<Vec<_>>>()?;
            let state = api::AppState::new(executors)?;
            info!("Starting API server on {bind}");
            api::serve(&bind, state).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { workflow, input } => {
            let executor = load_executor(&workflow, config)?;
            let input = match input {
                Some(path) => read_json(&path)?,
                None => Value::Array(vec![Value::Object(Default::default())]),
            };
            let result = executor.run(input).await?;
            info!("execution {} finished", result.execution_id);
            println!("{}", serde_json::to_string_pretty(&result.output)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { path, mode } => {
            let fields: Vec<FieldDescriptor> = serde_json::from_value(read_json(&path)?)
                .with_context(|| format!("invalid field descriptors in {}", path.display()))?;
            let result = validate(&fields);
            match mode {
                Mode::Annotate => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(ExitCode::SUCCESS)
                }
                Mode::Gate if result.is_valid => {
                    println!("✅ All {} fields are valid.", fields.len());
                    Ok(ExitCode::SUCCESS)
                }
                Mode::Gate => {
                    eprintln!("❌ Item failed validation. {}", result.summary());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn load_executor(path: &Path, config: ExecutorConfig) -> Result<WorkflowExecutor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    let workflow = Workflow::from_json(&content)
        .with_context(|| format!("cannot load workflow {}", path.display()))?;
    WorkflowExecutor::new(workflow, config)
        .with_context(|| format!("cannot build workflow {}", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}
