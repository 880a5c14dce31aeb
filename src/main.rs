// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alerta_flows::config::{load_and_validate_config, Config, RuntimeBuilder, WorkflowConfig};
use alerta_flows::engine::{RunReport, Scheduler};
use alerta_flows::services::Services;

/// Periodic incident classification and notification workflows
#[derive(Parser)]
#[command(name = "alerta-flows")]
#[command(about = "Incident classification and critical-alert workflows", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration
    #[arg(
        short,
        long,
        env = "ALERTA_CONFIG",
        default_value = "configs/alerta.yaml",
        global = true
    )]
    config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one workflow once, now
    Run {
        /// Workflow ID, e.g. clasificar_incidentes
        workflow: String,
    },

    /// Run workflows on their schedules until Ctrl-C
    Schedule {
        /// Only schedule these workflows (repeatable); default is every enabled one
        #[arg(long = "workflow")]
        workflows: Vec<String>,
    },

    /// List configured workflows and their task graphs
    List,

    /// Load and validate the configuration
    Validate,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = load_and_validate_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Run { workflow } => run_workflow(&config, &workflow).await,
        Commands::Schedule { workflows } => schedule(&config, &workflows).await,
        Commands::List => {
            list_workflows(&config);
            Ok(())
        }
        Commands::Validate => {
            println!(
                "✅ {} is valid: {} workflow(s)",
                cli.config.display(),
                config.workflows.len()
            );
            Ok(())
        }
    }
}

async fn run_workflow(config: &Config, workflow_id: &str) -> Result<()> {
    let workflow = config.workflow(workflow_id)?;
    let services = Services::from_config(config)?;
    let runtime = RuntimeBuilder::from_workflow(workflow, &services)?;

    let report = runtime.run_once(Utc::now()).await?;
    print_report(workflow, &report)?;

    if !report.is_success() {
        bail!(
            "workflow '{}' finished with {} failed and {} skipped task(s)",
            workflow_id,
            report.failed.len(),
            report.skipped.len()
        );
    }
    Ok(())
}

fn print_report(workflow: &WorkflowConfig, report: &RunReport) -> Result<()> {
    println!("📋 {} (run {})", workflow.id, report.run.run_id);
    println!("{}", "─".repeat(60));

    for task in &workflow.tasks {
        let mark = if report.skipped.contains(&task.id) {
            "⏭️ "
        } else if report.output(&task.id).is_some() {
            "✅"
        } else {
            "❌"
        };
        println!("{} {}", mark, task.id);
        if let Some(error) = report.error(&task.id) {
            println!("     {}", error);
        }
    }

    // The last declared task carries the run's summary.
    if let Some(output) = workflow.tasks.last().and_then(|t| report.output(&t.id)) {
        println!("\n{}", serde_json::to_string_pretty(output)?);
    }
    println!("\n⏱️  {:.2?}", report.duration);
    Ok(())
}

async fn schedule(config: &Config, selected: &[String]) -> Result<()> {
    for id in selected {
        config.workflow(id)?;
    }

    let services = Services::from_config(config)?;
    let shutdown = CancellationToken::new();
    let mut scheduler = Scheduler::new(shutdown.clone());

    for workflow in config
        .workflows
        .iter()
        .filter(|w| w.enabled)
        .filter(|w| selected.is_empty() || selected.contains(&w.id))
    {
        let runtime = RuntimeBuilder::from_workflow(workflow, &services)?;
        scheduler.add(runtime, workflow.schedule_interval());
    }

    if scheduler.is_empty() {
        bail!("no enabled workflows to schedule");
    }

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl-C received, finishing in-flight runs");
                shutdown.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Unable to listen for Ctrl-C"),
        }
    });

    let runs = scheduler.run().await;
    println!("🛑 Scheduler stopped after {} run(s)", runs);
    Ok(())
}

fn list_workflows(config: &Config) {
    for workflow in &config.workflows {
        println!(
            "{} {} every {}s, retries {} ({}s apart), {:?}, {:?}",
            if workflow.enabled { "●" } else { "○" },
            workflow.id,
            workflow.schedule_interval_secs,
            workflow.retries,
            workflow.retry_delay_secs,
            workflow.strategy,
            workflow.failure_strategy,
        );
        if !workflow.description.is_empty() {
            println!("    {}", workflow.description);
        }
        for task in &workflow.tasks {
            if task.depends_on.is_empty() {
                println!("    - {} [{}]", task.id, task.task);
            } else {
                println!(
                    "    - {} [{}] <- {}",
                    task.id,
                    task.task,
                    task.depends_on.join(", ")
                );
            }
        }
    }
}
