mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::HrModule;

use crate::{
    commands::{AttendanceCommand, DepartmentCommand, EmployeeCommand, LeaveCommand},
    config::{AppConfig, build_client},
};

#[derive(Parser, Debug)]
#[command(name = "hr-admin", version, about = "Manage HR records on the hosted backend")]
struct Cli {
    /// Use the in-memory store even when a backend is configured
    #[arg(long, global = true)]
    in_memory: bool,
    /// JSON file mapping table names to records, loaded into the in-memory store
    #[arg(long, global = true)]
    seed: Option<PathBuf>,
    /// Log filter directive, overrides RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(subcommand)]
    Employees(EmployeeCommand),
    #[command(subcommand)]
    Departments(DepartmentCommand),
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Leave requests
    #[command(subcommand)]
    Leave(LeaveCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    init_tracing(ObsConfig::default().with_filter(cli.log.clone()))
        .context("failed to initialise tracing")?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let client = build_client(&config, cli.in_memory, cli.seed.as_deref())?;
    let hr = HrModule::new(client);

    match cli.command {
        Commands::Employees(command) => commands::employees(&hr, command).await,
        Commands::Departments(command) => commands::departments(&hr, command).await,
        Commands::Attendance(command) => commands::attendance(&hr, command).await,
        Commands::Leave(command) => commands::leave(&hr, command).await,
    }
}
