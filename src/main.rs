mod catalog;
mod dispatch;
mod domain;
mod orchestrator;
mod stores;
#[cfg(test)]
mod testutil;
mod web;

use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use domain::{input_hash, ScheduleParameters};
use web::Config;

#[derive(Parser)]
#[command(name = "sat-sched")]
#[command(about = "Satellite mission schedule orchestration service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the schedule API server
    Serve {
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
    /// Print the input hash of a parameter snapshot file
    Hash { params: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Hash { params } => hash(&params),
    }
}

async fn serve(config_path: &str) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn hash(params_path: &str) -> ExitCode {
    let content = match fs::read_to_string(params_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let params: ScheduleParameters = match serde_json::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match input_hash(&params) {
        Ok(digest) => {
            println!("{}", digest);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Hash error: {}", e);
            ExitCode::FAILURE
        }
    }
}
