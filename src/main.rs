use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{run, show};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "rescribe")]
#[command(version = VERSION)]
#[command(about = "Pattern-driven rewrites for integration test files")]
struct Cli {
    /// Path to rescribe.json (default: ./rescribe.json when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply transforms to every matching test file
    Run(run::RunArgs),
    /// List available transforms
    List,
    /// Print a transform definition
    Show(show::ShowArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
