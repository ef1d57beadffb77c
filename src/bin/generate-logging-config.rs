use clap::Parser;
use rust_structured_logging::generate_config_files;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "generate-logging-config")]
#[command(about = "Generate logging configuration files", long_about = None)]
struct Cli {
    /// The directory to generate logging configuration files in
    config_dir: PathBuf,

    /// Replace configuration files that already exist
    #[arg(long)]
    overwrite: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let resolved = std::env::current_dir()
        .map(|cwd| cwd.join(&cli.config_dir))
        .unwrap_or_else(|_| cli.config_dir.clone());
    println!(
        "Generating logging configuration files in {} (overwrite={})",
        resolved.display(),
        cli.overwrite
    );

    match generate_config_files(&cli.config_dir, cli.overwrite) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
