//! Auto-Evaluator packaging CLI

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use autoeval_pack::{package, DEFAULT_ARCHIVE_NAME};

#[derive(Parser)]
#[command(name = "autoeval-pack")]
#[command(about = "Zip the Auto-Evaluator extension for distribution")]
#[command(version)]
struct Cli {
    /// Extension root containing manifest.json and dist/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Archive to create
    #[arg(short, long, default_value = DEFAULT_ARCHIVE_NAME)]
    output: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = if cli.output.is_absolute() {
        cli.output.clone()
    } else {
        cli.root.join(&cli.output)
    };

    println!("Starting to zip files...");
    match package(&cli.root, &output, |name| println!("Adding: {}", name)) {
        Ok(count) => {
            println!("Success! {} ({} files) created.", output.display(), count);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error creating zip file: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
