//! Skiff CLI - disposable cloud GPU dev boxes

use clap::Parser;

use skiff_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
