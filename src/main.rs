use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use lockscope::analyzer::DependencyAnalyzer;
use lockscope::export::{self, ExportFormat};

#[derive(Parser)]
#[command(name = "lockscope")]
#[command(version)]
#[command(about = "Dependency graph analyzer for Composer manifests and lock files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the dependencies of a project directory
    Analyze {
        /// Path of the project (defaults to the current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { path, format } => {
            let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;

            let graph = DependencyAnalyzer::new()
                .analyze(&path)
                .with_context(|| format!("failed to analyze {}", path.display()))?;

            let mut stdout = std::io::stdout().lock();
            export::export(format, &graph, &mut stdout)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
