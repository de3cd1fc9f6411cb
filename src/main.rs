use std::path::PathBuf;

use clap::Parser;
use survey_tools::config::SurveyConfig;
use survey_tools::io::fragments::DirectorySource;
use survey_tools::merge;
use survey_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    let config = cli.into_config()?;
    let source = DirectorySource::new(&config.fragments_dir);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    merge::merge_survey(&config, &source, &mut out)?;
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge class survey fragments into one consolidated dataset."
)]
struct Cli {
    /// Directory containing the survey fragments.
    #[arg(long)]
    fragments_dir: Option<PathBuf>,

    /// Path of the consolidated survey document.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON manifest listing the fragments and their groups.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Date stamped into the output metadata. Defaults to today.
    #[arg(long)]
    generated_at: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<SurveyConfig> {
        let mut config = SurveyConfig::default();
        if let Some(manifest) = &self.manifest {
            config.load_manifest(manifest)?;
        }
        if let Some(dir) = self.fragments_dir {
            config.fragments_dir = dir;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(date) = self.generated_at {
            config.generated_at = date;
        }
        Ok(config)
    }
}
